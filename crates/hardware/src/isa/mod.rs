//! Instruction set: decode tables, opcode descriptors, and execution.

/// Register name constants per the MIPS o32/n64 ABI.
pub mod abi;
/// Two-level static decode tables and instruction field accessors.
pub mod decode;
/// Execution functions, one module per opcode family.
pub mod exec;
/// Opcode identifiers, operand-need flags, and descriptors.
pub mod opcode;

pub use decode::decode;
pub use opcode::{Opcode, OpcodeDescriptor, OpcodeFlags};
