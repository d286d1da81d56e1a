//! Cycle-accurate VR4300-class (MIPS III) CPU pipeline and MMU simulator.
//!
//! This crate implements the CPU core of a 1990s games console with the
//! following:
//! 1. **Pipeline:** Five cycle-stepped stages (IC, RF, EX, DC, WB) with
//!    inter-stage latches, fault draining, and interlock scheduling.
//! 2. **MMU:** Static segment resolution per operating mode and a 32-entry
//!    software-managed TLB with even/odd page pairs.
//! 3. **Caches:** A virtually-indexed, physically-tagged instruction cache.
//! 4. **ISA:** Table-driven decode and execution for the MIPS III integer
//!    subset plus CP0 privileged operations.
//! 5. **Simulation:** Bus contract, reference memory controller, loader,
//!    configuration, and statistics.

/// Common types and constants (addresses, registers, faults).
pub mod common;
/// Simulator configuration (defaults and hierarchical structures).
pub mod config;
/// CPU core (architectural state, pipeline, hardware units).
pub mod core;
/// Instruction set (decode tables, opcode descriptors, execution).
pub mod isa;
/// Loader and simulator wrapper.
pub mod sim;
/// System-on-chip surface (bus contract, reference memory).
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from
/// JSON.
pub use crate::config::Config;
/// Main CPU type; holds registers, pipeline latches, MMU, and stats.
pub use crate::core::Cpu;
/// Top-level simulator; construct with a bus controller and a config.
pub use crate::sim::Simulator;
