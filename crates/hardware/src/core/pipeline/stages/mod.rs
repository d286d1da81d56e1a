//! The five pipeline stage functions.
//!
//! Free functions over `&mut Cpu`, one per stage, evaluated in reverse
//! order by the cycle routines. A stage consumes (takes) its input latch
//! and overwrites its output latch; a stage handed a fault id propagates it
//! instead of executing. Returning [`StageFlow::Abort`] short-circuits the
//! remaining (upstream) stage functions for the cycle.

/// EX: dispatch to the execution function table.
pub mod execute;
/// IC: segment resolution, translation, and instruction fetch.
pub mod fetch;
/// DC: bus transaction completion.
pub mod memory;
/// RF: decode, operand read, and forwarding.
pub mod regfile;
/// WB: register retirement and fault clearing.
pub mod writeback;

pub use execute::execute_stage;
pub use fetch::fetch_stage;
pub use memory::memory_stage;
pub use regfile::regfile_stage;
pub use writeback::writeback_stage;

/// Whether the cycle continues into the next (upstream) stage function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageFlow {
    /// Proceed to the next stage function.
    Continue,
    /// Stop evaluating stages this cycle (fault or interlock entered).
    Abort,
}
