//! Five-stage pipeline: latches, control state, and stage functions.
//!
//! Stage order is IC (instruction cache), RF (register file), EX (execute),
//! DC (data cache), WB (writeback). Each cycle evaluates the stages in
//! reverse order (WB first) so every stage consumes the latch contents its
//! predecessor produced in the *previous* cycle — the one-cycle-delay
//! discipline that makes this a pipeline rather than an interpreter.

/// Pipeline control state: fault/interlock bookkeeping and slow-path
/// resumption.
pub mod control;
/// Inter-stage latch structures.
pub mod latches;
/// The five stage functions.
pub mod stages;

pub use control::PipelineControl;
pub use latches::{DcWbLatch, ExDcLatch, IcRfLatch, LatchHeader, PendingWrite, RfExLatch};
