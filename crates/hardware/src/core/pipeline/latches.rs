//! Pipeline latch structures for inter-stage communication.
//!
//! One structure per stage boundary: IC→RF, RF→EX, EX→DC, DC→WB. Each
//! carries a common header plus the stage-specific payload. A stage takes
//! its input latch (leaving a bubble) and overwrites its output latch every
//! cycle; the default value of every latch is an empty bubble, so re-running
//! a stage over a consumed latch is harmless.

use crate::common::error::Fault;
use crate::isa::opcode::OpcodeDescriptor;
use crate::soc::bus::BusRequest;

/// Header common to every latch.
///
/// `fault` is how a faulting instruction drains: a stage handed a latch
/// with a fault id propagates the id into its own output latch instead of
/// executing, one stage per cycle, until writeback retires it.
#[derive(Clone, Copy, Debug, Default)]
pub struct LatchHeader {
    /// Program counter of the instruction in this slot.
    pub pc: u64,
    /// Slot holds a real instruction, not a bubble.
    pub valid: bool,
    /// Fault id riding in this slot, if any.
    pub fault: Option<Fault>,
}

impl LatchHeader {
    /// Header for a live instruction at `pc`.
    pub const fn live(pc: u64) -> Self {
        Self {
            pc,
            valid: true,
            fault: None,
        }
    }

    /// Header carrying a fault id for the instruction at `pc`.
    pub const fn faulted(pc: u64, fault: Fault) -> Self {
        Self {
            pc,
            valid: false,
            fault: Some(fault),
        }
    }
}

/// A register write waiting for the writeback stage.
///
/// Register zero doubles as "no write": the register file discards writes
/// to it, so a bubble's pending write is simply slot zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingWrite {
    /// Destination register index; zero means no write.
    pub reg: usize,
    /// Value to write.
    pub value: u64,
}

/// IC→RF latch: the fetched instruction word.
#[derive(Clone, Copy, Debug, Default)]
pub struct IcRfLatch {
    /// Common header.
    pub header: LatchHeader,
    /// Raw instruction word.
    pub word: u32,
}

/// RF→EX latch: decoded descriptor, latched operands, and the kill mask.
#[derive(Clone, Copy, Debug)]
pub struct RfExLatch {
    /// Common header.
    pub header: LatchHeader,
    /// Raw instruction word.
    pub word: u32,
    /// Decoded opcode descriptor.
    pub op: OpcodeDescriptor,
    /// rs register index.
    pub rs: usize,
    /// rt register index.
    pub rt: usize,
    /// Latched rs value.
    pub rs_value: u64,
    /// Latched rt value.
    pub rt_value: u64,
    /// All-ones normally; all-zeros when a branch-likely killed this slot.
    pub kill_mask: u64,
}

impl Default for RfExLatch {
    /// A bubble. The kill mask defaults to all-ones so a bubble never
    /// reads as a killed slot.
    fn default() -> Self {
        Self {
            header: LatchHeader::default(),
            word: 0,
            op: OpcodeDescriptor::default(),
            rs: 0,
            rt: 0,
            rs_value: 0,
            rt_value: 0,
            kill_mask: !0,
        }
    }
}

/// EX→DC latch: pending bus request and pending register write.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExDcLatch {
    /// Common header.
    pub header: LatchHeader,
    /// Memory transaction to perform, if the instruction touches memory.
    pub request: Option<BusRequest>,
    /// Register write to retire (loads fill in the value at DC).
    pub write: PendingWrite,
}

/// DC→WB latch: the completed register write.
#[derive(Clone, Copy, Debug, Default)]
pub struct DcWbLatch {
    /// Common header.
    pub header: LatchHeader,
    /// Register write to retire.
    pub write: PendingWrite,
}
