//! Pipeline control: fault and interlock entry points, slow-path state.
//!
//! This module implements the fault/interlock manager. It performs the
//! following:
//! 1. **Mode Tracking:** Fast (all five stages every cycle) versus slow
//!    (selectively-resuming, fault-aware) cycle selection.
//! 2. **Fault Entry:** CP0 context capture, Status.EXL, vector redirect,
//!    and the entry bubble cycles.
//! 3. **Interlock Entry:** Stall scheduling with a resumption point, with
//!    no guest-visible state change.
//!
//! Faults ripple downstream one stage per cycle through the latch headers
//! (drain, not flush); only stages *upstream* of the detector are squashed,
//! since they hold instructions younger than the faulting one.

use crate::common::constants::{
    VECTOR_BASE, VECTOR_BASE_BOOTSTRAP, VECTOR_OFFSET_GENERAL, VECTOR_OFFSET_REFILL,
};
use crate::common::error::Fault;
use crate::core::arch::cp0::{index, status};
use crate::core::cpu::Cpu;
use crate::core::units::mmu::DEFAULT_SEGMENT;

/// Pipeline control state.
///
/// `skip_stages` is consumed on the first cycle after a stall: it names how
/// many downstream stages (counting from WB) are bypassed when the pipeline
/// resumes, because they already ran in the cycle the condition was
/// detected. `exception_history` counts slow cycles; past one pipeline
/// drain without a new condition the control reverts to the fast path.
#[derive(Debug)]
pub struct PipelineControl {
    /// A fault id is still draining through the latches.
    pub fault_present: bool,
    /// Remaining bubble cycles; while non-zero, a cycle only decrements.
    pub cycles_to_stall: u64,
    /// Downstream stages bypassed on the resumption cycle (0-4).
    pub skip_stages: u8,
    /// Slow cycles since the last fault/interlock entry.
    pub exception_history: u8,
    /// Kill mask for the instruction currently in RF, set by a
    /// branch-likely (or ERET) in EX and latched into RF→EX.
    pub kill_next: u64,
    /// PC of an uncached fetch whose interlock latency has been paid; the
    /// IC stage completes it on the resumption cycle.
    pub pending_uncached: Option<u64>,
    /// Cold reset has run; a second reset pulse is host-fatal.
    pub reset_taken: bool,
}

impl Default for PipelineControl {
    fn default() -> Self {
        Self {
            fault_present: false,
            cycles_to_stall: 0,
            skip_stages: 0,
            exception_history: 0,
            kill_next: !0,
            pending_uncached: None,
            reset_taken: false,
        }
    }
}

impl PipelineControl {
    /// Returns `true` when the slow cycle routine must run.
    pub const fn is_slow(&self) -> bool {
        self.fault_present || self.skip_stages > 0 || self.exception_history > 0
    }
}

impl Cpu {
    /// Fault entry point, called by a stage that detected a new fault.
    ///
    /// Captures EPC/Cause (plus BadVAddr/EntryHi/Context for address and
    /// TLB faults), raises Status.EXL, redirects the fetch PC to the
    /// appropriate vector, forces segment re-resolution, and schedules the
    /// exception-entry bubble cycles. The caller has already marked its
    /// output latch with the fault id; the id drains from there.
    pub fn raise_fault(&mut self, fault: Fault, epc: u64) {
        tracing::debug!(%fault, epc = %format_args!("{epc:#x}"), "fault entry");
        self.count_fault(fault);

        let status_value = self.cp0.status();
        let refill_vector = fault.is_refill() && status_value & status::EXL == 0;

        // EPC is not re-captured for a fault taken at exception level: the
        // original context wins.
        if status_value & status::EXL == 0 {
            self.cp0.write(index::EPC, epc);
        }
        self.cp0.write(index::CAUSE, fault.cause_code() << 2);
        if let Some(vaddr) = fault.bad_vaddr() {
            if fault.is_tlb() {
                self.cp0.latch_tlb_context(vaddr);
            } else {
                self.cp0.write(index::BAD_VADDR, vaddr);
            }
        }
        self.cp0.set_status(status_value | status::EXL);

        let base = if status_value & status::BEV != 0 {
            VECTOR_BASE_BOOTSTRAP
        } else {
            VECTOR_BASE
        };
        let offset = if refill_vector {
            VECTOR_OFFSET_REFILL
        } else {
            VECTOR_OFFSET_GENERAL
        };
        self.fetch_pc = base + offset;
        self.active_segment = &DEFAULT_SEGMENT;

        self.control.fault_present = true;
        self.control.cycles_to_stall = self.timing.exception_entry_latency;
        self.control.skip_stages = 0;
        self.control.exception_history = 0;
        self.control.kill_next = !0;
        self.control.pending_uncached = None;
    }

    /// Interlock entry point: a stall, not a fault.
    ///
    /// Schedules `cycles` bubble cycles and records the resumption point.
    /// PC, Status, and every latch are untouched — an interlock never
    /// changes guest-visible state.
    pub fn raise_interlock(&mut self, cycles: u64, skip_stages: u8) {
        tracing::trace!(cycles, skip_stages, "interlock");
        self.stats.interlocks += 1;
        self.control.cycles_to_stall = cycles;
        self.control.skip_stages = skip_stages;
        self.control.exception_history = 0;
    }

    fn count_fault(&mut self, fault: Fault) {
        match fault {
            Fault::AddressErrorLoad(_) | Fault::AddressErrorStore(_) => {
                self.stats.faults_address += 1;
            }
            Fault::TlbRefillLoad(_)
            | Fault::TlbInvalidLoad(_)
            | Fault::TlbRefillStore(_)
            | Fault::TlbInvalidStore(_)
            | Fault::TlbModified(_) => self.stats.faults_tlb += 1,
            Fault::Syscall | Fault::Breakpoint => self.stats.faults_system += 1,
            Fault::IntegerOverflow => self.stats.faults_overflow += 1,
            Fault::ColdReset => {}
        }
    }
}
