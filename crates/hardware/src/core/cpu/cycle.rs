//! The per-cycle state machine.
//!
//! One call to [`Cpu::cycle`] is one master-clock cycle and one
//! deterministic state transition. The routine chosen per cycle:
//!
//! 1. **Reset**: highest priority; runs regardless of any pending state.
//! 2. **Stall**: while bubble cycles remain, only the counter moves.
//! 3. **Fast**: no fault or interlock residue — all five stages, reverse
//!    order.
//! 4. **Slow**: resumption after a stall (honouring `skip_stages`), fault
//!    draining, and the decay back to fast.

use crate::common::constants::{EXCEPTION_HISTORY_LIMIT, RESET_VECTOR};
use crate::common::error::SimError;
use crate::core::arch::mode::OperatingMode;
use crate::core::cpu::Cpu;
use crate::core::pipeline::control::PipelineControl;
use crate::core::pipeline::latches::{DcWbLatch, ExDcLatch, IcRfLatch, RfExLatch};
use crate::core::pipeline::stages::{
    StageFlow, execute_stage, fetch_stage, memory_stage, regfile_stage, writeback_stage,
};
use crate::core::units::mmu::DEFAULT_SEGMENT;

impl Cpu {
    /// Advances the machine by exactly one cycle.
    ///
    /// # Errors
    ///
    /// [`SimError`] for host-fatal conditions: an unimplemented opcode
    /// outside the tolerated list, an indeterminate operating mode, or a
    /// second reset pulse. Guest faults are not errors; they redirect the
    /// guest and return `Ok`.
    pub fn cycle(&mut self) -> Result<(), SimError> {
        self.stats.cycles += 1;

        if self.reset_signal {
            return self.cold_reset();
        }

        if self.control.cycles_to_stall > 0 {
            self.control.cycles_to_stall -= 1;
            self.stats.stall_cycles += 1;
            return Ok(());
        }

        // Status changes (MTC0, fault entry, ERET) take effect on mode and
        // segment resolution here, at the top of the following cycle.
        self.mode = OperatingMode::from_status(self.cp0.status())?;

        if !self.breakpoints.is_empty() && self.breakpoints.contains(&self.fetch_pc) {
            let pc = self.fetch_pc;
            if let Some(hook) = self.breakpoint_hook.as_mut() {
                hook(pc);
            }
        }

        if self.control.is_slow() {
            self.cycle_slow()
        } else {
            self.cycle_fast()
        }
    }

    /// Fast path: every stage, reverse order, short-circuiting on abort.
    fn cycle_fast(&mut self) -> Result<(), SimError> {
        if matches!(writeback_stage(self), StageFlow::Abort) {
            return Ok(());
        }
        if matches!(memory_stage(self), StageFlow::Abort) {
            return Ok(());
        }
        if matches!(execute_stage(self), StageFlow::Abort) {
            return Ok(());
        }
        if matches!(regfile_stage(self)?, StageFlow::Abort) {
            return Ok(());
        }
        let _ = fetch_stage(self);
        Ok(())
    }

    /// Slow path: honours the resumption point, drains faults, and decays
    /// back to the fast path.
    ///
    /// `skip_stages` applies only to this cycle: the bypassed downstream
    /// stages already ran in the cycle that detected the condition.
    fn cycle_slow(&mut self) -> Result<(), SimError> {
        let skip = std::mem::take(&mut self.control.skip_stages);

        'stages: {
            if skip < 1 && matches!(writeback_stage(self), StageFlow::Abort) {
                break 'stages;
            }
            if skip < 2 && matches!(memory_stage(self), StageFlow::Abort) {
                break 'stages;
            }
            if skip < 3 && matches!(execute_stage(self), StageFlow::Abort) {
                break 'stages;
            }
            if skip < 4 && matches!(regfile_stage(self)?, StageFlow::Abort) {
                break 'stages;
            }
            let _ = fetch_stage(self);
        }

        self.control.exception_history += 1;
        if !self.control.fault_present && self.control.exception_history > EXCEPTION_HISTORY_LIMIT {
            self.control.exception_history = 0;
        }
        Ok(())
    }

    /// Cold reset: programs the documented register values and points the
    /// fetch at the boot vector.
    ///
    /// Runs exactly once. A second reset pulse is a host-fatal error —
    /// warm reset sequencing is deliberately unsupported rather than
    /// guessed.
    fn cold_reset(&mut self) -> Result<(), SimError> {
        if self.control.reset_taken {
            return Err(SimError::SoftReset);
        }
        tracing::debug!("cold reset");

        self.reset_signal = false;
        self.control = PipelineControl {
            reset_taken: true,
            ..PipelineControl::default()
        };
        self.cp0.cold_reset();
        self.ic_rf = IcRfLatch::default();
        self.rf_ex = RfExLatch::default();
        self.ex_dc = ExDcLatch::default();
        self.dc_wb = DcWbLatch::default();
        self.fetch_pc = RESET_VECTOR;
        self.active_segment = &DEFAULT_SEGMENT;
        Ok(())
    }
}
