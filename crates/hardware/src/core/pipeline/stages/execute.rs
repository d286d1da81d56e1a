//! Execute stage.
//!
//! Applies the delay-slot kill mask, freshens operands against results that
//! completed this cycle, dispatches to the execution function table, and
//! populates the EX→DC latch with the pending write and bus request. New
//! faults enter the fault manager here and mark the output latch for the
//! drain.

use crate::core::cpu::Cpu;
use crate::core::pipeline::latches::{ExDcLatch, IcRfLatch, LatchHeader};
use crate::core::pipeline::stages::StageFlow;
use crate::isa::exec;

/// Runs the EX stage for one cycle.
pub fn execute_stage(cpu: &mut Cpu) -> StageFlow {
    let latch = std::mem::take(&mut cpu.rf_ex);

    if latch.header.fault.is_some() || !latch.header.valid {
        cpu.ex_dc = ExDcLatch {
            header: latch.header,
            request: None,
            write: Default::default(),
        };
        return StageFlow::Continue;
    }

    if latch.kill_mask == 0 {
        // Delay slot killed by a branch-likely (or the slot after ERET):
        // the instruction passes through as a bubble.
        cpu.ex_dc = ExDcLatch {
            header: LatchHeader {
                pc: latch.header.pc,
                valid: false,
                fault: None,
            },
            request: None,
            write: Default::default(),
        };
        return StageFlow::Continue;
    }

    // A load that completed in DC this same cycle is visible in the DC→WB
    // latch; the value latched at RF last cycle would be stale.
    let mut rs_value = latch.rs_value;
    let mut rt_value = latch.rt_value;
    if latch.op.flags.needs_rs && cpu.dc_wb.header.valid && cpu.dc_wb.write.reg == latch.rs {
        rs_value = cpu.dc_wb.write.value;
    }
    if latch.op.flags.needs_rt && cpu.dc_wb.header.valid && cpu.dc_wb.write.reg == latch.rt {
        rt_value = cpu.dc_wb.write.value;
    }

    let outcome = exec::execute(cpu, &latch, rs_value, rt_value);

    if let Some(fault) = outcome.fault {
        cpu.ex_dc = ExDcLatch {
            header: LatchHeader::faulted(latch.header.pc, fault),
            request: None,
            write: Default::default(),
        };
        // Instructions younger than the faulting one are still upstream;
        // squash the fetched word so the handler stream replaces it.
        cpu.ic_rf = IcRfLatch::default();
        cpu.raise_fault(fault, latch.header.pc);
        return StageFlow::Abort;
    }

    cpu.control.kill_next = outcome.kill_mask;
    if let Some(target) = outcome.redirect {
        cpu.fetch_pc = target;
    }

    cpu.ex_dc = ExDcLatch {
        header: latch.header,
        request: outcome.request,
        write: outcome.write,
    };
    StageFlow::Continue
}
