//! Writeback stage.
//!
//! Retires the completed register write and clears a draining fault once it
//! has passed every stage. The register file's zero-discard enforces the
//! r0 invariant for bubbles and killed slots alike.

use crate::core::cpu::Cpu;
use crate::core::pipeline::stages::StageFlow;

/// Runs the WB stage for one cycle.
pub fn writeback_stage(cpu: &mut Cpu) -> StageFlow {
    let latch = std::mem::take(&mut cpu.dc_wb);

    if let Some(fault) = latch.header.fault {
        // The fault id has now ridden through every stage: drain complete.
        tracing::trace!(%fault, pc = %format_args!("{:#x}", latch.header.pc), "fault drained");
        cpu.control.fault_present = false;
        return StageFlow::Continue;
    }

    if latch.header.valid {
        cpu.regs.write(latch.write.reg, latch.write.value);
        cpu.stats.instructions_retired += 1;
        if cpu.trace {
            tracing::trace!(
                pc = %format_args!("{:#x}", latch.header.pc),
                reg = latch.write.reg,
                value = %format_args!("{:#x}", latch.write.value),
                "retire"
            );
        }
    }
    StageFlow::Continue
}
