//! Register-file stage.
//!
//! Decodes the fetched word, reads the operand registers (freshening them
//! from in-flight results per the descriptor's operand-need flags), latches
//! the pending delay-slot kill mask, and enforces the unimplemented-opcode
//! policy: undecoded words outside the configured tolerated list are
//! host-fatal, never silently skipped.

use crate::common::error::SimError;
use crate::core::cpu::Cpu;
use crate::core::pipeline::latches::{LatchHeader, RfExLatch};
use crate::core::pipeline::stages::StageFlow;
use crate::isa::decode::{self, decode};
use crate::isa::opcode::Opcode;

/// Runs the RF stage for one cycle.
///
/// # Errors
///
/// [`SimError::UnimplementedOpcode`] for an undecodable word whose primary
/// opcode is not in the tolerated list.
pub fn regfile_stage(cpu: &mut Cpu) -> Result<StageFlow, SimError> {
    let latch = std::mem::take(&mut cpu.ic_rf);

    if latch.header.fault.is_some() || !latch.header.valid {
        cpu.rf_ex = RfExLatch {
            header: latch.header,
            ..RfExLatch::default()
        };
        return Ok(StageFlow::Continue);
    }

    let op = decode(latch.word);
    if op.id == Opcode::Invalid {
        let primary = decode::primary(latch.word);
        if cpu.tolerated_opcodes.contains(&primary) {
            tracing::warn!(
                word = %format_args!("{:#010x}", latch.word),
                pc = %format_args!("{:#x}", latch.header.pc),
                "tolerated opcode executed as no-op"
            );
            cpu.rf_ex = RfExLatch {
                header: LatchHeader {
                    pc: latch.header.pc,
                    valid: false,
                    fault: None,
                },
                ..RfExLatch::default()
            };
            return Ok(StageFlow::Continue);
        }
        return Err(SimError::UnimplementedOpcode {
            word: latch.word,
            pc: latch.header.pc,
        });
    }

    let rs = decode::rs(latch.word);
    let rt = decode::rt(latch.word);
    let mut rs_value = cpu.regs.read(rs);
    let mut rt_value = cpu.regs.read(rt);
    if op.flags.needs_rs {
        rs_value = cpu.forward(rs, rs_value);
    }
    if op.flags.needs_rt {
        rt_value = cpu.forward(rt, rt_value);
    }

    cpu.rf_ex = RfExLatch {
        header: latch.header,
        word: latch.word,
        op,
        rs,
        rt,
        rs_value,
        rt_value,
        kill_mask: std::mem::replace(&mut cpu.control.kill_next, !0),
    };
    Ok(StageFlow::Continue)
}
