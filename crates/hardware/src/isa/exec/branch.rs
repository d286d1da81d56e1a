//! Branch and jump execution.
//!
//! Relative branches target `pc + 4 + (sign_extend(imm16) << 2)`: the
//! offset is relative to the delay slot. Jumps splice the 26-bit target
//! into the upper bits of the delay slot's PC. Link forms write `pc + 8`
//! (the instruction after the delay slot) unconditionally.
//!
//! The "likely" variants kill the delay slot when the branch is **not**
//! taken. The kill is a comparison-driven 0/all-ones mask, not a host
//! conditional: the execute stage ANDs the delay slot's destination
//! register with it, which funnels a killed write into register zero.

use crate::core::pipeline::latches::RfExLatch;
use crate::isa::abi::RA;
use crate::isa::decode::{rd, simm16, target26};
use crate::isa::exec::Outcome;
use crate::isa::opcode::Opcode;

/// Executes one branch-family instruction.
pub fn execute(latch: &RfExLatch, a: u64, b: u64) -> Outcome {
    let w = latch.word;
    let pc = latch.header.pc;
    let relative = pc
        .wrapping_add(4)
        .wrapping_add(simm16(w) << 2);
    let link = pc.wrapping_add(8);

    match latch.op.id {
        Opcode::J => jump(w, pc),
        Opcode::Jal => Outcome {
            write: Outcome::write(RA, link).write,
            ..jump(w, pc)
        },
        Opcode::Jr => Outcome {
            redirect: Some(a),
            ..Outcome::none()
        },
        Opcode::Jalr => Outcome {
            redirect: Some(a),
            ..Outcome::write(rd(w), link)
        },

        Opcode::Beq => branch(relative, a == b, false),
        Opcode::Bne => branch(relative, a != b, false),
        Opcode::Blez => branch(relative, (a as i64) <= 0, false),
        Opcode::Bgtz => branch(relative, (a as i64) > 0, false),
        Opcode::Beql => branch(relative, a == b, true),
        Opcode::Bnel => branch(relative, a != b, true),
        Opcode::Blezl => branch(relative, (a as i64) <= 0, true),
        Opcode::Bgtzl => branch(relative, (a as i64) > 0, true),

        Opcode::Bltz => branch(relative, (a as i64) < 0, false),
        Opcode::Bgez => branch(relative, (a as i64) >= 0, false),
        Opcode::Bltzl => branch(relative, (a as i64) < 0, true),
        Opcode::Bgezl => branch(relative, (a as i64) >= 0, true),
        Opcode::Bltzal => linked(branch(relative, (a as i64) < 0, false), link),
        Opcode::Bgezal => linked(branch(relative, (a as i64) >= 0, false), link),
        Opcode::Bltzall => linked(branch(relative, (a as i64) < 0, true), link),
        Opcode::Bgezall => linked(branch(relative, (a as i64) >= 0, true), link),

        _ => Outcome::none(),
    }
}

/// Absolute jump: 26-bit target in the delay slot's 256 MiB region.
fn jump(w: u32, pc: u64) -> Outcome {
    let upper = pc.wrapping_add(4) & 0xFFFF_FFFF_F000_0000;
    Outcome {
        redirect: Some(upper | (target26(w) << 2)),
        ..Outcome::none()
    }
}

/// Conditional branch outcome.
///
/// `mask` is 0 or all-ones derived from the comparison; likely variants
/// hand it to the pipeline as the delay-slot kill mask.
fn branch(target: u64, taken: bool, likely: bool) -> Outcome {
    let mask = u64::from(taken).wrapping_neg();
    Outcome {
        redirect: taken.then_some(target),
        kill_mask: if likely { mask } else { !0 },
        ..Outcome::none()
    }
}

/// Adds the unconditional RA link write to a branch outcome.
const fn linked(outcome: Outcome, link: u64) -> Outcome {
    Outcome {
        write: Outcome::write(RA, link).write,
        ..outcome
    }
}
