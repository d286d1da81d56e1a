//! ALU, shift, and multiply/divide execution.
//!
//! Word (32-bit) operations compute in 32 bits and store the result
//! sign-extended through `as i32`, per the architecture: a word result
//! occupies the full 64-bit register with its sign replicated. The trapping
//! add/subtract forms raise an overflow fault and leave the destination
//! untouched.

use crate::common::error::Fault;
use crate::core::cpu::Cpu;
use crate::core::pipeline::latches::RfExLatch;
use crate::isa::decode::{rd, rt, sa, simm16};
use crate::isa::exec::Outcome;
use crate::isa::opcode::Opcode;

/// Executes one ALU-family instruction.
pub fn execute(cpu: &mut Cpu, latch: &RfExLatch, a: u64, b: u64) -> Outcome {
    let w = latch.word;
    let dest = rd(w);
    let imm = simm16(w);

    match latch.op.id {
        // Shifts by the sa field. SLL of zero into register zero is the
        // canonical NOP and falls out of the zero-register discard.
        Opcode::Sll => Outcome::write(dest, ((b as u32) << sa(w)) as i32 as u64),
        Opcode::Srl => Outcome::write(dest, ((b as u32) >> sa(w)) as i32 as u64),
        Opcode::Sra => Outcome::write(dest, ((b as u32) as i32 >> sa(w)) as u64),
        Opcode::Dsll => Outcome::write(dest, b << sa(w)),
        Opcode::Dsrl => Outcome::write(dest, b >> sa(w)),
        Opcode::Dsra => Outcome::write(dest, ((b as i64) >> sa(w)) as u64),
        Opcode::Dsll32 => Outcome::write(dest, b << (sa(w) + 32)),
        Opcode::Dsrl32 => Outcome::write(dest, b >> (sa(w) + 32)),
        Opcode::Dsra32 => Outcome::write(dest, ((b as i64) >> (sa(w) + 32)) as u64),

        // Shifts by the low bits of rs.
        Opcode::Sllv => Outcome::write(dest, ((b as u32) << (a & 31)) as i32 as u64),
        Opcode::Srlv => Outcome::write(dest, ((b as u32) >> (a & 31)) as i32 as u64),
        Opcode::Srav => Outcome::write(dest, ((b as u32) as i32 >> (a & 31)) as u64),
        Opcode::Dsllv => Outcome::write(dest, b << (a & 63)),
        Opcode::Dsrlv => Outcome::write(dest, b >> (a & 63)),
        Opcode::Dsrav => Outcome::write(dest, ((b as i64) >> (a & 63)) as u64),

        // Word add/subtract, sign-extended into 64 bits. The trapping
        // forms leave the destination unwritten on overflow.
        Opcode::Add => match (a as i32).checked_add(b as i32) {
            Some(v) => Outcome::write(dest, v as u64),
            None => Outcome::fault(Fault::IntegerOverflow),
        },
        Opcode::Addu => Outcome::write(dest, (a as u32).wrapping_add(b as u32) as i32 as u64),
        Opcode::Sub => match (a as i32).checked_sub(b as i32) {
            Some(v) => Outcome::write(dest, v as u64),
            None => Outcome::fault(Fault::IntegerOverflow),
        },
        Opcode::Subu => Outcome::write(dest, (a as u32).wrapping_sub(b as u32) as i32 as u64),
        Opcode::Dadd => match (a as i64).checked_add(b as i64) {
            Some(v) => Outcome::write(dest, v as u64),
            None => Outcome::fault(Fault::IntegerOverflow),
        },
        Opcode::Daddu => Outcome::write(dest, a.wrapping_add(b)),
        Opcode::Dsub => match (a as i64).checked_sub(b as i64) {
            Some(v) => Outcome::write(dest, v as u64),
            None => Outcome::fault(Fault::IntegerOverflow),
        },
        Opcode::Dsubu => Outcome::write(dest, a.wrapping_sub(b)),

        Opcode::And => Outcome::write(dest, a & b),
        Opcode::Or => Outcome::write(dest, a | b),
        Opcode::Xor => Outcome::write(dest, a ^ b),
        Opcode::Nor => Outcome::write(dest, !(a | b)),
        Opcode::Slt => Outcome::write(dest, u64::from((a as i64) < (b as i64))),
        Opcode::Sltu => Outcome::write(dest, u64::from(a < b)),

        // Immediate forms write rt.
        Opcode::Addi => match (a as i32).checked_add(imm as i32) {
            Some(v) => Outcome::write(rt(w), v as u64),
            None => Outcome::fault(Fault::IntegerOverflow),
        },
        Opcode::Addiu => Outcome::write(rt(w), (a as u32).wrapping_add(imm as u32) as i32 as u64),
        Opcode::Daddi => match (a as i64).checked_add(imm as i64) {
            Some(v) => Outcome::write(rt(w), v as u64),
            None => Outcome::fault(Fault::IntegerOverflow),
        },
        Opcode::Daddiu => Outcome::write(rt(w), a.wrapping_add(imm)),
        Opcode::Slti => Outcome::write(rt(w), u64::from((a as i64) < (imm as i64))),
        Opcode::Sltiu => Outcome::write(rt(w), u64::from(a < imm)),
        Opcode::Andi => Outcome::write(rt(w), a & (w as u16 as u64)),
        Opcode::Ori => Outcome::write(rt(w), a | (w as u16 as u64)),
        Opcode::Xori => Outcome::write(rt(w), a ^ (w as u16 as u64)),
        Opcode::Lui => Outcome::write(rt(w), ((w as u16 as u32) << 16) as i32 as u64),

        // Multiply/divide write HI/LO here in EX rather than through the
        // writeback latch; MFHI/MFLO reads the committed values. Routing
        // them through the latch would change timing relative to the
        // silicon.
        Opcode::Mult => {
            let prod = i64::from(a as i32).wrapping_mul(i64::from(b as i32));
            cpu.regs.set_hi((prod >> 32) as i32 as u64);
            cpu.regs.set_lo(prod as i32 as u64);
            Outcome::none()
        }
        Opcode::Multu => {
            let prod = u64::from(a as u32).wrapping_mul(u64::from(b as u32));
            cpu.regs.set_hi((prod >> 32) as i32 as u64);
            cpu.regs.set_lo(prod as i32 as u64);
            Outcome::none()
        }
        Opcode::Dmult => {
            // 64x64 needs the full 128-bit intermediate product.
            let prod = i128::from(a as i64).wrapping_mul(i128::from(b as i64)) as u128;
            cpu.regs.set_hi((prod >> 64) as u64);
            cpu.regs.set_lo(prod as u64);
            Outcome::none()
        }
        Opcode::Dmultu => {
            let prod = u128::from(a).wrapping_mul(u128::from(b));
            cpu.regs.set_hi((prod >> 64) as u64);
            cpu.regs.set_lo(prod as u64);
            Outcome::none()
        }
        Opcode::Div => {
            // Division by zero is architecturally undefined; this matches
            // the silicon's observed HI/LO results.
            if b as i32 == 0 {
                cpu.regs.set_lo(if (a as i32) < 0 { u64::MAX } else { 1 });
                cpu.regs.set_hi(a as i32 as u64);
            } else {
                cpu.regs.set_lo((a as i32).wrapping_div(b as i32) as u64);
                cpu.regs.set_hi((a as i32).wrapping_rem(b as i32) as u64);
            }
            Outcome::none()
        }
        Opcode::Divu => {
            if b as u32 == 0 {
                cpu.regs.set_lo(u64::MAX);
                cpu.regs.set_hi(a as i32 as u64);
            } else {
                cpu.regs.set_lo(((a as u32) / (b as u32)) as u64);
                cpu.regs.set_hi(((a as u32) % (b as u32)) as u64);
            }
            Outcome::none()
        }
        Opcode::Ddiv => {
            if b == 0 {
                cpu.regs.set_lo(if (a as i64) < 0 { u64::MAX } else { 1 });
                cpu.regs.set_hi(a);
            } else {
                cpu.regs.set_lo((a as i64).wrapping_div(b as i64) as u64);
                cpu.regs.set_hi((a as i64).wrapping_rem(b as i64) as u64);
            }
            Outcome::none()
        }
        Opcode::Ddivu => {
            if b == 0 {
                cpu.regs.set_lo(u64::MAX);
                cpu.regs.set_hi(a);
            } else {
                cpu.regs.set_lo(a / b);
                cpu.regs.set_hi(a % b);
            }
            Outcome::none()
        }

        Opcode::Mfhi => Outcome::write(dest, cpu.regs.hi()),
        Opcode::Mflo => Outcome::write(dest, cpu.regs.lo()),
        Opcode::Mthi => {
            // Immediate HI write, same bypass as the multiply family.
            cpu.regs.set_hi(a);
            Outcome::none()
        }
        Opcode::Mtlo => {
            cpu.regs.set_lo(a);
            Outcome::none()
        }

        Opcode::Sync => Outcome::none(),

        _ => Outcome::none(),
    }
}
