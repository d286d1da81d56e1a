//! CP0 move, TLB maintenance, and ERET execution.
//!
//! CP0 writes land immediately in EX rather than through the writeback
//! latch: a Status write must change segment resolution on the very next
//! cycle, and the TLB instructions commit their staged registers in place.
//! Reads (MFC0/DMFC0) go through the normal latch path like any other
//! register-producing instruction.

use crate::core::arch::cp0::{PROBE_MISS, index, status};
use crate::core::cpu::Cpu;
use crate::core::pipeline::latches::RfExLatch;
use crate::isa::decode::rd;
use crate::isa::exec::Outcome;
use crate::isa::opcode::Opcode;
use crate::core::units::mmu::tlb::TlbEntry;

/// Executes one CP0-family instruction.
pub fn execute(cpu: &mut Cpu, latch: &RfExLatch, rt_value: u64) -> Outcome {
    let w = latch.word;
    let slot = rd(w);

    match latch.op.id {
        Opcode::Mfc0 => Outcome::write(
            crate::isa::decode::rt(w),
            cpu.cp0.read(slot) as i32 as u64,
        ),
        Opcode::Dmfc0 => Outcome::write(crate::isa::decode::rt(w), cpu.cp0.read(slot)),
        Opcode::Mtc0 => {
            cpu.cp0.write(slot, rt_value as i32 as u64);
            Outcome::none()
        }
        Opcode::Dmtc0 => {
            cpu.cp0.write(slot, rt_value);
            Outcome::none()
        }

        Opcode::Tlbr => {
            let entry = *cpu.tlb.read(cpu.cp0.read(index::INDEX) as usize);
            cpu.cp0.write(index::PAGE_MASK, entry.page_mask);
            cpu.cp0.write(index::ENTRY_HI, entry.entry_hi);
            cpu.cp0.write(index::ENTRY_LO0, entry.entry_lo0);
            cpu.cp0.write(index::ENTRY_LO1, entry.entry_lo1);
            Outcome::none()
        }
        Opcode::Tlbwi => {
            let slot = cpu.cp0.read(index::INDEX) as usize;
            cpu.tlb.write(slot, staged_entry(cpu));
            Outcome::none()
        }
        Opcode::Tlbwr => {
            let random = cpu.cp0.random();
            cpu.tlb.write_random(staged_entry(cpu), random);
            cpu.cp0.step_random();
            Outcome::none()
        }
        Opcode::Tlbp => {
            let entry_hi = cpu.cp0.read(index::ENTRY_HI);
            let found = cpu.tlb.probe(entry_hi & !0x1FFF, (entry_hi & 0xFF) as u8);
            cpu.cp0.write(
                index::INDEX,
                found.map_or(PROBE_MISS, |idx| idx as u64),
            );
            Outcome::none()
        }

        Opcode::Eret => {
            // ERET has no delay slot: the already-fetched next instruction
            // is killed through the same mask a branch-likely uses.
            let status_value = cpu.cp0.status();
            let (target, cleared) = if status_value & status::ERL != 0 {
                (cpu.cp0.read(index::ERROR_EPC), status_value & !status::ERL)
            } else {
                (cpu.cp0.read(index::EPC), status_value & !status::EXL)
            };
            cpu.cp0.set_status(cleared);
            tracing::debug!(target = %format_args!("{target:#x}"), "eret");
            Outcome {
                redirect: Some(target),
                kill_mask: 0,
                ..Outcome::none()
            }
        }

        _ => Outcome::none(),
    }
}

/// Assembles a TLB entry from the four staging registers.
fn staged_entry(cpu: &Cpu) -> TlbEntry {
    TlbEntry::new(
        cpu.cp0.read(index::PAGE_MASK),
        cpu.cp0.read(index::ENTRY_HI),
        cpu.cp0.read(index::ENTRY_LO0),
        cpu.cp0.read(index::ENTRY_LO1),
    )
}
