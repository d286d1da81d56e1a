//! Load, store, and cache-maintenance execution.
//!
//! The execute stage computes the effective address, checks alignment,
//! translates, and packages the physical transaction as a [`BusRequest`]
//! for the data-cache stage. Byte lanes are big-endian throughout.
//!
//! Aligned loads are container reads finished by two shifts computed here:
//! `(raw << shift_up) >> shift_down`, arithmetic for the sign-extending
//! forms. The unaligned left/right halves are container reads merged into
//! the old rt value under a byte mask. Sub-word stores pre-shift the data
//! onto its lane and carry a data-qualifying mask; the narrow family's
//! size comes straight from the primary opcode field,
//! `((word >> 26) & 3) + 1`.

use crate::common::data::AccessType;
use crate::common::error::Fault;
use crate::common::{PhysAddr, VirtAddr};
use crate::core::arch::cp0;
use crate::core::cpu::{Cpu, Translation};
use crate::core::pipeline::latches::RfExLatch;
use crate::isa::decode::{narrow_size, rt, simm16};
use crate::isa::exec::Outcome;
use crate::isa::opcode::Opcode;
use crate::soc::bus::BusRequest;

/// CACHE operation codes (the rt field): instruction-cache ops.
mod cache_op {
    /// Index_Invalidate (I).
    pub const INDEX_INVALIDATE: usize = 0b00000;
    /// Index_Store_Tag (I).
    pub const INDEX_STORE_TAG: usize = 0b01000;
    /// Hit_Invalidate (I).
    pub const HIT_INVALIDATE: usize = 0b10000;
}

/// Executes one load/store-family instruction.
pub fn execute(cpu: &mut Cpu, latch: &RfExLatch, base: u64, rt_value: u64) -> Outcome {
    let w = latch.word;
    let vaddr = base.wrapping_add(simm16(w));
    let dest = rt(w);

    match latch.op.id {
        Opcode::Lb => load(cpu, vaddr, 1, true, dest),
        Opcode::Lbu => load(cpu, vaddr, 1, false, dest),
        Opcode::Lh => load(cpu, vaddr, 2, true, dest),
        Opcode::Lhu => load(cpu, vaddr, 2, false, dest),
        Opcode::Lw => load(cpu, vaddr, 4, true, dest),
        Opcode::Lwu => load(cpu, vaddr, 4, false, dest),
        Opcode::Ld => load(cpu, vaddr, 8, true, dest),

        Opcode::Lwl => {
            let align = vaddr & 3;
            merge_load(
                cpu,
                vaddr,
                4,
                rt_value,
                (0xFFFF_FFFF << (8 * align)) & 0xFFFF_FFFF,
                32 + 8 * align as u32,
                32,
                dest,
            )
        }
        Opcode::Lwr => {
            let down = 8 * (3 - (vaddr & 3)) as u32;
            merge_load(cpu, vaddr, 4, rt_value, 0xFFFF_FFFF >> down, 32, 32 + down, dest)
        }
        Opcode::Ldl => {
            let up = 8 * (vaddr & 7) as u32;
            merge_load(cpu, vaddr, 8, rt_value, shl_mask(up), up, 0, dest)
        }
        Opcode::Ldr => {
            let down = 8 * (7 - (vaddr & 7)) as u32;
            merge_load(cpu, vaddr, 8, rt_value, shr_mask(down), 0, down, dest)
        }

        Opcode::Sb | Opcode::Sh | Opcode::Sw => {
            let size = narrow_size(w);
            if vaddr & u64::from(size - 1) != 0 {
                return Outcome::fault(Fault::AddressErrorStore(vaddr));
            }
            // Big-endian byte lane within the containing word.
            let lane = 8 * (4 - u64::from(size) - (vaddr & 3)) as u32;
            let bytes = shr_mask(64 - 8 * u32::from(size));
            store(cpu, vaddr, !3, 4, (rt_value & bytes) << lane, bytes << lane)
        }
        Opcode::Sd => {
            if vaddr & 7 != 0 {
                return Outcome::fault(Fault::AddressErrorStore(vaddr));
            }
            store(cpu, vaddr, !7, 8, rt_value, !0)
        }
        Opcode::Swl => {
            let down = 8 * (vaddr & 3) as u32;
            store(
                cpu,
                vaddr,
                !3,
                4,
                (rt_value & 0xFFFF_FFFF) >> down,
                0xFFFF_FFFF >> down,
            )
        }
        Opcode::Swr => {
            let up = 8 * (3 - (vaddr & 3)) as u32;
            store(
                cpu,
                vaddr,
                !3,
                4,
                (rt_value << up) & 0xFFFF_FFFF,
                (0xFFFF_FFFF << up) & 0xFFFF_FFFF,
            )
        }
        Opcode::Sdl => {
            let down = 8 * (vaddr & 7) as u32;
            store(cpu, vaddr, !7, 8, rt_value >> down, shr_mask(down))
        }
        Opcode::Sdr => {
            let up = 8 * (7 - (vaddr & 7)) as u32;
            store(cpu, vaddr, !7, 8, rt_value << up, shl_mask(up))
        }

        Opcode::Cache => cache_maintenance(cpu, vaddr, dest),

        _ => Outcome::none(),
    }
}

/// All-ones shifted left without overflow UB at 64.
const fn shl_mask(shift: u32) -> u64 {
    (!0u64).wrapping_shl(shift)
}

/// All-ones shifted right without overflow UB at 64.
const fn shr_mask(shift: u32) -> u64 {
    (!0u64).wrapping_shr(shift)
}

/// Aligned load: container read plus extension shifts.
fn load(cpu: &mut Cpu, vaddr: u64, size: u8, signed: bool, dest: usize) -> Outcome {
    if vaddr & u64::from(size - 1) != 0 {
        return Outcome::fault(Fault::AddressErrorLoad(vaddr));
    }
    let container: u64 = if size == 8 { 8 } else { 4 };
    let t = match cpu.translate_data(vaddr, AccessType::Read) {
        Ok(t) => t,
        Err(f) => return Outcome::fault(f),
    };
    cpu.stats.inst_load += 1;
    let up = 8 * (vaddr & (container - 1)) as u32 + (64 - 8 * container as u32);
    let down = 64 - 8 * u32::from(size);
    Outcome::request(
        BusRequest::read(t.paddr & !(container - 1), container as u8, signed, up, down),
        dest,
    )
}

/// Unaligned load half: container read merged into the old rt value.
#[allow(clippy::too_many_arguments)]
fn merge_load(
    cpu: &mut Cpu,
    vaddr: u64,
    container: u8,
    rt_value: u64,
    mask: u64,
    up: u32,
    down: u32,
    dest: usize,
) -> Outcome {
    let t = match cpu.translate_data(vaddr, AccessType::Read) {
        Ok(t) => t,
        Err(f) => return Outcome::fault(f),
    };
    cpu.stats.inst_load += 1;
    let align = !(u64::from(container) - 1);
    Outcome::request(
        BusRequest::read_merge(t.paddr & align, container, rt_value, mask, up, down),
        dest,
    )
}

/// Store: translated, container-aligned, lanes pre-shifted.
fn store(cpu: &mut Cpu, vaddr: u64, align: u64, size: u8, data: u64, mask: u64) -> Outcome {
    let Translation { paddr, .. } = match cpu.translate_data(vaddr, AccessType::Write) {
        Ok(t) => t,
        Err(f) => return Outcome::fault(f),
    };
    cpu.stats.inst_store += 1;
    Outcome::request(BusRequest::write(paddr & align, size, data, mask), 0)
}

/// CACHE instruction: instruction-cache maintenance.
///
/// Data-cache operations belong to the excluded data-side hierarchy and
/// are accepted as no-ops.
fn cache_maintenance(cpu: &mut Cpu, vaddr: u64, op: usize) -> Outcome {
    cpu.stats.inst_cop0 += 1;
    match op {
        cache_op::INDEX_INVALIDATE => {
            cpu.icache.invalidate(VirtAddr::new(vaddr));
            Outcome::none()
        }
        cache_op::INDEX_STORE_TAG => {
            let taglo = cpu.cp0.read(cp0::index::TAG_LO);
            cpu.icache.set_tag(VirtAddr::new(vaddr), taglo);
            Outcome::none()
        }
        cache_op::HIT_INVALIDATE => match cpu.translate_data(vaddr, AccessType::Read) {
            Ok(Translation { paddr, .. }) => {
                cpu.icache
                    .invalidate_hit(VirtAddr::new(vaddr), PhysAddr::new(paddr));
                Outcome::none()
            }
            Err(f) => Outcome::fault(f),
        },
        _ => {
            tracing::debug!(op, "cache op outside the instruction cache ignored");
            Outcome::none()
        }
    }
}
