//! Instruction-cache stage.
//!
//! Resolves the fetch PC's segment (re-resolving only when the PC leaves
//! the cached segment), translates mapped addresses through the TLB, and
//! fetches the instruction word — through the instruction cache for cached
//! segments, or directly over the bus (with the uncached-fetch interlock)
//! otherwise.
//!
//! Condition order here is authoritative: address error before translation
//! fault before interlock before normal advance.

use crate::common::data::AccessType;
use crate::common::error::Fault;
use crate::common::{PhysAddr, VirtAddr};
use crate::core::cpu::{Cpu, address_error};
use crate::core::pipeline::latches::{IcRfLatch, LatchHeader};
use crate::core::pipeline::stages::StageFlow;
use crate::core::units::mmu::{self, TlbError};
use crate::soc::bus::BusReply;

/// Downstream stages bypassed when an IC-detected interlock resumes: all
/// four — they ran in the detection cycle, and the fetch produced no word
/// for them, so IC resumes alone and the word reaches RF the cycle after.
const FETCH_SKIP: u8 = 4;

/// Runs the IC stage for one cycle.
pub fn fetch_stage(cpu: &mut Cpu) -> StageFlow {
    let pc = cpu.fetch_pc;

    // Segment validity caching: the resolver runs only when the PC has
    // left the active segment (the sentinel contains nothing, forcing the
    // first resolution).
    if !cpu.active_segment.contains(pc) {
        match mmu::resolve(pc, cpu.mode) {
            Some(seg) => cpu.active_segment = seg,
            None => return fetch_fault(cpu, pc, address_error(pc, AccessType::Fetch)),
        }
    }

    if pc & 3 != 0 {
        return fetch_fault(cpu, pc, address_error(pc, AccessType::Fetch));
    }

    let seg = cpu.active_segment;
    let (paddr, cached) = if seg.mapped {
        match cpu.tlb.lookup(pc, cpu.cp0.asid()) {
            Ok(m) => {
                cpu.stats.tlb_hits += 1;
                (m.paddr, seg.cached && m.cached)
            }
            Err(e) => {
                cpu.stats.tlb_misses += 1;
                let fault = match e {
                    TlbError::Refill => Fault::TlbRefillLoad(pc),
                    TlbError::Invalid => Fault::TlbInvalidLoad(pc),
                };
                return fetch_fault(cpu, pc, fault);
            }
        }
    } else {
        (seg.direct_physical(pc), seg.cached)
    };

    if cached {
        fetch_cached(cpu, pc, paddr)
    } else {
        fetch_uncached(cpu, pc, paddr)
    }
}

/// Fetch through the instruction cache, filling on a miss.
fn fetch_cached(cpu: &mut Cpu, pc: u64, paddr: u64) -> StageFlow {
    let vaddr = VirtAddr::new(pc);
    let phys = PhysAddr::new(paddr);

    let word = if let Some(line) = cpu.icache.probe(vaddr, phys) {
        cpu.stats.icache_hits += 1;
        line.word(vaddr)
    } else {
        cpu.stats.icache_misses += 1;
        match cpu.bus.read_line(paddr & !0x1F) {
            BusReply::Data(data) => {
                cpu.icache.fill(vaddr, phys, data);
                data[((pc >> 2) & 0x7) as usize]
            }
            BusReply::Wait(cycles) => {
                cpu.stats.interlocks_bus += 1;
                cpu.raise_interlock(cycles, FETCH_SKIP);
                return StageFlow::Abort;
            }
        }
    };

    cpu.ic_rf = IcRfLatch {
        header: LatchHeader::live(pc),
        word,
    };
    cpu.fetch_pc = pc.wrapping_add(4);
    StageFlow::Continue
}

/// Uncached fetch: the interlock latency is paid up front, then the word
/// is read on the resumption cycle.
///
/// First presentation enters the interlock with nothing latched (no
/// register or latch mutates during the stall); the retry finds its PC in
/// `pending_uncached` and completes over the bus, so the word reaches RF
/// one cycle after resumption.
fn fetch_uncached(cpu: &mut Cpu, pc: u64, paddr: u64) -> StageFlow {
    if cpu.control.pending_uncached != Some(pc) {
        cpu.stats.interlocks_uncached += 1;
        cpu.control.pending_uncached = Some(pc);
        cpu.raise_interlock(cpu.timing.uncached_fetch_latency, FETCH_SKIP);
        return StageFlow::Abort;
    }
    match cpu.bus.read(paddr & !3, 4) {
        BusReply::Data(raw) => {
            cpu.control.pending_uncached = None;
            cpu.ic_rf = IcRfLatch {
                header: LatchHeader::live(pc),
                word: raw as u32,
            };
            cpu.fetch_pc = pc.wrapping_add(4);
            StageFlow::Continue
        }
        BusReply::Wait(cycles) => {
            cpu.stats.interlocks_bus += 1;
            cpu.raise_interlock(cycles, FETCH_SKIP);
            StageFlow::Abort
        }
    }
}

/// Marks the IC output latch with a new fault and enters the manager.
fn fetch_fault(cpu: &mut Cpu, pc: u64, fault: Fault) -> StageFlow {
    cpu.ic_rf = IcRfLatch {
        header: LatchHeader::faulted(pc, fault),
        word: 0,
    };
    cpu.raise_fault(fault, pc);
    StageFlow::Abort
}
