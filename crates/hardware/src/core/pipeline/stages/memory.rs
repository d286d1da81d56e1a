//! Data-cache stage.
//!
//! Consumes the EX→DC latch's bus request. Reads finish here: the raw bus
//! data goes through the request's shift pair (arithmetic when signed) or
//! is merged into the old register value for the unaligned halves. A
//! [`BusReply::Wait`] leaves the latch in place and enters an interlock;
//! the retry re-presents the same transaction.

use crate::core::cpu::Cpu;
use crate::core::pipeline::latches::{DcWbLatch, PendingWrite};
use crate::core::pipeline::stages::StageFlow;
use crate::soc::bus::{BusReply, BusRequest, RequestKind};

/// Downstream stages already run when a DC interlock is detected (WB).
const DC_INTERLOCK_SKIP: u8 = 1;

/// Runs the DC stage for one cycle.
pub fn memory_stage(cpu: &mut Cpu) -> StageFlow {
    if cpu.ex_dc.header.fault.is_some() || !cpu.ex_dc.header.valid {
        let latch = std::mem::take(&mut cpu.ex_dc);
        cpu.dc_wb = DcWbLatch {
            header: latch.header,
            write: PendingWrite::default(),
        };
        return StageFlow::Continue;
    }

    let Some(request) = cpu.ex_dc.request else {
        let latch = std::mem::take(&mut cpu.ex_dc);
        cpu.dc_wb = DcWbLatch {
            header: latch.header,
            write: latch.write,
        };
        return StageFlow::Continue;
    };

    match request.kind {
        RequestKind::Read { signed, merge } => match cpu.bus.read(request.paddr, request.size) {
            BusReply::Data(raw) => {
                let latch = std::mem::take(&mut cpu.ex_dc);
                let value = finish_load(&request, raw, signed, merge);
                cpu.dc_wb = DcWbLatch {
                    header: latch.header,
                    write: PendingWrite {
                        reg: latch.write.reg,
                        value,
                    },
                };
                StageFlow::Continue
            }
            BusReply::Wait(cycles) => {
                cpu.stats.interlocks_bus += 1;
                cpu.raise_interlock(cycles, DC_INTERLOCK_SKIP);
                StageFlow::Abort
            }
        },
        RequestKind::Write => {
            match cpu
                .bus
                .write(request.paddr, request.size, request.data, request.mask)
            {
                BusReply::Data(()) => {
                    let latch = std::mem::take(&mut cpu.ex_dc);
                    cpu.dc_wb = DcWbLatch {
                        header: latch.header,
                        write: PendingWrite::default(),
                    };
                    StageFlow::Continue
                }
                BusReply::Wait(cycles) => {
                    cpu.stats.interlocks_bus += 1;
                    cpu.raise_interlock(cycles, DC_INTERLOCK_SKIP);
                    StageFlow::Abort
                }
            }
        }
    }
}

/// Applies the request's completion recipe to the raw bus data.
fn finish_load(request: &BusRequest, raw: u64, signed: bool, merge: bool) -> u64 {
    let shifted = raw.wrapping_shl(request.shift_up);
    if merge {
        let lanes = shifted.wrapping_shr(request.shift_down);
        let merged = (lanes & request.mask) | (request.data & !request.mask);
        if request.size == 4 {
            merged as i32 as u64
        } else {
            merged
        }
    } else if signed {
        ((shifted as i64) >> request.shift_down) as u64
    } else {
        shifted.wrapping_shr(request.shift_down)
    }
}
