//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, the container for the
//! entire processor state. It coordinates the following:
//! 1. **State Management:** Registers, CP0 bank, fetch PC, and operating
//!    mode.
//! 2. **Pipeline State:** The four inter-stage latches and the control
//!    block that schedules fast/slow cycles.
//! 3. **Memory Hierarchy:** Segment resolution cache, TLB, and instruction
//!    cache.
//! 4. **System Integration:** The bus controller trait object and optional
//!    debug hooks.
//!
//! No state lives outside this structure: every dependency enters through
//! `new` and every mutation happens inside `cycle`.

/// The per-cycle state machine (fast/slow paths, cold reset).
pub mod cycle;

use std::collections::HashSet;

use crate::common::data::AccessType;
use crate::common::error::Fault;
use crate::common::reg::RegisterFile;
use crate::config::{Config, TimingConfig};
use crate::core::arch::cp0::Cp0;
use crate::core::arch::mode::OperatingMode;
use crate::core::pipeline::control::PipelineControl;
use crate::core::pipeline::latches::{DcWbLatch, ExDcLatch, IcRfLatch, RfExLatch};
use crate::core::units::icache::ICache;
use crate::core::units::mmu;
use crate::core::units::mmu::segment::{DEFAULT_SEGMENT, Segment};
use crate::core::units::mmu::tlb::{Tlb, TlbError};
use crate::soc::bus::BusController;
use crate::stats::SimStats;

/// Callback invoked when the fetch PC hits a breakpoint.
pub type BreakpointHook = Box<dyn FnMut(u64)>;

/// A translated data address: where it lands and whether it caches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Translation {
    /// Physical address.
    pub paddr: u64,
    /// Access goes through the cache hierarchy.
    pub cached: bool,
}

/// Main CPU structure containing all processor state and components.
pub struct Cpu {
    /// General-purpose registers with HI/LO.
    pub regs: RegisterFile,
    /// System-control coprocessor bank.
    pub cp0: Cp0,
    /// Address the IC stage fetches from next.
    pub fetch_pc: u64,
    /// Operating mode, derived from Status at the top of each cycle.
    pub mode: OperatingMode,
    /// Segment the fetch PC resolved to last; re-resolved only when the PC
    /// leaves it.
    pub active_segment: &'static Segment,
    /// Joint TLB.
    pub tlb: Tlb,
    /// Instruction cache.
    pub icache: ICache,

    /// IC→RF latch.
    pub ic_rf: IcRfLatch,
    /// RF→EX latch.
    pub rf_ex: RfExLatch,
    /// EX→DC latch.
    pub ex_dc: ExDcLatch,
    /// DC→WB latch.
    pub dc_wb: DcWbLatch,
    /// Pipeline control state.
    pub control: PipelineControl,

    /// System bus.
    pub bus: Box<dyn BusController>,
    /// Cold-reset request; consumed by the next cycle.
    pub reset_signal: bool,
    /// Performance statistics.
    pub stats: SimStats,
    /// Per-cycle retirement tracing.
    pub trace: bool,

    /// Breakpoint PCs checked once per cycle against the fetch PC.
    pub breakpoints: HashSet<u64>,
    /// Callback invoked on a breakpoint hit.
    pub breakpoint_hook: Option<BreakpointHook>,

    pub(crate) timing: TimingConfig,
    pub(crate) tolerated_opcodes: Vec<u32>,
}

impl Cpu {
    /// Creates a new CPU attached to a bus controller.
    ///
    /// The machine comes up with the reset signal asserted: the first
    /// `cycle` call performs the cold reset and programs the documented
    /// register values.
    pub fn new(bus: Box<dyn BusController>, config: &Config) -> Self {
        Self {
            regs: RegisterFile::new(),
            cp0: Cp0::new(),
            fetch_pc: 0,
            mode: OperatingMode::Kernel32,
            active_segment: &DEFAULT_SEGMENT,
            tlb: Tlb::new(),
            icache: ICache::new(),
            ic_rf: IcRfLatch::default(),
            rf_ex: RfExLatch::default(),
            ex_dc: ExDcLatch::default(),
            dc_wb: DcWbLatch::default(),
            control: PipelineControl::default(),
            bus,
            reset_signal: true,
            stats: SimStats::default(),
            trace: config.general.trace_instructions,
            breakpoints: HashSet::new(),
            breakpoint_hook: None,
            timing: config.timing.clone(),
            tolerated_opcodes: config.isa.tolerated_opcodes.clone(),
        }
    }

    /// Translates a data address through segment resolution and, for
    /// mapped segments, the TLB.
    ///
    /// # Errors
    ///
    /// The appropriate guest fault for the access type: address error when
    /// no segment matches, TLB refill/invalid on translation misses, and
    /// TLB modified for stores to clean pages.
    pub fn translate_data(&mut self, vaddr: u64, access: AccessType) -> Result<Translation, Fault> {
        let Some(seg) = mmu::resolve(vaddr, self.mode) else {
            return Err(address_error(vaddr, access));
        };
        if !seg.mapped {
            return Ok(Translation {
                paddr: seg.direct_physical(vaddr),
                cached: seg.cached,
            });
        }
        match self.tlb.lookup(vaddr, self.cp0.asid()) {
            Ok(m) => {
                self.stats.tlb_hits += 1;
                if access.is_store() && !m.dirty {
                    return Err(Fault::TlbModified(vaddr));
                }
                Ok(Translation {
                    paddr: m.paddr,
                    cached: seg.cached && m.cached,
                })
            }
            Err(e) => {
                self.stats.tlb_misses += 1;
                Err(match (e, access) {
                    (TlbError::Refill, AccessType::Write) => Fault::TlbRefillStore(vaddr),
                    (TlbError::Refill, _) => Fault::TlbRefillLoad(vaddr),
                    (TlbError::Invalid, AccessType::Write) => Fault::TlbInvalidStore(vaddr),
                    (TlbError::Invalid, _) => Fault::TlbInvalidLoad(vaddr),
                })
            }
        }
    }

    /// Freshens a register value from results still in flight.
    ///
    /// Checks the EX→DC latch first (the youngest completed value, ALU
    /// results only — a load's value does not exist yet), then the DC→WB
    /// latch. Register zero is never forwarded.
    pub(crate) fn forward(&self, reg: usize, fallback: u64) -> u64 {
        if reg == 0 {
            return 0;
        }
        if self.ex_dc.header.valid && self.ex_dc.request.is_none() && self.ex_dc.write.reg == reg {
            return self.ex_dc.write.value;
        }
        if self.dc_wb.header.valid && self.dc_wb.write.reg == reg {
            return self.dc_wb.write.value;
        }
        fallback
    }
}

/// Maps an unmatchable or misaligned address to its fault.
pub(crate) const fn address_error(vaddr: u64, access: AccessType) -> Fault {
    match access {
        AccessType::Write => Fault::AddressErrorStore(vaddr),
        AccessType::Fetch | AccessType::Read => Fault::AddressErrorLoad(vaddr),
    }
}
