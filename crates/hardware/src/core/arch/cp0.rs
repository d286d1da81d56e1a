//! System-control coprocessor (CP0) register bank.
//!
//! This module implements the 32-slot CP0 bank. It provides:
//! 1. **Storage:** Indexed access for the privileged move instructions
//!    (MFC0/MTC0 and doubleword variants).
//! 2. **Typed Accessors:** Named reads/writes for the registers the
//!    pipeline and MMU consult every cycle.
//! 3. **Reset:** The documented cold-reset bit patterns.

use crate::common::constants::TLB_ENTRIES;

/// Register indices of the CP0 bank.
///
/// These are the `rd` field values of the MTC0/MFC0 encodings. Slots not
/// listed here are reserved; they read and write as plain storage.
pub mod index {
    /// TLB index for TLBWI/TLBR.
    pub const INDEX: usize = 0;
    /// Replacement slot for TLBWR; counts down toward Wired.
    pub const RANDOM: usize = 1;
    /// Even-page TLB entry half.
    pub const ENTRY_LO0: usize = 2;
    /// Odd-page TLB entry half.
    pub const ENTRY_LO1: usize = 3;
    /// Refill-handler context (PTE base | BadVPN2).
    pub const CONTEXT: usize = 4;
    /// TLB page-size mask.
    pub const PAGE_MASK: usize = 5;
    /// Lower bound of the random-replacement range.
    pub const WIRED: usize = 6;
    /// Faulting virtual address.
    pub const BAD_VADDR: usize = 8;
    /// Free-running counter.
    pub const COUNT: usize = 9;
    /// TLB virtual page number and ASID.
    pub const ENTRY_HI: usize = 10;
    /// Timer compare value.
    pub const COMPARE: usize = 11;
    /// Processor status (mode, EXL/ERL, BEV, addressing widths).
    pub const STATUS: usize = 12;
    /// Exception cause.
    pub const CAUSE: usize = 13;
    /// Exception program counter.
    pub const EPC: usize = 14;
    /// Processor revision identifier.
    pub const PRID: usize = 15;
    /// Configuration register.
    pub const CONFIG: usize = 16;
    /// Cache tag staging register for the CACHE instruction.
    pub const TAG_LO: usize = 28;
    /// Error exception program counter (reset/NMI path).
    pub const ERROR_EPC: usize = 30;
}

/// Bit fields of the Status register.
pub mod status {
    /// Global interrupt enable.
    pub const IE: u64 = 1 << 0;
    /// Exception level; set on fault entry, cleared by ERET.
    pub const EXL: u64 = 1 << 1;
    /// Error level; set on cold reset, cleared by ERET.
    pub const ERL: u64 = 1 << 2;
    /// Shift of the two-bit privilege field.
    pub const KSU_SHIFT: u64 = 3;
    /// Mask of the privilege field (after shifting).
    pub const KSU_MASK: u64 = 0b11;
    /// KSU encoding for kernel mode.
    pub const KSU_KERNEL: u64 = 0b00;
    /// KSU encoding for supervisor mode.
    pub const KSU_SUPERVISOR: u64 = 0b01;
    /// KSU encoding for user mode.
    pub const KSU_USER: u64 = 0b10;
    /// 64-bit addressing in user mode.
    pub const UX: u64 = 1 << 5;
    /// 64-bit addressing in supervisor mode.
    pub const SX: u64 = 1 << 6;
    /// 64-bit addressing in kernel mode.
    pub const KX: u64 = 1 << 7;
    /// Bootstrap exception vectors.
    pub const BEV: u64 = 1 << 22;
}

/// Cold-reset value of the Status register: ERL set, bootstrap vectors.
pub const STATUS_RESET: u64 = status::BEV | status::ERL;

/// Cold-reset value of the Config register.
pub const CONFIG_RESET: u64 = 0x7006_E463;

/// Cold-reset value of the PRId register.
pub const PRID_RESET: u64 = 0x0000_0B22;

/// Cold-reset value of the Random register (top of the TLB).
pub const RANDOM_RESET: u64 = (TLB_ENTRIES - 1) as u64;

/// Sentinel written to Index by a failed TLB probe.
pub const PROBE_MISS: u64 = 0x8000_0000;

/// The CP0 register bank.
///
/// Thirty-two indexed slots. The bank itself is passive storage; the side
/// effects documented for individual registers (a Status write changing
/// segment resolution, an EntryHi write changing the active ASID) fall out
/// of the consumers re-reading the bank each cycle.
#[derive(Clone, Debug)]
pub struct Cp0 {
    regs: [u64; 32],
}

impl Cp0 {
    /// Creates a zeroed CP0 bank. Reset values are programmed by the cold
    /// reset handler, not construction.
    pub const fn new() -> Self {
        Self { regs: [0; 32] }
    }

    /// Programs the documented cold-reset register values.
    pub const fn cold_reset(&mut self) {
        self.regs[index::RANDOM] = RANDOM_RESET;
        self.regs[index::WIRED] = 0;
        self.regs[index::STATUS] = STATUS_RESET;
        self.regs[index::CONFIG] = CONFIG_RESET;
        self.regs[index::PRID] = PRID_RESET;
    }

    /// Reads an indexed CP0 register.
    #[inline(always)]
    pub const fn read(&self, idx: usize) -> u64 {
        self.regs[idx & 0x1F]
    }

    /// Writes an indexed CP0 register.
    #[inline(always)]
    pub const fn write(&mut self, idx: usize, val: u64) {
        self.regs[idx & 0x1F] = val;
    }

    /// Reads the Status register.
    pub const fn status(&self) -> u64 {
        self.regs[index::STATUS]
    }

    /// Writes the Status register.
    pub const fn set_status(&mut self, val: u64) {
        self.regs[index::STATUS] = val;
    }

    /// Reads the current address-space identifier from EntryHi.
    pub const fn asid(&self) -> u8 {
        (self.regs[index::ENTRY_HI] & 0xFF) as u8
    }

    /// Reads the Random register as a TLB slot index.
    pub const fn random(&self) -> usize {
        (self.regs[index::RANDOM] as usize) % TLB_ENTRIES
    }

    /// Steps the Random register after a TLBWR: counts down, wrapping back
    /// to the top of the table when it reaches the Wired floor.
    pub const fn step_random(&mut self) {
        let wired = self.regs[index::WIRED];
        let random = self.regs[index::RANDOM];
        self.regs[index::RANDOM] = if random <= wired { RANDOM_RESET } else { random - 1 };
    }

    /// Records the context of a TLB fault so the guest refill handler can
    /// service it: BadVAddr, the VPN2/ASID in EntryHi, and the BadVPN2
    /// field of Context.
    pub const fn latch_tlb_context(&mut self, vaddr: u64) {
        self.regs[index::BAD_VADDR] = vaddr;
        let asid = self.regs[index::ENTRY_HI] & 0xFF;
        self.regs[index::ENTRY_HI] = (vaddr & !0x1FFF) | asid;
        let pte_base = self.regs[index::CONTEXT] & !0x7F_FFFF;
        self.regs[index::CONTEXT] = pte_base | (((vaddr >> 13) & 0x7_FFFF) << 4);
    }
}

impl Default for Cp0 {
    fn default() -> Self {
        Self::new()
    }
}
