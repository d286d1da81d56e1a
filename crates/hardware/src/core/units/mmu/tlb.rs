//! Joint translation lookaside buffer.
//!
//! A 32-entry software-managed associative table. Each entry maps a pair of
//! virtual pages (even and odd) with a variable page size from 4 KiB to
//! 16 MiB, an address-space identifier, and per-page valid/dirty/cacheable
//! attributes.
//!
//! Entry format (the architectural register layout):
//!
//! - `page_mask[24:13]` — mask bits selecting the page size.
//! - `entry_hi[63:13]`  — VPN2 (virtual page number of the pair).
//! - `entry_hi[7:0]`    — ASID.
//! - `entry_lo0/1`      — even/odd page halves:
//!   - `[29:6]` PFN (physical frame number in 4 KiB units)
//!   - `[5:3]`  C (cache algorithm; 2 = uncached)
//!   - `[2]`    D (dirty: writable)
//!   - `[1]`    V (valid)
//!   - `[0]`    G (global — ASID ignored when set in BOTH halves)
//!
//! No operation here raises a fault: lookups return a typed error and the
//! pipeline converts it into the refill/invalid fault ids.

use crate::common::constants::TLB_ENTRIES;

/// Valid bit of an EntryLo half.
const LO_VALID: u64 = 1 << 1;
/// Dirty (writable) bit of an EntryLo half.
const LO_DIRTY: u64 = 1 << 2;
/// Global bit of an EntryLo half.
const LO_GLOBAL: u64 = 1 << 0;
/// Cache-algorithm field of an EntryLo half.
const LO_CACHE_SHIFT: u64 = 3;
const LO_CACHE_MASK: u64 = 0b111;
/// Uncached cache-algorithm encoding.
const CACHE_UNCACHED: u64 = 2;
/// Offset bits always covered by the minimum page size.
const MIN_PAGE_MASK: u64 = 0x1FFF;

/// One TLB entry in architectural register format.
///
/// `seq` orders entries by write time: when software installs overlapping
/// coverage (undefined on hardware), the most recently written entry wins
/// deterministically.
#[derive(Clone, Copy, Debug, Default)]
pub struct TlbEntry {
    /// Page-size mask (PageMask register format).
    pub page_mask: u64,
    /// VPN2 and ASID (EntryHi register format).
    pub entry_hi: u64,
    /// Even-page half (EntryLo0 register format).
    pub entry_lo0: u64,
    /// Odd-page half (EntryLo1 register format).
    pub entry_lo1: u64,
    /// Monotonic write sequence; newest match takes precedence.
    seq: u64,
}

impl TlbEntry {
    /// Builds an entry from the four staging registers.
    pub const fn new(page_mask: u64, entry_hi: u64, entry_lo0: u64, entry_lo1: u64) -> Self {
        Self {
            page_mask,
            entry_hi,
            entry_lo0,
            entry_lo1,
            seq: 0,
        }
    }

    /// Full offset mask of the page pair (page mask plus the 4 KiB floor).
    const fn pair_mask(&self) -> u64 {
        self.page_mask | MIN_PAGE_MASK
    }

    /// Global flag: set only when both halves carry G.
    const fn global(&self) -> bool {
        self.entry_lo0 & self.entry_lo1 & LO_GLOBAL != 0
    }

    /// Returns `true` when the entry covers `vaddr` under `asid`.
    fn matches(&self, vaddr: u64, asid: u8) -> bool {
        let mask = self.pair_mask();
        if (vaddr & !mask) != (self.entry_hi & !mask) {
            return false;
        }
        self.global() || (self.entry_hi & 0xFF) as u8 == asid
    }
}

/// A successful translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TlbMatch {
    /// Translated physical address.
    pub paddr: u64,
    /// The matching page is cacheable.
    pub cached: bool,
    /// The matching page is writable.
    pub dirty: bool,
}

/// A failed translation, before conversion to a fault id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TlbError {
    /// No entry covered the address: the refill vector services this.
    Refill,
    /// An entry covered the address but its valid bit is clear.
    Invalid,
}

/// The joint TLB.
pub struct Tlb {
    entries: [TlbEntry; TLB_ENTRIES],
    write_seq: u64,
}

impl Tlb {
    /// Creates a TLB with every entry zeroed (invalid: V bits clear).
    pub const fn new() -> Self {
        Self {
            entries: [TlbEntry {
                page_mask: 0,
                entry_hi: 0,
                entry_lo0: 0,
                entry_lo1: 0,
                seq: 0,
            }; TLB_ENTRIES],
            write_seq: 0,
        }
    }

    /// Translates a virtual address under an address-space identifier.
    ///
    /// # Errors
    ///
    /// [`TlbError::Refill`] when no entry covers the address,
    /// [`TlbError::Invalid`] when the covering page's valid bit is clear.
    pub fn lookup(&self, vaddr: u64, asid: u8) -> Result<TlbMatch, TlbError> {
        let entry = self
            .entries
            .iter()
            .filter(|e| e.matches(vaddr, asid))
            .max_by_key(|e| e.seq)
            .ok_or(TlbError::Refill)?;

        let mask = entry.pair_mask();
        // The pair spans two pages; the bit just above the per-page offset
        // selects the odd half.
        let odd = vaddr & ((mask + 1) >> 1) != 0;
        let lo = if odd { entry.entry_lo1 } else { entry.entry_lo0 };

        if lo & LO_VALID == 0 {
            return Err(TlbError::Invalid);
        }

        let pfn = (lo >> 6) & 0x00FF_FFFF;
        let page_offset = vaddr & (mask >> 1);
        let cache_algorithm = (lo >> LO_CACHE_SHIFT) & LO_CACHE_MASK;

        Ok(TlbMatch {
            paddr: (pfn << 12) | page_offset,
            cached: cache_algorithm != CACHE_UNCACHED,
            dirty: lo & LO_DIRTY != 0,
        })
    }

    /// Reads the entry at `index` (TLBR).
    pub const fn read(&self, index: usize) -> &TlbEntry {
        &self.entries[index % TLB_ENTRIES]
    }

    /// Installs an entry at a specific slot (TLBWI).
    pub fn write(&mut self, index: usize, mut entry: TlbEntry) {
        self.write_seq += 1;
        entry.seq = self.write_seq;
        tracing::trace!(index, entry_hi = %format_args!("{:#x}", entry.entry_hi), "tlb indexed write");
        self.entries[index % TLB_ENTRIES] = entry;
    }

    /// Installs an entry at the slot selected by Random (TLBWR).
    ///
    /// The caller steps the Random register afterwards; this keeps the TLB
    /// free of CP0 knowledge.
    pub fn write_random(&mut self, entry: TlbEntry, random: usize) {
        self.write(random, entry);
    }

    /// Presence test without translation (TLBP).
    ///
    /// Returns the index of the covering entry, newest first, or `None`.
    /// Validity is not consulted: probe reports coverage, not usability.
    pub fn probe(&self, vaddr: u64, asid: u8) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.matches(vaddr, asid))
            .max_by_key(|(_, e)| e.seq)
            .map(|(i, _)| i)
    }
}

impl Default for Tlb {
    fn default() -> Self {
        Self::new()
    }
}
