//! TLB unit tests.
//!
//! Verifies the joint TLB:
//! - Indexed write / lookup round trips, even and odd pages
//! - ASID matching and the global bit
//! - Page-size masks
//! - Valid and dirty attribute handling
//! - Random-slot writes and probe
//! - Deterministic precedence for overlapping coverage

use vrsim_core::core::units::mmu::tlb::{Tlb, TlbEntry, TlbError};

// ══════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════

const LO_GLOBAL: u64 = 1 << 0;
const LO_VALID: u64 = 1 << 1;
const LO_DIRTY: u64 = 1 << 2;
/// Cacheable (non-coherent) cache algorithm.
const LO_CACHED: u64 = 0b011 << 3;
/// Uncached cache algorithm.
const LO_UNCACHED: u64 = 0b010 << 3;

fn lo(pfn: u64, flags: u64) -> u64 {
    (pfn << 6) | flags
}

fn entry(vpn2_base: u64, asid: u8, lo0: u64, lo1: u64) -> TlbEntry {
    TlbEntry::new(0, (vpn2_base & !0x1FFF) | u64::from(asid), lo0, lo1)
}

// ══════════════════════════════════════════════════════════
// 1. Round trips
// ══════════════════════════════════════════════════════════

#[test]
fn lookup_miss_on_empty_is_refill() {
    let tlb = Tlb::new();
    assert_eq!(tlb.lookup(0x1000, 0), Err(TlbError::Refill));
}

#[test]
fn indexed_write_then_lookup_even_and_odd_pages() {
    let mut tlb = Tlb::new();
    tlb.write(
        3,
        entry(
            0x0000_4000,
            0x11,
            lo(0x100, LO_VALID | LO_DIRTY | LO_CACHED),
            lo(0x200, LO_VALID | LO_DIRTY | LO_CACHED),
        ),
    );

    // Even page of the pair (4 KiB pages: pair base 0x4000).
    let even = tlb.lookup(0x4018, 0x11).unwrap();
    assert_eq!(even.paddr, (0x100 << 12) | 0x018);
    assert!(even.cached);
    assert!(even.dirty);

    // Odd page.
    let odd = tlb.lookup(0x5018, 0x11).unwrap();
    assert_eq!(odd.paddr, (0x200 << 12) | 0x018);
}

#[test]
fn lookup_outside_pair_misses() {
    let mut tlb = Tlb::new();
    tlb.write(
        0,
        entry(0x4000, 0, lo(0x100, LO_VALID | LO_CACHED), 0),
    );
    assert_eq!(tlb.lookup(0x6000, 0), Err(TlbError::Refill));
}

// ══════════════════════════════════════════════════════════
// 2. ASID and the global bit
// ══════════════════════════════════════════════════════════

#[test]
fn asid_mismatch_misses_without_global() {
    let mut tlb = Tlb::new();
    tlb.write(
        0,
        entry(0x4000, 0x11, lo(0x100, LO_VALID | LO_CACHED), 0),
    );
    assert_eq!(tlb.lookup(0x4000, 0x22), Err(TlbError::Refill));
    assert!(tlb.lookup(0x4000, 0x11).is_ok());
}

#[test]
fn global_bit_ignores_asid_only_when_set_in_both_halves() {
    let mut tlb = Tlb::new();
    tlb.write(
        0,
        entry(
            0x4000,
            0x11,
            lo(0x100, LO_VALID | LO_CACHED | LO_GLOBAL),
            lo(0x200, LO_VALID | LO_CACHED | LO_GLOBAL),
        ),
    );
    assert!(tlb.lookup(0x4000, 0x99).is_ok());

    // One half global is not global.
    tlb.write(
        1,
        entry(
            0x8000,
            0x11,
            lo(0x300, LO_VALID | LO_CACHED | LO_GLOBAL),
            lo(0x400, LO_VALID | LO_CACHED),
        ),
    );
    assert_eq!(tlb.lookup(0x8000, 0x99), Err(TlbError::Refill));
}

// ══════════════════════════════════════════════════════════
// 3. Page-size masks
// ══════════════════════════════════════════════════════════

#[test]
fn page_mask_widens_the_pair() {
    let mut tlb = Tlb::new();
    // 64 KiB pages: PageMask covers bits [16:13].
    let mask_64k = 0xF << 13;
    tlb.write(
        0,
        TlbEntry::new(
            mask_64k,
            0x10_0000,
            lo(0x100, LO_VALID | LO_CACHED),
            lo(0x200, LO_VALID | LO_CACHED),
        ),
    );

    // Anywhere in the even 64 KiB page hits with the page offset kept.
    let hit = tlb.lookup(0x10_ABCD, 0).unwrap();
    assert_eq!(hit.paddr, (0x100 << 12) | 0xABCD);
    // Odd page of the widened pair.
    assert!(tlb.lookup(0x11_0000, 0).is_ok());
    // Outside the widened pair.
    assert_eq!(tlb.lookup(0x12_0000, 0), Err(TlbError::Refill));
}

// ══════════════════════════════════════════════════════════
// 4. Attributes
// ══════════════════════════════════════════════════════════

#[test]
fn invalid_entry_is_distinguished_from_refill() {
    let mut tlb = Tlb::new();
    tlb.write(0, entry(0x4000, 0, lo(0x100, LO_CACHED), 0));
    assert_eq!(tlb.lookup(0x4000, 0), Err(TlbError::Invalid));
}

#[test]
fn uncached_attribute_reported() {
    let mut tlb = Tlb::new();
    tlb.write(
        0,
        entry(0x4000, 0, lo(0x100, LO_VALID | LO_UNCACHED), 0),
    );
    assert!(!tlb.lookup(0x4000, 0).unwrap().cached);
}

#[test]
fn clean_page_reports_not_dirty() {
    let mut tlb = Tlb::new();
    tlb.write(
        0,
        entry(0x4000, 0, lo(0x100, LO_VALID | LO_CACHED), 0),
    );
    assert!(!tlb.lookup(0x4000, 0).unwrap().dirty);
}

// ══════════════════════════════════════════════════════════
// 5. Random writes and probe
// ══════════════════════════════════════════════════════════

#[test]
fn write_random_installs_at_the_given_slot() {
    let mut tlb = Tlb::new();
    tlb.write_random(
        entry(0x4000, 0, lo(0x100, LO_VALID | LO_CACHED), 0),
        17,
    );
    assert_eq!(tlb.probe(0x4000, 0), Some(17));
}

#[test]
fn probe_reports_coverage_not_validity() {
    let mut tlb = Tlb::new();
    tlb.write(5, entry(0x4000, 0, lo(0x100, LO_CACHED), 0));
    assert_eq!(tlb.probe(0x4000, 0), Some(5));
    assert_eq!(tlb.probe(0x9000, 0), None);
}

// ══════════════════════════════════════════════════════════
// 6. Overlapping coverage
// ══════════════════════════════════════════════════════════

#[test]
fn most_recently_written_entry_wins() {
    let mut tlb = Tlb::new();
    tlb.write(0, entry(0x4000, 0, lo(0x100, LO_VALID | LO_CACHED), 0));
    tlb.write(9, entry(0x4000, 0, lo(0x900, LO_VALID | LO_CACHED), 0));

    assert_eq!(tlb.lookup(0x4000, 0).unwrap().paddr, 0x900 << 12);
    assert_eq!(tlb.probe(0x4000, 0), Some(9));

    // Rewriting slot 0 makes it the newest again.
    tlb.write(0, entry(0x4000, 0, lo(0x111, LO_VALID | LO_CACHED), 0));
    assert_eq!(tlb.lookup(0x4000, 0).unwrap().paddr, 0x111 << 12);
}
