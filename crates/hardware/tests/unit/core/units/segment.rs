//! Segment resolver tests: per-mode tables, direct windows, and the
//! totality property.

use proptest::prelude::*;
use vrsim_core::core::arch::mode::OperatingMode;
use vrsim_core::core::units::mmu::segment::{DEFAULT_SEGMENT, resolve, table_for};

const ALL_MODES: [OperatingMode; 6] = [
    OperatingMode::Kernel32,
    OperatingMode::Kernel64,
    OperatingMode::Supervisor32,
    OperatingMode::Supervisor64,
    OperatingMode::User32,
    OperatingMode::User64,
];

// ══════════════════════════════════════════════════════════
// 1. Direct kernel segments
// ══════════════════════════════════════════════════════════

#[test]
fn kseg0_is_direct_and_cached() {
    let seg = resolve(0xFFFF_FFFF_8000_1000, OperatingMode::Kernel32).unwrap();
    assert_eq!(seg.name, "kseg0");
    assert!(!seg.mapped);
    assert!(seg.cached);
    assert_eq!(seg.direct_physical(0xFFFF_FFFF_8000_1000), 0x1000);
}

#[test]
fn kseg1_is_direct_and_uncached() {
    let seg = resolve(0xFFFF_FFFF_A000_1000, OperatingMode::Kernel32).unwrap();
    assert_eq!(seg.name, "kseg1");
    assert!(!seg.mapped);
    assert!(!seg.cached);
    assert_eq!(seg.direct_physical(0xFFFF_FFFF_A000_1000), 0x1000);
}

#[test]
fn address_bit_29_splits_kseg0_from_kseg1() {
    // Same physical target, one address bit apart.
    let cached = resolve(0xFFFF_FFFF_8000_0000, OperatingMode::Kernel32).unwrap();
    let uncached = resolve(0xFFFF_FFFF_8000_0000 | (1 << 29), OperatingMode::Kernel32).unwrap();
    assert_eq!(cached.name, "kseg0");
    assert_eq!(uncached.name, "kseg1");
    assert_eq!(
        cached.direct_physical(0xFFFF_FFFF_8000_0000),
        uncached.direct_physical(0xFFFF_FFFF_A000_0000)
    );
}

// ══════════════════════════════════════════════════════════
// 2. Mapped segments per mode
// ══════════════════════════════════════════════════════════

#[test]
fn user32_sees_only_useg() {
    let seg = resolve(0x0000_1000, OperatingMode::User32).unwrap();
    assert_eq!(seg.name, "useg");
    assert!(seg.mapped);
    assert!(resolve(0x8000_0000, OperatingMode::User32).is_none());
    assert!(resolve(0xFFFF_FFFF_8000_0000, OperatingMode::User32).is_none());
}

#[test]
fn user64_xuseg_spans_2_pow_40() {
    assert!(resolve(0x0000_00FF_FFFF_FFFF, OperatingMode::User64).is_some());
    assert!(resolve(0x0000_0100_0000_0000, OperatingMode::User64).is_none());
}

#[test]
fn supervisor32_sees_sseg_but_not_kseg() {
    assert_eq!(
        resolve(0xFFFF_FFFF_C000_0000, OperatingMode::Supervisor32)
            .unwrap()
            .name,
        "sseg"
    );
    assert!(resolve(0xFFFF_FFFF_8000_0000, OperatingMode::Supervisor32).is_none());
}

#[test]
fn kernel32_kuseg_is_mapped() {
    let seg = resolve(0x0000_4000, OperatingMode::Kernel32).unwrap();
    assert_eq!(seg.name, "kuseg");
    assert!(seg.mapped);
}

// ══════════════════════════════════════════════════════════
// 3. xkphys windows (kernel64)
// ══════════════════════════════════════════════════════════

#[test]
fn xkphys_window_2_is_uncached_others_cached() {
    let w0 = resolve(0x8000_0000_0000_0000, OperatingMode::Kernel64).unwrap();
    let w2 = resolve(0x9000_0000_0000_0000, OperatingMode::Kernel64).unwrap();
    let w3 = resolve(0x9800_0000_0000_0000, OperatingMode::Kernel64).unwrap();
    assert!(w0.cached);
    assert!(!w2.cached);
    assert!(w3.cached);
    assert!(!w0.mapped);
}

#[test]
fn xkphys_bounded_to_32_bit_physical() {
    assert!(resolve(0x8000_0000_FFFF_FFFF, OperatingMode::Kernel64).is_some());
    assert!(resolve(0x8000_0001_0000_0000, OperatingMode::Kernel64).is_none());
}

#[test]
fn xkphys_translates_to_window_offset() {
    let seg = resolve(0x9000_0000_1FC0_0000, OperatingMode::Kernel64).unwrap();
    assert_eq!(seg.direct_physical(0x9000_0000_1FC0_0000), 0x1FC0_0000);
}

#[test]
fn kernel64_keeps_compatibility_segments() {
    assert_eq!(
        resolve(0xFFFF_FFFF_8000_0000, OperatingMode::Kernel64)
            .unwrap()
            .name,
        "ckseg0"
    );
    assert_eq!(
        resolve(0xFFFF_FFFF_A000_0000, OperatingMode::Kernel64)
            .unwrap()
            .name,
        "ckseg1"
    );
}

// ══════════════════════════════════════════════════════════
// 4. Sentinel and totality
// ══════════════════════════════════════════════════════════

#[test]
fn sentinel_contains_nothing() {
    assert!(!DEFAULT_SEGMENT.contains(0));
    assert!(!DEFAULT_SEGMENT.contains(u64::MAX));
}

proptest! {
    /// For any address and mode, at most one table entry matches: the
    /// resolver is a function, not a priority encoder over overlaps.
    #[test]
    fn at_most_one_segment_matches(addr in any::<u64>(), mode_idx in 0usize..6) {
        let mode = ALL_MODES[mode_idx];
        let matches = table_for(mode)
            .iter()
            .filter(|seg| seg.contains(addr))
            .count();
        prop_assert!(matches <= 1);
        // And resolve agrees with the table scan.
        prop_assert_eq!(resolve(addr, mode).is_some(), matches == 1);
    }

    /// Resolution is deterministic: equal inputs, equal segment.
    #[test]
    fn resolution_is_pure(addr in any::<u64>(), mode_idx in 0usize..6) {
        let mode = ALL_MODES[mode_idx];
        let a = resolve(addr, mode).map(|s| s.name);
        let b = resolve(addr, mode).map(|s| s.name);
        prop_assert_eq!(a, b);
    }
}
