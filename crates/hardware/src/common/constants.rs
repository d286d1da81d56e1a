//! Fixed hardware geometry and architectural constants.
//!
//! Values here are properties of the modelled silicon, not tunables: they do
//! not belong in [`crate::config::Config`]. Timing parameters that the
//! hardware manual expresses in bus-dependent cycles live in the config
//! instead.

/// Program counter loaded by a cold reset (top of the boot ROM, uncached).
pub const RESET_VECTOR: u64 = 0xFFFF_FFFF_BFC0_0000;

/// Base of the bootstrap exception vectors (Status.BEV = 1).
pub const VECTOR_BASE_BOOTSTRAP: u64 = 0xFFFF_FFFF_BFC0_0200;

/// Base of the normal exception vectors (Status.BEV = 0).
pub const VECTOR_BASE: u64 = 0xFFFF_FFFF_8000_0000;

/// Offset of the TLB-refill vector from the vector base.
pub const VECTOR_OFFSET_REFILL: u64 = 0x000;

/// Offset of the general exception vector from the vector base.
pub const VECTOR_OFFSET_GENERAL: u64 = 0x180;

/// Number of entries in the joint TLB.
pub const TLB_ENTRIES: usize = 32;

/// Offset bits of a minimum-size (4 KiB) page.
pub const PAGE_OFFSET_MASK: u64 = 0xFFF;

/// Instruction cache line count (direct-mapped).
pub const ICACHE_LINES: usize = 512;

/// Instruction cache line size in bytes.
pub const ICACHE_LINE_BYTES: usize = 32;

/// log2 of the instruction cache line size.
pub const ICACHE_LINE_SHIFT: u64 = 5;

/// Instruction words per cache line.
pub const ICACHE_WORDS_PER_LINE: usize = ICACHE_LINE_BYTES / 4;

/// Number of pipeline stages (IC, RF, EX, DC, WB).
pub const PIPELINE_DEPTH: usize = 5;

/// Slow-mode cycles without a new fault or interlock before the pipeline
/// control reverts to the fast path (one full pipeline drain, minus the
/// detecting stage).
pub const EXCEPTION_HISTORY_LIMIT: u8 = 4;

/// Physical base address of the boot ROM window.
pub const ROM_PHYS_BASE: u64 = 0x1FC0_0000;
