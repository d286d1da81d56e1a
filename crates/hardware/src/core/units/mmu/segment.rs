//! Static segment tables and the segment resolver.
//!
//! The virtual address space is carved into fixed segments per operating
//! mode. A segment decides three things about every access inside it:
//! whether the address is translated through the TLB (`mapped`) or by a
//! fixed offset, whether accesses go through the instruction cache
//! (`cached`), and where the direct window lands in physical space
//! (`offset`). Segments never change at runtime; only the operating mode
//! changes which table is consulted.
//!
//! [`resolve`] is pure and total: for a fixed mode, every address matches
//! at most one segment, and an address matching none is an address error
//! (raised by the caller, not here).

use crate::core::arch::OperatingMode;

/// A statically described region of the virtual address space.
#[derive(Debug, PartialEq, Eq)]
pub struct Segment {
    /// Segment mnemonic, for diagnostics.
    pub name: &'static str,
    /// First virtual address of the segment.
    pub start: u64,
    /// Length of the segment in bytes. Zero only for the sentinel.
    pub length: u64,
    /// Physical base of a direct-mapped segment; unused when `mapped`.
    pub offset: u64,
    /// Translated through the TLB rather than a fixed offset.
    pub mapped: bool,
    /// Accesses go through the instruction cache.
    pub cached: bool,
}

impl Segment {
    /// Returns `true` if `vaddr` falls inside this segment.
    #[inline(always)]
    pub const fn contains(&self, vaddr: u64) -> bool {
        vaddr.wrapping_sub(self.start) < self.length
    }

    /// Direct physical translation for an unmapped segment.
    #[inline(always)]
    pub const fn direct_physical(&self, vaddr: u64) -> u64 {
        vaddr - self.start + self.offset
    }
}

/// Sentinel segment: zero-length, unmapped, uncached.
///
/// Contains no address, so a PC check against it always forces a fresh
/// [`resolve`]. Installed at reset and at every exception entry.
pub static DEFAULT_SEGMENT: Segment = Segment {
    name: "default",
    start: 0,
    length: 0,
    offset: 0,
    mapped: false,
    cached: false,
};

/// Span of the 32-bit-compatibility mapped user region.
const USEG_LEN: u64 = 0x8000_0000;

/// Span of the 64-bit mapped regions (2^40 bytes).
const XSEG_LEN: u64 = 0x0000_0100_0000_0000;

/// Span of each direct kernel compatibility segment.
const KSEG_LEN: u64 = 0x2000_0000;

/// Physical span of one xkphys window: this part bounds addressing to a
/// 32-bit physical bus.
const XKPHYS_WINDOW_LEN: u64 = 0x1_0000_0000;

/// Stride between consecutive xkphys windows (address bits 61:59).
const XKPHYS_STRIDE: u64 = 1 << 59;

const fn xkphys_window(n: u64) -> Segment {
    Segment {
        name: "xkphys",
        start: 0x8000_0000_0000_0000 | (n * XKPHYS_STRIDE),
        length: XKPHYS_WINDOW_LEN,
        offset: 0,
        mapped: false,
        // Window 2 selects the uncached access algorithm; the rest cache.
        cached: n != 2,
    }
}

static USER32: [Segment; 1] = [Segment {
    name: "useg",
    start: 0,
    length: USEG_LEN,
    offset: 0,
    mapped: true,
    cached: true,
}];

static USER64: [Segment; 1] = [Segment {
    name: "xuseg",
    start: 0,
    length: XSEG_LEN,
    offset: 0,
    mapped: true,
    cached: true,
}];

static SUPERVISOR32: [Segment; 2] = [
    Segment {
        name: "suseg",
        start: 0,
        length: USEG_LEN,
        offset: 0,
        mapped: true,
        cached: true,
    },
    Segment {
        name: "sseg",
        start: 0xFFFF_FFFF_C000_0000,
        length: KSEG_LEN,
        offset: 0,
        mapped: true,
        cached: true,
    },
];

static SUPERVISOR64: [Segment; 3] = [
    Segment {
        name: "xsuseg",
        start: 0,
        length: XSEG_LEN,
        offset: 0,
        mapped: true,
        cached: true,
    },
    Segment {
        name: "xsseg",
        start: 0x4000_0000_0000_0000,
        length: XSEG_LEN,
        offset: 0,
        mapped: true,
        cached: true,
    },
    Segment {
        name: "csseg",
        start: 0xFFFF_FFFF_C000_0000,
        length: KSEG_LEN,
        offset: 0,
        mapped: true,
        cached: true,
    },
];

static KERNEL32: [Segment; 5] = [
    Segment {
        name: "kuseg",
        start: 0,
        length: USEG_LEN,
        offset: 0,
        mapped: true,
        cached: true,
    },
    // kseg0 and kseg1 alias the same physical window; address bit 29
    // selects between the cached and uncached image.
    Segment {
        name: "kseg0",
        start: 0xFFFF_FFFF_8000_0000,
        length: KSEG_LEN,
        offset: 0,
        mapped: false,
        cached: true,
    },
    Segment {
        name: "kseg1",
        start: 0xFFFF_FFFF_A000_0000,
        length: KSEG_LEN,
        offset: 0,
        mapped: false,
        cached: false,
    },
    Segment {
        name: "ksseg",
        start: 0xFFFF_FFFF_C000_0000,
        length: KSEG_LEN,
        offset: 0,
        mapped: true,
        cached: true,
    },
    Segment {
        name: "kseg3",
        start: 0xFFFF_FFFF_E000_0000,
        length: KSEG_LEN,
        offset: 0,
        mapped: true,
        cached: true,
    },
];

static KERNEL64: [Segment; 15] = [
    Segment {
        name: "xkuseg",
        start: 0,
        length: XSEG_LEN,
        offset: 0,
        mapped: true,
        cached: true,
    },
    Segment {
        name: "xksseg",
        start: 0x4000_0000_0000_0000,
        length: XSEG_LEN,
        offset: 0,
        mapped: true,
        cached: true,
    },
    xkphys_window(0),
    xkphys_window(1),
    xkphys_window(2),
    xkphys_window(3),
    xkphys_window(4),
    xkphys_window(5),
    xkphys_window(6),
    xkphys_window(7),
    Segment {
        name: "xkseg",
        start: 0xC000_0000_0000_0000,
        length: XSEG_LEN,
        offset: 0,
        mapped: true,
        cached: true,
    },
    Segment {
        name: "ckseg0",
        start: 0xFFFF_FFFF_8000_0000,
        length: KSEG_LEN,
        offset: 0,
        mapped: false,
        cached: true,
    },
    Segment {
        name: "ckseg1",
        start: 0xFFFF_FFFF_A000_0000,
        length: KSEG_LEN,
        offset: 0,
        mapped: false,
        cached: false,
    },
    Segment {
        name: "cksseg",
        start: 0xFFFF_FFFF_C000_0000,
        length: KSEG_LEN,
        offset: 0,
        mapped: true,
        cached: true,
    },
    Segment {
        name: "ckseg3",
        start: 0xFFFF_FFFF_E000_0000,
        length: KSEG_LEN,
        offset: 0,
        mapped: true,
        cached: true,
    },
];

/// Returns the segment table for an operating mode.
pub const fn table_for(mode: OperatingMode) -> &'static [Segment] {
    match mode {
        OperatingMode::User32 => &USER32,
        OperatingMode::User64 => &USER64,
        OperatingMode::Supervisor32 => &SUPERVISOR32,
        OperatingMode::Supervisor64 => &SUPERVISOR64,
        OperatingMode::Kernel32 => &KERNEL32,
        OperatingMode::Kernel64 => &KERNEL64,
    }
}

/// Resolves a virtual address to its segment under an operating mode.
///
/// Pure and side-effect-free; evaluated on every fetch whose cached segment
/// no longer contains the PC, and on every data access. Returns `None`
/// when no segment contains the address — the caller raises the address
/// error.
pub fn resolve(vaddr: u64, mode: OperatingMode) -> Option<&'static Segment> {
    table_for(mode).iter().find(|seg| seg.contains(vaddr))
}
