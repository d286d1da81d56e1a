//! Instruction cache.
//!
//! A direct-mapped cache of 512 lines of 32 bytes, virtually indexed and
//! physically tagged: the line index comes from the untranslated address
//! (so lookup can start before translation finishes) while the tag check
//! uses the translated address (so virtual aliases of one physical line
//! still hit). There is no eviction policy beyond direct-mapped overwrite.

use crate::common::constants::{ICACHE_LINES, ICACHE_WORDS_PER_LINE};
use crate::common::{PhysAddr, VirtAddr};

/// One cache line: a physical tag, a valid bit, and eight words.
#[derive(Clone, Copy, Debug)]
pub struct Line {
    tag: u64,
    valid: bool,
    data: [u32; ICACHE_WORDS_PER_LINE],
}

impl Line {
    const fn empty() -> Self {
        Self {
            tag: 0,
            valid: false,
            data: [0; ICACHE_WORDS_PER_LINE],
        }
    }

    /// Returns the instruction word for `vaddr` within this line.
    pub const fn word(&self, vaddr: VirtAddr) -> u32 {
        self.data[((vaddr.val() >> 2) & 0x7) as usize]
    }
}

/// The instruction cache.
pub struct ICache {
    lines: Box<[Line; ICACHE_LINES]>,
}

impl ICache {
    /// Creates an instruction cache with every line invalid.
    pub fn new() -> Self {
        Self {
            lines: Box::new([Line::empty(); ICACHE_LINES]),
        }
    }

    /// Looks up a line, returning it only on a physical-tag hit.
    ///
    /// The index comes from `vaddr`, the tag comparison from `paddr`: a
    /// line filled for a different physical address at the same virtual
    /// index misses here.
    pub fn probe(&self, vaddr: VirtAddr, paddr: PhysAddr) -> Option<&Line> {
        let line = &self.lines[vaddr.line_index()];
        (line.valid && line.tag == paddr.line_tag()).then_some(line)
    }

    /// Overwrites the indexed line with fresh data and marks it valid.
    pub fn fill(&mut self, vaddr: VirtAddr, paddr: PhysAddr, data: [u32; ICACHE_WORDS_PER_LINE]) {
        self.lines[vaddr.line_index()] = Line {
            tag: paddr.line_tag(),
            valid: true,
            data,
        };
    }

    /// Clears the indexed line's valid bit. The tag is left in place.
    pub fn invalidate(&mut self, vaddr: VirtAddr) {
        self.lines[vaddr.line_index()].valid = false;
    }

    /// Clears the valid bit only if the physical tag still matches.
    ///
    /// Used for coherence with stores elsewhere on the bus: a line that was
    /// since refilled for a different physical address is left alone.
    pub fn invalidate_hit(&mut self, vaddr: VirtAddr, paddr: PhysAddr) {
        let line = &mut self.lines[vaddr.line_index()];
        if line.tag == paddr.line_tag() {
            line.valid = false;
        }
    }

    /// Programs the indexed line's tag and valid bit directly from a TagLo
    /// register value (CACHE Index_Store_Tag).
    ///
    /// TagLo carries physical address bits [31:12] in its [27:8] field and
    /// the valid state in bits [7:6].
    pub fn set_tag(&mut self, vaddr: VirtAddr, taglo: u64) {
        let line = &mut self.lines[vaddr.line_index()];
        line.tag = ((taglo >> 8) & 0xF_FFFF) << 7;
        line.valid = (taglo >> 6) & 0b11 != 0;
    }
}

impl Default for ICache {
    fn default() -> Self {
        Self::new()
    }
}
