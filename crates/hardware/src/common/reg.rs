//! General-Purpose Register File.
//!
//! This module implements the integer register file. It performs the
//! following:
//! 1. **Storage:** Maintains 32 general-purpose 64-bit registers plus the
//!    HI/LO multiply-divide pair.
//! 2. **Invariant Enforcement:** Register `r0` is hardwired to zero; writes
//!    to it are discarded.
//! 3. **Debugging:** Provides a utility for dumping the complete register
//!    state.

/// General-purpose register file with the HI/LO multiply-divide pair.
///
/// Register `r0` is hardwired to zero and cannot be modified. HI and LO are
/// not part of the indexed file; they are written directly by the
/// multiply/divide execution functions and read by MFHI/MFLO.
pub struct RegisterFile {
    regs: [u64; 32],
    hi: u64,
    lo: u64,
}

impl RegisterFile {
    /// Creates a new register file with all registers initialized to zero.
    pub const fn new() -> Self {
        Self {
            regs: [0; 32],
            hi: 0,
            lo: 0,
        }
    }

    /// Reads a general-purpose register value.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Register `r0` always returns 0.
    #[inline(always)]
    pub const fn read(&self, idx: usize) -> u64 {
        if idx == 0 { 0 } else { self.regs[idx] }
    }

    /// Writes a value to a general-purpose register.
    ///
    /// Writes to `r0` are discarded.
    #[inline(always)]
    pub const fn write(&mut self, idx: usize, val: u64) {
        if idx != 0 {
            self.regs[idx] = val;
        }
    }

    /// Reads the HI register.
    pub const fn hi(&self) -> u64 {
        self.hi
    }

    /// Reads the LO register.
    pub const fn lo(&self) -> u64 {
        self.lo
    }

    /// Writes the HI register.
    pub const fn set_hi(&mut self, val: u64) {
        self.hi = val;
    }

    /// Writes the LO register.
    pub const fn set_lo(&mut self, val: u64) {
        self.lo = val;
    }

    /// Dumps the contents of all general-purpose registers to stderr.
    pub fn dump(&self) {
        for i in (0..32).step_by(2) {
            eprintln!(
                "r{:<2}={:#018x} r{:<2}={:#018x}",
                i,
                self.read(i),
                i + 1,
                self.read(i + 1)
            );
        }
        eprintln!("hi ={:#018x} lo ={:#018x}", self.hi, self.lo);
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}
