//! Guest faults and host-level simulation errors.
//!
//! The two error domains are deliberately separate:
//! 1. **`Fault`** is a guest-visible value. Faults are ordinary state
//!    transitions: they ride through the pipeline latches as
//!    `Option<Fault>`, redirect the guest to its exception vector, and are
//!    never surfaced as Rust errors.
//! 2. **`SimError`** is host-fatal. It marks conditions the simulation
//!    cannot represent (an undecoded opcode, an impossible mode encoding)
//!    and aborts the run with a diagnostic rather than producing
//!    plausible-looking wrong output.

use std::fmt;

use thiserror::Error;

/// A guest-visible fault, carried through pipeline latches.
///
/// Every variant is a deterministic function of the faulting address and the
/// machine state at the detecting stage. The associated value, where
/// present, is the faulting virtual address (latched into `BadVAddr`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    /// Cold reset. Highest priority; handled once at power-on.
    ColdReset,
    /// Address matched no segment, or was misaligned, on a fetch or load.
    AddressErrorLoad(u64),
    /// Address matched no segment, or was misaligned, on a store.
    AddressErrorStore(u64),
    /// No TLB entry covered a mapped fetch or load address.
    TlbRefillLoad(u64),
    /// A TLB entry matched a fetch or load but was marked invalid.
    TlbInvalidLoad(u64),
    /// No TLB entry covered a mapped store address.
    TlbRefillStore(u64),
    /// A TLB entry matched a store but was marked invalid.
    TlbInvalidStore(u64),
    /// A store hit a valid TLB entry whose dirty bit is clear.
    TlbModified(u64),
    /// SYSCALL instruction.
    Syscall,
    /// BREAK instruction.
    Breakpoint,
    /// Signed 32- or 64-bit add/subtract overflow.
    IntegerOverflow,
}

impl Fault {
    /// Returns the exception code written into the Cause register.
    pub const fn cause_code(self) -> u64 {
        match self {
            Self::ColdReset => 0,
            Self::TlbModified(_) => 1,
            Self::TlbRefillLoad(_) | Self::TlbInvalidLoad(_) => 2,
            Self::TlbRefillStore(_) | Self::TlbInvalidStore(_) => 3,
            Self::AddressErrorLoad(_) => 4,
            Self::AddressErrorStore(_) => 5,
            Self::Syscall => 8,
            Self::Breakpoint => 9,
            Self::IntegerOverflow => 12,
        }
    }

    /// Returns the faulting virtual address, for faults that latch one.
    pub const fn bad_vaddr(self) -> Option<u64> {
        match self {
            Self::AddressErrorLoad(a)
            | Self::AddressErrorStore(a)
            | Self::TlbRefillLoad(a)
            | Self::TlbInvalidLoad(a)
            | Self::TlbRefillStore(a)
            | Self::TlbInvalidStore(a)
            | Self::TlbModified(a) => Some(a),
            _ => None,
        }
    }

    /// Returns `true` for TLB-refill faults, which use the dedicated refill
    /// vector when taken outside of exception level.
    pub const fn is_refill(self) -> bool {
        matches!(self, Self::TlbRefillLoad(_) | Self::TlbRefillStore(_))
    }

    /// Returns `true` for TLB-related faults, which update `EntryHi` and
    /// `Context` on entry so the refill handler can issue a TLBWR directly.
    pub const fn is_tlb(self) -> bool {
        matches!(
            self,
            Self::TlbRefillLoad(_)
                | Self::TlbInvalidLoad(_)
                | Self::TlbRefillStore(_)
                | Self::TlbInvalidStore(_)
                | Self::TlbModified(_)
        )
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColdReset => write!(f, "ColdReset"),
            Self::AddressErrorLoad(a) => write!(f, "AddressErrorLoad({a:#x})"),
            Self::AddressErrorStore(a) => write!(f, "AddressErrorStore({a:#x})"),
            Self::TlbRefillLoad(a) => write!(f, "TlbRefillLoad({a:#x})"),
            Self::TlbInvalidLoad(a) => write!(f, "TlbInvalidLoad({a:#x})"),
            Self::TlbRefillStore(a) => write!(f, "TlbRefillStore({a:#x})"),
            Self::TlbInvalidStore(a) => write!(f, "TlbInvalidStore({a:#x})"),
            Self::TlbModified(a) => write!(f, "TlbModified({a:#x})"),
            Self::Syscall => write!(f, "Syscall"),
            Self::Breakpoint => write!(f, "Breakpoint"),
            Self::IntegerOverflow => write!(f, "IntegerOverflow"),
        }
    }
}

/// A host-fatal simulation error.
///
/// Returned from the cycle API when the machine reaches a state the
/// simulator cannot faithfully continue from. These are never recoverable
/// by the guest.
#[derive(Debug, Error)]
pub enum SimError {
    /// An instruction word decoded to no known opcode and was not in the
    /// tolerated-opcode list.
    #[error("unimplemented opcode {word:#010x} at pc {pc:#x}")]
    UnimplementedOpcode {
        /// The raw instruction word.
        word: u32,
        /// Program counter of the instruction.
        pc: u64,
    },

    /// The Status register carried the reserved KSU encoding (0b11), which
    /// selects no operating mode.
    #[error("indeterminate operating mode (Status = {0:#010x})")]
    IndeterminateMode(u64),

    /// A reset was signalled after cold reset already ran. Warm reset is an
    /// explicit unsupported path.
    #[error("soft reset is not supported (cold reset already taken)")]
    SoftReset,

    /// Failure reading a ROM image or configuration file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure parsing a JSON configuration file.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}
