//! Operating modes.
//!
//! This module derives the processor's operating mode from the Status
//! register. It implements the following:
//! 1. **Mode Classification:** Kernel, supervisor, and user, each in a
//!    32-bit or 64-bit addressing variant.
//! 2. **Derivation:** KSU/EXL/ERL select the privilege level; KX/SX/UX
//!    select the addressing width for the level in force.
//! 3. **Observability:** Human-readable naming and display formatting.

use crate::common::error::SimError;
use crate::core::arch::cp0::status;

/// Processor operating mode: privilege level plus addressing width.
///
/// Exactly one mode is in force per cycle. The mode selects which segment
/// table the resolver consults; nothing else in the core branches on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatingMode {
    /// Kernel mode with 32-bit addressing.
    Kernel32,
    /// Kernel mode with 64-bit addressing.
    Kernel64,
    /// Supervisor mode with 32-bit addressing.
    Supervisor32,
    /// Supervisor mode with 64-bit addressing.
    Supervisor64,
    /// User mode with 32-bit addressing.
    User32,
    /// User mode with 64-bit addressing.
    User64,
}

impl OperatingMode {
    /// Derives the operating mode from a Status register value.
    ///
    /// EXL or ERL force kernel mode regardless of KSU. The reserved KSU
    /// encoding `0b11` selects no mode and is a host-fatal error: resolving
    /// it silently would let an impossible machine state keep running.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::IndeterminateMode`] for KSU == 0b11.
    pub const fn from_status(status_value: u64) -> Result<Self, SimError> {
        let ksu = (status_value >> status::KSU_SHIFT) & status::KSU_MASK;
        let forced_kernel = status_value & (status::EXL | status::ERL) != 0;

        if forced_kernel || ksu == status::KSU_KERNEL {
            return Ok(if status_value & status::KX != 0 {
                Self::Kernel64
            } else {
                Self::Kernel32
            });
        }

        match ksu {
            status::KSU_SUPERVISOR => Ok(if status_value & status::SX != 0 {
                Self::Supervisor64
            } else {
                Self::Supervisor32
            }),
            status::KSU_USER => Ok(if status_value & status::UX != 0 {
                Self::User64
            } else {
                Self::User32
            }),
            _ => Err(SimError::IndeterminateMode(status_value)),
        }
    }

    /// Returns `true` for the two kernel variants.
    pub const fn is_kernel(self) -> bool {
        matches!(self, Self::Kernel32 | Self::Kernel64)
    }

    /// Returns the human-readable name of the mode.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Kernel32 => "Kernel32",
            Self::Kernel64 => "Kernel64",
            Self::Supervisor32 => "Supervisor32",
            Self::Supervisor64 => "Supervisor64",
            Self::User32 => "User32",
            Self::User64 => "User64",
        }
    }
}

impl std::fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
