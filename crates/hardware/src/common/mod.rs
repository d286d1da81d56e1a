//! Common types shared across the simulator core.
//!
//! This module groups the foundational vocabulary used by every subsystem:
//! 1. **Addresses:** Strong virtual/physical address types.
//! 2. **Constants:** Fixed hardware geometry (cache lines, TLB size, vectors).
//! 3. **Faults:** Guest-visible fault values and host-fatal error types.
//! 4. **Registers:** The general-purpose register file with HI/LO.

/// Physical and virtual address types.
pub mod addr;
/// Fixed hardware geometry and architectural constants.
pub mod constants;
/// Memory access classification (fetch, read, write).
pub mod data;
/// Guest faults and host-level simulation errors.
pub mod error;
/// General-purpose register file with HI/LO.
pub mod reg;

pub use addr::{PhysAddr, VirtAddr};
pub use data::AccessType;
pub use error::{Fault, SimError};
pub use reg::RegisterFile;
