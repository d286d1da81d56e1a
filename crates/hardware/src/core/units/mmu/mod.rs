//! Memory management: segment resolution and TLB translation.
//!
//! Translation is a two-step affair:
//! 1. The **segment resolver** maps a virtual address and the current
//!    operating mode to a statically described segment, which decides
//!    whether the address is direct-mapped or TLB-mapped, and whether
//!    accesses are cached.
//! 2. For mapped segments, the **TLB** supplies the physical frame.
//!
//! Neither step raises faults itself: both return plain results and the
//! pipeline's fault manager converts absence into the appropriate fault id.

/// Static segment tables and the pure resolver.
pub mod segment;
/// Joint translation lookaside buffer.
pub mod tlb;

pub use segment::{DEFAULT_SEGMENT, Segment, resolve};
pub use tlb::{Tlb, TlbEntry, TlbError, TlbMatch};
