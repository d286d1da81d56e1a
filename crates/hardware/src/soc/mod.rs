//! System-on-chip surface: the bus contract and a reference memory
//! controller.
//!
//! The pipeline's only outward-facing dependency is the
//! [`bus::BusController`] trait. Everything else on the console — RCP, DMA
//! engines, peripheral controllers — lives behind it.

/// Bus controller trait and memory request descriptors.
pub mod bus;
/// Reference flat RAM plus boot ROM window.
pub mod memory;

pub use bus::{BusController, BusReply, BusRequest, RequestKind};
pub use memory::MemoryController;
