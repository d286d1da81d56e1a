//! Simulation driving: the simulator wrapper and the ROM loader.

/// Raw ROM image loading.
pub mod loader;
/// Top-level simulator owning the CPU.
pub mod simulator;

pub use simulator::Simulator;
