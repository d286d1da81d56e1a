//! Architectural state definitions (operating modes, CP0 bank).

/// System-control coprocessor (CP0) register bank.
pub mod cp0;
/// Operating mode derivation from the Status register.
pub mod mode;

pub use cp0::Cp0;
pub use mode::OperatingMode;
