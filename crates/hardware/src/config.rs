//! Configuration system for the simulator.
//!
//! This module defines all configuration structures used to parameterize the
//! simulator. It provides:
//! 1. **Defaults:** Baseline timing and memory constants.
//! 2. **Structures:** Hierarchical config for general, timing, and ISA policy.
//!
//! Configuration is supplied via JSON from the CLI (`--config`) or use
//! `Config::default()`.

use serde::Deserialize;

/// Default configuration constants for the simulator.
///
/// These values define the baseline hardware configuration when not
/// explicitly overridden in a JSON configuration file.
mod defaults {
    /// Pipeline bubble cycles inserted when a stage raises a new exception.
    ///
    /// Models the drain between fault detection and the first handler fetch.
    pub const EXCEPTION_ENTRY_LATENCY: u64 = 2;

    /// Interlock cycles for an instruction fetch from an uncached segment.
    ///
    /// Uncached fetches bypass the instruction cache and pay the full
    /// ROM/RDRAM round trip on every word.
    pub const UNCACHED_FETCH_LATENCY: u64 = 50;

    /// Fixed bus transaction latency of the reference memory controller.
    pub const BUS_LATENCY: u64 = 4;

    /// Total size of main RAM (8 MiB, expansion installed).
    pub const RAM_SIZE: usize = 8 * 1024 * 1024;

    /// Size of the boot ROM window (4 MiB).
    pub const ROM_SIZE: usize = 4 * 1024 * 1024;
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use vrsim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.timing.uncached_fetch_latency, 50);
/// assert!(config.isa.tolerated_opcodes.is_empty());
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use vrsim_core::config::Config;
///
/// let json = r#"{
///     "general": { "trace_instructions": true },
///     "timing": { "uncached_fetch_latency": 38 },
///     "isa": { "tolerated_opcodes": [47] }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert!(config.general.trace_instructions);
/// assert_eq!(config.timing.uncached_fetch_latency, 38);
/// assert_eq!(config.timing.exception_entry_latency, 2);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Pipeline and bus timing parameters.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Instruction-set policy settings.
    #[serde(default)]
    pub isa: IsaConfig,
}

/// General simulation settings and options.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Enable per-cycle retirement tracing to the `tracing` subscriber.
    #[serde(default)]
    pub trace_instructions: bool,

    /// Main RAM size in bytes.
    #[serde(default = "GeneralConfig::default_ram_size")]
    pub ram_size: usize,

    /// Boot ROM window size in bytes.
    #[serde(default = "GeneralConfig::default_rom_size")]
    pub rom_size: usize,
}

impl GeneralConfig {
    /// Returns the default main RAM size in bytes.
    fn default_ram_size() -> usize {
        defaults::RAM_SIZE
    }

    /// Returns the default ROM window size in bytes.
    fn default_rom_size() -> usize {
        defaults::ROM_SIZE
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_instructions: false,
            ram_size: defaults::RAM_SIZE,
            rom_size: defaults::ROM_SIZE,
        }
    }
}

/// Pipeline and bus timing parameters.
///
/// All values are in master-clock cycles. The exception-entry and
/// uncached-fetch values reproduce the documented interlock behaviour; the
/// bus latency only parameterizes the reference memory controller.
#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    /// Bubble cycles inserted when a stage raises a new exception.
    #[serde(default = "TimingConfig::default_exception_entry")]
    pub exception_entry_latency: u64,

    /// Interlock cycles for an uncached instruction fetch.
    #[serde(default = "TimingConfig::default_uncached_fetch")]
    pub uncached_fetch_latency: u64,

    /// Fixed transaction latency of the reference memory controller.
    #[serde(default = "TimingConfig::default_bus_latency")]
    pub bus_latency: u64,
}

impl TimingConfig {
    /// Returns the default exception-entry latency in cycles.
    fn default_exception_entry() -> u64 {
        defaults::EXCEPTION_ENTRY_LATENCY
    }

    /// Returns the default uncached-fetch interlock latency in cycles.
    fn default_uncached_fetch() -> u64 {
        defaults::UNCACHED_FETCH_LATENCY
    }

    /// Returns the default bus transaction latency in cycles.
    fn default_bus_latency() -> u64 {
        defaults::BUS_LATENCY
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            exception_entry_latency: defaults::EXCEPTION_ENTRY_LATENCY,
            uncached_fetch_latency: defaults::UNCACHED_FETCH_LATENCY,
            bus_latency: defaults::BUS_LATENCY,
        }
    }
}

/// Instruction-set policy settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IsaConfig {
    /// Primary-field opcode numbers (0-63) that decode to a no-op instead of
    /// aborting the run when the word is otherwise unimplemented.
    ///
    /// Empty by default: every operation this machine's workloads use is
    /// implemented. The list exists for triaging test ROMs that touch
    /// unimplemented coprocessor encodings.
    #[serde(default)]
    pub tolerated_opcodes: Vec<u32>,
}
