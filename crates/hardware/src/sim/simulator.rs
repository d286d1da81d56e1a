//! Top-level simulator: owns the CPU and drives the master clock.

use crate::common::error::SimError;
use crate::config::Config;
use crate::core::Cpu;
use crate::soc::bus::BusController;

/// Top-level simulator wrapper.
///
/// Thin by design: one CPU, one bus handle inside it, and a tick loop. The
/// enclosing device model (which interleaves other hardware units at fixed
/// ratios) calls [`Simulator::tick`] once per CPU pclock.
pub struct Simulator {
    /// CPU state, pipeline, and attached bus.
    pub cpu: Cpu,
}

impl Simulator {
    /// Creates a simulator around a bus controller.
    pub fn new(bus: Box<dyn BusController>, config: &Config) -> Self {
        Self {
            cpu: Cpu::new(bus, config),
        }
    }

    /// Advances the machine by one cycle.
    ///
    /// # Errors
    ///
    /// Propagates host-fatal [`SimError`]s from the CPU.
    pub fn tick(&mut self) -> Result<(), SimError> {
        self.cpu.cycle()
    }

    /// Runs for `cycles` cycles.
    ///
    /// # Errors
    ///
    /// Stops at the first host-fatal [`SimError`].
    pub fn run(&mut self, cycles: u64) -> Result<(), SimError> {
        for _ in 0..cycles {
            self.tick()?;
        }
        Ok(())
    }
}
