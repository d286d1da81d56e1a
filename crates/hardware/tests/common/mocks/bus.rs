//! Bus controller mocks: a mockall mock for expectation-driven tests and a
//! scripted-latency bus for interlock tests.

use std::collections::VecDeque;

use mockall::mock;
use vrsim_core::common::constants::ICACHE_WORDS_PER_LINE;
use vrsim_core::config::Config;
use vrsim_core::soc::bus::{BusController, BusReply};
use vrsim_core::soc::memory::MemoryController;

mock! {
    pub Bus {}
    impl BusController for Bus {
        fn read(&mut self, paddr: u64, size: u8) -> BusReply<u64>;
        fn write(&mut self, paddr: u64, size: u8, data: u64, mask: u64) -> BusReply<()>;
        fn read_line(&mut self, paddr: u64) -> BusReply<[u32; ICACHE_WORDS_PER_LINE]>;
    }
}

/// Memory-backed bus that answers `Wait` from a script before completing.
///
/// Each data read/write pops the front of its wait queue: a non-zero value
/// becomes a `Wait` reply (the transaction must be re-presented), zero
/// completes immediately. Line fills are never deferred.
pub struct ScriptedBus {
    pub inner: MemoryController,
    pub read_waits: VecDeque<u64>,
    pub write_waits: VecDeque<u64>,
}

impl ScriptedBus {
    pub fn new(config: &Config) -> Self {
        Self {
            inner: MemoryController::new(config),
            read_waits: VecDeque::new(),
            write_waits: VecDeque::new(),
        }
    }
}

impl BusController for ScriptedBus {
    fn read(&mut self, paddr: u64, size: u8) -> BusReply<u64> {
        match self.read_waits.pop_front() {
            Some(wait) if wait > 0 => BusReply::Wait(wait),
            _ => self.inner.read(paddr, size),
        }
    }

    fn write(&mut self, paddr: u64, size: u8, data: u64, mask: u64) -> BusReply<()> {
        match self.write_waits.pop_front() {
            Some(wait) if wait > 0 => BusReply::Wait(wait),
            _ => self.inner.write(paddr, size, data, mask),
        }
    }

    fn read_line(&mut self, paddr: u64) -> BusReply<[u32; ICACHE_WORDS_PER_LINE]> {
        self.inner.read_line(paddr)
    }
}
