//! Reference memory controller: flat RAM plus a boot ROM window.
//!
//! Implements [`BusController`] with big-endian byte lanes and an optional
//! fixed transaction latency: the first presentation of a transaction
//! answers [`BusReply::Wait`] and the retry completes. A latency of zero
//! answers everything immediately, which is what the test harness uses.
//!
//! Reads outside both windows return zeros (open bus); writes outside RAM
//! are discarded with a diagnostic. Physical decode errors are not faults:
//! by the time an address reaches the bus it has already passed segment
//! resolution.

use crate::common::constants::{ICACHE_WORDS_PER_LINE, ROM_PHYS_BASE};
use crate::config::Config;
use crate::soc::bus::{BusController, BusReply};

/// Flat RAM at physical zero plus a read-only boot ROM window.
pub struct MemoryController {
    ram: Vec<u8>,
    rom: Vec<u8>,
    latency: u64,
    pending: Option<u64>,
}

impl MemoryController {
    /// Creates a controller sized per the configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            ram: vec![0; config.general.ram_size],
            rom: vec![0; config.general.rom_size],
            latency: config.timing.bus_latency,
            pending: None,
        }
    }

    /// Copies a ROM image into the boot window.
    ///
    /// Images longer than the window are truncated with a diagnostic.
    pub fn load_rom(&mut self, image: &[u8]) {
        let len = image.len().min(self.rom.len());
        if len < image.len() {
            tracing::warn!(
                image = image.len(),
                window = self.rom.len(),
                "rom image truncated to window size"
            );
        }
        self.rom[..len].copy_from_slice(&image[..len]);
    }

    /// Writes a word directly into RAM, bypassing latency. Test and loader
    /// convenience; not a bus transaction.
    pub fn poke_word(&mut self, paddr: u64, word: u32) {
        for i in 0..4 {
            let byte = (word >> (8 * (3 - i))) as u8;
            if let Some(slot) = self.ram.get_mut(paddr as usize + i as usize) {
                *slot = byte;
            }
        }
    }

    /// Reads one byte from the physical map.
    fn byte(&self, paddr: u64) -> u8 {
        if let Some(b) = self.ram.get(paddr as usize) {
            *b
        } else if paddr >= ROM_PHYS_BASE {
            self.rom
                .get((paddr - ROM_PHYS_BASE) as usize)
                .copied()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// One Wait per new transaction when latency is configured.
    fn gate(&mut self, paddr: u64) -> Option<u64> {
        if self.latency == 0 {
            return None;
        }
        if self.pending.take() == Some(paddr) {
            return None;
        }
        self.pending = Some(paddr);
        Some(self.latency)
    }
}

impl BusController for MemoryController {
    fn read(&mut self, paddr: u64, size: u8) -> BusReply<u64> {
        if let Some(wait) = self.gate(paddr) {
            return BusReply::Wait(wait);
        }
        let mut value = 0u64;
        for i in 0..u64::from(size) {
            value = (value << 8) | u64::from(self.byte(paddr + i));
        }
        BusReply::Data(value)
    }

    fn write(&mut self, paddr: u64, size: u8, data: u64, mask: u64) -> BusReply<()> {
        if let Some(wait) = self.gate(paddr) {
            return BusReply::Wait(wait);
        }
        if paddr as usize >= self.ram.len() {
            tracing::debug!(paddr = %format_args!("{paddr:#x}"), "write outside ram discarded");
            return BusReply::Data(());
        }
        for i in 0..u64::from(size) {
            let lane = 8 * (u64::from(size) - 1 - i);
            if (mask >> lane) & 0xFF != 0 {
                if let Some(slot) = self.ram.get_mut((paddr + i) as usize) {
                    *slot = (data >> lane) as u8;
                }
            }
        }
        BusReply::Data(())
    }

    fn read_line(&mut self, paddr: u64) -> BusReply<[u32; ICACHE_WORDS_PER_LINE]> {
        if let Some(wait) = self.gate(paddr) {
            return BusReply::Wait(wait);
        }
        let mut line = [0u32; ICACHE_WORDS_PER_LINE];
        for (w, slot) in line.iter_mut().enumerate() {
            let base = paddr + 4 * w as u64;
            let mut word = 0u32;
            for i in 0..4 {
                word = (word << 8) | u32::from(self.byte(base + i));
            }
            *slot = word;
        }
        BusReply::Data(line)
    }
}

impl std::fmt::Debug for MemoryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryController")
            .field("ram_bytes", &self.ram.len())
            .field("rom_bytes", &self.rom.len())
            .field("latency", &self.latency)
            .finish()
    }
}
