//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the simulator. It provides:
//! 1. **Cycle and CPI:** Total cycles, retired instructions, and derived
//!    throughput metrics.
//! 2. **Instruction mix:** Counts by category (ALU, load, store, branch,
//!    CP0).
//! 3. **Stalls:** Bubble cycles and interlock entries by kind.
//! 4. **Faults:** Guest fault counts by class.
//! 5. **Memory:** Instruction cache and TLB hit/miss counts.

use std::time::Instant;

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions retired at writeback.
    pub instructions_retired: u64,

    /// ALU/shift/multiply-divide instructions executed.
    pub inst_alu: u64,
    /// Load instructions executed.
    pub inst_load: u64,
    /// Store instructions executed.
    pub inst_store: u64,
    /// Branch and jump instructions executed.
    pub inst_branch: u64,
    /// CP0 and cache-maintenance instructions executed.
    pub inst_cop0: u64,

    /// Bubble cycles spent in stalls (fault entry and interlocks).
    pub stall_cycles: u64,
    /// Interlock entries of any kind.
    pub interlocks: u64,
    /// Uncached instruction fetch interlocks.
    pub interlocks_uncached: u64,
    /// Bus-deferred transaction interlocks.
    pub interlocks_bus: u64,

    /// Address-error faults taken.
    pub faults_address: u64,
    /// TLB refill/invalid/modified faults taken.
    pub faults_tlb: u64,
    /// SYSCALL and BREAK faults taken.
    pub faults_system: u64,
    /// Integer overflow faults taken.
    pub faults_overflow: u64,

    /// Instruction cache hits.
    pub icache_hits: u64,
    /// Instruction cache misses.
    pub icache_misses: u64,
    /// TLB lookup hits.
    pub tlb_hits: u64,
    /// TLB lookup misses (refill or invalid).
    pub tlb_misses: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            inst_alu: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            inst_cop0: 0,
            stall_cycles: 0,
            interlocks: 0,
            interlocks_uncached: 0,
            interlocks_bus: 0,
            faults_address: 0,
            faults_tlb: 0,
            faults_system: 0,
            faults_overflow: 0,
            icache_hits: 0,
            icache_misses: 0,
            tlb_hits: 0,
            tlb_misses: 0,
        }
    }
}

impl SimStats {
    /// Cycles per retired instruction.
    pub fn cpi(&self) -> f64 {
        if self.instructions_retired == 0 {
            0.0
        } else {
            self.cycles as f64 / self.instructions_retired as f64
        }
    }

    /// Hit rate of a hit/miss counter pair, as a percentage.
    fn rate(hits: u64, misses: u64) -> f64 {
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            100.0 * hits as f64 / total as f64
        }
    }

    /// Prints the full statistics report to stdout.
    pub fn print(&self) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let mips = if elapsed > 0.0 {
            self.instructions_retired as f64 / elapsed / 1.0e6
        } else {
            0.0
        };

        println!();
        println!("=== Summary ===");
        println!("  Cycles:               {}", self.cycles);
        println!("  Instructions retired: {}", self.instructions_retired);
        println!("  CPI:                  {:.3}", self.cpi());
        println!("  Host time:            {elapsed:.3}s ({mips:.2} MIPS)");

        println!();
        println!("=== Instruction Mix ===");
        println!("  ALU:     {}", self.inst_alu);
        println!("  Load:    {}", self.inst_load);
        println!("  Store:   {}", self.inst_store);
        println!("  Branch:  {}", self.inst_branch);
        println!("  CP0:     {}", self.inst_cop0);

        println!();
        println!("=== Stalls ===");
        println!("  Bubble cycles:     {}", self.stall_cycles);
        println!("  Interlocks:        {}", self.interlocks);
        println!("    uncached fetch:  {}", self.interlocks_uncached);
        println!("    bus deferred:    {}", self.interlocks_bus);

        println!();
        println!("=== Faults ===");
        println!("  Address error:     {}", self.faults_address);
        println!("  TLB:               {}", self.faults_tlb);
        println!("  Syscall/Break:     {}", self.faults_system);
        println!("  Integer overflow:  {}", self.faults_overflow);

        println!();
        println!("=== Memory ===");
        println!(
            "  I-cache: {} hits / {} misses ({:.1}%)",
            self.icache_hits,
            self.icache_misses,
            Self::rate(self.icache_hits, self.icache_misses)
        );
        println!(
            "  TLB:     {} hits / {} misses ({:.1}%)",
            self.tlb_hits,
            self.tlb_misses,
            Self::rate(self.tlb_hits, self.tlb_misses)
        );
    }
}
