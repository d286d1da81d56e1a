//! Interlock tests: uncached-fetch latency, bus-deferred transactions,
//! and the no-mutation-during-stall guarantee.

use vrsim_core::Simulator;
use vrsim_core::core::arch::cp0::index;

use crate::common::asm;
use crate::common::harness::{KSEG0, TestContext, test_config};
use crate::common::mocks::bus::ScriptedBus;

/// An uncached fetch stalls for exactly the configured cycle count, and
/// nothing guest-visible mutates during the stall.
#[test]
fn uncached_fetch_stalls_for_configured_latency() {
    let mut ctx = TestContext::new().load_program_uncached(0x1000, &[asm::ori(1, 0, 7)]);

    // Detection cycle: the interlock is entered, nothing fetched yet.
    ctx.run(1);
    assert_eq!(ctx.cpu().control.cycles_to_stall, 50);
    assert_eq!(ctx.cpu().stats.interlocks_uncached, 1);
    assert!(!ctx.cpu().ic_rf.header.valid);

    // Every stall cycle only moves the counter.
    let pc_before = ctx.cpu().fetch_pc;
    for remaining in (0..50).rev() {
        ctx.run(1);
        assert_eq!(ctx.cpu().control.cycles_to_stall, remaining);
        assert_eq!(ctx.cpu().fetch_pc, pc_before);
        assert!(!ctx.cpu().ic_rf.header.valid);
        assert_eq!(ctx.get_reg(1), 0);
    }

    // Resumption cycle: the fetch completes.
    ctx.run(1);
    assert!(ctx.cpu().ic_rf.header.valid);
    assert_eq!(ctx.cpu().ic_rf.word, asm::ori(1, 0, 7));
}

/// With a short configured latency, uncached code executes to completion,
/// one interlock per instruction word.
#[test]
fn uncached_code_executes_with_per_word_interlocks() {
    let mut config = test_config();
    config.timing.uncached_fetch_latency = 3;
    let program = [asm::ori(1, 0, 5), asm::addiu(2, 1, 7), asm::nop()];
    let mut ctx = TestContext::with_config(&config).load_program_uncached(0x2000, &program);

    ctx.run(60);
    assert_eq!(ctx.get_reg(1), 5);
    assert_eq!(ctx.get_reg(2), 12);
    assert!(ctx.cpu().stats.interlocks_uncached >= 3);
}

/// A bus `Wait` on a data access stalls the pipeline, holds the request
/// for retry, and re-presents the same transaction after the delay; the
/// interlock never changes PC or Status.
#[test]
fn deferred_data_read_retries_after_the_wait() {
    let config = test_config();
    let program = [asm::lw(4, 1, 0), asm::nop(), asm::nop()];

    let mut bus = ScriptedBus::new(&config);
    for (i, word) in program.iter().enumerate() {
        bus.inner.poke_word(0x1000 + 4 * i as u64, *word);
    }
    bus.inner.poke_word(0x3000, 0xCAFE_F00D);
    bus.read_waits.push_back(6);

    let mut sim = Simulator::new(Box::new(bus), &config);
    sim.tick().unwrap();
    sim.cpu.regs.write(1, KSEG0 + 0x3000);
    sim.cpu.fetch_pc = KSEG0 + 0x1000;

    // LW reaches DC at cycle 4 and meets the deferred bus.
    sim.run(4).unwrap();
    assert_eq!(sim.cpu.control.cycles_to_stall, 6);
    assert!(sim.cpu.ex_dc.request.is_some(), "request held for retry");
    let status_before = sim.cpu.cp0.read(index::STATUS);
    let pc_before = sim.cpu.fetch_pc;

    // Stall cycles change neither Status nor the fetch PC.
    sim.run(6).unwrap();
    assert_eq!(sim.cpu.cp0.read(index::STATUS), status_before);
    assert_eq!(sim.cpu.fetch_pc, pc_before);

    // Retry completes; the load retires on the following writeback.
    sim.run(3).unwrap();
    assert_eq!(sim.cpu.regs.read(4), 0xFFFF_FFFF_CAFE_F00D);
    assert_eq!(sim.cpu.stats.interlocks_bus, 1);
}
