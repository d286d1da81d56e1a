//! Load/store execution tests: big-endian lanes, extension rules,
//! unaligned merges, and alignment faults.

use vrsim_core::core::arch::cp0::index;

use crate::common::asm;
use crate::common::harness::{KSEG0, TestContext};

fn ctx_with_data(program: &[u32], data_phys: u64, words: &[u32]) -> TestContext {
    let mut ctx = TestContext::new().load_program(0x1000, program);
    ctx.poke_words(data_phys, words);
    // r20 is the conventional data base in these tests.
    ctx.set_reg(20, KSEG0 + data_phys);
    ctx
}

#[test]
fn sw_then_lw_roundtrip() {
    let program = [
        asm::sw(1, 20, 0),
        asm::lw(2, 20, 0),
        asm::nop(),
        asm::nop(),
    ];
    let mut ctx = ctx_with_data(&program, 0x3000, &[0]);
    ctx.set_reg(1, 0x1234_5678);

    ctx.run(10);
    assert_eq!(ctx.get_reg(2), 0x1234_5678);
}

#[test]
fn memory_is_big_endian() {
    let program = [
        asm::lbu(1, 20, 0),
        asm::lbu(2, 20, 3),
        asm::lh(3, 20, 0),
        asm::nop(),
    ];
    let mut ctx = ctx_with_data(&program, 0x3000, &[0x1122_3344]);

    ctx.run(12);
    assert_eq!(ctx.get_reg(1), 0x11, "byte 0 is the most significant");
    assert_eq!(ctx.get_reg(2), 0x44);
    assert_eq!(ctx.get_reg(3), 0x1122);
}

#[test]
fn lb_sign_extends_lbu_does_not() {
    let program = [asm::lb(1, 20, 0), asm::lbu(2, 20, 0), asm::nop()];
    let mut ctx = ctx_with_data(&program, 0x3000, &[0x8000_0000]);

    ctx.run(10);
    assert_eq!(ctx.get_reg(1), 0xFFFF_FFFF_FFFF_FF80);
    assert_eq!(ctx.get_reg(2), 0x80);
}

#[test]
fn lw_sign_extends_into_64_bits() {
    let program = [asm::lw(1, 20, 0), asm::nop()];
    let mut ctx = ctx_with_data(&program, 0x3000, &[0x8765_4321]);

    ctx.run(8);
    assert_eq!(ctx.get_reg(1), 0xFFFF_FFFF_8765_4321);
}

#[test]
fn ld_and_sd_move_doublewords() {
    let program = [
        asm::sd(1, 20, 0),
        asm::ld(2, 20, 0),
        asm::nop(),
        asm::nop(),
    ];
    let mut ctx = ctx_with_data(&program, 0x3000, &[0, 0]);
    ctx.set_reg(1, 0x0123_4567_89AB_CDEF);

    ctx.run(10);
    assert_eq!(ctx.get_reg(2), 0x0123_4567_89AB_CDEF);
}

#[test]
fn sb_writes_only_its_byte_lane() {
    let program = [
        asm::sb(1, 20, 1),
        asm::lw(2, 20, 0),
        asm::nop(),
        asm::nop(),
    ];
    let mut ctx = ctx_with_data(&program, 0x3000, &[0xAABB_CCDD]);
    ctx.set_reg(1, 0xEE);

    ctx.run(10);
    assert_eq!(ctx.get_reg(2), 0xFFFF_FFFF_AAEE_CCDD);
}

#[test]
fn sh_writes_its_halfword_lane() {
    let program = [
        asm::sh(1, 20, 2),
        asm::lw(2, 20, 0),
        asm::nop(),
        asm::nop(),
    ];
    let mut ctx = ctx_with_data(&program, 0x3000, &[0xAABB_CCDD]);
    ctx.set_reg(1, 0x1234);

    ctx.run(10);
    assert_eq!(ctx.get_reg(2), 0xFFFF_FFFF_AABB_1234);
}

#[test]
fn lwl_merges_the_left_bytes() {
    // Word at base: 0xAABBCCDD. LWL at offset 1 takes bytes 1..3 into the
    // upper lanes of rt, keeping rt's lowest byte.
    let program = [asm::lwl(1, 20, 1), asm::nop()];
    let mut ctx = ctx_with_data(&program, 0x3000, &[0xAABB_CCDD]);
    ctx.set_reg(1, 0x1122_3344);

    ctx.run(8);
    assert_eq!(ctx.get_reg(1), 0xFFFF_FFFF_BBCC_DD44);
}

#[test]
fn lwr_merges_the_right_bytes() {
    // LWR's addressed byte becomes rt's least-significant byte; bytes
    // from the word start fill toward it. Offset 2 pulls AA BB CC.
    let program = [asm::lwr(1, 20, 2), asm::nop()];
    let mut ctx = ctx_with_data(&program, 0x3000, &[0xAABB_CCDD]);
    ctx.set_reg(1, 0x1122_3344);

    ctx.run(8);
    assert_eq!(ctx.get_reg(1), 0x11AA_BBCC);
}

#[test]
fn lwl_lwr_pair_assembles_an_unaligned_word() {
    // Unaligned word at base+1: bytes BB CC DD EE.
    let program = [
        asm::lwl(1, 20, 1),
        asm::lwr(1, 20, 4),
        asm::nop(),
        asm::nop(),
    ];
    let mut ctx = ctx_with_data(&program, 0x3000, &[0xAABB_CCDD, 0xEEFF_0011]);

    ctx.run(10);
    assert_eq!(ctx.get_reg(1) as u32, 0xBBCC_DDEE);
}

#[test]
fn load_use_dependency_forwards_the_loaded_value() {
    let program = [
        asm::lw(1, 20, 0),
        asm::addiu(2, 1, 1), // consumes the load in the next slot
        asm::nop(),
        asm::nop(),
    ];
    let mut ctx = ctx_with_data(&program, 0x3000, &[41]);

    ctx.run(10);
    assert_eq!(ctx.get_reg(2), 42);
}

#[test]
fn misaligned_lw_raises_address_error_with_bad_vaddr() {
    let program = [asm::lw(1, 20, 2), asm::nop()];
    let mut ctx = ctx_with_data(&program, 0x3000, &[0]);

    ctx.run(6);
    assert_eq!(ctx.cpu().cp0.read(index::CAUSE), 4 << 2);
    assert_eq!(ctx.cpu().cp0.read(index::BAD_VADDR), KSEG0 + 0x3002);
    assert_eq!(ctx.get_reg(1), 0);
}

#[test]
fn misaligned_sw_raises_store_address_error() {
    let program = [asm::sw(1, 20, 1), asm::nop()];
    let mut ctx = ctx_with_data(&program, 0x3000, &[0]);

    ctx.run(6);
    assert_eq!(ctx.cpu().cp0.read(index::CAUSE), 5 << 2);
}

/// CACHE Index_Invalidate forces the next fetch of that line to miss and
/// refill.
#[test]
fn cache_index_invalidate_forces_a_refill() {
    let program = [
        asm::cache(0, 20, 0), // invalidate the line at r20's index
        asm::nop(),
        asm::nop(),
    ];
    let mut ctx = ctx_with_data(&program, 0x3000, &[0]);

    let misses_before = ctx.cpu().stats.icache_misses;
    ctx.run(8);
    // The program line itself was fetched; invalidating 0x3000's line
    // does not fault and the machine keeps running.
    assert!(ctx.cpu().stats.icache_misses >= misses_before);
    assert!(!ctx.cpu().control.fault_present);
}
