//! ALU execution tests through the pipeline: sign-extension rules, HI/LO
//! timing, and divide semantics.

use crate::common::asm;
use crate::common::harness::TestContext;

fn run_alu(program: &[u32], setup: &[(usize, u64)], cycles: u64) -> TestContext {
    let mut ctx = TestContext::new().load_program(0x1000, program);
    for &(reg, val) in setup {
        ctx.set_reg(reg, val);
    }
    ctx.run(cycles);
    ctx
}

#[test]
fn addu_sign_extends_the_word_result() {
    let ctx = run_alu(
        &[asm::addu(3, 1, 2), asm::nop()],
        &[(1, 0x7FFF_FFFF), (2, 1)],
        5,
    );
    assert_eq!(ctx.get_reg(3), 0xFFFF_FFFF_8000_0000);
}

#[test]
fn addu_wraps_without_fault() {
    let ctx = run_alu(
        &[asm::addu(3, 1, 2), asm::nop()],
        &[(1, 0xFFFF_FFFF), (2, 1)],
        5,
    );
    assert_eq!(ctx.get_reg(3), 0);
    assert!(!ctx.cpu().control.fault_present);
}

#[test]
fn subu_word_wraps_and_sign_extends() {
    let ctx = run_alu(&[asm::subu(3, 1, 2), asm::nop()], &[(1, 0), (2, 1)], 5);
    assert_eq!(ctx.get_reg(3), 0xFFFF_FFFF_FFFF_FFFF);
}

#[test]
fn daddu_keeps_all_64_bits() {
    let ctx = run_alu(
        &[asm::daddu(3, 1, 2), asm::nop()],
        &[(1, 0x7FFF_FFFF), (2, 1)],
        5,
    );
    assert_eq!(ctx.get_reg(3), 0x8000_0000);
}

#[test]
fn slt_and_sltu_disagree_on_sign() {
    let ctx = run_alu(
        &[asm::slt(3, 1, 2), asm::sltu(4, 1, 2), asm::nop()],
        &[(1, u64::MAX), (2, 1)], // -1 signed, huge unsigned
        8,
    );
    assert_eq!(ctx.get_reg(3), 1);
    assert_eq!(ctx.get_reg(4), 0);
}

#[test]
fn lui_builds_a_sign_extended_upper_half() {
    let ctx = run_alu(&[asm::lui(1, 0x8000), asm::nop()], &[], 5);
    assert_eq!(ctx.get_reg(1), 0xFFFF_FFFF_8000_0000);
}

#[test]
fn sra_is_arithmetic_on_the_word() {
    let ctx = run_alu(
        &[asm::sra(3, 1, 4), asm::nop()],
        &[(1, 0xFFFF_FFFF_8000_0000)],
        5,
    );
    assert_eq!(ctx.get_reg(3), 0xFFFF_FFFF_F800_0000);
}

#[test]
fn dsll32_shifts_into_the_upper_doubleword() {
    let ctx = run_alu(&[asm::dsll32(3, 1, 4), asm::nop()], &[(1, 0x9A)], 5);
    assert_eq!(ctx.get_reg(3), 0x9A << 36);
}

#[test]
fn nor_produces_the_complement_of_or() {
    let ctx = run_alu(
        &[asm::nor(3, 1, 2), asm::nop()],
        &[(1, 0xF0F0), (2, 0x0F0F)],
        5,
    );
    assert_eq!(ctx.get_reg(3), !0xFFFFu64);
}

/// HI/LO are written in EX, bypassing the writeback latch: the product is
/// architecturally visible two cycles before the instruction retires.
#[test]
fn mult_writes_hi_lo_at_execute_time() {
    let mut ctx = TestContext::new().load_program(0x1000, &[asm::mult(1, 2), asm::nop()]);
    ctx.set_reg(1, 0x10000);
    ctx.set_reg(2, 0x10000);

    // Cycle 3 is MULT's EX slot.
    ctx.run(3);
    assert_eq!(ctx.cpu().stats.instructions_retired, 0);
    assert_eq!(ctx.cpu().regs.hi(), 1);
    assert_eq!(ctx.cpu().regs.lo(), 0);
}

#[test]
fn mult_sign_extends_both_halves() {
    let ctx = run_alu(
        &[
            asm::mult(1, 2),
            asm::mfhi(3),
            asm::mflo(4),
            asm::nop(),
        ],
        &[(1, (-2i64) as u64), (2, 3)],
        10,
    );
    // -6: HI is the sign-extended high word, LO the sign-extended low.
    assert_eq!(ctx.get_reg(3), u64::MAX);
    assert_eq!(ctx.get_reg(4), (-6i64) as u64);
}

#[test]
fn dmultu_uses_a_128_bit_product() {
    let ctx = run_alu(
        &[
            asm::dmultu(1, 2),
            asm::mfhi(3),
            asm::mflo(4),
            asm::nop(),
        ],
        &[(1, u64::MAX), (2, u64::MAX)],
        10,
    );
    // (2^64 - 1)^2 = 2^128 - 2^65 + 1
    assert_eq!(ctx.get_reg(3), 0xFFFF_FFFF_FFFF_FFFE);
    assert_eq!(ctx.get_reg(4), 1);
}

#[test]
fn div_produces_quotient_in_lo_remainder_in_hi() {
    let ctx = run_alu(
        &[asm::div(1, 2), asm::mflo(3), asm::mfhi(4), asm::nop()],
        &[(1, 17), (2, 5)],
        10,
    );
    assert_eq!(ctx.get_reg(3), 3);
    assert_eq!(ctx.get_reg(4), 2);
}

#[test]
fn div_by_zero_follows_hardware_observed_results() {
    let ctx = run_alu(
        &[asm::div(1, 2), asm::mflo(3), asm::mfhi(4), asm::nop()],
        &[(1, 9), (2, 0)],
        10,
    );
    // Positive dividend: LO is 1, HI holds the dividend.
    assert_eq!(ctx.get_reg(3), 1);
    assert_eq!(ctx.get_reg(4), 9);
}
