//! Instruction decoder.
//!
//! Two-level static-table dispatch: the primary 6-bit opcode field selects
//! either an instruction directly or one of the SPECIAL/REGIMM/COP0 groups,
//! which decode on their function, rt, or rs fields. Flat tables rather
//! than nested conditionals: decode latency is uniform and exhaustiveness
//! is testable by sweeping the table domains.
//!
//! Field accessors for the fixed 32-bit encoding live here too, so every
//! consumer extracts operands the same way.

use crate::isa::opcode::{Opcode, OpcodeDescriptor};

/// Primary opcode field (bits 31:26).
#[inline(always)]
pub const fn primary(word: u32) -> u32 {
    word >> 26
}

/// Source register field rs (bits 25:21).
#[inline(always)]
pub const fn rs(word: u32) -> usize {
    ((word >> 21) & 0x1F) as usize
}

/// Source/target register field rt (bits 20:16).
#[inline(always)]
pub const fn rt(word: u32) -> usize {
    ((word >> 16) & 0x1F) as usize
}

/// Destination register field rd (bits 15:11).
#[inline(always)]
pub const fn rd(word: u32) -> usize {
    ((word >> 11) & 0x1F) as usize
}

/// Shift amount field sa (bits 10:6).
#[inline(always)]
pub const fn sa(word: u32) -> u32 {
    (word >> 6) & 0x1F
}

/// Function field (bits 5:0) of the SPECIAL and COP0 groups.
#[inline(always)]
pub const fn funct(word: u32) -> u32 {
    word & 0x3F
}

/// Immediate field, zero-extended.
#[inline(always)]
pub const fn imm16(word: u32) -> u64 {
    (word & 0xFFFF) as u64
}

/// Immediate field, sign-extended to 64 bits.
#[inline(always)]
pub const fn simm16(word: u32) -> u64 {
    word as u16 as i16 as u64
}

/// Jump target field (bits 25:0).
#[inline(always)]
pub const fn target26(word: u32) -> u64 {
    (word & 0x03FF_FFFF) as u64
}

/// Byte size of the narrow load/store family, from the primary opcode's low
/// bits: `size = ((word >> 26) & 3) + 1`.
#[inline(always)]
pub const fn narrow_size(word: u32) -> u8 {
    ((primary(word) & 3) + 1) as u8
}

const I: Opcode = Opcode::Invalid;

/// SPECIAL group, indexed by the function field.
static SPECIAL: [Opcode; 64] = {
    use Opcode::{
        Add, Addu, And, Break, Dadd, Daddu, Ddiv, Ddivu, Div, Divu, Dmult, Dmultu, Dsll, Dsll32,
        Dsllv, Dsra, Dsra32, Dsrav, Dsrl, Dsrl32, Dsrlv, Dsub, Dsubu, Jalr, Jr, Mfhi, Mflo, Mthi,
        Mtlo, Mult, Multu, Nor, Or, Sll, Sllv, Slt, Sltu, Sra, Srav, Srl, Srlv, Sub, Subu, Sync,
        Syscall, Xor,
    };
    [
        Sll, I, Srl, Sra, Sllv, I, Srlv, Srav, // 0x00-0x07
        Jr, Jalr, I, I, Syscall, Break, I, Sync, // 0x08-0x0F
        Mfhi, Mthi, Mflo, Mtlo, Dsllv, I, Dsrlv, Dsrav, // 0x10-0x17
        Mult, Multu, Div, Divu, Dmult, Dmultu, Ddiv, Ddivu, // 0x18-0x1F
        Add, Addu, Sub, Subu, And, Or, Xor, Nor, // 0x20-0x27
        I, I, Slt, Sltu, Dadd, Daddu, Dsub, Dsubu, // 0x28-0x2F
        I, I, I, I, I, I, I, I, // 0x30-0x37 (trap group unimplemented)
        Dsll, I, Dsrl, Dsra, Dsll32, I, Dsrl32, Dsra32, // 0x38-0x3F
    ]
};

/// REGIMM group, indexed by the rt field.
static REGIMM: [Opcode; 32] = {
    use Opcode::{Bgez, Bgezal, Bgezall, Bgezl, Bltz, Bltzal, Bltzall, Bltzl};
    [
        Bltz, Bgez, Bltzl, Bgezl, I, I, I, I, // 0x00-0x07
        I, I, I, I, I, I, I, I, // 0x08-0x0F
        Bltzal, Bgezal, Bltzall, Bgezall, I, I, I, I, // 0x10-0x17
        I, I, I, I, I, I, I, I, // 0x18-0x1F
    ]
};

/// Primary opcode table. Slots 0x00, 0x01, and 0x10 are group escapes and
/// never consulted; they hold `Invalid` so a table sweep stays total.
static PRIMARY: [Opcode; 64] = {
    use Opcode::{
        Addi, Addiu, Andi, Beq, Beql, Bgtz, Bgtzl, Blez, Blezl, Bne, Bnel, Cache, Daddi, Daddiu,
        J, Jal, Lb, Lbu, Ld, Ldl, Ldr, Lh, Lhu, Lui, Lw, Lwl, Lwr, Lwu, Ori, Sb, Sd, Sdl, Sdr, Sh,
        Slti, Sltiu, Sw, Swl, Swr, Xori,
    };
    [
        I, I, J, Jal, Beq, Bne, Blez, Bgtz, // 0x00-0x07
        Addi, Addiu, Slti, Sltiu, Andi, Ori, Xori, Lui, // 0x08-0x0F
        I, I, I, I, Beql, Bnel, Blezl, Bgtzl, // 0x10-0x17 (COP0 escapes, CP1/CP2 unimplemented)
        Daddi, Daddiu, Ldl, Ldr, I, I, I, I, // 0x18-0x1F
        Lb, Lh, Lwl, Lw, Lbu, Lhu, Lwr, Lwu, // 0x20-0x27
        Sb, Sh, Swl, Sw, Sdl, Sdr, Swr, Cache, // 0x28-0x2F
        I, I, I, I, I, I, I, Ld, // 0x30-0x37 (LL/LLD outside this machine's workloads)
        I, I, I, I, I, I, I, Sd, // 0x38-0x3F
    ]
};

/// rs field values of the COP0 move sub-decodes.
mod cop0_rs {
    /// MFC0.
    pub const MF: usize = 0x00;
    /// DMFC0.
    pub const DMF: usize = 0x01;
    /// MTC0.
    pub const MT: usize = 0x04;
    /// DMTC0.
    pub const DMT: usize = 0x05;
    /// First CO-operation encoding (function field decodes).
    pub const CO_BASE: usize = 0x10;
}

/// Function field values of the COP0 CO operations.
mod cop0_funct {
    /// TLBR.
    pub const TLBR: u32 = 0x01;
    /// TLBWI.
    pub const TLBWI: u32 = 0x02;
    /// TLBWR.
    pub const TLBWR: u32 = 0x06;
    /// TLBP.
    pub const TLBP: u32 = 0x08;
    /// ERET.
    pub const ERET: u32 = 0x18;
}

const fn decode_cop0(word: u32) -> Opcode {
    match rs(word) {
        cop0_rs::MF => Opcode::Mfc0,
        cop0_rs::DMF => Opcode::Dmfc0,
        cop0_rs::MT => Opcode::Mtc0,
        cop0_rs::DMT => Opcode::Dmtc0,
        r if r >= cop0_rs::CO_BASE => match funct(word) {
            cop0_funct::TLBR => Opcode::Tlbr,
            cop0_funct::TLBWI => Opcode::Tlbwi,
            cop0_funct::TLBWR => Opcode::Tlbwr,
            cop0_funct::TLBP => Opcode::Tlbp,
            cop0_funct::ERET => Opcode::Eret,
            _ => Opcode::Invalid,
        },
        _ => Opcode::Invalid,
    }
}

/// Decodes a raw instruction word into an opcode descriptor.
///
/// Words that match no encoding decode to [`Opcode::Invalid`]; policy for
/// those (tolerate as no-op or abort the run) belongs to the register-file
/// stage, not the decoder.
pub fn decode(word: u32) -> OpcodeDescriptor {
    let id = match primary(word) {
        0x00 => SPECIAL[funct(word) as usize],
        0x01 => REGIMM[rt(word)],
        0x10 => decode_cop0(word),
        p => PRIMARY[p as usize],
    };
    id.descriptor()
}
