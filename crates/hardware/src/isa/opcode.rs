//! Opcode identifiers, operand-need flags, and descriptors.
//!
//! One canonical enum covers every implemented instruction; the decode
//! tables map raw words onto it and the execute stage dispatches on it with
//! an exhaustive `match`, so adding a variant without wiring both sides is
//! a compile error.

/// Identifier for one implemented instruction.
///
/// Grouped by encoding family: SPECIAL (function field), REGIMM (rt field),
/// primary opcodes, and the COP0 sub-decodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Opcode {
    // SPECIAL
    /// Shift left logical (also the canonical NOP when the word is zero).
    Sll,
    /// Shift right logical.
    Srl,
    /// Shift right arithmetic.
    Sra,
    /// Shift left logical variable.
    Sllv,
    /// Shift right logical variable.
    Srlv,
    /// Shift right arithmetic variable.
    Srav,
    /// Jump register.
    Jr,
    /// Jump and link register.
    Jalr,
    /// System call fault.
    Syscall,
    /// Breakpoint fault.
    Break,
    /// Memory ordering barrier (architectural no-op here).
    Sync,
    /// Move from HI.
    Mfhi,
    /// Move to HI.
    Mthi,
    /// Move from LO.
    Mflo,
    /// Move to LO.
    Mtlo,
    /// Doubleword shift left logical variable.
    Dsllv,
    /// Doubleword shift right logical variable.
    Dsrlv,
    /// Doubleword shift right arithmetic variable.
    Dsrav,
    /// Multiply word (signed).
    Mult,
    /// Multiply word (unsigned).
    Multu,
    /// Divide word (signed).
    Div,
    /// Divide word (unsigned).
    Divu,
    /// Multiply doubleword (signed).
    Dmult,
    /// Multiply doubleword (unsigned).
    Dmultu,
    /// Divide doubleword (signed).
    Ddiv,
    /// Divide doubleword (unsigned).
    Ddivu,
    /// Add word, trapping on overflow.
    Add,
    /// Add word, no overflow trap.
    Addu,
    /// Subtract word, trapping on overflow.
    Sub,
    /// Subtract word, no overflow trap.
    Subu,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Bitwise NOR.
    Nor,
    /// Set on less than (signed).
    Slt,
    /// Set on less than (unsigned).
    Sltu,
    /// Add doubleword, trapping on overflow.
    Dadd,
    /// Add doubleword, no overflow trap.
    Daddu,
    /// Subtract doubleword, trapping on overflow.
    Dsub,
    /// Subtract doubleword, no overflow trap.
    Dsubu,
    /// Doubleword shift left logical.
    Dsll,
    /// Doubleword shift right logical.
    Dsrl,
    /// Doubleword shift right arithmetic.
    Dsra,
    /// Doubleword shift left logical plus 32.
    Dsll32,
    /// Doubleword shift right logical plus 32.
    Dsrl32,
    /// Doubleword shift right arithmetic plus 32.
    Dsra32,

    // REGIMM
    /// Branch on less than zero.
    Bltz,
    /// Branch on greater than or equal to zero.
    Bgez,
    /// Branch on less than zero likely.
    Bltzl,
    /// Branch on greater than or equal to zero likely.
    Bgezl,
    /// Branch on less than zero and link.
    Bltzal,
    /// Branch on greater than or equal to zero and link.
    Bgezal,
    /// Branch on less than zero and link likely.
    Bltzall,
    /// Branch on greater than or equal to zero and link likely.
    Bgezall,

    // Primary
    /// Jump.
    J,
    /// Jump and link.
    Jal,
    /// Branch on equal.
    Beq,
    /// Branch on not equal.
    Bne,
    /// Branch on less than or equal to zero.
    Blez,
    /// Branch on greater than zero.
    Bgtz,
    /// Add immediate word, trapping on overflow.
    Addi,
    /// Add immediate word, no overflow trap.
    Addiu,
    /// Set on less than immediate (signed).
    Slti,
    /// Set on less than immediate (unsigned).
    Sltiu,
    /// AND immediate (zero-extended).
    Andi,
    /// OR immediate (zero-extended).
    Ori,
    /// XOR immediate (zero-extended).
    Xori,
    /// Load upper immediate.
    Lui,
    /// Branch on equal likely.
    Beql,
    /// Branch on not equal likely.
    Bnel,
    /// Branch on less than or equal to zero likely.
    Blezl,
    /// Branch on greater than zero likely.
    Bgtzl,
    /// Add immediate doubleword, trapping on overflow.
    Daddi,
    /// Add immediate doubleword, no overflow trap.
    Daddiu,
    /// Load byte (sign-extended).
    Lb,
    /// Load byte unsigned.
    Lbu,
    /// Load halfword (sign-extended).
    Lh,
    /// Load halfword unsigned.
    Lhu,
    /// Load word (sign-extended).
    Lw,
    /// Load word unsigned.
    Lwu,
    /// Load word left (unaligned merge).
    Lwl,
    /// Load word right (unaligned merge).
    Lwr,
    /// Load doubleword.
    Ld,
    /// Load doubleword left (unaligned merge).
    Ldl,
    /// Load doubleword right (unaligned merge).
    Ldr,
    /// Store byte.
    Sb,
    /// Store halfword.
    Sh,
    /// Store word.
    Sw,
    /// Store word left (unaligned).
    Swl,
    /// Store word right (unaligned).
    Swr,
    /// Store doubleword.
    Sd,
    /// Store doubleword left (unaligned).
    Sdl,
    /// Store doubleword right (unaligned).
    Sdr,
    /// Cache maintenance.
    Cache,

    // COP0
    /// Move from CP0 (word, sign-extended).
    Mfc0,
    /// Move from CP0 (doubleword).
    Dmfc0,
    /// Move to CP0 (word).
    Mtc0,
    /// Move to CP0 (doubleword).
    Dmtc0,
    /// Read TLB entry at Index.
    Tlbr,
    /// Write TLB entry at Index.
    Tlbwi,
    /// Write TLB entry at Random.
    Tlbwr,
    /// Probe TLB for a matching entry.
    Tlbp,
    /// Return from exception.
    Eret,

    /// No known encoding. Funnels to the unimplemented-opcode policy.
    #[default]
    Invalid,
}

/// Operand-need and control-flow flags for one opcode.
///
/// The register-file stage uses `needs_rs`/`needs_rt` to decide which
/// latched operands must be freshened from in-flight results; the pipeline
/// uses `branch` to account for delay-slot control flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpcodeFlags {
    /// The instruction consumes the rs register value.
    pub needs_rs: bool,
    /// The instruction consumes the rt register value.
    pub needs_rt: bool,
    /// The instruction is a branch or jump with a delay slot.
    pub branch: bool,
}

/// A decoded instruction: opcode identifier plus its flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpcodeDescriptor {
    /// The opcode identifier.
    pub id: Opcode,
    /// Operand-need and branch flags.
    pub flags: OpcodeFlags,
}

impl Opcode {
    /// Returns the operand-need and branch flags for this opcode.
    pub const fn flags(self) -> OpcodeFlags {
        use Opcode::{
            Add, Addi, Addiu, Addu, And, Andi, Beq, Beql, Bgez, Bgezal, Bgezall, Bgezl, Bgtz,
            Bgtzl, Blez, Blezl, Bltz, Bltzal, Bltzall, Bltzl, Bne, Bnel, Cache, Dadd, Daddi,
            Daddiu, Daddu, Ddiv, Ddivu, Div, Divu, Dmult, Dmultu, Dsll, Dsll32, Dsllv, Dsra,
            Dsra32, Dsrav, Dsrl, Dsrl32, Dsrlv, Dsub, Dsubu, Dmtc0, J, Jal, Jalr, Jr, Lb, Lbu, Ld,
            Ldl, Ldr, Lh, Lhu, Lw, Lwl, Lwr, Lwu, Mthi, Mtlo, Mtc0, Mult, Multu, Nor, Or, Ori, Sb,
            Sd, Sdl, Sdr, Sh, Sll, Slt, Slti, Sltiu, Sltu, Sra, Srav, Srl, Srlv, Sub, Subu, Sw,
            Swl, Swr, Sllv, Xor, Xori,
        };
        let needs_rs = matches!(
            self,
            Add | Addu
                | Sub
                | Subu
                | And
                | Or
                | Xor
                | Nor
                | Slt
                | Sltu
                | Dadd
                | Daddu
                | Dsub
                | Dsubu
                | Sllv
                | Srlv
                | Srav
                | Dsllv
                | Dsrlv
                | Dsrav
                | Mult
                | Multu
                | Div
                | Divu
                | Dmult
                | Dmultu
                | Ddiv
                | Ddivu
                | Mthi
                | Mtlo
                | Jr
                | Jalr
                | Addi
                | Addiu
                | Daddi
                | Daddiu
                | Slti
                | Sltiu
                | Andi
                | Ori
                | Xori
                | Beq
                | Bne
                | Beql
                | Bnel
                | Blez
                | Bgtz
                | Blezl
                | Bgtzl
                | Bltz
                | Bgez
                | Bltzl
                | Bgezl
                | Bltzal
                | Bgezal
                | Bltzall
                | Bgezall
                | Lb
                | Lbu
                | Lh
                | Lhu
                | Lw
                | Lwu
                | Lwl
                | Lwr
                | Ld
                | Ldl
                | Ldr
                | Sb
                | Sh
                | Sw
                | Swl
                | Swr
                | Sd
                | Sdl
                | Sdr
                | Cache
        );
        let needs_rt = matches!(
            self,
            Add | Addu
                | Sub
                | Subu
                | And
                | Or
                | Xor
                | Nor
                | Slt
                | Sltu
                | Dadd
                | Daddu
                | Dsub
                | Dsubu
                | Sll
                | Srl
                | Sra
                | Sllv
                | Srlv
                | Srav
                | Dsll
                | Dsrl
                | Dsra
                | Dsll32
                | Dsrl32
                | Dsra32
                | Dsllv
                | Dsrlv
                | Dsrav
                | Mult
                | Multu
                | Div
                | Divu
                | Dmult
                | Dmultu
                | Ddiv
                | Ddivu
                | Beq
                | Bne
                | Beql
                | Bnel
                | Lwl
                | Lwr
                | Ldl
                | Ldr
                | Sb
                | Sh
                | Sw
                | Swl
                | Swr
                | Sd
                | Sdl
                | Sdr
                | Mtc0
                | Dmtc0
        );
        let branch = matches!(
            self,
            J | Jal
                | Jr
                | Jalr
                | Beq
                | Bne
                | Blez
                | Bgtz
                | Beql
                | Bnel
                | Blezl
                | Bgtzl
                | Bltz
                | Bgez
                | Bltzl
                | Bgezl
                | Bltzal
                | Bgezal
                | Bltzall
                | Bgezall
        );
        OpcodeFlags {
            needs_rs,
            needs_rt,
            branch,
        }
    }

    /// Builds the descriptor for this opcode.
    pub const fn descriptor(self) -> OpcodeDescriptor {
        OpcodeDescriptor {
            id: self,
            flags: self.flags(),
        }
    }
}
