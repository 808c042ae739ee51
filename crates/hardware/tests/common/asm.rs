//! Tiny assembler for test programs.
//!
//! Register conventions of the machine: R0 reads zero, R1 reads the
//! instruction's own sign-extended immediate, so `add rd, r0, r1` is the
//! idiomatic load-immediate and word addresses are formed as `rs + rt`.

use quadsim_core::isa::{Instruction, Opcode};

/// Encodes one instruction word.
pub fn encode(opcode: Opcode, rd: u8, rs: u8, rt: u8, imm: i16) -> u32 {
    Instruction {
        opcode,
        rd,
        rs,
        rt,
        imm,
    }
    .encode()
}

/// `add rd, rs, rt`.
pub fn add(rd: u8, rs: u8, rt: u8) -> u32 {
    encode(Opcode::Add, rd, rs, rt, 0)
}

/// Load-immediate idiom: `add rd, r0, r1` with the immediate in the word.
pub fn add_imm(rd: u8, imm: i16) -> u32 {
    encode(Opcode::Add, rd, 0, 1, imm)
}

/// `lw rd, [rs + rt]`.
pub fn lw(rd: u8, rs: u8, rt: u8, imm: i16) -> u32 {
    encode(Opcode::Lw, rd, rs, rt, imm)
}

/// `sw [rs + rt], rd`.
pub fn sw(rd: u8, rs: u8, rt: u8, imm: i16) -> u32 {
    encode(Opcode::Sw, rd, rs, rt, imm)
}

/// `beq rs, rt -> rd` (jump target is the value of `rd`).
pub fn beq(rd: u8, rs: u8, rt: u8) -> u32 {
    encode(Opcode::Beq, rd, rs, rt, 0)
}

/// `jal rd` (jump to the value of `rd`, link in R15).
pub fn jal(rd: u8) -> u32 {
    encode(Opcode::Jal, rd, 0, 0, 0)
}

/// `halt`.
pub fn halt() -> u32 {
    encode(Opcode::Halt, 0, 0, 0, 0)
}

/// The all-zero word, which decodes to `add r0, r0, r0`.
pub fn nop() -> u32 {
    0
}
