//! Instruction codec tests.
//!
//! The word layout is `[opcode:8][rd:4][rs:4][rt:4][imm:12]` with the
//! immediate sign-extended at decode. Since the five fields cover all 32
//! bits, decode followed by encode must reproduce any word exactly —
//! including words whose opcode has no assigned operation.

use proptest::prelude::*;
use quadsim_core::isa::{Instruction, Opcode};

#[test]
fn decode_splits_fields() {
    // add $r3, $r5, $r7 with imm 0x123
    let word = 0x00_3_5_7_123;
    let inst = Instruction::decode(word);
    assert_eq!(inst.opcode, Opcode::Add);
    assert_eq!(inst.rd, 3);
    assert_eq!(inst.rs, 5);
    assert_eq!(inst.rt, 7);
    assert_eq!(inst.imm, 0x123);
}

#[test]
fn immediate_sign_extends_from_12_bits() {
    let negative = Instruction::decode(0x0000_0800);
    assert_eq!(negative.imm, -2048);
    assert_eq!(negative.imm_value(), 0xFFFF_F800);

    let positive = Instruction::decode(0x0000_07FF);
    assert_eq!(positive.imm, 2047);
    assert_eq!(positive.imm_value(), 0x0000_07FF);

    let minus_one = Instruction::decode(0x0000_0FFF);
    assert_eq!(minus_one.imm, -1);
    assert_eq!(minus_one.imm_value(), 0xFFFF_FFFF);
}

#[test]
fn opcode_codes_round_trip() {
    for code in 0u8..=255 {
        assert_eq!(Opcode::from_code(code).code(), code);
    }
}

#[test]
fn unassigned_codes_decode_to_illegal() {
    assert_eq!(Opcode::from_code(18), Opcode::Illegal(18));
    assert_eq!(Opcode::from_code(19), Opcode::Illegal(19));
    assert_eq!(Opcode::from_code(21), Opcode::Illegal(21));
    assert_eq!(Opcode::from_code(20), Opcode::Halt);
}

#[test]
fn classification_follows_opcode() {
    let lw = Instruction::decode(0x10_2_3_4_000);
    assert!(lw.is_load());
    assert!(lw.writes_register());
    assert_eq!(lw.dest_register(), 2);

    let sw = Instruction::decode(0x11_2_3_4_000);
    assert!(sw.is_store());
    assert!(!sw.writes_register());
    assert!(sw.opcode.reads_rd());

    let beq = Instruction::decode(0x09_2_3_4_000);
    assert!(beq.opcode.is_cond_branch());
    assert!(beq.opcode.reads_rd());
    assert!(!beq.writes_register());
    assert_eq!(beq.dest_register(), 0);

    let jal = Instruction::decode(0x0F_2_0_0_000);
    assert!(jal.writes_register());
    assert_eq!(jal.dest_register(), 15);

    let illegal = Instruction::decode(0x13_2_3_4_000);
    assert!(!illegal.writes_register());
    assert_eq!(illegal.dest_register(), 0);
}

proptest! {
    /// decode ∘ encode is the identity on every 32-bit word.
    #[test]
    fn decode_encode_round_trips(word in any::<u32>()) {
        prop_assert_eq!(Instruction::decode(word).encode(), word);
    }

    /// encode ∘ decode is the identity on field-level instructions.
    #[test]
    fn encode_decode_round_trips(
        code in 0u8..=255,
        rd in 0u8..16,
        rs in 0u8..16,
        rt in 0u8..16,
        imm in -2048i16..=2047,
    ) {
        let inst = Instruction { opcode: Opcode::from_code(code), rd, rs, rt, imm };
        prop_assert_eq!(Instruction::decode(inst.encode()), inst);
    }
}
