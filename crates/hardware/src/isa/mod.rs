//! Instruction set definitions.
//!
//! The machine executes a fixed 32-bit RISC-style instruction set with the
//! layout `[opcode:8][rd:4][rs:4][rt:4][imm:12]`. This module provides:
//! 1. **Opcodes:** The [`Opcode`] sum type and its wire encoding.
//! 2. **Instructions:** Field extraction, re-encoding, and classification
//!    predicates used by the pipeline.

/// Decoded instruction structure with encode/decode and classification.
pub mod instruction;
/// Operation codes and per-opcode classification.
pub mod opcode;

pub use instruction::Instruction;
pub use opcode::Opcode;
