//! Operation codes.
//!
//! The opcode alone classifies an instruction: the pipeline derives register
//! writes, memory behavior, and early-operand needs from it. Numeric codes
//! appear only at the encode/decode boundary; everything else matches on the
//! sum type. Codes with no assigned operation decode to [`Opcode::Illegal`]
//! and retire as no-ops.

/// Operation selector of one instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `rd = rs + rt`.
    #[default]
    Add,
    /// `rd = rs - rt`.
    Sub,
    /// `rd = rs & rt`.
    And,
    /// `rd = rs | rt`.
    Or,
    /// `rd = rs ^ rt`.
    Xor,
    /// `rd = rs * rt` (low 32 bits).
    Mul,
    /// `rd = rs << rt[4:0]`.
    Sll,
    /// `rd = rs >> rt[4:0]`, sign-propagating.
    Sra,
    /// `rd = rs >> rt[4:0]`, zero-filling.
    Srl,
    /// Branch if `rs == rt` to `rd[9:0]`.
    Beq,
    /// Branch if `rs != rt` to `rd[9:0]`.
    Bne,
    /// Branch if `rs < rt` (signed) to `rd[9:0]`.
    Blt,
    /// Branch if `rs > rt` (signed) to `rd[9:0]`.
    Bgt,
    /// Branch if `rs <= rt` (signed) to `rd[9:0]`.
    Ble,
    /// Branch if `rs >= rt` (signed) to `rd[9:0]`.
    Bge,
    /// Jump to `rd[9:0]`, link address in R15.
    Jal,
    /// `rd = MEM[rs + rt]`.
    Lw,
    /// `MEM[rs + rt] = rd`.
    Sw,
    /// Stop fetching; the core drains and halts.
    Halt,
    /// Unassigned code; executes as a no-op and writes no register.
    Illegal(u8),
}

impl Opcode {
    /// Maps a wire code to its operation.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Add,
            1 => Self::Sub,
            2 => Self::And,
            3 => Self::Or,
            4 => Self::Xor,
            5 => Self::Mul,
            6 => Self::Sll,
            7 => Self::Sra,
            8 => Self::Srl,
            9 => Self::Beq,
            10 => Self::Bne,
            11 => Self::Blt,
            12 => Self::Bgt,
            13 => Self::Ble,
            14 => Self::Bge,
            15 => Self::Jal,
            16 => Self::Lw,
            17 => Self::Sw,
            20 => Self::Halt,
            other => Self::Illegal(other),
        }
    }

    /// The wire code of this operation; exact inverse of [`Opcode::from_code`].
    pub fn code(self) -> u8 {
        match self {
            Self::Add => 0,
            Self::Sub => 1,
            Self::And => 2,
            Self::Or => 3,
            Self::Xor => 4,
            Self::Mul => 5,
            Self::Sll => 6,
            Self::Sra => 7,
            Self::Srl => 8,
            Self::Beq => 9,
            Self::Bne => 10,
            Self::Blt => 11,
            Self::Bgt => 12,
            Self::Ble => 13,
            Self::Bge => 14,
            Self::Jal => 15,
            Self::Lw => 16,
            Self::Sw => 17,
            Self::Halt => 20,
            Self::Illegal(code) => code,
        }
    }

    /// True for the arithmetic/logical group handled by the ALU.
    pub fn is_alu(self) -> bool {
        matches!(
            self,
            Self::Add
                | Self::Sub
                | Self::And
                | Self::Or
                | Self::Xor
                | Self::Mul
                | Self::Sll
                | Self::Sra
                | Self::Srl
        )
    }

    /// True for the six conditional branches.
    pub fn is_cond_branch(self) -> bool {
        matches!(
            self,
            Self::Beq | Self::Bne | Self::Blt | Self::Bgt | Self::Ble | Self::Bge
        )
    }

    /// True when decode consumes `rd` as an operand: branches and `JAL` read
    /// it as the jump target, `SW` reads it as the store data.
    pub fn reads_rd(self) -> bool {
        self.is_cond_branch() || matches!(self, Self::Jal | Self::Sw)
    }

    /// Assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Mul => "mul",
            Self::Sll => "sll",
            Self::Sra => "sra",
            Self::Srl => "srl",
            Self::Beq => "beq",
            Self::Bne => "bne",
            Self::Blt => "blt",
            Self::Bgt => "bgt",
            Self::Ble => "ble",
            Self::Bge => "bge",
            Self::Jal => "jal",
            Self::Lw => "lw",
            Self::Sw => "sw",
            Self::Halt => "halt",
            Self::Illegal(_) => "illegal",
        }
    }
}
