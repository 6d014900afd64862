//! The fixed-shape regvm instruction.
//!
//! An instruction is an opcode plus three signed operands. The operands are
//! stored raw, exactly as loaded; the engine interprets and bounds-checks
//! them per opcode when the instruction executes.

use crate::opcode::Opcode;

/// A single regvm instruction: `(opcode, r, l, m)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// Usually a register index.
    pub r: i64,
    /// Register index or lexical-level distance, depending on opcode.
    pub l: i64,
    /// Register index, constant, offset, mode, or jump target.
    pub m: i64,
}

impl Instruction {
    /// Create a new instruction.
    pub fn new(opcode: Opcode, r: i64, l: i64, m: i64) -> Self {
        Self { opcode, r, l, m }
    }

    /// Render as the numeric record accepted by the loader (`"1 0 0 5"`).
    pub fn to_record(&self) -> String {
        format!("{} {} {} {}", self.opcode.code(), self.r, self.l, self.m)
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} {}", self.opcode, self.r, self.l, self.m)
    }
}
