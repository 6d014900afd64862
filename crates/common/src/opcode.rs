//! Opcode definitions for the regvm instruction set.
//!
//! Every instruction carries three integer operands `r`, `l`, `m`. Which of
//! them is a register index, an immediate, a lexical-level distance, or a
//! jump target depends on the opcode alone:
//!
//! | Opcode | `r` | `l` | `m` |
//! |---|---|---|---|
//! | LIT | dest reg | - | constant |
//! | RTN | - | - | - |
//! | LOD | dest reg | lexical level | frame offset |
//! | STO | src reg | lexical level | frame offset |
//! | CAL | - | lexical level | entry pc |
//! | INC | - | - | slot delta |
//! | JMP | - | - | target pc |
//! | JPC | cond reg | - | target pc |
//! | SIO | reg | - | mode (1 out, 2 in, 3 halt) |
//! | NEG | dest reg | src reg | - |
//! | ODD | dest/src reg | - | - |
//! | ADD .. MOD, EQL .. GEQ | dest reg | lhs reg | rhs reg |

use crate::error::OpcodeError;

/// Identifies the operation to perform.
///
/// The `#[repr(u8)]` discriminants are the integer codes used in the
/// textual instruction stream.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Data movement and control
    /// Load the constant `m` into register `r`.
    Lit = 1,
    /// Return from the current procedure.
    Rtn = 2,
    /// Load `stack[base(l) + m]` into register `r`.
    Lod = 3,
    /// Store register `r` into `stack[base(l) + m]`.
    Sto = 4,
    /// Call the procedure at `m`, lexically `l` levels out.
    Cal = 5,
    /// Move the stack pointer by `m` slots.
    Inc = 6,
    /// Unconditional jump to `m`.
    Jmp = 7,
    /// Jump to `m` if register `r` is zero.
    Jpc = 8,
    /// Console I/O and halt, selected by `m`.
    Sio = 9,

    // Arithmetic
    /// `r = -l`.
    Neg = 10,
    /// `r = l + m`.
    Add = 11,
    /// `r = l - m`.
    Sub = 12,
    /// `r = l * m`.
    Mul = 13,
    /// `r = l / m`. A zero divisor is a runtime error.
    Div = 14,
    /// `r = r % 2`, in place.
    Odd = 15,
    /// `r = l % m`. A zero divisor is a runtime error.
    Mod = 16,

    // Relational, always 0 or 1
    /// `r = l == m`.
    Eql = 17,
    /// `r = l != m`.
    Neq = 18,
    /// `r = l < m`.
    Lss = 19,
    /// `r = l <= m`.
    Leq = 20,
    /// `r = l > m`.
    Gtr = 21,
    /// `r = l >= m`.
    Geq = 22,
}

/// All valid opcodes, in code order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 22] = [
    Opcode::Lit,
    Opcode::Rtn,
    Opcode::Lod,
    Opcode::Sto,
    Opcode::Cal,
    Opcode::Inc,
    Opcode::Jmp,
    Opcode::Jpc,
    Opcode::Sio,
    Opcode::Neg,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Odd,
    Opcode::Mod,
    Opcode::Eql,
    Opcode::Neq,
    Opcode::Lss,
    Opcode::Leq,
    Opcode::Gtr,
    Opcode::Geq,
];

impl TryFrom<i64> for Opcode {
    type Error = OpcodeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Opcode::Lit),
            2 => Ok(Opcode::Rtn),
            3 => Ok(Opcode::Lod),
            4 => Ok(Opcode::Sto),
            5 => Ok(Opcode::Cal),
            6 => Ok(Opcode::Inc),
            7 => Ok(Opcode::Jmp),
            8 => Ok(Opcode::Jpc),
            9 => Ok(Opcode::Sio),
            10 => Ok(Opcode::Neg),
            11 => Ok(Opcode::Add),
            12 => Ok(Opcode::Sub),
            13 => Ok(Opcode::Mul),
            14 => Ok(Opcode::Div),
            15 => Ok(Opcode::Odd),
            16 => Ok(Opcode::Mod),
            17 => Ok(Opcode::Eql),
            18 => Ok(Opcode::Neq),
            19 => Ok(Opcode::Lss),
            20 => Ok(Opcode::Leq),
            21 => Ok(Opcode::Gtr),
            22 => Ok(Opcode::Geq),
            _ => Err(OpcodeError::Unknown(value)),
        }
    }
}

impl Opcode {
    /// The integer code used in the textual instruction stream.
    pub fn code(&self) -> i64 {
        *self as u8 as i64
    }

    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Lit => "LIT",
            Opcode::Rtn => "RTN",
            Opcode::Lod => "LOD",
            Opcode::Sto => "STO",
            Opcode::Cal => "CAL",
            Opcode::Inc => "INC",
            Opcode::Jmp => "JMP",
            Opcode::Jpc => "JPC",
            Opcode::Sio => "SIO",
            Opcode::Neg => "NEG",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Odd => "ODD",
            Opcode::Mod => "MOD",
            Opcode::Eql => "EQL",
            Opcode::Neq => "NEQ",
            Opcode::Lss => "LSS",
            Opcode::Leq => "LEQ",
            Opcode::Gtr => "GTR",
            Opcode::Geq => "GEQ",
        }
    }

    /// True for the six comparison opcodes, which always produce 0 or 1.
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            Opcode::Eql | Opcode::Neq | Opcode::Lss | Opcode::Leq | Opcode::Gtr | Opcode::Geq
        )
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
