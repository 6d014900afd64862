//! Error types for the regvm loader.

use thiserror::Error;

/// Errors produced while loading an instruction stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// A field is not a decimal integer.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// The opcode field names no opcode.
    #[error("line {line}: unknown opcode {code}")]
    UnknownOpcode { line: usize, code: i64 },

    /// The stream ended partway through a record.
    #[error("line {line}: incomplete record ({found} of 4 fields)")]
    IncompleteRecord { line: usize, found: usize },

    /// More instructions than the instruction store holds.
    #[error("program exceeds {limit} instructions")]
    ProgramTooLarge { limit: usize },
}
