//! Decode errors for regvm instruction fields.

use thiserror::Error;

/// Errors that occur when turning a raw integer into an [`Opcode`](crate::Opcode).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpcodeError {
    /// The integer does not name any opcode.
    #[error("unknown opcode {0}")]
    Unknown(i64),
}
