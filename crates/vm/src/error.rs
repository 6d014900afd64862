//! Runtime errors for the regvm engine.
//!
//! Every error is fatal to the current run. Variants carry the index of
//! the instruction that was executing (`at`) for debugging.

use crate::io::InputError;
use regvm_common::Opcode;
use thiserror::Error;

/// Errors that terminate a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The program counter ran past the loaded code without a halt.
    #[error("fetch past end of program at pc {at} ({count} instructions loaded)")]
    FetchExhausted { at: usize, count: usize },

    /// A stack address or the stack pointer went above the stack height.
    #[error("stack overflow at instruction {at}")]
    StackOverflow { at: usize },

    /// A stack address, the stack pointer, or the base pointer went below 1.
    #[error("stack underflow at instruction {at}")]
    StackUnderflow { at: usize },

    /// The static-link walk exceeded the lexical bound or reached an invalid base.
    #[error("corrupt call chain at instruction {at}")]
    CorruptCallChain { at: usize },

    /// DIV or MOD with a zero divisor.
    #[error("{opcode} by zero at instruction {at}")]
    ArithmeticError { at: usize, opcode: Opcode },

    /// The output channel is full.
    #[error("output channel full ({capacity} values) at instruction {at}")]
    ChannelFull { at: usize, capacity: usize },

    /// A register operand outside `0..16`.
    #[error("register {index} out of range at instruction {at}")]
    InvalidRegister { at: usize, index: i64 },

    /// A jump, call, or return target outside the loaded code.
    #[error("jump target {target} out of range at instruction {at}")]
    InvalidJumpTarget { at: usize, target: i64 },

    /// SIO with a mode other than 1, 2, or 3.
    #[error("unknown SIO mode {mode} at instruction {at}")]
    UnknownIoMode { at: usize, mode: i64 },

    /// SIO mode 2 could not obtain a value.
    #[error("input failed at instruction {at}: {source}")]
    Input { at: usize, source: InputError },

    /// The run used up its cycle budget.
    #[error("step limit of {limit} exceeded at pc {at}")]
    StepLimitExceeded { at: usize, limit: u64 },
}

impl RuntimeError {
    /// The instruction index the error is attributed to.
    pub fn at(&self) -> usize {
        match self {
            RuntimeError::FetchExhausted { at, .. }
            | RuntimeError::StackOverflow { at }
            | RuntimeError::StackUnderflow { at }
            | RuntimeError::CorruptCallChain { at }
            | RuntimeError::ArithmeticError { at, .. }
            | RuntimeError::ChannelFull { at, .. }
            | RuntimeError::InvalidRegister { at, .. }
            | RuntimeError::InvalidJumpTarget { at, .. }
            | RuntimeError::UnknownIoMode { at, .. }
            | RuntimeError::Input { at, .. }
            | RuntimeError::StepLimitExceeded { at, .. } => *at,
        }
    }
}
