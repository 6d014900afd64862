//! regvm common types.
//!
//! This crate provides the data structures shared by the loader, the
//! virtual machine, and the CLI:
//!
//! - [`Opcode`]: the 22 opcodes and their integer codes
//! - [`Instruction`]: `(opcode, r, l, m)`
//! - [`Program`]: the instruction store
//! - [`OpcodeError`]: unknown opcode codes

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;

pub use error::OpcodeError;
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use program::Program;
