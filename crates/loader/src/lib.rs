//! regvm loader: reads a text instruction stream into a [`Program`].
//!
//! The input is a sequence of whitespace-separated integers read four at a
//! time as `(opcode, r, l, m)` records, in file order. Line breaks carry no
//! meaning; `;` starts a comment.
//!
//! # Usage
//!
//! ```
//! use regvm_loader::{disassemble, load};
//!
//! let program = load("1 0 0 5\n9 0 0 1\n9 0 0 3\n").unwrap();
//! assert_eq!(program.len(), 3);
//! assert_eq!(disassemble(&program), "0 LIT 0 0 5\n1 SIO 0 0 1\n2 SIO 0 0 3\n");
//! ```

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use disassembler::disassemble;
pub use error::LoadError;

use lexer::tokenize;
use parser::parse_records;
use regvm_common::Program;

/// Default capacity of the instruction store.
pub const MAX_CODE_LENGTH: usize = 500;

/// Load a program of at most [`MAX_CODE_LENGTH`] instructions.
///
/// Returns the first error encountered; malformed records are never skipped.
pub fn load(text: &str) -> Result<Program, LoadError> {
    load_with_limit(text, MAX_CODE_LENGTH)
}

/// Load a program of at most `limit` instructions.
pub fn load_with_limit(text: &str, limit: usize) -> Result<Program, LoadError> {
    let tokens = tokenize(text)?;
    let instructions = parse_records(&tokens, limit)?;
    Ok(Program::new(instructions))
}
