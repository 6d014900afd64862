//! regvm virtual machine for PL/0-style register intermediate code.
//!
//! The machine has:
//! - Sixteen signed registers for arithmetic
//! - A 1-based stack holding every active activation record contiguously
//! - Statically scoped calls resolved through a static-link chain
//! - An output channel for values emitted by `SIO r 0 1`
//!
//! # Usage
//!
//! ```
//! use regvm_common::{Instruction, Opcode, Program};
//! use regvm_vm::run;
//!
//! let program = Program::new(vec![
//!     Instruction::new(Opcode::Lit, 0, 0, 5),
//!     Instruction::new(Opcode::Lit, 1, 0, 3),
//!     Instruction::new(Opcode::Add, 0, 0, 1),
//!     Instruction::new(Opcode::Sio, 0, 0, 1),
//!     Instruction::new(Opcode::Sio, 0, 0, 3),
//! ]);
//!
//! let completion = run(&program).unwrap();
//! assert_eq!(completion.output, vec![8]);
//! ```

pub mod config;
pub mod error;
pub mod execute;
pub mod io;
pub mod machine;
pub mod output;
pub mod trace;

pub use config::{MachineConfig, MAX_REGISTERS};
pub use error::RuntimeError;
pub use execute::{Completion, StepOutcome};
pub use io::{InputError, InputSource, NoInput, ScriptedInput, StdinInput};
pub use machine::{MachineState, VM};
pub use output::{ChannelFull, OutputChannel};
pub use trace::{Snapshot, TraceSink};

use regvm_common::Program;

/// Execute a program with default limits and no input.
///
/// # Errors
///
/// Returns [`RuntimeError`] if the run ends any way other than `SIO _ _ 3`.
pub fn run(program: &Program) -> Result<Completion, RuntimeError> {
    VM::new(program).execute()
}

/// Execute a program with the given limits and no input.
pub fn run_with_config(program: &Program, config: MachineConfig) -> Result<Completion, RuntimeError> {
    VM::with_config(program, config).execute()
}
