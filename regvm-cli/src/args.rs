//! Command-line surface.
//!
//! Every limit flag falls back to an environment variable and then to the
//! machine's built-in default.

use clap::{Args, Parser, Subcommand};
use regvm_loader::MAX_CODE_LENGTH;
use regvm_vm::config::{
    MachineConfig, DEFAULT_STEP_LIMIT, MAX_LEXI_LEVELS, MAX_OUTPUT_LENGTH, MAX_STACK_HEIGHT,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "regvm", version)]
#[command(about = "Run PL/0 register-machine intermediate code")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and execute a program
    Run(RunArgs),
    /// Print the numbered instruction listing
    Disassemble(SourceArgs),
}

/// Where the instruction stream comes from.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Instruction stream: whitespace-separated `op r l m` records
    pub input: PathBuf,

    /// Maximum number of instructions to load
    #[arg(long, env = "REGVM_MAX_CODE_LENGTH", default_value_t = MAX_CODE_LENGTH)]
    pub max_code_length: usize,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the listing and one trace row per executed instruction
    #[arg(short, long)]
    pub trace: bool,

    #[command(flatten)]
    pub limits: LimitArgs,
}

#[derive(Args, Debug)]
pub struct LimitArgs {
    /// Stack slots, including the unused slot 0
    #[arg(long, env = "REGVM_STACK_HEIGHT", default_value_t = MAX_STACK_HEIGHT)]
    pub stack_height: usize,

    /// Largest lexical-level distance LOD/STO/CAL may use
    #[arg(long, env = "REGVM_MAX_LEXI_LEVELS", default_value_t = MAX_LEXI_LEVELS)]
    pub max_lexi_levels: usize,

    /// Number of values the program may output
    #[arg(long, env = "REGVM_OUTPUT_CAPACITY", default_value_t = MAX_OUTPUT_LENGTH)]
    pub output_capacity: usize,

    /// Instructions to execute before giving up; 0 for no limit
    #[arg(long, env = "REGVM_MAX_STEPS", default_value_t = DEFAULT_STEP_LIMIT)]
    pub max_steps: u64,
}

impl LimitArgs {
    pub fn machine_config(&self) -> MachineConfig {
        MachineConfig {
            stack_height: self.stack_height,
            max_lexi_levels: self.max_lexi_levels,
            output_capacity: self.output_capacity,
            step_limit: (self.max_steps > 0).then_some(self.max_steps),
        }
    }
}
