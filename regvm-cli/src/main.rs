//! regvm CLI: load and execute register-machine programs.
//!
//! Exit codes:
//! - 0: Program halted
//! - 1: Input/load error
//! - 2: Usage error
//! - 3: Runtime error

mod args;
mod commands;
mod trace;

use args::{Cli, Command};
use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Run(args) => commands::run(args),
        Command::Disassemble(args) => commands::disassemble(args),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

/// Log to stderr so stdout carries only program output and traces.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
