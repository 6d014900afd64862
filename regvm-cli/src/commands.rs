//! CLI command implementations.

use crate::args::{RunArgs, SourceArgs};
use crate::trace::TraceTable;
use regvm_common::Program;
use regvm_vm::{Completion, RuntimeError, StdinInput, VM};
use std::fs;
use std::io::{self, Write};
use tracing::info;

/// Load and execute a program.
pub fn run(args: &RunArgs) -> Result<(), i32> {
    let program = read_program(&args.source)?;
    let config = args.limits.machine_config();

    if args.trace {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_listing(&mut out, &program).map_err(write_failed)?;

        let mut table = TraceTable::new(out);
        let result = VM::with_config(&program, config)
            .with_input(StdinInput::stdin())
            .with_trace(&mut table)
            .execute();
        table.finish().map_err(write_failed)?;
        report(result).map(|_| ())
    } else {
        let completion = report(
            VM::with_config(&program, config)
                .with_input(StdinInput::stdin())
                .execute(),
        )?;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        for value in &completion.output {
            writeln!(out, "{value}").map_err(write_failed)?;
        }
        Ok(())
    }
}

/// Print the numbered instruction listing.
pub fn disassemble(args: &SourceArgs) -> Result<(), i32> {
    let program = read_program(args)?;
    print!("{}", regvm_loader::disassemble(&program));
    Ok(())
}

fn report(result: Result<Completion, RuntimeError>) -> Result<Completion, i32> {
    match result {
        Ok(completion) => {
            info!(
                steps = completion.steps,
                outputs = completion.output.len(),
                "finished execution"
            );
            Ok(completion)
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(3)
        }
    }
}

fn write_listing(out: &mut impl Write, program: &Program) -> io::Result<()> {
    writeln!(out, "Instructions:")?;
    write!(out, "{}", regvm_loader::disassemble(program))?;
    writeln!(out)
}

fn write_failed(e: io::Error) -> i32 {
    eprintln!("error: cannot write output: {e}");
    1
}

/// Read and load an instruction stream file.
fn read_program(args: &SourceArgs) -> Result<Program, i32> {
    let path = args.input.display();
    let text = fs::read_to_string(&args.input).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;

    let program = regvm_loader::load_with_limit(&text, args.max_code_length).map_err(|e| {
        eprintln!("error: {path}: {e}");
        1
    })?;

    info!(path = %path, instructions = program.len(), "loaded program");
    Ok(program)
}
