//! Integration tests for the regvm loader.
//!
//! Tests cover:
//! - The sample programs under `tests/programs` (load and execute)
//! - Loading the same stream twice yields the same run
//! - Error cases (non-numeric field, unknown opcode, partial record)

use proptest::prelude::*;
use regvm_common::{Instruction, Opcode, Program};
use regvm_loader::{disassemble, load, LoadError};
use regvm_vm::{run, RuntimeError, ScriptedInput, VM};
use std::fs;
use std::path::{Path, PathBuf};

// ---- Test helpers ----

fn program_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/programs")
        .join(name)
}

fn load_program(name: &str) -> Program {
    let text = fs::read_to_string(program_path(name)).unwrap();
    load(&text).unwrap()
}

// ---- Sample programs ----

#[test]
fn add_program() {
    let program = load_program("add.pm0");
    assert_eq!(
        program.instructions,
        vec![
            Instruction::new(Opcode::Lit, 0, 0, 5),
            Instruction::new(Opcode::Lit, 1, 0, 3),
            Instruction::new(Opcode::Add, 0, 0, 1),
            Instruction::new(Opcode::Sio, 0, 0, 1),
            Instruction::new(Opcode::Sio, 0, 0, 3),
        ]
    );
    assert_eq!(run(&program).unwrap().output, vec![8]);
}

#[test]
fn nested_program() {
    let program = load_program("nested.pm0");
    assert_eq!(program.len(), 24);
    assert_eq!(run(&program).unwrap().output, vec![30, 20, 10]);
}

#[test]
fn factorial_program_reads_input() {
    let program = load_program("factorial.pm0");
    let completion = VM::new(&program)
        .with_input(ScriptedInput::new([5]))
        .execute()
        .unwrap();
    assert_eq!(completion.output, vec![120]);
}

#[test]
fn factorial_of_zero() {
    let program = load_program("factorial.pm0");
    let completion = VM::new(&program)
        .with_input(ScriptedInput::new([0]))
        .execute()
        .unwrap();
    assert_eq!(completion.output, vec![1]);
}

#[test]
fn no_halt_program_is_fetch_exhausted() {
    let program = load_program("no_halt.pm0");
    assert_eq!(
        run(&program),
        Err(RuntimeError::FetchExhausted { at: 2, count: 2 })
    );
}

#[test]
fn div_zero_program() {
    let program = load_program("div_zero.pm0");
    assert_eq!(
        run(&program),
        Err(RuntimeError::ArithmeticError {
            at: 2,
            opcode: Opcode::Div
        })
    );
}

#[test]
fn loading_twice_runs_identically() {
    let text = fs::read_to_string(program_path("nested.pm0")).unwrap();
    let first = run(&load(&text).unwrap()).unwrap();
    let second = run(&load(&text).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn listing_of_add_program() {
    let program = load_program("add.pm0");
    assert_eq!(
        disassemble(&program),
        "0 LIT 0 0 5\n1 LIT 1 0 3\n2 ADD 0 0 1\n3 SIO 0 0 1\n4 SIO 0 0 3\n"
    );
}

// ---- Errors ----

#[test]
fn mnemonic_text_is_rejected() {
    assert_eq!(
        load("LIT 0 0 5\n"),
        Err(LoadError::InvalidNumber {
            line: 1,
            token: "LIT".to_string()
        })
    );
}

#[test]
fn fractional_field_is_rejected() {
    assert_eq!(
        load("1 0 0 2.5\n"),
        Err(LoadError::InvalidNumber {
            line: 1,
            token: "2.5".to_string()
        })
    );
}

#[test]
fn opcode_zero_is_rejected() {
    assert_eq!(
        load("0 0 0 0\n"),
        Err(LoadError::UnknownOpcode { line: 1, code: 0 })
    );
}

#[test]
fn trailing_fields_are_an_error() {
    assert_eq!(
        load("9 0 0 3\n1 0 0\n"),
        Err(LoadError::IncompleteRecord { line: 2, found: 3 })
    );
}

proptest! {
    /// A numeric record rendered from any instruction loads back unchanged.
    #[test]
    fn records_load_in_order(
        records in prop::collection::vec(
            (1i64..=22, -100i64..100, -5i64..5, -1000i64..1000),
            1..30,
        )
    ) {
        let text: String = records
            .iter()
            .map(|(op, r, l, m)| format!("{op} {r} {l} {m}\n"))
            .collect();
        let program = load(&text).unwrap();
        prop_assert_eq!(program.len(), records.len());
        for (instr, &(op, r, l, m)) in program.instructions.iter().zip(&records) {
            prop_assert_eq!(instr.opcode.code(), op);
            prop_assert_eq!((instr.r, instr.l, instr.m), (r, l, m));
        }
    }
}
