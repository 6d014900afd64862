//! Listing: program → numbered mnemonic text.

use regvm_common::Program;

/// One line per instruction: `"{index} {MNEMONIC} {r} {l} {m}"`.
pub fn disassemble(program: &Program) -> String {
    let mut text = String::new();
    for (idx, instr) in program.instructions.iter().enumerate() {
        text.push_str(&format!("{idx} {instr}\n"));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use regvm_common::{Instruction, Opcode};

    #[test]
    fn empty_program_lists_nothing() {
        assert_eq!(disassemble(&Program::default()), "");
    }

    #[test]
    fn numbered_lines() {
        let program = Program::new(vec![
            Instruction::new(Opcode::Jmp, 0, 0, 2),
            Instruction::new(Opcode::Lod, 1, 2, -3),
            Instruction::new(Opcode::Sio, 0, 0, 3),
        ]);
        assert_eq!(
            disassemble(&program),
            "0 JMP 0 0 2\n1 LOD 1 2 -3\n2 SIO 0 0 3\n"
        );
    }
}
