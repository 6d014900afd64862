//! Group fields into `(opcode, r, l, m)` records.

use crate::error::LoadError;
use crate::lexer::Token;
use regvm_common::{Instruction, Opcode};

/// Fields per record.
const RECORD_LEN: usize = 4;

/// Build instructions in stream order, at most `limit` of them.
pub(crate) fn parse_records(tokens: &[Token], limit: usize) -> Result<Vec<Instruction>, LoadError> {
    let count = tokens.len() / RECORD_LEN;
    if count > limit {
        return Err(LoadError::ProgramTooLarge { limit });
    }

    let mut instructions = Vec::with_capacity(count);
    for record in tokens.chunks(RECORD_LEN) {
        let [op, r, l, m] = record else {
            return Err(LoadError::IncompleteRecord {
                line: record[0].line,
                found: record.len(),
            });
        };

        let opcode = Opcode::try_from(op.value).map_err(|_| LoadError::UnknownOpcode {
            line: op.line,
            code: op.value,
        })?;
        instructions.push(Instruction::new(opcode, r.value, l.value, m.value));
    }

    Ok(instructions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(text: &str) -> Result<Vec<Instruction>, LoadError> {
        parse_records(&tokenize(text).unwrap(), 500)
    }

    #[test]
    fn single_record() {
        assert_eq!(
            parse("1 2 0 99").unwrap(),
            vec![Instruction::new(Opcode::Lit, 2, 0, 99)]
        );
    }

    #[test]
    fn record_spanning_lines() {
        assert_eq!(
            parse("5 0\n1 7").unwrap(),
            vec![Instruction::new(Opcode::Cal, 0, 1, 7)]
        );
    }

    #[test]
    fn partial_record_reports_its_first_line() {
        assert_eq!(
            parse("1 0 0 1\n9 0\n"),
            Err(LoadError::IncompleteRecord { line: 2, found: 2 })
        );
    }

    #[test]
    fn unknown_opcode() {
        assert_eq!(
            parse("1 0 0 1\n\n23 0 0 0"),
            Err(LoadError::UnknownOpcode { line: 3, code: 23 })
        );
    }

    #[test]
    fn limit_is_enforced() {
        let tokens = tokenize("7 0 0 0 7 0 0 0 7 0 0 0").unwrap();
        assert_eq!(parse_records(&tokens, 3).map(|v| v.len()), Ok(3));
        assert_eq!(
            parse_records(&tokens, 2),
            Err(LoadError::ProgramTooLarge { limit: 2 })
        );
    }
}
