//! Tokenizer for the numeric instruction stream.

use crate::error::LoadError;

/// One integer field and the line it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub line: usize,
    pub value: i64,
}

/// Split the whole stream into integer fields.
///
/// Records are not tied to lines: fields are read as one whitespace
/// separated sequence. Comments start with `;` and extend to end of line.
pub(crate) fn tokenize(text: &str) -> Result<Vec<Token>, LoadError> {
    let mut tokens = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let line = match line.find(';') {
            Some(pos) => &line[..pos],
            None => line,
        };

        for word in line.split_whitespace() {
            let value = word.parse::<i64>().map_err(|_| LoadError::InvalidNumber {
                line: line_num,
                token: word.to_string(),
            })?;
            tokens.push(Token {
                line: line_num,
                value,
            });
        }
    }

    Ok(tokens)
}
