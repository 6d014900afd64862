//! External input for SIO mode 2.
//!
//! Reading input is the only point where a run suspends. The engine calls
//! [`InputSource::read_int`] synchronously on its own thread and nothing
//! else executes until it returns.

use std::collections::VecDeque;
use std::io::{self, BufRead};
use thiserror::Error;

/// Why an input read produced no value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The source has no more values.
    #[error("no more input")]
    Exhausted,

    /// The next token is not an integer.
    #[error("invalid integer '{0}'")]
    Invalid(String),

    /// The underlying reader failed.
    #[error("read error: {0}")]
    Io(String),
}

/// A blocking source of integers.
pub trait InputSource {
    /// Block until one integer is available.
    fn read_int(&mut self) -> Result<i64, InputError>;
}

impl<T: InputSource + ?Sized> InputSource for &mut T {
    fn read_int(&mut self) -> Result<i64, InputError> {
        (**self).read_int()
    }
}

/// The default source: every read fails with [`InputError::Exhausted`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputSource for NoInput {
    fn read_int(&mut self) -> Result<i64, InputError> {
        Err(InputError::Exhausted)
    }
}

/// A queue of predetermined values.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    values: VecDeque<i64>,
}

impl ScriptedInput {
    /// Supply `values` to SIO mode 2 reads, in order.
    pub fn new(values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl InputSource for ScriptedInput {
    fn read_int(&mut self) -> Result<i64, InputError> {
        self.values.pop_front().ok_or(InputError::Exhausted)
    }
}

/// Whitespace-separated integers from a buffered reader, a line at a time.
pub struct StdinInput<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl StdinInput<io::StdinLock<'static>> {
    /// Read from the process's standard input.
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> StdinInput<R> {
    /// Read whitespace-separated integers from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }
}

impl<R: BufRead> InputSource for StdinInput<R> {
    fn read_int(&mut self) -> Result<i64, InputError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return token.parse().map_err(|_| InputError::Invalid(token));
            }

            let mut line = String::new();
            let read = self
                .reader
                .read_line(&mut line)
                .map_err(|e| InputError::Io(e.to_string()))?;
            if read == 0 {
                return Err(InputError::Exhausted);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn scripted_input_yields_in_order() {
        let mut input = ScriptedInput::new([4, 5]);
        assert_eq!(input.read_int(), Ok(4));
        assert_eq!(input.remaining(), 1);
        assert_eq!(input.read_int(), Ok(5));
        assert_eq!(input.read_int(), Err(InputError::Exhausted));
    }

    #[test]
    fn no_input_is_exhausted() {
        assert_eq!(NoInput.read_int(), Err(InputError::Exhausted));
    }

    #[test]
    fn reader_splits_tokens_across_lines() {
        let mut input = StdinInput::new(Cursor::new("1 -2\n\n  30\n"));
        assert_eq!(input.read_int(), Ok(1));
        assert_eq!(input.read_int(), Ok(-2));
        assert_eq!(input.read_int(), Ok(30));
        assert_eq!(input.read_int(), Err(InputError::Exhausted));
    }

    #[test]
    fn reader_rejects_non_integer() {
        let mut input = StdinInput::new(Cursor::new("seven\n"));
        assert_eq!(
            input.read_int(),
            Err(InputError::Invalid("seven".to_string()))
        );
    }

    #[test]
    fn mutable_reference_forwards() {
        let mut inner = ScriptedInput::new([9]);
        let mut by_ref = &mut inner;
        assert_eq!(by_ref.read_int(), Ok(9));
        assert_eq!(inner.remaining(), 0);
    }
}
