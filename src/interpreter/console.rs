//! Program I/O and diagnostics seam
//!
//! The input and output intrinsics and the recoverable-error reporting all
//! go through a [`Console`], so the same evaluator runs against real
//! standard streams ([`StdConsole`]) or against scripted input with captured
//! output ([`MockConsole`]) in tests.

use super::errors::{Diagnostic, EvalError};
use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Where the evaluated program reads integers, writes integers, and where
/// recoverable diagnostics are reported
pub trait Console {
    /// Read one decimal integer (the input intrinsic)
    fn read_int(&mut self) -> Result<i64, EvalError>;

    /// Emit one line holding the decimal value (the output intrinsic)
    fn print_int(&mut self, value: i64);

    /// Record a recoverable diagnostic; evaluation continues afterwards
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Console backed by the process's standard streams
///
/// Input is consumed one whitespace-delimited token per read, so a single
/// line carrying several integers feeds several `GET` calls.
#[derive(Debug, Default)]
pub struct StdConsole {
    pending: VecDeque<String>,
}

impl StdConsole {
    pub fn new() -> Self {
        StdConsole::default()
    }

    /// Next integer token from `source`, buffering the rest of the line for
    /// subsequent reads. Blank lines are skipped.
    fn next_int(&mut self, source: &mut dyn BufRead) -> Result<i64, EvalError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return token
                    .parse::<i64>()
                    .map_err(|e| EvalError::Input(e.to_string()));
            }
            eprint!("Please input an integer value: ");
            let mut line = String::new();
            let read = source
                .read_line(&mut line)
                .map_err(|e| EvalError::Input(e.to_string()))?;
            if read == 0 {
                return Err(EvalError::Input("end of input".to_string()));
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }
}

impl Console for StdConsole {
    fn read_int(&mut self) -> Result<i64, EvalError> {
        self.next_int(&mut std::io::stdin().lock())
    }

    fn print_int(&mut self, value: i64) {
        let mut stdout = std::io::stdout().lock();
        // Best effort; a broken stdout is not the evaluated program's fault
        let _ = writeln!(stdout, "{value}");
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        eprintln!("error: {diagnostic}");
    }
}

/// Console with scripted input and captured output, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MockConsole {
    inputs: VecDeque<i64>,
    lines: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl MockConsole {
    pub fn new() -> Self {
        MockConsole::default()
    }

    /// Queue the integers the input intrinsic will hand out, in order
    pub fn with_inputs(inputs: impl IntoIterator<Item = i64>) -> Self {
        MockConsole {
            inputs: inputs.into_iter().collect(),
            ..MockConsole::default()
        }
    }

    /// Lines the output intrinsic produced, in order
    pub fn output(&self) -> &[String] {
        &self.lines
    }

    /// Diagnostics reported during the run, in order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl Console for MockConsole {
    fn read_int(&mut self) -> Result<i64, EvalError> {
        self.inputs
            .pop_front()
            .ok_or_else(|| EvalError::Input("scripted input exhausted".to_string()))
    }

    fn print_int(&mut self, value: i64) {
        self.lines.push(value.to_string());
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_one_token_per_call() {
        let mut console = StdConsole::new();
        let mut input = Cursor::new("3 4\n5\n");
        assert_eq!(console.next_int(&mut input).unwrap(), 3);
        assert_eq!(console.next_int(&mut input).unwrap(), 4);
        assert_eq!(console.next_int(&mut input).unwrap(), 5);
        assert!(console.next_int(&mut input).is_err());
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut console = StdConsole::new();
        let mut input = Cursor::new("\n\n  7\n");
        assert_eq!(console.next_int(&mut input).unwrap(), 7);
    }

    #[test]
    fn a_non_numeric_token_is_an_input_error() {
        let mut console = StdConsole::new();
        let mut input = Cursor::new("x\n");
        assert!(matches!(
            console.next_int(&mut input),
            Err(EvalError::Input(_))
        ));
    }
}
