//! Stdin-based script source for piped input.

use crate::model::error::InputError;
use std::io::{BufRead, BufReader, IsTerminal, Read};

/// Stdin source for piped JSONL scripts.
///
/// # Design
///
/// - Rejects an interactive terminal at construction
/// - Reads line by line; tracks EOF via `complete`
pub struct StdinSource<R: Read> {
    reader: BufReader<R>,
    complete: bool,
}

impl<R: Read> std::fmt::Debug for StdinSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdinSource")
            .field("complete", &self.complete)
            .finish_non_exhaustive()
    }
}

impl StdinSource<std::io::Stdin> {
    /// Create a new StdinSource from stdin.
    ///
    /// # Errors
    ///
    /// Returns `InputError::NoInput` if stdin is a TTY (interactive terminal).
    /// This prevents the tool from blocking on keyboard input when the
    /// user forgot to pipe a script.
    pub fn new() -> Result<Self, InputError> {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err(InputError::NoInput);
        }
        Ok(Self::from_reader(stdin))
    }
}

impl<R: Read> StdinSource<R> {
    /// Create StdinSource from any reader, bypassing the TTY check.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            complete: false,
        }
    }

    /// Read the next line.
    ///
    /// Returns `None` and sets the `complete` flag at EOF. The trailing
    /// newline (and carriage return) is stripped.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` for I/O errors.
    pub fn poll(&mut self) -> Result<Option<String>, InputError> {
        if self.complete {
            return Ok(None);
        }

        let mut buffer = String::new();
        let bytes_read = self.reader.read_line(&mut buffer)?;
        if bytes_read == 0 {
            self.complete = true;
            return Ok(None);
        }

        let line = buffer.trim_end_matches(['\n', '\r']).to_string();
        Ok(Some(line))
    }

    /// Read every remaining line until EOF.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` for I/O errors.
    pub fn read_to_end(&mut self) -> Result<Vec<String>, InputError> {
        let mut lines = Vec::new();
        while let Some(line) = self.poll()? {
            lines.push(line);
        }
        Ok(lines)
    }
}
