//! File-based script source.

use crate::model::error::InputError;
use std::path::{Path, PathBuf};

/// Read-once file source.
///
/// The file is loaded at construction so a missing or unreadable script fails
/// before any replay work starts.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    lines: Vec<String>,
}

impl FileSource {
    /// Load the script at `path`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist.
    /// Returns `InputError::Io` for other I/O errors.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let lines = contents.lines().map(str::to_owned).collect();

        Ok(Self {
            path: path.to_path_buf(),
            lines,
        })
    }

    /// Path the script was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Take all loaded lines; subsequent calls return an empty vec.
    pub fn drain_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}
