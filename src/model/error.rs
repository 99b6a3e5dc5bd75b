//! Error types for the cumulative index and the `cwi` replay tool.
//!
//! This module defines a hierarchical error taxonomy using `thiserror` for structured error
//! handling. Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`IndexError`] - Contract violations raised by the index itself (bad index, bad range,
//!   query on an empty sequence, negative weight at a checked boundary)
//! - [`AppError`] - Top-level error of the replay tool wrapping all other failures
//!   - [`InputError`] - Script file/stdin reading failures
//!   - [`ScriptError`] - Malformed script lines (bad JSON, negative arguments)
//!   - [`ReplayError`] - Failures while applying a script (index errors, strategy divergence)
//!   - [`ConfigError`] - Config file read/parse failures
//!   - [`LoggingError`] - Tracing subscriber initialization failures
//!   - `std::io::Error` - Writing replay output failed
//!
//! # Recovery Strategy
//!
//! `IndexError` is never recovered inside the index: it signals a caller bug and is returned
//! to the immediate caller untouched. The replay tool treats every error as fatal and stops at
//! the first failing step, reporting its line number.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Contract violations reported by [`CumulativeIndex`](crate::index::CumulativeIndex)
/// implementations.
///
/// Every variant carries the offending arguments and the sequence length at the time of the
/// call, so the message alone is enough to locate the caller bug. Indices are never clamped
/// silently.
///
/// # Examples
///
/// ```
/// use cumulative_index::model::error::IndexError;
///
/// let err = IndexError::IndexOutOfRange { index: 5, len: 3 };
/// assert_eq!(err.to_string(), "index 5 out of range (len: 3)");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// A unit index outside `[0, len)`.
    #[error("index {index} out of range (len: {len})")]
    IndexOutOfRange {
        /// The index that was passed.
        index: usize,
        /// Sequence length at the time of the call.
        len: usize,
    },

    /// A prefix count outside `[0, len]`.
    #[error("count {count} out of range (len: {len})")]
    CountOutOfRange {
        /// The count that was passed.
        count: usize,
        /// Sequence length at the time of the call.
        len: usize,
    },

    /// An insertion point outside `[0, len]`.
    #[error("insert position {index} out of range (len: {len})")]
    InsertOutOfRange {
        /// The insertion point that was passed.
        index: usize,
        /// Sequence length at the time of the call.
        len: usize,
    },

    /// A removal range `[start, start + count)` that does not fit in the sequence.
    #[error("range {start}+{count} out of range (len: {len})")]
    InvalidRange {
        /// First unit to remove.
        start: usize,
        /// Number of units to remove.
        count: usize,
        /// Sequence length at the time of the call.
        len: usize,
    },

    /// Inverse query on a sequence with no units.
    #[error("index_of called on an empty sequence")]
    EmptySequence,

    /// A signed weight below zero reached a checked boundary.
    #[error("negative weight {value} at position {position}")]
    NegativeWeight {
        /// Position of the weight within the input list.
        position: usize,
        /// The rejected value.
        value: i64,
    },

    /// A signed weight that does not fit the weight type.
    #[error("weight {value} at position {position} exceeds u32::MAX")]
    WeightTooLarge {
        /// Position of the weight within the input list.
        position: usize,
        /// The rejected value.
        value: i64,
    },
}

/// Top-level error of the replay tool.
///
/// All domain-specific errors convert into `AppError` via `From`, so `main` can use `?`
/// throughout.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read the script from file or stdin.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// A script line could not be parsed.
    #[error("Failed to parse script: {0}")]
    Script(#[from] ScriptError),

    /// Applying the script failed.
    #[error("Replay failed: {0}")]
    Replay(#[from] ReplayError),

    /// Config file could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Writing replay output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors encountered when reading a script from a file or stdin.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified script file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use cumulative_index::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.jsonl")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.jsonl"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// No script path was given and stdin is an interactive terminal.
    #[error("No input source: provide a script path or pipe data to stdin")]
    NoInput,

    /// Generic I/O error reading from the input source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors encountered when parsing script lines.
///
/// All variants carry the 1-based line number of the offending line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// The line is not valid JSON or does not match any operation shape.
    #[error("Invalid operation at line {line}: {message}")]
    InvalidJson {
        /// 1-based line number.
        line: usize,
        /// Parser error message.
        message: String,
    },

    /// A weight list contained a negative or oversized value.
    #[error("Invalid weight at line {line}: {source}")]
    InvalidWeight {
        /// 1-based line number.
        line: usize,
        /// The underlying validation error.
        #[source]
        source: IndexError,
    },

    /// An index, count or sum argument was negative.
    #[error("Negative {field} {value} at line {line}")]
    NegativeArgument {
        /// 1-based line number.
        line: usize,
        /// Name of the argument ("index", "count", ...).
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
}

/// Errors encountered while applying a parsed script.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The index rejected an operation.
    #[error("step {step}: {source}")]
    Index {
        /// 1-based script line of the failing operation.
        step: usize,
        /// The contract violation reported by the index.
        #[source]
        source: IndexError,
    },

    /// Two strategies disagreed on the outcome of an operation.
    #[error("step {step}: strategies diverged on {op}: lazy={lazy}, balanced={balanced}")]
    Divergence {
        /// 1-based script line of the diverging operation.
        step: usize,
        /// Operation name.
        op: &'static str,
        /// Outcome reported by the lazy strategy.
        lazy: String,
        /// Outcome reported by the balanced strategy.
        balanced: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn index_error_out_of_range_display() {
        let err = IndexError::IndexOutOfRange { index: 7, len: 2 };
        assert_eq!(err.to_string(), "index 7 out of range (len: 2)");
    }

    #[test]
    fn index_error_invalid_range_display() {
        let err = IndexError::InvalidRange {
            start: 1,
            count: 4,
            len: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("1+4"));
        assert!(msg.contains("len: 3"));
    }

    #[test]
    fn index_error_empty_sequence_display() {
        assert_eq!(
            IndexError::EmptySequence.to_string(),
            "index_of called on an empty sequence"
        );
    }

    #[test]
    fn input_error_no_input_display() {
        let msg = InputError::NoInput.to_string();
        assert!(msg.contains("No input source"));
        assert!(msg.contains("pipe data to stdin"));
    }

    #[test]
    fn input_error_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let input_err: InputError = io_err.into();
        let msg = input_err.to_string();
        assert!(msg.contains("IO error"));
        assert!(msg.contains("access denied"));
    }

    #[test]
    fn script_error_invalid_weight_includes_line_and_source() {
        let err = ScriptError::InvalidWeight {
            line: 12,
            source: IndexError::NegativeWeight {
                position: 0,
                value: -3,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("line 12"));
        assert!(msg.contains("negative weight -3"));
    }

    #[test]
    fn replay_error_divergence_display() {
        let err = ReplayError::Divergence {
            step: 4,
            op: "total",
            lazy: "8".to_string(),
            balanced: "9".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("step 4"));
        assert!(msg.contains("lazy=8"));
        assert!(msg.contains("balanced=9"));
    }

    #[test]
    fn app_error_from_replay_error() {
        let replay = ReplayError::Index {
            step: 3,
            source: IndexError::EmptySequence,
        };
        let app_err: AppError = replay.into();
        let msg = app_err.to_string();
        assert!(msg.contains("Replay failed"));
        assert!(msg.contains("step 3"));
    }

    #[test]
    fn app_error_nested_io_through_input_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let input_err: InputError = io_err.into();
        let app_err: AppError = input_err.into();
        let msg = app_err.to_string();
        assert!(msg.contains("Failed to read input"));
        assert!(msg.contains("IO error"));
    }
}
