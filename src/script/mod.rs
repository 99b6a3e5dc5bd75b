//! JSONL parser for index edit scripts.
//!
//! This module provides pure parsing functions for converting script lines
//! into validated [`Op`] values. Integers are deserialized signed and checked
//! afterwards, so a negative weight or index is reported with its line number
//! instead of surfacing as an opaque serde error.
//!
//! # Format
//!
//! One JSON object per line, tagged by `op`. Blank lines and lines starting
//! with `#` are skipped.
//!
//! ```text
//! {"op":"init","weights":[1,1,2,1,3]}
//! {"op":"set","index":1,"weight":5}
//! {"op":"insert","index":2,"weights":[0,4]}
//! {"op":"remove","start":0,"count":1}
//! {"op":"total"}
//! {"op":"prefix","count":3}
//! {"op":"index_of","sum":4}
//! {"op":"len"}
//! ```

use crate::model::weight::{validate_weights, Sum, Weight};
use crate::model::ScriptError;
use serde::Deserialize;

/// A validated script operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Replace the index with a fresh one over `weights`.
    Init {
        /// Initial weights.
        weights: Vec<Weight>,
    },
    /// `set_value(index, weight)`.
    Set {
        /// Unit to update.
        index: usize,
        /// New weight.
        weight: Weight,
    },
    /// `insert_values(index, weights)`.
    Insert {
        /// Insertion point.
        index: usize,
        /// Weights of the new units.
        weights: Vec<Weight>,
    },
    /// `remove_values(start, count)`.
    Remove {
        /// First unit to remove.
        start: usize,
        /// Number of units to remove.
        count: usize,
    },
    /// `total_sum()`.
    Total,
    /// `prefix_sum(count)`.
    Prefix {
        /// Number of leading units to sum.
        count: usize,
    },
    /// `index_of(sum)`.
    IndexOf {
        /// Cumulative offset to locate.
        sum: Sum,
    },
    /// `len()`.
    Len,
}

impl Op {
    /// Operation name as written in scripts.
    pub fn name(&self) -> &'static str {
        match self {
            Op::Init { .. } => "init",
            Op::Set { .. } => "set",
            Op::Insert { .. } => "insert",
            Op::Remove { .. } => "remove",
            Op::Total => "total",
            Op::Prefix { .. } => "prefix",
            Op::IndexOf { .. } => "index_of",
            Op::Len => "len",
        }
    }

    /// Returns true for operations that only read the index.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Op::Total | Op::Prefix { .. } | Op::IndexOf { .. } | Op::Len
        )
    }
}

/// A parsed operation together with its 1-based script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// 1-based line number in the script.
    pub line: usize,
    /// The operation on that line.
    pub op: Op,
}

/// Raw JSON structure for deserializing operations.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
enum RawOp {
    Init { weights: Vec<i64> },
    Set { index: i64, weight: i64 },
    Insert { index: i64, weights: Vec<i64> },
    Remove { start: i64, count: i64 },
    Total,
    Prefix { count: i64 },
    IndexOf { sum: i64 },
    Len,
}

/// Parse a single script line.
///
/// Returns `Ok(None)` for blank lines and `#` comments.
///
/// # Errors
///
/// - [`ScriptError::InvalidJson`] if the line is not a known operation
/// - [`ScriptError::InvalidWeight`] if a weight is negative or exceeds `u32::MAX`
/// - [`ScriptError::NegativeArgument`] if an index, count or sum is negative
///
/// # Examples
///
/// ```
/// # use cumulative_index::script::{parse_line, Op};
/// let op = parse_line(r#"{"op":"set","index":1,"weight":5}"#, 1).unwrap();
/// assert_eq!(op, Some(Op::Set { index: 1, weight: 5 }));
/// assert_eq!(parse_line("# comment", 2).unwrap(), None);
/// ```
pub fn parse_line(raw: &str, line: usize) -> Result<Option<Op>, ScriptError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let parsed: RawOp = serde_json::from_str(trimmed).map_err(|e| ScriptError::InvalidJson {
        line,
        message: e.to_string(),
    })?;

    let weights = |values: &[i64]| {
        validate_weights(values).map_err(|source| ScriptError::InvalidWeight { line, source })
    };
    let unsigned = |field: &'static str, value: i64| {
        usize::try_from(value).map_err(|_| ScriptError::NegativeArgument { line, field, value })
    };

    let op = match parsed {
        RawOp::Init { weights: w } => Op::Init {
            weights: weights(&w)?,
        },
        RawOp::Set { index, weight } => {
            let index = unsigned("index", index)?;
            let weight = weights(&[weight])?[0];
            Op::Set { index, weight }
        }
        RawOp::Insert { index, weights: w } => Op::Insert {
            index: unsigned("index", index)?,
            weights: weights(&w)?,
        },
        RawOp::Remove { start, count } => Op::Remove {
            start: unsigned("start", start)?,
            count: unsigned("count", count)?,
        },
        RawOp::Total => Op::Total,
        RawOp::Prefix { count } => Op::Prefix {
            count: unsigned("count", count)?,
        },
        RawOp::IndexOf { sum } => Op::IndexOf {
            sum: Sum::try_from(sum).map_err(|_| ScriptError::NegativeArgument {
                line,
                field: "sum",
                value: sum,
            })?,
        },
        RawOp::Len => Op::Len,
    };

    Ok(Some(op))
}

/// Parse a whole script, stopping at the first invalid line.
///
/// # Errors
///
/// Returns the first [`ScriptError`] encountered.
pub fn parse_script<'a>(
    lines: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut ops = Vec::new();
    for (i, raw) in lines.into_iter().enumerate() {
        let line = i + 1;
        if let Some(op) = parse_line(raw, line)? {
            ops.push(ScriptLine { line, op });
        }
    }
    Ok(ops)
}
