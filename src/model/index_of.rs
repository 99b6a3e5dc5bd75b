//! Result of the inverse (offset-to-unit) query.

use crate::model::weight::Sum;
use serde::Serialize;
use std::fmt;

/// The unit containing a cumulative offset, and the offset's distance past
/// the start of that unit.
///
/// `remainder < weight[index]` holds except when the query was clamped to the
/// last unit because the offset reached or passed the total sum.
///
/// # Examples
///
/// ```
/// # use cumulative_index::model::IndexOfResult;
/// let result = IndexOfResult::new(2, 1);
/// assert_eq!(result.to_string(), "{index=2, remainder=1}");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IndexOfResult {
    /// Unit containing the offset.
    pub index: usize,
    /// Offset past `prefix_sum(index)`.
    pub remainder: Sum,
}

impl IndexOfResult {
    /// Creates a result pair.
    pub fn new(index: usize, remainder: Sum) -> Self {
        Self { index, remainder }
    }
}

impl From<(usize, Sum)> for IndexOfResult {
    fn from((index, remainder): (usize, Sum)) -> Self {
        Self { index, remainder }
    }
}

impl fmt::Display for IndexOfResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{index={}, remainder={}}}", self.index, self.remainder)
    }
}
