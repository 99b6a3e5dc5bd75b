//! LazyRecomputeIndex - prefix-sum cache with a high-water mark
//!
//! Stores the raw weights plus an inclusive prefix-sum cache. Only the first
//! `valid_len` cache entries are trusted; every mutation lowers the mark to the
//! edit point and the cache is extended again by the next query that reads
//! past it.
//!
//! # Complexity
//!
//! - `set_value`: O(1)
//! - `insert_values` / `remove_values`: O(k + n - edit point) (the `Vec` splice)
//! - `total_sum`: O(1) (kept eagerly)
//! - `prefix_sum(count)`: O(count - valid_len) on first read after an edit, O(1) after
//! - `index_of`: O(log n) when the answer lies in the valid prefix, otherwise O(n - valid_len) + O(log n)

use super::contract::{check_count, check_index, check_insert, check_range, locate};
use super::{CumulativeIndex, Strategy};
use crate::model::weight::sum_of;
use crate::model::{IndexError, IndexOfResult, Sum, Weight};
use tracing::trace;

/// Cumulative index that defers prefix-sum recomputation until a query needs it.
///
/// Suited to "small edit, several reads" workloads: a burst of edits costs
/// nothing until the next read, which pays once for the stale tail.
///
/// # Examples
///
/// ```
/// # use cumulative_index::index::{CumulativeIndex, LazyRecomputeIndex};
/// # use cumulative_index::model::IndexOfResult;
/// let mut index = LazyRecomputeIndex::new(vec![1, 1, 2, 1, 3]);
/// assert_eq!(index.total_sum(), 8);
/// assert_eq!(index.index_of(3).unwrap(), IndexOfResult::new(2, 1));
///
/// index.set_value(0, 4).unwrap();
/// assert_eq!(index.prefix_sum(2).unwrap(), 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LazyRecomputeIndex {
    values: Vec<Weight>,
    /// Inclusive prefix sums; `prefix[i] = C(i)` for `i < valid_len`.
    prefix: Vec<Sum>,
    valid_len: usize,
    total: Sum,
}

impl LazyRecomputeIndex {
    /// Creates an index over `values`. The cache starts empty.
    pub fn new(values: Vec<Weight>) -> Self {
        let total = sum_of(&values);
        let prefix = vec![0; values.len()];
        Self {
            values,
            prefix,
            valid_len: 0,
            total,
        }
    }

    /// Number of leading cache entries that are currently valid.
    ///
    /// Exposed for tests and benchmarks; it never affects query results.
    pub fn valid_len(&self) -> usize {
        self.valid_len
    }

    /// Extends the valid prefix so that `prefix[index]` is current.
    fn ensure_valid_through(&mut self, index: usize) {
        if index < self.valid_len {
            return;
        }

        let from = self.valid_len;
        let mut running = match from {
            0 => 0,
            _ => self.prefix[from - 1],
        };
        for i in from..=index {
            running += Sum::from(self.values[i]);
            self.prefix[i] = running;
        }
        self.valid_len = index + 1;

        trace!(from, through = index, "refreshed prefix cache");
    }

    /// Offset at which unit `index` starts; requires `index <= valid_len`.
    fn start_of(&self, index: usize) -> Sum {
        match index {
            0 => 0,
            _ => self.prefix[index - 1],
        }
    }

    fn invalidate_from(&mut self, index: usize) {
        self.valid_len = self.valid_len.min(index);
    }
}

impl From<Vec<Weight>> for LazyRecomputeIndex {
    fn from(values: Vec<Weight>) -> Self {
        Self::new(values)
    }
}

impl CumulativeIndex for LazyRecomputeIndex {
    fn strategy(&self) -> Strategy {
        Strategy::Lazy
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn weights(&self) -> &[Weight] {
        &self.values
    }

    fn total_sum(&mut self) -> Sum {
        self.total
    }

    fn prefix_sum(&mut self, count: usize) -> Result<Sum, IndexError> {
        check_count(count, self.values.len())?;
        if count == 0 {
            return Ok(0);
        }
        self.ensure_valid_through(count - 1);
        Ok(self.prefix[count - 1])
    }

    fn index_of(&mut self, sum: Sum) -> Result<IndexOfResult, IndexError> {
        let len = self.values.len();
        if len == 0 {
            return Err(IndexError::EmptySequence);
        }

        // Answer from the valid prefix when it already reaches past `sum`.
        let known_above = self.valid_len > 0 && self.prefix[self.valid_len - 1] > sum;
        if !known_above {
            self.ensure_valid_through(len - 1);
        }

        let first_above = self.prefix[..self.valid_len].partition_point(|&c| c <= sum);
        Ok(locate(len, first_above, sum, |i| self.start_of(i)))
    }

    fn set_value(&mut self, index: usize, weight: Weight) -> Result<bool, IndexError> {
        check_index(index, self.values.len())?;
        let old = self.values[index];
        if old == weight {
            return Ok(false);
        }

        self.values[index] = weight;
        self.total = self.total - Sum::from(old) + Sum::from(weight);
        self.invalidate_from(index);
        Ok(true)
    }

    fn insert_values(&mut self, at: usize, weights: &[Weight]) -> Result<bool, IndexError> {
        check_insert(at, self.values.len())?;
        if weights.is_empty() {
            return Ok(false);
        }

        self.values.splice(at..at, weights.iter().copied());
        // Entries at or past `at` are stale after this anyway; only the length matters.
        self.prefix.resize(self.values.len(), 0);
        self.total += sum_of(weights);
        self.invalidate_from(at);

        trace!(at, count = weights.len(), len = self.values.len(), "inserted units");
        Ok(true)
    }

    fn remove_values(&mut self, start: usize, count: usize) -> Result<bool, IndexError> {
        check_range(start, count, self.values.len())?;
        if count == 0 {
            return Ok(false);
        }

        let end = start + count;
        self.total -= sum_of(&self.values[start..end]);
        self.values.drain(start..end);
        self.prefix.truncate(self.values.len());
        self.invalidate_from(start);

        trace!(start, count, len = self.values.len(), "removed units");
        Ok(true)
    }
}
