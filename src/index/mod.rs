//! Cumulative weighted index - prefix sums and offset-to-unit lookup under edits
//!
//! A cumulative index keeps one non-negative weight per unit (e.g. the number of
//! rendered rows of each buffer line) and answers:
//!
//! - `total_sum`: sum of all weights
//! - `prefix_sum(count)`: sum of the first `count` weights
//! - `index_of(sum)`: which unit contains cumulative offset `sum`, and how far
//!   past that unit's start the offset lies
//!
//! while units are updated, inserted and removed. Two strategies implement the
//! same [`CumulativeIndex`] contract:
//!
//! | Strategy                    | `set_value` | queries after an edit       | tail insert/remove |
//! |-----------------------------|-------------|-----------------------------|--------------------|
//! | [`LazyRecomputeIndex`]      | O(1)        | O(n - edit point), then O(log n) | O(k)          |
//! | [`BalancedCumulativeIndex`] | O(log n)    | O(log n)                    | O(k log n)         |
//!
//! Interior inserts and removes cost O(n - edit point) for both, the same as
//! the underlying `Vec` splice.
//!
//! # Inverse query
//!
//! With `C(i)` the inclusive sum of weights `0..=i`, `index_of(sum)` returns the
//! smallest `i` with `C(i) > sum` and the remainder `sum - C(i - 1)`. When no
//! such unit exists (`sum >= total`), the result is clamped to the last unit.
//! Runs of zero-weight units therefore never absorb a query.

use crate::model::{IndexError, IndexOfResult, Sum, Weight};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub mod balanced;
pub mod contract;
pub mod lazy;

pub use balanced::BalancedCumulativeIndex;
pub use lazy::LazyRecomputeIndex;

/// The contract shared by every cumulative index strategy.
///
/// Queries take `&mut self` because strategies may refresh internal caches on
/// read; no query changes the observable sequence. Every mutation is visible to
/// the next query.
///
/// Mutations return `Ok(true)` when the sequence changed and `Ok(false)` for
/// no-ops (unchanged `set_value`, empty insert, zero-length remove).
pub trait CumulativeIndex: fmt::Debug {
    /// Which strategy backs this index.
    fn strategy(&self) -> Strategy;

    /// Number of units.
    fn len(&self) -> usize;

    /// Returns true if the index has no units.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current weights in unit order.
    fn weights(&self) -> &[Weight];

    /// Weight of a single unit.
    ///
    /// # Errors
    ///
    /// [`IndexError::IndexOutOfRange`] if `index >= len()`.
    fn weight(&self, index: usize) -> Result<Weight, IndexError> {
        let weights = self.weights();
        weights.get(index).copied().ok_or(IndexError::IndexOutOfRange {
            index,
            len: weights.len(),
        })
    }

    /// Sum of all weights. Zero for an empty index.
    fn total_sum(&mut self) -> Sum;

    /// Sum of the first `count` weights.
    ///
    /// # Errors
    ///
    /// [`IndexError::CountOutOfRange`] if `count > len()`.
    fn prefix_sum(&mut self, count: usize) -> Result<Sum, IndexError>;

    /// Locates the unit containing cumulative offset `sum`.
    ///
    /// # Errors
    ///
    /// [`IndexError::EmptySequence`] if the index has no units.
    fn index_of(&mut self, sum: Sum) -> Result<IndexOfResult, IndexError>;

    /// Replaces the weight of unit `index`.
    ///
    /// # Errors
    ///
    /// [`IndexError::IndexOutOfRange`] if `index >= len()`.
    fn set_value(&mut self, index: usize, weight: Weight) -> Result<bool, IndexError>;

    /// Inserts `weights` as new units starting at `at`, shifting later units right.
    ///
    /// # Errors
    ///
    /// [`IndexError::InsertOutOfRange`] if `at > len()`.
    fn insert_values(&mut self, at: usize, weights: &[Weight]) -> Result<bool, IndexError>;

    /// Removes units `[start, start + count)`, shifting later units left.
    ///
    /// # Errors
    ///
    /// [`IndexError::InvalidRange`] if the range does not fit in the sequence.
    fn remove_values(&mut self, start: usize, count: usize) -> Result<bool, IndexError>;
}

/// Selects the implementation behind a [`CumulativeIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Prefix-sum cache with deferred recomputation ([`LazyRecomputeIndex`]).
    #[default]
    Lazy,
    /// Fenwick tree with eager propagation ([`BalancedCumulativeIndex`]).
    Balanced,
}

impl Strategy {
    /// All strategies, in a stable order.
    pub const ALL: [Strategy; 2] = [Strategy::Lazy, Strategy::Balanced];

    /// Lowercase name as used in config files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Lazy => "lazy",
            Strategy::Balanced => "balanced",
        }
    }

    /// Builds an index of this strategy over `weights`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cumulative_index::index::Strategy;
    /// let mut index = Strategy::Balanced.build(vec![1, 1, 2, 1, 3]);
    /// assert_eq!(index.total_sum(), 8);
    /// assert_eq!(index.prefix_sum(3).unwrap(), 4);
    /// ```
    pub fn build(self, weights: Vec<Weight>) -> Box<dyn CumulativeIndex> {
        match self {
            Strategy::Lazy => Box::new(LazyRecomputeIndex::new(weights)),
            Strategy::Balanced => Box::new(BalancedCumulativeIndex::new(weights)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lazy" => Ok(Strategy::Lazy),
            "balanced" => Ok(Strategy::Balanced),
            other => Err(format!(
                "unknown strategy '{other}' (expected 'lazy' or 'balanced')"
            )),
        }
    }
}
