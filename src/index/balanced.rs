//! BalancedCumulativeIndex - O(log n) updates and queries via Fenwick tree
//!
//! The tree is laid out zero-based over `tree.len()` slots (the capacity):
//! slot `i` holds the sum of weights `[i & (i + 1), i]`. Slots at or past
//! `values.len()` stand for zero-weight units, so appending into spare
//! capacity is a plain point update.
//!
//! # Complexity
//!
//! - `set_value`: O(log n)
//! - `prefix_sum`: O(log n)
//! - `index_of`: O(log n) (top-down descent)
//! - `total_sum`: O(1)
//! - tail `insert_values` / `remove_values`: O(k log n), amortized over capacity changes
//! - interior `insert_values` / `remove_values`: O(capacity - edit point)
//!
//! Capacity doubles on growth and halves back to `2 * len` once fewer than a
//! quarter of the slots hold units, so it stays within a constant factor of
//! `len` after removals.

use super::contract::{check_count, check_index, check_insert, check_range};
use super::{CumulativeIndex, Strategy};
use crate::model::weight::sum_of;
use crate::model::{IndexError, IndexOfResult, Sum, Weight};
use tracing::{debug, trace};

/// Cumulative index backed by a Fenwick tree with eager propagation.
///
/// No query ever pays for earlier edits; suited to workloads that interleave
/// single-unit updates and reads across the whole sequence.
///
/// # Examples
///
/// ```
/// # use cumulative_index::index::{BalancedCumulativeIndex, CumulativeIndex};
/// # use cumulative_index::model::IndexOfResult;
/// let mut index = BalancedCumulativeIndex::new(vec![1, 2, 3, 4]);
/// index.remove_values(1, 2).unwrap();
/// assert_eq!(index.total_sum(), 5);
/// assert_eq!(index.index_of(4).unwrap(), IndexOfResult::new(1, 3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BalancedCumulativeIndex {
    values: Vec<Weight>,
    /// Fenwick tree backing storage; `tree.len() >= values.len()`.
    tree: Vec<i64>,
    total: Sum,
}

impl BalancedCumulativeIndex {
    /// Creates an index over `values` with no spare capacity.
    pub fn new(values: Vec<Weight>) -> Self {
        let total = sum_of(&values);
        let tree = build_tree(&values, values.len());
        Self {
            values,
            tree,
            total,
        }
    }

    /// Creates an empty index whose tree can take `capacity` units before
    /// it has to be rebuilt.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            tree: vec![0; capacity],
            total: 0,
        }
    }

    /// Number of units the tree can hold without a rebuild.
    pub fn capacity(&self) -> usize {
        self.tree.len()
    }

    /// Grows the tree to hold at least `needed` units, rebuilding it in full.
    ///
    /// Returns true if a rebuild happened.
    fn reserve(&mut self, needed: usize) -> bool {
        if needed <= self.tree.len() {
            return false;
        }
        let capacity = needed.max(self.tree.len() * 2);
        self.tree = build_tree(&self.values, capacity);
        debug!(capacity, len = self.values.len(), "grew fenwick tree");
        true
    }

    /// Rebuilds the tree with `2 * len` slots, releasing slack left by removals.
    fn shrink(&mut self) {
        let capacity = (self.values.len() * 2).max(1);
        self.tree = build_tree(&self.values, capacity);
        debug!(capacity, len = self.values.len(), "shrank fenwick tree");
    }

    /// Recomputes every tree slot at or after `start` from `values`.
    ///
    /// Slots below `start` only cover units below `start`, which the caller
    /// guarantees are unchanged.
    fn rebuild_from(&mut self, start: usize) {
        let capacity = self.tree.len();
        for i in start..capacity {
            self.tree[i] = self.values.get(i).map_or(0, |&w| i64::from(w));
        }

        // Slots covering the prefix [0, start) feed parents at or after `start`.
        let mut count = start;
        while count > 0 {
            let child = count - 1;
            let parent = child | (child + 1);
            if parent < capacity {
                self.tree[parent] += self.tree[child];
            }
            count &= count - 1;
        }

        for i in start..capacity {
            let parent = i | (i + 1);
            if parent < capacity {
                self.tree[parent] += self.tree[i];
            }
        }

        trace!(start, capacity, "rebuilt fenwick suffix");
    }
}

impl From<Vec<Weight>> for BalancedCumulativeIndex {
    fn from(values: Vec<Weight>) -> Self {
        Self::new(values)
    }
}

impl CumulativeIndex for BalancedCumulativeIndex {
    fn strategy(&self) -> Strategy {
        Strategy::Balanced
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
        let sum = fenwick::array::prefix_sum(&self.tree, count - 1);
        Ok(sum.max(0) as Sum)
    }

    fn index_of(&mut self, sum: Sum) -> Result<IndexOfResult, IndexError> {
        let len = self.values.len();
        if len == 0 {
            return Err(IndexError::EmptySequence);
        }

        // Descend to the largest `count` with prefix_sum(count) <= sum.
        // That count is the first unit whose inclusive sum exceeds `sum`.
        let mut count = 0usize;
        let mut remaining = sum;
        let mut step = highest_power_of_two_leq(len);
        while step != 0 {
            let next = count + step;
            if next <= len {
                let node = self.tree[next - 1].max(0) as Sum;
                if node <= remaining {
                    remaining -= node;
                    count = next;
                }
            }
            step >>= 1;
        }

        if count < len {
            return Ok(IndexOfResult::new(count, remaining));
        }

        // Clamped: `remaining` is `sum - total`; measure from the last unit's start.
        let last = len - 1;
        Ok(IndexOfResult::new(
            last,
            remaining + Sum::from(self.values[last]),
        ))
    }

    fn set_value(&mut self, index: usize, weight: Weight) -> Result<bool, IndexError> {
        check_index(index, self.values.len())?;
        let old = self.values[index];
        if old == weight {
            return Ok(false);
        }

        let delta = i64::from(weight) - i64::from(old);
        fenwick::array::update(&mut self.tree, index, delta);
        self.values[index] = weight;
        self.total = self.total - Sum::from(old) + Sum::from(weight);
        Ok(true)
    }

    fn insert_values(&mut self, at: usize, weights: &[Weight]) -> Result<bool, IndexError> {
        let len = self.values.len();
        check_insert(at, len)?;
        if weights.is_empty() {
            return Ok(false);
        }

        self.values.splice(at..at, weights.iter().copied());
        self.total += sum_of(weights);

        if !self.reserve(self.values.len()) {
            if at == len {
                for (offset, &w) in weights.iter().enumerate() {
                    fenwick::array::update(&mut self.tree, at + offset, i64::from(w));
                }
            } else {
                self.rebuild_from(at);
            }
        }

        trace!(at, count = weights.len(), len = self.values.len(), "inserted units");
        Ok(true)
    }

    fn remove_values(&mut self, start: usize, count: usize) -> Result<bool, IndexError> {
        let len = self.values.len();
        check_range(start, count, len)?;
        if count == 0 {
            return Ok(false);
        }

        let end = start + count;
        self.total -= sum_of(&self.values[start..end]);

        if (len - count) * 4 < self.tree.len() {
            self.values.drain(start..end);
            self.shrink();
        } else if end == len {
            for i in start..end {
                let w = self.values[i];
                if w != 0 {
                    fenwick::array::update(&mut self.tree, i, -i64::from(w));
                }
            }
            self.values.truncate(start);
        } else {
            self.values.drain(start..end);
            self.rebuild_from(start);
        }

        trace!(start, count, len = self.values.len(), "removed units");
        Ok(true)
    }
}

/// Builds a zero-based Fenwick tree with `capacity` slots over `values`.
///
/// Linear time: each slot is complete before it is folded into its parent.
fn build_tree(values: &[Weight], capacity: usize) -> Vec<i64> {
    debug_assert!(capacity >= values.len());
    let mut tree = vec![0i64; capacity];
    for (slot, &w) in tree.iter_mut().zip(values) {
        *slot = i64::from(w);
    }
    for i in 0..capacity {
        let parent = i | (i + 1);
        if parent < capacity {
            tree[parent] += tree[i];
        }
    }
    tree
}

fn highest_power_of_two_leq(n: usize) -> usize {
    match n {
        0 => 0,
        _ => 1 << (usize::BITS - 1 - n.leading_zeros()),
    }
}
