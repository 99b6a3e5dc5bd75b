//! Argument checks and result shaping shared by both strategies.
//!
//! Each check returns the matching [`IndexError`] instead of clamping, so a
//! caller that drifts out of sync with the index fails at the first bad call.

use crate::model::{IndexError, IndexOfResult, Sum};

/// Ensures `index` addresses an existing unit.
pub fn check_index(index: usize, len: usize) -> Result<(), IndexError> {
    if index < len {
        Ok(())
    } else {
        Err(IndexError::IndexOutOfRange { index, len })
    }
}

/// Ensures `count` is a valid prefix length (`0..=len`).
pub fn check_count(count: usize, len: usize) -> Result<(), IndexError> {
    if count <= len {
        Ok(())
    } else {
        Err(IndexError::CountOutOfRange { count, len })
    }
}

/// Ensures `at` is a valid insertion point (`0..=len`).
pub fn check_insert(at: usize, len: usize) -> Result<(), IndexError> {
    if at <= len {
        Ok(())
    } else {
        Err(IndexError::InsertOutOfRange { index: at, len })
    }
}

/// Ensures `[start, start + count)` lies within the sequence.
///
/// Overflowing `start + count` is reported as an invalid range.
pub fn check_range(start: usize, count: usize, len: usize) -> Result<(), IndexError> {
    match start.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(IndexError::InvalidRange { start, count, len }),
    }
}

/// Shapes the inverse-query result from the first unit whose inclusive sum
/// exceeds the target.
///
/// `first_above` is the smallest `i` with `C(i) > sum`, or `len` if there is
/// none. `start_of(i)` must return `prefix_sum(i)`, the offset where unit `i`
/// begins. A missing unit clamps to the last one.
///
/// # Examples
///
/// ```
/// # use cumulative_index::index::contract::locate;
/// # use cumulative_index::model::IndexOfResult;
/// // weights [1, 1, 2, 1, 3]: unit starts 0, 1, 2, 4, 5
/// let starts = [0u64, 1, 2, 4, 5];
/// assert_eq!(locate(5, 2, 3, |i| starts[i]), IndexOfResult::new(2, 1));
/// assert_eq!(locate(5, 5, 8, |i| starts[i]), IndexOfResult::new(4, 3));
/// ```
pub fn locate(
    len: usize,
    first_above: usize,
    sum: Sum,
    start_of: impl FnOnce(usize) -> Sum,
) -> IndexOfResult {
    debug_assert!(len > 0, "locate requires a non-empty sequence");
    let index = first_above.min(len - 1);
    IndexOfResult::new(index, sum - start_of(index))
}
