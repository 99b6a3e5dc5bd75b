//! Weight and sum scalar types, plus checked conversion from untyped input.
//!
//! Weights are stored as `u32` and accumulated as `u64`, so a sequence of
//! `u32::MAX` weights needs more than four billion units before the total can
//! overflow. Negative weights are unrepresentable in the typed API; boundaries
//! that accept signed integers (scripts, JSON) go through [`validate_weights`].

use crate::model::error::IndexError;

/// Per-unit weight (e.g. rendered line count of one buffer line).
pub type Weight = u32;

/// Cumulative sum of weights.
pub type Sum = u64;

/// Converts a single signed value into a [`Weight`].
///
/// `position` is reported back in the error so callers can point at the
/// offending element.
///
/// # Errors
///
/// - [`IndexError::NegativeWeight`] if `value < 0`
/// - [`IndexError::WeightTooLarge`] if `value > u32::MAX`
///
/// # Examples
///
/// ```
/// # use cumulative_index::model::weight::checked_weight;
/// assert_eq!(checked_weight(0, 7).unwrap(), 7);
/// assert!(checked_weight(0, -1).is_err());
/// ```
pub fn checked_weight(position: usize, value: i64) -> Result<Weight, IndexError> {
    if value < 0 {
        return Err(IndexError::NegativeWeight { position, value });
    }
    Weight::try_from(value).map_err(|_| IndexError::WeightTooLarge { position, value })
}

/// Converts a slice of signed values into weights, rejecting the first
/// negative or oversized element.
///
/// # Errors
///
/// Returns the error of the first element that fails [`checked_weight`].
///
/// # Examples
///
/// ```
/// # use cumulative_index::model::weight::validate_weights;
/// # use cumulative_index::model::error::IndexError;
/// assert_eq!(validate_weights(&[1, 0, 3]).unwrap(), vec![1, 0, 3]);
/// assert_eq!(
///     validate_weights(&[1, -2]),
///     Err(IndexError::NegativeWeight { position: 1, value: -2 })
/// );
/// ```
pub fn validate_weights(values: &[i64]) -> Result<Vec<Weight>, IndexError> {
    values
        .iter()
        .enumerate()
        .map(|(position, &value)| checked_weight(position, value))
        .collect()
}

/// Sums a slice of weights without overflow.
pub(crate) fn sum_of(weights: &[Weight]) -> Sum {
    weights.iter().map(|&w| Sum::from(w)).sum()
}
