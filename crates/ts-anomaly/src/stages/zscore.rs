//! Z-score stage.
//!
//! `z[i] = (values[i] - mean[i]) / std[i]`, where `std` comes from the rolling
//! stage and is already strictly positive.

use crate::error::{Error, Result};
use crate::traits::{validate_same_length, SeriesElement};

/// Computes the z-score of every value against its rolling statistics.
///
/// # Errors
///
/// Returns an error if:
/// - the three columns differ in length (`Error::LengthMismatch`)
/// - some `std[i]` is not strictly positive (`Error::InvalidInput`)
///
/// # Example
///
/// ```
/// use ts_anomaly::stages::zscore::z_scores;
///
/// let z = z_scores(&[10.0_f64, 14.0], &[10.0, 10.0], &[2.0, 2.0]).unwrap();
/// assert_eq!(z, vec![0.0, 2.0]);
/// ```
pub fn z_scores<T: SeriesElement>(values: &[T], mean: &[T], std: &[T]) -> Result<Vec<T>> {
    validate_same_length("values", values.len(), "rolling_mean", mean.len())?;
    validate_same_length("values", values.len(), "rolling_std", std.len())?;

    if let Some(index) = std.iter().position(|&s| s.is_nan() || s <= T::zero()) {
        return Err(Error::InvalidInput {
            reason: format!("rolling standard deviation at index {index} is not positive"),
        });
    }

    Ok(values
        .iter()
        .zip(mean)
        .zip(std)
        .map(|((&x, &m), &s)| (x - m) / s)
        .collect())
}
