//! Threshold stage.
//!
//! A point is anomalous when `|z| > threshold`. The comparison is strict, so a
//! z-score exactly at the threshold is not flagged.

use crate::config::validate_threshold;
use crate::error::Result;
use crate::traits::SeriesElement;

/// Flags every z-score whose magnitude strictly exceeds `threshold`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `threshold` is not positive and finite.
///
/// # Example
///
/// ```
/// use ts_anomaly::stages::threshold::flag_anomalies;
///
/// let flags = flag_anomalies(&[0.5_f64, -3.1, 2.0, 2.5], 2.0).unwrap();
/// assert_eq!(flags, vec![false, true, false, true]);
/// ```
pub fn flag_anomalies<T: SeriesElement>(z_scores: &[T], threshold: f64) -> Result<Vec<bool>> {
    validate_threshold(threshold)?;
    let threshold = T::from_f64(threshold)?;
    Ok(z_scores.iter().map(|&z| z.abs() > threshold).collect())
}
