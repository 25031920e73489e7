//! Bounds stage.
//!
//! `upper = mean + threshold * std` and `lower = mean - threshold * std`.
//!
//! `|z| > threshold` and "value outside the band" are the same test in exact
//! arithmetic, but `mean + k * std` may round onto the value itself. That
//! happens near the threshold, and also far from it when `std` is floored to
//! machine epsilon. [`Bounds::reconcile`] moves the bound of every disagreeing
//! row by a few ulps so the band agrees with the flags exactly. The
//! [`Detector`](crate::Detector) always reconciles.

use crate::config::validate_threshold;
use crate::error::Result;
use crate::traits::{validate_same_length, SeriesElement};

/// Upper and lower envelope around the rolling mean.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds<T> {
    /// `mean + threshold * std` per row.
    pub upper: Vec<T>,
    /// `mean - threshold * std` per row.
    pub lower: Vec<T>,
}

impl<T: SeriesElement> Bounds<T> {
    /// Adjusts bounds so a row is outside its band exactly when it is flagged.
    ///
    /// A flagged value sitting on or inside its band gets the bound on its
    /// side pulled just inside the value, never past the mean. An unflagged
    /// value outside its band gets the bound widened to the value. Returns
    /// the number of rows adjusted.
    ///
    /// # Errors
    ///
    /// Returns `Error::LengthMismatch` if `values`, `mean` or `is_anomaly`
    /// differ in length from the band.
    ///
    /// # Example
    ///
    /// ```
    /// use ts_anomaly::stages::bounds::bounds;
    ///
    /// let (value, mean, std) = (2.0 + 2.0 * f64::EPSILON, 2.0, f64::EPSILON);
    /// let mut band = bounds(&[mean], &[std], 1.5).unwrap();
    /// assert_eq!(band.upper[0], value);
    ///
    /// assert_eq!(band.reconcile(&[value], &[mean], &[true]).unwrap(), 1);
    /// assert!(value > band.upper[0]);
    /// ```
    pub fn reconcile(&mut self, values: &[T], mean: &[T], is_anomaly: &[bool]) -> Result<usize> {
        let len = self.upper.len();
        validate_same_length("upper_bound", len, "lower_bound", self.lower.len())?;
        validate_same_length("upper_bound", len, "values", values.len())?;
        validate_same_length("upper_bound", len, "rolling_mean", mean.len())?;
        validate_same_length("upper_bound", len, "is_anomaly", is_anomaly.len())?;

        let mut adjusted = 0;
        for (i, (&value, &m)) in values.iter().zip(mean).enumerate() {
            let outside = value > self.upper[i] || value < self.lower[i];
            if is_anomaly[i] == outside {
                continue;
            }
            adjusted += 1;
            match (is_anomaly[i], value > m) {
                (true, true) => self.upper[i] = (value - nudge(value)).max(m),
                (true, false) => self.lower[i] = (value + nudge(value)).min(m),
                (false, _) if value > self.upper[i] => self.upper[i] = value,
                (false, _) => self.lower[i] = value,
            }
        }
        Ok(adjusted)
    }
}

/// A step of one to two ulps of `x`, and never zero.
#[inline]
fn nudge<T: SeriesElement>(x: T) -> T {
    (x.abs() * T::epsilon()).max(T::min_positive_value())
}

/// Computes the anomaly band for each row.
///
/// # Errors
///
/// Returns an error if:
/// - `mean` and `std` differ in length (`Error::LengthMismatch`)
/// - `threshold` is not positive and finite (`Error::InvalidParameter`)
///
/// # Example
///
/// ```
/// use ts_anomaly::stages::bounds::bounds;
///
/// let band = bounds(&[10.0_f64, 20.0], &[1.0, 2.0], 2.0).unwrap();
/// assert_eq!(band.upper, vec![12.0, 24.0]);
/// assert_eq!(band.lower, vec![8.0, 16.0]);
/// ```
pub fn bounds<T: SeriesElement>(mean: &[T], std: &[T], threshold: f64) -> Result<Bounds<T>> {
    validate_same_length("rolling_mean", mean.len(), "rolling_std", std.len())?;
    validate_threshold(threshold)?;
    let k = T::from_f64(threshold)?;

    let (upper, lower) = mean
        .iter()
        .zip(std)
        .map(|(&m, &s)| {
            let half_width = k * s;
            (m + half_width, m - half_width)
        })
        .unzip();

    Ok(Bounds { upper, lower })
}
