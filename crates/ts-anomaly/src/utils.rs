//! Float comparison helpers and small numeric facts about rolling z-scores.
//!
//! # Example
//!
//! ```
//! use ts_anomaly::utils::{approx_eq, max_trailing_z_score, EPSILON};
//!
//! assert!(approx_eq(0.1_f64 + 0.2, 0.3, EPSILON));
//! assert!((max_trailing_z_score(5) - 4.0 / 5.0_f64.sqrt()).abs() < EPSILON);
//! ```

use crate::traits::SeriesElement;

/// Tolerance for comparisons of directly computed values.
pub const EPSILON: f64 = 1e-10;

/// Tolerance for values that went through many accumulated operations.
pub const LOOSE_EPSILON: f64 = 1e-6;

/// Absolute approximate equality. Two NaNs compare equal.
#[inline]
#[must_use]
pub fn approx_eq<T: SeriesElement>(a: T, b: T, tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() < tolerance
}

/// Relative approximate equality, for values of very different magnitudes.
///
/// ```
/// use ts_anomaly::utils::approx_eq_relative;
///
/// assert!(approx_eq_relative(4.05e17_f64, 4.05e17 + 10.0, 1e-12));
/// assert!(!approx_eq_relative(1.0_f64, 1.1, 1e-3));
/// ```
#[inline]
#[must_use]
pub fn approx_eq_relative<T: SeriesElement>(a: T, b: T, rel_tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }

    let diff = (a - b).abs();
    let max_abs = a.abs().max(b.abs());
    if max_abs == T::zero() {
        return diff == T::zero();
    }
    diff / max_abs < rel_tolerance
}

/// Largest `|z|` a point can reach against a trailing window of `window`
/// points that includes the point itself: `(W - 1) / sqrt(W)`.
///
/// Attained when the other `W - 1` points are equal. A threshold at or above
/// this value can never flag anything under trailing alignment.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn max_trailing_z_score(window: usize) -> f64 {
    if window < 2 {
        return 0.0;
    }
    let w = window as f64;
    (w - 1.0) / w.sqrt()
}
