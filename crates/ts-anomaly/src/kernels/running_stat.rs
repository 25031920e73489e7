//! Running statistics using Welford's algorithm.
//!
//! This module provides the numerically stable accumulator behind the
//! rolling-statistics stage.
//!
//! # Algorithm
//!
//! Welford's algorithm computes running statistics in a single pass with
//! O(1) per-element update time. It is numerically stable even with extreme
//! values where naive sum-of-squares approaches would suffer from catastrophic
//! cancellation.
//!
//! The algorithm maintains:
//! - `count`: Number of elements processed
//! - `mean`: Running mean of the values
//! - `m2`: Sum of squared differences from the mean (for variance)
//!
//! # Formula
//!
//! ```text
//! For each new value x:
//!   count += 1
//!   delta = x - mean
//!   mean += delta / count
//!   delta2 = x - mean  # Note: using updated mean
//!   m2 += delta * delta2
//!
//! Sample variance = m2 / (count - 1)
//! ```
//!
//! Removing a value applies the inverse update, which lets a fixed-size
//! window slide in O(1) per step.
//!
//! # Partial windows
//!
//! [`trailing_stats`] follows the "at most `window` points, never look ahead"
//! convention: index `i` is summarised over `data[i + 1 - min(i + 1, window)..=i]`,
//! so the first `window - 1` outputs use every point seen so far instead of
//! being NaN.
//!
//! # Flat windows
//!
//! Sliding removal is not exact in floating point: after a large value leaves
//! the window, `m2` can retain a residue of a few ulps. A window whose values
//! are all identical must still report a variance of exactly zero, otherwise a
//! flat stretch produces a tiny positive deviation and absurd z-scores. The
//! kernel therefore tracks the length of the current run of equal values and,
//! whenever that run covers the whole window, emits the value itself as the
//! mean and an exact zero variance.
//!
//! # Example
//!
//! ```
//! use ts_anomaly::kernels::running_stat::{RunningStat, trailing_stats};
//!
//! let mut stat: RunningStat<f64> = RunningStat::new();
//! stat.update(1.0);
//! stat.update(2.0);
//! stat.update(3.0);
//! assert!((stat.mean() - 2.0).abs() < 1e-10);
//! assert!((stat.sample_variance() - 1.0).abs() < 1e-10);
//!
//! let result = trailing_stats(&[1.0_f64, 2.0, 3.0, 4.0], 3).unwrap();
//! assert!((result.mean[0] - 1.0).abs() < 1e-10);
//! assert!((result.mean[1] - 1.5).abs() < 1e-10);
//! assert!((result.mean[3] - 3.0).abs() < 1e-10);
//! ```
//!
//! # References
//!
//! - Welford, B. P. (1962). "Note on a method for calculating corrected sums
//!   of squares and products". Technometrics. 4 (3): 419-420.
//! - Knuth, D. E. (1997). The Art of Computer Programming, volume 2:
//!   Seminumerical Algorithms (3rd ed.). Section 4.2.2, page 232.

use crate::error::{Error, Result};
use crate::traits::{SeriesElement, ValidatedInput};

/// A running statistics accumulator using Welford's algorithm.
///
/// # Example
///
/// ```
/// use ts_anomaly::kernels::running_stat::RunningStat;
///
/// let mut stat: RunningStat<f64> = RunningStat::new();
/// stat.update(10.0);
/// stat.update(20.0);
/// stat.update(30.0);
///
/// assert!((stat.mean() - 20.0).abs() < 1e-10);
/// assert_eq!(stat.count(), 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RunningStat<T> {
    count: usize,
    mean: T,
    m2: T, // Sum of squared differences from the mean
}

impl<T: SeriesElement> Default for RunningStat<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SeriesElement> RunningStat<T> {
    /// Creates a new empty accumulator. The mean of an empty accumulator is NaN.
    #[must_use]
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: T::nan(),
            m2: T::zero(),
        }
    }

    /// Converts a count to `T`. Every `usize` fits in a float (possibly rounded).
    #[inline]
    fn count_as(count: usize) -> T {
        T::from_usize(count).unwrap_or_else(|_| T::infinity())
    }

    /// Incorporates a new value.
    pub fn update(&mut self, value: T) {
        self.count += 1;

        if self.count == 1 {
            self.mean = value;
            self.m2 = T::zero();
        } else {
            let delta = value - self.mean;
            self.mean = self.mean + delta / Self::count_as(self.count);
            let delta2 = value - self.mean;
            self.m2 = self.m2 + delta * delta2;
        }
    }

    /// Removes a value previously added with [`update`](Self::update).
    ///
    /// This is the inverse of `update` and is used for sliding windows.
    /// Removing from an empty accumulator is a no-op.
    pub fn remove(&mut self, value: T) {
        if self.count == 0 {
            return;
        }

        if self.count == 1 {
            self.reset();
            return;
        }

        let count_t = Self::count_as(self.count);
        let delta = value - self.mean;
        let new_mean = (self.mean * count_t - value) / (count_t - T::one());

        let delta2 = value - new_mean;
        self.m2 = self.m2 - delta * delta2;

        // Cancellation can push m2 slightly below zero
        if self.m2 < T::zero() {
            self.m2 = T::zero();
        }

        self.mean = new_mean;
        self.count -= 1;
    }

    /// Returns the number of values currently in the accumulator.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns the running mean, or NaN when empty.
    #[must_use]
    pub fn mean(&self) -> T {
        self.mean
    }

    /// Returns the sample variance `m2 / (count - 1)`.
    ///
    /// Returns 0 when fewer than two values are present: a single point has
    /// no spread.
    #[must_use]
    pub fn sample_variance(&self) -> T {
        if self.count < 2 {
            return T::zero();
        }
        self.m2 / Self::count_as(self.count - 1)
    }

    /// Returns the sample standard deviation.
    #[must_use]
    pub fn sample_stddev(&self) -> T {
        self.sample_variance().sqrt()
    }

    /// Resets the accumulator to its initial state.
    pub fn reset(&mut self) {
        self.count = 0;
        self.mean = T::nan();
        self.m2 = T::zero();
    }
}

/// Output of [`trailing_stats`]. Every vector has the input's length.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowStats<T> {
    /// Mean of each trailing window.
    pub mean: Vec<T>,
    /// Sample standard deviation of each trailing window (0 for one point).
    pub stddev: Vec<T>,
}

/// Computes the mean and sample standard deviation of the trailing window
/// ending at every index.
///
/// Windows at the start of the series are partial (see the module docs).
///
/// # Errors
///
/// Returns an error if:
/// - The input data is empty (`Error::InvalidInput`)
/// - The window is zero (`Error::InvalidParameter`)
///
/// # Performance
///
/// O(n) time, O(n) space for the two output vectors.
pub fn trailing_stats<T: SeriesElement>(data: &[T], window: usize) -> Result<WindowStats<T>> {
    if window == 0 {
        return Err(Error::InvalidParameter {
            name: "window",
            value: window.to_string(),
            reason: "window must be at least 1",
        });
    }
    data.validate_not_empty()?;

    let mut mean = Vec::with_capacity(data.len());
    let mut stddev = Vec::with_capacity(data.len());

    let mut stat = RunningStat::new();
    let mut run_len = 0usize;

    for (i, &value) in data.iter().enumerate() {
        if i >= window {
            stat.remove(data[i - window]);
        }
        stat.update(value);

        run_len = if i > 0 && data[i - 1] == value {
            run_len + 1
        } else {
            1
        };

        if run_len >= stat.count() {
            mean.push(value);
            stddev.push(T::zero());
        } else {
            mean.push(stat.mean());
            stddev.push(stat.sample_stddev());
        }
    }

    Ok(WindowStats { mean, stddev })
}
