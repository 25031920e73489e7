//! Rolling statistics stage.
//!
//! Computes a rolling mean and sample standard deviation for every row, then
//! applies the zero-variance policy so no later division by zero can occur.
//!
//! # Windows
//!
//! - The window holds at most `W` points and never looks ahead.
//! - When `W` exceeds the series length it is clamped to the length.
//! - With [`WindowAlignment::Preceding`], row `i >= 2` is summarised over the
//!   trailing window ending at `i - 1`; rows 0 and 1 use their own trailing
//!   window.
//! - A preceding window of `W` points only exists when the series has more
//!   than `W` rows. Otherwise the stage uses trailing windows, so the last
//!   row is summarised over exactly `effective_window` points, and records
//!   the switch in [`RollingStats::alignment`].
//!
//! # Example
//!
//! ```
//! use ts_anomaly::stages::rolling::rolling_stats;
//! use ts_anomaly::WindowAlignment;
//!
//! let stats = rolling_stats(&[1.0_f64, 2.0, 3.0], 10).unwrap();
//! assert_eq!(stats.effective_window, 3);
//! assert!(stats.window_clamped());
//! assert_eq!(stats.alignment, WindowAlignment::Trailing);
//! assert_eq!(stats.mean[2], 2.0);
//! assert!(stats.std.iter().all(|&s| s > 0.0));
//! ```


use crate::config::{validate_window_size, WindowAlignment, ZeroVariancePolicy, MIN_WINDOW_SIZE};
use crate::error::Result;
use crate::kernels::running_stat::trailing_stats;
use crate::traits::{SeriesElement, ValidatedInput};

/// Output of the rolling statistics stage.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingStats<T> {
    /// Rolling mean per row.
    pub mean: Vec<T>,
    /// Rolling sample standard deviation per row, strictly positive.
    pub std: Vec<T>,
    /// Window size the caller asked for.
    pub requested_window: usize,
    /// Window size actually used, `min(requested_window, len)`.
    ///
    /// The last row is always summarised over exactly this many points.
    pub effective_window: usize,
    /// Alignment actually used. `Preceding` becomes `Trailing` when no row
    /// has `effective_window` points before it.
    pub alignment: WindowAlignment,
    /// Number of rows whose deviation was raised by the zero-variance policy.
    pub floored_rows: usize,
}

impl<T> RollingStats<T> {
    /// Returns `true` if the requested window was larger than the series.
    #[must_use]
    pub const fn window_clamped(&self) -> bool {
        self.effective_window < self.requested_window
    }

    /// Returns `true` if `Preceding` was asked for but trailing windows were used.
    #[must_use]
    pub fn fell_back_to_trailing(&self, requested: WindowAlignment) -> bool {
        requested != self.alignment
    }
}

/// Rolling statistics with the default alignment and zero-variance policy.
///
/// # Errors
///
/// See [`rolling_stats_with`].
pub fn rolling_stats<T: SeriesElement>(values: &[T], window_size: usize) -> Result<RollingStats<T>> {
    rolling_stats_with(
        values,
        window_size,
        WindowAlignment::default(),
        ZeroVariancePolicy::default(),
    )
}

/// Rolling statistics with explicit alignment and zero-variance policy.
///
/// # Errors
///
/// Returns an error if:
/// - `window_size < 2` (`Error::InvalidParameter`)
/// - the policy is `MinStd` with a non-positive value (`Error::InvalidParameter`)
/// - `values` has fewer than 2 points or contains a non-finite value
///   (`Error::InvalidInput`)
pub fn rolling_stats_with<T: SeriesElement>(
    values: &[T],
    window_size: usize,
    alignment: WindowAlignment,
    policy: ZeroVariancePolicy,
) -> Result<RollingStats<T>> {
    validate_window_size(window_size)?;
    policy.validate()?;
    values.validate_not_empty()?;
    values.validate_min_length(MIN_WINDOW_SIZE)?;
    values.validate_finite()?;

    let effective_window = window_size.min(values.len());
    let trailing = trailing_stats(values, effective_window)?;

    let alignment = if effective_window < values.len() {
        alignment
    } else {
        WindowAlignment::Trailing
    };
    let (mean, raw_std) = match alignment {
        WindowAlignment::Trailing => (trailing.mean, trailing.stddev),
        WindowAlignment::Preceding => shift_to_preceding(&trailing.mean, &trailing.stddev),
    };

    let floor = DeviationFloor::<T>::new(policy)?;
    let mut floored_rows = 0;
    let std = raw_std
        .into_iter()
        .map(|s| {
            let floored = floor.apply(s);
            if floored != s {
                floored_rows += 1;
            }
            floored
        })
        .collect();

    Ok(RollingStats {
        mean,
        std,
        requested_window: window_size,
        effective_window,
        alignment,
        floored_rows,
    })
}

/// Re-indexes trailing statistics so row `i >= 2` sees the window ending at `i - 1`.
fn shift_to_preceding<T: SeriesElement>(mean: &[T], std: &[T]) -> (Vec<T>, Vec<T>) {
    let shifted = |column: &[T]| -> Vec<T> {
        (0..column.len())
            .map(|i| if i < 2 { column[i] } else { column[i - 1] })
            .collect()
    };
    (shifted(mean), shifted(std))
}

/// The zero-variance policy resolved to the element type.
#[derive(Debug, Clone, Copy)]
enum DeviationFloor<T> {
    ReplaceZero(T),
    AtLeast(T),
}

impl<T: SeriesElement> DeviationFloor<T> {
    fn new(policy: ZeroVariancePolicy) -> Result<Self> {
        Ok(match policy {
            ZeroVariancePolicy::Epsilon => Self::ReplaceZero(T::epsilon()),
            ZeroVariancePolicy::MinStd(min) => Self::AtLeast(T::from_f64(min)?),
        })
    }

    #[inline]
    fn apply(self, std: T) -> T {
        match self {
            Self::ReplaceZero(eps) if std == T::zero() => eps,
            Self::ReplaceZero(_) => std,
            Self::AtLeast(min) => std.max(min),
        }
    }
}
