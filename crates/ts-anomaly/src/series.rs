//! Input and output tables.
//!
//! Both tables are columnar. [`Series`] is the validated input; it can only be
//! built through [`Series::new`] or [`Series::from_values`], so a `Series` in
//! hand is always non-empty, sorted and finite. [`AnnotatedSeries`] is the
//! detector's output: the input columns plus every derived column.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::report::DetectionReport;
use crate::traits::{SeriesElement, ValidatedInput};

/// A validated univariate time series.
///
/// `Ts` is the timestamp type. It only needs an order; the detector never
/// inspects timestamps beyond carrying them to the output. Positional series
/// built with [`Series::from_values`] use `usize`.
///
/// # Example
///
/// ```
/// use ts_anomaly::Series;
///
/// let series = Series::new(vec![100_i64, 160, 220], vec![1.0_f64, 1.5, 0.5]).unwrap();
/// assert_eq!(series.len(), 3);
///
/// assert!(Series::new(vec![2_i64, 1], vec![1.0_f64, 2.0]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series<T, Ts = usize> {
    timestamps: Vec<Ts>,
    values: Vec<T>,
}

impl<T: SeriesElement, Ts: PartialOrd> Series<T, Ts> {
    /// Builds a series from parallel timestamp and value columns.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the columns differ in length, hold
    /// fewer than two rows, contain a non-finite value, or the timestamps
    /// decrease anywhere. Equal consecutive timestamps are allowed.
    pub fn new(timestamps: Vec<Ts>, values: Vec<T>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(Error::InvalidInput {
                reason: format!(
                    "timestamps has {} elements, values has {}",
                    timestamps.len(),
                    values.len()
                ),
            });
        }
        values.validate_not_empty()?;
        values.validate_min_length(2)?;
        values.validate_finite()?;

        // Incomparable timestamps count as out of order
        if let Some(index) = timestamps.windows(2).position(|pair| {
            !matches!(
                pair[0].partial_cmp(&pair[1]),
                Some(Ordering::Less | Ordering::Equal)
            )
        }) {
            return Err(Error::InvalidInput {
                reason: format!(
                    "timestamps must be non-decreasing; row {} is earlier than row {index}",
                    index + 1
                ),
            });
        }

        Ok(Self { timestamps, values })
    }
}

impl<T: SeriesElement> Series<T, usize> {
    /// Builds a series with positional timestamps `0..n`.
    ///
    /// # Errors
    ///
    /// Same as [`Series::new`], minus the ordering check.
    pub fn from_values(values: Vec<T>) -> Result<Self> {
        let timestamps = (0..values.len()).collect();
        Self::new(timestamps, values)
    }
}

impl<T, Ts> Series<T, Ts> {
    /// The timestamp column.
    #[must_use]
    pub fn timestamps(&self) -> &[Ts] {
        &self.timestamps
    }

    /// The value column.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false` for a constructed series; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the series, returning `(timestamps, values)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Ts>, Vec<T>) {
        (self.timestamps, self.values)
    }
}

/// The input series with every derived column attached.
///
/// All columns have the same length as the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedSeries<T, Ts = usize> {
    /// Input timestamps, unchanged.
    pub timestamps: Vec<Ts>,
    /// Input values, unchanged.
    pub values: Vec<T>,
    /// Rolling mean.
    pub rolling_mean: Vec<T>,
    /// Rolling standard deviation after the zero-variance floor. Never zero.
    pub rolling_std: Vec<T>,
    /// `(value - rolling_mean) / rolling_std`.
    pub z_score: Vec<T>,
    /// `|z_score| > threshold`.
    pub is_anomaly: Vec<bool>,
    /// `rolling_mean + threshold * rolling_std`.
    pub upper_bound: Vec<T>,
    /// `rolling_mean - threshold * rolling_std`.
    pub lower_bound: Vec<T>,
    /// Parameters used and warnings raised.
    pub report: DetectionReport,
}

/// A borrowed view of one row of an [`AnnotatedSeries`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotatedRow<'a, T, Ts> {
    /// Row position in the table.
    pub index: usize,
    /// Timestamp.
    pub timestamp: &'a Ts,
    /// Observed value.
    pub value: T,
    /// Rolling mean.
    pub rolling_mean: T,
    /// Rolling standard deviation.
    pub rolling_std: T,
    /// Z-score.
    pub z_score: T,
    /// Anomaly flag.
    pub is_anomaly: bool,
    /// Upper bound.
    pub upper_bound: T,
    /// Lower bound.
    pub lower_bound: T,
}

impl<T: SeriesElement, Ts> AnnotatedSeries<T, Ts> {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of flagged rows.
    #[must_use]
    pub fn anomaly_count(&self) -> usize {
        self.is_anomaly.iter().filter(|&&flag| flag).count()
    }

    /// Row `index`, or `None` past the end.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<AnnotatedRow<'_, T, Ts>> {
        Some(AnnotatedRow {
            index,
            timestamp: self.timestamps.get(index)?,
            value: *self.values.get(index)?,
            rolling_mean: *self.rolling_mean.get(index)?,
            rolling_std: *self.rolling_std.get(index)?,
            z_score: *self.z_score.get(index)?,
            is_anomaly: *self.is_anomaly.get(index)?,
            upper_bound: *self.upper_bound.get(index)?,
            lower_bound: *self.lower_bound.get(index)?,
        })
    }

    /// Iterates over all rows in order.
    pub fn rows(&self) -> impl Iterator<Item = AnnotatedRow<'_, T, Ts>> + '_ {
        (0..self.len()).filter_map(move |i| self.row(i))
    }

    /// Iterates over the flagged rows in order.
    pub fn anomalies(&self) -> impl Iterator<Item = AnnotatedRow<'_, T, Ts>> + '_ {
        self.rows().filter(|row| row.is_anomaly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WindowAlignment;

    fn tiny_annotated() -> AnnotatedSeries<f64, usize> {
        AnnotatedSeries {
            timestamps: vec![0, 1, 2],
            values: vec![1.0, 2.0, 9.0],
            rolling_mean: vec![1.0, 1.5, 1.5],
            rolling_std: vec![f64::EPSILON, 0.7, 0.7],
            z_score: vec![0.0, 0.7, 10.7],
            is_anomaly: vec![false, false, true],
            upper_bound: vec![1.0, 2.9, 2.9],
            lower_bound: vec![1.0, 0.1, 0.1],
            report: DetectionReport {
                requested_window: 2,
                effective_window: 2,
                threshold: 2.0,
                alignment: WindowAlignment::Preceding,
                warnings: Vec::new(),
            },
        }
    }

    #[test]
    fn test_series_new_valid() {
        let series = Series::new(vec![1_i64, 1, 2], vec![0.5_f64, 0.25, 0.125]).unwrap();
        assert_eq!(series.len(), 3);
        assert!(!series.is_empty());
        assert_eq!(series.timestamps(), &[1, 1, 2]);
        assert_eq!(series.values(), &[0.5, 0.25, 0.125]);
    }

    #[test]
    fn test_series_from_values_positions() {
        let series = Series::from_values(vec![3.0_f32, 4.0, 5.0]).unwrap();
        assert_eq!(series.timestamps(), &[0, 1, 2]);
        let (ts, values) = series.into_parts();
        assert_eq!(ts.len(), values.len());
    }

    #[test]
    fn test_series_rejects_length_mismatch() {
        match Series::new(vec![1_i64, 2, 3], vec![1.0_f64, 2.0]) {
            Err(Error::InvalidInput { reason }) => {
                assert_eq!(reason, "timestamps has 3 elements, values has 2");
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_series_rejects_short_input() {
        assert!(matches!(
            Series::<f64>::from_values(vec![]),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            Series::from_values(vec![1.0_f64]),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_series_rejects_non_finite() {
        assert!(matches!(
            Series::from_values(vec![1.0_f64, f64::INFINITY]),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_series_rejects_unsorted_timestamps() {
        match Series::new(vec![1_i64, 3, 2], vec![1.0_f64, 2.0, 3.0]) {
            Err(Error::InvalidInput { reason }) => assert!(reason.contains("row 1")),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_series_rejects_nan_timestamps() {
        assert!(Series::new(vec![0.0_f64, f64::NAN], vec![1.0_f64, 2.0]).is_err());
    }

    #[test]
    fn test_annotated_rows() {
        let annotated = tiny_annotated();
        assert_eq!(annotated.len(), 3);
        assert_eq!(annotated.anomaly_count(), 1);
        assert_eq!(annotated.rows().count(), 3);

        let row = annotated.row(2).unwrap();
        assert_eq!(*row.timestamp, 2);
        assert!(row.is_anomaly);
        assert!((row.value - 9.0).abs() < f64::EPSILON);
        assert!(annotated.row(3).is_none());

        let flagged: Vec<usize> = annotated.anomalies().map(|r| r.index).collect();
        assert_eq!(flagged, vec![2]);
    }
}
