//! Aggregate figures over an annotated series.

use std::cmp::Ordering;

use serde::Serialize;

use crate::series::{AnnotatedRow, AnnotatedSeries};
use crate::traits::SeriesElement;

/// Headline numbers for one detection run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnomalySummary {
    /// Rows analysed.
    pub total_rows: usize,
    /// Rows flagged as anomalous.
    pub anomaly_count: usize,
    /// `anomaly_count / total_rows`, in percent.
    pub anomaly_rate: f64,
    /// Smallest `|z|` among flagged rows, `None` without anomalies.
    pub min_abs_z: Option<f64>,
    /// Largest `|z|` among flagged rows, `None` without anomalies.
    pub max_abs_z: Option<f64>,
}

impl AnomalySummary {
    /// Summarises an annotated series.
    ///
    /// # Example
    ///
    /// ```
    /// use ts_anomaly::{detect, AnomalySummary, Series};
    ///
    /// let series = Series::from_values(vec![1.0_f64, 1.1, 0.9, 1.0, 9.0]).unwrap();
    /// let summary = AnomalySummary::from_annotated(&detect(&series, 4, 3.0).unwrap());
    /// assert_eq!(summary.total_rows, 5);
    /// assert_eq!(summary.anomaly_count, 1);
    /// assert!((summary.anomaly_rate - 20.0).abs() < 1e-12);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_annotated<T: SeriesElement, Ts>(annotated: &AnnotatedSeries<T, Ts>) -> Self {
        let total_rows = annotated.len();
        let mut anomaly_count = 0;
        let mut min_abs_z: Option<f64> = None;
        let mut max_abs_z: Option<f64> = None;

        for row in annotated.anomalies() {
            anomaly_count += 1;
            let abs_z = row.z_score.abs().as_f64();
            min_abs_z = Some(min_abs_z.map_or(abs_z, |m| m.min(abs_z)));
            max_abs_z = Some(max_abs_z.map_or(abs_z, |m| m.max(abs_z)));
        }

        let anomaly_rate = if total_rows == 0 {
            0.0
        } else {
            anomaly_count as f64 / total_rows as f64 * 100.0
        };

        Self {
            total_rows,
            anomaly_count,
            anomaly_rate,
            min_abs_z,
            max_abs_z,
        }
    }
}

/// The `k` flagged rows with the largest `|z|`, largest first.
///
/// Ties keep their original row order.
///
/// # Example
///
/// ```
/// use ts_anomaly::{detect, top_anomalies, Series};
///
/// let series = Series::from_values(vec![0.0_f64, 0.1, -0.1, 0.0, 5.0, 0.05, -9.0]).unwrap();
/// let annotated = detect(&series, 4, 2.0).unwrap();
/// let top = top_anomalies(&annotated, 1);
/// assert_eq!(top.len(), 1);
/// assert_eq!(top[0].index, 4);
/// ```
#[must_use]
pub fn top_anomalies<T: SeriesElement, Ts>(
    annotated: &AnnotatedSeries<T, Ts>,
    k: usize,
) -> Vec<AnnotatedRow<'_, T, Ts>> {
    let mut rows: Vec<_> = annotated.anomalies().collect();
    rows.sort_by(|a, b| {
        b.z_score
            .abs()
            .partial_cmp(&a.z_score.abs())
            .unwrap_or(Ordering::Equal)
    });
    rows.truncate(k);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WindowAlignment;
    use crate::report::DetectionReport;

    fn annotated_with_scores(z: &[f64], threshold: f64) -> AnnotatedSeries<f64, usize> {
        let n = z.len();
        AnnotatedSeries {
            timestamps: (0..n).collect(),
            values: z.to_vec(),
            rolling_mean: vec![0.0; n],
            rolling_std: vec![1.0; n],
            z_score: z.to_vec(),
            is_anomaly: z.iter().map(|v| v.abs() > threshold).collect(),
            upper_bound: vec![threshold; n],
            lower_bound: vec![-threshold; n],
            report: DetectionReport {
                requested_window: 2,
                effective_window: 2,
                threshold,
                alignment: WindowAlignment::Preceding,
                warnings: Vec::new(),
            },
        }
    }

    #[test]
    fn test_summary_counts_and_extremes() {
        let annotated = annotated_with_scores(&[0.5, -3.0, 2.1, 4.5, 0.0, -1.9, 2.5, 1.0], 2.0);
        let summary = AnomalySummary::from_annotated(&annotated);

        assert_eq!(summary.total_rows, 8);
        assert_eq!(summary.anomaly_count, 4);
        assert!((summary.anomaly_rate - 50.0).abs() < 1e-12);
        assert_eq!(summary.min_abs_z, Some(2.1));
        assert_eq!(summary.max_abs_z, Some(4.5));
    }

    #[test]
    fn test_summary_without_anomalies() {
        let annotated = annotated_with_scores(&[0.1, 0.2, -0.3], 2.0);
        let summary = AnomalySummary::from_annotated(&annotated);
        assert_eq!(summary.anomaly_count, 0);
        assert_eq!(summary.anomaly_rate, 0.0);
        assert_eq!(summary.min_abs_z, None);
        assert_eq!(summary.max_abs_z, None);
    }

    #[test]
    fn test_top_anomalies_sorted_by_magnitude() {
        let annotated = annotated_with_scores(&[3.0, -5.0, 0.2, 4.0, -3.5], 2.0);
        let top: Vec<usize> = top_anomalies(&annotated, 3).iter().map(|r| r.index).collect();
        assert_eq!(top, vec![1, 3, 4]);
    }

    #[test]
    fn test_top_anomalies_ties_keep_row_order() {
        let annotated = annotated_with_scores(&[-3.0, 3.0, 0.0, 3.0], 2.0);
        let top: Vec<usize> = top_anomalies(&annotated, 10).iter().map(|r| r.index).collect();
        assert_eq!(top, vec![0, 1, 3]);
    }

    #[test]
    fn test_top_anomalies_zero_k() {
        let annotated = annotated_with_scores(&[3.0, 4.0], 2.0);
        assert!(top_anomalies(&annotated, 0).is_empty());
    }
}
