//! The detection pipeline.
//!
//! [`Detector`] runs the four stages in order over a [`Series`]:
//!
//! ```text
//! values ─► rolling ─► mean, std ─┬─► zscore ─► z ─► threshold ─► is_anomaly
//!                                 └─► bounds ─► upper, lower
//! ```
//!
//! The threshold and bounds stages read the same `threshold` from the
//! detector's config. The band is then reconciled with the flags, so a row is
//! flagged exactly when its value lies outside its band.
//!
//! # Example
//!
//! ```
//! use ts_anomaly::{detect, Series};
//!
//! let mut values = vec![10.0_f64; 9];
//! values.push(100.0);
//! let series = Series::from_values(values).unwrap();
//!
//! let annotated = detect(&series, 5, 2.0).unwrap();
//! assert!(annotated.is_anomaly[9]);
//! assert_eq!(annotated.anomaly_count(), 1);
//! ```

use crate::config::{validate_threshold, validate_window_size, DetectorConfig};
use crate::error::Result;
use crate::report::{DetectionReport, Warning};
use crate::series::{AnnotatedSeries, Series};
use crate::stages::{bounds, flag_anomalies, rolling_stats_with, z_scores};
use crate::traits::SeriesElement;

/// A validated, reusable detection pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Detector {
    config: DetectorConfig,
}

impl Detector {
    /// Creates a detector after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if any config field is out of range.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this detector runs with.
    #[must_use]
    pub const fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Runs the full pipeline and returns the annotated table.
    ///
    /// The input is not modified. Warnings are recorded in the returned
    /// report and logged at `warn` level.
    ///
    /// # Errors
    ///
    /// Propagates stage errors. With a `Series` built through its
    /// constructors only numeric conversion can fail in practice.
    pub fn detect<T, Ts>(&self, series: &Series<T, Ts>) -> Result<AnnotatedSeries<T, Ts>>
    where
        T: SeriesElement,
        Ts: Clone,
    {
        let DetectorConfig {
            window_size,
            threshold,
            alignment,
            zero_variance,
        } = self.config;
        let values = series.values();

        let stats = rolling_stats_with(values, window_size, alignment, zero_variance)?;
        let z_score = z_scores(values, &stats.mean, &stats.std)?;
        let is_anomaly = flag_anomalies(&z_score, threshold)?;
        let mut band = bounds(&stats.mean, &stats.std, threshold)?;
        let adjusted = band.reconcile(values, &stats.mean, &is_anomaly)?;
        if adjusted > 0 {
            log::trace!("moved {adjusted} bound(s) to agree with the flags");
        }

        let mut warnings = Vec::new();
        if stats.window_clamped() {
            warnings.push(Warning::WindowClamped {
                requested: stats.requested_window,
                effective: stats.effective_window,
            });
        }
        if stats.fell_back_to_trailing(alignment) {
            warnings.push(Warning::TrailingFallback {
                window: stats.effective_window,
            });
        }
        if stats.floored_rows > 0 {
            warnings.push(Warning::ZeroVariance {
                rows: stats.floored_rows,
            });
        }
        for warning in &warnings {
            log::warn!("{warning}");
        }

        let annotated = AnnotatedSeries {
            timestamps: series.timestamps().to_vec(),
            values: values.to_vec(),
            rolling_mean: stats.mean,
            rolling_std: stats.std,
            z_score,
            is_anomaly,
            upper_bound: band.upper,
            lower_bound: band.lower,
            report: DetectionReport {
                requested_window: window_size,
                effective_window: stats.effective_window,
                threshold,
                alignment: stats.alignment,
                warnings,
            },
        };

        log::debug!(
            "detected {} anomalies in {} rows (window {}, threshold {})",
            annotated.anomaly_count(),
            annotated.len(),
            annotated.report.effective_window,
            threshold
        );

        Ok(annotated)
    }
}

/// Runs the pipeline with the given window and threshold and default
/// alignment and zero-variance policy.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` for `window_size < 2` or a threshold
/// that is not positive and finite.
pub fn detect<T, Ts>(
    series: &Series<T, Ts>,
    window_size: usize,
    threshold: f64,
) -> Result<AnnotatedSeries<T, Ts>>
where
    T: SeriesElement,
    Ts: Clone,
{
    validate_window_size(window_size)?;
    validate_threshold(threshold)?;
    let config = DetectorConfig::default()
        .with_window_size(window_size)
        .with_threshold(threshold);
    Detector::new(config)?.detect(series)
}
