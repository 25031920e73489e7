//! Detector configuration.
//!
//! [`DetectorConfig`] is plain data: it can be built in code, deserialized
//! from JSON, or assembled from CLI flags. [`DetectorConfig::validate`] is the
//! single place where parameter ranges are checked.
//!
//! # Example
//!
//! ```
//! use ts_anomaly::config::{DetectorConfig, WindowAlignment, ZeroVariancePolicy};
//!
//! let config = DetectorConfig::default()
//!     .with_window_size(30)
//!     .with_threshold(3.0)
//!     .with_alignment(WindowAlignment::Trailing)
//!     .with_zero_variance(ZeroVariancePolicy::MinStd(1e-6));
//!
//! assert!(config.validate().is_ok());
//! assert!(DetectorConfig::default().with_window_size(1).validate().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default rolling window length.
pub const DEFAULT_WINDOW_SIZE: usize = 20;

/// Default z-score threshold.
pub const DEFAULT_THRESHOLD: f64 = 2.5;

/// Smallest window for which a sample standard deviation exists.
pub const MIN_WINDOW_SIZE: usize = 2;

/// Which points form the baseline window for row `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowAlignment {
    /// The up-to-`W` points ending just before row `i`.
    ///
    /// The point under test is kept out of its own baseline. Rows with fewer
    /// than two predecessors use the trailing window instead.
    #[default]
    Preceding,
    /// The up-to-`W` points ending at and including row `i`.
    ///
    /// The point contributes to its own mean and deviation, which caps the
    /// attainable sample z-score at `(W - 1) / sqrt(W)`.
    Trailing,
}

impl WindowAlignment {
    /// Lower-case name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preceding => "preceding",
            Self::Trailing => "trailing",
        }
    }
}

impl fmt::Display for WindowAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowAlignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preceding" => Ok(Self::Preceding),
            "trailing" => Ok(Self::Trailing),
            _ => Err(Error::InvalidParameter {
                name: "alignment",
                value: s.to_string(),
                reason: "expected 'preceding' or 'trailing'",
            }),
        }
    }
}

/// What to do with a rolling standard deviation that is zero.
///
/// A zero deviation appears whenever a window is perfectly flat, including the
/// single-point window at the start of the series. Left alone it would turn
/// every z-score in that window into a division by zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ZeroVariancePolicy {
    /// Replace an exact zero with the element type's machine epsilon.
    #[default]
    Epsilon,
    /// Floor every deviation at the given positive value.
    MinStd(f64),
}

impl ZeroVariancePolicy {
    /// Checks the policy's own parameter.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` when `MinStd` is not positive and finite.
    pub fn validate(self) -> Result<()> {
        match self {
            Self::Epsilon => Ok(()),
            Self::MinStd(min) if min.is_finite() && min > 0.0 => Ok(()),
            Self::MinStd(min) => Err(Error::InvalidParameter {
                name: "min_std",
                value: min.to_string(),
                reason: "minimum standard deviation must be a positive finite number",
            }),
        }
    }
}

/// Parameters of one detection run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    /// Rolling window length, at least 2. Clamped to the series length.
    pub window_size: usize,
    /// Absolute z-score above which a point is anomalous. Also scales the bounds.
    pub threshold: f64,
    /// Baseline window alignment.
    pub alignment: WindowAlignment,
    /// Treatment of zero rolling deviations.
    pub zero_variance: ZeroVariancePolicy,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            threshold: DEFAULT_THRESHOLD,
            alignment: WindowAlignment::default(),
            zero_variance: ZeroVariancePolicy::default(),
        }
    }
}

impl DetectorConfig {
    /// Sets the window size.
    #[must_use]
    pub const fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Sets the threshold.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the window alignment.
    #[must_use]
    pub const fn with_alignment(mut self, alignment: WindowAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the zero-variance policy.
    #[must_use]
    pub const fn with_zero_variance(mut self, zero_variance: ZeroVariancePolicy) -> Self {
        self.zero_variance = zero_variance;
        self
    }

    /// Checks every parameter range.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for `window_size < 2`, a threshold
    /// that is not positive and finite, or an invalid zero-variance policy.
    pub fn validate(&self) -> Result<()> {
        validate_window_size(self.window_size)?;
        validate_threshold(self.threshold)?;
        self.zero_variance.validate()
    }
}

/// Checks that `window_size >= 2`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` otherwise.
#[inline]
pub fn validate_window_size(window_size: usize) -> Result<()> {
    if window_size < MIN_WINDOW_SIZE {
        Err(Error::invalid_window(window_size))
    } else {
        Ok(())
    }
}

/// Checks that `threshold` is positive and finite.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` otherwise.
#[inline]
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if threshold.is_finite() && threshold > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_threshold(threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DetectorConfig::default();
        assert_eq!(config.window_size, 20);
        assert!((config.threshold - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.alignment, WindowAlignment::Preceding);
        assert_eq!(config.zero_variance, ZeroVariancePolicy::Epsilon);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let config = DetectorConfig::default()
            .with_window_size(5)
            .with_threshold(2.0)
            .with_alignment(WindowAlignment::Trailing)
            .with_zero_variance(ZeroVariancePolicy::MinStd(0.01));
        assert_eq!(config.window_size, 5);
        assert!((config.threshold - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.alignment, WindowAlignment::Trailing);
        assert_eq!(config.zero_variance, ZeroVariancePolicy::MinStd(0.01));
    }

    #[test]
    fn test_window_size_validation() {
        assert!(validate_window_size(0).is_err());
        assert!(validate_window_size(1).is_err());
        assert!(validate_window_size(2).is_ok());
        assert!(validate_window_size(10_000).is_ok());
    }

    #[test]
    fn test_threshold_validation() {
        assert!(validate_threshold(0.0).is_err());
        assert!(validate_threshold(-1.0).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
        assert!(validate_threshold(f64::INFINITY).is_err());
        assert!(validate_threshold(1e-9).is_ok());
        assert!(validate_threshold(5.0).is_ok());
    }

    #[test]
    fn test_min_std_validation() {
        assert!(ZeroVariancePolicy::MinStd(0.0).validate().is_err());
        assert!(ZeroVariancePolicy::MinStd(-1.0).validate().is_err());
        assert!(ZeroVariancePolicy::MinStd(f64::NAN).validate().is_err());
        assert!(ZeroVariancePolicy::MinStd(1e-3).validate().is_ok());
        assert!(ZeroVariancePolicy::Epsilon.validate().is_ok());
    }

    #[test]
    fn test_alignment_from_str() {
        assert_eq!(
            "preceding".parse::<WindowAlignment>().unwrap(),
            WindowAlignment::Preceding
        );
        assert_eq!(
            " Trailing ".parse::<WindowAlignment>().unwrap(),
            WindowAlignment::Trailing
        );
        assert!("centered".parse::<WindowAlignment>().is_err());
        assert_eq!(WindowAlignment::Trailing.to_string(), "trailing");
    }

    #[test]
    fn test_config_json_round_trip_shape() {
        let json = r#"{
            "window_size": 12,
            "threshold": 3.0,
            "alignment": "trailing",
            "zero_variance": { "kind": "min_std", "value": 0.5 }
        }"#;
        let config: DetectorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.window_size, 12);
        assert_eq!(config.alignment, WindowAlignment::Trailing);
        assert_eq!(config.zero_variance, ZeroVariancePolicy::MinStd(0.5));

        let rendered = serde_json::to_string(&config).unwrap();
        assert!(rendered.contains("\"alignment\":\"trailing\""));
    }

    #[test]
    fn test_config_json_partial_uses_defaults() {
        let config: DetectorConfig = serde_json::from_str(r#"{ "threshold": 4.0 }"#).unwrap();
        assert_eq!(config.window_size, DEFAULT_WINDOW_SIZE);
        assert!((config.threshold - 4.0).abs() < f64::EPSILON);
        assert_eq!(config.zero_variance, ZeroVariancePolicy::Epsilon);
    }

    #[test]
    fn test_config_json_rejects_unknown_fields() {
        let result: std::result::Result<DetectorConfig, _> =
            serde_json::from_str(r#"{ "window": 4 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_epsilon_policy_json() {
        let policy: ZeroVariancePolicy = serde_json::from_str(r#"{ "kind": "epsilon" }"#).unwrap();
        assert_eq!(policy, ZeroVariancePolicy::Epsilon);
    }
}
