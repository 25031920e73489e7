//! Run metadata attached to every detection result.

use std::fmt;

use serde::Serialize;

use crate::config::WindowAlignment;

/// A degraded-but-valid condition met during detection.
///
/// Warnings never abort a run. They are recorded in the [`DetectionReport`]
/// and logged at `warn` level by the [`Detector`](crate::Detector).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The window was larger than the series and was shrunk to its length.
    WindowClamped {
        /// Window size the caller asked for.
        requested: usize,
        /// Window size actually used.
        effective: usize,
    },
    /// No row had a full preceding window, so trailing windows were used.
    TrailingFallback {
        /// Window size of the trailing windows.
        window: usize,
    },
    /// Some rows had a zero rolling deviation that the zero-variance policy raised.
    ZeroVariance {
        /// Number of affected rows.
        rows: usize,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WindowClamped {
                requested,
                effective,
            } => write!(
                f,
                "window size {requested} exceeds series length; using {effective}"
            ),
            Self::TrailingFallback { window } => write!(
                f,
                "no row has {window} preceding points; scoring against trailing windows"
            ),
            Self::ZeroVariance { rows } => write!(
                f,
                "{rows} row(s) had zero rolling variance; standard deviation was floored"
            ),
        }
    }
}

/// Parameters actually used by a run, plus any warnings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionReport {
    /// Window size the caller asked for.
    pub requested_window: usize,
    /// Window size used after clamping to the series length. The last row
    /// is summarised over exactly this many points.
    pub effective_window: usize,
    /// Threshold used for flags and bounds.
    pub threshold: f64,
    /// Baseline window alignment actually used.
    pub alignment: WindowAlignment,
    /// Conditions worth surfacing to the caller.
    pub warnings: Vec<Warning>,
}

impl DetectionReport {
    /// Returns `true` if the window was clamped.
    #[must_use]
    pub fn window_clamped(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, Warning::WindowClamped { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let clamped = Warning::WindowClamped {
            requested: 10,
            effective: 3,
        };
        assert_eq!(
            clamped.to_string(),
            "window size 10 exceeds series length; using 3"
        );

        let fallback = Warning::TrailingFallback { window: 3 };
        assert_eq!(
            fallback.to_string(),
            "no row has 3 preceding points; scoring against trailing windows"
        );

        let flat = Warning::ZeroVariance { rows: 4 };
        assert!(flat.to_string().starts_with("4 row(s)"));
    }

    #[test]
    fn test_warning_serializes_with_kind_tag() {
        let json = serde_json::to_value(Warning::ZeroVariance { rows: 2 }).unwrap();
        assert_eq!(json["kind"], "zero_variance");
        assert_eq!(json["rows"], 2);
    }

    #[test]
    fn test_report_window_clamped() {
        let mut report = DetectionReport {
            requested_window: 5,
            effective_window: 5,
            threshold: 2.0,
            alignment: WindowAlignment::Preceding,
            warnings: vec![Warning::ZeroVariance { rows: 1 }],
        };
        assert!(!report.window_clamped());

        report.warnings.push(Warning::WindowClamped {
            requested: 5,
            effective: 4,
        });
        assert!(report.window_clamped());
    }
}
