//! Commonly used types and functions in one import.
//!
//! ```
//! use ts_anomaly::prelude::*;
//!
//! let series = Series::from_values(vec![2.0_f64, 2.1, 1.9, 2.0, 2.05, 7.5]).unwrap();
//! let detector = Detector::new(DetectorConfig::default().with_window_size(4)).unwrap();
//! let annotated = detector.detect(&series).unwrap();
//! let summary = AnomalySummary::from_annotated(&annotated);
//! assert_eq!(summary.anomaly_count, 1);
//! ```

// Error types
pub use crate::error::{Error, Result};

// Traits
pub use crate::traits::{SeriesElement, ValidatedInput};

// Configuration
pub use crate::config::{DetectorConfig, WindowAlignment, ZeroVariancePolicy};

// Pipeline
pub use crate::detector::{detect, Detector};
pub use crate::report::{DetectionReport, Warning};
pub use crate::series::{AnnotatedRow, AnnotatedSeries, Series};
pub use crate::summary::{top_anomalies, AnomalySummary};

// Individual stages
pub use crate::stages::{bounds, flag_anomalies, rolling_stats, rolling_stats_with, z_scores};
pub use crate::stages::{Bounds, RollingStats};
