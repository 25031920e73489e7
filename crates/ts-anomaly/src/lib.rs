//! ts-anomaly: rolling z-score anomaly detection for univariate time series
//!
//! Each point is compared with the mean and standard deviation of a rolling
//! window of its neighbours. Points whose z-score exceeds a threshold are
//! flagged, and symmetric `mean ± threshold·std` bounds are produced for
//! plotting.
//!
//! # Features
//!
//! - **Single pass**: O(n) sliding Welford accumulator, exact on flat windows
//! - **Generics**: Works with both `f32` and `f64` values and any ordered timestamp type
//! - **Composable**: each stage is a plain function over slices
//! - **No silent degradation**: clamped windows and zero-variance windows are
//!   reported as [`Warning`]s alongside the result
//!
//! # Quick Start
//!
//! ```
//! use ts_anomaly::{detect, Series};
//!
//! let values = vec![10.0_f64, 10.2, 9.9, 10.1, 10.0, 9.8, 10.1, 25.0, 10.0, 9.9];
//! let series = Series::from_values(values).unwrap();
//!
//! let annotated = detect(&series, 5, 3.0).unwrap();
//! assert!(annotated.is_anomaly[7]);
//!
//! for row in annotated.anomalies() {
//!     assert!(row.value > row.upper_bound || row.value < row.lower_bound);
//! }
//! ```
//!
//! # Stages
//!
//! 1. [`stages::rolling_stats()`]: rolling mean and standard deviation
//! 2. [`stages::z_scores()`]: `(value - mean) / std`
//! 3. [`stages::flag_anomalies()`]: `|z| > threshold`
//! 4. [`stages::bounds()`]: `mean ± threshold·std`
//!
//! [`Detector`] chains them under one [`DetectorConfig`].
//!
//! # Error Handling
//!
//! ```
//! use ts_anomaly::{detect, Error, Series};
//!
//! let series = Series::from_values(vec![1.0_f64, 2.0, 3.0]).unwrap();
//! assert!(matches!(detect(&series, 1, 2.0), Err(Error::InvalidParameter { .. })));
//!
//! // A window longer than the series is clamped, not rejected
//! let annotated = detect(&series, 10, 2.0).unwrap();
//! assert_eq!(annotated.report.effective_window, 3);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::nursery)]
#![warn(clippy::needless_collect)]
#![warn(clippy::or_fun_call)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::useless_conversion)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod detector;
pub mod error;
pub mod kernels;
pub mod prelude;
pub mod report;
pub mod series;
pub mod stages;
pub mod summary;
pub mod traits;
pub mod utils;

// Re-export commonly used types at crate root
pub use config::{DetectorConfig, WindowAlignment, ZeroVariancePolicy};
pub use detector::{detect, Detector};
pub use error::{Error, Result};
pub use report::{DetectionReport, Warning};
pub use series::{AnnotatedRow, AnnotatedSeries, Series};
pub use summary::{top_anomalies, AnomalySummary};
pub use traits::{SeriesElement, ValidatedInput};
pub use utils::{approx_eq, approx_eq_relative, EPSILON, LOOSE_EPSILON};
