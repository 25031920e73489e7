//! The four detection stages.
//!
//! Each stage is a pure function over slices, usable on its own:
//!
//! 1. [`rolling`]: rolling mean and floored standard deviation
//! 2. [`zscore`]: per-row z-score
//! 3. [`threshold`]: anomaly flags
//! 4. [`bounds`]: upper and lower envelope
//!
//! [`Detector`](crate::Detector) chains them over a [`Series`](crate::Series).

pub mod bounds;
pub mod rolling;
pub mod threshold;
pub mod zscore;

pub use bounds::{bounds, Bounds};
pub use rolling::{rolling_stats, rolling_stats_with, RollingStats};
pub use threshold::flag_anomalies;
pub use zscore::z_scores;
