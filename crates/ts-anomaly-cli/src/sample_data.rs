//! Synthetic sample series for trying out the detector.
//!
//! The generated series is hourly and made of:
//!
//! - a base level of 50 plus a linear trend of 0.01 per hour
//! - a daily sine cycle of amplitude 5
//! - Gaussian noise with standard deviation 2
//!
//! With anomalies enabled, about 2% of the points get a spike of ±15..30 and
//! about 1% of the points start a 10-point linear drift reaching +10..20.
//!
//! Output is fully determined by the seed.
//!
//! # Example
//!
//! ```
//! use ts_anomaly_cli::sample_data::{generate, SampleConfig};
//!
//! let a = generate(&SampleConfig::default()).unwrap();
//! let b = generate(&SampleConfig::default()).unwrap();
//! assert_eq!(a.values, b.values);
//! assert_eq!(a.values.len(), 500);
//! ```

use std::f64::consts::PI;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{CliError, Result};

/// Parameters of the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleConfig {
    /// Number of hourly points.
    pub rows: usize,
    /// Timestamp of the first point.
    pub start: NaiveDateTime,
    /// RNG seed.
    pub seed: u64,
    /// Inject spikes and drifts.
    pub inject_anomalies: bool,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            rows: 500,
            start: NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
            seed: 42,
            inject_anomalies: true,
        }
    }
}

/// A generated series and where its anomalies were injected.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleData {
    /// Hourly timestamps starting at the configured start.
    pub timestamps: Vec<NaiveDateTime>,
    /// Values.
    pub values: Vec<f64>,
    /// Indices that received a spike, ascending.
    pub spike_indices: Vec<usize>,
    /// Indices where a drift starts, ascending.
    pub drift_starts: Vec<usize>,
}

/// Draws a standard normal variate with the Box-Muller transform.
fn standard_normal(rng: &mut ChaCha8Rng) -> f64 {
    // 1 - u keeps the logarithm finite
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// `n` hourly timestamps from `start`.
fn hourly_timestamps(start: NaiveDateTime, n: usize) -> Result<Vec<NaiveDateTime>> {
    (0..n)
        .map(|i| {
            i64::try_from(i)
                .ok()
                .and_then(Duration::try_hours)
                .and_then(|offset| start.checked_add_signed(offset))
                .ok_or_else(|| CliError::InvalidArgument {
                    argument: "start".to_string(),
                    reason: format!(
                        "{n} hourly points from {start} run past the last representable date"
                    ),
                    suggestion: Some("Use an earlier start or fewer rows".to_string()),
                })
        })
        .collect()
}

/// Generates a sample series.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` if the hourly timestamps would run
/// past the largest date `chrono` can represent.
#[allow(clippy::cast_precision_loss)]
pub fn generate(config: &SampleConfig) -> Result<SampleData> {
    let n = config.rows;
    let timestamps = hourly_timestamps(config.start, n)?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let mut values: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64;
            let trend = 0.01 * t;
            let seasonal = 5.0 * (2.0 * PI * t / 24.0).sin();
            let noise = 2.0 * standard_normal(&mut rng);
            50.0 + trend + seasonal + noise
        })
        .collect();

    let mut spike_indices = Vec::new();
    let mut drift_starts = Vec::new();

    if config.inject_anomalies && n > 0 {
        spike_indices = sample(&mut rng, n, n / 50).into_vec();
        for &idx in &spike_indices {
            let magnitude = rng.random_range(15.0..30.0);
            if rng.random_bool(0.5) {
                values[idx] += magnitude;
            } else {
                values[idx] -= magnitude;
            }
        }

        drift_starts = sample(&mut rng, n, n / 100).into_vec();
        for &idx in &drift_starts {
            let length = 10.min(n - idx);
            let peak = rng.random_range(10.0..20.0);
            for (step, value) in values[idx..idx + length].iter_mut().enumerate() {
                // Linear ramp from 0 to the peak, inclusive at both ends
                if length > 1 {
                    *value += peak * step as f64 / (length - 1) as f64;
                }
            }
        }

        spike_indices.sort_unstable();
        drift_starts.sort_unstable();
    }

    log::debug!(
        "generated {} points ({} spikes, {} drifts, seed {})",
        n,
        spike_indices.len(),
        drift_starts.len(),
        config.seed
    );

    Ok(SampleData {
        timestamps,
        values,
        spike_indices,
        drift_starts,
    })
}
