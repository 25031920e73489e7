//! Shared test utilities for ts-anomaly tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed for the noise in [`noisy_series_with_spikes`].
#[allow(dead_code)]
pub const NOISE_SEED: u64 = 42;

/// Approximate equality check for floating-point values.
///
/// Two NaN values are considered equal for testing purposes.
#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() < eps
}

/// Absolute or relative closeness, whichever is looser.
///
/// Z-scores against a floored deviation reach 1e17 and only agree relatively.
#[allow(dead_code)]
pub fn close_enough(a: f64, b: f64) -> bool {
    approx_eq(a, b, LOOSE_EPSILON) || ((a - b).abs() / a.abs().max(b.abs())) < 1e-9
}

/// Standard epsilon for high-precision comparisons.
#[allow(dead_code)]
pub const EPSILON: f64 = 1e-10;

/// Looser epsilon for comparisons involving accumulated floating-point operations.
#[allow(dead_code)]
pub const LOOSE_EPSILON: f64 = 1e-6;

/// `n` flat points at `level` followed by one point at `spike`.
#[allow(dead_code)]
pub fn flat_then_spike(level: f64, n: usize, spike: f64) -> Vec<f64> {
    let mut values = vec![level; n];
    values.push(spike);
    values
}

/// Deterministic wavy series with a handful of large spikes.
///
/// Noise is uniform in `[-2, 2)` from a seeded `ChaCha8Rng`. The spikes are
/// far larger than the noise, so they stand out for any draw.
#[allow(dead_code)]
pub fn noisy_series_with_spikes(len: usize) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(NOISE_SEED);
    (0..len)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64;
            let noise = (rng.random::<f64>() - 0.5) * 4.0;
            let base = 50.0 + 5.0 * (t * std::f64::consts::TAU / 24.0).sin() + noise;
            if i % 37 == 20 {
                base + 40.0
            } else if i % 53 == 40 {
                base - 35.0
            } else {
                base
            }
        })
        .collect()
}
