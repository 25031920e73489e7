//! Numeric policy tests: zero-variance handling, precision and element types.

#![allow(clippy::float_cmp)]

mod common;

use common::{approx_eq, flat_then_spike, LOOSE_EPSILON};
use ts_anomaly::stages::rolling_stats_with;
use ts_anomaly::{
    detect, Detector, DetectorConfig, Series, Warning, WindowAlignment, ZeroVariancePolicy,
};

#[test]
fn one_point_window_has_zero_z_score() {
    let series = Series::from_values(vec![7.0_f64, 9.0, 8.0]).unwrap();
    let annotated = detect(&series, 3, 2.0).unwrap();

    assert_eq!(annotated.rolling_mean[0], 7.0);
    assert_eq!(annotated.rolling_std[0], f64::EPSILON);
    assert_eq!(annotated.z_score[0], 0.0);
    assert!(!annotated.is_anomaly[0]);
}

#[test]
fn epsilon_policy_uses_machine_epsilon_of_element_type() {
    let series64 = Series::from_values(vec![1.0_f64; 4]).unwrap();
    let series32 = Series::from_values(vec![1.0_f32; 4]).unwrap();

    let a64 = detect(&series64, 2, 2.0).unwrap();
    let a32 = detect(&series32, 2, 2.0).unwrap();

    assert!(a64.rolling_std.iter().all(|&s| s == f64::EPSILON));
    assert!(a32.rolling_std.iter().all(|&s| s == f32::EPSILON));
    assert_eq!(a64.report.warnings, vec![Warning::ZeroVariance { rows: 4 }]);
}

#[test]
fn flat_window_after_spike_reports_exact_zero_variance() {
    // The spike has left the window by row 8, leaving a perfectly flat baseline
    let mut values = vec![0.1_f64, 0.1, 0.1, 1e6];
    values.extend(std::iter::repeat(0.1).take(8));
    let stats = rolling_stats_with(
        &values,
        3,
        WindowAlignment::Trailing,
        ZeroVariancePolicy::Epsilon,
    )
    .unwrap();

    for i in 6..values.len() {
        assert_eq!(stats.mean[i], 0.1, "mean at {i}");
        assert_eq!(stats.std[i], f64::EPSILON, "std at {i}");
    }
}

#[test]
fn small_step_after_flat_baseline_is_flagged_under_epsilon_policy() {
    let series = Series::from_values(flat_then_spike(5.0, 10, 5.001)).unwrap();
    let annotated = detect(&series, 5, 3.0).unwrap();
    assert!(annotated.is_anomaly[10]);
}

#[test]
fn min_std_policy_suppresses_small_steps() {
    let series = Series::from_values(flat_then_spike(5.0, 10, 5.001)).unwrap();
    let detector = Detector::new(
        DetectorConfig::default()
            .with_window_size(5)
            .with_threshold(3.0)
            .with_zero_variance(ZeroVariancePolicy::MinStd(0.01)),
    )
    .unwrap();
    let annotated = detector.detect(&series).unwrap();

    assert!(!annotated.is_anomaly[10]);
    assert!(approx_eq(annotated.z_score[10], 0.1, LOOSE_EPSILON));
    assert!(annotated.rolling_std.iter().all(|&s| s >= 0.01));
}

#[test]
fn min_std_policy_leaves_large_deviations_alone() {
    let values = vec![1.0_f64, 3.0, 5.0, 7.0, 9.0];
    let plain = rolling_stats_with(
        &values,
        3,
        WindowAlignment::Trailing,
        ZeroVariancePolicy::Epsilon,
    )
    .unwrap();
    let floored = rolling_stats_with(
        &values,
        3,
        WindowAlignment::Trailing,
        ZeroVariancePolicy::MinStd(0.5),
    )
    .unwrap();

    // Only the one-point window at row 0 is raised
    assert_eq!(floored.std[0], 0.5);
    assert_eq!(&floored.std[1..], &plain.std[1..]);
    assert_eq!(floored.floored_rows, 1);
}

#[test]
fn large_offsets_keep_precision() {
    let base = 1e9;
    let values: Vec<f64> = [4.0, 7.0, 13.0, 16.0, 4.0, 7.0, 13.0, 16.0]
        .iter()
        .map(|x| base + x)
        .collect();
    let stats = rolling_stats_with(
        &values,
        4,
        WindowAlignment::Trailing,
        ZeroVariancePolicy::Epsilon,
    )
    .unwrap();

    // Every full window is a rotation of [4, 7, 13, 16]: mean 10, sample variance 30
    for i in 3..values.len() {
        assert!(approx_eq(stats.mean[i], base + 10.0, 1e-4), "mean at {i}");
        assert!(approx_eq(stats.std[i], 30.0_f64.sqrt(), 1e-4), "std at {i}");
    }
}

#[test]
fn preceding_alignment_uses_own_window_for_first_two_rows() {
    let values = vec![3.0_f64, 5.0, 4.0, 10.0];
    let trailing = rolling_stats_with(
        &values,
        3,
        WindowAlignment::Trailing,
        ZeroVariancePolicy::Epsilon,
    )
    .unwrap();
    let preceding = rolling_stats_with(
        &values,
        3,
        WindowAlignment::Preceding,
        ZeroVariancePolicy::Epsilon,
    )
    .unwrap();

    assert_eq!(preceding.mean[..2], trailing.mean[..2]);
    assert_eq!(preceding.std[..2], trailing.std[..2]);
    assert_eq!(preceding.mean[3], 4.0);
    assert_eq!(preceding.std[3], 1.0);
}

#[test]
fn f32_series_detects_spike() {
    let mut values = vec![1.0_f32, 1.2, 0.9, 1.1, 1.0, 0.95, 1.05, 1.0];
    values.push(6.0);
    let series = Series::from_values(values).unwrap();
    let annotated = detect(&series, 6, 3.0).unwrap();

    assert!(annotated.is_anomaly[8]);
    assert_eq!(annotated.anomaly_count(), 1);
}
