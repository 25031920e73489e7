//! Spike Detection Example
//!
//! Runs the detector over a short sensor trace, prints the annotated table
//! and the anomalies ranked by z-score.
//!
//! Run with: `cargo run --example detect_spikes`

use ts_anomaly::{
    top_anomalies, AnomalySummary, Detector, DetectorConfig, Series, WindowAlignment,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Temperature readings taken every 10 minutes (seconds since start)
    let timestamps: Vec<i64> = (0..24).map(|i| i * 600).collect();
    let readings = vec![
        21.4, 21.5, 21.3, 21.6, 21.5, 21.4, 21.7, 21.5, 27.9, 21.6, 21.4, 21.5, 21.6, 21.5, 21.3,
        21.4, 21.6, 21.5, 15.2, 21.4, 21.5, 21.6, 21.4, 21.5,
    ];
    let series = Series::new(timestamps, readings)?;

    let config = DetectorConfig::default()
        .with_window_size(6)
        .with_threshold(3.0);
    let annotated = Detector::new(config)?.detect(&series)?;

    println!(
        "{:>6}  {:>6}  {:>7}  {:>6}  {:>8}  {:>7}",
        "t", "value", "mean", "std", "z", "anomaly"
    );
    for row in annotated.rows() {
        println!(
            "{:>6}  {:>6.2}  {:>7.3}  {:>6.3}  {:>8.2}  {:>7}",
            row.timestamp,
            row.value,
            row.rolling_mean,
            row.rolling_std,
            row.z_score,
            if row.is_anomaly { "yes" } else { "" }
        );
    }
    println!();

    for warning in &annotated.report.warnings {
        println!("warning: {warning}");
    }

    let summary = AnomalySummary::from_annotated(&annotated);
    println!(
        "{} of {} points flagged ({:.1}%)",
        summary.anomaly_count, summary.total_rows, summary.anomaly_rate
    );
    for row in top_anomalies(&annotated, 5) {
        println!("  t={:>6}  value={:.2}  z={:+.2}", row.timestamp, row.value, row.z_score);
    }
    println!();

    // Trailing windows include the point under test, which damps its own z-score
    let trailing = Detector::new(config.with_alignment(WindowAlignment::Trailing))?
        .detect(&series)?;
    println!(
        "trailing alignment flags {} point(s) at the same threshold",
        trailing.anomaly_count()
    );

    Ok(())
}
