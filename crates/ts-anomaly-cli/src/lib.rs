//! ts-anomaly CLI library
//!
//! This module exposes the CLI components for testing and reuse: argument
//! parsing, CSV loading and writing, sample generation, and the command
//! drivers used by the `ts-anomaly` binary.

pub mod args;
pub mod csv_writer;
pub mod error;
pub mod loader;
pub mod sample_data;

pub use error::{CliError, Result};

use log::LevelFilter;
use ts_anomaly::{top_anomalies, AnomalySummary, Detector};

use crate::args::{Args, Command, DetectArgs, GenerateArgs};
use crate::csv_writer::{write_annotated, write_anomalies, write_sample, OutputDest, TIMESTAMP_FORMAT};
use crate::loader::load_csv;
use crate::sample_data::generate;

/// Initialise `env_logger` on stderr.
///
/// Without `-v`/`-q` the level comes from `RUST_LOG`, defaulting to `info`.
/// `-q` keeps errors only; `-v` raises to debug and `-vv` to trace.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.format_timestamp(None).format_target(false);

    let forced = match (quiet, verbose) {
        (true, _) => Some(LevelFilter::Error),
        (false, 0) => None,
        (false, 1) => Some(LevelFilter::Debug),
        (false, _) => Some(LevelFilter::Trace),
    };
    if let Some(level) = forced {
        builder.filter_level(level);
    }

    // A logger may already be installed when called from tests
    let _ = builder.try_init();
}

/// Runs the parsed command.
///
/// # Errors
///
/// Propagates the error of the command that ran.
pub fn run(args: &Args) -> Result<()> {
    match &args.command {
        Command::Detect(detect_args) => run_detect(detect_args).map(|_| ()),
        Command::Generate(generate_args) => run_generate(generate_args),
    }
}

/// Loads the input, runs detection, writes the output and logs a summary.
///
/// # Errors
///
/// Returns the first configuration, loading, detection or output error.
pub fn run_detect(args: &DetectArgs) -> Result<AnomalySummary> {
    let config = args.detector_config()?;
    let detector = Detector::new(config)?;
    log::debug!(
        "window {} ({}), threshold {}, zero variance {:?}",
        config.window_size,
        config.alignment,
        config.threshold,
        config.zero_variance
    );

    let loaded = load_csv(&args.input, &args.load_options())?;
    log::info!(
        "loaded {} rows from {} ({} / {})",
        loaded.series.len(),
        args.input.display(),
        loaded.timestamp_column,
        loaded.value_column
    );

    let annotated = detector.detect(&loaded.series)?;
    let summary = AnomalySummary::from_annotated(&annotated);

    let dest = OutputDest::from_arg(args.output.as_deref());
    let writer = dest.writer()?;
    if args.anomalies_only {
        write_anomalies(writer, &annotated)?;
    } else {
        write_annotated(writer, &annotated)?;
    }
    log::debug!("wrote output to {dest}");

    log::info!(
        "{} anomalies in {} rows ({:.2}%)",
        summary.anomaly_count,
        summary.total_rows,
        summary.anomaly_rate
    );
    if let (Some(min), Some(max)) = (summary.min_abs_z, summary.max_abs_z) {
        log::info!("|z| of anomalies ranges from {min:.3} to {max:.3}");
    }
    for row in top_anomalies(&annotated, args.top) {
        log::info!(
            "  {}  value {:.4}  z {:+.3}  mean {:.4}",
            row.timestamp.format(TIMESTAMP_FORMAT),
            row.value,
            row.z_score,
            row.rolling_mean
        );
    }

    Ok(summary)
}

/// Generates a sample series and writes it.
///
/// # Errors
///
/// Returns an argument error or an output error.
pub fn run_generate(args: &GenerateArgs) -> Result<()> {
    let config = args.sample_config()?;
    let sample = generate(&config)?;
    let dest = OutputDest::from_arg(args.output.as_deref());
    write_sample(dest.writer()?, &sample)?;

    log::info!(
        "wrote {} points to {dest} ({} spikes, {} drifts)",
        sample.values.len(),
        sample.spike_indices.len(),
        sample.drift_starts.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ts-anomaly-lib-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_generate_then_detect_finds_injected_spikes() {
        let sample_path = temp_path("sample.csv");
        let out_path = temp_path("annotated.csv");

        let generate_args = GenerateArgs {
            rows: 500,
            start: "2024-01-01".to_string(),
            seed: 42,
            no_anomalies: false,
            output: Some(sample_path.display().to_string()),
        };
        run_generate(&generate_args).unwrap();

        let detect_args = DetectArgs {
            input: sample_path.clone(),
            timestamp_column: None,
            value_column: None,
            window: Some(24),
            threshold: Some(3.0),
            alignment: None,
            min_std: None,
            config: None,
            output: Some(out_path.display().to_string()),
            anomalies_only: false,
            top: 3,
        };
        let summary = run_detect(&detect_args).unwrap();
        assert_eq!(summary.total_rows, 500);
        assert!(summary.anomaly_count > 0);

        let written = fs::read_to_string(&out_path).unwrap();
        assert_eq!(written.lines().count(), 501);

        fs::remove_file(sample_path).ok();
        fs::remove_file(out_path).ok();
    }

    #[test]
    fn test_detect_missing_input() {
        let detect_args = DetectArgs {
            input: PathBuf::from("/nonexistent/input.csv"),
            timestamp_column: None,
            value_column: None,
            window: None,
            threshold: None,
            alignment: None,
            min_std: None,
            config: None,
            output: None,
            anomalies_only: false,
            top: 5,
        };
        let err = run_detect(&detect_args).unwrap_err();
        assert_eq!(err.exit_code(), error::EXIT_DATA_ERROR);
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging(0, false);
        init_logging(2, false);
    }
}
