//! CLI argument parsing module.
//!
//! This module defines the command-line interface for ts-anomaly using clap.
//!
//! # Examples
//!
//! ```bash
//! # Detect with the default window (20) and threshold (2.5)
//! ts-anomaly detect input.csv
//!
//! # Custom window and threshold, written to a file
//! ts-anomaly detect input.csv -w 24 -t 3.0 -o annotated.csv
//!
//! # Only the flagged rows, strongest first
//! ts-anomaly detect input.csv --anomalies-only
//!
//! # Parameters from a JSON file, with the threshold overridden
//! ts-anomaly detect input.csv -c detector.json -t 2.0
//!
//! # Write a 500-point hourly sample with injected anomalies
//! ts-anomaly generate -o sample.csv
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand, ValueEnum};
use ts_anomaly::{DetectorConfig, WindowAlignment, ZeroVariancePolicy};

use crate::error::{CliError, Result};
use crate::loader::LoadOptions;
use crate::sample_data::SampleConfig;

/// ts-anomaly: rolling z-score anomaly detection for time series
#[derive(Parser, Debug)]
#[command(name = "ts-anomaly")]
#[command(author, version, about = "Rolling z-score anomaly detection for time series")]
#[command(long_about = "ts-anomaly flags points that sit unusually far from the \
    mean of their recent history. Input is a CSV file with a timestamp column and \
    a value column; the annotated series is written to a file or stdout.")]
pub struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// The operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Detect anomalies in a CSV time series
    #[command(about = "Detect anomalies in a CSV time series")]
    Detect(DetectArgs),

    /// Generate a synthetic sample series
    #[command(about = "Generate a synthetic hourly series with injected anomalies")]
    Generate(GenerateArgs),
}

/// Window alignment as accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentArg {
    /// Baseline is the window ending just before each point
    Preceding,
    /// Baseline is the window ending at each point
    Trailing,
}

impl From<AlignmentArg> for WindowAlignment {
    fn from(arg: AlignmentArg) -> Self {
        match arg {
            AlignmentArg::Preceding => Self::Preceding,
            AlignmentArg::Trailing => Self::Trailing,
        }
    }
}

/// Arguments of `detect`.
#[derive(ClapArgs, Debug, Clone)]
pub struct DetectArgs {
    /// Input CSV file
    pub input: PathBuf,

    /// Timestamp column (defaults to the first column)
    #[arg(long)]
    pub timestamp_column: Option<String>,

    /// Value column (defaults to the second column)
    #[arg(long)]
    pub value_column: Option<String>,

    /// Rolling window size [default: 20]
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Absolute z-score above which a point is anomalous [default: 2.5]
    #[arg(short, long, allow_negative_numbers = true)]
    pub threshold: Option<f64>,

    /// Baseline window alignment [default: preceding]
    #[arg(long, value_enum)]
    pub alignment: Option<AlignmentArg>,

    /// Floor every rolling standard deviation at this value
    #[arg(long, allow_negative_numbers = true)]
    pub min_std: Option<f64>,

    /// JSON file with detector parameters; flags take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output CSV file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write only the flagged rows, strongest first
    #[arg(long)]
    pub anomalies_only: bool,

    /// Number of strongest anomalies to log
    #[arg(long, default_value = "5")]
    pub top: usize,
}

impl DetectArgs {
    /// Builds the detector configuration.
    ///
    /// Starts from the config file when one is given, then applies the
    /// command-line flags on top of it.
    ///
    /// # Errors
    ///
    /// - `CliError::IoError` if the config file cannot be read
    /// - `CliError::ConfigError` if it is not a valid detector config
    /// - `CliError::InvalidArgument` for a flag value that can never be valid
    /// - `CliError::DetectionError` if the merged parameters are rejected
    pub fn detector_config(&self) -> Result<DetectorConfig> {
        let mut config = match &self.config {
            Some(path) => read_config_file(path)?,
            None => DetectorConfig::default(),
        };

        if let Some(window) = self.window {
            config = config.with_window_size(window);
        }
        if let Some(threshold) = self.threshold {
            if threshold.is_nan() {
                return Err(CliError::InvalidArgument {
                    argument: "threshold".to_string(),
                    reason: "cannot be NaN".to_string(),
                    suggestion: Some("Use a positive number like 2.5".to_string()),
                });
            }
            config = config.with_threshold(threshold);
        }
        if let Some(alignment) = self.alignment {
            config = config.with_alignment(alignment.into());
        }
        if let Some(min_std) = self.min_std {
            if min_std.is_nan() {
                return Err(CliError::InvalidArgument {
                    argument: "min-std".to_string(),
                    reason: "cannot be NaN".to_string(),
                    suggestion: Some("Use a small positive number like 0.01".to_string()),
                });
            }
            config = config.with_zero_variance(ZeroVariancePolicy::MinStd(min_std));
        }

        config.validate()?;
        Ok(config)
    }

    /// CSV loading options for this run.
    #[must_use]
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            timestamp_column: self.timestamp_column.clone(),
            value_column: self.value_column.clone(),
        }
    }
}

fn read_config_file(path: &Path) -> Result<DetectorConfig> {
    let text = fs::read_to_string(path).map_err(|e| CliError::IoError {
        source: e,
        path: Some(path.display().to_string()),
    })?;
    serde_json::from_str(&text).map_err(|e| CliError::ConfigError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Arguments of `generate`.
#[derive(ClapArgs, Debug, Clone)]
pub struct GenerateArgs {
    /// Number of hourly points
    #[arg(short = 'n', long, default_value = "500")]
    pub rows: usize,

    /// First timestamp, as YYYY-MM-DD or YYYY-MM-DD HH:MM:SS
    #[arg(long, default_value = "2024-01-01")]
    pub start: String,

    /// Random seed
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Leave out spikes and drifts
    #[arg(long)]
    pub no_anomalies: bool,

    /// Output CSV file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<String>,
}

impl GenerateArgs {
    /// Builds the generator configuration.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidArgument` for an unparseable start time or
    /// zero rows.
    pub fn sample_config(&self) -> Result<SampleConfig> {
        if self.rows == 0 {
            return Err(CliError::InvalidArgument {
                argument: "rows".to_string(),
                reason: "must be at least 1".to_string(),
                suggestion: Some("Use a count like 500".to_string()),
            });
        }
        let start = parse_start(&self.start).ok_or_else(|| CliError::InvalidArgument {
            argument: "start".to_string(),
            reason: format!("cannot parse '{}' as a date or date-time", self.start),
            suggestion: Some("Use YYYY-MM-DD or YYYY-MM-DD HH:MM:SS".to_string()),
        })?;

        Ok(SampleConfig {
            rows: self.rows,
            start,
            seed: self.seed,
            inject_anomalies: !self.no_anomalies,
        })
    }
}

fn parse_start(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
