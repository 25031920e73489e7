//! CSV output module for annotated series, anomaly lists and sample data.
//!
//! # Output Format
//!
//! Timestamps are written as `YYYY-MM-DD HH:MM:SS`, which the loader reads
//! back. Flags are written as `true`/`false`.
//!
//! | writer | columns |
//! |--------|---------|
//! | [`write_annotated`] | `timestamp,value,rolling_mean,rolling_std,z_score,is_anomaly,upper_bound,lower_bound` |
//! | [`write_anomalies`] | `timestamp,value,z_score,rolling_mean`, flagged rows only, largest `\|z\|` first |
//! | [`write_sample`] | `timestamp,value` |

use std::fs::File;
use std::io::{self, BufWriter, Write};

use chrono::NaiveDateTime;
use serde::Serialize;
use ts_anomaly::{top_anomalies, AnnotatedSeries};

use crate::error::{CliError, Result};
use crate::sample_data::SampleData;

/// Timestamp format of every CSV this crate writes.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Output destination: either stdout or a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDest {
    /// Write to stdout.
    Stdout,
    /// Write to a file at the given path.
    File(String),
}

impl OutputDest {
    /// Destination for an optional `-o` argument.
    #[must_use]
    pub fn from_arg(output: Option<&str>) -> Self {
        output.map_or(Self::Stdout, |path| Self::File(path.to_string()))
    }

    /// Create a writer for this output destination.
    ///
    /// # Errors
    ///
    /// Returns `CliError::IoError` if the file cannot be created.
    pub fn writer(&self) -> Result<Box<dyn Write>> {
        match self {
            Self::Stdout => Ok(Box::new(io::stdout())),
            Self::File(path) => {
                let file = File::create(path).map_err(|e| CliError::IoError {
                    source: e,
                    path: Some(path.clone()),
                })?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

impl std::fmt::Display for OutputDest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::File(path) => f.write_str(path),
        }
    }
}

#[derive(Serialize)]
struct AnnotatedRecord {
    timestamp: String,
    value: f64,
    rolling_mean: f64,
    rolling_std: f64,
    z_score: f64,
    is_anomaly: bool,
    upper_bound: f64,
    lower_bound: f64,
}

#[derive(Serialize)]
struct AnomalyRecord {
    timestamp: String,
    value: f64,
    z_score: f64,
    rolling_mean: f64,
}

#[derive(Serialize)]
struct SampleRecord {
    timestamp: String,
    value: f64,
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Writes every row with all derived columns.
///
/// The header comes from the first serialized record; an annotated series
/// always has at least two rows.
///
/// # Errors
///
/// Returns `CliError::IoError` or `CliError::CsvParseError` if writing fails.
pub fn write_annotated<W: Write>(
    writer: W,
    annotated: &AnnotatedSeries<f64, NaiveDateTime>,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in annotated.rows() {
        csv_writer.serialize(AnnotatedRecord {
            timestamp: format_timestamp(row.timestamp),
            value: row.value,
            rolling_mean: row.rolling_mean,
            rolling_std: row.rolling_std,
            z_score: row.z_score,
            is_anomaly: row.is_anomaly,
            upper_bound: row.upper_bound,
            lower_bound: row.lower_bound,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the flagged rows, largest `|z|` first.
///
/// The header is written even when nothing was flagged.
///
/// # Errors
///
/// Returns `CliError::IoError` or `CliError::CsvParseError` if writing fails.
pub fn write_anomalies<W: Write>(
    writer: W,
    annotated: &AnnotatedSeries<f64, NaiveDateTime>,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let rows = top_anomalies(annotated, usize::MAX);
    if rows.is_empty() {
        csv_writer.write_record(["timestamp", "value", "z_score", "rolling_mean"])?;
    }
    for row in rows {
        csv_writer.serialize(AnomalyRecord {
            timestamp: format_timestamp(row.timestamp),
            value: row.value,
            z_score: row.z_score,
            rolling_mean: row.rolling_mean,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes a generated sample as `timestamp,value`.
///
/// The header is written even for an empty sample.
///
/// # Errors
///
/// Returns `CliError::IoError` or `CliError::CsvParseError` if writing fails.
pub fn write_sample<W: Write>(writer: W, sample: &SampleData) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if sample.values.is_empty() {
        csv_writer.write_record(["timestamp", "value"])?;
    }
    for (ts, &value) in sample.timestamps.iter().zip(&sample.values) {
        csv_writer.serialize(SampleRecord {
            timestamp: format_timestamp(ts),
            value,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
