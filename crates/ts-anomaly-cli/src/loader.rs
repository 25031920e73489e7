//! CSV loading: turns a timestamp/value CSV into a validated series.
//!
//! Loading runs these steps in order:
//!
//! 1. Read the header row and pick the timestamp and value columns. Without
//!    explicit names the first column holds timestamps and the second values.
//! 2. Parse each timestamp. Accepted forms are RFC 3339, `YYYY-MM-DD HH:MM:SS`,
//!    `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD` and integer epoch seconds.
//! 3. Parse each value. Empty, non-numeric and non-finite cells become missing.
//! 4. Stable-sort the rows by timestamp.
//! 5. Fill missing values forward, then backward.
//! 6. Build a [`Series`], which rejects fewer than two rows.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use ts_anomaly::Series;

use crate::error::{CliError, Result};

/// Formats tried, in order, after RFC 3339.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Which columns to read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Timestamp column name; `None` selects the first column.
    pub timestamp_column: Option<String>,
    /// Value column name; `None` selects the second column.
    pub value_column: Option<String>,
}

/// A loaded series and what loading did to it.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    /// The validated, time-ordered series.
    pub series: Series<f64, NaiveDateTime>,
    /// Header of the timestamp column as written in the file.
    pub timestamp_column: String,
    /// Header of the value column as written in the file.
    pub value_column: String,
    /// Number of missing values that were filled.
    pub filled: usize,
    /// Whether the rows had to be reordered.
    pub reordered: bool,
}

/// Normalize a column header name for matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Parses a timestamp cell.
///
/// Offsets in RFC 3339 input are converted to UTC. Returns `None` if no
/// accepted form matches.
///
/// # Example
///
/// ```
/// use ts_anomaly_cli::loader::parse_timestamp;
///
/// let a = parse_timestamp("2024-01-01 06:00:00").unwrap();
/// let b = parse_timestamp("2024-01-01T07:00:00+01:00").unwrap();
/// let c = parse_timestamp("1704088800").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a, c);
/// assert!(parse_timestamp("not a date").is_none());
/// ```
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    text.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.naive_utc())
}

/// Parses a value cell; anything that is not a finite number is missing.
fn parse_value(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Fills gaps forward from the last known value, then backward for a leading gap.
///
/// Returns the filled column and the number of cells filled, or `None` when
/// every value is missing.
///
/// # Example
///
/// ```
/// use ts_anomaly_cli::loader::fill_missing;
///
/// let (filled, count) = fill_missing(&[None, Some(1.0), None, Some(3.0)]).unwrap();
/// assert_eq!(filled, vec![1.0, 1.0, 1.0, 3.0]);
/// assert_eq!(count, 2);
/// assert!(fill_missing(&[None, None]).is_none());
/// ```
#[must_use]
pub fn fill_missing(values: &[Option<f64>]) -> Option<(Vec<f64>, usize)> {
    let first_known = values.iter().find_map(|v| *v)?;
    let mut last = first_known;
    let mut filled = 0;
    let out = values
        .iter()
        .map(|v| match v {
            Some(x) => {
                last = *x;
                *x
            }
            None => {
                filled += 1;
                last
            }
        })
        .collect();
    Some((out, filled))
}

/// Resolves a column by name, or by position when no name is given.
fn resolve_column(
    headers: &[String],
    name: Option<&str>,
    position: usize,
    role: &str,
) -> Result<usize> {
    let found = match name {
        Some(name) => {
            let wanted = normalize_header(name);
            headers.iter().position(|h| normalize_header(h) == wanted)
        }
        None => (position < headers.len()).then_some(position),
    };
    found.ok_or_else(|| {
        let requested = name.map_or_else(
            || format!("no {role} column at position {}", position + 1),
            |n| format!("{role} column '{n}' not found"),
        );
        CliError::load(format!(
            "{requested}; available columns: {}",
            headers.join(", ")
        ))
    })
}

/// Load a series from a CSV file.
///
/// # Errors
///
/// Returns `CliError::IoError` if the file cannot be opened, and otherwise
/// the errors of [`load_from_reader`].
pub fn load_csv<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<LoadedSeries> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CliError::IoError {
        source: e,
        path: Some(path.display().to_string()),
    })?;
    log::debug!("loading {}", path.display());
    load_from_reader(BufReader::new(file), options)
}

/// Load a series from any CSV source.
///
/// # Errors
///
/// - `CliError::CsvParseError` for malformed CSV or an unparseable timestamp
/// - `CliError::LoadError` for a missing column, no data rows, or no values
/// - `CliError::DetectionError` if the result is not a valid series
pub fn load_from_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<LoadedSeries> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| CliError::CsvParseError {
            message: e.to_string(),
            line: Some(1),
        })?
        .iter()
        .map(String::from)
        .collect();

    let ts_idx = resolve_column(&headers, options.timestamp_column.as_deref(), 0, "timestamp")?;
    let value_idx = resolve_column(&headers, options.value_column.as_deref(), 1, "value")?;
    if ts_idx == value_idx {
        return Err(CliError::load(format!(
            "timestamp and value both refer to column '{}'",
            headers[ts_idx]
        )));
    }

    let mut rows: Vec<(NaiveDateTime, Option<f64>)> = Vec::new();
    for (line_idx, result) in csv_reader.records().enumerate() {
        let line = line_idx + 2; // +2 for header and 0-indexing
        let record = result.map_err(|e| CliError::CsvParseError {
            message: e.to_string(),
            line: Some(line),
        })?;

        let raw_ts = record.get(ts_idx).unwrap_or("");
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| CliError::CsvParseError {
            message: format!(
                "cannot parse '{}' in column '{}' as a timestamp",
                raw_ts.trim(),
                headers[ts_idx]
            ),
            line: Some(line),
        })?;
        let value = record.get(value_idx).and_then(parse_value);
        rows.push((timestamp, value));
    }

    if rows.is_empty() {
        return Err(CliError::load("no data rows after the header"));
    }

    let reordered = rows.windows(2).any(|pair| pair[1].0 < pair[0].0);
    if reordered {
        log::info!("rows are not in time order; sorting by timestamp");
        rows.sort_by_key(|(ts, _)| *ts);
    }

    let (timestamps, raw_values): (Vec<NaiveDateTime>, Vec<Option<f64>>) =
        rows.into_iter().unzip();
    let (values, filled) =
        fill_missing(&raw_values).ok_or_else(|| CliError::load("all values are missing"))?;
    if filled > 0 {
        log::warn!(
            "{filled} missing or non-numeric value(s) in column '{}' were filled",
            headers[value_idx]
        );
    }

    let series = Series::new(timestamps, values)?;
    log::debug!(
        "loaded {} rows ({} -> {})",
        series.len(),
        headers[ts_idx],
        headers[value_idx]
    );

    Ok(LoadedSeries {
        series,
        timestamp_column: headers[ts_idx].clone(),
        value_column: headers[value_idx].clone(),
        filled,
        reordered,
    })
}
