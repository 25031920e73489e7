//! CLI error types for file I/O, loading, configuration and detection errors.
//!
//! This module provides the [`CliError`] enum which wraps every error the CLI
//! can hit. Messages say what went wrong and, where possible, how to fix it.
//! Each variant maps to a process exit code through [`CliError::exit_code`].

use std::fmt;
use std::io;

/// Exit code for invalid arguments or an unusable config file.
pub const EXIT_INVALID_ARGUMENT: i32 = 1;

/// Exit code for unreadable or invalid input data.
pub const EXIT_DATA_ERROR: i32 = 2;

/// Exit code for detection parameters rejected by the detector.
pub const EXIT_PARAMETER_ERROR: i32 = 3;

/// CLI error type encompassing all possible error conditions.
#[derive(Debug)]
pub enum CliError {
    /// An I/O error occurred while reading or writing files.
    IoError {
        /// The underlying I/O error.
        source: io::Error,
        /// Path that caused the error, if known.
        path: Option<String>,
    },
    /// The CSV input is malformed.
    CsvParseError {
        /// Description of the parse error.
        message: String,
        /// Line number where the error occurred, if known.
        line: Option<usize>,
    },
    /// The CSV parsed but its contents cannot become a series.
    LoadError {
        /// What is wrong with the data.
        message: String,
    },
    /// The detector rejected its parameters or input.
    DetectionError {
        /// The underlying ts-anomaly error.
        source: ts_anomaly::Error,
    },
    /// An invalid argument was provided.
    InvalidArgument {
        /// Name of the invalid argument.
        argument: String,
        /// Description of why it's invalid.
        reason: String,
        /// Suggestion for valid values.
        suggestion: Option<String>,
    },
    /// The detector config file could not be read or parsed.
    ConfigError {
        /// Path of the config file.
        path: String,
        /// Parser message.
        message: String,
    },
}

impl CliError {
    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } | Self::ConfigError { .. } => EXIT_INVALID_ARGUMENT,
            Self::IoError { .. } | Self::CsvParseError { .. } | Self::LoadError { .. } => {
                EXIT_DATA_ERROR
            }
            Self::DetectionError { source } if source.is_parameter_error() => {
                EXIT_PARAMETER_ERROR
            }
            Self::DetectionError { .. } => EXIT_DATA_ERROR,
        }
    }

    /// Shorthand for a [`CliError::LoadError`].
    pub fn load(message: impl Into<String>) -> Self {
        Self::LoadError {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError { source, path } => {
                if let Some(p) = path {
                    write!(f, "I/O error with file '{p}': {source}. ")?;
                    write!(f, "Check that the path exists and is accessible.")
                } else {
                    write!(f, "I/O error: {source}")
                }
            }
            Self::CsvParseError { message, line } => {
                if let Some(l) = line {
                    write!(f, "CSV parse error on line {l}: {message}. ")?;
                } else {
                    write!(f, "CSV parse error: {message}. ")?;
                }
                write!(f, "Ensure the file is comma-separated with a header row.")
            }
            Self::LoadError { message } => write!(f, "Cannot load series: {message}"),
            Self::DetectionError { source } => write!(f, "Detection failed: {source}"),
            Self::InvalidArgument {
                argument,
                reason,
                suggestion,
            } => {
                write!(f, "Invalid argument '{argument}': {reason}")?;
                if let Some(s) = suggestion {
                    write!(f, ". {s}")?;
                }
                Ok(())
            }
            Self::ConfigError { path, message } => {
                write!(f, "Invalid config file '{path}': {message}")
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError { source, .. } => Some(source),
            Self::DetectionError { source } => Some(source),
            Self::CsvParseError { .. }
            | Self::LoadError { .. }
            | Self::InvalidArgument { .. }
            | Self::ConfigError { .. } => None,
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::IoError {
            source: err,
            path: None,
        }
    }
}

impl From<ts_anomaly::Error> for CliError {
    fn from(err: ts_anomaly::Error) -> Self {
        Self::DetectionError { source: err }
    }
}

impl From<csv::Error> for CliError {
    fn from(err: csv::Error) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let line = err.position().map(|p| p.line() as usize);
        Self::CsvParseError {
            message: err.to_string(),
            line,
        }
    }
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_io_error_with_path() {
        let err = CliError::IoError {
            source: io::Error::new(io::ErrorKind::NotFound, "file not found"),
            path: Some("/data/missing.csv".to_string()),
        };
        let display = err.to_string();
        assert!(display.contains("/data/missing.csv"));
        assert!(display.contains("file not found"));
        assert!(display.contains("Check that the path exists"));
    }

    #[test]
    fn test_display_io_error_without_path() {
        let err = CliError::from(io::Error::other("broken pipe"));
        assert_eq!(err.to_string(), "I/O error: broken pipe");
    }

    #[test]
    fn test_display_csv_parse_error_with_line() {
        let err = CliError::CsvParseError {
            message: "found record with 3 fields".to_string(),
            line: Some(7),
        };
        let display = err.to_string();
        assert!(display.contains("line 7"));
        assert!(display.contains("3 fields"));
    }

    #[test]
    fn test_display_load_error() {
        let err = CliError::load("all values are missing");
        assert_eq!(err.to_string(), "Cannot load series: all values are missing");
    }

    #[test]
    fn test_display_invalid_argument_with_suggestion() {
        let err = CliError::InvalidArgument {
            argument: "window".to_string(),
            reason: "must be at least 2".to_string(),
            suggestion: Some("Try a value like 20".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Invalid argument 'window': must be at least 2. Try a value like 20"
        );
    }

    #[test]
    fn test_display_detection_error() {
        let err = CliError::from(ts_anomaly::Error::invalid_window(1));
        assert!(err.to_string().starts_with("Detection failed: invalid parameter window_size"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_exit_codes() {
        let invalid_arg = CliError::InvalidArgument {
            argument: "threshold".to_string(),
            reason: "must be positive".to_string(),
            suggestion: None,
        };
        assert_eq!(invalid_arg.exit_code(), EXIT_INVALID_ARGUMENT);

        let config = CliError::ConfigError {
            path: "cfg.json".to_string(),
            message: "expected value".to_string(),
        };
        assert_eq!(config.exit_code(), EXIT_INVALID_ARGUMENT);

        assert_eq!(CliError::load("empty").exit_code(), EXIT_DATA_ERROR);
        assert_eq!(
            CliError::from(io::Error::other("x")).exit_code(),
            EXIT_DATA_ERROR
        );

        let param = CliError::from(ts_anomaly::Error::invalid_threshold(0.0));
        assert_eq!(param.exit_code(), EXIT_PARAMETER_ERROR);

        let input = CliError::from(ts_anomaly::Error::InvalidInput {
            reason: "series is empty".to_string(),
        });
        assert_eq!(input.exit_code(), EXIT_DATA_ERROR);
    }

    #[test]
    fn test_from_csv_error_keeps_line() {
        let data = "a,b\n1,2\n3\n";
        let mut reader = csv::ReaderBuilder::new().from_reader(data.as_bytes());
        let err = reader
            .records()
            .find_map(std::result::Result::err)
            .expect("ragged row should fail");
        match CliError::from(err) {
            CliError::CsvParseError { line, .. } => assert_eq!(line, Some(3)),
            other => panic!("Expected CsvParseError, got {other:?}"),
        }
    }
}
