//! Error types for ts-anomaly.
//!
//! Only genuine failures live here. Degraded-but-valid conditions such as a
//! clamped window or a zero-variance window are reported as
//! [`Warning`](crate::report::Warning) values instead.

use thiserror::Error;

/// The main error type for detection operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A detection parameter is outside its valid range.
    ///
    /// Returned for `window_size < 2`, a non-positive or non-finite threshold,
    /// or a non-positive minimum standard deviation. The caller must fix the
    /// parameter; retrying with the same value fails the same way.
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value, rendered for display.
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// The input series cannot be analysed.
    ///
    /// Empty or single-row input, non-finite values, unsorted timestamps, or
    /// timestamp/value columns of different length.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Description of what is wrong with the input.
        reason: String,
    },

    /// Two columns handed to a stage have different lengths.
    #[error("length mismatch: {description}")]
    LengthMismatch {
        /// Which columns disagree and by how much.
        description: String,
    },

    /// Failed to convert a numeric value to the series element type.
    #[error("numeric conversion failed: {context}")]
    NumericConversion {
        /// Description of the conversion that failed.
        context: &'static str,
    },
}

impl Error {
    /// Builds the error for a window size below the minimum of 2.
    #[must_use]
    pub fn invalid_window(window_size: usize) -> Self {
        Self::InvalidParameter {
            name: "window_size",
            value: window_size.to_string(),
            reason: "window size must be at least 2",
        }
    }

    /// Builds the error for a threshold that is not a positive finite number.
    #[must_use]
    pub fn invalid_threshold(threshold: f64) -> Self {
        Self::InvalidParameter {
            name: "threshold",
            value: threshold.to_string(),
            reason: "threshold must be a positive finite number",
        }
    }

    /// Returns `true` for errors caused by bad parameters rather than bad data.
    #[must_use]
    pub const fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. } | Self::NumericConversion { .. }
        )
    }
}

/// Convenience type alias for Results using the ts-anomaly Error type.
pub type Result<T> = std::result::Result<T, Error>;
