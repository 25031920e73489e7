//! Core traits for numeric series.
//!
//! [`SeriesElement`] abstracts over `f32` and `f64`; [`ValidatedInput`]
//! collects the input checks every stage runs before touching the data.
//!
//! # Example
//!
//! ```
//! use ts_anomaly::traits::{SeriesElement, ValidatedInput};
//!
//! fn mean<T: SeriesElement>(data: &[T]) -> ts_anomaly::Result<T> {
//!     data.validate_not_empty()?;
//!     let n = T::from_usize(data.len())?;
//!     Ok(data.iter().fold(T::zero(), |acc, &x| acc + x) / n)
//! }
//!
//! assert!((mean(&[1.0_f64, 2.0, 3.0]).unwrap() - 2.0).abs() < 1e-12);
//! ```

use std::fmt::Debug;

use num_traits::{Float, NumCast};

use crate::error::{Error, Result};

/// A floating-point type usable as a series value.
///
/// Blanket-implemented for every type meeting the bounds, which in practice
/// means `f32` and `f64`.
pub trait SeriesElement: Float + NumCast + Copy + Default + Debug + Send + Sync + 'static {
    /// Creates a series element from a `usize` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented in this type.
    #[inline]
    fn from_usize(value: usize) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "usize to series element",
        })
    }

    /// Creates a series element from an `f64` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented in this type.
    #[inline]
    fn from_f64(value: f64) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "f64 to series element",
        })
    }

    /// Widens the element to `f64` for reporting. Never fails for `f32`/`f64`.
    #[inline]
    #[must_use]
    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl<T: Float + NumCast + Copy + Default + Debug + Send + Sync + 'static> SeriesElement for T {}

/// Input checks shared by the detection stages.
pub trait ValidatedInput {
    /// The element type of the series.
    type Element: SeriesElement;

    /// Returns the elements as a slice.
    fn as_elements(&self) -> &[Self::Element];

    /// Validates that the series is not empty.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the series is empty.
    #[inline]
    fn validate_not_empty(&self) -> Result<()> {
        if self.as_elements().is_empty() {
            Err(Error::InvalidInput {
                reason: "series is empty".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that the series has at least `min_length` elements.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the series is shorter than `min_length`.
    #[inline]
    fn validate_min_length(&self, min_length: usize) -> Result<()> {
        let len = self.as_elements().len();
        if len < min_length {
            Err(Error::InvalidInput {
                reason: format!("series must have at least {min_length} points, got {len}"),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that every element is finite (no NaN, no infinity).
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` naming the first offending index.
    #[inline]
    fn validate_finite(&self) -> Result<()> {
        match self.as_elements().iter().position(|x| !x.is_finite()) {
            Some(index) => Err(Error::InvalidInput {
                reason: format!("value at index {index} is not finite"),
            }),
            None => Ok(()),
        }
    }
}

impl<T: SeriesElement> ValidatedInput for [T] {
    type Element = T;

    #[inline]
    fn as_elements(&self) -> &[T] {
        self
    }
}

impl<T: SeriesElement> ValidatedInput for Vec<T> {
    type Element = T;

    #[inline]
    fn as_elements(&self) -> &[T] {
        self
    }
}

/// Validates that two columns have the same length.
///
/// # Errors
///
/// Returns `Error::LengthMismatch` describing both lengths.
#[inline]
pub fn validate_same_length(
    left_name: &str,
    left: usize,
    right_name: &str,
    right: usize,
) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(Error::LengthMismatch {
            description: format!(
                "{left_name} has {left} elements, {right_name} has {right}"
            ),
        })
    }
}
