//! Error types for array processing.
//!
//! Every public operation validates its inputs at the boundary and reports
//! violations through [`ArrayError`]. No partial results are returned on error.
//!
//! # Example
//!
//! ```rust
//! use array_processing::{ArrayError, Result};
//!
//! fn needs_pairs(n: usize) -> Result<usize> {
//!     if n < 2 {
//!         return Err(ArrayError::InsufficientSensors { required: 2, actual: n });
//!     }
//!     Ok(n * (n - 1) / 2)
//! }
//!
//! assert!(needs_pairs(1).is_err());
//! ```

use thiserror::Error;

/// A specialized `Result` type for array processing operations.
pub type Result<T> = std::result::Result<T, ArrayError>;

/// Unified error type for the array processing components.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ArrayError {
    /// Shape mismatch between inputs, or an input of the wrong rank.
    #[error("Invalid dimension: {message}")]
    InvalidDimension {
        /// What was wrong with the shape
        message: String,
    },

    /// Fewer sensors (channels) than the operation needs.
    #[error("Insufficient sensors: need at least {required}, got {actual}")]
    InsufficientSensors {
        /// Minimum number of sensors
        required: usize,
        /// Number of sensors supplied
        actual: usize,
    },

    /// Transform axis is out of range for the array rank.
    #[error("Invalid axis {axis} for array with {ndim} dimension(s)")]
    InvalidAxis {
        /// Requested axis
        axis: usize,
        /// Rank of the array
        ndim: usize,
    },

    /// The requested band maps to no usable frequency bins.
    #[error("Empty frequency band: bins {low_bin}..={high_bin} after excluding DC and Nyquist")]
    EmptyFrequencyBand {
        /// Lowest usable bin after clamping
        low_bin: i64,
        /// Highest usable bin after clamping
        high_bin: i64,
    },

    /// A ratio estimator hit a zero or non-finite denominator.
    #[error("Numeric degeneracy: {message}")]
    NumericDegeneracy {
        /// Where the degeneracy occurred
        message: String,
    },

    /// Invalid configuration parameters.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ArrayError {
    /// Create an invalid dimension error.
    pub fn invalid_dimension(message: impl Into<String>) -> Self {
        Self::InvalidDimension {
            message: message.into(),
        }
    }

    /// Create a numeric degeneracy error.
    pub fn degeneracy(message: impl Into<String>) -> Self {
        Self::NumericDegeneracy {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
