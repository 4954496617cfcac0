//! Output shape for generated series.

use serde::{Deserialize, Serialize};

use crate::error::{ArrayError, Result};

/// Requested array shape: a bare sample count or an explicit dimension list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    /// A single vector of `n` samples
    Scalar(usize),
    /// Explicit dimensions, `(samples,)` or `(samples, channels)`
    Tuple(Vec<usize>),
}

impl Shape {
    /// Normalize to `(samples, channels)`; a vector is one channel.
    pub fn matrix_dims(&self) -> Result<(usize, usize)> {
        match self {
            Shape::Scalar(n) => Ok((*n, 1)),
            Shape::Tuple(dims) => match dims.as_slice() {
                [n] => Ok((*n, 1)),
                [n, m] => Ok((*n, *m)),
                _ => Err(ArrayError::invalid_dimension(format!(
                    "expected 1 or 2 dimensions, got {}",
                    dims.len()
                ))),
            },
        }
    }

    /// The dimensions as they should appear on the output array.
    pub fn dims(&self) -> Vec<usize> {
        match self {
            Shape::Scalar(n) => vec![*n],
            Shape::Tuple(dims) => dims.clone(),
        }
    }
}

impl From<usize> for Shape {
    fn from(n: usize) -> Self {
        Shape::Scalar(n)
    }
}

impl From<(usize, usize)> for Shape {
    fn from((n, m): (usize, usize)) -> Self {
        Shape::Tuple(vec![n, m])
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape::Tuple(dims)
    }
}
