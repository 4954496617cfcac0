//! Summary statistics of pairwise cross-correlation maxima.
//!
//! A plane-wave slowness solver reports one cross-correlation maximum per
//! sensor pair. The mean of those maxima (MCCM) and their median are used as
//! a measure of how coherent the wavefront is across the array.

use serde::{Deserialize, Serialize};

use crate::error::{ArrayError, Result};
use crate::pairs::{enumerate_pairs, pair_count};

/// Mean and median of the cross-correlation maxima.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSummary {
    /// Weighted arithmetic mean
    pub mean: f64,
    /// Median over pairs with non-zero weight
    pub median: f64,
}

/// Summarize per-pair cross-correlation maxima.
///
/// `cmax` holds one value per sensor pair in [`enumerate_pairs`] order.
/// With per-channel `weights`, pair `(i, j)` gets weight `w_i · w_j`: the mean
/// is the weighted mean and the median is taken over every pair whose weight
/// is non-zero. A zero-weight channel therefore drops out of both.
///
/// ```rust
/// use array_processing::summary::correlation_summary;
///
/// let cmax = [0.9, 0.8, 0.1];
/// let all = correlation_summary(&cmax, None).unwrap();
/// assert!((all.median - 0.8).abs() < 1e-12);
///
/// // Channel 2 excluded: only pair (0, 1) remains
/// let some = correlation_summary(&cmax, Some(&[1.0, 1.0, 0.0])).unwrap();
/// assert!((some.mean - 0.9).abs() < 1e-12);
/// ```
pub fn correlation_summary(cmax: &[f64], weights: Option<&[f64]>) -> Result<CorrelationSummary> {
    if cmax.is_empty() {
        return Err(ArrayError::degeneracy("no cross-correlation maxima"));
    }

    let Some(weights) = weights else {
        let mean = cmax.iter().sum::<f64>() / cmax.len() as f64;
        return Ok(CorrelationSummary {
            mean,
            median: median(cmax.to_vec()),
        });
    };

    if cmax.len() != pair_count(weights.len()) {
        return Err(ArrayError::invalid_dimension(format!(
            "{} weights imply {} pairs, got {} maxima",
            weights.len(),
            pair_count(weights.len()),
            cmax.len()
        )));
    }

    let pair_weights: Vec<f64> = enumerate_pairs(weights.len())
        .into_iter()
        .map(|(i, j)| weights[i] * weights[j])
        .collect();

    let total: f64 = pair_weights.iter().sum();
    if total == 0.0 || !total.is_finite() {
        return Err(ArrayError::degeneracy(format!(
            "pair weights sum to {}",
            total
        )));
    }
    let mean = cmax
        .iter()
        .zip(pair_weights.iter())
        .map(|(c, w)| c * w)
        .sum::<f64>()
        / total;

    let included: Vec<f64> = cmax
        .iter()
        .zip(pair_weights.iter())
        .filter(|&(_, &w)| w != 0.0)
        .map(|(&c, _)| c)
        .collect();

    tracing::trace!(
        pairs = cmax.len(),
        included = included.len(),
        "cross-correlation summary"
    );

    Ok(CorrelationSummary {
        mean,
        median: median(included),
    })
}

/// Median of a non-empty sample (mean of the two middle values when even).
fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
