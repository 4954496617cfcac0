//! Frequency-domain bandpass filter.
//!
//! Applies a zero/one mask to the spectrum of every channel. The mask is
//! symmetric about the Nyquist index, so the pass band and its conjugate mirror
//! survive together and the inverse transform is real.
//!
//! The brick-wall mask rings in the time domain, most visibly at the start and
//! end of the filtered series. That is a property of the method.

use ndarray::{Array, ArrayBase, Axis, Data, Dimension, RemoveAxis};
use num_complex::Complex64;

use crate::error::{ArrayError, Result};
use crate::nyquist::NyquistLayout;
use crate::spectral::{forward, inverse};

/// Result of [`bpf`].
#[derive(Debug, Clone)]
pub struct BandpassOutput<D: Dimension> {
    /// Real, bandpass-filtered series (same shape as the input)
    pub filtered: Array<f64, D>,
    /// Masked spectrum the filtered series was reconstructed from
    pub spectrum: Array<Complex64, D>,
}

/// Bandpass filter along axis 0 (time) of a vector or columnar matrix.
///
/// `band` holds two corner frequencies relative to DC = 0.0 and
/// Nyquist = 1.0, in either order. Corners are rounded to the nearest bin
/// (ties to even) on a scale of `n/2` bins for even `n` and `(n-1)/2` for
/// odd `n`, then clamped to the valid range.
///
/// ```rust
/// use array_processing::bandpass::bpf;
/// use ndarray::Array1;
///
/// let x = Array1::from_shape_fn(64, |i| (i as f64 * 0.3).sin());
/// let out = bpf(&x, [0.0, 1.0]).unwrap();
/// assert!((out.filtered[10] - x[10]).abs() < 1e-10);
/// ```
pub fn bpf<S, D>(x: &ArrayBase<S, D>, band: [f64; 2]) -> Result<BandpassOutput<D>>
where
    S: Data<Elem = f64>,
    D: Dimension + RemoveAxis,
{
    if band.iter().any(|f| !f.is_finite()) {
        return Err(ArrayError::config(format!(
            "band corners must be finite, got {:?}",
            band
        )));
    }
    let mut band = band;
    band.sort_by(|a, b| a.total_cmp(b));

    let mut spectrum = forward(x, None, 0)?;
    let layout = NyquistLayout::new(spectrum.len_of(Axis(0)));
    let (low, high) = band_bins(&layout, band);

    for (bin, mut lane) in spectrum.axis_iter_mut(Axis(0)).enumerate() {
        let folded = layout.folded_index(bin);
        if folded < low || folded > high {
            lane.fill(Complex64::default());
        }
    }

    tracing::debug!(
        samples = layout.len(),
        low_bin = low,
        high_bin = high,
        "bandpass mask applied"
    );

    let filtered = inverse(&spectrum, None, 0)?;
    Ok(BandpassOutput { filtered, spectrum })
}

/// Convert sorted normalized corners into inclusive positive-frequency bins.
fn band_bins(layout: &NyquistLayout, band: [f64; 2]) -> (usize, usize) {
    let top = layout.highest_positive_bin() as f64;
    let to_bin = |f: f64| (f * top).round_ties_even().clamp(0.0, top) as usize;
    (to_bin(band[0]), to_bin(band[1]))
}
