//! Normalized Fourier transform pair.
//!
//! The default convention scales the forward transform by `1/n`, so the DC
//! component of every transformed lane equals the mean of that lane in the
//! time domain, and leaves the inverse unscaled so that
//! `inverse(forward(x)) == x`.
//!
//! # Example
//!
//! ```rust
//! use array_processing::spectral::{forward, inverse};
//! use ndarray::array;
//!
//! let x = array![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]];
//! let spectrum = forward(&x, None, 0).unwrap();
//! assert!((spectrum[[0, 1]].re - 5.0).abs() < 1e-12);
//!
//! let back = inverse(&spectrum, None, 0).unwrap();
//! assert!((back[[2, 0]] - 3.0).abs() < 1e-12);
//! ```

use ndarray::{Array, ArrayBase, Axis, Data, Dimension, Zip};
use num_complex::Complex64;
use rustfft::{FftDirection, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::error::{ArrayError, Result};

/// Scaling convention of a transform pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Normalization {
    /// Forward scaled by `1/n` (DC equals the mean), inverse unscaled
    #[default]
    Sentman,
    /// Forward unscaled (raw FFT bins), inverse scaled by `1/n`
    Raw,
    /// Both directions scaled by `1/sqrt(n)`
    Unitary,
}

impl Normalization {
    fn scale(self, n: usize, direction: FftDirection) -> f64 {
        let n = n as f64;
        match (self, direction) {
            (Normalization::Sentman, FftDirection::Forward) => 1.0 / n,
            (Normalization::Sentman, FftDirection::Inverse) => 1.0,
            (Normalization::Raw, FftDirection::Forward) => 1.0,
            (Normalization::Raw, FftDirection::Inverse) => 1.0 / n,
            (Normalization::Unitary, _) => 1.0 / n.sqrt(),
        }
    }
}

/// Forward/inverse DFT along one axis of an n-dimensional array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SpectralTransform {
    /// Transform length; the input is cropped or zero-padded to it
    pub length: Option<usize>,
    /// Axis to transform along
    pub axis: usize,
    /// Scaling convention
    pub normalization: Normalization,
}

/// Builder for SpectralTransform
#[derive(Debug, Default)]
pub struct SpectralTransformBuilder {
    transform: SpectralTransform,
}

impl SpectralTransformBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Crop or zero-pad to `length` samples before transforming
    pub fn length(mut self, length: usize) -> Self {
        self.transform.length = Some(length);
        self
    }

    /// Set the transform axis
    pub fn axis(mut self, axis: usize) -> Self {
        self.transform.axis = axis;
        self
    }

    /// Set the scaling convention
    pub fn normalization(mut self, normalization: Normalization) -> Self {
        self.transform.normalization = normalization;
        self
    }

    /// Build the transform
    pub fn build(self) -> SpectralTransform {
        self.transform
    }
}

impl SpectralTransform {
    /// Create a new transform builder
    pub fn builder() -> SpectralTransformBuilder {
        SpectralTransformBuilder::new()
    }

    /// Discrete Fourier transform of `x` along the configured axis.
    ///
    /// Accepts real or complex input.
    pub fn forward<S, D>(&self, x: &ArrayBase<S, D>) -> Result<Array<Complex64, D>>
    where
        S: Data,
        S::Elem: Copy + Into<Complex64>,
        D: Dimension,
    {
        self.transform(x, FftDirection::Forward)
    }

    /// Inverse transform keeping only the real part.
    ///
    /// Use this when the result is known to be real; it discards the
    /// machine-precision imaginary residue.
    pub fn inverse<S, D>(&self, spectrum: &ArrayBase<S, D>) -> Result<Array<f64, D>>
    where
        S: Data,
        S::Elem: Copy + Into<Complex64>,
        D: Dimension,
    {
        Ok(self.inverse_complex(spectrum)?.mapv(|c| c.re))
    }

    /// Inverse transform keeping the full complex result.
    pub fn inverse_complex<S, D>(&self, spectrum: &ArrayBase<S, D>) -> Result<Array<Complex64, D>>
    where
        S: Data,
        S::Elem: Copy + Into<Complex64>,
        D: Dimension,
    {
        self.transform(spectrum, FftDirection::Inverse)
    }

    fn transform<S, D>(
        &self,
        x: &ArrayBase<S, D>,
        direction: FftDirection,
    ) -> Result<Array<Complex64, D>>
    where
        S: Data,
        S::Elem: Copy + Into<Complex64>,
        D: Dimension,
    {
        let axis = self.axis;
        if axis >= x.ndim() {
            return Err(ArrayError::InvalidAxis {
                axis,
                ndim: x.ndim(),
            });
        }

        let n = self.length.unwrap_or_else(|| x.len_of(Axis(axis)));
        if n == 0 {
            return Err(ArrayError::invalid_dimension(
                "transform length must be positive",
            ));
        }

        let mut dim = x.raw_dim();
        dim[axis] = n;
        let mut out = Array::<Complex64, D>::zeros(dim);

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft(n, direction);
        let scale = self.normalization.scale(n, direction);

        let mut buffer = vec![Complex64::default(); n];
        let mut scratch = vec![Complex64::default(); fft.get_inplace_scratch_len()];

        Zip::from(out.lanes_mut(Axis(axis)))
            .and(x.lanes(Axis(axis)))
            .for_each(|mut out_lane, in_lane| {
                buffer.fill(Complex64::default());
                for (slot, &value) in buffer.iter_mut().zip(in_lane.iter()) {
                    *slot = value.into();
                }

                fft.process_with_scratch(&mut buffer, &mut scratch);

                for (o, b) in out_lane.iter_mut().zip(buffer.iter()) {
                    *o = *b * scale;
                }
            });

        Ok(out)
    }
}

/// Forward transform with the default (mean-at-DC) normalization.
pub fn forward<S, D>(x: &ArrayBase<S, D>, length: Option<usize>, axis: usize) -> Result<Array<Complex64, D>>
where
    S: Data,
    S::Elem: Copy + Into<Complex64>,
    D: Dimension,
{
    SpectralTransform {
        length,
        axis,
        ..Default::default()
    }
    .forward(x)
}

/// Real-valued inverse of [`forward`].
pub fn inverse<S, D>(spectrum: &ArrayBase<S, D>, length: Option<usize>, axis: usize) -> Result<Array<f64, D>>
where
    S: Data,
    S::Elem: Copy + Into<Complex64>,
    D: Dimension,
{
    SpectralTransform {
        length,
        axis,
        ..Default::default()
    }
    .inverse(spectrum)
}

/// Complex-valued inverse of [`forward`].
pub fn inverse_complex<S, D>(
    spectrum: &ArrayBase<S, D>,
    length: Option<usize>,
    axis: usize,
) -> Result<Array<Complex64, D>>
where
    S: Data,
    S::Elem: Copy + Into<Complex64>,
    D: Dimension,
{
    SpectralTransform {
        length,
        axis,
        ..Default::default()
    }
    .inverse_complex(spectrum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1, Array2, Array3};
    use std::f64::consts::PI;

    fn test_matrix() -> Array2<f64> {
        Array2::from_shape_fn((33, 3), |(i, j)| {
            ((i * (j + 1)) as f64 * 0.37).sin() + 0.25 * j as f64
        })
    }

    #[test]
    fn test_dc_equals_mean() {
        let x = test_matrix();
        let spectrum = forward(&x, None, 0).unwrap();
        let means = x.mean_axis(Axis(0)).unwrap();

        for j in 0..x.ncols() {
            assert_abs_diff_eq!(spectrum[[0, j]].re, means[j], epsilon = 1e-12);
            assert_abs_diff_eq!(spectrum[[0, j]].im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_round_trip_odd_and_even() {
        for n in [16usize, 17] {
            let x = Array1::from_shape_fn(n, |i| (i as f64 * 0.9).cos() - 0.1 * i as f64);
            let back = inverse(&forward(&x, None, 0).unwrap(), None, 0).unwrap();
            for (a, b) in x.iter().zip(back.iter()) {
                assert_abs_diff_eq!(*a, *b, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_transform_along_axis_one() {
        let x = test_matrix().reversed_axes();
        let spectrum = forward(&x, None, 1).unwrap();
        assert_eq!(spectrum.dim(), x.dim());

        let means = x.mean_axis(Axis(1)).unwrap();
        for i in 0..x.nrows() {
            assert_abs_diff_eq!(spectrum[[i, 0]].re, means[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_padding_changes_length() {
        let x = array![1.0, 1.0, 1.0, 1.0];
        let spectrum = forward(&x, Some(8), 0).unwrap();
        assert_eq!(spectrum.len(), 8);
        // Mean of the padded sequence
        assert_abs_diff_eq!(spectrum[0].re, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_truncation() {
        let x = array![2.0, 2.0, 10.0, 10.0];
        let spectrum = forward(&x, Some(2), 0).unwrap();
        assert_eq!(spectrum.len(), 2);
        assert_abs_diff_eq!(spectrum[0].re, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_tone_bin() {
        let n = 64;
        let x = Array1::from_shape_fn(n, |i| (2.0 * PI * 5.0 * i as f64 / n as f64).cos());
        let spectrum = forward(&x, None, 0).unwrap();
        // A unit cosine splits evenly between bin 5 and its mirror
        assert_abs_diff_eq!(spectrum[5].re, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(spectrum[n - 5].re, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(spectrum[6].norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_raw_normalization() {
        let x = array![1.0, 2.0, 3.0, 4.0];
        let transform = SpectralTransform::builder()
            .normalization(Normalization::Raw)
            .build();
        let spectrum = transform.forward(&x).unwrap();
        assert_abs_diff_eq!(spectrum[0].re, 10.0, epsilon = 1e-12);

        let back = transform.inverse(&spectrum).unwrap();
        assert_abs_diff_eq!(back[3], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unitary_preserves_energy() {
        let x = Array1::from_shape_fn(32, |i| ((i * i) as f64 * 0.01).sin());
        let transform = SpectralTransform::builder()
            .normalization(Normalization::Unitary)
            .build();
        let spectrum = transform.forward(&x).unwrap();

        let time_energy: f64 = x.iter().map(|v| v * v).sum();
        let freq_energy: f64 = spectrum.iter().map(|c| c.norm_sqr()).sum();
        assert_abs_diff_eq!(time_energy, freq_energy, epsilon = 1e-10);
    }

    #[test]
    fn test_complex_round_trip() {
        let z = Array1::from_shape_fn(10, |i| Complex64::new(i as f64, -(i as f64) * 0.5));
        let back = inverse_complex(&forward(&z, None, 0).unwrap(), None, 0).unwrap();
        for (a, b) in z.iter().zip(back.iter()) {
            assert_abs_diff_eq!((a - b).norm(), 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_three_dimensional_input() {
        let x = Array3::from_shape_fn((4, 6, 2), |(i, j, k)| (i + 2 * j + 3 * k) as f64);
        let spectrum = forward(&x, None, 1).unwrap();
        assert_eq!(spectrum.dim(), (4, 6, 2));
        let back = inverse(&spectrum, None, 1).unwrap();
        assert_abs_diff_eq!(back[[3, 5, 1]], x[[3, 5, 1]], epsilon = 1e-10);
    }

    #[test]
    fn test_invalid_axis() {
        let x = test_matrix();
        let result = forward(&x, None, 2);
        assert!(matches!(
            result,
            Err(ArrayError::InvalidAxis { axis: 2, ndim: 2 })
        ));
    }

    #[test]
    fn test_zero_length_rejected() {
        let x = array![1.0, 2.0];
        assert!(matches!(
            forward(&x, Some(0), 0),
            Err(ArrayError::InvalidDimension { .. })
        ));
    }
}
