//! Colored noise synthesis.
//!
//! Generates noise whose power spectrum falls off as `f^(-beta)` by building
//! a Hermitian spectrum with power-law amplitudes and uniformly random phases
//! and transforming it back. `beta = 0` is white, `1` pink, `2` brown.
//!
//! Every output column is zero-mean (the DC component is always zero) and is
//! scaled to unit sample standard deviation.

use ndarray::{Array1, Array2, ArrayD, IxDyn};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::error::{ArrayError, Result};
use crate::nyquist::NyquistLayout;
use crate::shape::Shape;
use crate::spectral::inverse;

/// Configuration for colored noise generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NoiseConfig {
    /// Spectral exponent; power falls off as `f^(-beta)`
    pub beta: f64,

    /// RNG seed for reproducible output (entropy when `None`)
    pub seed: Option<u64>,
}

/// Builder for NoiseConfig
#[derive(Debug, Default)]
pub struct NoiseConfigBuilder {
    config: NoiseConfig,
}

impl NoiseConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set spectral exponent
    pub fn beta(mut self, beta: f64) -> Self {
        self.config.beta = beta;
        self
    }

    /// Set RNG seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Build the configuration
    pub fn build(self) -> NoiseConfig {
        self.config
    }
}

impl NoiseConfig {
    /// Create a new config builder
    pub fn builder() -> NoiseConfigBuilder {
        NoiseConfigBuilder::new()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.beta.is_finite() {
            return Err(ArrayError::config("beta must be finite"));
        }
        Ok(())
    }
}

/// Generate colored noise with the given shape.
///
/// A scalar shape yields a vector; a `(samples, channels)` shape yields one
/// independent series per column.
///
/// ```rust
/// use array_processing::noise::{colored_noise, NoiseConfig};
///
/// let config = NoiseConfig::builder().beta(1.0).seed(42).build();
/// let pink = colored_noise((1024, 2), &config).unwrap();
/// assert_eq!(pink.shape(), &[1024, 2]);
/// ```
pub fn colored_noise(shape: impl Into<Shape>, config: &NoiseConfig) -> Result<ArrayD<f64>> {
    config.validate()?;
    let shape = shape.into();
    let (n, m) = shape.matrix_dims()?;
    if n < 2 {
        return Err(ArrayError::invalid_dimension(format!(
            "colored noise needs at least 2 samples, got {}",
            n
        )));
    }

    let mut rng = match config.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let layout = NyquistLayout::new(n);
    let amplitudes = power_law_amplitudes(&layout, config.beta);

    let mut spectrum = Array2::<Complex64>::zeros((n, m));
    for mut column in spectrum.columns_mut() {
        for bin in 1..layout.nyquist_index() {
            let phase: f64 = rng.gen_range(0.0..TAU);
            let value = Complex64::from_polar(amplitudes[bin], phase);
            column[bin] = value;
            column[layout.mirror_index(bin)] = value.conj();
        }
        if layout.has_nyquist_bin() {
            column[layout.nyquist_index()] = Complex64::new(amplitudes[layout.nyquist_index()], 0.0);
        }
    }

    let mut series = inverse(&spectrum, None, 0)?;
    for mut column in series.columns_mut() {
        let std = column.std(1.0);
        if std > 0.0 {
            column.mapv_inplace(|v| v / std);
        }
    }

    tracing::trace!(samples = n, columns = m, beta = config.beta, "colored noise generated");

    series
        .into_shape(IxDyn(&shape.dims()))
        .map_err(|e| ArrayError::invalid_dimension(e.to_string()))
}

/// Amplitude `k^(-beta/2)` for bins `0..=highest positive bin`, DC zero.
fn power_law_amplitudes(layout: &NyquistLayout, beta: f64) -> Array1<f64> {
    let top = layout.highest_positive_bin();
    let mut amplitudes = Array1::from_shape_fn(top + 1, |k| (k as f64).powf(-beta / 2.0));
    // Covers beta <= 0, where 0^(-beta/2) would not vanish on its own
    amplitudes[0] = 0.0;
    amplitudes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::forward;
    use approx::assert_abs_diff_eq;
    use ndarray::{Ix1, Ix2};

    #[test]
    fn test_zero_mean_unit_std() {
        for beta in [-1.0, 0.0, 0.5, 1.0, 2.0] {
            let config = NoiseConfig::builder().beta(beta).seed(17).build();
            let x = colored_noise((500, 3), &config).unwrap();
            let x = x.into_dimensionality::<Ix2>().unwrap();

            for column in x.columns() {
                let mean = column.mean().unwrap();
                let std = column.std(1.0);
                assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-10);
                assert_abs_diff_eq!(std, 1.0, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_scalar_shape_is_vector() {
        let config = NoiseConfig::builder().seed(1).build();
        let x = colored_noise(257, &config).unwrap();
        assert_eq!(x.shape(), &[257]);
    }

    #[test]
    fn test_seed_reproducible() {
        let config = NoiseConfig::builder().beta(1.0).seed(99).build();
        let a = colored_noise(64, &config).unwrap();
        let b = colored_noise(64, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_spectrum_follows_power_law() {
        // Bin magnitudes are exact power-law amplitudes up to a common scale
        let config = NoiseConfig::builder().beta(2.0).seed(5).build();
        let x = colored_noise(256, &config).unwrap();
        let x = x.into_dimensionality::<Ix1>().unwrap();
        let spectrum = forward(&x, None, 0).unwrap();

        let ratio = spectrum[4].norm() / spectrum[8].norm();
        assert_abs_diff_eq!(ratio, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(spectrum[0].norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_white_noise_flat_spectrum() {
        let config = NoiseConfig::builder().seed(8).build();
        let x = colored_noise(129, &config).unwrap();
        let x = x.into_dimensionality::<Ix1>().unwrap();
        let spectrum = forward(&x, None, 0).unwrap();
        let reference = spectrum[1].norm();
        for k in 1..=64 {
            assert_abs_diff_eq!(spectrum[k].norm(), reference, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_too_short_rejected() {
        let config = NoiseConfig::default();
        assert!(colored_noise(1, &config).is_err());
        assert!(colored_noise(vec![4, 2, 2], &config).is_err());
    }
}
