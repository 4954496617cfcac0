//! Pure-state filter.
//!
//! Enhances the frequency components that all channels share coherently. At
//! every frequency `f` from DC to Nyquist a `d × d` spectral matrix `S[f]` is
//! formed from the channel spectra and smoothed across frequency. The
//! generalized coherence (degree of polarization) of `S[f]`
//!
//! ```text
//! P[f] = (d · tr(S²) − (tr S)²) / ((d − 1) · (tr S)²)
//! ```
//!
//! lies in `[0, 1]`: 1 when a single source explains all channels, 0 when the
//! energy is spread evenly over independent channels. The filter multiplies
//! every channel's spectrum by `P[f]^p` and transforms back.
//!
//! Without smoothing `S[f]` is rank one and `P ≡ 1`, so smoothing is what
//! makes the estimator useful. Channels should be scaled to unit variance
//! first: amplitude imbalance between channels biases `P` downward.
//!
//! # References
//! - Samson & Olson (1980), "Some comments on the descriptions of the
//!   polarization states of waves", Geophys. J. R. astr. Soc.
//! - Samson & Olson (1981), "Data-adaptive polarization filters for
//!   multichannel geophysical data", Geophysics

use ndarray::{s, Array1, Array2, ArrayBase, Data, Ix2, Zip};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{ArrayError, Result};
use crate::nyquist::NyquistLayout;
use crate::pairs::enumerate_pairs_with_self;
use crate::spectral::{forward, inverse};
use crate::window::SmoothingWindow;

/// Configuration for the pure-state filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PureStateConfig {
    /// Contrast exponent `p` applied to the coherence weights
    pub contrast: f64,

    /// Smoothing kernel width in frequency bins
    pub width: usize,

    /// Number of smoothing passes
    pub passes: usize,

    /// Smoothing kernel shape
    pub window: SmoothingWindow,
}

impl Default for PureStateConfig {
    fn default() -> Self {
        Self {
            contrast: 2.0,
            width: 3,
            passes: 3,
            window: SmoothingWindow::Triangular,
        }
    }
}

/// Builder for PureStateConfig
#[derive(Debug, Default)]
pub struct PureStateConfigBuilder {
    config: PureStateConfig,
}

impl PureStateConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: PureStateConfig::default(),
        }
    }

    /// Set contrast exponent
    pub fn contrast(mut self, contrast: f64) -> Self {
        self.config.contrast = contrast;
        self
    }

    /// Set smoothing width
    pub fn width(mut self, width: usize) -> Self {
        self.config.width = width;
        self
    }

    /// Set number of smoothing passes
    pub fn passes(mut self, passes: usize) -> Self {
        self.config.passes = passes;
        self
    }

    /// Set smoothing window
    pub fn window(mut self, window: SmoothingWindow) -> Self {
        self.config.window = window;
        self
    }

    /// Build the configuration
    pub fn build(self) -> PureStateConfig {
        self.config
    }
}

impl PureStateConfig {
    /// Create a new config builder
    pub fn builder() -> PureStateConfigBuilder {
        PureStateConfigBuilder::new()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.contrast.is_finite() || self.contrast < 0.0 {
            return Err(ArrayError::config(
                "contrast must be finite and non-negative",
            ));
        }

        if self.width == 0 {
            return Err(ArrayError::config("width must be positive"));
        }

        if self.passes == 0 {
            return Err(ArrayError::config("passes must be positive"));
        }

        Ok(())
    }
}

/// Result of pure-state filtering
#[derive(Debug, Clone)]
pub struct PureStateOutput {
    /// Filtered series, `samples × channels`
    pub filtered: Array2<f64>,
    /// Generalized coherence per bin, DC through Nyquist
    pub coherence: Array1<f64>,
}

/// Pure-state filter with a fixed configuration
#[derive(Debug, Clone)]
pub struct PureStateFilter {
    config: PureStateConfig,
    kernel: Vec<f64>,
}

impl PureStateFilter {
    /// Create a filter, validating the configuration
    pub fn new(config: PureStateConfig) -> Result<Self> {
        config.validate()?;
        let kernel = config.window.kernel(config.width);
        Ok(Self { config, kernel })
    }

    /// Get the configuration
    pub fn config(&self) -> &PureStateConfig {
        &self.config
    }

    /// Filter a `samples × channels` matrix.
    #[tracing::instrument(skip_all, fields(samples = x.nrows(), channels = x.ncols()))]
    pub fn filter<S>(&self, x: &ArrayBase<S, Ix2>) -> Result<PureStateOutput>
    where
        S: Data<Elem = f64>,
    {
        let (n, d) = x.dim();
        if d < 2 {
            return Err(ArrayError::InsufficientSensors {
                required: 2,
                actual: d,
            });
        }
        if n < 2 {
            return Err(ArrayError::invalid_dimension(format!(
                "need at least 2 samples, got {}",
                n
            )));
        }

        let layout = NyquistLayout::new(n);
        let spectrum = forward(x, None, 0)?;
        let half = spectrum.slice(s![..layout.half_len(), ..]).to_owned();

        let stack = covariance_stack(&half);
        let smoothed = smooth_stack(&stack, &self.kernel, self.config.passes);
        let coherence = generalized_coherence(&smoothed, d, &layout)?;

        tracing::debug!(
            bins = coherence.len(),
            mean_coherence = coherence.mean().unwrap_or(0.0),
            "coherence estimated"
        );

        let weights = coherence.mapv(|p| p.powf(self.config.contrast));
        let mut full = Array2::<Complex64>::zeros((n, d));
        for (bin, row) in half.rows().into_iter().enumerate() {
            let w = weights[bin];
            full.row_mut(bin).assign(&row.mapv(|c| c * w));
        }
        for bin in layout.half_len()..n {
            let mirrored = full.row(layout.mirror_index(bin)).mapv(|c| c.conj());
            full.row_mut(bin).assign(&mirrored);
        }

        let filtered = inverse(&full, None, 0)?;
        Ok(PureStateOutput {
            filtered,
            coherence,
        })
    }
}

/// Pure-state filter `x` with `config`.
///
/// ```rust
/// use array_processing::pure_state::{psf, PureStateConfig};
/// use ndarray::Array2;
///
/// let x = Array2::from_shape_fn((65, 3), |(i, _)| (i as f64 * 0.4).sin());
/// let out = psf(&x, &PureStateConfig::default()).unwrap();
/// assert_eq!(out.coherence.len(), 33);
/// assert_eq!(out.coherence[0], 0.0);
/// ```
pub fn psf<S>(x: &ArrayBase<S, Ix2>, config: &PureStateConfig) -> Result<PureStateOutput>
where
    S: Data<Elem = f64>,
{
    PureStateFilter::new(config.clone())?.filter(x)
}

/// Upper triangle (diagonal included) of `X[f] · X[f]^H` for every bin,
/// one row per bin, columns in `enumerate_pairs_with_self` order.
fn covariance_stack(half: &Array2<Complex64>) -> Array2<Complex64> {
    let pairs = enumerate_pairs_with_self(half.ncols());
    let mut stack = Array2::<Complex64>::zeros((half.nrows(), pairs.len()));

    Zip::from(stack.rows_mut())
        .and(half.rows())
        .par_for_each(|mut packed, bin| {
            for (slot, &(i, j)) in packed.iter_mut().zip(pairs.iter()) {
                *slot = bin[i] * bin[j].conj();
            }
        });

    stack
}

/// Convolve every column with `kernel`, `passes` times, keeping the bins
/// aligned with the input (full-convolution sample `k + width/2` lands on
/// bin `k`).
fn smooth_stack(stack: &Array2<Complex64>, kernel: &[f64], passes: usize) -> Array2<Complex64> {
    let mut smoothed = stack.clone();
    let len = stack.nrows();
    let offset = kernel.len() / 2;

    Zip::from(smoothed.columns_mut()).par_for_each(|mut column| {
        let mut scratch = vec![Complex64::default(); len];
        for _ in 0..passes {
            for (k, out) in scratch.iter_mut().enumerate() {
                let m = k + offset;
                let mut acc = Complex64::default();
                for (j, &w) in kernel.iter().enumerate() {
                    if m >= j && m - j < len {
                        acc += column[m - j] * w;
                    }
                }
                *out = acc;
            }
            for (c, s) in column.iter_mut().zip(scratch.iter()) {
                *c = *s;
            }
        }
    });

    smoothed
}

/// Generalized coherence of every smoothed spectral matrix.
///
/// DC and (for even lengths) Nyquist are forced to zero; smoothing leaks
/// complex values into those real-only bins.
fn generalized_coherence(
    smoothed: &Array2<Complex64>,
    d: usize,
    layout: &NyquistLayout,
) -> Result<Array1<f64>> {
    let pairs = enumerate_pairs_with_self(d);
    let dn = d as f64;
    let last = smoothed.nrows() - 1;
    let mut coherence = Array1::zeros(smoothed.nrows());

    for (bin, packed) in smoothed.rows().into_iter().enumerate() {
        if bin == 0 || (layout.has_nyquist_bin() && bin == last) {
            continue;
        }

        let mut trace = 0.0;
        let mut trace_of_square = 0.0;
        for (value, &(i, j)) in packed.iter().zip(pairs.iter()) {
            if i == j {
                trace += value.re;
                trace_of_square += value.norm_sqr();
            } else {
                trace_of_square += 2.0 * value.norm_sqr();
            }
        }

        let trace_squared = trace * trace;
        if !(trace_squared > 0.0 && trace_squared.is_finite()) {
            return Err(ArrayError::degeneracy(format!(
                "spectral matrix trace is {} at frequency bin {}",
                trace, bin
            )));
        }

        let p = (dn * trace_of_square - trace_squared) / ((dn - 1.0) * trace_squared);
        if !p.is_finite() {
            return Err(ArrayError::degeneracy(format!(
                "coherence is not finite at frequency bin {}",
                bin
            )));
        }
        coherence[bin] = p.clamp(0.0, 1.0);
    }

    Ok(coherence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{colored_noise, NoiseConfig};
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, Axis, Ix2};

    fn noise_matrix(n: usize, d: usize, seed: u64) -> Array2<f64> {
        let config = NoiseConfig::builder().seed(seed).build();
        colored_noise((n, d), &config)
            .unwrap()
            .into_dimensionality::<Ix2>()
            .unwrap()
    }

    #[test]
    fn test_output_shapes() {
        let x = noise_matrix(128, 4, 1);
        let out = psf(&x, &PureStateConfig::default()).unwrap();
        assert_eq!(out.filtered.dim(), (128, 4));
        assert_eq!(out.coherence.len(), 65);

        let x = noise_matrix(127, 4, 2);
        let out = psf(&x, &PureStateConfig::default()).unwrap();
        assert_eq!(out.coherence.len(), 64);
    }

    #[test]
    fn test_coherence_bounds_and_forced_zeros() {
        let x = noise_matrix(256, 5, 7);
        let out = psf(&x, &PureStateConfig::default()).unwrap();

        assert!(out.coherence.iter().all(|&p| (0.0..=1.0).contains(&p)));
        assert_eq!(out.coherence[0], 0.0);
        assert_eq!(out.coherence[128], 0.0);
    }

    #[test]
    fn test_identical_channels_fully_coherent() {
        // Odd length: no Nyquist bin, so only the mean is removed
        let column = noise_matrix(101, 1, 3);
        let x = Array2::from_shape_fn((101, 3), |(i, _)| column[[i, 0]] + 0.2);
        let out = psf(&x, &PureStateConfig::default()).unwrap();

        for bin in 1..out.coherence.len() {
            assert_abs_diff_eq!(out.coherence[bin], 1.0, epsilon = 1e-9);
        }

        let means = x.mean_axis(Axis(0)).unwrap();
        for i in 0..101 {
            for j in 0..3 {
                assert_abs_diff_eq!(out.filtered[[i, j]], x[[i, j]] - means[j], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_incoherent_channels_are_suppressed() {
        let x = noise_matrix(512, 4, 11);
        let out = psf(&x, &PureStateConfig::default()).unwrap();
        let mean_p = out.coherence.mean().unwrap();
        assert!(mean_p < 0.8, "independent noise looked coherent: {}", mean_p);

        let energy_in: f64 = x.iter().map(|v| v * v).sum();
        let energy_out: f64 = out.filtered.iter().map(|v| v * v).sum();
        assert!(energy_out < energy_in);
    }

    #[test]
    fn test_higher_contrast_removes_more_energy() {
        let x = noise_matrix(256, 3, 5);
        let soft = psf(&x, &PureStateConfig::builder().contrast(1.0).build()).unwrap();
        let hard = psf(&x, &PureStateConfig::builder().contrast(4.0).build()).unwrap();

        let energy = |a: &Array2<f64>| a.iter().map(|v| v * v).sum::<f64>();
        assert!(energy(&hard.filtered) < energy(&soft.filtered));
        assert_eq!(soft.coherence, hard.coherence);
    }

    #[test]
    fn test_smoothing_is_centered() {
        let mut stack = Array2::<Complex64>::zeros((12, 1));
        stack[[5, 0]] = Complex64::new(1.0, 0.0);
        let kernel = SmoothingWindow::Triangular.kernel(3);
        let smoothed = smooth_stack(&stack, &kernel, 1);

        assert_abs_diff_eq!(smoothed[[4, 0]].re, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(smoothed[[5, 0]].re, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(smoothed[[6, 0]].re, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(smoothed[[3, 0]].re, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_covariance_stack_layout() {
        let half = ndarray::array![[
            Complex64::new(1.0, 1.0),
            Complex64::new(2.0, 0.0)
        ]];
        let stack = covariance_stack(&half);
        assert_eq!(stack.dim(), (1, 3));
        assert_eq!(stack[[0, 0]], Complex64::new(2.0, 0.0));
        assert_eq!(stack[[0, 1]], Complex64::new(2.0, 2.0));
        assert_eq!(stack[[0, 2]], Complex64::new(4.0, 0.0));
    }

    #[test]
    fn test_single_channel_rejected() {
        let x = noise_matrix(64, 1, 9);
        assert!(matches!(
            psf(&x, &PureStateConfig::default()),
            Err(ArrayError::InsufficientSensors { required: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_silent_input_is_degenerate() {
        let x = Array2::<f64>::zeros((64, 3));
        assert!(matches!(
            psf(&x, &PureStateConfig::default()),
            Err(ArrayError::NumericDegeneracy { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        assert!(PureStateConfig::default().validate().is_ok());
        assert!(PureStateConfig::builder().width(0).build().validate().is_err());
        assert!(PureStateConfig::builder().passes(0).build().validate().is_err());
        assert!(PureStateConfig::builder().contrast(-1.0).build().validate().is_err());
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = PureStateConfig::builder()
            .contrast(3.0)
            .width(5)
            .window(SmoothingWindow::Hann)
            .build();
        let json = serde_json::to_string(&config).unwrap();
        let back: PureStateConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
