//! Frequency-domain f-k beamformer.
//!
//! Scans a grid of candidate slowness and back-azimuth values. For each
//! candidate plane wave the per-sensor spectra are phase-aligned with steering
//! delays and summed; the ratio of coherent beam power to incoherent power,
//! accumulated over a frequency band, forms the power map. The maximizing cell
//! estimates the wavefront's slowness and direction.
//!
//! Delays follow `τ = s · (cos θ · easting + sin θ · northing)`. A wavefront
//! recorded as `x_j(t) = w(t + τ_j)` peaks at `(s, θ)` in the map.
//!
//! # Example
//!
//! ```rust,no_run
//! use array_processing::beamformer::{fk_freq, BeamformerConfig};
//! use ndarray::Array2;
//!
//! let config = BeamformerConfig::builder()
//!     .sample_rate(50.0)
//!     .velocity_range(0.25, 0.45)
//!     .frequency_range(0.5, 5.0)
//!     .grid(120, 180)
//!     .build();
//!
//! # let data = Array2::<f64>::zeros((1024, 4));
//! # let rij = Array2::<f64>::zeros((2, 4));
//! let map = fk_freq(&data, &rij, &config).unwrap();
//! let peak = map.peak();
//! println!("{:.3} km/s from {:.1} rad", peak.velocity, peak.azimuth);
//! ```

use ndarray::{s, Array1, Array2, Array3, ArrayBase, Data, Ix2, Zip};
use num_complex::Complex64;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::error::{ArrayError, Result};
use crate::spectral::{Normalization, SpectralTransform};
use crate::window::cosine_taper;

/// Configuration for f-k beamforming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamformerConfig {
    /// Sample rate in Hz
    pub sample_rate: f64,

    /// Slowest apparent velocity scanned (sets the largest slowness)
    pub velocity_min: f64,

    /// Fastest apparent velocity scanned (sets the smallest slowness)
    pub velocity_max: f64,

    /// Lower edge of the frequency band in Hz
    pub frequency_min: f64,

    /// Upper edge of the frequency band in Hz
    pub frequency_max: f64,

    /// Number of slowness grid points
    pub n_velocity: usize,

    /// Number of azimuth grid points over `[0, 2π]`
    pub n_azimuth: usize,

    /// Fraction of each channel covered by the cosine taper
    pub taper_fraction: f64,
}

impl Default for BeamformerConfig {
    fn default() -> Self {
        Self {
            sample_rate: 100.0,
            velocity_min: 0.25,
            velocity_max: 0.45,
            frequency_min: 0.5,
            frequency_max: 5.0,
            n_velocity: 100,
            n_azimuth: 100,
            taper_fraction: 0.22,
        }
    }
}

/// Builder for BeamformerConfig
#[derive(Debug, Default)]
pub struct BeamformerConfigBuilder {
    config: BeamformerConfig,
}

impl BeamformerConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: BeamformerConfig::default(),
        }
    }

    /// Set sample rate
    pub fn sample_rate(mut self, rate: f64) -> Self {
        self.config.sample_rate = rate;
        self
    }

    /// Set the scanned apparent velocity range
    pub fn velocity_range(mut self, min: f64, max: f64) -> Self {
        self.config.velocity_min = min;
        self.config.velocity_max = max;
        self
    }

    /// Set the frequency band
    pub fn frequency_range(mut self, min: f64, max: f64) -> Self {
        self.config.frequency_min = min;
        self.config.frequency_max = max;
        self
    }

    /// Set grid resolution (slowness, azimuth)
    pub fn grid(mut self, n_velocity: usize, n_azimuth: usize) -> Self {
        self.config.n_velocity = n_velocity;
        self.config.n_azimuth = n_azimuth;
        self
    }

    /// Set taper fraction
    pub fn taper_fraction(mut self, fraction: f64) -> Self {
        self.config.taper_fraction = fraction;
        self
    }

    /// Build the configuration
    pub fn build(self) -> BeamformerConfig {
        self.config
    }
}

impl BeamformerConfig {
    /// Create a new config builder
    pub fn builder() -> BeamformerConfigBuilder {
        BeamformerConfigBuilder::new()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ArrayError::config("sample_rate must be positive"));
        }

        let velocities_ok = [self.velocity_min, self.velocity_max]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0);
        if !velocities_ok {
            return Err(ArrayError::config("velocities must be positive"));
        }
        if self.velocity_min > self.velocity_max {
            return Err(ArrayError::config(
                "velocity_min must not exceed velocity_max",
            ));
        }

        let frequencies_ok = [self.frequency_min, self.frequency_max]
            .iter()
            .all(|f| f.is_finite() && *f >= 0.0);
        if !frequencies_ok {
            return Err(ArrayError::config("frequencies must be non-negative"));
        }

        if self.n_velocity == 0 || self.n_azimuth == 0 {
            return Err(ArrayError::config("grid sizes must be positive"));
        }

        if !(0.0..=1.0).contains(&self.taper_fraction) {
            return Err(ArrayError::config("taper_fraction must be between 0 and 1"));
        }

        Ok(())
    }
}

/// Unnormalized beam power over the slowness/azimuth grid.
#[derive(Debug, Clone)]
pub struct PowerMap {
    /// Power ratio indexed `[slowness, azimuth]`
    pub power: Array2<f64>,
    /// Slowness axis (inverse of the velocity unit)
    pub slowness: Array1<f64>,
    /// Azimuth axis in radians
    pub azimuth: Array1<f64>,
}

/// Maximum of a [`PowerMap`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamPeak {
    /// Grid index `(slowness, azimuth)`
    pub index: (usize, usize),
    /// Slowness at the peak
    pub slowness: f64,
    /// Apparent velocity at the peak
    pub velocity: f64,
    /// Azimuth at the peak in radians
    pub azimuth: f64,
    /// Beam power at the peak
    pub power: f64,
}

impl PowerMap {
    /// Grid cell with the largest power (exhaustive search).
    pub fn peak(&self) -> BeamPeak {
        let mut index = (0, 0);
        let mut power = f64::NEG_INFINITY;
        for (ij, &value) in self.power.indexed_iter() {
            if value > power {
                power = value;
                index = ij;
            }
        }

        let slowness = self.slowness[index.0];
        BeamPeak {
            index,
            slowness,
            velocity: 1.0 / slowness,
            azimuth: self.azimuth[index.1],
            power,
        }
    }
}

/// f-k beamformer with a fixed configuration
#[derive(Debug, Clone)]
pub struct FkBeamformer {
    config: BeamformerConfig,
}

impl FkBeamformer {
    /// Create a beamformer, validating the configuration
    pub fn new(config: BeamformerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration
    pub fn config(&self) -> &BeamformerConfig {
        &self.config
    }

    /// Beamform `data` (`samples × sensors`) recorded at `rij`
    /// (`[northing, easting, {elevation}] × sensors`).
    ///
    /// The caller's data is not modified; de-meaning and tapering happen on
    /// an owned copy.
    #[tracing::instrument(skip_all, fields(samples = data.nrows(), sensors = data.ncols()))]
    pub fn power_map<S1, S2>(
        &self,
        data: &ArrayBase<S1, Ix2>,
        rij: &ArrayBase<S2, Ix2>,
    ) -> Result<PowerMap>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
    {
        let (m, n_sensors) = data.dim();
        if rij.ncols() != n_sensors {
            return Err(ArrayError::invalid_dimension(format!(
                "{} data channels but {} sensor coordinates",
                n_sensors,
                rij.ncols()
            )));
        }
        if n_sensors < 2 {
            return Err(ArrayError::InsufficientSensors {
                required: 2,
                actual: n_sensors,
            });
        }
        if rij.nrows() < 2 {
            return Err(ArrayError::invalid_dimension(
                "sensor coordinates need northing and easting rows",
            ));
        }
        if m < 2 {
            return Err(ArrayError::invalid_dimension(format!(
                "need at least 2 samples, got {}",
                m
            )));
        }

        let config = &self.config;
        let slowness = Array1::linspace(
            1.0 / config.velocity_max,
            1.0 / config.velocity_min,
            config.n_velocity,
        );
        let azimuth = Array1::linspace(0.0, TAU, config.n_azimuth);
        let delays = steering_delays(rij, &slowness, &azimuth);

        let nfft = m.next_power_of_two();
        let delta_f = config.sample_rate / nfft as f64;
        let (low_bin, high_bin) = band_bins(config, nfft, delta_f)?;

        let coefficients = self.band_spectra(data, nfft, low_bin, high_bin)?;
        tracing::debug!(
            nfft,
            low_bin,
            high_bin,
            grid = ?delays.dim(),
            "beamforming band selected"
        );

        let grid = (config.n_velocity, config.n_azimuth);
        let (top, bottom) = (0..coefficients.nrows())
            .into_par_iter()
            .map(|k| {
                let bin = coefficients.row(k);
                let frequency = (low_bin + k) as f64 * delta_f;
                let mut top = Array2::<f64>::zeros(grid);
                let mut bottom = Array2::<f64>::zeros(grid);
                Zip::indexed(&mut top)
                    .and(&mut bottom)
                    .for_each(|(i, j), t, b| {
                        let mut beam = Complex64::default();
                        let mut incoherent = 0.0;
                        for (sensor, &c) in bin.iter().enumerate() {
                            let phase = -TAU * frequency * delays[[i, j, sensor]];
                            let steered = c * Complex64::from_polar(1.0, phase);
                            beam += steered;
                            incoherent += steered.norm_sqr();
                        }
                        *t = beam.norm_sqr();
                        *b = incoherent;
                    });
                (top, bottom)
            })
            .reduce(
                || (Array2::zeros(grid), Array2::zeros(grid)),
                |(t1, b1), (t2, b2)| (t1 + t2, b1 + b2),
            );

        if bottom.iter().any(|&b| !(b > 0.0 && b.is_finite())) {
            return Err(ArrayError::degeneracy(
                "no signal power in the selected frequency band",
            ));
        }

        Ok(PowerMap {
            power: top / bottom,
            slowness,
            azimuth,
        })
    }

    /// Raw FFT bins `low_bin..=high_bin` of every de-meaned, tapered channel,
    /// zero-padded to `nfft`. Rows are bins, columns sensors.
    fn band_spectra<S>(
        &self,
        data: &ArrayBase<S, Ix2>,
        nfft: usize,
        low_bin: usize,
        high_bin: usize,
    ) -> Result<Array2<Complex64>>
    where
        S: Data<Elem = f64>,
    {
        let taper = cosine_taper(data.nrows(), self.config.taper_fraction)?;

        let mut conditioned = data.to_owned();
        for mut column in conditioned.columns_mut() {
            let mean = column.mean().unwrap_or(0.0);
            for (value, &w) in column.iter_mut().zip(taper.iter()) {
                *value = (*value - mean) * w;
            }
        }

        let transform = SpectralTransform::builder()
            .length(nfft)
            .normalization(Normalization::Raw)
            .build();
        let spectrum = transform.forward(&conditioned)?;
        Ok(spectrum.slice(s![low_bin..=high_bin, ..]).to_owned())
    }
}

/// Beamform with `config`; see [`FkBeamformer::power_map`].
pub fn fk_freq<S1, S2>(
    data: &ArrayBase<S1, Ix2>,
    rij: &ArrayBase<S2, Ix2>,
    config: &BeamformerConfig,
) -> Result<PowerMap>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    FkBeamformer::new(config.clone())?.power_map(data, rij)
}

/// Plane-wave delay `[slowness, azimuth, sensor]` relative to the array
/// centroid.
fn steering_delays<S>(
    rij: &ArrayBase<S, Ix2>,
    slowness: &Array1<f64>,
    azimuth: &Array1<f64>,
) -> Array3<f64>
where
    S: Data<Elem = f64>,
{
    let north = rij.row(0).to_owned();
    let east = rij.row(1).to_owned();
    let north = &north - north.mean().unwrap_or(0.0);
    let east = &east - east.mean().unwrap_or(0.0);

    Array3::from_shape_fn(
        (slowness.len(), azimuth.len(), north.len()),
        |(i, j, k)| {
            let (sin, cos) = azimuth[j].sin_cos();
            slowness[i] * (cos * east[k] + sin * north[k])
        },
    )
}

/// Inclusive bin range for the configured band, never DC or Nyquist.
fn band_bins(config: &BeamformerConfig, nfft: usize, delta_f: f64) -> Result<(usize, usize)> {
    let low = ((config.frequency_min / delta_f + 0.5).floor() as i64).max(1);
    let high = ((config.frequency_max / delta_f + 0.5).floor() as i64).min(nfft as i64 / 2 - 1);
    if high < low {
        return Err(ArrayError::EmptyFrequencyBand {
            low_bin: low,
            high_bin: high,
        });
    }
    Ok((low as usize, high as usize))
}
