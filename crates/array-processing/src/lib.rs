//! Array Processing Library
//!
//! Frequency-domain tools for geophysical sensor arrays (seismic, infrasound):
//! conditioning multichannel records and estimating the slowness and
//! back-azimuth of a plane wave crossing the array.
//!
//! # Features
//!
//! - **Spectral Transforms**: Sentman-normalized FFT along any axis
//! - **Band-Pass**: Brick-wall filtering on the folded frequency axis
//! - **Pure-State Filter**: Coherence-weighted enhancement of shared signal
//! - **F-K Beamforming**: Slowness/azimuth power maps
//! - **Geometry**: Co-array inter-sensor separation vectors
//! - **Synthesis**: Colored (power-law) noise for testing
//!
//! Time series are `samples × channels`, one column per sensor. Sensor
//! coordinates are `[northing, easting, {elevation}] × sensors`.
//!
//! # Example
//!
//! ```rust,no_run
//! use array_processing::prelude::*;
//! use ndarray::Ix2;
//!
//! let noise = NoiseConfig::builder().beta(1.0).seed(7).build();
//! let x = colored_noise((2048, 4), &noise)
//!     .unwrap()
//!     .into_dimensionality::<Ix2>()
//!     .unwrap();
//!
//! let cleaned = psf(&x, &PureStateConfig::default()).unwrap();
//! let banded = bpf(&cleaned.filtered, [0.05, 0.25]).unwrap();
//! println!("{:?} samples, mean coherence {:?}", banded.filtered.dim(), cleaned.coherence.mean());
//! ```

pub mod bandpass;
pub mod beamformer;
pub mod co_array;
pub mod error;
pub mod noise;
pub mod nyquist;
pub mod pairs;
pub mod pure_state;
pub mod shape;
pub mod spectral;
pub mod summary;
pub mod window;

// Re-export main types for convenience
pub use bandpass::{bpf, BandpassOutput};
pub use beamformer::{
    fk_freq, BeamPeak, BeamformerConfig, BeamformerConfigBuilder, FkBeamformer, PowerMap,
};
pub use co_array::co_array;
pub use error::{ArrayError, Result};
pub use noise::{colored_noise, NoiseConfig, NoiseConfigBuilder};
pub use nyquist::NyquistLayout;
pub use pairs::{enumerate_pairs, enumerate_pairs_with_self, pair_count};
pub use pure_state::{psf, PureStateConfig, PureStateConfigBuilder, PureStateFilter, PureStateOutput};
pub use shape::Shape;
pub use spectral::{Normalization, SpectralTransform, SpectralTransformBuilder};
pub use summary::{correlation_summary, CorrelationSummary};
pub use window::{cosine_taper, SmoothingWindow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bandpass::bpf;
    pub use crate::beamformer::{fk_freq, BeamformerConfig, FkBeamformer, PowerMap};
    pub use crate::co_array::co_array;
    pub use crate::noise::{colored_noise, NoiseConfig};
    pub use crate::pure_state::{psf, PureStateConfig, PureStateFilter};
    pub use crate::spectral::{forward, inverse, Normalization, SpectralTransform};
    pub use crate::{ArrayError, Result};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
