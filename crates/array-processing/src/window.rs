//! Tapers and smoothing kernels.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{ArrayError, Result};

/// Kernel used to smooth spectral estimates along frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SmoothingWindow {
    /// Bartlett window of length `w + 2` with its zero endpoints removed
    #[default]
    Triangular,
    /// Hann window (raised cosine, zero endpoints)
    Hann,
    /// Hamming window
    Hamming,
    /// Bartlett window (zero endpoints kept)
    Bartlett,
    /// Flat window
    Boxcar,
}

impl SmoothingWindow {
    /// Kernel of length `width`. The kernels are not normalized.
    pub fn kernel(self, width: usize) -> Vec<f64> {
        match self {
            SmoothingWindow::Triangular => {
                let full = bartlett(width + 2);
                full[1..=width].to_vec()
            }
            SmoothingWindow::Hann => cosine_sum(width, 0.5, 0.5),
            SmoothingWindow::Hamming => cosine_sum(width, 0.54, 0.46),
            SmoothingWindow::Bartlett => bartlett(width),
            SmoothingWindow::Boxcar => vec![1.0; width],
        }
    }
}

fn bartlett(m: usize) -> Vec<f64> {
    if m <= 1 {
        return vec![1.0; m];
    }
    let half = (m - 1) as f64 / 2.0;
    (0..m)
        .map(|i| 1.0 - (i as f64 - half).abs() / half)
        .collect()
}

fn cosine_sum(m: usize, a0: f64, a1: f64) -> Vec<f64> {
    if m <= 1 {
        return vec![1.0; m];
    }
    let denom = (m - 1) as f64;
    (0..m)
        .map(|i| a0 - a1 * (2.0 * PI * i as f64 / denom).cos())
        .collect()
}

/// Split-cosine taper of `npts` samples with taper fraction `p`.
///
/// A fraction `p / 2` of the samples at each end follows a half cosine from 0
/// to 1; the middle is 1. When the tapered ends round to zero samples the
/// taper is all ones.
///
/// ```rust
/// use array_processing::window::cosine_taper;
///
/// let taper = cosine_taper(100, 0.22).unwrap();
/// assert_eq!(taper[0], 0.0);
/// assert_eq!(taper[50], 1.0);
/// assert_eq!(taper[99], 0.0);
/// ```
pub fn cosine_taper(npts: usize, p: f64) -> Result<Vec<f64>> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ArrayError::config(format!(
            "taper fraction must be in [0, 1], got {}",
            p
        )));
    }

    let frac = if p == 1.0 {
        (npts as f64 / 2.0 + 0.5).floor() as usize
    } else {
        (npts as f64 * p / 2.0 + 0.5).floor() as usize
    };
    if frac == 0 || npts < 2 {
        return Ok(vec![1.0; npts]);
    }

    // Ramp endpoints: 0 at rise_start/fall_end, 1 at rise_end/fall_start
    let rise_start = 0;
    let mut rise_end = frac - 1;
    let mut fall_start = npts - frac;
    let fall_end = npts - 1;
    if rise_start == rise_end {
        rise_end += 1;
    }
    if fall_start == fall_end {
        fall_start -= 1;
    }

    let mut taper = vec![1.0; npts];
    let rise_len = (rise_end - rise_start) as f64;
    for (i, value) in taper.iter_mut().enumerate().take(rise_end + 1) {
        *value = 0.5 * (1.0 - (PI * (i - rise_start) as f64 / rise_len).cos());
    }
    let fall_len = (fall_end - fall_start) as f64;
    for (i, value) in taper.iter_mut().enumerate().skip(fall_start) {
        *value = 0.5 * (1.0 + (PI * (fall_start as f64 - i as f64) / fall_len).cos());
    }
    Ok(taper)
}
