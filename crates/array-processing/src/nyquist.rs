//! Odd/even bin bookkeeping for real-valued sequences.
//!
//! A real sequence of `n` samples has a Hermitian spectrum. Bins
//! `1..=(n-1)/2` have conjugate mirrors at `n - k`; the Nyquist bin `n/2`
//! exists only for even `n` and is its own mirror.

use serde::{Deserialize, Serialize};

/// Bin layout of the spectrum of an `n`-sample real sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NyquistLayout {
    len: usize,
}

impl NyquistLayout {
    /// Layout for a sequence of `len` samples.
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    /// Sample count the layout describes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the layout describes an empty sequence.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when the spectrum has a bin exactly at the Nyquist frequency.
    pub fn has_nyquist_bin(&self) -> bool {
        self.len > 0 && self.len % 2 == 0
    }

    /// Index of the Nyquist frequency.
    ///
    /// For odd lengths the Nyquist frequency falls half a bin above the last
    /// positive bin; the returned index is the first bin past it.
    pub fn nyquist_index(&self) -> usize {
        if self.has_nyquist_bin() {
            self.len / 2
        } else {
            (self.len + 1) / 2
        }
    }

    /// Highest bin carrying a non-negative frequency: `n/2` (even) or
    /// `(n-1)/2` (odd).
    pub fn highest_positive_bin(&self) -> usize {
        if self.has_nyquist_bin() {
            self.len / 2
        } else {
            self.len.saturating_sub(1) / 2
        }
    }

    /// Number of non-redundant bins, DC through Nyquist inclusive.
    pub fn half_len(&self) -> usize {
        self.len / 2 + 1
    }

    /// Bin holding the complex conjugate of `bin`.
    pub fn mirror_index(&self, bin: usize) -> usize {
        if self.len == 0 {
            return 0;
        }
        (self.len - bin % self.len) % self.len
    }

    /// Distance of `bin` from DC along the frequency circle: `min(k, n - k)`.
    pub fn folded_index(&self, bin: usize) -> usize {
        bin.min(self.mirror_index(bin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_layout() {
        let layout = NyquistLayout::new(8);
        assert!(layout.has_nyquist_bin());
        assert_eq!(layout.nyquist_index(), 4);
        assert_eq!(layout.highest_positive_bin(), 4);
        assert_eq!(layout.half_len(), 5);
        assert_eq!(layout.mirror_index(4), 4);
        assert_eq!(layout.mirror_index(1), 7);
    }

    #[test]
    fn test_odd_layout() {
        let layout = NyquistLayout::new(7);
        assert!(!layout.has_nyquist_bin());
        assert_eq!(layout.nyquist_index(), 4);
        assert_eq!(layout.highest_positive_bin(), 3);
        assert_eq!(layout.half_len(), 4);
        assert_eq!(layout.mirror_index(3), 4);
    }

    #[test]
    fn test_dc_is_its_own_mirror() {
        for n in 1..10 {
            let layout = NyquistLayout::new(n);
            assert_eq!(layout.mirror_index(0), 0);
            assert_eq!(layout.folded_index(0), 0);
        }
    }

    #[test]
    fn test_folded_index() {
        let layout = NyquistLayout::new(10);
        let folded: Vec<usize> = (0..10).map(|k| layout.folded_index(k)).collect();
        assert_eq!(folded, vec![0, 1, 2, 3, 4, 5, 4, 3, 2, 1]);
    }
}
