//! Sensor pair enumeration.
//!
//! The co-array, the packed spectral covariance stack and the cross-correlation
//! summary all walk sensor pairs in the same lexicographic order: every pair
//! with `i = 0` first (ascending `j`), then `i = 1`, and so on.

/// Number of unordered pairs `(i, j)` with `i < j` among `n` sensors.
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Unordered sensor pairs `(i, j)` with `i < j`, in lexicographic order.
///
/// ```rust
/// use array_processing::pairs::enumerate_pairs;
///
/// assert_eq!(enumerate_pairs(3), vec![(0, 1), (0, 2), (1, 2)]);
/// ```
pub fn enumerate_pairs(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(pair_count(n));
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push((i, j));
        }
    }
    pairs
}

/// Pairs `(i, j)` with `i <= j`, in lexicographic order.
///
/// This is the storage order of the upper triangle (diagonal included) of an
/// `n × n` Hermitian matrix.
pub fn enumerate_pairs_with_self(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(n * (n + 1) / 2);
    for i in 0..n {
        for j in i..n {
            pairs.push((i, j));
        }
    }
    pairs
}
