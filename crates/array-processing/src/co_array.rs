//! Co-array geometry.
//!
//! The co-array is the set of separation vectors between every pair of
//! sensors. It determines how the array samples the wavefield spatially and is
//! what a plane-wave slowness solver fits relative arrival times against.

use ndarray::{Array2, ArrayBase, Axis, Data, Ix2};

use crate::error::{ArrayError, Result};
use crate::pairs::{enumerate_pairs, pair_count};

/// Pairwise sensor separations.
///
/// `rij` is `d × n`: one `[northing, easting, {elevation}]` column per sensor.
/// The result is `d × n(n-1)/2`, column `k` holding `rij[:, i] - rij[:, j]`
/// for the k-th pair `(i, j)` of [`enumerate_pairs`].
///
/// ```rust
/// use array_processing::co_array::co_array;
/// use ndarray::array;
///
/// let rij = array![[0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// let xij = co_array(&rij).unwrap();
/// assert_eq!(xij, array![[-1.0, 0.0, 1.0], [0.0, -1.0, -1.0]]);
/// ```
pub fn co_array<S>(rij: &ArrayBase<S, Ix2>) -> Result<Array2<f64>>
where
    S: Data<Elem = f64>,
{
    let (d, n) = rij.dim();
    if n < 2 {
        return Err(ArrayError::InsufficientSensors {
            required: 2,
            actual: n,
        });
    }
    if d == 0 {
        return Err(ArrayError::invalid_dimension(
            "sensor coordinates need at least one dimension",
        ));
    }

    let mut xij = Array2::zeros((d, pair_count(n)));
    for (mut column, (i, j)) in xij.axis_iter_mut(Axis(1)).zip(enumerate_pairs(n)) {
        column.assign(&(&rij.column(i) - &rij.column(j)));
    }

    tracing::trace!(sensors = n, dims = d, pairs = xij.ncols(), "co-array formed");
    Ok(xij)
}
