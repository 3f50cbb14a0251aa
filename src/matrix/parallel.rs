//! Data-parallel kernels.
//!
//! Work is split over disjoint ranges of the row-major output buffer,
//! so worker threads never share a mutable element and the result is
//! identical to the serial path regardless of thread count.

use rayon::prelude::*;

use super::vector::Vector;
use super::Matrix;
use crate::traits::Scalar;

/// Row count above which [`Matrix::matmul`] switches to the parallel
/// kernel.
pub const PAR_ROW_THRESHOLD: usize = 64;

/// Per-output-index work below which convolution chunks grow to keep
/// scheduling overhead down.
const CONVOLVE_WORK_TARGET: usize = 100_000;

/// One output row of `a * b` accumulated into `out` (must be zeroed).
///
/// Iterating `k` in the outer loop keeps both `a`'s row and `b`'s rows
/// in stride-1 order.
pub(crate) fn matmul_row<T: Scalar>(a: &Matrix<T>, b: &Matrix<T>, i: usize, out: &mut [T]) {
    let arow = a.row_as_slice(i);
    for (k, &aik) in arow.iter().enumerate() {
        let brow = b.row_as_slice(k);
        for (o, &bkj) in out.iter_mut().zip(brow) {
            *o = *o + aik * bkj;
        }
    }
}

/// Parallel matrix product over disjoint output-row ranges.
pub(crate) fn matmul_parallel<T: Scalar>(a: &Matrix<T>, b: &Matrix<T>) -> Matrix<T> {
    let mut out = Matrix::zeros(a.nrows(), b.ncols());
    let ncols = b.ncols();
    out.data
        .par_chunks_mut(ncols)
        .enumerate()
        .for_each(|(i, row)| matmul_row(a, b, i, row));
    out
}

/// Full 1-D convolution of `u` and `v`.
///
/// The output has length `u.len() + v.len() - 1`; element `k` is
/// `Σ u[j]·v[k-j]` over the valid overlap. Output indices are computed
/// by parallel workers over disjoint chunks.
///
/// ```
/// use faktor::{convolve, Vector};
///
/// let u = Vector::from_slice(&[1.0, 2.0, 3.0]);
/// let v = Vector::from_slice(&[0.0, 1.0, 0.5]);
/// let w = convolve(&u, &v);
/// assert_eq!(w.as_slice(), &[0.0, 1.0, 2.5, 4.0, 1.5]);
/// ```
pub fn convolve<T: Scalar>(u: &Vector<T>, v: &Vector<T>) -> Vector<T> {
    assert!(!u.is_empty() && !v.is_empty(), "convolution of an empty vector");
    let nu = u.len();
    let nv = v.len();
    let n = nu + nv - 1;
    let chunk = core::cmp::max(1, CONVOLVE_WORK_TARGET / n);

    let mut out = vec![T::zero(); n];
    out.par_chunks_mut(chunk).enumerate().for_each(|(ci, slot)| {
        let base = ci * chunk;
        for (off, w) in slot.iter_mut().enumerate() {
            let k = base + off;
            let jlo = (k + 1).saturating_sub(nv);
            let jhi = core::cmp::min(k + 1, nu);
            let mut acc = T::zero();
            for j in jlo..jhi {
                acc = acc + u[j] * v[k - j];
            }
            *w = acc;
        }
    });
    Vector::from_vec(out)
}
