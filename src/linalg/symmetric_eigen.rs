//! Eigendecomposition of symmetric matrices.
//!
//! Householder tridiagonalization followed by the implicit-shift QL
//! algorithm, both in the Algol/EISPACK lineage (tred2 / tql2).

use super::LinalgError;
use crate::matrix::Matrix;
use crate::traits::FloatScalar;

/// Implicit QL sweeps allowed per eigenvalue before reporting
/// non-convergence.
pub(crate) const MAX_QL_SWEEPS: usize = 30;

/// Householder reduction of a symmetric matrix to tridiagonal form.
///
/// On entry `v` holds the matrix; on return it holds the accumulated
/// orthogonal transform, `d` the diagonal, and `e` the sub-diagonal
/// (`e[0]` is zero). Columns are scaled by their 1-norm before each
/// reflection to avoid under/overflow.
pub(crate) fn tridiagonalize<T: FloatScalar>(v: &mut Matrix<T>, d: &mut [T], e: &mut [T]) {
    let n = v.nrows();
    for j in 0..n {
        d[j] = v[(n - 1, j)];
    }

    for i in (1..n).rev() {
        // Scale to avoid under/overflow.
        let mut scale = T::zero();
        let mut h = T::zero();
        for k in 0..i {
            scale = scale + d[k].abs();
        }
        if scale.is_zero() {
            e[i] = d[i - 1];
            for j in 0..i {
                d[j] = v[(i - 1, j)];
                v[(i, j)] = T::zero();
                v[(j, i)] = T::zero();
            }
        } else {
            // Generate Householder vector.
            for k in 0..i {
                d[k] = d[k] / scale;
                h = h + d[k] * d[k];
            }
            let mut f = d[i - 1];
            let mut g = h.sqrt();
            if f > T::zero() {
                g = -g;
            }
            e[i] = scale * g;
            h = h - f * g;
            d[i - 1] = f - g;
            for item in e.iter_mut().take(i) {
                *item = T::zero();
            }

            // Apply similarity transformation to remaining columns.
            for j in 0..i {
                f = d[j];
                v[(j, i)] = f;
                g = e[j] + v[(j, j)] * f;
                for k in (j + 1)..i {
                    g = g + v[(k, j)] * d[k];
                    e[k] = e[k] + v[(k, j)] * f;
                }
                e[j] = g;
            }

            f = T::zero();
            for j in 0..i {
                e[j] = e[j] / h;
                f = f + e[j] * d[j];
            }
            let hh = f / (h + h);
            for j in 0..i {
                e[j] = e[j] - hh * d[j];
            }

            for j in 0..i {
                f = d[j];
                g = e[j];
                for k in j..i {
                    let sub = f * e[k] + g * d[k];
                    v[(k, j)] = v[(k, j)] - sub;
                }
                d[j] = v[(i - 1, j)];
                v[(i, j)] = T::zero();
            }
        }
        d[i] = h;
    }

    // Accumulate transformations.
    for i in 0..n.saturating_sub(1) {
        v[(n - 1, i)] = v[(i, i)];
        v[(i, i)] = T::one();
        let h = d[i + 1];
        if !h.is_zero() {
            for k in 0..=i {
                d[k] = v[(k, i + 1)] / h;
            }
            for j in 0..=i {
                let mut g = T::zero();
                for k in 0..=i {
                    g = g + v[(k, i + 1)] * v[(k, j)];
                }
                for k in 0..=i {
                    let sub = g * d[k];
                    v[(k, j)] = v[(k, j)] - sub;
                }
            }
        }
        for k in 0..=i {
            v[(k, i + 1)] = T::zero();
        }
    }
    for j in 0..n {
        d[j] = v[(n - 1, j)];
        v[(n - 1, j)] = T::zero();
    }
    v[(n - 1, n - 1)] = T::one();
    e[0] = T::zero();
}

/// Implicit-shift QL iteration on a symmetric tridiagonal matrix.
///
/// `d`/`e` hold the diagonal and sub-diagonal from [`tridiagonalize`];
/// `v` the accumulated transform. On success `d` holds the eigenvalues
/// in ascending order and the columns of `v` the matching
/// eigenvectors. Each eigenvalue is allowed `max_sweeps` implicit
/// sweeps before the routine reports
/// [`LinalgError::ConvergenceFailure`].
pub(crate) fn tridiagonal_ql<T: FloatScalar>(
    v: &mut Matrix<T>,
    d: &mut [T],
    e: &mut [T],
    max_sweeps: usize,
) -> Result<(), LinalgError> {
    let n = v.nrows();
    for i in 1..n {
        e[i - 1] = e[i];
    }
    e[n - 1] = T::zero();

    let two = T::one() + T::one();
    let mut f = T::zero();
    let mut tst1 = T::zero();
    let eps = T::epsilon();
    for l in 0..n {
        // Find small subdiagonal element.
        tst1 = tst1.max(d[l].abs() + e[l].abs());
        let mut m = l;
        while m < n {
            if e[m].abs() <= eps * tst1 {
                break;
            }
            m += 1;
        }

        // If m == l, d[l] is already an eigenvalue.
        if m > l {
            let mut iter = 0;
            loop {
                iter += 1;
                if iter > max_sweeps {
                    return Err(LinalgError::ConvergenceFailure);
                }

                // Compute implicit shift.
                let g = d[l];
                let mut p = (d[l + 1] - g) / (two * e[l]);
                let mut r = (p * p + T::one()).sqrt();
                if p < T::zero() {
                    r = -r;
                }
                d[l] = e[l] / (p + r);
                d[l + 1] = e[l] * (p + r);
                let dl1 = d[l + 1];
                let mut h = g - d[l];
                for item in d.iter_mut().take(n).skip(l + 2) {
                    *item = *item - h;
                }
                f = f + h;

                // Implicit QL transformation.
                p = d[m];
                let mut c = T::one();
                let mut c2 = c;
                let mut c3 = c;
                let el1 = e[l + 1];
                let mut s = T::zero();
                let mut s2 = T::zero();
                for i in (l..m).rev() {
                    c3 = c2;
                    c2 = c;
                    s2 = s;
                    let g = c * e[i];
                    h = c * p;
                    r = (p * p + e[i] * e[i]).sqrt();
                    e[i + 1] = s * r;
                    s = e[i] / r;
                    c = p / r;
                    p = c * d[i] - s * g;
                    d[i + 1] = h + s * (c * g + s * d[i]);

                    // Accumulate transformation.
                    for k in 0..n {
                        h = v[(k, i + 1)];
                        v[(k, i + 1)] = s * v[(k, i)] + c * h;
                        v[(k, i)] = c * v[(k, i)] - s * h;
                    }
                }
                p = -s * s2 * c3 * el1 * e[l] / dl1;
                e[l] = s * p;
                d[l] = c * p;

                if e[l].abs() <= eps * tst1 {
                    break;
                }
            }
        }
        d[l] = d[l] + f;
        e[l] = T::zero();
    }

    // Sort eigenvalues ascending, permuting eigenvector columns along.
    for i in 0..n.saturating_sub(1) {
        let mut k = i;
        let mut p = d[i];
        for j in (i + 1)..n {
            if d[j] < p {
                k = j;
                p = d[j];
            }
        }
        if k != i {
            d[k] = d[i];
            d[i] = p;
            for j in 0..n {
                let tmp = v[(j, i)];
                v[(j, i)] = v[(j, k)];
                v[(j, k)] = tmp;
            }
        }
    }
    Ok(())
}

/// Eigendecomposition of a symmetric matrix, `A = V D Vᵀ`.
///
/// Eigenvalues are real and returned in ascending order; the columns
/// of `V` are the matching orthonormal eigenvectors.
///
/// # Example
///
/// ```
/// use faktor::{Matrix, SymmetricEigen};
///
/// let a = Matrix::<f64>::from_rows(2, 2, &[2.0, 1.0, 1.0, 2.0]);
/// let eig = SymmetricEigen::new(&a).unwrap();
/// assert!((eig.eigenvalues()[0] - 1.0).abs() < 1e-10);
/// assert!((eig.eigenvalues()[1] - 3.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct SymmetricEigen<T> {
    eigenvalues: Vec<T>,
    eigenvectors: Matrix<T>,
}

impl<T: FloatScalar> SymmetricEigen<T> {
    /// Decompose a symmetric matrix. Only the stored values are read;
    /// symmetry is the caller's contract. Panics on non-square input.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        assert!(
            a.is_square(),
            "eigendecomposition requires a square matrix, got {}x{}",
            a.nrows(),
            a.ncols()
        );
        let n = a.nrows();
        assert!(n > 0, "eigendecomposition of an empty matrix");
        let mut v = a.clone();
        let mut d = vec![T::zero(); n];
        let mut e = vec![T::zero(); n];
        tridiagonalize(&mut v, &mut d, &mut e);
        tridiagonal_ql(&mut v, &mut d, &mut e, MAX_QL_SWEEPS)?;
        Ok(Self {
            eigenvalues: d,
            eigenvectors: v,
        })
    }

    /// Eigenvalues in ascending order.
    #[inline]
    pub fn eigenvalues(&self) -> &[T] {
        &self.eigenvalues
    }

    /// Orthonormal eigenvectors as matrix columns, ordered to match
    /// [`eigenvalues`](Self::eigenvalues).
    #[inline]
    pub fn eigenvectors(&self) -> &Matrix<T> {
        &self.eigenvectors
    }
}
