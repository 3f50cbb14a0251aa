//! Cholesky decomposition of symmetric positive-definite matrices.

use super::LinalgError;
use crate::matrix::vector::Vector;
use crate::matrix::Matrix;
use crate::traits::FloatScalar;

/// In-place lower-triangular Cholesky factorization, `A = L Lᵀ`.
///
/// Only the lower triangle of `a` is read; on success it holds L and
/// the strict upper triangle is zeroed. An adjusted diagonal that is
/// not strictly positive — including NaN from upstream — is an
/// explicit [`LinalgError::NotPositiveDefinite`].
pub(crate) fn cholesky_in_place<T: FloatScalar>(a: &mut Matrix<T>) -> Result<(), LinalgError> {
    let n = a.nrows();
    assert!(a.is_square(), "Cholesky requires a square matrix, got {}x{}", a.nrows(), a.ncols());

    for j in 0..n {
        let mut diag = a[(j, j)];
        for k in 0..j {
            let l = a[(j, k)];
            diag = diag - l * l;
        }
        // `!(diag > 0)` also rejects NaN
        if !(diag > T::zero()) {
            return Err(LinalgError::NotPositiveDefinite);
        }
        let ljj = diag.sqrt();
        a[(j, j)] = ljj;

        for i in (j + 1)..n {
            let mut s = a[(i, j)];
            for k in 0..j {
                let sub = a[(i, k)] * a[(j, k)];
                s = s - sub;
            }
            a[(i, j)] = s / ljj;
        }
    }

    for i in 0..n {
        for j in (i + 1)..n {
            a[(i, j)] = T::zero();
        }
    }
    Ok(())
}

/// Cholesky decomposition `A = L Lᵀ` of a symmetric positive-definite
/// matrix.
///
/// # Example
///
/// ```
/// use faktor::Matrix;
///
/// let a = Matrix::<f64>::from_rows(3, 3, &[
///     4.0, 12.0, -16.0,
///     12.0, 37.0, -43.0,
///     -16.0, -43.0, 98.0,
/// ]);
/// let chol = a.cholesky().unwrap();
/// let l = chol.l();
/// assert!((l[(1, 0)] - 6.0).abs() < 1e-10);
/// assert!((l[(2, 2)] - 3.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct CholeskyDecomposition<T> {
    l: Matrix<T>,
}

impl<T: FloatScalar> CholeskyDecomposition<T> {
    /// Factor `a`. Fails with [`LinalgError::NotPositiveDefinite`] when
    /// the input is not positive definite.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        let mut l = a.clone();
        cholesky_in_place(&mut l)?;
        Ok(Self { l })
    }

    /// Dimension of the factored matrix.
    #[inline]
    pub fn n(&self) -> usize {
        self.l.nrows()
    }

    /// The lower-triangular factor L.
    pub fn l(&self) -> &Matrix<T> {
        &self.l
    }

    /// Solve `A x = b` by forward substitution with L, then back
    /// substitution with Lᵀ.
    pub fn solve(&self, b: &Vector<T>) -> Vector<T> {
        let n = self.n();
        assert_eq!(b.len(), n, "rhs length {} does not match dimension {}", b.len(), n);

        // L y = b
        let mut y = Vector::zeros(n);
        for i in 0..n {
            let mut s = b[i];
            for k in 0..i {
                let sub = self.l[(i, k)] * y[k];
                s = s - sub;
            }
            y[i] = s / self.l[(i, i)];
        }
        // Lᵀ x = y
        let mut x = y;
        for i in (0..n).rev() {
            let mut s = x[i];
            for k in (i + 1)..n {
                let sub = self.l[(k, i)] * x[k];
                s = s - sub;
            }
            x[i] = s / self.l[(i, i)];
        }
        x
    }

    /// Determinant: square of the product of the L diagonal.
    pub fn det(&self) -> T {
        let mut d = T::one();
        for i in 0..self.n() {
            d = d * self.l[(i, i)];
        }
        d * d
    }

    /// Inverse by solving against each identity column.
    pub fn inverse(&self) -> Matrix<T> {
        let n = self.n();
        let mut inv = Matrix::zeros(n, n);
        for j in 0..n {
            let mut e = Vector::zeros(n);
            e[j] = T::one();
            let col = self.solve(&e);
            for i in 0..n {
                inv[(i, j)] = col[i];
            }
        }
        inv
    }
}

// ── Matrix convenience methods ──────────────────────────────────────

impl<T: FloatScalar> Matrix<T> {
    /// Cholesky decomposition. See [`CholeskyDecomposition`].
    pub fn cholesky(&self) -> Result<CholeskyDecomposition<T>, LinalgError> {
        CholeskyDecomposition::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn known_3x3_factor() {
        let a = Matrix::from_rows(
            3,
            3,
            &[4.0, 12.0, -16.0, 12.0, 37.0, -43.0, -16.0, -43.0, 98.0],
        );
        let chol = a.cholesky().unwrap();
        let expected = Matrix::from_rows(3, 3, &[2.0, 0.0, 0.0, 6.0, 1.0, 0.0, -8.0, 5.0, 3.0]);
        assert!(chol.l().approx_eq(&expected, TOL), "{:?}", chol.l());
    }

    #[test]
    fn reconstruction() {
        let a = Matrix::from_rows(3, 3, &[6.0, 2.0, 1.0, 2.0, 5.0, 2.0, 1.0, 2.0, 4.0]);
        let chol = a.cholesky().unwrap();
        let l = chol.l();
        let rebuilt = l * &l.transpose();
        assert!(rebuilt.approx_eq(&a, 1e-9));
    }

    #[test]
    fn solve_spd_system() {
        let a = Matrix::from_rows(2, 2, &[4.0, 2.0, 2.0, 3.0]);
        let b = Vector::from_slice(&[10.0, 8.0]);
        let x = a.cholesky().unwrap().solve(&b);
        let r = a.vecmul(&x);
        assert!(r.approx_eq(&b, 1e-9));
    }

    #[test]
    fn det_and_inverse() {
        let a = Matrix::<f64>::from_rows(2, 2, &[4.0, 2.0, 2.0, 3.0]);
        let chol = a.cholesky().unwrap();
        assert!((chol.det() - 8.0).abs() < TOL);
        assert!((&a * &chol.inverse()).approx_eq(&Matrix::eye(2), 1e-9));
    }

    #[test]
    fn indefinite_is_explicit_failure() {
        let a = Matrix::from_rows(2, 2, &[1.0, 5.0, 5.0, 1.0]);
        assert_eq!(a.cholesky().unwrap_err(), LinalgError::NotPositiveDefinite);
    }

    #[test]
    fn negative_definite_is_explicit_failure() {
        let a = Matrix::from_rows(2, 2, &[-4.0, 0.0, 0.0, -1.0]);
        assert_eq!(a.cholesky().unwrap_err(), LinalgError::NotPositiveDefinite);
    }

    #[test]
    fn nan_input_is_explicit_failure() {
        let a = Matrix::from_rows(2, 2, &[f64::NAN, 0.0, 0.0, 1.0]);
        assert_eq!(a.cholesky().unwrap_err(), LinalgError::NotPositiveDefinite);
    }

    #[test]
    fn semidefinite_is_explicit_failure() {
        // rank 1, zero eigenvalue
        let a = Matrix::from_rows(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(a.cholesky().unwrap_err(), LinalgError::NotPositiveDefinite);
    }

    #[test]
    fn one_by_one() {
        let a = Matrix::<f64>::from_rows(1, 1, &[9.0]);
        let chol = a.cholesky().unwrap();
        assert!((chol.l()[(0, 0)] - 3.0).abs() < TOL);
        assert!((chol.det() - 9.0).abs() < TOL);
    }
}
