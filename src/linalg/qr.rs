//! QR decomposition using Householder reflections.

use crate::matrix::vector::Vector;
use crate::matrix::Matrix;
use crate::traits::FloatScalar;

/// QR factorization in place.
///
/// On return `a` holds the packed factorization: R on and above the
/// diagonal, scaled Householder vectors below it. `tau[col]` is the
/// reflector scalar for column `col`; a zero `tau` marks an identity
/// reflector (numerically zero sub-column, or the skipped last column
/// of a square input, which is already reduced once the first `n - 1`
/// are).
///
/// The reflector sign is chosen to match the pivot so `v0 = a + sigma`
/// never cancels. Requires `m >= n`.
pub(crate) fn qr_in_place<T: FloatScalar>(a: &mut Matrix<T>, tau: &mut [T]) {
    let m = a.nrows();
    let n = a.ncols();
    assert!(m >= n, "QR requires nrows >= ncols, got {}x{}", m, n);
    assert_eq!(tau.len(), n, "tau length must equal ncols");

    // A square matrix is upper triangular after n - 1 reflections.
    let last = if m == n && n > 0 { n - 1 } else { n };

    for col in 0..last {
        let mut norm_sq = T::zero();
        for i in col..m {
            let v = a[(i, col)];
            norm_sq = norm_sq + v * v;
        }
        let norm = norm_sq.sqrt();
        if norm < T::epsilon() {
            // Nothing to annihilate; keep an identity reflector so the
            // factorization stays total over rank-deficient input.
            tau[col] = T::zero();
            continue;
        }

        let a_cc = a[(col, col)];
        let sigma = if a_cc < T::zero() { -norm } else { norm };

        let v0 = a_cc + sigma;
        a[(col, col)] = v0;
        let tau_val = v0 / sigma;
        tau[col] = tau_val;

        for i in (col + 1)..m {
            a[(i, col)] = a[(i, col)] / v0;
        }

        // A[col:m, col+1:n] -= tau * v * (vᵀ A), v = [1, stored...]
        for j in (col + 1)..n {
            let mut dot = a[(col, j)];
            for i in (col + 1)..m {
                dot = dot + a[(i, col)] * a[(i, j)];
            }
            dot = dot * tau_val;

            a[(col, j)] = a[(col, j)] - dot;
            for i in (col + 1)..m {
                let sub = dot * a[(i, col)];
                a[(i, j)] = a[(i, j)] - sub;
            }
        }

        a[(col, col)] = -sigma;
    }
}

/// QR decomposition of an `m x n` matrix with `m >= n`.
///
/// # Example
///
/// ```
/// use faktor::{Matrix, Vector};
///
/// // Least-squares fit y = c0 + c1*x to (0,1), (1,2), (2,4)
/// let a = Matrix::from_rows(3, 2, &[1.0_f64, 0.0, 1.0, 1.0, 1.0, 2.0]);
/// let b = Vector::from_slice(&[1.0, 2.0, 4.0]);
/// let x = a.qr().solve(&b);
/// assert!((x[0] - 5.0 / 6.0).abs() < 1e-10);
/// assert!((x[1] - 3.0 / 2.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct QrDecomposition<T> {
    qr: Matrix<T>,
    tau: Vec<T>,
}

impl<T: FloatScalar> QrDecomposition<T> {
    /// Decompose `a` (requires `m >= n`).
    pub fn new(a: &Matrix<T>) -> Self {
        let mut qr = a.clone();
        let mut tau = vec![T::zero(); a.ncols()];
        qr_in_place(&mut qr, &mut tau);
        Self { qr, tau }
    }

    /// Upper-triangular factor R (`n x n`).
    pub fn r(&self) -> Matrix<T> {
        let n = self.qr.ncols();
        Matrix::from_fn(n, n, |i, j| if i <= j { self.qr[(i, j)] } else { T::zero() })
    }

    /// Thin Q factor (`m x n`, orthonormal columns), built by applying
    /// the reflections in reverse to a thin identity.
    pub fn q(&self) -> Matrix<T> {
        let m = self.qr.nrows();
        let n = self.qr.ncols();
        let mut q = Matrix::zeros(m, n);
        for i in 0..n {
            q[(i, i)] = T::one();
        }

        for col in (0..n).rev() {
            let tau_val = self.tau[col];
            if tau_val.is_zero() {
                continue;
            }
            for j in col..n {
                let mut dot = q[(col, j)];
                for i in (col + 1)..m {
                    dot = dot + self.qr[(i, col)] * q[(i, j)];
                }
                dot = dot * tau_val;

                q[(col, j)] = q[(col, j)] - dot;
                for i in (col + 1)..m {
                    let sub = dot * self.qr[(i, col)];
                    q[(i, j)] = q[(i, j)] - sub;
                }
            }
        }
        q
    }

    /// Minimize `||A x - b||` via `Qᵀ b` then back substitution.
    ///
    /// For square `A` this is the exact solution; R must have a nonzero
    /// diagonal.
    pub fn solve(&self, b: &Vector<T>) -> Vector<T> {
        let m = self.qr.nrows();
        let n = self.qr.ncols();
        assert_eq!(b.len(), m, "rhs length {} does not match {} rows", b.len(), m);

        let mut qtb: Vec<T> = b.as_slice().to_vec();
        for col in 0..n {
            let tau_val = self.tau[col];
            if tau_val.is_zero() {
                continue;
            }
            let mut dot = qtb[col];
            for i in (col + 1)..m {
                dot = dot + self.qr[(i, col)] * qtb[i];
            }
            dot = dot * tau_val;

            qtb[col] = qtb[col] - dot;
            for i in (col + 1)..m {
                let sub = dot * self.qr[(i, col)];
                qtb[i] = qtb[i] - sub;
            }
        }

        let mut x = Vector::zeros(n);
        for i in (0..n).rev() {
            let mut sum = qtb[i];
            for j in (i + 1)..n {
                sum = sum - self.qr[(i, j)] * x[j];
            }
            x[i] = sum / self.qr[(i, i)];
        }
        x
    }

    /// Determinant of a square input: product of the R diagonal with
    /// one sign flip per applied reflector (each has determinant −1).
    pub fn det(&self) -> T {
        assert!(self.qr.is_square(), "determinant requires a square matrix");
        let n = self.qr.ncols();
        let mut d = T::one();
        for i in 0..n {
            d = d * self.qr[(i, i)];
        }
        let reflections = self.tau.iter().filter(|t| !t.is_zero()).count();
        if reflections % 2 == 1 {
            -d
        } else {
            d
        }
    }
}

// ── Matrix convenience methods ──────────────────────────────────────

impl<T: FloatScalar> Matrix<T> {
    /// QR decomposition via Householder reflections. See
    /// [`QrDecomposition`].
    pub fn qr(&self) -> QrDecomposition<T> {
        QrDecomposition::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    #[test]
    fn square_3x3_reconstructs() {
        let a = Matrix::from_rows(
            3,
            3,
            &[12.0, -51.0, 4.0, 6.0, 167.0, -68.0, -4.0, 24.0, -41.0],
        );
        let qr = a.qr();
        let q = qr.q();
        let r = qr.r();

        assert!((q.clone() * r.clone()).approx_eq(&a, 1e-9), "Q*R != A");
        assert!((q.transpose() * q).approx_eq(&Matrix::eye(3), 1e-9), "Q not orthonormal");

        for i in 0..3 {
            for j in 0..i {
                assert_near(r[(i, j)], 0.0, TOL, "R lower triangle");
            }
        }
    }

    #[test]
    fn rectangular_4x3_reconstructs() {
        let a = Matrix::from_rows(
            4,
            3,
            &[1.0, -1.0, 4.0, 1.0, 4.0, -2.0, 1.0, 4.0, 2.0, 1.0, -1.0, 0.0],
        );
        let qr = a.qr();
        let q = qr.q();
        let r = qr.r();
        assert_eq!(q.dims(), (4, 3));
        assert_eq!(r.dims(), (3, 3));
        assert!((q.clone() * r).approx_eq(&a, 1e-9));
        assert!((q.transpose() * q).approx_eq(&Matrix::eye(3), 1e-9));
    }

    #[test]
    fn solve_square_matches_lu() {
        let a = Matrix::from_rows(3, 3, &[2.0, 1.0, -1.0, -3.0, -1.0, 2.0, -2.0, 1.0, 2.0]);
        let b = Vector::from_slice(&[8.0, -11.0, -3.0]);
        let x_qr = a.qr().solve(&b);
        let x_lu = a.solve(&b, 1e-12).unwrap();
        for i in 0..3 {
            assert_near(x_qr[i], x_lu[i], TOL, "solution component");
        }
    }

    #[test]
    fn least_squares_residual_orthogonal() {
        let a = Matrix::from_rows(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let b = Vector::from_slice(&[1.0, 2.0, 4.0]);
        let x = a.qr().solve(&b);
        assert_near(x[0], 5.0 / 6.0, TOL, "c0");
        assert_near(x[1], 3.0 / 2.0, TOL, "c1");

        // residual orthogonal to the column space
        let resid = &b - &a.vecmul(&x);
        let atr = a.transpose().vecmul(&resid);
        assert_near(atr[0], 0.0, TOL, "A^T r (0)");
        assert_near(atr[1], 0.0, TOL, "A^T r (1)");
    }

    #[test]
    fn det_with_sign() {
        let a = Matrix::from_rows(3, 3, &[6.0, 1.0, 1.0, 4.0, -2.0, 5.0, 2.0, 8.0, 7.0]);
        assert_near(a.qr().det(), a.det(1e-12), 1e-8, "det");

        let b = Matrix::from_rows(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        assert_near(b.qr().det(), -1.0, TOL, "swap det");
    }

    #[test]
    fn identity_roundtrip() {
        let id = Matrix::<f64>::eye(3);
        let qr = id.qr();
        assert!((qr.q() * qr.r()).approx_eq(&id, TOL));
    }

    #[test]
    fn rank_deficient_still_factors() {
        // zero second column
        let a = Matrix::from_rows(3, 2, &[1.0, 0.0, 2.0, 0.0, 2.0, 0.0]);
        let qr = a.qr();
        assert!((qr.q() * qr.r()).approx_eq(&a, 1e-9));
    }

    #[test]
    fn tiny_column_still_reflects() {
        // column norm ~1.4e-10 sits above machine epsilon but below its
        // square root; the reflection must still run so the sub-diagonal
        // mass lands in R
        let a = Matrix::<f64>::from_rows(2, 2, &[1e-10, 1.0, 1e-10, 2.0]);
        let qr = a.qr();
        let q = qr.q();
        let r = qr.r();
        assert!((q.clone() * r.clone()).approx_eq(&a, 1e-12));
        assert!((q.transpose() * q).approx_eq(&Matrix::eye(2), 1e-12));
        assert!(r[(0, 0)].abs() > 1.3e-10, "R[0,0] = {}", r[(0, 0)]);
    }

    #[test]
    #[should_panic]
    fn wide_input_panics() {
        let a = Matrix::<f64>::zeros(2, 3);
        let _ = a.qr();
    }
}
