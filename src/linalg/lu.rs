//! LU decomposition with row partial pivoting.

use super::LinalgError;
use crate::matrix::vector::Vector;
use crate::matrix::{float_eq, Matrix};
use crate::traits::FloatScalar;

/// In-place LU factorization with partial pivoting (Doolittle form).
///
/// On success `a` holds both factors: the strictly-lower part is L
/// (unit diagonal implied) and the upper triangle including the
/// diagonal is U.
///
/// `perm` must have length `n + 1`. On return `perm[0..n]` is the row
/// permutation (`PA = LU` reads row `perm[i]` of the original) and
/// `perm[n]` is `n` plus the number of row swaps, so the parity of
/// `perm[n] - n` gives the determinant sign.
///
/// The pivot-magnitude maximum carries across columns: a row swap fires
/// only when a candidate strictly exceeds the largest magnitude seen in
/// any earlier column, so exact ties (up to rounding) with an earlier
/// pivot keep the current row order. If the pivot that lands on the
/// diagonal has magnitude below `tol` the matrix is reported singular
/// and the contents of `a` are unspecified.
pub(crate) fn lu_in_place<T: FloatScalar>(
    a: &mut Matrix<T>,
    perm: &mut [usize],
    tol: T,
) -> Result<(), LinalgError> {
    let n = a.nrows();
    assert!(a.is_square(), "LU requires a square matrix, got {}x{}", a.nrows(), a.ncols());
    assert_eq!(perm.len(), n + 1, "permutation buffer must have length n + 1");

    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }

    let mut max_a = T::zero();
    for i in 0..n {
        let mut imax = i;
        for k in i..n {
            let abs = a[(k, i)].abs();
            if abs > max_a {
                max_a = abs;
                imax = k;
            }
        }

        if imax != i {
            perm.swap(i, imax);
            a.swap_rows(i, imax);
            perm[n] += 1;
        }

        if a[(i, i)].abs() < tol {
            return Err(LinalgError::Singular);
        }

        for j in (i + 1)..n {
            let f = a[(j, i)] / a[(i, i)];
            a[(j, i)] = f;
            for k in (i + 1)..n {
                let sub = f * a[(i, k)];
                a[(j, k)] = a[(j, k)] - sub;
            }
        }
    }
    Ok(())
}

/// LU decomposition of a square matrix, with permutation bookkeeping.
///
/// # Examples
///
/// ```
/// use faktor::{Matrix, Vector};
///
/// let a = Matrix::<f64>::from_rows(2, 2, &[4.0, 3.0, 6.0, 3.0]);
/// let lu = a.lu(1e-12).unwrap();
/// let x = lu.solve(&Vector::from_slice(&[10.0, 12.0]));
/// assert!((a.vecmul(&x)[0] - 10.0).abs() < 1e-10);
/// assert!((lu.det() + 6.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct LuDecomposition<T> {
    lu: Matrix<T>,
    perm: Vec<usize>,
}

impl<T: FloatScalar> LuDecomposition<T> {
    /// Factor `a`, reporting [`LinalgError::Singular`] when the pivot
    /// landing on some diagonal position falls below `tol`.
    pub fn new(a: &Matrix<T>, tol: T) -> Result<Self, LinalgError> {
        let n = a.nrows();
        let mut lu = a.clone();
        let mut perm = vec![0usize; n + 1];
        lu_in_place(&mut lu, &mut perm, tol)?;
        Ok(Self { lu, perm })
    }

    /// Dimension of the factored matrix.
    #[inline]
    pub fn n(&self) -> usize {
        self.lu.nrows()
    }

    /// Row permutation, length `n + 1`; the last slot is `n` plus the
    /// swap count.
    #[inline]
    pub fn permutation(&self) -> &[usize] {
        &self.perm
    }

    /// Unit-lower-triangular factor L.
    pub fn l(&self) -> Matrix<T> {
        let n = self.n();
        Matrix::from_fn(n, n, |i, j| {
            if i == j {
                T::one()
            } else if i > j {
                self.lu[(i, j)]
            } else {
                T::zero()
            }
        })
    }

    /// Upper-triangular factor U.
    pub fn u(&self) -> Matrix<T> {
        let n = self.n();
        Matrix::from_fn(n, n, |i, j| if i <= j { self.lu[(i, j)] } else { T::zero() })
    }

    /// Solve `A x = b` by permuted forward then back substitution.
    pub fn solve(&self, b: &Vector<T>) -> Vector<T> {
        let n = self.n();
        assert_eq!(b.len(), n, "rhs length {} does not match dimension {}", b.len(), n);
        let mut x = Vector::zeros(n);
        for i in 0..n {
            x[i] = b[self.perm[i]];
            for k in 0..i {
                let sub = self.lu[(i, k)] * x[k];
                x[i] = x[i] - sub;
            }
        }
        for i in (0..n).rev() {
            for k in (i + 1)..n {
                let sub = self.lu[(i, k)] * x[k];
                x[i] = x[i] - sub;
            }
            x[i] = x[i] / self.lu[(i, i)];
        }
        x
    }

    /// Inverse by substitution against each identity column.
    pub fn inverse(&self) -> Matrix<T> {
        let n = self.n();
        let mut inv = Matrix::zeros(n, n);
        for j in 0..n {
            for i in 0..n {
                inv[(i, j)] = if self.perm[i] == j { T::one() } else { T::zero() };
                for k in 0..i {
                    let sub = self.lu[(i, k)] * inv[(k, j)];
                    inv[(i, j)] = inv[(i, j)] - sub;
                }
            }
            for i in (0..n).rev() {
                for k in (i + 1)..n {
                    let sub = self.lu[(i, k)] * inv[(k, j)];
                    inv[(i, j)] = inv[(i, j)] - sub;
                }
                inv[(i, j)] = inv[(i, j)] / self.lu[(i, i)];
            }
        }
        inv
    }

    /// Determinant: product of the U diagonal, sign from the row-swap
    /// parity.
    pub fn det(&self) -> T {
        let n = self.n();
        let mut det = T::one();
        for i in 0..n {
            det = det * self.lu[(i, i)];
        }
        if (self.perm[n] - n) % 2 == 0 {
            det
        } else {
            -det
        }
    }

    /// Number of U diagonal entries not tolerance-equal to zero.
    ///
    /// Once a factorization exists every pivot cleared the construction
    /// tolerance, so this only drops below `n` for a larger `tol`.
    pub fn rank(&self, tol: T) -> usize {
        (0..self.n())
            .filter(|&i| !float_eq(self.lu[(i, i)], T::zero(), tol))
            .count()
    }
}

// ── Matrix convenience methods ──────────────────────────────────────

impl<T: FloatScalar> Matrix<T> {
    /// LU factorization with partial pivoting. See [`LuDecomposition`].
    pub fn lu(&self, tol: T) -> Result<LuDecomposition<T>, LinalgError> {
        LuDecomposition::new(self, tol)
    }

    /// Solve `A x = b` via LU.
    pub fn solve(&self, b: &Vector<T>, tol: T) -> Result<Vector<T>, LinalgError> {
        Ok(self.lu(tol)?.solve(b))
    }

    /// Matrix inverse via LU.
    pub fn inverse(&self, tol: T) -> Result<Matrix<T>, LinalgError> {
        Ok(self.lu(tol)?.inverse())
    }

    /// Determinant via LU. A pivot below `tol` means the determinant is
    /// indistinguishable from zero at that tolerance, so this returns
    /// exactly zero instead of failing.
    pub fn det(&self, tol: T) -> T {
        match self.lu(tol) {
            Ok(lu) => lu.det(),
            Err(_) => T::zero(),
        }
    }
}
