//! Eigendecomposition of general square matrices.
//!
//! Hessenberg reduction followed by the double-shift implicit QR
//! iteration to real Schur form (Algol hqr2 lineage), then eigenvector
//! back substitution and back transformation.

use super::hessenberg::hessenberg;
use super::symmetric_eigen::{tridiagonal_ql, tridiagonalize, MAX_QL_SWEEPS};
use super::LinalgError;
use crate::matrix::Matrix;
use crate::traits::FloatScalar;

/// QR steps allowed per matrix dimension before reporting
/// non-convergence.
pub(crate) const QR_ITERS_PER_DIM: usize = 30;

#[inline]
fn lit<T: FloatScalar>(x: f64) -> T {
    T::from_f64(x).unwrap_or_else(T::nan)
}

/// Complex division `(xr + i·xi) / (yr + i·yi)` with the
/// magnitude-ordered branch to avoid overflow.
fn cdiv<T: FloatScalar>(xr: T, xi: T, yr: T, yi: T) -> (T, T) {
    if yr.abs() > yi.abs() {
        let r = yi / yr;
        let d = yr + r * yi;
        ((xr + r * xi) / d, (xi - r * xr) / d)
    } else {
        let r = yr / yi;
        let d = yi + r * yr;
        ((r * xr + xi) / d, (r * xi - xr) / d)
    }
}

/// Double-shift implicit QR reduction of an upper Hessenberg matrix to
/// real Schur form, with eigenvector recovery.
///
/// `h` holds the Hessenberg matrix and `v` the orthogonal transform
/// accumulated by [`hessenberg`]; on success the columns of `v` are the
/// eigenvectors of the original matrix and `d`/`e` the real and
/// imaginary parts of its eigenvalues. A real eigenvalue has
/// `e[i] = 0`; a complex conjugate pair occupies consecutive slots
/// with `e[i] = +mu`, `e[i+1] = -mu`. No eigenvalue ordering is
/// guaranteed.
///
/// Faithful to the classical routine: accumulated exceptional shift,
/// Wilkinson's ad-hoc shift after 10 stalled steps and the MATLAB
/// variant after 30, the two-consecutive-small-subdiagonal deflation
/// test, and overflow-controlled back substitution. The total QR step
/// budget is `max_iter`; exceeding it reports
/// [`LinalgError::ConvergenceFailure`].
#[allow(clippy::needless_range_loop)]
pub(crate) fn hqr2<T: FloatScalar>(
    v: &mut Matrix<T>,
    h: &mut Matrix<T>,
    d: &mut [T],
    e: &mut [T],
    max_iter: usize,
) -> Result<(), LinalgError> {
    let nn = h.nrows();
    if nn == 0 {
        return Ok(());
    }
    let low: usize = 0;
    let high: usize = nn - 1;
    let eps = T::epsilon();
    let two = T::one() + T::one();

    let mut exshift = T::zero();
    let mut p = T::zero();
    let mut q = T::zero();
    let mut r = T::zero();
    let mut s = T::zero();
    let mut z = T::zero();
    let mut t;
    let mut w = T::zero();
    let mut x = T::zero();
    let mut y;

    // Matrix norm used in the negligibility tests.
    let mut norm = T::zero();
    for i in 0..nn {
        for j in i.saturating_sub(1)..nn {
            norm = norm + h[(i, j)].abs();
        }
    }

    // Outer loop over eigenvalue index.
    let mut iter = 0usize;
    let mut total_iter = 0usize;
    let mut n_i: isize = high as isize;
    while n_i >= low as isize {
        let n = n_i as usize;

        // Look for a single small sub-diagonal element.
        let mut l = n;
        while l > low {
            s = h[(l - 1, l - 1)].abs() + h[(l, l)].abs();
            if s.is_zero() {
                s = norm;
            }
            if h[(l, l - 1)].abs() < eps * s {
                break;
            }
            l -= 1;
        }

        if l == n {
            // One root found.
            h[(n, n)] = h[(n, n)] + exshift;
            d[n] = h[(n, n)];
            e[n] = T::zero();
            n_i -= 1;
            iter = 0;
        } else if l == n - 1 {
            // Two roots found.
            w = h[(n, n - 1)] * h[(n - 1, n)];
            p = (h[(n - 1, n - 1)] - h[(n, n)]) / two;
            q = p * p + w;
            z = q.abs().sqrt();
            h[(n, n)] = h[(n, n)] + exshift;
            h[(n - 1, n - 1)] = h[(n - 1, n - 1)] + exshift;
            x = h[(n, n)];

            if q >= T::zero() {
                // Real pair.
                z = if p >= T::zero() { p + z } else { p - z };
                d[n - 1] = x + z;
                d[n] = d[n - 1];
                if !z.is_zero() {
                    d[n] = x - w / z;
                }
                e[n - 1] = T::zero();
                e[n] = T::zero();
                x = h[(n, n - 1)];
                s = x.abs() + z.abs();
                p = x / s;
                q = z / s;
                r = (p * p + q * q).sqrt();
                p = p / r;
                q = q / r;

                // Row modification.
                for j in (n - 1)..nn {
                    z = h[(n - 1, j)];
                    h[(n - 1, j)] = q * z + p * h[(n, j)];
                    h[(n, j)] = q * h[(n, j)] - p * z;
                }
                // Column modification.
                for i in 0..=n {
                    z = h[(i, n - 1)];
                    h[(i, n - 1)] = q * z + p * h[(i, n)];
                    h[(i, n)] = q * h[(i, n)] - p * z;
                }
                // Accumulate transformations.
                for i in low..=high {
                    z = v[(i, n - 1)];
                    v[(i, n - 1)] = q * z + p * v[(i, n)];
                    v[(i, n)] = q * v[(i, n)] - p * z;
                }
            } else {
                // Complex pair.
                d[n - 1] = x + p;
                d[n] = x + p;
                e[n - 1] = z;
                e[n] = -z;
            }
            n_i -= 2;
            iter = 0;
        } else {
            // No convergence yet: form shift.
            x = h[(n, n)];
            y = T::zero();
            w = T::zero();
            if l < n {
                y = h[(n - 1, n - 1)];
                w = h[(n, n - 1)] * h[(n - 1, n)];
            }

            // Wilkinson's original ad hoc shift.
            if iter == 10 {
                exshift = exshift + x;
                for i in low..=n {
                    h[(i, i)] = h[(i, i)] - x;
                }
                s = h[(n, n - 1)].abs() + h[(n - 1, n - 2)].abs();
                y = lit::<T>(0.75) * s;
                x = y;
                w = lit::<T>(-0.4375) * s * s;
            }

            // MATLAB's new ad hoc shift.
            if iter == 30 {
                s = (y - x) / two;
                s = s * s + w;
                if s > T::zero() {
                    s = s.sqrt();
                    if y < x {
                        s = -s;
                    }
                    s = x - w / ((y - x) / two + s);
                    for i in low..=n {
                        h[(i, i)] = h[(i, i)] - s;
                    }
                    exshift = exshift + s;
                    w = lit::<T>(0.964);
                    y = w;
                    x = y;
                }
            }

            iter += 1;
            total_iter += 1;
            if total_iter > max_iter {
                return Err(LinalgError::ConvergenceFailure);
            }

            // Look for two consecutive small sub-diagonal elements.
            let mut m = n - 2;
            loop {
                z = h[(m, m)];
                r = x - z;
                s = y - z;
                p = (r * s - w) / h[(m + 1, m)] + h[(m, m + 1)];
                q = h[(m + 1, m + 1)] - z - r - s;
                r = h[(m + 2, m + 1)];
                s = p.abs() + q.abs() + r.abs();
                p = p / s;
                q = q / s;
                r = r / s;
                if m == l {
                    break;
                }
                if h[(m, m - 1)].abs() * (q.abs() + r.abs())
                    < eps * (p.abs() * (h[(m - 1, m - 1)].abs() + z.abs() + h[(m + 1, m + 1)].abs()))
                {
                    break;
                }
                m -= 1;
            }

            for i in (m + 2)..=n {
                h[(i, i - 2)] = T::zero();
                if i > m + 2 {
                    h[(i, i - 3)] = T::zero();
                }
            }

            // Double QR step on rows l..=n, columns m..=n.
            for k in m..n {
                let notlast = k != n - 1;
                if k != m {
                    p = h[(k, k - 1)];
                    q = h[(k + 1, k - 1)];
                    r = if notlast { h[(k + 2, k - 1)] } else { T::zero() };
                    x = p.abs() + q.abs() + r.abs();
                    if !x.is_zero() {
                        p = p / x;
                        q = q / x;
                        r = r / x;
                    }
                }
                if x.is_zero() {
                    break;
                }
                s = (p * p + q * q + r * r).sqrt();
                if p < T::zero() {
                    s = -s;
                }
                if !s.is_zero() {
                    if k != m {
                        h[(k, k - 1)] = -s * x;
                    } else if l != m {
                        h[(k, k - 1)] = -h[(k, k - 1)];
                    }
                    p = p + s;
                    x = p / s;
                    y = q / s;
                    z = r / s;
                    q = q / p;
                    r = r / p;

                    // Row modification.
                    for j in k..nn {
                        p = h[(k, j)] + q * h[(k + 1, j)];
                        if notlast {
                            p = p + r * h[(k + 2, j)];
                            h[(k + 2, j)] = h[(k + 2, j)] - p * z;
                        }
                        h[(k, j)] = h[(k, j)] - p * x;
                        h[(k + 1, j)] = h[(k + 1, j)] - p * y;
                    }
                    // Column modification.
                    for i in 0..=n.min(k + 3) {
                        p = x * h[(i, k)] + y * h[(i, k + 1)];
                        if notlast {
                            p = p + z * h[(i, k + 2)];
                            h[(i, k + 2)] = h[(i, k + 2)] - p * r;
                        }
                        h[(i, k)] = h[(i, k)] - p;
                        h[(i, k + 1)] = h[(i, k + 1)] - p * q;
                    }
                    // Accumulate transformations.
                    for i in low..=high {
                        p = x * v[(i, k)] + y * v[(i, k + 1)];
                        if notlast {
                            p = p + z * v[(i, k + 2)];
                            v[(i, k + 2)] = v[(i, k + 2)] - p * r;
                        }
                        v[(i, k)] = v[(i, k)] - p;
                        v[(i, k + 1)] = v[(i, k + 1)] - p * q;
                    }
                }
            }
        }
    }

    // Backsubstitute to find vectors of upper triangular form.
    if norm.is_zero() {
        return Ok(());
    }

    for n in (0..nn).rev() {
        p = d[n];
        q = e[n];

        if q.is_zero() {
            // Real vector.
            let mut l = n;
            h[(n, n)] = T::one();
            for i in (0..n).rev() {
                w = h[(i, i)] - p;
                r = T::zero();
                for j in l..=n {
                    r = r + h[(i, j)] * h[(j, n)];
                }
                if e[i] < T::zero() {
                    z = w;
                    s = r;
                } else {
                    l = i;
                    if e[i].is_zero() {
                        h[(i, n)] = if !w.is_zero() { -r / w } else { -r / (eps * norm) };
                    } else {
                        // Solve the 2x2 real block.
                        x = h[(i, i + 1)];
                        y = h[(i + 1, i)];
                        q = (d[i] - p) * (d[i] - p) + e[i] * e[i];
                        t = (x * s - z * r) / q;
                        h[(i, n)] = t;
                        h[(i + 1, n)] = if x.abs() > z.abs() {
                            (-r - w * t) / x
                        } else {
                            (-s - y * t) / z
                        };
                    }

                    // Overflow control.
                    t = h[(i, n)].abs();
                    if (eps * t) * t > T::one() {
                        for j in i..=n {
                            h[(j, n)] = h[(j, n)] / t;
                        }
                    }
                }
            }
        } else if q < T::zero() {
            // Complex vector (second slot of the pair).
            let mut l = n - 1;

            // Last vector component imaginary, so matrix is triangular.
            if h[(n, n - 1)].abs() > h[(n - 1, n)].abs() {
                h[(n - 1, n - 1)] = q / h[(n, n - 1)];
                h[(n - 1, n)] = -(h[(n, n)] - p) / h[(n, n - 1)];
            } else {
                let (re, im) = cdiv(T::zero(), -h[(n - 1, n)], h[(n - 1, n - 1)] - p, q);
                h[(n - 1, n - 1)] = re;
                h[(n - 1, n)] = im;
            }
            h[(n, n - 1)] = T::zero();
            h[(n, n)] = T::one();
            for i in (0..n.saturating_sub(1)).rev() {
                let mut ra = T::zero();
                let mut sa = T::zero();
                for j in l..=n {
                    ra = ra + h[(i, j)] * h[(j, n - 1)];
                    sa = sa + h[(i, j)] * h[(j, n)];
                }
                w = h[(i, i)] - p;

                if e[i] < T::zero() {
                    z = w;
                    r = ra;
                    s = sa;
                } else {
                    l = i;
                    if e[i].is_zero() {
                        let (re, im) = cdiv(-ra, -sa, w, q);
                        h[(i, n - 1)] = re;
                        h[(i, n)] = im;
                    } else {
                        // Solve complex equations.
                        x = h[(i, i + 1)];
                        y = h[(i + 1, i)];
                        let mut vr = (d[i] - p) * (d[i] - p) + e[i] * e[i] - q * q;
                        let vi = (d[i] - p) * two * q;
                        if vr.is_zero() && vi.is_zero() {
                            vr = eps * norm * (w.abs() + q.abs() + x.abs() + y.abs() + z.abs());
                        }
                        let (re, im) =
                            cdiv(x * r - z * ra + q * sa, x * s - z * sa - q * ra, vr, vi);
                        h[(i, n - 1)] = re;
                        h[(i, n)] = im;
                        if x.abs() > z.abs() + q.abs() {
                            h[(i + 1, n - 1)] =
                                (-ra - w * h[(i, n - 1)] + q * h[(i, n)]) / x;
                            h[(i + 1, n)] = (-sa - w * h[(i, n)] - q * h[(i, n - 1)]) / x;
                        } else {
                            let (re, im) =
                                cdiv(-r - y * h[(i, n - 1)], -s - y * h[(i, n)], z, q);
                            h[(i + 1, n - 1)] = re;
                            h[(i + 1, n)] = im;
                        }
                    }

                    // Overflow control.
                    t = h[(i, n - 1)].abs().max(h[(i, n)].abs());
                    if (eps * t) * t > T::one() {
                        for j in i..=n {
                            h[(j, n - 1)] = h[(j, n - 1)] / t;
                            h[(j, n)] = h[(j, n)] / t;
                        }
                    }
                }
            }
        }
    }

    // Back transformation to get eigenvectors of the original matrix.
    for j in (low..nn).rev() {
        for i in low..=high {
            z = T::zero();
            for k in low..=j.min(high) {
                z = z + v[(i, k)] * h[(k, j)];
            }
            v[(i, j)] = z;
        }
    }

    Ok(())
}

/// Eigendecomposition of a general square matrix, `A V = V D`.
///
/// Symmetric input takes the tridiagonal QL path (real eigenvalues in
/// ascending order, orthonormal eigenvectors); anything else goes
/// through Hessenberg reduction and double-shift QR, which yields the
/// paired real/imaginary encoding of [`eigenvalues_im`] and no
/// ordering guarantee.
///
/// # Example
///
/// ```
/// use faktor::{EigenDecomposition, Matrix};
///
/// // a rotation by 90 degrees has eigenvalues ±i
/// let a = Matrix::<f64>::from_rows(2, 2, &[0.0, -1.0, 1.0, 0.0]);
/// let eig = EigenDecomposition::new(&a).unwrap();
/// assert!(eig.eigenvalues_re().iter().all(|&re| re.abs() < 1e-10));
/// assert!((eig.eigenvalues_im()[0] - 1.0).abs() < 1e-10);
/// assert!((eig.eigenvalues_im()[1] + 1.0).abs() < 1e-10);
/// ```
///
/// [`eigenvalues_im`]: Self::eigenvalues_im
#[derive(Debug, Clone)]
pub struct EigenDecomposition<T> {
    d: Vec<T>,
    e: Vec<T>,
    v: Matrix<T>,
}

impl<T: FloatScalar> EigenDecomposition<T> {
    /// Decompose a square matrix. Panics on non-square input; fails
    /// with [`LinalgError::ConvergenceFailure`] if an iteration budget
    /// is exhausted.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        assert!(
            a.is_square(),
            "eigendecomposition requires a square matrix, got {}x{}",
            a.nrows(),
            a.ncols()
        );
        let n = a.nrows();
        assert!(n > 0, "eigendecomposition of an empty matrix");

        let mut d = vec![T::zero(); n];
        let mut e = vec![T::zero(); n];
        let mut v = a.clone();
        let sym_eps = lit::<T>(crate::matrix::DEFAULT_EPS);
        if a.is_symmetric(sym_eps) {
            tridiagonalize(&mut v, &mut d, &mut e);
            tridiagonal_ql(&mut v, &mut d, &mut e, MAX_QL_SWEEPS)?;
        } else {
            let mut h = a.clone();
            let mut ort = vec![T::zero(); n];
            hessenberg(&mut v, &mut h, &mut ort);
            hqr2(&mut v, &mut h, &mut d, &mut e, QR_ITERS_PER_DIM * n)?;
        }
        Ok(Self { d, e, v })
    }

    /// Real parts of the eigenvalues.
    #[inline]
    pub fn eigenvalues_re(&self) -> &[T] {
        &self.d
    }

    /// Imaginary parts of the eigenvalues. Zero for a real eigenvalue;
    /// a conjugate pair occupies consecutive slots with `+mu` then
    /// `-mu`.
    #[inline]
    pub fn eigenvalues_im(&self) -> &[T] {
        &self.e
    }

    /// Eigenvector matrix. For a real eigenvalue the column is the
    /// eigenvector; for a conjugate pair the two columns hold the real
    /// and imaginary parts of the complex eigenvector.
    #[inline]
    pub fn eigenvectors(&self) -> &Matrix<T> {
        &self.v
    }

    /// Block-diagonal eigenvalue matrix D: real eigenvalues in 1x1
    /// blocks and conjugate pairs in 2x2 blocks `[l, m; -m, l]`, so
    /// that `A V = V D`.
    pub fn block_diagonal(&self) -> Matrix<T> {
        let n = self.d.len();
        let mut dm = Matrix::zeros(n, n);
        for i in 0..n {
            dm[(i, i)] = self.d[i];
            if self.e[i] > T::zero() {
                dm[(i, i + 1)] = self.e[i];
            } else if self.e[i] < T::zero() {
                dm[(i, i - 1)] = self.e[i];
            }
        }
        dm
    }
}

// ── Matrix convenience methods ──────────────────────────────────────

impl<T: FloatScalar> Matrix<T> {
    /// Eigendecomposition. See [`EigenDecomposition`].
    pub fn eigen(&self) -> Result<EigenDecomposition<T>, LinalgError> {
        EigenDecomposition::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-8;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    /// `A V == V D` with D the block-diagonal eigenvalue matrix.
    fn check_invariant(a: &Matrix<f64>, eig: &EigenDecomposition<f64>) {
        let av = a * eig.eigenvectors();
        let vd = eig.eigenvectors() * &eig.block_diagonal();
        assert!(av.approx_eq(&vd, TOL), "A*V != V*D\n{:?}\nvs\n{:?}", av, vd);
    }

    fn sorted_real_parts(eig: &EigenDecomposition<f64>) -> Vec<f64> {
        let mut v = eig.eigenvalues_re().to_vec();
        v.sort_by(|a, b| a.partial_cmp(b).unwrap());
        v
    }

    #[test]
    fn triangular_real_eigenvalues() {
        let a = Matrix::<f64>::from_rows(3, 3, &[3.0, 1.0, 2.0, 0.0, 2.0, -1.0, 0.0, 0.0, -5.0]);
        let eig = a.eigen().unwrap();
        assert!(eig.eigenvalues_im().iter().all(|&im| im.abs() < TOL));
        let vals = sorted_real_parts(&eig);
        assert_near(vals[0], -5.0, TOL, "lambda min");
        assert_near(vals[1], 2.0, TOL, "lambda mid");
        assert_near(vals[2], 3.0, TOL, "lambda max");
        check_invariant(&a, &eig);
    }

    #[test]
    fn rotation_has_conjugate_pair() {
        let a = Matrix::from_rows(2, 2, &[0.0, -1.0, 1.0, 0.0]);
        let eig = a.eigen().unwrap();
        let (d, e) = (eig.eigenvalues_re(), eig.eigenvalues_im());
        assert_near(d[0], 0.0, TOL, "re");
        assert_near(d[1], 0.0, TOL, "re");
        assert_near(e[0], 1.0, TOL, "+mu first");
        assert_near(e[1], -1.0, TOL, "-mu second");
        check_invariant(&a, &eig);
    }

    #[test]
    fn mixed_real_and_complex_spectrum() {
        // block diag of a 90-degree rotation and the scalar 2
        let a = Matrix::<f64>::from_rows(3, 3, &[0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 2.0]);
        let eig = a.eigen().unwrap();
        let mut reals = Vec::new();
        let mut pairs = 0;
        let mut i = 0;
        while i < 3 {
            if eig.eigenvalues_im()[i].abs() < TOL {
                reals.push(eig.eigenvalues_re()[i]);
                i += 1;
            } else {
                assert_near(eig.eigenvalues_im()[i], -eig.eigenvalues_im()[i + 1], TOL, "pair");
                pairs += 1;
                i += 2;
            }
        }
        assert_eq!(pairs, 1);
        assert_eq!(reals.len(), 1);
        assert_near(reals[0], 2.0, TOL, "real root");
        check_invariant(&a, &eig);
    }

    #[test]
    fn companion_matrix_spectrum() {
        // companion of (x-1)(x-2)(x-3)(x-4) = x^4 - 10x^3 + 35x^2 - 50x + 24
        let a = Matrix::<f64>::from_rows(
            4,
            4,
            &[
                10.0, -35.0, 50.0, -24.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
                0.0,
            ],
        );
        let eig = a.eigen().unwrap();
        assert!(eig.eigenvalues_im().iter().all(|&im| im.abs() < 1e-6));
        let vals = sorted_real_parts(&eig);
        for (got, want) in vals.iter().zip([1.0, 2.0, 3.0, 4.0]) {
            assert_near(*got, want, 1e-6, "companion root");
        }
        check_invariant(&a, &eig);
    }

    #[test]
    fn symmetric_input_takes_ql_path() {
        let a = Matrix::from_rows(3, 3, &[1.0, 3.0, 4.0, 3.0, 2.0, 7.0, 4.0, 7.0, 5.0]);
        let eig = a.eigen().unwrap();
        // ascending, all real
        assert!(eig.eigenvalues_im().iter().all(|&im| im == 0.0));
        assert_near(eig.eigenvalues_re()[0], -3.67018839, 1e-7, "lambda 0");
        assert_near(eig.eigenvalues_re()[1], -1.10871847, 1e-7, "lambda 1");
        assert_near(eig.eigenvalues_re()[2], 12.77890686, 1e-7, "lambda 2");
        check_invariant(&a, &eig);
    }

    #[test]
    fn real_eigenvector_columns_satisfy_definition() {
        let a = Matrix::from_rows(3, 3, &[2.0, 0.0, 1.0, 0.0, 3.0, 0.0, 0.0, 0.0, 5.0]);
        let eig = a.eigen().unwrap();
        for j in 0..3 {
            if eig.eigenvalues_im()[j] == 0.0 {
                let vcol = eig.eigenvectors().col(j);
                let av = a.vecmul(&vcol);
                let lv = &vcol * eig.eigenvalues_re()[j];
                assert!(av.approx_eq(&lv, 1e-7), "column {}", j);
            }
        }
    }

    #[test]
    fn defective_matrix_still_returns_eigenvalues() {
        // Jordan block: eigenvalue 2 twice, eigenvector space rank 1
        let a = Matrix::from_rows(2, 2, &[2.0, 1.0, 0.0, 2.0]);
        let eig = a.eigen().unwrap();
        let vals = sorted_real_parts(&eig);
        assert_near(vals[0], 2.0, TOL, "defective root");
        assert_near(vals[1], 2.0, TOL, "defective root");
    }

    #[test]
    fn larger_nonsymmetric_invariant() {
        let a = Matrix::from_fn(6, 6, |i, j| {
            (((i * 5 + j * 3) % 7) as f64) - 3.0 + if i == j { 4.0 } else { 0.0 }
        });
        let eig = a.eigen().unwrap();
        check_invariant(&a, &eig);
    }

    #[test]
    fn exhausted_step_budget_is_reported() {
        // full-subdiagonal Hessenberg form, no immediate deflation, so
        // the first pass must take a QR step
        let a = Matrix::from_rows(
            4,
            4,
            &[
                10.0, -35.0, 50.0, -24.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
                0.0,
            ],
        );
        let mut v = Matrix::zeros(4, 4);
        let mut h = a.clone();
        let mut ort = vec![0.0; 4];
        hessenberg(&mut v, &mut h, &mut ort);
        let mut d = vec![0.0; 4];
        let mut e = vec![0.0; 4];
        assert_eq!(
            hqr2(&mut v, &mut h, &mut d, &mut e, 0).unwrap_err(),
            LinalgError::ConvergenceFailure
        );
    }

    #[test]
    #[should_panic]
    fn non_square_panics() {
        let a = Matrix::<f64>::zeros(3, 2);
        let _ = a.eigen();
    }
}
