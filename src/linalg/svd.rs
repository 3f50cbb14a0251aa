//! Singular value decomposition, `A = U S Vᵀ`.
//!
//! Golub-Kahan bidiagonalization followed by the implicit-shift QR
//! iteration on the bidiagonal form (Jama/LINPACK lineage), with its
//! four-way deflation switch kept intact.

use super::LinalgError;
use crate::matrix::Matrix;
use crate::traits::FloatScalar;

/// QR sweeps allowed per column of the input before the iteration is
/// declared stuck.
pub(crate) const SVD_ITERS_PER_DIM: usize = 30;

#[inline]
fn lit<T: FloatScalar>(x: f64) -> T {
    T::from_f64(x).unwrap_or_else(T::nan)
}

/// Full decomposition of an m x n matrix with m >= n: returns
/// `(U, s, V)` with U m x n, s the n singular values, V n x n.
fn decompose<T: FloatScalar>(
    t: &Matrix<T>,
    max_iter: usize,
) -> Result<(Matrix<T>, Vec<T>, Matrix<T>), LinalgError> {
    let (m, n) = t.dims();
    assert!(
        m >= n,
        "SVD requires rows >= columns, got {}x{}",
        m,
        n
    );
    assert!(n > 0, "SVD requires a nonempty matrix");

    let nu = n;
    let mut a = t.clone();
    let mut s = vec![T::zero(); n];
    let mut e = vec![T::zero(); n];
    let mut work = vec![T::zero(); m];
    let mut u = Matrix::zeros(m, nu);
    let mut v = Matrix::zeros(n, n);

    // Reduce to bidiagonal form, diagonal in s, superdiagonal in e.
    let nct = n.min(m - 1);
    let nrt = n.saturating_sub(2);
    for k in 0..nct.max(nrt) {
        if k < nct {
            // Householder for the k-th column; 2-norm via hypot to
            // dodge under/overflow.
            s[k] = T::zero();
            for i in k..m {
                s[k] = s[k].hypot(a[(i, k)]);
            }
            if !s[k].is_zero() {
                if a[(k, k)] < T::zero() {
                    s[k] = -s[k];
                }
                for i in k..m {
                    a[(i, k)] = a[(i, k)] / s[k];
                }
                a[(k, k)] = a[(k, k)] + T::one();
            }
            s[k] = -s[k];
        }
        for j in (k + 1)..n {
            if k < nct && !s[k].is_zero() {
                let mut f = T::zero();
                for i in k..m {
                    f = f + a[(i, k)] * a[(i, j)];
                }
                f = -f / a[(k, k)];
                for i in k..m {
                    let add = f * a[(i, k)];
                    a[(i, j)] = a[(i, j)] + add;
                }
            }
            // stash the row for the row transformation below
            e[j] = a[(k, j)];
        }
        if k < nct {
            for i in k..m {
                u[(i, k)] = a[(i, k)];
            }
        }
        if k < nrt {
            // Householder for the k-th row.
            e[k] = T::zero();
            for i in (k + 1)..n {
                e[k] = e[k].hypot(e[i]);
            }
            if !e[k].is_zero() {
                if e[k + 1] < T::zero() {
                    e[k] = -e[k];
                }
                for i in (k + 1)..n {
                    e[i] = e[i] / e[k];
                }
                e[k + 1] = e[k + 1] + T::one();
            }
            e[k] = -e[k];
            if k + 1 < m && !e[k].is_zero() {
                for i in (k + 1)..m {
                    work[i] = T::zero();
                }
                for j in (k + 1)..n {
                    for i in (k + 1)..m {
                        let add = e[j] * a[(i, j)];
                        work[i] = work[i] + add;
                    }
                }
                for j in (k + 1)..n {
                    let f = -e[j] / e[k + 1];
                    for i in (k + 1)..m {
                        let add = f * work[i];
                        a[(i, j)] = a[(i, j)] + add;
                    }
                }
            }
            for i in (k + 1)..n {
                v[(i, k)] = e[i];
            }
        }
    }

    // Final bidiagonal matrix of order p.
    let mut p = n.min(m + 1);
    if nct < n {
        s[nct] = a[(nct, nct)];
    }
    if nrt + 1 < p {
        e[nrt] = a[(nrt, p - 1)];
    }
    e[p - 1] = T::zero();

    // Generate U.
    for j in nct..nu {
        for i in 0..m {
            u[(i, j)] = T::zero();
        }
        u[(j, j)] = T::one();
    }
    for k in (0..nct).rev() {
        if !s[k].is_zero() {
            for j in (k + 1)..nu {
                let mut f = T::zero();
                for i in k..m {
                    f = f + u[(i, k)] * u[(i, j)];
                }
                f = -f / u[(k, k)];
                for i in k..m {
                    let add = f * u[(i, k)];
                    u[(i, j)] = u[(i, j)] + add;
                }
            }
            for i in k..m {
                u[(i, k)] = -u[(i, k)];
            }
            u[(k, k)] = T::one() + u[(k, k)];
            for i in 0..k.saturating_sub(1) {
                u[(i, k)] = T::zero();
            }
        } else {
            for i in 0..m {
                u[(i, k)] = T::zero();
            }
            u[(k, k)] = T::one();
        }
    }

    // Generate V.
    for k in (0..n).rev() {
        if k < nrt && !e[k].is_zero() {
            for j in (k + 1)..nu {
                let mut f = T::zero();
                for i in (k + 1)..n {
                    f = f + v[(i, k)] * v[(i, j)];
                }
                f = -f / v[(k + 1, k)];
                for i in (k + 1)..n {
                    let add = f * v[(i, k)];
                    v[(i, j)] = v[(i, j)] + add;
                }
            }
        }
        for i in 0..n {
            v[(i, k)] = T::zero();
        }
        v[(k, k)] = T::one();
    }

    // Main iteration on the bidiagonal form.
    let pp = p - 1;
    let eps = T::epsilon();
    let tiny = lit::<T>(2.0f64.powi(-966));
    let two = T::one() + T::one();
    let mut iter = 0usize;

    while p > 0 {
        // Locate negligible elements of s and e; sets kase and k:
        //   kase = 1  s(p) negligible and k < p
        //   kase = 2  s(k) negligible and k < p
        //   kase = 3  e(k-1) negligible, k < p, s(k..p) not (qr step)
        //   kase = 4  e(p-1) negligible (this value has converged)
        let mut k: isize = p as isize - 2;
        while k >= 0 {
            let ku = k as usize;
            if e[ku].abs() <= tiny + eps * (s[ku].abs() + s[ku + 1].abs()) {
                e[ku] = T::zero();
                break;
            }
            k -= 1;
        }
        let kase;
        if k == p as isize - 2 {
            kase = 4;
        } else {
            let mut ks: isize = p as isize - 1;
            while ks > k {
                let ku = ks as usize;
                let mut f = T::zero();
                if ks != p as isize {
                    f = f + e[ku].abs();
                }
                if ks != k + 1 {
                    f = f + e[ku - 1].abs();
                }
                if s[ku].abs() <= tiny + eps * f {
                    s[ku] = T::zero();
                    break;
                }
                ks -= 1;
            }
            if ks == k {
                kase = 3;
            } else if ks == p as isize - 1 {
                kase = 1;
            } else {
                kase = 2;
                k = ks;
            }
        }
        let k = (k + 1) as usize;

        match kase {
            // Deflate negligible s(p).
            1 => {
                let mut f = e[p - 2];
                e[p - 2] = T::zero();
                for j in (k..=(p - 2)).rev() {
                    let t = s[j].hypot(f);
                    let cs = s[j] / t;
                    let sn = f / t;
                    s[j] = t;
                    if j != k {
                        f = -sn * e[j - 1];
                        e[j - 1] = cs * e[j - 1];
                    }
                    for i in 0..n {
                        let t = cs * v[(i, j)] + sn * v[(i, p - 1)];
                        v[(i, p - 1)] = -sn * v[(i, j)] + cs * v[(i, p - 1)];
                        v[(i, j)] = t;
                    }
                }
            }

            // Split at negligible s(k).
            2 => {
                let mut f = e[k - 1];
                e[k - 1] = T::zero();
                for j in k..p {
                    let t = s[j].hypot(f);
                    let cs = s[j] / t;
                    let sn = f / t;
                    s[j] = t;
                    f = -sn * e[j];
                    e[j] = cs * e[j];
                    for i in 0..m {
                        let t = cs * u[(i, j)] + sn * u[(i, k - 1)];
                        u[(i, k - 1)] = -sn * u[(i, j)] + cs * u[(i, k - 1)];
                        u[(i, j)] = t;
                    }
                }
            }

            // One implicit-shift QR step.
            3 => {
                let scale = s[p - 1]
                    .abs()
                    .max(s[p - 2].abs())
                    .max(e[p - 2].abs())
                    .max(s[k].abs())
                    .max(e[k].abs());
                let sp = s[p - 1] / scale;
                let spm1 = s[p - 2] / scale;
                let epm1 = e[p - 2] / scale;
                let sk = s[k] / scale;
                let ek = e[k] / scale;
                // Wilkinson shift from the trailing 2x2 of BᵀB
                let b = ((spm1 + sp) * (spm1 - sp) + epm1 * epm1) / two;
                let c = (sp * epm1) * (sp * epm1);
                let mut shift = T::zero();
                if !b.is_zero() || !c.is_zero() {
                    shift = (b * b + c).sqrt();
                    if b < T::zero() {
                        shift = -shift;
                    }
                    shift = c / (b + shift);
                }
                let mut f = (sk + sp) * (sk - sp) + shift;
                let mut g = sk * ek;

                // Chase the bulge down the bidiagonal.
                for j in k..(p - 1) {
                    let mut t = f.hypot(g);
                    let mut cs = f / t;
                    let mut sn = g / t;
                    if j != k {
                        e[j - 1] = t;
                    }
                    f = cs * s[j] + sn * e[j];
                    e[j] = cs * e[j] - sn * s[j];
                    g = sn * s[j + 1];
                    s[j + 1] = cs * s[j + 1];
                    for i in 0..n {
                        let t = cs * v[(i, j)] + sn * v[(i, j + 1)];
                        v[(i, j + 1)] = -sn * v[(i, j)] + cs * v[(i, j + 1)];
                        v[(i, j)] = t;
                    }
                    t = f.hypot(g);
                    cs = f / t;
                    sn = g / t;
                    s[j] = t;
                    f = cs * e[j] + sn * s[j + 1];
                    s[j + 1] = -sn * e[j] + cs * s[j + 1];
                    g = sn * e[j + 1];
                    e[j + 1] = cs * e[j + 1];
                    if j < m - 1 {
                        for i in 0..m {
                            let t = cs * u[(i, j)] + sn * u[(i, j + 1)];
                            u[(i, j + 1)] = -sn * u[(i, j)] + cs * u[(i, j + 1)];
                            u[(i, j)] = t;
                        }
                    }
                }
                e[p - 2] = f;
                iter += 1;
                if iter > max_iter {
                    return Err(LinalgError::ConvergenceFailure);
                }
            }

            // Convergence of s(k).
            _ => {
                // Flip a negative singular value into V.
                if s[k] <= T::zero() {
                    s[k] = if s[k] < T::zero() { -s[k] } else { T::zero() };
                    for i in 0..=pp {
                        v[(i, k)] = -v[(i, k)];
                    }
                }

                // Bubble into descending order, carrying U and V.
                let mut k = k;
                while k < pp {
                    if s[k] >= s[k + 1] {
                        break;
                    }
                    s.swap(k, k + 1);
                    if k < n - 1 {
                        for i in 0..n {
                            let t = v[(i, k + 1)];
                            v[(i, k + 1)] = v[(i, k)];
                            v[(i, k)] = t;
                        }
                    }
                    if k < m - 1 {
                        for i in 0..m {
                            let t = u[(i, k + 1)];
                            u[(i, k + 1)] = u[(i, k)];
                            u[(i, k)] = t;
                        }
                    }
                    k += 1;
                }
                p -= 1;
            }
        }
    }

    Ok((u, s, v))
}

/// Singular value decomposition `A = U S Vᵀ` of an m x n matrix with
/// m >= n. Singular values are nonnegative and descending.
///
/// # Example
///
/// ```
/// use faktor::Matrix;
///
/// let a = Matrix::<f64>::from_rows(3, 3, &[
///     8.0, -6.0, 2.0,
///     -6.0, 7.0, -4.0,
///     2.0, -4.0, 3.0,
/// ]);
/// let svd = a.svd().unwrap();
/// let s = svd.singular_values();
/// assert!((s[0] - 15.0).abs() < 1e-9);
/// assert!((s[1] - 3.0).abs() < 1e-9);
/// assert!(s[2].abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct SvdDecomposition<T> {
    u: Matrix<T>,
    s: Vec<T>,
    v: Matrix<T>,
}

impl<T: FloatScalar> SvdDecomposition<T> {
    /// Decompose `a`. Panics if `a` has fewer rows than columns; fails
    /// with [`LinalgError::ConvergenceFailure`] if the QR iteration
    /// exceeds its sweep budget.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        let (u, s, v) = decompose(a, SVD_ITERS_PER_DIM * a.ncols())?;
        Ok(Self { u, s, v })
    }

    /// The m x n left singular vectors.
    pub fn u(&self) -> &Matrix<T> {
        &self.u
    }

    /// The n x n right singular vectors.
    pub fn v(&self) -> &Matrix<T> {
        &self.v
    }

    /// Singular values, descending.
    pub fn singular_values(&self) -> &[T] {
        &self.s
    }

    /// The n x n diagonal matrix S.
    pub fn s_matrix(&self) -> Matrix<T> {
        let n = self.s.len();
        let mut s = Matrix::zeros(n, n);
        for i in 0..n {
            s[(i, i)] = self.s[i];
        }
        s
    }

    /// Number of singular values above `tol`.
    pub fn rank(&self, tol: T) -> usize {
        self.s.iter().filter(|&&x| x > tol).count()
    }

    /// Largest singular value (the spectral norm of A).
    pub fn norm2(&self) -> T {
        self.s[0]
    }

    /// Ratio of largest to smallest singular value.
    pub fn condition_number(&self) -> T {
        self.s[0] / self.s[self.s.len() - 1]
    }
}

// ── Matrix convenience methods ──────────────────────────────────────

impl<T: FloatScalar> Matrix<T> {
    /// Singular value decomposition. See [`SvdDecomposition`].
    pub fn svd(&self) -> Result<SvdDecomposition<T>, LinalgError> {
        SvdDecomposition::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn check_decomposition(a: &Matrix<f64>, svd: &SvdDecomposition<f64>) {
        let (m, n) = a.dims();
        let rebuilt = svd.u() * &(&svd.s_matrix() * &svd.v().transpose());
        assert!(rebuilt.approx_eq(a, 1e-8), "U S Vᵀ != A for {}x{}", m, n);
        assert!((svd.u().transpose() * svd.u()).approx_eq(&Matrix::eye(n), 1e-8));
        assert!((svd.v().transpose() * svd.v()).approx_eq(&Matrix::eye(n), 1e-8));
    }

    #[test]
    fn known_singular_values() {
        let a = Matrix::<f64>::from_rows(3, 3, &[8.0, -6.0, 2.0, -6.0, 7.0, -4.0, 2.0, -4.0, 3.0]);
        let svd = a.svd().unwrap();
        let s = svd.singular_values();
        assert!((s[0] - 15.0).abs() < TOL);
        assert!((s[1] - 3.0).abs() < TOL);
        assert!(s[2].abs() < TOL);
        check_decomposition(&a, &svd);
    }

    #[test]
    fn rectangular_reconstruction() {
        let a = Matrix::from_rows(
            4,
            3,
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0, -1.0, 0.5, 2.0],
        );
        let svd = a.svd().unwrap();
        check_decomposition(&a, &svd);
    }

    #[test]
    fn values_descending_and_nonnegative() {
        let a = Matrix::from_fn(5, 4, |i, j| ((2 * i + 3 * j) % 7) as f64 - 3.0);
        let svd = a.svd().unwrap();
        let s = svd.singular_values();
        for i in 0..s.len() {
            assert!(s[i] >= 0.0);
            if i + 1 < s.len() {
                assert!(s[i] >= s[i + 1]);
            }
        }
        check_decomposition(&a, &svd);
    }

    #[test]
    fn rank_from_singular_values() {
        // rank 2: third row is the sum of the first two
        let a = Matrix::from_rows(3, 3, &[1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 2.0]);
        let svd = a.svd().unwrap();
        assert_eq!(svd.rank(1e-9), 2);
    }

    #[test]
    fn norm_and_condition_number() {
        let a = Matrix::<f64>::from_rows(2, 2, &[3.0, 0.0, 0.0, 0.5]);
        let svd = a.svd().unwrap();
        assert!((svd.norm2() - 3.0).abs() < TOL);
        assert!((svd.condition_number() - 6.0).abs() < TOL);
    }

    #[test]
    fn identity() {
        let svd = Matrix::<f64>::eye(4).svd().unwrap();
        for &s in svd.singular_values() {
            assert!((s - 1.0).abs() < TOL);
        }
    }

    #[test]
    fn tall_column() {
        let a = Matrix::<f64>::from_rows(3, 1, &[3.0, 0.0, 4.0]);
        let svd = a.svd().unwrap();
        assert!((svd.singular_values()[0] - 5.0).abs() < TOL);
        check_decomposition(&a, &svd);
    }

    #[test]
    fn exhausted_sweep_budget_is_reported() {
        // dense bidiagonal with no negligible entries, so the first
        // pass must take a QR step
        let a = Matrix::from_rows(3, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0]);
        assert_eq!(
            decompose(&a, 0).unwrap_err(),
            LinalgError::ConvergenceFailure
        );
    }

    #[test]
    #[should_panic(expected = "rows >= columns")]
    fn wide_matrix_panics() {
        let a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let _ = a.svd();
    }
}
