//! Runtime-sized, row-major dense matrix and vector types.

pub mod entry;
pub mod ops;
pub mod parallel;
pub mod vector;

use crate::traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
use core::ops::{Index, IndexMut};
use entry::Entry;
use vector::Vector;

/// Conventional comparison tolerance for [`float_eq`] and the
/// `approx_eq` helpers when nothing problem-specific is known.
pub const DEFAULT_EPS: f64 = 1e-6;

/// Tolerance-aware scalar equality.
///
/// Uses an absolute test near zero (either operand zero, or the pair
/// tiny compared to `eps`) and a relative test elsewhere, so the same
/// tolerance is meaningful for values of any magnitude.
///
/// ```
/// use faktor::float_eq;
///
/// assert!(float_eq(1.0e-9, 0.0, 1e-6));
/// assert!(float_eq(1000.0, 1000.0005, 1e-6));
/// assert!(!float_eq(1.0, 1.1, 1e-6));
/// ```
pub fn float_eq<T: FloatScalar>(x: T, y: T, eps: T) -> bool {
    if x == y {
        return true;
    }
    let diff = (x - y).abs();
    let sum = x.abs() + y.abs();
    if x.is_zero() || y.is_zero() || sum < eps {
        diff < eps
    } else {
        diff / sum < eps
    }
}

/// Dense matrix with row-major, contiguous storage.
///
/// Rows are contiguous in memory, so `row_as_slice` is free and the
/// parallel multiply can hand disjoint row ranges to worker threads.
///
/// # Examples
///
/// ```
/// use faktor::Matrix;
///
/// let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
/// assert_eq!(m[(0, 1)], 2.0);
/// assert_eq!(m[(1, 2)], 6.0);
/// assert_eq!(m.transpose()[(2, 1)], 6.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    pub(crate) data: Vec<T>,
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,
}

impl<T: Scalar> Matrix<T> {
    /// Create a matrix of zeros.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            data: vec![T::zero(); nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Create a matrix with every element set to `value`.
    pub fn fill(nrows: usize, ncols: usize, value: T) -> Self {
        Self {
            data: vec![value; nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Create an identity matrix.
    ///
    /// ```
    /// use faktor::Matrix;
    /// let i = Matrix::<f64>::eye(3);
    /// assert_eq!(i[(1, 1)], 1.0);
    /// assert_eq!(i[(1, 2)], 0.0);
    /// ```
    pub fn eye(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = T::one();
        }
        m
    }

    /// Create a matrix from a flat row-major slice.
    ///
    /// Panics if `data.len() != nrows * ncols`.
    pub fn from_rows(nrows: usize, ncols: usize, data: &[T]) -> Self {
        assert_eq!(
            data.len(),
            nrows * ncols,
            "data length {} does not match {}x{}",
            data.len(),
            nrows,
            ncols
        );
        Self {
            data: data.to_vec(),
            nrows,
            ncols,
        }
    }

    /// Create a matrix from an owned row-major `Vec`.
    pub fn from_vec(nrows: usize, ncols: usize, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            nrows * ncols,
            "data length {} does not match {}x{}",
            data.len(),
            nrows,
            ncols
        );
        Self { data, nrows, ncols }
    }

    /// Create a matrix from an ordered sequence of rows.
    ///
    /// Panics if the rows have unequal lengths.
    ///
    /// ```
    /// use faktor::Matrix;
    /// let m = Matrix::from_nested(&[&[1.0, 2.0][..], &[3.0, 4.0][..]]);
    /// assert_eq!(m[(1, 0)], 3.0);
    /// ```
    pub fn from_nested(rows: &[&[T]]) -> Self {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(nrows * ncols);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), ncols, "row {} has length {}, expected {}", i, row.len(), ncols);
            data.extend_from_slice(row);
        }
        Self { data, nrows, ncols }
    }

    /// Create a matrix by evaluating `f(row, col)` at every position.
    pub fn from_fn(nrows: usize, ncols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(f(i, j));
            }
        }
        Self { data, nrows, ncols }
    }

    /// Copy any [`MatrixRef`] implementor into an owned `Matrix`.
    pub fn from_ref(src: &impl MatrixRef<T>) -> Self {
        Self::from_fn(src.nrows(), src.ncols(), |i, j| *src.get(i, j))
    }

    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// `(nrows, ncols)` pair.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Whether the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Row-major element buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major element buffer.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Row `i` as a contiguous slice.
    #[inline]
    pub fn row_as_slice(&self, i: usize) -> &[T] {
        &self.data[i * self.ncols..(i + 1) * self.ncols]
    }

    /// Row `i` as a mutable contiguous slice.
    #[inline]
    pub fn row_as_mut_slice(&mut self, i: usize) -> &mut [T] {
        &mut self.data[i * self.ncols..(i + 1) * self.ncols]
    }

    /// Row `i` as an owned vector.
    pub fn row(&self, i: usize) -> Vector<T> {
        Vector::from_slice(self.row_as_slice(i))
    }

    /// Column `j` as an owned vector.
    pub fn col(&self, j: usize) -> Vector<T> {
        assert!(j < self.ncols, "column {} out of bounds for {} columns", j, self.ncols);
        Vector::from_vec((0..self.nrows).map(|i| self[(i, j)]).collect())
    }

    /// Swap rows `a` and `b` in place.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let n = self.ncols;
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.data.split_at_mut(hi * n);
        head[lo * n..(lo + 1) * n].swap_with_slice(&mut tail[..n]);
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.ncols, self.nrows, |i, j| self[(j, i)])
    }

    /// Sum of diagonal elements. Panics on non-square input.
    pub fn trace(&self) -> T {
        assert!(self.is_square(), "trace requires a square matrix, got {}x{}", self.nrows, self.ncols);
        let mut t = T::zero();
        for i in 0..self.nrows {
            t = t + self[(i, i)];
        }
        t
    }

    /// Copy of the `rows x cols` block with top-left corner `(row, col)`.
    pub fn submatrix(&self, row: usize, col: usize, rows: usize, cols: usize) -> Self {
        assert!(
            row + rows <= self.nrows && col + cols <= self.ncols,
            "submatrix {}x{} at ({}, {}) exceeds {}x{}",
            rows, cols, row, col, self.nrows, self.ncols
        );
        Self::from_fn(rows, cols, |i, j| self[(row + i, col + j)])
    }

    /// Write `block` into `self` with top-left corner `(row, col)`.
    pub fn set_submatrix(&mut self, row: usize, col: usize, block: &Self) {
        assert!(
            row + block.nrows <= self.nrows && col + block.ncols <= self.ncols,
            "submatrix {}x{} at ({}, {}) exceeds {}x{}",
            block.nrows, block.ncols, row, col, self.nrows, self.ncols
        );
        for i in 0..block.nrows {
            for j in 0..block.ncols {
                self[(row + i, col + j)] = block[(i, j)];
            }
        }
    }

    /// Per-row sums.
    pub fn row_sums(&self) -> Vector<T> {
        Vector::from_vec(
            (0..self.nrows)
                .map(|i| {
                    self.row_as_slice(i)
                        .iter()
                        .fold(T::zero(), |acc, &x| acc + x)
                })
                .collect(),
        )
    }

    /// Per-column sums.
    pub fn col_sums(&self) -> Vector<T> {
        let mut sums = vec![T::zero(); self.ncols];
        for i in 0..self.nrows {
            for (s, &x) in sums.iter_mut().zip(self.row_as_slice(i)) {
                *s = *s + x;
            }
        }
        Vector::from_vec(sums)
    }
}

impl<T: FloatScalar> Matrix<T> {
    /// Frobenius norm: square root of the sum of squared elements.
    pub fn frobenius_norm(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &x| acc + x * x)
            .sqrt()
    }

    /// Largest element, with its position.
    ///
    /// ```
    /// use faktor::Matrix;
    /// let m = Matrix::from_rows(2, 2, &[1.0, 9.0, 3.0, 4.0]);
    /// let e = m.max();
    /// assert_eq!((e.value, e.row, e.col), (9.0, 0, 1));
    /// ```
    pub fn max(&self) -> Entry<T> {
        self.extreme(|cand, best| cand > best)
    }

    /// Smallest element, with its position.
    pub fn min(&self) -> Entry<T> {
        self.extreme(|cand, best| cand < best)
    }

    fn extreme(&self, better: impl Fn(T, T) -> bool) -> Entry<T> {
        assert!(self.nrows > 0 && self.ncols > 0, "extreme of an empty matrix");
        let mut e = Entry {
            value: self[(0, 0)],
            row: 0,
            col: 0,
        };
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                if better(self[(i, j)], e.value) {
                    e = Entry {
                        value: self[(i, j)],
                        row: i,
                        col: j,
                    };
                }
            }
        }
        e
    }

    /// Per-column means.
    pub fn col_means(&self) -> Vector<T> {
        assert!(self.nrows > 0, "column means of an empty matrix");
        let n = T::from_usize(self.nrows).unwrap_or_else(T::one);
        let sums = self.col_sums();
        Vector::from_vec(sums.iter().map(|&s| s / n).collect())
    }

    /// Whether the matrix equals its transpose to within `eps`.
    pub fn is_symmetric(&self, eps: T) -> bool {
        if !self.is_square() {
            return false;
        }
        for i in 0..self.nrows {
            for j in (i + 1)..self.ncols {
                if !float_eq(self[(i, j)], self[(j, i)], eps) {
                    return false;
                }
            }
        }
        true
    }

    /// Element-wise tolerance comparison via [`float_eq`].
    pub fn approx_eq(&self, other: &Self, eps: T) -> bool {
        self.nrows == other.nrows
            && self.ncols == other.ncols
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&a, &b)| float_eq(a, b, eps))
    }

    /// Sample covariance of the columns, treating each row as one
    /// observation. Normalized by `nrows - 1`.
    pub fn covariance(&self) -> Self {
        self.cross_covariance(self)
    }

    /// Sample cross-covariance between the columns of `self` and the
    /// columns of `other`. Both must have the same number of rows
    /// (observations); the result is `self.ncols x other.ncols`.
    pub fn cross_covariance(&self, other: &Self) -> Self {
        assert_eq!(
            self.nrows, other.nrows,
            "cross-covariance needs matching observation counts, got {} and {}",
            self.nrows, other.nrows
        );
        assert!(self.nrows > 1, "covariance needs at least two observations");
        let xm = self.col_means();
        let ym = other.col_means();
        let denom = T::from_usize(self.nrows - 1).unwrap_or_else(T::one);
        Self::from_fn(self.ncols, other.ncols, |a, b| {
            let mut acc = T::zero();
            for i in 0..self.nrows {
                acc = acc + (self[(i, a)] - xm[a]) * (other[(i, b)] - ym[b]);
            }
            acc / denom
        })
    }

    /// Rank by row-echelon Gaussian elimination with partial pivoting.
    ///
    /// Works for rectangular and exactly singular input alike; pivots
    /// with magnitude at most `tol` count as zero.
    ///
    /// ```
    /// use faktor::Matrix;
    /// let m = Matrix::from_rows(3, 3, &[
    ///     10.0, 20.0, 10.0,
    ///     -20.0, -30.0, 10.0,
    ///     30.0, 50.0, 0.0,
    /// ]);
    /// assert_eq!(m.rank(1e-9), 2);
    /// ```
    pub fn rank(&self, tol: T) -> usize {
        let mut m = self.clone();
        let (rows, cols) = (m.nrows, m.ncols);
        let mut rank = 0;
        let mut pivot_row = 0;
        for col in 0..cols {
            if pivot_row >= rows {
                break;
            }
            let mut imax = pivot_row;
            let mut best = m[(pivot_row, col)].abs();
            for r in (pivot_row + 1)..rows {
                let v = m[(r, col)].abs();
                if v > best {
                    best = v;
                    imax = r;
                }
            }
            if best <= tol {
                continue;
            }
            m.swap_rows(pivot_row, imax);
            for r in (pivot_row + 1)..rows {
                let f = m[(r, col)] / m[(pivot_row, col)];
                for c in col..cols {
                    let sub = f * m[(pivot_row, c)];
                    m[(r, c)] = m[(r, c)] - sub;
                }
            }
            pivot_row += 1;
            rank += 1;
        }
        rank
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        debug_assert!(row < self.nrows && col < self.ncols);
        &self.data[row * self.ncols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        debug_assert!(row < self.nrows && col < self.ncols);
        &mut self.data[row * self.ncols + col]
    }
}

// ── MatrixRef / MatrixMut ───────────────────────────────────────────

impl<T> MatrixRef<T> for Matrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.data[row * self.ncols + col]
    }
}

impl<T> MatrixMut<T> for Matrix<T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[row * self.ncols + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn constructors() {
        let z = Matrix::<f64>::zeros(2, 3);
        assert_eq!(z.dims(), (2, 3));
        assert!(z.as_slice().iter().all(|&x| x == 0.0));

        let f = Matrix::fill(2, 2, 7.0);
        assert_eq!(f[(1, 1)], 7.0);

        let e = Matrix::<f64>::eye(3);
        assert_eq!(e[(0, 0)], 1.0);
        assert_eq!(e[(0, 1)], 0.0);

        let g = Matrix::from_fn(2, 2, |i, j| (i * 10 + j) as f64);
        assert_eq!(g[(1, 0)], 10.0);
    }

    #[test]
    fn row_major_layout() {
        let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.row_as_slice(0), &[1.0, 2.0, 3.0]);
        assert_eq!(m.row_as_slice(1), &[4.0, 5.0, 6.0]);
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn from_nested_rows() {
        let m = Matrix::from_nested(&[&[1.0, 2.0][..], &[3.0, 4.0][..], &[5.0, 6.0][..]]);
        assert_eq!(m.dims(), (3, 2));
        assert_eq!(m[(2, 1)], 6.0);
    }

    #[test]
    #[should_panic]
    fn from_nested_ragged_panics() {
        let _ = Matrix::from_nested(&[&[1.0, 2.0][..], &[3.0][..]]);
    }

    #[test]
    fn row_and_col_extraction() {
        let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.row(1).as_slice(), &[4.0, 5.0, 6.0]);
        assert_eq!(m.col(2).as_slice(), &[3.0, 6.0]);
    }

    #[test]
    fn swap_rows_works() {
        let mut m = Matrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        m.swap_rows(0, 2);
        assert_eq!(m.row_as_slice(0), &[5.0, 6.0]);
        assert_eq!(m.row_as_slice(2), &[1.0, 2.0]);
        m.swap_rows(1, 1);
        assert_eq!(m.row_as_slice(1), &[3.0, 4.0]);
    }

    #[test]
    fn transpose_roundtrip() {
        let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let t = m.transpose();
        assert_eq!(t.dims(), (3, 2));
        assert_eq!(t[(2, 0)], 3.0);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn trace_and_norm() {
        let m = Matrix::<f64>::from_rows(2, 2, &[3.0, 4.0, 0.0, 5.0]);
        assert!((m.trace() - 8.0).abs() < TOL);
        assert!((m.frobenius_norm() - 50.0_f64.sqrt()).abs() < TOL);
    }

    #[test]
    fn extremes() {
        let m = Matrix::from_rows(2, 3, &[1.0, -9.0, 3.0, 4.0, 5.0, -2.0]);
        let mx = m.max();
        assert_eq!((mx.value, mx.row, mx.col), (5.0, 1, 1));
        let mn = m.min();
        assert_eq!((mn.value, mn.row, mn.col), (-9.0, 0, 1));
    }

    #[test]
    fn submatrix_roundtrip() {
        let m = Matrix::from_fn(4, 4, |i, j| (i * 4 + j) as f64);
        let b = m.submatrix(1, 2, 2, 2);
        assert_eq!(b.as_slice(), &[6.0, 7.0, 10.0, 11.0]);

        let mut m2 = Matrix::zeros(4, 4);
        m2.set_submatrix(1, 2, &b);
        assert_eq!(m2[(2, 3)], 11.0);
        assert_eq!(m2[(0, 0)], 0.0);
    }

    #[test]
    fn sums_and_means() {
        let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.row_sums().as_slice(), &[6.0, 15.0]);
        assert_eq!(m.col_sums().as_slice(), &[5.0, 7.0, 9.0]);
        assert_eq!(m.col_means().as_slice(), &[2.5, 3.5, 4.5]);
    }

    #[test]
    fn symmetry_check() {
        let s = Matrix::from_rows(2, 2, &[1.0, 3.0, 3.0, 2.0]);
        assert!(s.is_symmetric(DEFAULT_EPS));
        let a = Matrix::from_rows(2, 2, &[1.0, 3.0, 3.1, 2.0]);
        assert!(!a.is_symmetric(DEFAULT_EPS));
        let r = Matrix::<f64>::zeros(2, 3);
        assert!(!r.is_symmetric(DEFAULT_EPS));
    }

    #[test]
    fn float_eq_hybrid() {
        assert!(float_eq(0.0, 0.0, DEFAULT_EPS));
        assert!(float_eq(1e-9, 0.0, DEFAULT_EPS));
        assert!(float_eq(1.0e6, 1.0e6 + 0.1, DEFAULT_EPS));
        assert!(!float_eq(1.0, 2.0, DEFAULT_EPS));
        assert!(!float_eq(-1.0, 1.0, DEFAULT_EPS));
    }

    #[test]
    fn approx_eq_matrices() {
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let mut b = a.clone();
        b[(0, 0)] += 1e-9;
        assert!(a.approx_eq(&b, DEFAULT_EPS));
        b[(1, 1)] = 5.0;
        assert!(!a.approx_eq(&b, DEFAULT_EPS));
        let c = Matrix::<f64>::zeros(2, 3);
        assert!(!a.approx_eq(&c, DEFAULT_EPS));
    }

    #[test]
    fn covariance_of_perfectly_correlated_columns() {
        // second column is twice the first
        let m = Matrix::<f64>::from_rows(4, 2, &[1.0, 2.0, 2.0, 4.0, 3.0, 6.0, 4.0, 8.0]);
        let c = m.covariance();
        assert_eq!(c.dims(), (2, 2));
        // var(x) = 5/3, cov(x, 2x) = 2 var(x), var(2x) = 4 var(x)
        let vx = 5.0 / 3.0;
        assert!((c[(0, 0)] - vx).abs() < TOL);
        assert!((c[(0, 1)] - 2.0 * vx).abs() < TOL);
        assert!((c[(1, 0)] - 2.0 * vx).abs() < TOL);
        assert!((c[(1, 1)] - 4.0 * vx).abs() < TOL);
    }

    #[test]
    fn cross_covariance_shape() {
        let x = Matrix::<f64>::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let y = Matrix::<f64>::from_rows(3, 1, &[1.0, 2.0, 3.0]);
        let c = x.cross_covariance(&y);
        assert_eq!(c.dims(), (2, 1));
        // first column of x is [1,3,5]: cov with y = [1,2,3] is 2.0
        assert!((c[(0, 0)] - 2.0).abs() < TOL);
    }

    #[test]
    fn rank_full_and_deficient() {
        let full = Matrix::from_rows(3, 3, &[2.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 4.0]);
        assert_eq!(full.rank(1e-9), 3);

        let deficient = Matrix::from_rows(3, 3, &[1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 1.0, 1.0, 1.0]);
        assert_eq!(deficient.rank(1e-9), 2);

        let zero = Matrix::<f64>::zeros(3, 3);
        assert_eq!(zero.rank(1e-9), 0);
    }

    #[test]
    fn rank_rectangular() {
        let wide = Matrix::from_rows(2, 4, &[1.0, 2.0, 3.0, 4.0, 2.0, 4.0, 6.0, 8.0]);
        assert_eq!(wide.rank(1e-9), 1);

        let tall = Matrix::from_rows(4, 2, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0]);
        assert_eq!(tall.rank(1e-9), 2);
    }

    #[test]
    fn from_ref_copies() {
        let m = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let c = Matrix::from_ref(&m);
        assert_eq!(c, m);
    }
}
