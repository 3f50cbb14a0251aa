use core::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

use super::{float_eq, Matrix};
use crate::traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};

/// Owned one-dimensional vector.
///
/// # Examples
///
/// ```
/// use faktor::Vector;
///
/// let v = Vector::from_slice(&[1.0_f64, 2.0, 3.0]);
/// assert_eq!(v[0], 1.0);
/// assert_eq!(v.len(), 3);
/// assert!((v.dot(&v) - 14.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T> {
    pub(crate) data: Vec<T>,
}

impl<T: Scalar> Vector<T> {
    /// Create a vector from a slice.
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Create a vector from an owned `Vec`.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Create a zero vector of length `n`.
    pub fn zeros(n: usize) -> Self {
        Self {
            data: vec![T::zero(); n],
        }
    }

    /// Create a vector filled with `value`.
    pub fn fill(n: usize, value: T) -> Self {
        Self {
            data: vec![value; n],
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the vector is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// View the elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// View the elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterator over the elements.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Dot product.
    ///
    /// ```
    /// use faktor::Vector;
    /// let a = Vector::from_slice(&[1.0, 2.0, 3.0]);
    /// let b = Vector::from_slice(&[4.0, 5.0, 6.0]);
    /// assert_eq!(a.dot(&b), 32.0);
    /// ```
    pub fn dot(&self, rhs: &Self) -> T {
        assert_eq!(self.len(), rhs.len(), "vector length mismatch: {} vs {}", self.len(), rhs.len());
        let mut sum = T::zero();
        for i in 0..self.len() {
            sum = sum + self[i] * rhs[i];
        }
        sum
    }

    /// Sum of squared elements.
    pub fn squared_sum(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| acc + x * x)
    }

    /// Cross product. Both vectors must have length 3.
    ///
    /// ```
    /// use faktor::Vector;
    /// let x = Vector::from_slice(&[1.0, 0.0, 0.0]);
    /// let y = Vector::from_slice(&[0.0, 1.0, 0.0]);
    /// assert_eq!(x.cross(&y).as_slice(), &[0.0, 0.0, 1.0]);
    /// ```
    pub fn cross(&self, rhs: &Self) -> Self {
        assert!(
            self.len() == 3 && rhs.len() == 3,
            "cross product requires length-3 vectors, got {} and {}",
            self.len(),
            rhs.len()
        );
        Self::from_vec(vec![
            self[1] * rhs[2] - self[2] * rhs[1],
            self[2] * rhs[0] - self[0] * rhs[2],
            self[0] * rhs[1] - self[1] * rhs[0],
        ])
    }

    /// Outer product `self * rhsᵀ` as a `len x rhs.len` matrix.
    pub fn outer(&self, rhs: &Self) -> Matrix<T> {
        Matrix::from_fn(self.len(), rhs.len(), |i, j| self[i] * rhs[j])
    }
}

impl<T: FloatScalar> Vector<T> {
    /// Euclidean norm.
    pub fn norm(&self) -> T {
        self.squared_sum().sqrt()
    }

    /// Unit vector in the same direction. Panics on the zero vector.
    pub fn normalize(&self) -> Self {
        let n = self.norm();
        assert!(!n.is_zero(), "cannot normalize a zero vector");
        Self::from_vec(self.data.iter().map(|&x| x / n).collect())
    }

    /// Element-wise tolerance comparison via [`float_eq`].
    pub fn approx_eq(&self, other: &Self, eps: T) -> bool {
        self.len() == other.len()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&a, &b)| float_eq(a, b, eps))
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

// ── MatrixRef / MatrixMut ───────────────────────────────────────────

// A vector is an n x 1 column through the access seam.

impl<T> MatrixRef<T> for Vector<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn ncols(&self) -> usize {
        1
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        debug_assert!(col == 0);
        &self.data[row]
    }
}

impl<T> MatrixMut<T> for Vector<T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        debug_assert!(col == 0);
        &mut self.data[row]
    }
}

// ── Arithmetic ──────────────────────────────────────────────────────

impl<T: Scalar> Add for &Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: &Vector<T>) -> Vector<T> {
        assert_eq!(self.len(), rhs.len(), "vector length mismatch: {} vs {}", self.len(), rhs.len());
        Vector::from_vec(
            self.data
                .iter()
                .zip(&rhs.data)
                .map(|(&a, &b)| a + b)
                .collect(),
        )
    }
}

impl<T: Scalar> Add for Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: Vector<T>) -> Vector<T> {
        &self + &rhs
    }
}

impl<T: Scalar> Sub for &Vector<T> {
    type Output = Vector<T>;

    fn sub(self, rhs: &Vector<T>) -> Vector<T> {
        assert_eq!(self.len(), rhs.len(), "vector length mismatch: {} vs {}", self.len(), rhs.len());
        Vector::from_vec(
            self.data
                .iter()
                .zip(&rhs.data)
                .map(|(&a, &b)| a - b)
                .collect(),
        )
    }
}

impl<T: Scalar> Sub for Vector<T> {
    type Output = Vector<T>;

    fn sub(self, rhs: Vector<T>) -> Vector<T> {
        &self - &rhs
    }
}

impl<T: Scalar> Mul<T> for &Vector<T> {
    type Output = Vector<T>;

    fn mul(self, s: T) -> Vector<T> {
        Vector::from_vec(self.data.iter().map(|&x| x * s).collect())
    }
}

impl<T: Scalar> Mul<T> for Vector<T> {
    type Output = Vector<T>;

    fn mul(self, s: T) -> Vector<T> {
        &self * s
    }
}

impl<T: Scalar + Neg<Output = T>> Neg for &Vector<T> {
    type Output = Vector<T>;

    fn neg(self) -> Vector<T> {
        Vector::from_vec(self.data.iter().map(|&x| -x).collect())
    }
}

impl<T: Scalar + Neg<Output = T>> Neg for Vector<T> {
    type Output = Vector<T>;

    fn neg(self) -> Vector<T> {
        -&self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_EPS;

    const TOL: f64 = 1e-10;

    #[test]
    fn construction_and_indexing() {
        let v = Vector::from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(v.len(), 3);
        assert_eq!(v[2], 3.0);

        let mut z = Vector::<f64>::zeros(2);
        z[1] = 5.0;
        assert_eq!(z.as_slice(), &[0.0, 5.0]);

        let f = Vector::fill(3, 2.0);
        assert_eq!(f.as_slice(), &[2.0, 2.0, 2.0]);
    }

    #[test]
    fn dot_and_norm() {
        let v = Vector::<f64>::from_slice(&[3.0, 4.0]);
        assert!((v.norm() - 5.0).abs() < TOL);
        assert!((v.squared_sum() - 25.0).abs() < TOL);
        let w = Vector::from_slice(&[1.0, -1.0]);
        assert!((v.dot(&w) + 1.0).abs() < TOL);
    }

    #[test]
    fn normalize_unit_length() {
        let v = Vector::<f64>::from_slice(&[3.0, 4.0]);
        let u = v.normalize();
        assert!((u.norm() - 1.0).abs() < TOL);
        assert!((u[0] - 0.6).abs() < TOL);
        assert!((u[1] - 0.8).abs() < TOL);
    }

    #[test]
    #[should_panic]
    fn normalize_zero_panics() {
        let _ = Vector::<f64>::zeros(3).normalize();
    }

    #[test]
    fn cross_product_axes() {
        let x = Vector::from_slice(&[1.0, 0.0, 0.0]);
        let y = Vector::from_slice(&[0.0, 1.0, 0.0]);
        let z = x.cross(&y);
        assert_eq!(z.as_slice(), &[0.0, 0.0, 1.0]);
        // anti-commutative
        let zn = y.cross(&x);
        assert_eq!(zn.as_slice(), &[0.0, 0.0, -1.0]);
    }

    #[test]
    fn outer_product() {
        let a = Vector::from_slice(&[1.0, 2.0]);
        let b = Vector::from_slice(&[3.0, 4.0, 5.0]);
        let m = a.outer(&b);
        assert_eq!(m.dims(), (2, 3));
        assert_eq!(m[(1, 2)], 10.0);
    }

    #[test]
    fn arithmetic() {
        let a = Vector::from_slice(&[1.0, 2.0]);
        let b = Vector::from_slice(&[3.0, 5.0]);
        assert_eq!((&a + &b).as_slice(), &[4.0, 7.0]);
        assert_eq!((&b - &a).as_slice(), &[2.0, 3.0]);
        assert_eq!((&a * 2.0).as_slice(), &[2.0, 4.0]);
        assert_eq!((-&a).as_slice(), &[-1.0, -2.0]);
    }

    #[test]
    fn column_view_round_trips_through_from_ref() {
        let v = Vector::from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(MatrixRef::nrows(&v), 3);
        assert_eq!(MatrixRef::ncols(&v), 1);

        let m = Matrix::from_ref(&v);
        assert_eq!(m.dims(), (3, 1));
        for i in 0..3 {
            assert_eq!(m[(i, 0)], v[i]);
        }

        let mut w = Vector::zeros(2);
        *w.get_mut(1, 0) = 7.0;
        assert_eq!(w.as_slice(), &[0.0, 7.0]);
    }

    #[test]
    fn approx_eq_tolerance() {
        let a = Vector::from_slice(&[1.0, 2.0]);
        let mut b = a.clone();
        b[0] += 1e-9;
        assert!(a.approx_eq(&b, DEFAULT_EPS));
        b[1] = 3.0;
        assert!(!a.approx_eq(&b, DEFAULT_EPS));
    }
}
