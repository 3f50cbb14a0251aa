//! Operator overloads and matrix products.

use core::ops::{Add, Mul, Neg, Sub};

use super::parallel;
use super::vector::Vector;
use super::Matrix;
use crate::traits::Scalar;

impl<T: Scalar> Matrix<T> {
    /// Matrix product `self * rhs`.
    ///
    /// Dispatches to a row-partitioned parallel kernel when the output
    /// has more than [`parallel::PAR_ROW_THRESHOLD`] rows; results are
    /// identical either way.
    pub fn matmul(&self, rhs: &Self) -> Self {
        assert_eq!(
            self.ncols, rhs.nrows,
            "cannot multiply {}x{} by {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols
        );
        if self.nrows > parallel::PAR_ROW_THRESHOLD {
            return parallel::matmul_parallel(self, rhs);
        }
        let mut out = Self::zeros(self.nrows, rhs.ncols);
        for i in 0..self.nrows {
            parallel::matmul_row(self, rhs, i, out.row_as_mut_slice(i));
        }
        out
    }

    /// Matrix–vector product `self * v`.
    pub fn vecmul(&self, v: &Vector<T>) -> Vector<T> {
        assert_eq!(
            self.ncols,
            v.len(),
            "cannot multiply {}x{} by length-{} vector",
            self.nrows,
            self.ncols,
            v.len()
        );
        Vector::from_vec(
            (0..self.nrows)
                .map(|i| {
                    self.row_as_slice(i)
                        .iter()
                        .zip(v.as_slice())
                        .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
                })
                .collect(),
        )
    }

    /// Integer matrix power by repeated squaring. `pow(0)` is the
    /// identity. Panics on non-square input.
    pub fn pow(&self, mut k: u32) -> Self {
        assert!(self.is_square(), "pow requires a square matrix, got {}x{}", self.nrows, self.ncols);
        let mut result = Self::eye(self.nrows);
        let mut base = self.clone();
        while k > 0 {
            if k & 1 == 1 {
                result = result.matmul(&base);
            }
            k >>= 1;
            if k > 0 {
                base = base.matmul(&base);
            }
        }
        result
    }
}

// ── Add ─────────────────────────────────────────────────────────────

impl<T: Scalar> Add for &Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_eq!(
            (self.nrows, self.ncols),
            (rhs.nrows, rhs.ncols),
            "cannot add {}x{} and {}x{}",
            self.nrows,
            self.ncols,
            rhs.nrows,
            rhs.ncols
        );
        Matrix {
            data: self
                .data
                .iter()
                .zip(&rhs.data)
                .map(|(&a, &b)| a + b)
                .collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

impl<T: Scalar> Add for Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: Matrix<T>) -> Matrix<T> {
        &self + &rhs
    }
}

impl<T: Scalar> Add<&Matrix<T>> for Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: &Matrix<T>) -> Matrix<T> {
        &self + rhs
    }
}

impl<T: Scalar> Add<Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: Matrix<T>) -> Matrix<T> {
        self + &rhs
    }
}

// ── Sub ─────────────────────────────────────────────────────────────

impl<T: Scalar> Sub for &Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_eq!(
            (self.nrows, self.ncols),
            (rhs.nrows, rhs.ncols),
            "cannot subtract {}x{} from {}x{}",
            rhs.nrows,
            rhs.ncols,
            self.nrows,
            self.ncols
        );
        Matrix {
            data: self
                .data
                .iter()
                .zip(&rhs.data)
                .map(|(&a, &b)| a - b)
                .collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

impl<T: Scalar> Sub for Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: Matrix<T>) -> Matrix<T> {
        &self - &rhs
    }
}

impl<T: Scalar> Sub<&Matrix<T>> for Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: &Matrix<T>) -> Matrix<T> {
        &self - rhs
    }
}

impl<T: Scalar> Sub<Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: Matrix<T>) -> Matrix<T> {
        self - &rhs
    }
}

// ── Mul ─────────────────────────────────────────────────────────────

impl<T: Scalar> Mul for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        self.matmul(rhs)
    }
}

impl<T: Scalar> Mul for Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: Matrix<T>) -> Matrix<T> {
        self.matmul(&rhs)
    }
}

impl<T: Scalar> Mul<&Matrix<T>> for Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        self.matmul(rhs)
    }
}

impl<T: Scalar> Mul<Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: Matrix<T>) -> Matrix<T> {
        self.matmul(&rhs)
    }
}

impl<T: Scalar> Mul<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, s: T) -> Matrix<T> {
        Matrix {
            data: self.data.iter().map(|&x| x * s).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

impl<T: Scalar> Mul<T> for Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, s: T) -> Matrix<T> {
        &self * s
    }
}

impl<T: Scalar> Mul<&Vector<T>> for &Matrix<T> {
    type Output = Vector<T>;

    fn mul(self, v: &Vector<T>) -> Vector<T> {
        self.vecmul(v)
    }
}

// ── Neg ─────────────────────────────────────────────────────────────

impl<T: Scalar + Neg<Output = T>> Neg for &Matrix<T> {
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        Matrix {
            data: self.data.iter().map(|&x| -x).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

impl<T: Scalar + Neg<Output = T>> Neg for Matrix<T> {
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        -&self
    }
}
