//! # faktor
//!
//! Dense linear algebra over runtime-sized, row-major matrices.
//!
//! The crate provides a single owned matrix type, [`Matrix`], a companion
//! [`Vector`], and the classical decompositions built on top of them:
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`matrix`] | `Matrix`, `Vector`, `Entry`, arithmetic, parallel kernels |
//! | [`linalg`] | LU, QR, Cholesky, symmetric/general eigen, 3×3 analytic eigen, SVD |
//!
//! Elements are generic over [`FloatScalar`] (any `num_traits::Float`,
//! in practice `f64` or `f32`).
//!
//! ## Conventions
//!
//! - Shape violations (mismatched dimensions, non-square input to a
//!   square-only routine) are programming errors and panic.
//! - Numerical failures (singular pivot, loss of positive definiteness,
//!   non-convergence) are reported as [`linalg::LinalgError`] values.
//! - Tolerances are explicit arguments; [`DEFAULT_EPS`] is the
//!   conventional comparison tolerance when nothing better is known.
//!
//! ## Example
//!
//! ```
//! use faktor::{Matrix, Vector, DEFAULT_EPS};
//!
//! let a = Matrix::from_rows(2, 2, &[4.0, 1.0, 1.0, 3.0]);
//! let b = Vector::from_slice(&[1.0, 2.0]);
//! let x = a.solve(&b, 1e-12).unwrap();
//!
//! let r = a.vecmul(&x);
//! assert!(r.approx_eq(&b, DEFAULT_EPS));
//! ```

pub mod linalg;
pub mod matrix;
pub mod traits;

pub use matrix::entry::Entry;
pub use matrix::parallel::convolve;
pub use matrix::vector::Vector;
pub use matrix::{float_eq, Matrix, DEFAULT_EPS};

pub use linalg::{
    CholeskyDecomposition, EigenDecomposition, LinalgError, LuDecomposition, QrDecomposition,
    SvdDecomposition, SymmetricEigen,
};

pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
