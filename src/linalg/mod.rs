//! Matrix decompositions.
//!
//! Each decomposition has a free in-place worker function operating on
//! pre-shaped buffers and a wrapper struct that owns its factors and
//! exposes the derived quantities (solve, determinant, rank, ...).

pub(crate) mod cholesky;
pub(crate) mod eigen3;
pub(crate) mod hessenberg;
pub(crate) mod hqr;
pub(crate) mod lu;
pub(crate) mod qr;
pub(crate) mod svd;
pub(crate) mod symmetric_eigen;

pub use cholesky::CholeskyDecomposition;
pub use eigen3::{symmetric_eigen3, symmetric_eigenvalues3};
pub use hqr::EigenDecomposition;
pub use lu::LuDecomposition;
pub use qr::QrDecomposition;
pub use svd::SvdDecomposition;
pub use symmetric_eigen::SymmetricEigen;

/// Errors from linear algebra operations.
///
/// Returned by decomposition constructors and convenience methods
/// (`solve`, `inverse`, `cholesky`, `lu`, `eigen`, `svd`). Shape
/// violations are programming errors and panic instead.
///
/// ```
/// use faktor::{LinalgError, Matrix};
///
/// let singular = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 4.0]);
/// assert_eq!(singular.lu(1e-12).unwrap_err(), LinalgError::Singular);
///
/// let not_pd = Matrix::from_rows(2, 2, &[1.0_f64, 5.0, 5.0, 1.0]);
/// assert_eq!(not_pd.cholesky().unwrap_err(), LinalgError::NotPositiveDefinite);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// Best available pivot fell below the caller's tolerance.
    Singular,
    /// Matrix is not positive definite (required for Cholesky).
    NotPositiveDefinite,
    /// Iterative algorithm did not converge within its iteration budget.
    ConvergenceFailure,
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::Singular => write!(f, "matrix is singular at the given tolerance"),
            LinalgError::NotPositiveDefinite => write!(f, "matrix is not positive definite"),
            LinalgError::ConvergenceFailure => {
                write!(f, "iterative algorithm did not converge")
            }
        }
    }
}

impl std::error::Error for LinalgError {}
