use core::fmt::Debug;
use num_traits::{Float, FromPrimitive, Num, One, Zero};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types. The `Send + Sync`
/// bounds let the parallel kernels share element buffers across
/// worker threads.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num + Send + Sync {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num + Send + Sync> Scalar for T {}

/// Trait for floating-point matrix elements.
///
/// Required by every decomposition and norm (`sqrt`, `hypot`, `abs`,
/// machine epsilon). `FromPrimitive` supplies the literal constants the
/// iterative solvers need (shift divisors, deflation thresholds).
pub trait FloatScalar: Scalar + Float + FromPrimitive {}

impl<T: Scalar + Float + FromPrimitive> FloatScalar for T {}

/// Read-only access to a matrix-like type.
///
/// The access seam between storage and algorithms: anything exposing
/// dimensions and per-element reads can be copied into a
/// [`Matrix`](crate::Matrix) via `Matrix::from_ref` or compared
/// against one.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access for in-place
/// transformations.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;
}
