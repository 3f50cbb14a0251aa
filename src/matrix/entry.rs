/// An element of a matrix together with its position.
///
/// Returned by [`Matrix::max`](crate::Matrix::max) and
/// [`Matrix::min`](crate::Matrix::min).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry<T> {
    pub value: T,
    pub row: usize,
    pub col: usize,
}
