//! Rank-parameterised dense arrays with zero-copy strided views.
//!
//! The crate is built around one layout algebra, the [`Descriptor`], which
//! maps an N-dimensional multi-index onto a flat buffer through a start offset,
//! per-axis extents and per-axis strides. Everything else is expressed in
//! terms of it:
//!
//! - [`Matrix`]: owning container with a packed row-major buffer
//! - [`MatrixView`] / [`MatrixViewMut`]: borrowed strided views over someone
//!   else's buffer, possibly offset, non-contiguous and of reduced rank
//! - [`Iter`] / [`IterMut`]: walk a descriptor in row-major multi-index order
//! - [`DimSpec`] and the [`s!`] macro: per-axis slice arguments
//!   (`Index`, `Range`, `All`)
//!
//! # Example
//!
//! ```rust
//! use strided_matrix::{s, Matrix, MatrixView};
//!
//! let mut m = Matrix::from([[1, 2, 3], [4, 5, 6]]);
//! m *= 2;
//! assert_eq!(m, Matrix::from([[2, 4, 6], [8, 10, 12]]));
//!
//! // Rank-reducing slice: fix row 1, keep columns 1..3.
//! let tail: MatrixView<'_, i32, 1> = m.slice(&s![1, 1..3]);
//! assert_eq!(tail.iter().copied().collect::<Vec<_>>(), vec![10, 12]);
//!
//! let b = Matrix::from([[1, 2], [3, 4], [5, 6]]);
//! let c = strided_matrix::matmul(&Matrix::from([[2, 4, 6], [8, 10, 12]]), &b).unwrap();
//! assert_eq!(c, Matrix::from([[44, 56], [98, 128]]));
//! ```
//!
//! # Backends
//!
//! Products and bulk copies go through [`backend`]. With the `blas` feature,
//! `f32`, `f64`, `Complex32` and `Complex64` operands laid out with a unit
//! stride are handed to CBLAS; everything else uses the generic loops.

pub mod backend;
mod descriptor;
mod fmt;
mod iter;
mod linalg;
mod map;
mod matrix;
mod ops;
mod slice;
mod view;

pub use backend::{LinalgScalar, ScalarKind};
pub use descriptor::{row_major_strides, Descriptor};
pub use iter::{Iter, IterMut};
pub use linalg::{copy_into, iamax, matmul, matvec, reshape, transpose};
pub use matrix::{Matrix, MatrixInitializer};
pub use ops::ScalarOperand;
pub use slice::DimSpec;
pub use view::{AsMatrixView, AsMatrixViewMut, MatrixView, MatrixViewMut};

/// Errors raised by array construction, slicing and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// Operand extents differ.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Nested initializer data is ragged at some nesting level.
    #[error("ragged initializer at level {level}: expected length {expected}, found {found}")]
    RaggedInitializer {
        level: usize,
        expected: usize,
        found: usize,
    },

    /// Inner dimensions of a matrix product disagree.
    #[error("incompatible dimensions for product: {lhs:?} x {rhs:?}")]
    DimensionMismatch { lhs: Vec<usize>, rhs: Vec<usize> },

    /// An index argument lies beyond its axis.
    #[error("index {index} out of range for axis {axis} with extent {extent}")]
    IndexOutOfRange {
        axis: usize,
        index: usize,
        extent: usize,
    },

    /// A range argument is reversed or runs past its axis.
    #[error("range {start}..{end} invalid for axis {axis} with extent {extent}")]
    InvalidRange {
        axis: usize,
        start: usize,
        end: usize,
        extent: usize,
    },

    /// Axis number is not below the rank.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    /// Ranks do not match.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Total element counts differ.
    #[error("size mismatch: expected {expected} elements, found {found}")]
    SizeMismatch { expected: usize, found: usize },

    /// A descriptor addresses memory outside its buffer.
    #[error("offset overflow while computing element position")]
    OffsetOverflow,

    /// A mutable descriptor would reach the same element twice.
    #[error("strides overlap: a mutable view must address distinct elements")]
    OverlappingStrides,
}

/// Result type for array operations.
pub type Result<T> = std::result::Result<T, MatrixError>;
