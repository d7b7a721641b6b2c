//! Linear algebra on matrices and views.
//!
//! # Key functions
//!
//! - [`matmul`]: rank-2 product `A · B`
//! - [`matvec`]: matrix-vector product `A · x`
//! - [`transpose`]: packed copy of `Aᵀ`
//! - [`reshape`]: same elements in row-major order, new extents
//! - [`copy_into`] / [`iamax`]: bulk copy and largest-magnitude search
//!
//! Products and copies run through [`backend`](crate::backend), which picks
//! CBLAS or the generic loops per element type.

use crate::backend::{self, LinalgScalar};
use crate::matrix::Matrix;
use crate::view::{ensure_same_shape, AsMatrixView, AsMatrixViewMut};
use crate::{MatrixError, Result};

/// Matrix product `A · B` into a new packed matrix.
///
/// Either operand may be a [`Matrix`] or any strided view, including a
/// transposed one.
///
/// # Errors
/// Returns [`MatrixError::DimensionMismatch`] if `A` has a different number
/// of columns than `B` has rows.
///
/// ```rust
/// use strided_matrix::{matmul, Matrix};
///
/// let a = Matrix::from([[2, 4, 6], [8, 10, 12]]);
/// let b = Matrix::from([[1, 2], [3, 4], [5, 6]]);
/// assert_eq!(matmul(&a, &b).unwrap(), Matrix::from([[44, 56], [98, 128]]));
/// ```
pub fn matmul<T, A, B>(a: &A, b: &B) -> Result<Matrix<T, 2>>
where
    T: LinalgScalar,
    A: AsMatrixView<T, 2> + ?Sized,
    B: AsMatrixView<T, 2> + ?Sized,
{
    let a = a.view();
    let b = b.view();
    if a.ncols() != b.nrows() {
        return Err(MatrixError::DimensionMismatch {
            lhs: a.extents().to_vec(),
            rhs: b.extents().to_vec(),
        });
    }
    Ok(backend::gemm(&a, &b))
}

/// Matrix-vector product `A · x` into a new packed vector.
///
/// # Errors
/// Returns [`MatrixError::DimensionMismatch`] if the length of `x` differs
/// from the number of columns of `A`.
pub fn matvec<T, A, X>(a: &A, x: &X) -> Result<Matrix<T, 1>>
where
    T: LinalgScalar,
    A: AsMatrixView<T, 2> + ?Sized,
    X: AsMatrixView<T, 1> + ?Sized,
{
    let a = a.view();
    let x = x.view();
    if a.ncols() != x.len() {
        return Err(MatrixError::DimensionMismatch {
            lhs: a.extents().to_vec(),
            rhs: x.extents().to_vec(),
        });
    }
    Ok(backend::gemv(&a, &x))
}

/// Packed copy of the transpose. Works for non-square inputs.
pub fn transpose<T, A>(a: &A) -> Matrix<T, 2>
where
    T: Clone,
    A: AsMatrixView<T, 2> + ?Sized,
{
    a.view().t().to_matrix()
}

/// Copy the elements, read in row-major order, into a matrix of new extents.
///
/// # Errors
/// Returns [`MatrixError::SizeMismatch`] if the element counts differ.
///
/// ```rust
/// use strided_matrix::{reshape, Matrix};
///
/// let m = Matrix::from([[1, 2, 3], [4, 5, 6]]);
/// let r = reshape(&m, [3, 2]).unwrap();
/// assert_eq!(r, Matrix::from([[1, 2], [3, 4], [5, 6]]));
/// ```
pub fn reshape<T, A, const N: usize, const M: usize>(a: &A, extents: [usize; M]) -> Result<Matrix<T, M>>
where
    T: Clone,
    A: AsMatrixView<T, N> + ?Sized,
{
    let a = a.view();
    let expected: usize = extents.iter().product();
    if expected != a.len() {
        return Err(MatrixError::SizeMismatch {
            expected,
            found: a.len(),
        });
    }
    log::trace!("reshape {:?} -> {:?}", a.extents(), extents);
    Matrix::from_vec(extents, a.iter().cloned().collect())
}

/// Copy every element of `src` into the same position of `dst`.
///
/// # Errors
/// Returns [`MatrixError::ShapeMismatch`] if the extents differ.
pub fn copy_into<T, D, S, const N: usize>(dst: &mut D, src: &S) -> Result<()>
where
    T: LinalgScalar,
    D: AsMatrixViewMut<T, N> + ?Sized,
    S: AsMatrixView<T, N> + ?Sized,
{
    let src = src.view();
    let mut dst = dst.view_mut();
    ensure_same_shape(dst.extents(), src.extents())?;
    backend::copy(&src, &mut dst);
    Ok(())
}

/// Position of the first element of largest magnitude, or `None` if empty.
///
/// Complex numbers compare by `|re| + |im|`.
pub fn iamax<T, X>(x: &X) -> Option<usize>
where
    T: LinalgScalar,
    X: AsMatrixView<T, 1> + ?Sized,
{
    backend::iamax(&x.view())
}

impl<T: LinalgScalar> Matrix<T, 2> {
    /// See [`matmul`].
    pub fn dot<B>(&self, rhs: &B) -> Result<Matrix<T, 2>>
    where
        B: AsMatrixView<T, 2> + ?Sized,
    {
        matmul(self, rhs)
    }
}

impl<T: Clone, const N: usize> Matrix<T, N> {
    /// See [`reshape`].
    pub fn reshape<const M: usize>(&self, extents: [usize; M]) -> Result<Matrix<T, M>> {
        reshape(self, extents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    #[test]
    fn test_matmul_ints() {
        let a = Matrix::from([[2, 4, 6], [8, 10, 12]]);
        let b = Matrix::from([[1, 2], [3, 4], [5, 6]]);
        let c = matmul(&a, &b).unwrap();
        assert_eq!(c, Matrix::from([[44, 56], [98, 128]]));
    }

    #[test]
    fn test_matmul_f64_transposed_operand() {
        let a = Matrix::from([[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        // aᵀ · a
        let c = matmul(&a.t(), &a).unwrap();
        assert_relative_eq!(c[[0, 0]], 35.0);
        assert_relative_eq!(c[[0, 1]], 44.0);
        assert_relative_eq!(c[[1, 0]], 44.0);
        assert_relative_eq!(c[[1, 1]], 56.0);
    }

    #[test]
    fn test_matmul_dimension_mismatch() {
        let a = Matrix::from([[1, 2, 3], [4, 5, 6]]);
        let err = matmul(&a, &a).unwrap_err();
        assert_eq!(
            err,
            MatrixError::DimensionMismatch {
                lhs: vec![2, 3],
                rhs: vec![2, 3]
            }
        );
    }

    #[test]
    fn test_matmul_complex() {
        let i = Complex64::new(0.0, 1.0);
        let one = Complex64::new(1.0, 0.0);
        let a = Matrix::from([[one, i], [i, one]]);
        let c = matmul(&a, &a).unwrap();
        assert_eq!(c[[0, 0]], Complex64::new(0.0, 0.0));
        assert_eq!(c[[0, 1]], Complex64::new(0.0, 2.0));
    }

    #[test]
    fn test_matmul_empty_inner() {
        let a: Matrix<f64, 2> = Matrix::new([2, 0]);
        let b: Matrix<f64, 2> = Matrix::new([0, 3]);
        let c = matmul(&a, &b).unwrap();
        assert_eq!(c.extents(), &[2, 3]);
        assert!(c.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_matvec() {
        let a = Matrix::from([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let x = Matrix::from([1.0, 1.0, 1.0]);
        let y = matvec(&a, &x).unwrap();
        assert_eq!(y, Matrix::from([6.0, 15.0]));
        assert!(matches!(
            matvec(&a, &Matrix::from([1.0, 2.0])),
            Err(MatrixError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_matvec_column_view() {
        let a = Matrix::from([[1, 2], [3, 4]]);
        let basis = Matrix::from([[1, 0], [0, 1]]);
        let y = matvec(&a, &basis.col(1)).unwrap();
        assert_eq!(y, Matrix::from([2, 4]));
    }

    #[test]
    fn test_transpose_non_square() {
        let a = Matrix::from([[1, 2, 3], [4, 5, 6]]);
        let t = transpose(&a);
        assert_eq!(t, Matrix::from([[1, 4], [2, 5], [3, 6]]));
        assert_eq!(transpose(&t), a);
    }

    #[test]
    fn test_reshape() {
        let a = Matrix::from([[1, 2, 3], [4, 5, 6]]);
        let flat: Matrix<i32, 1> = a.reshape([6]).unwrap();
        assert_eq!(flat.data(), &[1, 2, 3, 4, 5, 6]);
        let cube: Matrix<i32, 3> = reshape(&flat, [1, 3, 2]).unwrap();
        assert_eq!(cube[[0, 2, 1]], 6);
        assert_eq!(
            a.reshape([4]).unwrap_err(),
            MatrixError::SizeMismatch {
                expected: 4,
                found: 6
            }
        );
    }

    #[test]
    fn test_reshape_strided_view_reads_row_major() {
        let a = Matrix::from([[1, 2, 3], [4, 5, 6]]);
        let r = reshape(&a.t(), [6]).unwrap();
        assert_eq!(r.data(), &[1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn test_copy_into() {
        let src = Matrix::from([[1.0, 2.0], [3.0, 4.0]]);
        let mut dst: Matrix<f64, 2> = Matrix::new([2, 2]);
        copy_into(&mut dst, &src.t()).unwrap();
        assert_eq!(dst, Matrix::from([[1.0, 3.0], [2.0, 4.0]]));

        let mut wrong: Matrix<f64, 2> = Matrix::new([3, 2]);
        assert!(copy_into(&mut wrong, &src).is_err());
    }

    #[test]
    fn test_iamax() {
        let v = Matrix::from([Complex64::new(1.0, 1.0), Complex64::new(0.0, -3.0)]);
        assert_eq!(iamax(&v), Some(1));
        let m = Matrix::from([[1, -9], [4, 2]]);
        assert_eq!(iamax(&m.col(1)), Some(0));
    }
}
