//! Backend selection for products and bulk copies.
//!
//! Each kernel looks at the element type at run time. `f32`, `f64`,
//! `Complex32` and `Complex64` operands with a unit-stride layout go to CBLAS
//! when the `blas` feature is enabled; every other case runs the generic
//! loops below.

use crate::matrix::Matrix;
use crate::view::{MatrixView, MatrixViewMut};
use num_complex::{Complex32, Complex64};
use num_traits::Zero;
use std::any::TypeId;
use std::ops::{Add, Mul};

/// Element type tag used to pick a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    F32,
    F64,
    C32,
    C64,
    Other,
}

impl ScalarKind {
    /// Tag for `T`.
    pub fn of<T: 'static>() -> Self {
        let id = TypeId::of::<T>();
        if id == TypeId::of::<f32>() {
            ScalarKind::F32
        } else if id == TypeId::of::<f64>() {
            ScalarKind::F64
        } else if id == TypeId::of::<Complex32>() {
            ScalarKind::C32
        } else if id == TypeId::of::<Complex64>() {
            ScalarKind::C64
        } else {
            ScalarKind::Other
        }
    }

    /// True for the four types CBLAS understands.
    pub fn is_blas(self) -> bool {
        self != ScalarKind::Other
    }
}

/// Element types accepted by [`matmul`](crate::matmul), [`matvec`](crate::matvec)
/// and the other linear-algebra kernels.
pub trait LinalgScalar: Copy + Zero + Add<Output = Self> + Mul<Output = Self> + 'static {
    /// Magnitude used by [`iamax`](crate::iamax): `|x|` for reals,
    /// `|re| + |im|` for complex numbers.
    fn magnitude(self) -> f64;
}

macro_rules! impl_linalg_signed {
    ($($t:ty),*) => {$(
        impl LinalgScalar for $t {
            fn magnitude(self) -> f64 {
                (self as f64).abs()
            }
        }
    )*};
}

macro_rules! impl_linalg_unsigned {
    ($($t:ty),*) => {$(
        impl LinalgScalar for $t {
            fn magnitude(self) -> f64 {
                self as f64
            }
        }
    )*};
}

impl_linalg_signed!(i8, i16, i32, i64, isize, f32, f64);
impl_linalg_unsigned!(u8, u16, u32, u64, usize);

impl LinalgScalar for Complex32 {
    fn magnitude(self) -> f64 {
        (self.re.abs() + self.im.abs()) as f64
    }
}

impl LinalgScalar for Complex64 {
    fn magnitude(self) -> f64 {
        self.re.abs() + self.im.abs()
    }
}

/// BLAS matrix layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlasLayout {
    /// Rows are contiguous: `strides[1] == 1`.
    RowMajor,
    /// Columns are contiguous: `strides[0] == 1`.
    ColMajor,
}

/// Shape and leading dimension of a BLAS-compatible matrix.
#[derive(Debug, Clone, Copy)]
pub struct BlasMatrix {
    pub layout: BlasLayout,
    pub rows: usize,
    pub cols: usize,
    pub ld: usize,
}

/// Classify a rank-2 view for BLAS.
///
/// Row-major needs `strides[1] == 1 && strides[0] >= cols`; column-major
/// needs `strides[0] == 1 && strides[1] >= rows`. Empty views never qualify.
pub fn is_blas_matrix<T>(view: &MatrixView<'_, T, 2>) -> Option<BlasMatrix> {
    let [rows, cols] = *view.extents();
    let strides = view.strides();
    if rows == 0 || cols == 0 {
        return None;
    }
    if strides[1] == 1 && strides[0] >= cols as isize {
        return Some(BlasMatrix {
            layout: BlasLayout::RowMajor,
            rows,
            cols,
            ld: strides[0] as usize,
        });
    }
    if strides[0] == 1 && strides[1] >= rows as isize {
        return Some(BlasMatrix {
            layout: BlasLayout::ColMajor,
            rows,
            cols,
            ld: strides[1] as usize,
        });
    }
    None
}

// ============================================================================
// Dispatch
// ============================================================================

/// `A · B` into a new packed matrix. Inner extents must already agree.
pub fn gemm<T: LinalgScalar>(a: &MatrixView<'_, T, 2>, b: &MatrixView<'_, T, 2>) -> Matrix<T, 2> {
    let mut c = Matrix::from_elem([a.nrows(), b.ncols()], T::zero());
    #[cfg(feature = "blas")]
    {
        if blas_impl::gemm(a, b, &mut c) {
            return c;
        }
    }
    log::debug!(
        "gemm {}x{}x{} ({:?}): generic loop",
        a.nrows(),
        a.ncols(),
        b.ncols(),
        ScalarKind::of::<T>()
    );
    generic_gemm(a, b, &mut c.view_mut());
    c
}

/// `A · x` into a new packed vector. Extents must already agree.
pub fn gemv<T: LinalgScalar>(a: &MatrixView<'_, T, 2>, x: &MatrixView<'_, T, 1>) -> Matrix<T, 1> {
    let mut y = Matrix::from_elem([a.nrows()], T::zero());
    #[cfg(feature = "blas")]
    {
        if blas_impl::gemv(a, x, &mut y) {
            return y;
        }
    }
    log::debug!(
        "gemv {}x{} ({:?}): generic loop",
        a.nrows(),
        a.ncols(),
        ScalarKind::of::<T>()
    );
    generic_gemv(a, x, &mut y.view_mut());
    y
}

/// Copy `src` into `dst` element by element. Extents must already agree.
pub fn copy<T: LinalgScalar, const N: usize>(
    src: &MatrixView<'_, T, N>,
    dst: &mut MatrixViewMut<'_, T, N>,
) {
    if let Some(from) = src.as_slice() {
        if let Some(to) = dst.as_slice_mut() {
            #[cfg(feature = "blas")]
            {
                if blas_impl::copy(from, to) {
                    return;
                }
            }
            to.copy_from_slice(from);
            return;
        }
    }
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d = *s;
    }
}

/// Index of the first element of largest [`magnitude`](LinalgScalar::magnitude).
pub fn iamax<T: LinalgScalar>(x: &MatrixView<'_, T, 1>) -> Option<usize> {
    if x.is_empty() {
        return None;
    }
    #[cfg(feature = "blas")]
    {
        if let Some(i) = blas_impl::iamax(x) {
            return Some(i);
        }
    }
    generic_iamax(x)
}

// ============================================================================
// Generic kernels (always available)
// ============================================================================

/// Triple-loop `C = A · B` over arbitrary strides.
pub fn generic_gemm<T: LinalgScalar>(
    a: &MatrixView<'_, T, 2>,
    b: &MatrixView<'_, T, 2>,
    c: &mut MatrixViewMut<'_, T, 2>,
) {
    let (m, k, n) = (a.nrows(), a.ncols(), b.ncols());
    for i in 0..m {
        for j in 0..n {
            let mut sum = T::zero();
            for l in 0..k {
                sum = sum + a[[i, l]] * b[[l, j]];
            }
            c[[i, j]] = sum;
        }
    }
}

/// `y = A · x` over arbitrary strides.
pub fn generic_gemv<T: LinalgScalar>(
    a: &MatrixView<'_, T, 2>,
    x: &MatrixView<'_, T, 1>,
    y: &mut MatrixViewMut<'_, T, 1>,
) {
    for i in 0..a.nrows() {
        let mut sum = T::zero();
        for (aij, xj) in a.row(i).iter().zip(x.iter()) {
            sum = sum + *aij * *xj;
        }
        y[i] = sum;
    }
}

pub fn generic_iamax<T: LinalgScalar>(x: &MatrixView<'_, T, 1>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in x.iter().enumerate() {
        let mag = v.magnitude();
        match best {
            Some((_, top)) if mag <= top => {}
            _ => best = Some((i, mag)),
        }
    }
    best.map(|(i, _)| i)
}

// ============================================================================
// CBLAS kernels (feature-gated)
// ============================================================================

#[cfg(feature = "blas")]
mod blas_impl {
    use super::*;
    use cblas::{Layout, Transpose};

    /// Reinterpret a slice whose element type has been identified by [`ScalarKind`].
    unsafe fn cast<T, U>(s: &[T]) -> &[U] {
        std::slice::from_raw_parts(s.as_ptr() as *const U, s.len())
    }

    unsafe fn cast_mut<T, U>(s: &mut [T]) -> &mut [U] {
        std::slice::from_raw_parts_mut(s.as_mut_ptr() as *mut U, s.len())
    }

    fn op_and_ld(info: &BlasMatrix) -> (Transpose, i32) {
        match info.layout {
            BlasLayout::RowMajor => (Transpose::None, info.ld as i32),
            BlasLayout::ColMajor => (Transpose::Ordinary, info.ld as i32),
        }
    }

    /// Returns false if the operands are not CBLAS-compatible.
    pub(super) fn gemm<T: LinalgScalar>(
        a: &MatrixView<'_, T, 2>,
        b: &MatrixView<'_, T, 2>,
        c: &mut Matrix<T, 2>,
    ) -> bool {
        let kind = ScalarKind::of::<T>();
        if !kind.is_blas() {
            return false;
        }
        let (Some(ai), Some(bi)) = (is_blas_matrix(a), is_blas_matrix(b)) else {
            return false;
        };
        let (m, k, n) = (ai.rows as i32, ai.cols as i32, bi.cols as i32);
        let (trans_a, lda) = op_and_ld(&ai);
        let (trans_b, ldb) = op_and_ld(&bi);
        let a_buf = &a.data()[a.start()..];
        let b_buf = &b.data()[b.start()..];
        let c_buf = c.data_mut();
        log::debug!("gemm {m}x{k}x{n} ({kind:?}): cblas");

        // SAFETY: `kind` identifies `T` exactly, so each cast is to `T` itself.
        unsafe {
            match kind {
                ScalarKind::F32 => cblas::sgemm(
                    Layout::RowMajor, trans_a, trans_b, m, n, k,
                    1.0, cast(a_buf), lda, cast(b_buf), ldb,
                    0.0, cast_mut(c_buf), n,
                ),
                ScalarKind::F64 => cblas::dgemm(
                    Layout::RowMajor, trans_a, trans_b, m, n, k,
                    1.0, cast(a_buf), lda, cast(b_buf), ldb,
                    0.0, cast_mut(c_buf), n,
                ),
                ScalarKind::C32 => cblas::cgemm(
                    Layout::RowMajor, trans_a, trans_b, m, n, k,
                    Complex32::new(1.0, 0.0), cast(a_buf), lda, cast(b_buf), ldb,
                    Complex32::new(0.0, 0.0), cast_mut(c_buf), n,
                ),
                ScalarKind::C64 => cblas::zgemm(
                    Layout::RowMajor, trans_a, trans_b, m, n, k,
                    Complex64::new(1.0, 0.0), cast(a_buf), lda, cast(b_buf), ldb,
                    Complex64::new(0.0, 0.0), cast_mut(c_buf), n,
                ),
                ScalarKind::Other => return false,
            }
        }
        true
    }

    pub(super) fn gemv<T: LinalgScalar>(
        a: &MatrixView<'_, T, 2>,
        x: &MatrixView<'_, T, 1>,
        y: &mut Matrix<T, 1>,
    ) -> bool {
        let kind = ScalarKind::of::<T>();
        let incx = x.strides()[0];
        if !kind.is_blas() || incx <= 0 {
            return false;
        }
        let Some(ai) = is_blas_matrix(a) else {
            return false;
        };
        // Column-major A is the transpose of a row-major cols x rows matrix.
        let (trans, m, n) = match ai.layout {
            BlasLayout::RowMajor => (Transpose::None, ai.rows as i32, ai.cols as i32),
            BlasLayout::ColMajor => (Transpose::Ordinary, ai.cols as i32, ai.rows as i32),
        };
        let lda = ai.ld as i32;
        let incx = incx as i32;
        let a_buf = &a.data()[a.start()..];
        let x_buf = &x.data()[x.start()..];
        let y_buf = y.data_mut();
        log::debug!("gemv {}x{} ({kind:?}): cblas", ai.rows, ai.cols);

        // SAFETY: as in `gemm`.
        unsafe {
            match kind {
                ScalarKind::F32 => cblas::sgemv(
                    Layout::RowMajor, trans, m, n, 1.0, cast(a_buf), lda,
                    cast(x_buf), incx, 0.0, cast_mut(y_buf), 1,
                ),
                ScalarKind::F64 => cblas::dgemv(
                    Layout::RowMajor, trans, m, n, 1.0, cast(a_buf), lda,
                    cast(x_buf), incx, 0.0, cast_mut(y_buf), 1,
                ),
                ScalarKind::C32 => cblas::cgemv(
                    Layout::RowMajor, trans, m, n, Complex32::new(1.0, 0.0), cast(a_buf), lda,
                    cast(x_buf), incx, Complex32::new(0.0, 0.0), cast_mut(y_buf), 1,
                ),
                ScalarKind::C64 => cblas::zgemv(
                    Layout::RowMajor, trans, m, n, Complex64::new(1.0, 0.0), cast(a_buf), lda,
                    cast(x_buf), incx, Complex64::new(0.0, 0.0), cast_mut(y_buf), 1,
                ),
                ScalarKind::Other => return false,
            }
        }
        true
    }

    pub(super) fn copy<T: LinalgScalar>(from: &[T], to: &mut [T]) -> bool {
        let kind = ScalarKind::of::<T>();
        if !kind.is_blas() || from.is_empty() {
            return false;
        }
        let n = from.len() as i32;
        // SAFETY: as in `gemm`.
        unsafe {
            match kind {
                ScalarKind::F32 => cblas::scopy(n, cast(from), 1, cast_mut(to), 1),
                ScalarKind::F64 => cblas::dcopy(n, cast(from), 1, cast_mut(to), 1),
                ScalarKind::C32 => cblas::ccopy(n, cast(from), 1, cast_mut(to), 1),
                ScalarKind::C64 => cblas::zcopy(n, cast(from), 1, cast_mut(to), 1),
                ScalarKind::Other => return false,
            }
        }
        true
    }

    pub(super) fn iamax<T: LinalgScalar>(x: &MatrixView<'_, T, 1>) -> Option<usize> {
        let kind = ScalarKind::of::<T>();
        let incx = x.strides()[0];
        if !kind.is_blas() || incx <= 0 {
            return None;
        }
        let n = x.len() as i32;
        let incx = incx as i32;
        let buf = &x.data()[x.start()..];
        // SAFETY: as in `gemm`.
        let i = unsafe {
            match kind {
                ScalarKind::F32 => cblas::isamax(n, cast(buf), incx) as usize,
                ScalarKind::F64 => cblas::idamax(n, cast(buf), incx) as usize,
                ScalarKind::C32 => cblas::icamax(n, cast(buf), incx) as usize,
                ScalarKind::C64 => cblas::izamax(n, cast(buf), incx) as usize,
                ScalarKind::Other => return None,
            }
        };
        Some(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_kind() {
        assert_eq!(ScalarKind::of::<f32>(), ScalarKind::F32);
        assert_eq!(ScalarKind::of::<f64>(), ScalarKind::F64);
        assert_eq!(ScalarKind::of::<Complex32>(), ScalarKind::C32);
        assert_eq!(ScalarKind::of::<Complex64>(), ScalarKind::C64);
        assert_eq!(ScalarKind::of::<i32>(), ScalarKind::Other);
        assert!(!ScalarKind::of::<u8>().is_blas());
    }

    #[test]
    fn test_is_blas_matrix_row_major() {
        let data: Vec<f64> = (0..12).map(|x| x as f64).collect();
        let view = MatrixView::new(&data, [3, 4], [4, 1], 0).unwrap();
        let info = is_blas_matrix(&view).unwrap();
        assert_eq!(info.layout, BlasLayout::RowMajor);
        assert_eq!((info.rows, info.cols, info.ld), (3, 4, 4));
    }

    #[test]
    fn test_is_blas_matrix_col_major() {
        let data: Vec<f64> = (0..12).map(|x| x as f64).collect();
        let view = MatrixView::new(&data, [3, 4], [1, 3], 0).unwrap();
        let info = is_blas_matrix(&view).unwrap();
        assert_eq!(info.layout, BlasLayout::ColMajor);
        assert_eq!(info.ld, 3);
    }

    #[test]
    fn test_is_blas_matrix_rejects_strided() {
        let data: Vec<f64> = (0..12).map(|x| x as f64).collect();
        let view = MatrixView::new(&data, [3, 2], [4, 2], 0).unwrap();
        assert!(is_blas_matrix(&view).is_none());
    }

    #[test]
    fn test_generic_gemm_strided() {
        let data: Vec<i64> = (1..=6).collect();
        // A = [[1, 2, 3], [4, 5, 6]] read through its transpose layout.
        let a = MatrixView::new(&data, [3, 2], [1, 3], 0).unwrap();
        let b = MatrixView::new(&data, [2, 3], [3, 1], 0).unwrap();
        let c = gemm(&a, &b);
        assert_eq!(
            c.data(),
            &[17, 22, 27, 22, 29, 36, 27, 36, 45]
        );
    }

    #[test]
    fn test_gemv() {
        let data: Vec<f64> = (1..=6).map(|x| x as f64).collect();
        let a = MatrixView::new(&data, [2, 3], [3, 1], 0).unwrap();
        let xs = [1.0, 0.0, -1.0];
        let x = MatrixView::new(&xs, [3], [1], 0).unwrap();
        let y = gemv(&a, &x);
        assert_eq!(y.data(), &[-2.0, -2.0]);
    }

    #[test]
    fn test_iamax() {
        let xs = [1.0, -7.0, 7.0, 3.0];
        let x = MatrixView::new(&xs, [4], [1], 0).unwrap();
        assert_eq!(iamax(&x), Some(1));
        let empty: [f64; 0] = [];
        assert_eq!(iamax(&MatrixView::new(&empty, [0], [1], 0).unwrap()), None);
    }

    #[test]
    fn test_complex_magnitude() {
        assert_eq!(Complex64::new(-3.0, 4.0).magnitude(), 7.0);
        assert_eq!((-5i32).magnitude(), 5.0);
    }

    #[test]
    fn test_copy_strided() {
        let src: Vec<i32> = (0..6).collect();
        let s = MatrixView::new(&src, [2, 3], [3, 1], 0).unwrap();
        let mut dst = vec![0; 6];
        let mut d = MatrixViewMut::new(&mut dst, [2, 3], [1, 2], 0).unwrap();
        copy(&s, &mut d);
        assert_eq!(dst, vec![0, 3, 1, 4, 2, 5]);
    }
}
