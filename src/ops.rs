//! Arithmetic operators for matrices and views.
//!
//! Compound operators (`+=`, `-=`, `*=`, `/=`, `%=`) work in place on
//! [`Matrix`] and [`MatrixViewMut`], with a scalar or an array of equal
//! extents on the right. Any matrix or view, mutable or not, can be either
//! operand. Binary operators copy the left operand into a new
//! packed [`Matrix`] and then apply the compound operator to it.
//!
//! Shape mismatches between array operands panic.

use crate::matrix::Matrix;
use crate::view::{AsMatrixView, AsMatrixViewMut, MatrixView, MatrixViewMut};
use num_complex::Complex;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Rem, RemAssign, Sub, SubAssign};

/// Element types usable as the scalar operand of an array operator.
pub trait ScalarOperand: 'static + Copy {}

macro_rules! impl_scalar_operand {
    ($($s:ty),* $(,)?) => {$(
        impl ScalarOperand for $s {}
    )*};
}

impl_scalar_operand!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    Complex<f32>, Complex<f64>,
);

/// Left operands of binary operators, turned into the result container.
trait IntoOwnedMatrix<T, const N: usize> {
    fn into_owned_matrix(self) -> Matrix<T, N>;
}

impl<T, const N: usize> IntoOwnedMatrix<T, N> for Matrix<T, N> {
    fn into_owned_matrix(self) -> Matrix<T, N> {
        self
    }
}

impl<'l, T: Clone, const N: usize> IntoOwnedMatrix<T, N> for &'l Matrix<T, N> {
    fn into_owned_matrix(self) -> Matrix<T, N> {
        self.clone()
    }
}

impl<'v, T: Clone, const N: usize> IntoOwnedMatrix<T, N> for MatrixView<'v, T, N> {
    fn into_owned_matrix(self) -> Matrix<T, N> {
        self.to_matrix()
    }
}

impl<'l, 'v, T: Clone, const N: usize> IntoOwnedMatrix<T, N> for &'l MatrixView<'v, T, N> {
    fn into_owned_matrix(self) -> Matrix<T, N> {
        self.to_matrix()
    }
}

impl<'v, T: Clone, const N: usize> IntoOwnedMatrix<T, N> for MatrixViewMut<'v, T, N> {
    fn into_owned_matrix(self) -> Matrix<T, N> {
        self.as_view().to_matrix()
    }
}

impl<'l, 'v, T: Clone, const N: usize> IntoOwnedMatrix<T, N> for &'l MatrixViewMut<'v, T, N> {
    fn into_owned_matrix(self) -> Matrix<T, N> {
        self.as_view().to_matrix()
    }
}

fn zip_assign<T, L, R, F, const N: usize>(lhs: &mut L, rhs: &R, f: F)
where
    L: AsMatrixViewMut<T, N> + ?Sized,
    R: AsMatrixView<T, N> + ?Sized,
    F: FnMut(&mut T, &T),
{
    if let Err(err) = lhs.view_mut().zip_apply(rhs, f) {
        panic!("{err}");
    }
}

macro_rules! impl_elementwise_op {
    ($trt:ident, $mth:ident, $assign_trt:ident, $assign_mth:ident) => {
        impl<T, const N: usize> $assign_trt<T> for Matrix<T, N>
        where
            T: ScalarOperand + $assign_trt,
        {
            fn $assign_mth(&mut self, rhs: T) {
                self.apply(|x| $assign_trt::$assign_mth(x, rhs));
            }
        }

        impl<'a, T, const N: usize> $assign_trt<T> for MatrixViewMut<'a, T, N>
        where
            T: ScalarOperand + $assign_trt,
        {
            fn $assign_mth(&mut self, rhs: T) {
                self.apply(|x| $assign_trt::$assign_mth(x, rhs));
            }
        }

        impl_elementwise_op!(@compound $assign_trt, $assign_mth, [] Matrix<T, N>);
        impl_elementwise_op!(@compound $assign_trt, $assign_mth, ['a] MatrixViewMut<'a, T, N>);

        impl_elementwise_op!(@binary $trt, $mth, $assign_trt, $assign_mth, [] Matrix<T, N>);
        impl_elementwise_op!(@binary $trt, $mth, $assign_trt, $assign_mth, ['l] &'l Matrix<T, N>);
        impl_elementwise_op!(@binary $trt, $mth, $assign_trt, $assign_mth, ['v] MatrixView<'v, T, N>);
        impl_elementwise_op!(@binary $trt, $mth, $assign_trt, $assign_mth, ['l, 'v] &'l MatrixView<'v, T, N>);
        impl_elementwise_op!(@binary $trt, $mth, $assign_trt, $assign_mth, ['v] MatrixViewMut<'v, T, N>);
        impl_elementwise_op!(@binary $trt, $mth, $assign_trt, $assign_mth, ['l, 'v] &'l MatrixViewMut<'v, T, N>);
    };

    (@compound $assign_trt:ident, $assign_mth:ident, [$($lt:lifetime),*] $lhs:ty) => {
        impl<$($lt,)* T, const N: usize> $assign_trt<Matrix<T, N>> for $lhs
        where
            T: Clone + $assign_trt,
        {
            fn $assign_mth(&mut self, rhs: Matrix<T, N>) {
                zip_assign(self, &rhs, |x, y| $assign_trt::$assign_mth(x, y.clone()));
            }
        }

        impl<$($lt,)* 'r, T, const N: usize> $assign_trt<&'r Matrix<T, N>> for $lhs
        where
            T: Clone + $assign_trt,
        {
            fn $assign_mth(&mut self, rhs: &'r Matrix<T, N>) {
                zip_assign(self, rhs, |x, y| $assign_trt::$assign_mth(x, y.clone()));
            }
        }

        impl<$($lt,)* 'w, T, const N: usize> $assign_trt<MatrixView<'w, T, N>> for $lhs
        where
            T: Clone + $assign_trt,
        {
            fn $assign_mth(&mut self, rhs: MatrixView<'w, T, N>) {
                zip_assign(self, &rhs, |x, y| $assign_trt::$assign_mth(x, y.clone()));
            }
        }

        impl<$($lt,)* 'r, 'w, T, const N: usize> $assign_trt<&'r MatrixView<'w, T, N>> for $lhs
        where
            T: Clone + $assign_trt,
        {
            fn $assign_mth(&mut self, rhs: &'r MatrixView<'w, T, N>) {
                zip_assign(self, rhs, |x, y| $assign_trt::$assign_mth(x, y.clone()));
            }
        }

        impl<$($lt,)* 'w, T, const N: usize> $assign_trt<MatrixViewMut<'w, T, N>> for $lhs
        where
            T: Clone + $assign_trt,
        {
            fn $assign_mth(&mut self, rhs: MatrixViewMut<'w, T, N>) {
                zip_assign(self, &rhs, |x, y| $assign_trt::$assign_mth(x, y.clone()));
            }
        }

        impl<$($lt,)* 'r, 'w, T, const N: usize> $assign_trt<&'r MatrixViewMut<'w, T, N>> for $lhs
        where
            T: Clone + $assign_trt,
        {
            fn $assign_mth(&mut self, rhs: &'r MatrixViewMut<'w, T, N>) {
                zip_assign(self, rhs, |x, y| $assign_trt::$assign_mth(x, y.clone()));
            }
        }
    };

    (@binary $trt:ident, $mth:ident, $assign_trt:ident, $assign_mth:ident, [$($lt:lifetime),*] $lhs:ty) => {
        impl<$($lt,)* T, const N: usize> $trt<T> for $lhs
        where
            T: ScalarOperand + $assign_trt,
        {
            type Output = Matrix<T, N>;

            fn $mth(self, rhs: T) -> Matrix<T, N> {
                let mut out = self.into_owned_matrix();
                $assign_trt::$assign_mth(&mut out, rhs);
                out
            }
        }

        impl<$($lt,)* T, const N: usize> $trt<Matrix<T, N>> for $lhs
        where
            T: Clone + $assign_trt,
        {
            type Output = Matrix<T, N>;

            fn $mth(self, rhs: Matrix<T, N>) -> Matrix<T, N> {
                let mut out = self.into_owned_matrix();
                $assign_trt::$assign_mth(&mut out, &rhs);
                out
            }
        }

        impl<$($lt,)* 'r, T, const N: usize> $trt<&'r Matrix<T, N>> for $lhs
        where
            T: Clone + $assign_trt,
        {
            type Output = Matrix<T, N>;

            fn $mth(self, rhs: &'r Matrix<T, N>) -> Matrix<T, N> {
                let mut out = self.into_owned_matrix();
                $assign_trt::$assign_mth(&mut out, rhs);
                out
            }
        }

        impl<$($lt,)* 'w, T, const N: usize> $trt<MatrixView<'w, T, N>> for $lhs
        where
            T: Clone + $assign_trt,
        {
            type Output = Matrix<T, N>;

            fn $mth(self, rhs: MatrixView<'w, T, N>) -> Matrix<T, N> {
                let mut out = self.into_owned_matrix();
                $assign_trt::$assign_mth(&mut out, rhs);
                out
            }
        }

        impl<$($lt,)* 'r, 'w, T, const N: usize> $trt<&'r MatrixView<'w, T, N>> for $lhs
        where
            T: Clone + $assign_trt,
        {
            type Output = Matrix<T, N>;

            fn $mth(self, rhs: &'r MatrixView<'w, T, N>) -> Matrix<T, N> {
                let mut out = self.into_owned_matrix();
                $assign_trt::$assign_mth(&mut out, rhs);
                out
            }
        }

        impl<$($lt,)* 'w, T, const N: usize> $trt<MatrixViewMut<'w, T, N>> for $lhs
        where
            T: Clone + $assign_trt,
        {
            type Output = Matrix<T, N>;

            fn $mth(self, rhs: MatrixViewMut<'w, T, N>) -> Matrix<T, N> {
                let mut out = self.into_owned_matrix();
                $assign_trt::$assign_mth(&mut out, rhs);
                out
            }
        }

        impl<$($lt,)* 'r, 'w, T, const N: usize> $trt<&'r MatrixViewMut<'w, T, N>> for $lhs
        where
            T: Clone + $assign_trt,
        {
            type Output = Matrix<T, N>;

            fn $mth(self, rhs: &'r MatrixViewMut<'w, T, N>) -> Matrix<T, N> {
                let mut out = self.into_owned_matrix();
                $assign_trt::$assign_mth(&mut out, rhs);
                out
            }
        }
    };
}

impl_elementwise_op!(Add, add, AddAssign, add_assign);
impl_elementwise_op!(Sub, sub, SubAssign, sub_assign);
impl_elementwise_op!(Mul, mul, MulAssign, mul_assign);
impl_elementwise_op!(Div, div, DivAssign, div_assign);
impl_elementwise_op!(Rem, rem, RemAssign, rem_assign);

// Scalar on the left: `k op A` is `k op a` for every element `a`.
macro_rules! impl_scalar_lhs_op {
    ($($s:ty),* $(,)?) => {$(
        impl_scalar_lhs_op!(@op $s, Add, add);
        impl_scalar_lhs_op!(@op $s, Sub, sub);
        impl_scalar_lhs_op!(@op $s, Mul, mul);
        impl_scalar_lhs_op!(@op $s, Div, div);
        impl_scalar_lhs_op!(@op $s, Rem, rem);
    )*};

    (@op $s:ty, $trt:ident, $mth:ident) => {
        impl<const N: usize> $trt<Matrix<$s, N>> for $s {
            type Output = Matrix<$s, N>;

            fn $mth(self, mut rhs: Matrix<$s, N>) -> Matrix<$s, N> {
                rhs.apply(|x| *x = $trt::$mth(self, *x));
                rhs
            }
        }

        impl<'r, const N: usize> $trt<&'r Matrix<$s, N>> for $s {
            type Output = Matrix<$s, N>;

            fn $mth(self, rhs: &'r Matrix<$s, N>) -> Matrix<$s, N> {
                rhs.map(|&x| $trt::$mth(self, x))
            }
        }

        impl<'w, const N: usize> $trt<MatrixView<'w, $s, N>> for $s {
            type Output = Matrix<$s, N>;

            fn $mth(self, rhs: MatrixView<'w, $s, N>) -> Matrix<$s, N> {
                rhs.map(|&x| $trt::$mth(self, x))
            }
        }

        impl<'r, 'w, const N: usize> $trt<&'r MatrixView<'w, $s, N>> for $s {
            type Output = Matrix<$s, N>;

            fn $mth(self, rhs: &'r MatrixView<'w, $s, N>) -> Matrix<$s, N> {
                rhs.map(|&x| $trt::$mth(self, x))
            }
        }

        impl<'w, const N: usize> $trt<MatrixViewMut<'w, $s, N>> for $s {
            type Output = Matrix<$s, N>;

            fn $mth(self, rhs: MatrixViewMut<'w, $s, N>) -> Matrix<$s, N> {
                rhs.as_view().map(|&x| $trt::$mth(self, x))
            }
        }

        impl<'r, 'w, const N: usize> $trt<&'r MatrixViewMut<'w, $s, N>> for $s {
            type Output = Matrix<$s, N>;

            fn $mth(self, rhs: &'r MatrixViewMut<'w, $s, N>) -> Matrix<$s, N> {
                rhs.as_view().map(|&x| $trt::$mth(self, x))
            }
        }
    };
}

impl_scalar_lhs_op!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    Complex<f32>, Complex<f64>,
);
