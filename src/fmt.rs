//! Nested-bracket `Display` for matrices and views.
//!
//! A rank-2 matrix prints as `[[1, 2, 3], [4, 5, 6]]`; a rank-0 view prints
//! its element. Format flags such as precision apply to every element.

use crate::matrix::Matrix;
use crate::view::{MatrixView, MatrixViewMut};
use std::fmt::{self, Display};

fn write_nested<T: Display>(
    f: &mut fmt::Formatter<'_>,
    data: &[T],
    extents: &[usize],
    strides: &[isize],
    pos: isize,
) -> fmt::Result {
    let Some((&extent, inner_extents)) = extents.split_first() else {
        return Display::fmt(&data[pos as usize], f);
    };
    let (&stride, inner_strides) = strides
        .split_first()
        .ok_or(fmt::Error)?;
    f.write_str("[")?;
    for i in 0..extent {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_nested(f, data, inner_extents, inner_strides, pos + i as isize * stride)?;
    }
    f.write_str("]")
}

impl<'a, T: Display, const N: usize> Display for MatrixView<'a, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nested(
            f,
            self.data(),
            self.extents(),
            self.strides(),
            self.start() as isize,
        )
    }
}

impl<'a, T: Display, const N: usize> Display for MatrixViewMut<'a, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.as_view(), f)
    }
}

impl<T: Display, const N: usize> Display for Matrix<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.view(), f)
    }
}
