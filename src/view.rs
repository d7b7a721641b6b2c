//! Borrowed strided views.
//!
//! [`MatrixView`] and [`MatrixViewMut`] pair a borrowed buffer with a
//! [`Descriptor`]. Slicing and row/column access derive new descriptors over
//! the same buffer, so writes through a mutable view land in the parent.

use crate::descriptor::Descriptor;
use crate::iter::{Iter, IterMut};
use crate::matrix::Matrix;
use crate::slice::DimSpec;
use crate::{MatrixError, Result};
use std::fmt;
use std::ops::{Deref, DerefMut, Index, IndexMut};

/// An immutable strided view over a buffer.
///
/// # Example
/// ```rust
/// use strided_matrix::MatrixView;
///
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
/// let view: MatrixView<'_, f64, 2> = MatrixView::new(&data, [2, 3], [3, 1], 0).unwrap();
/// assert_eq!(view[[1, 0]], 4.0);
/// ```
pub struct MatrixView<'a, T, const N: usize> {
    data: &'a [T],
    desc: Descriptor<N>,
}

/// A mutable strided view over a buffer.
///
/// The descriptor never reaches the same element twice, so element
/// references handed out by [`iter_mut`](Self::iter_mut) are disjoint.
pub struct MatrixViewMut<'a, T, const N: usize> {
    data: &'a mut [T],
    desc: Descriptor<N>,
}

impl<'a, T, const N: usize> Clone for MatrixView<'a, T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T, const N: usize> Copy for MatrixView<'a, T, N> {}

impl<'a, T, const N: usize> fmt::Debug for MatrixView<'a, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatrixView")
            .field("extents", self.desc.extents())
            .field("strides", self.desc.strides())
            .field("start", &self.desc.start())
            .finish()
    }
}

impl<'a, T, const N: usize> fmt::Debug for MatrixViewMut<'a, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatrixViewMut")
            .field("extents", self.desc.extents())
            .field("strides", self.desc.strides())
            .field("start", &self.desc.start())
            .finish()
    }
}

// ============================================================================
// MatrixView
// ============================================================================

impl<'a, T, const N: usize> MatrixView<'a, T, N> {
    /// Create a view from explicit extents, strides and start offset.
    ///
    /// # Errors
    /// Returns [`MatrixError::OffsetOverflow`] if the view would reach outside `data`.
    pub fn new(
        data: &'a [T],
        extents: [usize; N],
        strides: [isize; N],
        start: usize,
    ) -> Result<Self> {
        Self::from_descriptor(data, Descriptor::new(start, extents, strides))
    }

    /// Create a view from a descriptor, checking it against `data`.
    pub fn from_descriptor(data: &'a [T], desc: Descriptor<N>) -> Result<Self> {
        desc.validate(data.len())?;
        Ok(Self { data, desc })
    }

    /// `desc` must already be valid for `data`.
    pub(crate) fn from_parts(data: &'a [T], desc: Descriptor<N>) -> Self {
        Self { data, desc }
    }

    #[inline]
    pub fn descriptor(&self) -> &Descriptor<N> {
        &self.desc
    }

    #[inline]
    pub fn extents(&self) -> &[usize; N] {
        self.desc.extents()
    }

    #[inline]
    pub fn strides(&self) -> &[isize; N] {
        self.desc.strides()
    }

    /// Offset of the first element in the underlying buffer.
    #[inline]
    pub fn start(&self) -> usize {
        self.desc.start()
    }

    /// Extent of one axis.
    #[inline]
    pub fn extent(&self, axis: usize) -> usize {
        self.desc.extent(axis)
    }

    /// Extent of axis 0.
    pub fn nrows(&self) -> usize {
        self.desc.extent(0)
    }

    /// Extent of axis 1.
    pub fn ncols(&self) -> usize {
        self.desc.extent(1)
    }

    /// Total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.desc.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.desc.size() == 0
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        N
    }

    /// The whole underlying buffer, not just the addressed elements.
    #[inline]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// True if the elements are packed row-major.
    pub fn is_contiguous(&self) -> bool {
        self.desc.is_contiguous()
    }

    /// The addressed elements as one slice, if they are packed row-major.
    pub fn as_slice(&self) -> Option<&'a [T]> {
        if !self.is_contiguous() {
            return None;
        }
        if self.is_empty() {
            return Some(&[]);
        }
        let start = self.desc.start();
        Some(&self.data[start..start + self.len()])
    }

    /// Bounds-checked element access.
    pub fn get(&self, index: [usize; N]) -> Option<&'a T> {
        self.desc.checked_offset(&index).map(|pos| &self.data[pos])
    }

    /// Iterate in row-major order.
    pub fn iter(&self) -> Iter<'a, T, N> {
        Iter::new(self.data, self.desc)
    }

    /// Sub-view selected by one [`DimSpec`] per axis.
    ///
    /// # Errors
    /// Returns an error if an argument lies outside its axis or `M` does not
    /// match the number of kept axes.
    pub fn try_slice<const M: usize>(&self, specs: &[DimSpec]) -> Result<MatrixView<'a, T, M>> {
        Ok(MatrixView {
            data: self.data,
            desc: self.desc.slice(specs)?,
        })
    }

    /// Sub-view selected by one [`DimSpec`] per axis.
    ///
    /// # Panics
    /// Panics where [`try_slice`](Self::try_slice) returns an error.
    pub fn slice<const M: usize>(&self, specs: &[DimSpec]) -> MatrixView<'a, T, M> {
        self.try_slice(specs).unwrap_or_else(|err| panic!("{err}"))
    }

    fn fixed_axis<const M: usize>(&self, axis: usize, index: usize) -> MatrixView<'a, T, M> {
        match self.desc.slice_dim(axis, index) {
            Ok(desc) => MatrixView {
                data: self.data,
                desc,
            },
            Err(err) => panic!("{err}"),
        }
    }

    /// Copy the addressed elements into a new packed [`Matrix`].
    pub fn to_matrix(&self) -> Matrix<T, N>
    where
        T: Clone,
    {
        Matrix::from_parts(*self.extents(), self.iter().cloned().collect())
    }
}

impl<'a, T> MatrixView<'a, T, 2> {
    /// Transposed view. No data is moved.
    pub fn t(&self) -> MatrixView<'a, T, 2> {
        MatrixView {
            data: self.data,
            desc: self.desc.swap_axes(0, 1),
        }
    }
}

impl<'a, T, const N: usize> Index<[usize; N]> for MatrixView<'a, T, N> {
    type Output = T;

    fn index(&self, index: [usize; N]) -> &T {
        match self.desc.checked_offset(&index) {
            Some(pos) => &self.data[pos],
            None => panic!("index {index:?} out of bounds for extents {:?}", self.extents()),
        }
    }
}

impl<'a, T> Index<usize> for MatrixView<'a, T, 1> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self[[index]]
    }
}

impl<'a, T> Deref for MatrixView<'a, T, 0> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data[self.desc.start()]
    }
}

// ============================================================================
// MatrixViewMut
// ============================================================================

impl<'a, T, const N: usize> MatrixViewMut<'a, T, N> {
    /// Create a mutable view from explicit extents, strides and start offset.
    ///
    /// # Errors
    /// Returns [`MatrixError::OffsetOverflow`] if the view would reach outside
    /// `data`, or [`MatrixError::OverlappingStrides`] if two indices would
    /// reach the same element.
    pub fn new(
        data: &'a mut [T],
        extents: [usize; N],
        strides: [isize; N],
        start: usize,
    ) -> Result<Self> {
        Self::from_descriptor(data, Descriptor::new(start, extents, strides))
    }

    /// Create a mutable view from a descriptor, checking it against `data`.
    pub fn from_descriptor(data: &'a mut [T], desc: Descriptor<N>) -> Result<Self> {
        desc.validate(data.len())?;
        desc.check_disjoint()?;
        Ok(Self { data, desc })
    }

    /// `desc` must be valid for `data` and disjoint.
    pub(crate) fn from_parts(data: &'a mut [T], desc: Descriptor<N>) -> Self {
        Self { data, desc }
    }

    #[inline]
    pub fn descriptor(&self) -> &Descriptor<N> {
        &self.desc
    }

    #[inline]
    pub fn extents(&self) -> &[usize; N] {
        self.desc.extents()
    }

    #[inline]
    pub fn strides(&self) -> &[isize; N] {
        self.desc.strides()
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.desc.start()
    }

    #[inline]
    pub fn extent(&self, axis: usize) -> usize {
        self.desc.extent(axis)
    }

    pub fn nrows(&self) -> usize {
        self.desc.extent(0)
    }

    pub fn ncols(&self) -> usize {
        self.desc.extent(1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.desc.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.desc.size() == 0
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        N
    }

    /// Reborrow as an immutable view.
    #[inline]
    pub fn as_view(&self) -> MatrixView<'_, T, N> {
        MatrixView {
            data: self.data,
            desc: self.desc,
        }
    }

    /// Reborrow as a shorter-lived mutable view.
    #[inline]
    pub fn reborrow(&mut self) -> MatrixViewMut<'_, T, N> {
        MatrixViewMut {
            data: &mut *self.data,
            desc: self.desc,
        }
    }

    /// Convert into an immutable view with the full lifetime.
    pub fn into_view(self) -> MatrixView<'a, T, N> {
        MatrixView {
            data: self.data,
            desc: self.desc,
        }
    }

    pub fn is_contiguous(&self) -> bool {
        self.desc.is_contiguous()
    }

    /// The addressed elements as one mutable slice, if they are packed row-major.
    pub fn as_slice_mut(&mut self) -> Option<&mut [T]> {
        if !self.is_contiguous() {
            return None;
        }
        if self.is_empty() {
            return Some(&mut []);
        }
        let start = self.desc.start();
        let len = self.len();
        Some(&mut self.data[start..start + len])
    }

    pub fn get(&self, index: [usize; N]) -> Option<&T> {
        self.desc.checked_offset(&index).map(|pos| &self.data[pos])
    }

    pub fn get_mut(&mut self, index: [usize; N]) -> Option<&mut T> {
        match self.desc.checked_offset(&index) {
            Some(pos) => Some(&mut self.data[pos]),
            None => None,
        }
    }

    pub fn iter(&self) -> Iter<'_, T, N> {
        Iter::new(self.data, self.desc)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T, N> {
        IterMut::new(&mut *self.data, self.desc)
    }

    /// Immutable sub-view; see [`MatrixView::try_slice`].
    pub fn try_slice<const M: usize>(&self, specs: &[DimSpec]) -> Result<MatrixView<'_, T, M>> {
        self.as_view().try_slice(specs)
    }

    pub fn slice<const M: usize>(&self, specs: &[DimSpec]) -> MatrixView<'_, T, M> {
        self.as_view().slice(specs)
    }

    /// Mutable sub-view. Writes go to the parent buffer.
    pub fn try_slice_mut<const M: usize>(
        &mut self,
        specs: &[DimSpec],
    ) -> Result<MatrixViewMut<'_, T, M>> {
        let desc = self.desc.slice(specs)?;
        Ok(MatrixViewMut {
            data: &mut *self.data,
            desc,
        })
    }

    /// Mutable sub-view.
    ///
    /// # Panics
    /// Panics where [`try_slice_mut`](Self::try_slice_mut) returns an error.
    pub fn slice_mut<const M: usize>(&mut self, specs: &[DimSpec]) -> MatrixViewMut<'_, T, M> {
        self.try_slice_mut(specs).unwrap_or_else(|err| panic!("{err}"))
    }

    fn fixed_axis_mut<const M: usize>(
        &mut self,
        axis: usize,
        index: usize,
    ) -> MatrixViewMut<'_, T, M> {
        match self.desc.slice_dim(axis, index) {
            Ok(desc) => MatrixViewMut {
                data: &mut *self.data,
                desc,
            },
            Err(err) => panic!("{err}"),
        }
    }

    pub fn to_matrix(&self) -> Matrix<T, N>
    where
        T: Clone,
    {
        self.as_view().to_matrix()
    }
}

impl<'a, T> MatrixViewMut<'a, T, 2> {
    /// Transposed mutable view.
    pub fn t_mut(&mut self) -> MatrixViewMut<'_, T, 2> {
        MatrixViewMut {
            data: &mut *self.data,
            desc: self.desc.swap_axes(0, 1),
        }
    }
}

impl<'a, T, const N: usize> Index<[usize; N]> for MatrixViewMut<'a, T, N> {
    type Output = T;

    fn index(&self, index: [usize; N]) -> &T {
        match self.desc.checked_offset(&index) {
            Some(pos) => &self.data[pos],
            None => panic!("index {index:?} out of bounds for extents {:?}", self.extents()),
        }
    }
}

impl<'a, T, const N: usize> IndexMut<[usize; N]> for MatrixViewMut<'a, T, N> {
    fn index_mut(&mut self, index: [usize; N]) -> &mut T {
        match self.desc.checked_offset(&index) {
            Some(pos) => &mut self.data[pos],
            None => panic!("index {index:?} out of bounds for extents {:?}", self.desc.extents()),
        }
    }
}

impl<'a, T> Index<usize> for MatrixViewMut<'a, T, 1> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self[[index]]
    }
}

impl<'a, T> IndexMut<usize> for MatrixViewMut<'a, T, 1> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self[[index]]
    }
}

impl<'a, T> Deref for MatrixViewMut<'a, T, 0> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data[self.desc.start()]
    }
}

impl<'a, T> DerefMut for MatrixViewMut<'a, T, 0> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.data[self.desc.start()]
    }
}

// ============================================================================
// Rank-reducing row / column access
// ============================================================================

macro_rules! impl_row {
    ($($n:literal => $m:literal),* $(,)?) => {$(
        impl<'a, T> MatrixView<'a, T, $n> {
            /// View of position `n` along axis 0, with that axis removed.
            ///
            /// # Panics
            /// Panics if `n` is not below the extent of axis 0.
            pub fn row(&self, n: usize) -> MatrixView<'a, T, $m> {
                self.fixed_axis(0, n)
            }
        }

        impl<'a, T> MatrixViewMut<'a, T, $n> {
            pub fn row(&self, n: usize) -> MatrixView<'_, T, $m> {
                self.as_view().fixed_axis(0, n)
            }

            /// Mutable view of position `n` along axis 0.
            pub fn row_mut(&mut self, n: usize) -> MatrixViewMut<'_, T, $m> {
                self.fixed_axis_mut(0, n)
            }
        }

        impl<T> Matrix<T, $n> {
            /// View of position `n` along axis 0, with that axis removed.
            pub fn row(&self, n: usize) -> MatrixView<'_, T, $m> {
                self.view().fixed_axis(0, n)
            }

            pub fn row_mut(&mut self, n: usize) -> MatrixViewMut<'_, T, $m> {
                let desc = self.descriptor().slice_dim(0, n).unwrap_or_else(|err| panic!("{err}"));
                MatrixViewMut::from_parts(self.data_mut(), desc)
            }
        }
    )*};
}

macro_rules! impl_col {
    ($($n:literal => $m:literal),* $(,)?) => {$(
        impl<'a, T> MatrixView<'a, T, $n> {
            /// View of position `n` along axis 1, with that axis removed.
            ///
            /// # Panics
            /// Panics if `n` is not below the extent of axis 1.
            pub fn col(&self, n: usize) -> MatrixView<'a, T, $m> {
                self.fixed_axis(1, n)
            }
        }

        impl<'a, T> MatrixViewMut<'a, T, $n> {
            pub fn col(&self, n: usize) -> MatrixView<'_, T, $m> {
                self.as_view().fixed_axis(1, n)
            }

            pub fn col_mut(&mut self, n: usize) -> MatrixViewMut<'_, T, $m> {
                self.fixed_axis_mut(1, n)
            }
        }

        impl<T> Matrix<T, $n> {
            /// View of position `n` along axis 1, with that axis removed.
            pub fn col(&self, n: usize) -> MatrixView<'_, T, $m> {
                self.view().fixed_axis(1, n)
            }

            pub fn col_mut(&mut self, n: usize) -> MatrixViewMut<'_, T, $m> {
                let desc = self.descriptor().slice_dim(1, n).unwrap_or_else(|err| panic!("{err}"));
                MatrixViewMut::from_parts(self.data_mut(), desc)
            }
        }
    )*};
}

impl_row!(1 => 0, 2 => 1, 3 => 2, 4 => 3, 5 => 4, 6 => 5);
impl_col!(2 => 1, 3 => 2, 4 => 3, 5 => 4, 6 => 5);

// ============================================================================
// Conversion traits
// ============================================================================

/// Anything that can lend an immutable strided view of rank `N`.
pub trait AsMatrixView<T, const N: usize> {
    fn view(&self) -> MatrixView<'_, T, N>;
}

/// Anything that can lend a mutable strided view of rank `N`.
pub trait AsMatrixViewMut<T, const N: usize>: AsMatrixView<T, N> {
    fn view_mut(&mut self) -> MatrixViewMut<'_, T, N>;
}

impl<T, const N: usize> AsMatrixView<T, N> for Matrix<T, N> {
    fn view(&self) -> MatrixView<'_, T, N> {
        Matrix::view(self)
    }
}

impl<T, const N: usize> AsMatrixViewMut<T, N> for Matrix<T, N> {
    fn view_mut(&mut self) -> MatrixViewMut<'_, T, N> {
        Matrix::view_mut(self)
    }
}

impl<'a, T, const N: usize> AsMatrixView<T, N> for MatrixView<'a, T, N> {
    fn view(&self) -> MatrixView<'_, T, N> {
        *self
    }
}

impl<'a, T, const N: usize> AsMatrixView<T, N> for MatrixViewMut<'a, T, N> {
    fn view(&self) -> MatrixView<'_, T, N> {
        self.as_view()
    }
}

impl<'a, T, const N: usize> AsMatrixViewMut<T, N> for MatrixViewMut<'a, T, N> {
    fn view_mut(&mut self) -> MatrixViewMut<'_, T, N> {
        self.reborrow()
    }
}

// ============================================================================
// Equality: same extents and equal elements in iteration order
// ============================================================================

fn views_equal<T: PartialEq, const N: usize>(a: &MatrixView<'_, T, N>, b: &MatrixView<'_, T, N>) -> bool {
    a.extents() == b.extents() && a.iter().eq(b.iter())
}

impl<'a, 'b, T: PartialEq, const N: usize> PartialEq<MatrixView<'b, T, N>> for MatrixView<'a, T, N> {
    fn eq(&self, other: &MatrixView<'b, T, N>) -> bool {
        views_equal(self, other)
    }
}

impl<'a, T: PartialEq, const N: usize> PartialEq<Matrix<T, N>> for MatrixView<'a, T, N> {
    fn eq(&self, other: &Matrix<T, N>) -> bool {
        views_equal(self, &other.view())
    }
}

impl<'a, T: PartialEq, const N: usize> PartialEq<MatrixView<'a, T, N>> for Matrix<T, N> {
    fn eq(&self, other: &MatrixView<'a, T, N>) -> bool {
        views_equal(&self.view(), other)
    }
}

/// Check that two extent lists agree.
pub(crate) fn ensure_same_shape(lhs: &[usize], rhs: &[usize]) -> Result<()> {
    if lhs != rhs {
        return Err(MatrixError::ShapeMismatch(lhs.to_vec(), rhs.to_vec()));
    }
    Ok(())
}
