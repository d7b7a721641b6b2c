//! Owning N-dimensional container.

use crate::descriptor::Descriptor;
use crate::iter::{Iter, IterMut};
use crate::ops::ScalarOperand;
use crate::slice::DimSpec;
use crate::view::{MatrixView, MatrixViewMut};
use crate::{MatrixError, Result};
use std::ops::{Index, IndexMut};

/// Dense N-dimensional array owning a packed row-major buffer.
///
/// Cloning copies the buffer; the clone is independent of the original.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matrix<T, const N: usize> {
    data: Vec<T>,
    desc: Descriptor<N>,
}

impl<T, const N: usize> Matrix<T, N> {
    /// `data` must hold exactly the product of `extents` elements.
    pub(crate) fn from_parts(extents: [usize; N], data: Vec<T>) -> Self {
        let desc = Descriptor::packed(extents);
        debug_assert_eq!(desc.size(), data.len());
        Self { data, desc }
    }

    /// Matrix with every element set to `T::default()`.
    pub fn new(extents: [usize; N]) -> Self
    where
        T: Default + Clone,
    {
        Self::from_elem(extents, T::default())
    }

    /// Matrix with every element set to `value`.
    pub fn from_elem(extents: [usize; N], value: T) -> Self
    where
        T: Clone,
    {
        let size = extents.iter().product();
        Self::from_parts(extents, vec![value; size])
    }

    /// Wrap a row-major buffer.
    ///
    /// # Errors
    /// Returns [`MatrixError::SizeMismatch`] if `data.len()` is not the
    /// product of `extents`.
    pub fn from_vec(extents: [usize; N], data: Vec<T>) -> Result<Self> {
        let expected: usize = extents.iter().product();
        if data.len() != expected {
            return Err(MatrixError::SizeMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self::from_parts(extents, data))
    }

    /// Build a matrix by calling `f` with each multi-index in row-major order.
    pub fn from_fn<F>(extents: [usize; N], mut f: F) -> Self
    where
        F: FnMut(&[usize; N]) -> T,
    {
        let desc = Descriptor::packed(extents);
        let mut data = Vec::with_capacity(desc.size());
        if desc.size() > 0 {
            let mut index = [0usize; N];
            'outer: loop {
                data.push(f(&index));
                for axis in (0..N).rev() {
                    index[axis] += 1;
                    if index[axis] < extents[axis] {
                        continue 'outer;
                    }
                    index[axis] = 0;
                }
                break;
            }
        }
        Self { data, desc }
    }

    /// Build a matrix from nested vectors, deriving the extents from the nesting.
    ///
    /// # Errors
    /// Returns [`MatrixError::RaggedInitializer`] if siblings at some level
    /// have different lengths.
    ///
    /// ```rust
    /// use strided_matrix::{Matrix, MatrixError};
    ///
    /// let m = Matrix::<i32, 2>::from_nested(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    /// assert_eq!(m.extents(), &[2, 3]);
    ///
    /// let ragged = Matrix::<i32, 2>::from_nested(vec![vec![1, 2], vec![3]]);
    /// assert!(matches!(ragged, Err(MatrixError::RaggedInitializer { level: 1, .. })));
    /// ```
    pub fn from_nested<I>(init: I) -> Result<Self>
    where
        I: MatrixInitializer<T, N>,
    {
        let extents = init.derive_extents()?;
        let mut data = Vec::with_capacity(extents.iter().product());
        init.flatten_into(&mut data);
        Ok(Self::from_parts(extents, data))
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
    pub fn extent(&self, axis: usize) -> usize {
        self.desc.extent(axis)
    }

    pub fn nrows(&self) -> usize {
        self.desc.extent(0)
    }

    pub fn ncols(&self) -> usize {
        self.desc.extent(1)
    }

    /// Total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        N
    }

    /// Row-major element buffer.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Borrow the whole matrix as a view.
    #[inline]
    pub fn view(&self) -> MatrixView<'_, T, N> {
        MatrixView::from_parts(&self.data, self.desc)
    }

    /// Borrow the whole matrix as a mutable view.
    #[inline]
    pub fn view_mut(&mut self) -> MatrixViewMut<'_, T, N> {
        MatrixViewMut::from_parts(&mut self.data, self.desc)
    }

    pub fn iter(&self) -> Iter<'_, T, N> {
        Iter::new(&self.data, self.desc)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T, N> {
        IterMut::new(&mut self.data, self.desc)
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

    /// See [`MatrixView::try_slice`].
    pub fn try_slice<const M: usize>(&self, specs: &[DimSpec]) -> Result<MatrixView<'_, T, M>> {
        self.view().try_slice(specs)
    }

    /// Sub-view selected by one [`DimSpec`] per axis.
    ///
    /// # Panics
    /// Panics if an argument lies outside its axis or `M` does not match the
    /// number of kept axes.
    pub fn slice<const M: usize>(&self, specs: &[DimSpec]) -> MatrixView<'_, T, M> {
        self.view().slice(specs)
    }

    pub fn try_slice_mut<const M: usize>(
        &mut self,
        specs: &[DimSpec],
    ) -> Result<MatrixViewMut<'_, T, M>> {
        let desc = self.desc.slice(specs)?;
        Ok(MatrixViewMut::from_parts(&mut self.data, desc))
    }

    /// Mutable sub-view. Writes go to this matrix.
    pub fn slice_mut<const M: usize>(&mut self, specs: &[DimSpec]) -> MatrixViewMut<'_, T, M> {
        self.try_slice_mut(specs).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Replace the contents with elements from nested vectors of the same shape.
    pub fn assign_nested<I>(&mut self, init: I) -> Result<&mut Self>
    where
        I: MatrixInitializer<T, N>,
    {
        self.view_mut().assign_nested(init)?;
        Ok(self)
    }
}

impl<T> Matrix<T, 2> {
    /// Transposed view. No data is moved.
    pub fn t(&self) -> MatrixView<'_, T, 2> {
        self.view().t()
    }
}

impl<T, const N: usize> Index<[usize; N]> for Matrix<T, N> {
    type Output = T;

    fn index(&self, index: [usize; N]) -> &T {
        match self.desc.checked_offset(&index) {
            Some(pos) => &self.data[pos],
            None => panic!("index {index:?} out of bounds for extents {:?}", self.extents()),
        }
    }
}

impl<T, const N: usize> IndexMut<[usize; N]> for Matrix<T, N> {
    fn index_mut(&mut self, index: [usize; N]) -> &mut T {
        match self.desc.checked_offset(&index) {
            Some(pos) => &mut self.data[pos],
            None => panic!("index {index:?} out of bounds for extents {:?}", self.desc.extents()),
        }
    }
}

impl<T> Index<usize> for Matrix<T, 1> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for Matrix<T, 1> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a Matrix<T, N> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a mut Matrix<T, N> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, const N: usize> IntoIterator for Matrix<T, N> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T: Clone, const N: usize> From<MatrixView<'a, T, N>> for Matrix<T, N> {
    fn from(view: MatrixView<'a, T, N>) -> Self {
        view.to_matrix()
    }
}

// Element types are scalars, so the nesting depth of a literal is its rank.
impl<T: ScalarOperand, const C: usize> From<[T; C]> for Matrix<T, 1> {
    fn from(values: [T; C]) -> Self {
        Self::from_parts([C], Vec::from(values))
    }
}

impl<T: ScalarOperand, const R: usize, const C: usize> From<[[T; C]; R]> for Matrix<T, 2> {
    fn from(rows: [[T; C]; R]) -> Self {
        let data = rows.into_iter().flatten().collect();
        Self::from_parts([R, C], data)
    }
}

impl<T: ScalarOperand, const P: usize, const R: usize, const C: usize> From<[[[T; C]; R]; P]>
    for Matrix<T, 3>
{
    fn from(planes: [[[T; C]; R]; P]) -> Self {
        let data = planes.into_iter().flatten().flatten().collect();
        Self::from_parts([P, R, C], data)
    }
}

// ============================================================================
// Nested initializers
// ============================================================================

/// Nested data whose nesting depth is the rank `N`.
///
/// Implemented for `Vec<T>` (rank 1) up to six levels of nested `Vec`s.
pub trait MatrixInitializer<T, const N: usize> {
    /// Extents read off the nesting; `depth` is the level of `self`.
    fn measure(&self, depth: usize) -> Result<[usize; N]>;

    /// Append the leaves in row-major order.
    fn flatten_into(self, out: &mut Vec<T>);

    /// Extents read off the nesting.
    ///
    /// # Errors
    /// Returns [`MatrixError::RaggedInitializer`] naming the first level at
    /// which sibling lengths differ.
    fn derive_extents(&self) -> Result<[usize; N]> {
        self.measure(0)
    }
}

impl<T> MatrixInitializer<T, 1> for Vec<T> {
    fn measure(&self, _depth: usize) -> Result<[usize; 1]> {
        Ok([self.len()])
    }

    fn flatten_into(self, out: &mut Vec<T>) {
        out.extend(self);
    }
}

macro_rules! impl_nested_initializer {
    ($($n:literal => $m:literal),* $(,)?) => {$(
        impl<T, I> MatrixInitializer<T, $n> for Vec<I>
        where
            I: MatrixInitializer<T, $m>,
        {
            fn measure(&self, depth: usize) -> Result<[usize; $n]> {
                let mut extents = [0usize; $n];
                extents[0] = self.len();
                if let Some(first) = self.first() {
                    let inner = first.measure(depth + 1)?;
                    for child in &self[1..] {
                        let other = child.measure(depth + 1)?;
                        if let Some(k) = (0..$m).find(|&k| inner[k] != other[k]) {
                            return Err(MatrixError::RaggedInitializer {
                                level: depth + 1 + k,
                                expected: inner[k],
                                found: other[k],
                            });
                        }
                    }
                    extents[1..].copy_from_slice(&inner);
                }
                Ok(extents)
            }

            fn flatten_into(self, out: &mut Vec<T>) {
                for child in self {
                    child.flatten_into(out);
                }
            }
        }
    )*};
}

impl_nested_initializer!(2 => 1, 3 => 2, 4 => 3, 5 => 4, 6 => 5);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s;

    #[test]
    fn test_new_default() {
        let m: Matrix<f64, 2> = Matrix::new([2, 3]);
        assert_eq!(m.len(), 6);
        assert!(m.iter().all(|&x| x == 0.0));
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.ncols(), 3);
    }

    #[test]
    fn test_from_vec() {
        let m = Matrix::from_vec([2, 2], vec![1, 2, 3, 4]).unwrap();
        assert_eq!(m[[1, 0]], 3);
        assert_eq!(
            Matrix::from_vec([2, 2], vec![1, 2, 3]).unwrap_err(),
            MatrixError::SizeMismatch {
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn test_from_fn_row_major() {
        let m = Matrix::from_fn([2, 3], |idx| idx[0] * 10 + idx[1]);
        assert_eq!(m.data(), &[0, 1, 2, 10, 11, 12]);
        let empty = Matrix::from_fn([0, 3], |_| 1);
        assert!(empty.is_empty());
        let scalar = Matrix::<i32, 0>::from_fn([], |_| 5);
        assert_eq!(scalar.data(), &[5]);
    }

    #[test]
    fn test_from_nested() {
        let m = Matrix::<i32, 3>::from_nested(vec![
            vec![vec![1, 2], vec![3, 4], vec![5, 6]],
            vec![vec![7, 8], vec![9, 10], vec![11, 12]],
        ])
        .unwrap();
        assert_eq!(m.extents(), &[2, 3, 2]);
        assert_eq!(m[[1, 2, 0]], 11);
    }

    #[test]
    fn test_from_nested_ragged_levels() {
        let err = Matrix::<i32, 3>::from_nested(vec![
            vec![vec![1, 2], vec![3, 4]],
            vec![vec![5, 6], vec![7]],
        ])
        .unwrap_err();
        assert_eq!(
            err,
            MatrixError::RaggedInitializer {
                level: 2,
                expected: 2,
                found: 1
            }
        );

        let err = Matrix::<i32, 2>::from_nested(vec![vec![1, 2, 3], vec![4, 5]]).unwrap_err();
        assert_eq!(
            err,
            MatrixError::RaggedInitializer {
                level: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_from_arrays() {
        let v = Matrix::from([1, 2, 3]);
        assert_eq!(v.extents(), &[3]);
        assert_eq!(v[2], 3);
        let m = Matrix::from([[1, 2, 3], [4, 5, 6]]);
        assert_eq!(m.extents(), &[2, 3]);
        let c = Matrix::from([[[1, 2]], [[3, 4]]]);
        assert_eq!(c.extents(), &[2, 1, 2]);
        assert_eq!(c[[1, 0, 1]], 4);
    }

    #[test]
    fn test_literal_depth_is_rank() {
        // No annotations: the rank comes from the nesting alone.
        let m = Matrix::from([[1, 2, 3], [4, 5, 6]]);
        assert_eq!(m.row(1).iter().copied().collect::<Vec<_>>(), vec![4, 5, 6]);
        assert_eq!(m.try_slice::<1>(&s![0]).unwrap().len(), 3);

        let c = Matrix::from([[[1.0, 2.0]], [[3.0, 4.0]]]);
        assert_eq!(c.row(1).extents(), &[1, 2]);
    }

    #[test]
    fn test_from_nested_rank_six() {
        let leaf = vec![1, 2];
        let m = Matrix::<i32, 6>::from_nested(vec![vec![vec![vec![vec![leaf.clone(), leaf]]]]])
            .unwrap();
        assert_eq!(m.extents(), &[1, 1, 1, 1, 2, 2]);
        assert_eq!(m.data(), &[1, 2, 1, 2]);

        let err = Matrix::<i32, 5>::from_nested(vec![vec![vec![vec![vec![1, 2], vec![3]]]]])
            .unwrap_err();
        assert_eq!(
            err,
            MatrixError::RaggedInitializer {
                level: 4,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let a = Matrix::from([[1, 2], [3, 4]]);
        let mut b = a.clone();
        b[[0, 0]] = 9;
        assert_eq!(a[[0, 0]], 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_row_mut_aliases() {
        let mut m = Matrix::from([[1, 2, 3], [4, 5, 6]]);
        for x in m.row_mut(1).iter_mut() {
            *x = 0;
        }
        m.col_mut(0)[0] = 7;
        assert_eq!(m, Matrix::from([[7, 2, 3], [0, 0, 0]]));
    }

    #[test]
    fn test_slice_mut_writes_through() {
        let mut m = Matrix::<i32, 2>::new([3, 3]);
        m.slice_mut::<2>(&s![1..3, 1..3]).fill(1);
        assert_eq!(m.data(), &[0, 0, 0, 0, 1, 1, 0, 1, 1]);
    }

    #[test]
    fn test_from_view() {
        let m = Matrix::from([[1, 2, 3], [4, 5, 6]]);
        let col: Matrix<i32, 1> = m.col(1).into();
        assert_eq!(col.data(), &[2, 5]);
    }

    #[test]
    fn test_get() {
        let m = Matrix::from([[1, 2], [3, 4]]);
        assert_eq!(m.get([1, 1]), Some(&4));
        assert_eq!(m.get([2, 0]), None);
    }
}
