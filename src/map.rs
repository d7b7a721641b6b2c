//! Element-wise transforms: `apply`, `zip_apply`, `map` and assignment.
//!
//! Every transform walks its operands in row-major order. When all operands
//! are packed the walk runs over plain slices.

use crate::matrix::{Matrix, MatrixInitializer};
use crate::view::{ensure_same_shape, AsMatrixView, MatrixView, MatrixViewMut};
use crate::Result;

impl<'a, T, const N: usize> MatrixViewMut<'a, T, N> {
    /// Call `f` on every element in place.
    pub fn apply<F>(&mut self, mut f: F) -> &mut Self
    where
        F: FnMut(&mut T),
    {
        match self.as_slice_mut() {
            Some(slice) => slice.iter_mut().for_each(&mut f),
            None => self.iter_mut().for_each(&mut f),
        }
        self
    }

    /// Call `f` on each pair of corresponding elements of `self` and `other`.
    ///
    /// # Errors
    /// Returns [`MatrixError::ShapeMismatch`](crate::MatrixError::ShapeMismatch)
    /// if the extents differ. Nothing is modified in that case.
    pub fn zip_apply<U, V, F>(&mut self, other: &V, mut f: F) -> Result<&mut Self>
    where
        V: AsMatrixView<U, N> + ?Sized,
        F: FnMut(&mut T, &U),
    {
        let other = other.view();
        ensure_same_shape(self.extents(), other.extents())?;
        if let Some(src) = other.as_slice() {
            if let Some(dst) = self.as_slice_mut() {
                dst.iter_mut().zip(src).for_each(|(x, y)| f(x, y));
                return Ok(self);
            }
        }
        self.iter_mut()
            .zip(other.iter())
            .for_each(|(x, y)| f(x, y));
        Ok(self)
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) -> &mut Self
    where
        T: Clone,
    {
        self.apply(|x| *x = value.clone())
    }

    /// Copy corresponding elements of `src`, converting each with `Into`.
    ///
    /// # Errors
    /// Returns [`MatrixError::ShapeMismatch`](crate::MatrixError::ShapeMismatch)
    /// if the extents differ.
    pub fn assign<U, V>(&mut self, src: &V) -> Result<&mut Self>
    where
        U: Clone + Into<T>,
        V: AsMatrixView<U, N> + ?Sized,
    {
        self.zip_apply(src, |x, y| *x = y.clone().into())
    }

    /// Overwrite the elements from nested vectors of matching shape.
    ///
    /// # Errors
    /// Returns [`MatrixError::RaggedInitializer`](crate::MatrixError::RaggedInitializer)
    /// for ragged input and
    /// [`MatrixError::ShapeMismatch`](crate::MatrixError::ShapeMismatch) if
    /// the nesting does not match the extents.
    pub fn assign_nested<I>(&mut self, init: I) -> Result<&mut Self>
    where
        I: MatrixInitializer<T, N>,
    {
        let extents = init.derive_extents()?;
        ensure_same_shape(self.extents(), &extents)?;
        let mut values = Vec::with_capacity(self.len());
        init.flatten_into(&mut values);
        for (x, v) in self.iter_mut().zip(values) {
            *x = v;
        }
        Ok(self)
    }
}

impl<'a, T, const N: usize> MatrixView<'a, T, N> {
    /// New packed matrix holding `f` of every element.
    pub fn map<U, F>(&self, f: F) -> Matrix<U, N>
    where
        F: FnMut(&T) -> U,
    {
        let data = match self.as_slice() {
            Some(slice) => slice.iter().map(f).collect(),
            None => self.iter().map(f).collect(),
        };
        Matrix::from_parts(*self.extents(), data)
    }
}

impl<T, const N: usize> Matrix<T, N> {
    /// Call `f` on every element in place.
    pub fn apply<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(&mut T),
    {
        self.data_mut().iter_mut().for_each(f);
        self
    }

    /// Call `f` on each pair of corresponding elements of `self` and `other`.
    ///
    /// # Errors
    /// Returns [`MatrixError::ShapeMismatch`](crate::MatrixError::ShapeMismatch)
    /// if the extents differ.
    pub fn zip_apply<U, V, F>(&mut self, other: &V, f: F) -> Result<&mut Self>
    where
        V: AsMatrixView<U, N> + ?Sized,
        F: FnMut(&mut T, &U),
    {
        self.view_mut().zip_apply(other, f)?;
        Ok(self)
    }

    pub fn fill(&mut self, value: T) -> &mut Self
    where
        T: Clone,
    {
        self.data_mut().fill(value);
        self
    }

    /// Copy corresponding elements of `src`, converting each with `Into`.
    pub fn assign<U, V>(&mut self, src: &V) -> Result<&mut Self>
    where
        U: Clone + Into<T>,
        V: AsMatrixView<U, N> + ?Sized,
    {
        self.view_mut().assign(src)?;
        Ok(self)
    }

    pub fn map<U, F>(&self, f: F) -> Matrix<U, N>
    where
        F: FnMut(&T) -> U,
    {
        self.view().map(f)
    }
}
