//! Row-major iteration over strided descriptors.
//!
//! Both iterators keep one counter per axis plus the current buffer position.
//! Advancing bumps the last axis and carries leftwards; when axis 0 runs off
//! its extent the iterator sits at the end sentinel (`index[0] == extents[0]`)
//! and yields nothing more.

use crate::descriptor::Descriptor;
use std::marker::PhantomData;

/// Counters shared by [`Iter`] and [`IterMut`].
#[derive(Debug, Clone)]
struct Cursor<const N: usize> {
    desc: Descriptor<N>,
    index: [usize; N],
    pos: isize,
    remaining: usize,
}

impl<const N: usize> Cursor<N> {
    fn new(desc: Descriptor<N>) -> Self {
        let mut cursor = Self {
            desc,
            index: [0; N],
            pos: desc.start() as isize,
            remaining: desc.size(),
        };
        if desc.size() == 0 {
            cursor.index[0] = desc.extents()[0];
            cursor.pos += desc.extents()[0] as isize * desc.strides()[0];
        }
        cursor
    }

    #[inline]
    fn advance(&mut self) {
        self.remaining -= 1;
        if N == 0 {
            self.pos += 1;
            return;
        }
        let extents = self.desc.extents();
        let strides = self.desc.strides();
        let mut axis = N - 1;
        loop {
            self.index[axis] += 1;
            self.pos += strides[axis];
            if self.index[axis] < extents[axis] || axis == 0 {
                break;
            }
            self.pos -= strides[axis] * extents[axis] as isize;
            self.index[axis] = 0;
            axis -= 1;
        }
    }
}

/// Shared iterator over the elements of a view, in row-major order.
pub struct Iter<'a, T, const N: usize> {
    base: *const T,
    cursor: Cursor<N>,
    _marker: PhantomData<&'a T>,
}

impl<'a, T, const N: usize> Iter<'a, T, N> {
    /// `desc` must already be validated against `data`.
    pub(crate) fn new(data: &'a [T], desc: Descriptor<N>) -> Self {
        Self {
            base: data.as_ptr(),
            cursor: Cursor::new(desc),
            _marker: PhantomData,
        }
    }

    /// Multi-index of the next element to be yielded.
    pub fn index(&self) -> &[usize; N] {
        &self.cursor.index
    }

    /// Buffer offset of the next element, relative to the buffer start.
    pub fn position(&self) -> isize {
        self.cursor.pos
    }
}

impl<'a, T, const N: usize> Iterator for Iter<'a, T, N> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.remaining == 0 {
            return None;
        }
        // SAFETY: the descriptor was validated against the buffer and the
        // cursor has not reached the end, so `pos` addresses a live element.
        let item = unsafe { &*self.base.offset(self.cursor.pos) };
        self.cursor.advance();
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.remaining, Some(self.cursor.remaining))
    }
}

impl<'a, T, const N: usize> ExactSizeIterator for Iter<'a, T, N> {}

impl<'a, T, const N: usize> Clone for Iter<'a, T, N> {
    fn clone(&self) -> Self {
        Self {
            base: self.base,
            cursor: self.cursor.clone(),
            _marker: PhantomData,
        }
    }
}

/// Two iterators over the same view are equal when they sit on the same element.
impl<'a, T, const N: usize> PartialEq for Iter<'a, T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.base.wrapping_offset(self.cursor.pos) == other.base.wrapping_offset(other.cursor.pos)
    }
}

// SAFETY: `Iter` behaves like `&'a T`.
unsafe impl<'a, T: Sync, const N: usize> Send for Iter<'a, T, N> {}
unsafe impl<'a, T: Sync, const N: usize> Sync for Iter<'a, T, N> {}

/// Mutable iterator over the elements of a view, in row-major order.
pub struct IterMut<'a, T, const N: usize> {
    base: *mut T,
    cursor: Cursor<N>,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T, const N: usize> IterMut<'a, T, N> {
    /// `desc` must be validated against `data` and address each element once.
    pub(crate) fn new(data: &'a mut [T], desc: Descriptor<N>) -> Self {
        Self {
            base: data.as_mut_ptr(),
            cursor: Cursor::new(desc),
            _marker: PhantomData,
        }
    }

    /// Multi-index of the next element to be yielded.
    pub fn index(&self) -> &[usize; N] {
        &self.cursor.index
    }
}

impl<'a, T, const N: usize> Iterator for IterMut<'a, T, N> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.remaining == 0 {
            return None;
        }
        // SAFETY: in bounds as for `Iter`; the descriptor is disjoint, so
        // no element is handed out twice.
        let item = unsafe { &mut *self.base.offset(self.cursor.pos) };
        self.cursor.advance();
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.remaining, Some(self.cursor.remaining))
    }
}

impl<'a, T, const N: usize> ExactSizeIterator for IterMut<'a, T, N> {}

// SAFETY: `IterMut` behaves like `&'a mut T`.
unsafe impl<'a, T: Send, const N: usize> Send for IterMut<'a, T, N> {}
unsafe impl<'a, T: Sync, const N: usize> Sync for IterMut<'a, T, N> {}
