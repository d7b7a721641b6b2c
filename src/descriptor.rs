//! Layout descriptor mapping multi-indices to buffer offsets.

use crate::slice::DimSpec;
use crate::{MatrixError, Result};

/// Compute packed row-major strides for the given extents.
///
/// The last axis varies fastest and has stride 1.
pub fn row_major_strides<const N: usize>(extents: &[usize; N]) -> [isize; N] {
    let mut strides = [1isize; N];
    for i in (0..N.saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * extents[i + 1] as isize;
    }
    strides
}

/// Start offset, extents and strides of an N-dimensional layout.
///
/// Element `(i0, .., i{N-1})` lives at `start + Σ ik * strides[k]` in the
/// underlying buffer. `size` is the total element count (1 for rank 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Descriptor<const N: usize> {
    start: usize,
    extents: [usize; N],
    strides: [isize; N],
    size: usize,
}

impl<const N: usize> Descriptor<N> {
    /// Descriptor with explicit start and strides. Bounds are not checked here.
    pub fn new(start: usize, extents: [usize; N], strides: [isize; N]) -> Self {
        Self {
            start,
            extents,
            strides,
            size: extents.iter().product(),
        }
    }

    /// Packed row-major descriptor starting at offset 0.
    pub fn packed(extents: [usize; N]) -> Self {
        Self::new(0, extents, row_major_strides(&extents))
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn extents(&self) -> &[usize; N] {
        &self.extents
    }

    #[inline]
    pub fn strides(&self) -> &[isize; N] {
        &self.strides
    }

    /// Total number of elements addressed.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn rank(&self) -> usize {
        N
    }

    /// Extent of one axis.
    ///
    /// # Panics
    /// Panics if `axis >= N`.
    pub fn extent(&self, axis: usize) -> usize {
        assert!(axis < N, "axis {axis} out of range for rank {N}");
        self.extents[axis]
    }

    /// True if both descriptors have identical extents, whatever their strides.
    pub fn same_extents(&self, other: &Descriptor<N>) -> bool {
        self.extents == other.extents
    }

    /// Buffer offset of a multi-index. Indices are not bounds-checked.
    #[inline]
    pub fn offset(&self, index: &[usize; N]) -> usize {
        let mut pos = self.start as isize;
        for k in 0..N {
            pos += index[k] as isize * self.strides[k];
        }
        pos as usize
    }

    /// Offset of a multi-index, or `None` if any index is beyond its extent.
    pub fn checked_offset(&self, index: &[usize; N]) -> Option<usize> {
        if index.iter().zip(self.extents.iter()).any(|(i, e)| i >= e) {
            return None;
        }
        Some(self.offset(index))
    }

    /// True if the strides are the packed row-major strides for the extents.
    ///
    /// Axes of extent 0 or 1 do not constrain their stride.
    pub fn is_contiguous(&self) -> bool {
        let mut expected = 1isize;
        for k in (0..N).rev() {
            if self.extents[k] > 1 && self.strides[k] != expected {
                return false;
            }
            expected *= self.extents[k] as isize;
        }
        true
    }

    /// Check that every addressed element lies inside a buffer of `len` elements.
    pub fn validate(&self, len: usize) -> Result<()> {
        if self.size == 0 {
            return Ok(());
        }
        let mut min = self.start as isize;
        let mut max = self.start as isize;
        for k in 0..N {
            let reach = self.strides[k]
                .checked_mul(self.extents[k] as isize - 1)
                .ok_or(MatrixError::OffsetOverflow)?;
            if reach >= 0 {
                max = max.checked_add(reach).ok_or(MatrixError::OffsetOverflow)?;
            } else {
                min = min.checked_add(reach).ok_or(MatrixError::OffsetOverflow)?;
            }
        }
        if min < 0 || max as usize >= len {
            return Err(MatrixError::OffsetOverflow);
        }
        Ok(())
    }

    /// Check that no two multi-indices reach the same offset.
    ///
    /// Axes are ordered by absolute stride; each stride must step past
    /// everything the smaller axes can reach.
    pub fn check_disjoint(&self) -> Result<()> {
        if self.size <= 1 {
            return Ok(());
        }
        let mut axes: Vec<(usize, usize)> = (0..N)
            .filter(|&k| self.extents[k] > 1)
            .map(|k| (self.strides[k].unsigned_abs(), self.extents[k]))
            .collect();
        axes.sort_unstable();
        let mut span = 0usize;
        for (stride, extent) in axes {
            if stride <= span {
                return Err(MatrixError::OverlappingStrides);
            }
            span += stride * (extent - 1);
        }
        Ok(())
    }

    /// Derive the sub-descriptor selected by one argument per axis.
    ///
    /// `Index` arguments drop their axis and move the start; `Range`
    /// arguments move the start and shorten the axis; `All` keeps it.
    /// Missing trailing arguments count as `All`. `M` must equal `N` minus
    /// the number of `Index` arguments.
    pub fn slice<const M: usize>(&self, specs: &[DimSpec]) -> Result<Descriptor<M>> {
        if specs.len() > N {
            return Err(MatrixError::RankMismatch(N, specs.len()));
        }
        let dropped = specs.iter().filter(|s| s.is_index()).count();
        if N - dropped != M {
            return Err(MatrixError::RankMismatch(N - dropped, M));
        }

        let mut start = self.start as isize;
        let mut extents = [0usize; M];
        let mut strides = [0isize; M];
        let mut out = 0;
        for axis in 0..N {
            let extent = self.extents[axis];
            let stride = self.strides[axis];
            match specs.get(axis).copied().unwrap_or(DimSpec::All) {
                DimSpec::Index(index) => {
                    if index >= extent {
                        return Err(MatrixError::IndexOutOfRange {
                            axis,
                            index,
                            extent,
                        });
                    }
                    start += index as isize * stride;
                }
                DimSpec::Range { start: lo, end } => {
                    let hi = end.unwrap_or(extent);
                    if lo > hi || hi > extent {
                        return Err(MatrixError::InvalidRange {
                            axis,
                            start: lo,
                            end: hi,
                            extent,
                        });
                    }
                    if hi > lo {
                        start += lo as isize * stride;
                    }
                    extents[out] = hi - lo;
                    strides[out] = stride;
                    out += 1;
                }
                DimSpec::All => {
                    extents[out] = extent;
                    strides[out] = stride;
                    out += 1;
                }
            }
        }
        let sliced = Descriptor::new(start as usize, extents, strides);
        log::trace!(
            "slice {:?}/{:?} by {:?} -> start {} extents {:?}",
            self.extents,
            self.strides,
            specs,
            sliced.start,
            sliced.extents
        );
        Ok(sliced)
    }

    /// Fix one axis at `index` and keep the others.
    pub fn slice_dim<const M: usize>(&self, axis: usize, index: usize) -> Result<Descriptor<M>> {
        if axis >= N {
            return Err(MatrixError::InvalidAxis { axis, rank: N });
        }
        let mut specs = [DimSpec::All; N];
        specs[axis] = DimSpec::Index(index);
        self.slice(&specs)
    }

    /// Swap two axes without touching the buffer.
    pub fn swap_axes(&self, a: usize, b: usize) -> Self {
        let mut out = *self;
        out.extents.swap(a, b);
        out.strides.swap(a, b);
        out
    }
}
