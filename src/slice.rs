//! Per-axis slice arguments and the `s!` macro.

use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

/// Selection applied to one axis when slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimSpec {
    /// Fix the axis at one position; the axis is removed from the result.
    Index(usize),
    /// Keep positions `start..end`; `end: None` runs to the end of the axis.
    Range { start: usize, end: Option<usize> },
    /// Keep the whole axis.
    All,
}

impl DimSpec {
    /// Half-open range `start..end`.
    pub fn range(start: usize, end: usize) -> Self {
        DimSpec::Range {
            start,
            end: Some(end),
        }
    }

    /// True if this argument removes its axis.
    #[inline]
    pub fn is_index(&self) -> bool {
        matches!(self, DimSpec::Index(_))
    }
}

fn to_usize(i: i32) -> usize {
    match usize::try_from(i) {
        Ok(u) => u,
        Err(_) => panic!("negative slice argument {i}"),
    }
}

impl From<usize> for DimSpec {
    fn from(i: usize) -> Self {
        DimSpec::Index(i)
    }
}

impl From<RangeFull> for DimSpec {
    fn from(_: RangeFull) -> Self {
        DimSpec::All
    }
}

impl From<Range<usize>> for DimSpec {
    fn from(r: Range<usize>) -> Self {
        DimSpec::range(r.start, r.end)
    }
}

impl From<RangeFrom<usize>> for DimSpec {
    fn from(r: RangeFrom<usize>) -> Self {
        DimSpec::Range {
            start: r.start,
            end: None,
        }
    }
}

impl From<RangeTo<usize>> for DimSpec {
    fn from(r: RangeTo<usize>) -> Self {
        DimSpec::range(0, r.end)
    }
}

impl From<RangeInclusive<usize>> for DimSpec {
    fn from(r: RangeInclusive<usize>) -> Self {
        DimSpec::range(*r.start(), r.end().saturating_add(1))
    }
}

impl From<RangeToInclusive<usize>> for DimSpec {
    fn from(r: RangeToInclusive<usize>) -> Self {
        DimSpec::range(0, r.end.saturating_add(1))
    }
}

// Unsuffixed integer literals default to i32, so `s![1, 0..2]` lands here.
// Negative values panic: they never name a position.

impl From<i32> for DimSpec {
    fn from(i: i32) -> Self {
        DimSpec::Index(to_usize(i))
    }
}

impl From<Range<i32>> for DimSpec {
    fn from(r: Range<i32>) -> Self {
        DimSpec::range(to_usize(r.start), to_usize(r.end))
    }
}

impl From<RangeFrom<i32>> for DimSpec {
    fn from(r: RangeFrom<i32>) -> Self {
        DimSpec::Range {
            start: to_usize(r.start),
            end: None,
        }
    }
}

impl From<RangeTo<i32>> for DimSpec {
    fn from(r: RangeTo<i32>) -> Self {
        DimSpec::range(0, to_usize(r.end))
    }
}

impl From<RangeInclusive<i32>> for DimSpec {
    fn from(r: RangeInclusive<i32>) -> Self {
        DimSpec::range(to_usize(*r.start()), to_usize(*r.end()).saturating_add(1))
    }
}

impl From<RangeToInclusive<i32>> for DimSpec {
    fn from(r: RangeToInclusive<i32>) -> Self {
        DimSpec::range(0, to_usize(r.end).saturating_add(1))
    }
}

/// Build an array of [`DimSpec`] slice arguments.
///
/// Integers fix an axis, ranges select a sub-range and `..` keeps the axis.
/// An inclusive range ending at `usize::MAX` runs past every axis and is
/// rejected when slicing.
///
/// # Panics
/// Panics if an `i32` argument is negative. This happens while building the
/// array, so `try_slice(&s![-1])` panics instead of returning an error.
///
/// ```rust
/// use strided_matrix::{s, DimSpec};
///
/// let specs = s![1, 0..2, ..];
/// assert_eq!(specs, [DimSpec::Index(1), DimSpec::range(0, 2), DimSpec::All]);
/// ```
#[macro_export]
macro_rules! s {
    ($($spec:expr),* $(,)?) => {
        [$($crate::DimSpec::from($spec)),*]
    };
}
