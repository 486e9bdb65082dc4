//! Normalizing keys against a concrete dimension.
//!
//! [`DimensionKey::resolve_against_size`](crate::DimensionKey::resolve_against_size)
//! only fills in missing slice fields. Turning a key into actual
//! element offsets also needs negative values wrapped and
//! out-of-range values handled, and the right way to handle them
//! depends on the consumer: a strided view usually clamps like Python
//! does, while a gather copy may prefer to reject. This module provides
//! that second step, parameterized by [`BoundsOpts`].
//!
//! ```
//! use ndkey::Range;
//! use ndkey::bounds;
//! use ndkey::bounds::BoundsOpts;
//!
//! // t[-3:] on a dimension of 5 elements.
//! let span = bounds::span(&Range::from(-3..), 5, &BoundsOpts::lenient()).unwrap();
//! assert_eq!(span.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
//!
//! // t[::-2]
//! let span = bounds::span(&Range(None, None, Some(-2)), 5, &BoundsOpts::lenient()).unwrap();
//! assert_eq!(span.iter().collect::<Vec<_>>(), vec![4, 2, 0]);
//! ```

use crate::KeyError;
use crate::Range;

/// `BoundsOpts` controls how [`span`] treats slice bounds that fall
/// outside the dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsOpts {
    /// Clamp out-of-range slice bounds to the dimension, as Python
    /// does. When false, any bound outside `[-size, size]` is an error.
    pub clamp_out_of_range: bool,
}

impl BoundsOpts {
    pub fn lenient() -> Self {
        Self {
            clamp_out_of_range: true,
        }
    }

    pub fn strict() -> Self {
        Self {
            clamp_out_of_range: false,
        }
    }
}

impl Default for BoundsOpts {
    fn default() -> Self {
        Self::lenient()
    }
}

/// The offsets selected by a slice within one dimension: `len`
/// elements starting at `start`, `step` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    start: usize,
    step: i64,
    len: usize,
}

impl Span {
    /// The first selected offset. Zero for empty spans.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over the selected offsets, in selection order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + use<> {
        let Span { start, step, len } = *self;
        (0..len).map(move |i| (start as i64 + i as i64 * step) as usize)
    }
}

fn signed_size(size: usize) -> i64 {
    i64::try_from(size).unwrap_or(i64::MAX)
}

/// The offset selected by a position key. Negative positions count
/// from the end. Unlike slices, positions are never clamped.
pub fn position(index: i64, size: usize) -> Result<usize, KeyError> {
    let n = signed_size(size);
    let wrapped = if index < 0 { index + n } else { index };
    if !(0..n).contains(&wrapped) {
        tracing::debug!(index, size, "position out of range");
        return Err(KeyError::IndexOutOfRange { index, size });
    }
    Ok(wrapped as usize)
}

/// The offsets selected by `range` in a dimension of `size` elements.
///
/// Unspecified fields take Python's defaults, which depend on the sign
/// of the step: a negative step walks from the last element down to the
/// first. Specified bounds are wrapped when negative and then clamped
/// (or rejected, per `opts`).
pub fn span(range: &Range, size: usize, opts: &BoundsOpts) -> Result<Span, KeyError> {
    let n = signed_size(size);
    let step = range.step().unwrap_or(1);
    if step == 0 {
        return Err(KeyError::ZeroStep);
    }

    if !opts.clamp_out_of_range {
        let outside = |bound: Option<i64>| bound.is_some_and(|b| b < -n || b > n);
        if outside(range.start()) || outside(range.stop()) {
            tracing::debug!(%range, size, "slice out of range");
            return Err(KeyError::RangeOutOfRange {
                range: *range,
                size,
            });
        }
    }

    // With a negative step, -1 stands for "before the first element".
    let (lower, upper) = if step > 0 { (0, n) } else { (-1, n - 1) };
    let adjust = |bound: i64| {
        if bound < 0 {
            (bound + n).max(lower)
        } else {
            bound.min(upper)
        }
    };
    let start = range.start().map_or(if step > 0 { 0 } else { n - 1 }, adjust);
    let stop = range.stop().map_or(if step > 0 { n } else { -1 }, adjust);

    let (near, far) = if step > 0 { (start, stop) } else { (stop, start) };
    let len = if far > near {
        ((far - near - 1) as u64 / step.unsigned_abs() + 1) as usize
    } else {
        0
    };

    Ok(Span {
        start: if len == 0 { 0 } else { start as usize },
        step,
        len,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    use super::*;
    use crate::DimensionKey;
    use crate::strategy::gen_range;
    use crate::test_utils::IndexTensor;
    use crate::test_utils::set_tracing_env_filter;

    fn offsets(range: Range, size: usize) -> Vec<usize> {
        span(&range, size, &BoundsOpts::lenient())
            .unwrap()
            .iter()
            .collect()
    }

    // Python's semantics for `list(range(size))[start:stop:step]`.
    fn reference(range: Range, size: usize) -> Vec<usize> {
        let n = size as i64;
        let step = range.step().unwrap_or(1);
        let clamp = |b: i64, lo: i64, hi: i64| {
            let b = if b < 0 { b + n } else { b };
            b.max(lo).min(hi)
        };
        let mut out = Vec::new();
        if step > 0 {
            let start = range.start().map_or(0, |b| clamp(b, 0, n));
            let stop = range.stop().map_or(n, |b| clamp(b, 0, n));
            let mut i = start;
            while i < stop {
                out.push(i as usize);
                i += step;
            }
        } else {
            let start = range.start().map_or(n - 1, |b| clamp(b, -1, n - 1));
            let stop = range.stop().map_or(-1, |b| clamp(b, -1, n - 1));
            let mut i = start;
            while i > stop {
                out.push(i as usize);
                i += step;
            }
        }
        out
    }

    #[test]
    fn test_position() {
        assert_eq!(position(0, 5).unwrap(), 0);
        assert_eq!(position(4, 5).unwrap(), 4);
        assert_eq!(position(-1, 5).unwrap(), 4);
        assert_eq!(position(-5, 5).unwrap(), 0);
        assert_matches!(
            position(5, 5),
            Err(KeyError::IndexOutOfRange { index: 5, size: 5 })
        );
        assert_matches!(
            position(-6, 5),
            Err(KeyError::IndexOutOfRange { index: -6, size: 5 })
        );
        assert_matches!(position(0, 0), Err(KeyError::IndexOutOfRange { .. }));
        assert_matches!(
            position(i64::MIN, 5),
            Err(KeyError::IndexOutOfRange { .. })
        );
    }

    #[test]
    fn test_span_basic() {
        assert_eq!(offsets(Range::full(), 5), vec![0, 1, 2, 3, 4]);
        assert_eq!(offsets(Range::from(1..4), 5), vec![1, 2, 3]);
        assert_eq!(offsets(Range(Some(0), Some(5), Some(2)), 5), vec![0, 2, 4]);
        assert_eq!(offsets(Range::from(..-1), 5), vec![0, 1, 2, 3]);
        assert_eq!(offsets(Range(None, None, Some(-1)), 5), vec![4, 3, 2, 1, 0]);
        assert_eq!(offsets(Range(Some(-1), Some(-4), Some(-1)), 5), vec![4, 3, 2]);
        assert_eq!(offsets(Range::full(), 0), Vec::<usize>::new());
    }

    #[test]
    fn test_span_clamps() {
        assert_eq!(offsets(Range::from(-100..100), 3), vec![0, 1, 2]);
        assert_eq!(offsets(Range::from(3..1), 5), Vec::<usize>::new());
        assert_eq!(offsets(Range(Some(100), None, Some(-1)), 3), vec![2, 1, 0]);

        let empty = span(&Range::from(4..2), 5, &BoundsOpts::lenient()).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.start(), 0);
    }

    #[test]
    fn test_span_strict() {
        let strict = BoundsOpts::strict();
        assert_eq!(
            span(&Range::from(-5..5), 5, &strict).unwrap().len(),
            5
        );
        assert_matches!(
            span(&Range::from(0..6), 5, &strict),
            Err(KeyError::RangeOutOfRange { range: Range(Some(0), Some(6), None), size: 5 })
        );
        assert_matches!(
            span(&Range::from(-6..), 5, &strict),
            Err(KeyError::RangeOutOfRange { .. })
        );
        assert_eq!(
            span(&Range::from(0..6), 5, &strict).unwrap_err().to_string(),
            "slice `0:6` out of range for dimension of size 5"
        );
    }

    #[test]
    fn test_span_zero_step() {
        for opts in [BoundsOpts::lenient(), BoundsOpts::strict()] {
            assert_matches!(
                span(&Range(None, None, Some(0)), 5, &opts),
                Err(KeyError::ZeroStep)
            );
        }
    }

    #[test]
    fn test_resolved_key() {
        set_tracing_env_filter(tracing::Level::DEBUG);

        // Resolution then normalization composes: t[-3:] on a dimension
        // of 5 elements.
        let key: DimensionKey<IndexTensor> = DimensionKey::range(-3, None, None);
        let resolved = key.resolve_against_size(5).unwrap();
        assert_eq!(resolved, DimensionKey::range(-3, 5, 1));
        let span = span(resolved.slice().unwrap(), 5, &BoundsOpts::default()).unwrap();
        assert_eq!(span.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(span.step(), 1);
    }

    proptest! {
        #[test]
        fn prop_span_matches_python(range in gen_range(), size in 0usize..32) {
            let span = span(&range, size, &BoundsOpts::lenient()).unwrap();
            let got: Vec<usize> = span.iter().collect();
            prop_assert_eq!(got.len(), span.len());
            prop_assert_eq!(got, reference(range, size));
        }

        #[test]
        fn prop_offsets_in_bounds(range in gen_range(), size in 1usize..32) {
            for offset in span(&range, size, &BoundsOpts::lenient()).unwrap().iter() {
                prop_assert!(offset < size);
            }
        }
    }
}
