//! Proptest generators for keys and slices.

use std::sync::Arc;

use proptest::prelude::*;

use crate::DimensionKey;
use crate::Range;
use crate::test_utils::IndexTensor;

/// An optional slice bound, small enough to land on either side of
/// typical test dimensions.
pub fn gen_bound() -> impl Strategy<Value = Option<i64>> {
    proptest::option::of(-64i64..64)
}

/// A nonzero step, or none.
pub fn gen_step() -> impl Strategy<Value = Option<i64>> {
    proptest::option::of(prop_oneof![-8i64..=-1, 1i64..=8])
}

/// Slices whose step, when present, is nonzero.
pub fn gen_range() -> impl Strategy<Value = Range> {
    (gen_bound(), gen_bound(), gen_step()).prop_map(|(start, stop, step)| Range(start, stop, step))
}

pub fn gen_key() -> impl Strategy<Value = DimensionKey<IndexTensor>> {
    prop_oneof![
        any::<i64>().prop_map(DimensionKey::<IndexTensor>::position),
        gen_range().prop_map(DimensionKey::<IndexTensor>::Range),
        proptest::collection::vec(-8i64..8, 0..4)
            .prop_map(|values| DimensionKey::gather(Arc::new(IndexTensor::from_vec(values)))),
    ]
}
