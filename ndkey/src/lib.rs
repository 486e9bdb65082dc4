//! Per-dimension indexing keys for n-dimensional arrays.
//!
//! Provides [`DimensionKey`], the value that says how a single axis of
//! a tensor is indexed: by one position (`t[3]`), by a Python-style
//! slice (`t[1:-1:2]`), or by an integer index tensor (`t[idx]`).
//!
//! Slices keep unspecified bounds as `None` until they are resolved
//! against a dimension size with
//! [`DimensionKey::resolve_against_size`], which fills in the defaults
//! and nothing else. Wrapping negative bounds and clamping or rejecting
//! out-of-range ones is a separate step, offered by [`bounds`].
//!
//! The crate is generic over the tensor type used for gather keys and
//! only needs it to be [`std::fmt::Display`] to render keys.

mod key;
pub use key::DimensionKey;
pub use key::KeyError;
pub use key::KeyMode;
pub use key::Range;
pub use key::RangeField;
pub use key::UNSPECIFIED;

/// Normalizing keys against a concrete dimension.
pub mod bounds;

/// Parsing keys from Python subscript syntax.
pub mod parse;

/// Property-based generators for randomized test input.
#[cfg(test)]
pub mod strategy;

/// Helpers shared by the unit tests.
#[cfg(test)]
pub mod test_utils;

/// Construct a [`DimensionKey`] with subscript-like syntax.
///
/// A single argument goes through [`DimensionKey::from`], so integers
/// give position keys and native `i64` ranges (`1..4`, `2..`, `..3`)
/// give range keys.
///
/// ```
/// use ndkey::DimensionKey;
/// use ndkey::key;
///
/// let k: DimensionKey<String> = key!(3);
/// assert_eq!(k, DimensionKey::position(3));
///
/// let k: DimensionKey<String> = key!(..);
/// assert_eq!(k, DimensionKey::full());
///
/// let k: DimensionKey<String> = key!(1..4);
/// assert_eq!(k, DimensionKey::range(1, 4, None));
///
/// let k: DimensionKey<String> = key!(None, 4);
/// assert_eq!(k, DimensionKey::range(None, 4, None));
///
/// let k: DimensionKey<String> = key!(1, None, -1);
/// assert_eq!(k.to_string(), "Range(1, None, -1)");
/// ```
#[macro_export]
macro_rules! key {
    (..) => {
        $crate::DimensionKey::full()
    };

    ($key:expr) => {
        $crate::DimensionKey::from($key)
    };

    ($start:expr, $stop:expr) => {
        $crate::DimensionKey::range($start, $stop, ::core::option::Option::None)
    };

    ($start:expr, $stop:expr, $step:expr) => {
        $crate::DimensionKey::range($start, $stop, $step)
    };
}
