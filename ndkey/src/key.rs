use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use enum_as_inner::EnumAsInner;
use serde::Deserialize;
use serde::Serialize;

/// Rendered in place of a slice field that was never specified.
pub const UNSPECIFIED: &str = "None";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("expected a {expected} key, got a {actual} key")]
    ModeMismatch { expected: KeyMode, actual: KeyMode },

    #[error("slice {field} is unspecified")]
    FieldUnspecified { field: RangeField },

    #[error("invalid key mode `{mode}`")]
    InvalidMode { mode: String },

    #[error("invalid key `{input}`: {reason}")]
    ParseError { input: String, reason: String },

    #[error("slice step cannot be zero")]
    ZeroStep,

    #[error("{index} out of range for dimension of size {size}")]
    IndexOutOfRange { index: i64, size: usize },

    #[error("slice `{range}` out of range for dimension of size {size}")]
    RangeOutOfRange { range: Range, size: usize },
}

/// The three ways a key can select along a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyMode {
    Position,
    Range,
    Gather,
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMode::Position => write!(f, "position"),
            KeyMode::Range => write!(f, "range"),
            KeyMode::Gather => write!(f, "gather"),
        }
    }
}

impl FromStr for KeyMode {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "position" => Ok(KeyMode::Position),
            "range" => Ok(KeyMode::Range),
            "gather" => Ok(KeyMode::Gather),
            _ => Err(KeyError::InvalidMode {
                mode: s.to_string(),
            }),
        }
    }
}

/// Names one of the three optional fields of a [`Range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeField {
    Start,
    Stop,
    Step,
}

impl fmt::Display for RangeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeField::Start => write!(f, "start"),
            RangeField::Stop => write!(f, "stop"),
            RangeField::Step => write!(f, "step"),
        }
    }
}

/// A Python-style slice: start, stop and step, any of which may be
/// left unspecified. No relation between the fields is enforced; a
/// reversed or empty slice is a perfectly good `Range`.
///
/// Ranges are convertible from native Rust ranges over `i64`:
/// ```
/// use ndkey::Range;
///
/// assert_eq!(Range::from(1..4), Range(Some(1), Some(4), None));
/// assert_eq!(Range::from(2..), Range(Some(2), None, None));
/// assert_eq!(Range::from(..), Range(None, None, None));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range(pub Option<i64>, pub Option<i64>, pub Option<i64>);

impl Range {
    pub fn new(
        start: impl Into<Option<i64>>,
        stop: impl Into<Option<i64>>,
        step: impl Into<Option<i64>>,
    ) -> Self {
        Self(start.into(), stop.into(), step.into())
    }

    /// The range covering a whole dimension, `:`.
    pub fn full() -> Self {
        Self(None, None, None)
    }

    pub fn start(&self) -> Option<i64> {
        self.0
    }

    pub fn stop(&self) -> Option<i64> {
        self.1
    }

    pub fn step(&self) -> Option<i64> {
        self.2
    }

    pub fn field(&self, field: RangeField) -> Option<i64> {
        match field {
            RangeField::Start => self.0,
            RangeField::Stop => self.1,
            RangeField::Step => self.2,
        }
    }

    /// Whether every field is specified.
    pub fn is_resolved(&self) -> bool {
        self.0.is_some() && self.1.is_some() && self.2.is_some()
    }

    /// Fill in the slice defaults for a dimension of `dim_size`
    /// elements: start 0, stop `dim_size`, step 1. Specified fields are
    /// kept as they are, even when negative or past the end.
    pub fn resolve(&self, dim_size: i64) -> Range {
        Range(
            Some(self.0.unwrap_or(0)),
            Some(self.1.unwrap_or(dim_size)),
            Some(self.2.unwrap_or(1)),
        )
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.0 {
            write!(f, "{}", start)?;
        }
        write!(f, ":")?;
        if let Some(stop) = self.1 {
            write!(f, "{}", stop)?;
        }
        if let Some(step) = self.2 {
            write!(f, ":{}", step)?;
        }
        Ok(())
    }
}

impl From<std::ops::Range<i64>> for Range {
    fn from(r: std::ops::Range<i64>) -> Self {
        Self(Some(r.start), Some(r.end), None)
    }
}

impl From<std::ops::RangeFrom<i64>> for Range {
    fn from(r: std::ops::RangeFrom<i64>) -> Self {
        Self(Some(r.start), None, None)
    }
}

impl From<std::ops::RangeTo<i64>> for Range {
    fn from(r: std::ops::RangeTo<i64>) -> Self {
        Self(None, Some(r.end), None)
    }
}

impl From<std::ops::RangeFull> for Range {
    fn from(_: std::ops::RangeFull) -> Self {
        Self::full()
    }
}

/// Describes how one dimension of an n-dimensional array is indexed.
///
/// A key is exactly one of:
/// - [`DimensionKey::Position`]: a single element, e.g. `t[3]` or `t[-1]`;
/// - [`DimensionKey::Range`]: a strided slice, e.g. `t[1:4:2]` or `t[:-1]`;
/// - [`DimensionKey::Gather`]: an advanced index given by an integer
///   tensor, e.g. `t[idx]`.
///
/// Keys are plain immutable values. The gather payload is shared, never
/// copied: cloning a gather key clones the [`Arc`], and the key keeps the
/// index tensor alive after the caller drops its own handle.
///
/// The accessors ([`index`](Self::index), [`start`](Self::start), ...)
/// check the mode and fail with [`KeyError::ModeMismatch`] when asked
/// the wrong kind of question. The slice field accessors additionally
/// fail with [`KeyError::FieldUnspecified`] when the slice left that
/// field out.
///
/// ```
/// use ndkey::DimensionKey;
///
/// let key: DimensionKey<String> = DimensionKey::range(None, 4, None);
/// assert_eq!(key.to_string(), "Range(None, 4, None)");
/// assert!(key.start().is_err());
///
/// let resolved = key.resolve_against_size(5).unwrap();
/// assert_eq!(resolved.to_string(), "Range(0, 4, 1)");
/// ```
#[derive(Debug, Serialize, Deserialize, EnumAsInner)]
pub enum DimensionKey<T> {
    /// Selects a single element. Negative values count from the end;
    /// the value is stored as given.
    Position(i64),

    /// Selects a strided run of elements.
    Range(Range),

    /// Selects the elements named by an integer index tensor.
    Gather(Arc<T>),
}

impl<T> DimensionKey<T> {
    pub fn position(index: i64) -> Self {
        Self::Position(index)
    }

    /// A slice key. Each argument is either an integer or `None`:
    /// `DimensionKey::range(None, 4, None)` is `t[:4]`.
    pub fn range(
        start: impl Into<Option<i64>>,
        stop: impl Into<Option<i64>>,
        step: impl Into<Option<i64>>,
    ) -> Self {
        Self::Range(Range::new(start, stop, step))
    }

    /// The slice `:`, selecting a whole dimension.
    pub fn full() -> Self {
        Self::Range(Range::full())
    }

    pub fn gather(indices: Arc<T>) -> Self {
        Self::Gather(indices)
    }

    pub fn mode(&self) -> KeyMode {
        match self {
            Self::Position(_) => KeyMode::Position,
            Self::Range(_) => KeyMode::Range,
            Self::Gather(_) => KeyMode::Gather,
        }
    }

    /// The position of a position key.
    pub fn index(&self) -> Result<i64, KeyError> {
        match self {
            Self::Position(index) => Ok(*index),
            _ => Err(self.mismatch(KeyMode::Position)),
        }
    }

    /// The slice of a range key, with unspecified fields left as `None`.
    pub fn slice(&self) -> Result<&Range, KeyError> {
        match self {
            Self::Range(range) => Ok(range),
            _ => Err(self.mismatch(KeyMode::Range)),
        }
    }

    pub fn start(&self) -> Result<i64, KeyError> {
        self.slice_field(RangeField::Start)
    }

    pub fn stop(&self) -> Result<i64, KeyError> {
        self.slice_field(RangeField::Stop)
    }

    pub fn step(&self) -> Result<i64, KeyError> {
        self.slice_field(RangeField::Step)
    }

    /// The index tensor of a gather key. The returned handle is the one
    /// the key was built with.
    pub fn indices(&self) -> Result<&Arc<T>, KeyError> {
        match self {
            Self::Gather(indices) => Ok(indices),
            _ => Err(self.mismatch(KeyMode::Gather)),
        }
    }

    /// Produce a fully specified range key for a dimension of
    /// `dim_size` elements. See [`Range::resolve`]. Negative bounds are
    /// neither wrapped nor clamped here; that is left to whoever
    /// applies the key (see [`crate::bounds`]).
    pub fn resolve_against_size(&self, dim_size: i64) -> Result<Self, KeyError> {
        let resolved = self.slice()?.resolve(dim_size);
        tracing::trace!(slice = %resolved, dim_size, "resolved slice key");
        Ok(Self::Range(resolved))
    }

    fn slice_field(&self, field: RangeField) -> Result<i64, KeyError> {
        self.slice()?
            .field(field)
            .ok_or(KeyError::FieldUnspecified { field })
    }

    fn mismatch(&self, expected: KeyMode) -> KeyError {
        let actual = self.mode();
        tracing::debug!(%expected, %actual, "key accessed in the wrong mode");
        KeyError::ModeMismatch { expected, actual }
    }
}

impl<T> Clone for DimensionKey<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Position(index) => Self::Position(*index),
            Self::Range(range) => Self::Range(*range),
            Self::Gather(indices) => Self::Gather(Arc::clone(indices)),
        }
    }
}

// Gather keys are equal only when they share the same index tensor.
impl<T> PartialEq for DimensionKey<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Position(a), Self::Position(b)) => a == b,
            (Self::Range(a), Self::Range(b)) => a == b,
            (Self::Gather(a), Self::Gather(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T> Eq for DimensionKey<T> {}

struct FieldDisplay(Option<i64>);

impl fmt::Display for FieldDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value),
            None => f.write_str(UNSPECIFIED),
        }
    }
}

impl<T: fmt::Display> fmt::Display for DimensionKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(index) => write!(f, "Position({})", index),
            Self::Range(Range(start, stop, step)) => write!(
                f,
                "Range({}, {}, {})",
                FieldDisplay(*start),
                FieldDisplay(*stop),
                FieldDisplay(*step)
            ),
            Self::Gather(indices) => write!(f, "Gather({})", indices),
        }
    }
}

impl<T> FromStr for DimensionKey<T> {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::key(s)
    }
}

impl<T> From<i64> for DimensionKey<T> {
    fn from(index: i64) -> Self {
        Self::Position(index)
    }
}

impl<T> From<Range> for DimensionKey<T> {
    fn from(range: Range) -> Self {
        Self::Range(range)
    }
}

impl<T> From<std::ops::Range<i64>> for DimensionKey<T> {
    fn from(r: std::ops::Range<i64>) -> Self {
        Self::Range(r.into())
    }
}

impl<T> From<std::ops::RangeFrom<i64>> for DimensionKey<T> {
    fn from(r: std::ops::RangeFrom<i64>) -> Self {
        Self::Range(r.into())
    }
}

impl<T> From<std::ops::RangeTo<i64>> for DimensionKey<T> {
    fn from(r: std::ops::RangeTo<i64>) -> Self {
        Self::Range(r.into())
    }
}

impl<T> From<std::ops::RangeFull> for DimensionKey<T> {
    fn from(r: std::ops::RangeFull) -> Self {
        Self::Range(r.into())
    }
}

impl<T> From<Arc<T>> for DimensionKey<T> {
    fn from(indices: Arc<T>) -> Self {
        Self::Gather(indices)
    }
}

// Compile-time check: keys over a thread-safe tensor are themselves
// thread-safe.
fn _assert_key_traits<T: Send + Sync>()
where
    DimensionKey<T>: Send + Sync,
{
}
