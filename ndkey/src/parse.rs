//! Parsing keys from Python subscript syntax.
//!
//! A key for one dimension is written the way it would appear between
//! brackets in Python:
//!
//! ```text
//! key      := slice | integer
//! slice    := [integer] ':' [integer] [':' [integer]]
//! integer  := ['-' | '+'] digit+
//! ```
//!
//! So `3` and `-1` are position keys, while `:`, `1:`, `:4`, `1:4:2`
//! and `::-1` are range keys. Whitespace is allowed between tokens but
//! not inside an integer, so `1 : 4` is a slice while `1 2` is an
//! error. Gather keys have no textual form.
//!
//! ```
//! use ndkey::DimensionKey;
//! use ndkey::Range;
//!
//! let key: DimensionKey<String> = ndkey::parse::key("1 : -1 : 2").unwrap();
//! assert_eq!(key.slice().unwrap(), &Range(Some(1), Some(-1), Some(2)));
//!
//! let key: DimensionKey<String> = "-3".parse().unwrap();
//! assert_eq!(key.index().unwrap(), -3);
//! ```

use nom::IResult;
use nom::branch::alt;
use nom::character::complete::char;
use nom::character::complete::digit1;
use nom::character::complete::multispace0;
use nom::character::complete::one_of;
use nom::combinator::all_consuming;
use nom::combinator::map;
use nom::combinator::map_res;
use nom::combinator::opt;
use nom::combinator::recognize;
use nom::sequence::delimited;
use nom::sequence::pair;
use nom::sequence::preceded;

use crate::DimensionKey;
use crate::KeyError;
use crate::Range;

/// A signed decimal literal that fits in an `i64`.
pub fn integer(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(one_of("+-")), digit1)), str::parse::<i64>)(input)
}

/// `inner`, with optional whitespace on either side.
fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// A slice with at least one colon.
pub fn slice(input: &str) -> IResult<&str, Range> {
    let (input, start) = opt(ws(integer))(input)?;
    let (input, _) = ws(char(':'))(input)?;
    let (input, stop) = opt(ws(integer))(input)?;
    let (input, step) = opt(preceded(ws(char(':')), opt(ws(integer))))(input)?;
    Ok((input, Range(start, stop, step.flatten())))
}

pub fn expression<T>(input: &str) -> IResult<&str, DimensionKey<T>> {
    alt((
        map(slice, DimensionKey::Range),
        map(ws(integer), DimensionKey::Position),
    ))(input)
}

/// Parse a complete key. Whitespace may surround tokens.
pub fn key<T>(input: &str) -> Result<DimensionKey<T>, KeyError> {
    match all_consuming(expression::<T>)(input) {
        Ok((_, key)) => Ok(key),
        Err(err) => {
            tracing::debug!(input, %err, "failed to parse key");
            Err(KeyError::ParseError {
                input: input.to_string(),
                reason: err.to_string(),
            })
        }
    }
}
