//! PLAIN encoding: UTF-8 text, arrays joined with [`DELIMITER`].
//!
//! Elements are not escaped, so string array elements containing the
//! delimiter do not survive a round trip. Empty text always reads back as
//! an empty array, so a string array holding one empty string is stored as
//! "" and decodes to no elements. Use OBJECT for arrays that need either.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::{Result, TenetError};
use crate::types::PropertyType;

/// Separator between array elements.
pub const DELIMITER: char = ',';

pub(crate) fn text<'a>(bytes: &'a [u8], kind: &str) -> Result<&'a str> {
    std::str::from_utf8(bytes)
        .map_err(|e| TenetError::decode(kind, PropertyType::Plain, e.to_string()))
}

pub(crate) fn format_scalar<T: Display>(value: &T) -> Vec<u8> {
    value.to_string().into_bytes()
}

pub(crate) fn parse_scalar<T>(bytes: &[u8], kind: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    parse_text(text(bytes, kind)?, kind)
}

fn parse_text<T>(text: &str, kind: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    text.trim().parse::<T>().map_err(|e| {
        TenetError::decode(
            kind,
            PropertyType::Plain,
            format!("'{}' does not parse: {}", text, e),
        )
    })
}

pub(crate) fn format_array<T: Display>(values: &[T]) -> Vec<u8> {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string())
        .into_bytes()
}

pub(crate) fn parse_array<T>(bytes: &[u8], kind: &str) -> Result<Vec<T>>
where
    T: FromStr,
    T::Err: Display,
{
    split(text(bytes, kind)?)
        .map(|element| parse_text(element, kind))
        .collect()
}

/// Splits stored text into array elements; empty text is an empty array.
pub(crate) fn split(text: &str) -> impl Iterator<Item = &str> {
    let mut parts = text.split(DELIMITER);
    if text.is_empty() {
        // Consume the single empty element `split` yields for "".
        parts.next();
    }
    parts
}

pub(crate) fn parse_bool(text: &str, kind: &str) -> Result<bool> {
    match text.trim() {
        t if t.eq_ignore_ascii_case("true") => Ok(true),
        t if t.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(TenetError::decode(
            kind,
            PropertyType::Plain,
            format!("'{}' is not a boolean", other),
        )),
    }
}
