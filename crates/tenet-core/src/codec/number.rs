//! NUMBER encoding: fixed-width big-endian primitives.
//!
//! Scalars occupy exactly their width. Arrays are the concatenation of
//! their elements, so the element count is the byte length divided by the
//! width. Booleans are one byte as scalars; boolean arrays are bit-packed
//! (most significant bit first) behind a one-byte header holding the number
//! of padding bits in the last byte.

use crate::error::{Result, TenetError};
use crate::types::PropertyType;

/// A primitive with a fixed big-endian byte layout.
pub(crate) trait FixedWidth: Copy {
    const WIDTH: usize;
    const NAME: &'static str;

    fn write_be(self, out: &mut Vec<u8>);

    /// `chunk` is exactly `WIDTH` bytes long.
    fn read_be(chunk: &[u8]) -> Self;
}

macro_rules! fixed_width {
    ($($t:ty),* $(,)?) => {
        $(
            impl FixedWidth for $t {
                const WIDTH: usize = std::mem::size_of::<$t>();
                const NAME: &'static str = stringify!($t);

                fn write_be(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_be_bytes());
                }

                fn read_be(chunk: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$t>()];
                    buf.copy_from_slice(chunk);
                    <$t>::from_be_bytes(buf)
                }
            }
        )*
    };
}

fixed_width!(i16, i32, i64, f32, f64);

pub(crate) fn encode_scalar<T: FixedWidth>(value: T) -> Vec<u8> {
    let mut out = Vec::with_capacity(T::WIDTH);
    value.write_be(&mut out);
    out
}

pub(crate) fn decode_scalar<T: FixedWidth>(bytes: &[u8]) -> Result<T> {
    if bytes.len() != T::WIDTH {
        return Err(TenetError::decode(
            T::NAME,
            PropertyType::Number,
            format!("expected {} bytes, found {}", T::WIDTH, bytes.len()),
        ));
    }
    Ok(T::read_be(bytes))
}

pub(crate) fn encode_array<T: FixedWidth>(values: &[T]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * T::WIDTH);
    for value in values {
        value.write_be(&mut out);
    }
    out
}

pub(crate) fn decode_array<T: FixedWidth>(bytes: &[u8]) -> Result<Vec<T>> {
    if bytes.len() % T::WIDTH != 0 {
        return Err(TenetError::decode(
            format!("Vec<{}>", T::NAME),
            PropertyType::Number,
            format!(
                "{} bytes is not a multiple of the {}-byte element width",
                bytes.len(),
                T::WIDTH
            ),
        ));
    }
    Ok(bytes.chunks_exact(T::WIDTH).map(T::read_be).collect())
}

pub(crate) fn encode_bool(value: bool) -> Vec<u8> {
    vec![u8::from(value)]
}

pub(crate) fn decode_bool(bytes: &[u8]) -> Result<bool> {
    match bytes {
        [b] => Ok(*b != 0),
        _ => Err(TenetError::decode(
            "bool",
            PropertyType::Number,
            format!("expected 1 byte, found {}", bytes.len()),
        )),
    }
}

pub(crate) fn encode_bits(values: &[bool]) -> Vec<u8> {
    if values.is_empty() {
        return Vec::new();
    }

    let byte_len = values.len().div_ceil(8);
    let padding = (byte_len * 8 - values.len()) as u8;

    let mut out = vec![0u8; byte_len + 1];
    out[0] = padding;
    for (i, _) in values.iter().enumerate().filter(|(_, set)| **set) {
        out[1 + i / 8] |= 0x80 >> (i % 8);
    }
    out
}

pub(crate) fn decode_bits(bytes: &[u8]) -> Result<Vec<bool>> {
    let Some((&padding, data)) = bytes.split_first() else {
        return Ok(Vec::new());
    };

    if data.is_empty() || padding > 7 {
        return Err(TenetError::decode(
            "Vec<bool>",
            PropertyType::Number,
            format!(
                "invalid bit array header: {} padding bits over {} bytes",
                padding,
                data.len()
            ),
        ));
    }

    let len = data.len() * 8 - padding as usize;
    Ok((0..len)
        .map(|i| data[i / 8] & (0x80 >> (i % 8)) != 0)
        .collect())
}
