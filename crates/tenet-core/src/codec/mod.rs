//! Value codec: typed values to and from raw property blobs.
//!
//! The stored bytes of a property are interpreted according to its declared
//! [`PropertyType`]. [`BlobMapping`] pairs the two and exposes one accessor
//! per supported type.

mod number;
mod object;
mod plain;
mod value;

pub use object::OBJECT_FORMAT_VERSION;
pub use plain::DELIMITER;
pub use value::{Json, PropertyValue};

use std::fmt::Write;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::{Result, TenetError};
use crate::types::PropertyType;

/// A stored blob decoded lazily through its declared type.
///
/// Cloning is cheap; the bytes are shared.
///
/// # Example
///
/// ```
/// use tenet_core::{BlobMapping, PropertyType};
///
/// let mapping = BlobMapping::encode(PropertyType::Number, &true).unwrap();
/// assert!(mapping.as_bool().unwrap());
/// assert_eq!(mapping.to_plain_text().unwrap(), "true");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobMapping {
    property_type: PropertyType,
    bytes: Arc<[u8]>,
}

impl BlobMapping {
    /// Wraps raw stored bytes.
    pub fn new(property_type: PropertyType, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            property_type,
            bytes: bytes.into(),
        }
    }

    /// Encodes a typed value for a property declared as `property_type`.
    pub fn encode<V: PropertyValue>(property_type: PropertyType, value: &V) -> Result<Self> {
        Ok(Self::new(property_type, value.encode(property_type)?))
    }

    /// Returns the declared type.
    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    /// Returns the raw bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the blob length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the blob is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decodes the blob as `V`.
    pub fn get<V: PropertyValue>(&self) -> Result<V> {
        V::decode(&self.bytes, self.property_type)
    }

    pub fn as_bool(&self) -> Result<bool> {
        self.get()
    }

    pub fn as_i16(&self) -> Result<i16> {
        self.get()
    }

    pub fn as_i32(&self) -> Result<i32> {
        self.get()
    }

    pub fn as_i64(&self) -> Result<i64> {
        self.get()
    }

    pub fn as_f32(&self) -> Result<f32> {
        self.get()
    }

    pub fn as_f64(&self) -> Result<f64> {
        self.get()
    }

    pub fn as_string(&self) -> Result<String> {
        self.get()
    }

    pub fn as_bool_array(&self) -> Result<Vec<bool>> {
        self.get()
    }

    pub fn as_i16_array(&self) -> Result<Vec<i16>> {
        self.get()
    }

    pub fn as_i32_array(&self) -> Result<Vec<i32>> {
        self.get()
    }

    pub fn as_i64_array(&self) -> Result<Vec<i64>> {
        self.get()
    }

    pub fn as_f32_array(&self) -> Result<Vec<f32>> {
        self.get()
    }

    pub fn as_f64_array(&self) -> Result<Vec<f64>> {
        self.get()
    }

    pub fn as_string_array(&self) -> Result<Vec<String>> {
        self.get()
    }

    /// Decodes an OBJECT blob into any deserializable type.
    pub fn as_object<T: DeserializeOwned>(&self) -> Result<T> {
        match self.property_type {
            PropertyType::Object => {
                object::decode_object(&self.bytes, std::any::type_name::<T>())
            },
            declared => Err(TenetError::decode(
                std::any::type_name::<T>(),
                declared,
                "structured values are only stored as OBJECT",
            )),
        }
    }

    /// Renders the value as text an end user can read.
    ///
    /// PLAIN blobs are returned as stored. NUMBER blobs do not record which
    /// primitive they hold: a single byte can only be a boolean and renders
    /// as `true`/`false`, every other width renders as lowercase hex of the
    /// big-endian bytes. Decode with a typed accessor to get the number
    /// itself. OBJECT blobs are not user readable and fail with a
    /// conversion error.
    pub fn to_plain_text(&self) -> Result<String> {
        match self.property_type {
            PropertyType::Plain => self.as_string(),
            PropertyType::Number if self.bytes.len() == 1 => {
                Ok(number::decode_bool(&self.bytes)?.to_string())
            },
            PropertyType::Number => Ok(self.bytes.iter().fold(
                String::with_capacity(self.bytes.len() * 2),
                |mut out, b| {
                    let _ = write!(out, "{:02x}", b);
                    out
                },
            )),
            PropertyType::Object => Err(TenetError::conversion(self.property_type, "plain text")),
        }
    }

    /// Returns the JSON document of an OBJECT blob.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        self.as_object()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_is_not_plain_text() {
        let mapping = BlobMapping::encode(PropertyType::Object, &5i32).unwrap();
        let err = mapping.to_plain_text().unwrap_err();

        assert!(matches!(err, TenetError::Conversion { .. }));
        assert_eq!(mapping.as_i32().unwrap(), 5);
    }

    #[test]
    fn test_number_plain_text_is_bool_or_hex() {
        let cases = [
            (BlobMapping::encode(PropertyType::Number, &false).unwrap(), "false"),
            (BlobMapping::encode(PropertyType::Number, &-3i16).unwrap(), "fffd"),
            (BlobMapping::encode(PropertyType::Number, &70000i32).unwrap(), "00011170"),
            (
                BlobMapping::encode(PropertyType::Number, &-1i64).unwrap(),
                "ffffffffffffffff",
            ),
            (BlobMapping::encode(PropertyType::Number, &1.0f32).unwrap(), "3f800000"),
            (
                BlobMapping::encode(PropertyType::Number, &2.5f64).unwrap(),
                "4004000000000000",
            ),
            (BlobMapping::new(PropertyType::Number, vec![0xab, 0x01, 0xff]), "ab01ff"),
            (BlobMapping::new(PropertyType::Number, Vec::new()), ""),
        ];

        for (mapping, expected) in cases {
            assert_eq!(mapping.to_plain_text().unwrap(), expected);
        }
    }

    #[test]
    fn test_number_plain_text_never_reads_floats_as_integers() {
        let mapping = BlobMapping::encode(PropertyType::Number, &2.5f64).unwrap();

        assert_ne!(mapping.to_plain_text().unwrap(), "4612811918334230528");
        assert_eq!(mapping.as_f64().unwrap(), 2.5);
    }

    #[test]
    fn test_bool_array_plain_text_is_hex() {
        // One padding header byte of 7, then 0b1000_0000.
        let mapping = BlobMapping::encode(PropertyType::Number, &vec![true]).unwrap();

        assert_eq!(mapping.to_plain_text().unwrap(), "0780");
        assert_eq!(mapping.as_bool_array().unwrap(), vec![true]);
    }

    #[test]
    fn test_plain_text_passthrough() {
        let mapping = BlobMapping::new(PropertyType::Plain, b"hello".to_vec());
        assert_eq!(mapping.to_plain_text().unwrap(), "hello");
    }

    #[test]
    fn test_as_object_on_plain_fails() {
        let mapping = BlobMapping::new(PropertyType::Plain, b"{}".to_vec());
        assert!(mapping.as_object::<serde_json::Value>().is_err());
    }

    #[test]
    fn test_to_json() {
        let mapping = BlobMapping::encode(
            PropertyType::Object,
            &Json(serde_json::json!({"enabled": true})),
        )
        .unwrap();
        assert_eq!(mapping.to_json().unwrap()["enabled"], true);
    }

    #[test]
    fn test_clone_shares_bytes() {
        let mapping = BlobMapping::new(PropertyType::Plain, b"abc".to_vec());
        let copy = mapping.clone();
        assert!(Arc::ptr_eq(&mapping.bytes, &copy.bytes));
    }
}
