//! Typed values that can be stored in a property.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{number, object, plain};
use crate::error::{Result, TenetError};
use crate::types::PropertyType;

/// A value that can be encoded into, and decoded from, a property blob.
///
/// The declared [`PropertyType`] of the property selects the encoding:
/// text for PLAIN, big-endian fixed width for NUMBER and a versioned JSON
/// envelope for OBJECT.
///
/// # Example
///
/// ```
/// use tenet_core::{PropertyType, PropertyValue};
///
/// let bytes = 42i32.encode(PropertyType::Number).unwrap();
/// assert_eq!(bytes, vec![0, 0, 0, 42]);
/// assert_eq!(i32::decode(&bytes, PropertyType::Number).unwrap(), 42);
/// ```
pub trait PropertyValue: Sized {
    /// Name of the value type, used in decode errors.
    fn kind() -> &'static str;

    /// Encodes the value for a property declared as `ty`.
    fn encode(&self, ty: PropertyType) -> Result<Vec<u8>>;

    /// Decodes a value stored in a property declared as `ty`.
    fn decode(bytes: &[u8], ty: PropertyType) -> Result<Self>;
}

macro_rules! numeric_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl PropertyValue for $t {
                fn kind() -> &'static str {
                    stringify!($t)
                }

                fn encode(&self, ty: PropertyType) -> Result<Vec<u8>> {
                    match ty {
                        PropertyType::Plain => Ok(plain::format_scalar(self)),
                        PropertyType::Number => Ok(number::encode_scalar(*self)),
                        PropertyType::Object => object::encode_object(self),
                    }
                }

                fn decode(bytes: &[u8], ty: PropertyType) -> Result<Self> {
                    match ty {
                        PropertyType::Plain => plain::parse_scalar(bytes, Self::kind()),
                        PropertyType::Number => number::decode_scalar(bytes),
                        PropertyType::Object => object::decode_object(bytes, Self::kind()),
                    }
                }
            }

            impl PropertyValue for Vec<$t> {
                fn kind() -> &'static str {
                    concat!("Vec<", stringify!($t), ">")
                }

                fn encode(&self, ty: PropertyType) -> Result<Vec<u8>> {
                    match ty {
                        PropertyType::Plain => Ok(plain::format_array(self)),
                        PropertyType::Number => Ok(number::encode_array(self)),
                        PropertyType::Object => object::encode_object(self),
                    }
                }

                fn decode(bytes: &[u8], ty: PropertyType) -> Result<Self> {
                    match ty {
                        PropertyType::Plain => plain::parse_array(bytes, Self::kind()),
                        PropertyType::Number => number::decode_array(bytes),
                        PropertyType::Object => object::decode_object(bytes, Self::kind()),
                    }
                }
            }
        )*
    };
}

numeric_value!(i16, i32, i64, f32, f64);

impl PropertyValue for bool {
    fn kind() -> &'static str {
        "bool"
    }

    fn encode(&self, ty: PropertyType) -> Result<Vec<u8>> {
        match ty {
            PropertyType::Plain => Ok(plain::format_scalar(self)),
            PropertyType::Number => Ok(number::encode_bool(*self)),
            PropertyType::Object => object::encode_object(self),
        }
    }

    fn decode(bytes: &[u8], ty: PropertyType) -> Result<Self> {
        match ty {
            PropertyType::Plain => plain::parse_bool(plain::text(bytes, Self::kind())?, Self::kind()),
            PropertyType::Number => number::decode_bool(bytes),
            PropertyType::Object => object::decode_object(bytes, Self::kind()),
        }
    }
}

impl PropertyValue for Vec<bool> {
    fn kind() -> &'static str {
        "Vec<bool>"
    }

    fn encode(&self, ty: PropertyType) -> Result<Vec<u8>> {
        match ty {
            PropertyType::Plain => Ok(plain::format_array(self)),
            PropertyType::Number => Ok(number::encode_bits(self)),
            PropertyType::Object => object::encode_object(self),
        }
    }

    fn decode(bytes: &[u8], ty: PropertyType) -> Result<Self> {
        match ty {
            PropertyType::Plain => plain::split(plain::text(bytes, Self::kind())?)
                .map(|element| plain::parse_bool(element, Self::kind()))
                .collect(),
            PropertyType::Number => number::decode_bits(bytes),
            PropertyType::Object => object::decode_object(bytes, Self::kind()),
        }
    }
}

impl PropertyValue for String {
    fn kind() -> &'static str {
        "String"
    }

    fn encode(&self, ty: PropertyType) -> Result<Vec<u8>> {
        match ty {
            PropertyType::Plain => Ok(self.as_bytes().to_vec()),
            PropertyType::Number => Err(TenetError::conversion(ty, Self::kind())),
            PropertyType::Object => object::encode_object(self),
        }
    }

    fn decode(bytes: &[u8], ty: PropertyType) -> Result<Self> {
        match ty {
            PropertyType::Plain => plain::text(bytes, Self::kind()).map(str::to_owned),
            PropertyType::Number => Err(TenetError::decode(
                Self::kind(),
                ty,
                "numeric blobs carry no text",
            )),
            PropertyType::Object => object::decode_object(bytes, Self::kind()),
        }
    }
}

/// PLAIN storage is lossy for elements containing the delimiter and for
/// `[""]`, which reads back as `[]`. OBJECT storage keeps both.
impl PropertyValue for Vec<String> {
    fn kind() -> &'static str {
        "Vec<String>"
    }

    fn encode(&self, ty: PropertyType) -> Result<Vec<u8>> {
        match ty {
            PropertyType::Plain => Ok(plain::format_array(self)),
            PropertyType::Number => Err(TenetError::conversion(ty, Self::kind())),
            PropertyType::Object => object::encode_object(self),
        }
    }

    fn decode(bytes: &[u8], ty: PropertyType) -> Result<Self> {
        match ty {
            PropertyType::Plain => Ok(plain::split(plain::text(bytes, Self::kind())?)
                .map(str::to_owned)
                .collect()),
            PropertyType::Number => Err(TenetError::decode(
                Self::kind(),
                ty,
                "numeric blobs carry no text",
            )),
            PropertyType::Object => object::decode_object(bytes, Self::kind()),
        }
    }
}

/// Wrapper storing any serde type as an OBJECT property.
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use tenet_core::{Json, PropertyType, PropertyValue};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Welcome {
///     channel: u64,
///     text: String,
/// }
///
/// let value = Json(Welcome { channel: 1, text: "hi".into() });
/// let bytes = value.encode(PropertyType::Object).unwrap();
/// let back = Json::<Welcome>::decode(&bytes, PropertyType::Object).unwrap();
/// assert_eq!(back.0, value.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Unwraps the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> PropertyValue for Json<T>
where
    T: Serialize + DeserializeOwned,
{
    fn kind() -> &'static str {
        std::any::type_name::<T>()
    }

    fn encode(&self, ty: PropertyType) -> Result<Vec<u8>> {
        match ty {
            PropertyType::Object => object::encode_object(&self.0),
            _ => Err(TenetError::conversion(ty, Self::kind())),
        }
    }

    fn decode(bytes: &[u8], ty: PropertyType) -> Result<Self> {
        match ty {
            PropertyType::Object => object::decode_object(bytes, Self::kind()).map(Json),
            _ => Err(TenetError::decode(
                Self::kind(),
                ty,
                "structured values are only stored as OBJECT",
            )),
        }
    }
}
