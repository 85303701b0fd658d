//! OBJECT encoding: a versioned JSON envelope.
//!
//! Layout: `[version: u8][JSON document]`. Version 1 is the only version
//! written; any other leading byte fails to decode.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, TenetError};
use crate::types::PropertyType;

/// Envelope version written by this crate.
pub const OBJECT_FORMAT_VERSION: u8 = 1;

pub(crate) fn encode_object<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut out = vec![OBJECT_FORMAT_VERSION];
    serde_json::to_writer(&mut out, value)
        .map_err(|e| TenetError::internal(format!("failed to serialize object: {}", e)))?;
    Ok(out)
}

fn payload<'a>(bytes: &'a [u8], kind: &str) -> Result<&'a [u8]> {
    match bytes.split_first() {
        Some((&OBJECT_FORMAT_VERSION, payload)) => Ok(payload),
        Some((version, _)) => Err(TenetError::decode(
            kind,
            PropertyType::Object,
            format!("unsupported object format version {}", version),
        )),
        None => Err(TenetError::decode(
            kind,
            PropertyType::Object,
            "empty object blob",
        )),
    }
}

pub(crate) fn decode_object<T: DeserializeOwned>(bytes: &[u8], kind: &str) -> Result<T> {
    serde_json::from_slice(payload(bytes, kind)?)
        .map_err(|e| TenetError::decode(kind, PropertyType::Object, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_layout() {
        let encoded = encode_object(&vec![1, 2]).unwrap();
        assert_eq!(encoded[0], OBJECT_FORMAT_VERSION);
        assert_eq!(&encoded[1..], b"[1,2]");
    }

    #[test]
    fn test_unknown_version_rejected() {
        let err = decode_object::<i32>(b"\x0242", "i32").unwrap_err();
        assert!(err.to_string().contains("version 2"));
    }

    #[test]
    fn test_empty_blob_rejected() {
        assert!(decode_object::<String>(&[], "String").is_err());
    }

    #[test]
    fn test_type_mismatch() {
        let encoded = encode_object("hello").unwrap();
        let err = decode_object::<i64>(&encoded, "i64").unwrap_err();
        assert!(err.is_codec_error());
    }
}
