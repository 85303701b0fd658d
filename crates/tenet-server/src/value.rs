//! Conversion between JSON request values and property encodings.

use serde_json::Value;
use tenet_core::{BlobMapping, Json, PropertyType, PropertyValue};

use crate::error::AppError;

/// Encodes a JSON value for a property of the given type.
///
/// - PLAIN accepts strings, numbers and booleans as text, and arrays of them
///   as a comma-joined list.
/// - NUMBER accepts booleans, integers, floats and homogeneous arrays of
///   those. Integers are stored as i64, other numbers as f64.
/// - OBJECT accepts any JSON document.
pub fn encode_json(property_type: PropertyType, value: &Value) -> Result<Vec<u8>, AppError> {
    let bytes = match property_type {
        PropertyType::Plain => encode_plain(value)?,
        PropertyType::Number => encode_number(value)?,
        PropertyType::Object => Json(value.clone()).encode(property_type)?,
    };
    Ok(bytes)
}

fn scalar_text(value: &Value) -> Result<String, AppError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(AppError::BadRequest(
            "PLAIN values must be strings, numbers, booleans or arrays of them".to_string(),
        )),
    }
}

fn encode_plain(value: &Value) -> Result<Vec<u8>, AppError> {
    let bytes = match value {
        Value::Array(items) => items
            .iter()
            .map(scalar_text)
            .collect::<Result<Vec<_>, _>>()?
            .encode(PropertyType::Plain)?,
        other => scalar_text(other)?.encode(PropertyType::Plain)?,
    };
    Ok(bytes)
}

fn encode_number(value: &Value) -> Result<Vec<u8>, AppError> {
    let ty = PropertyType::Number;
    let bytes = match value {
        Value::Bool(b) => b.encode(ty)?,
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.encode(ty)?,
            None => n.as_f64().unwrap_or(f64::NAN).encode(ty)?,
        },
        Value::Array(items) if items.iter().all(Value::is_boolean) => items
            .iter()
            .filter_map(Value::as_bool)
            .collect::<Vec<_>>()
            .encode(ty)?,
        Value::Array(items) if items.iter().all(Value::is_i64) => items
            .iter()
            .filter_map(Value::as_i64)
            .collect::<Vec<_>>()
            .encode(ty)?,
        Value::Array(items) if items.iter().all(Value::is_number) => items
            .iter()
            .filter_map(Value::as_f64)
            .collect::<Vec<_>>()
            .encode(ty)?,
        _ => {
            return Err(AppError::BadRequest(
                "NUMBER values must be booleans, numbers or homogeneous arrays of them"
                    .to_string(),
            ));
        },
    };
    Ok(bytes)
}

/// Renders a stored value as JSON.
///
/// Without a requested type, PLAIN and NUMBER values render as their plain
/// text (NUMBER values wider than one byte as hex, since the stored bytes do
/// not say which primitive they hold) and OBJECT values as their JSON
/// document. `as_type` names an
/// accessor (`bool`, `i16`, `i32`, `i64`, `f32`, `f64`, `string`, each
/// optionally suffixed with `[]`, or `json`) to decode with instead.
pub fn render(mapping: &BlobMapping, as_type: Option<&str>) -> Result<Value, AppError> {
    let Some(as_type) = as_type else {
        return Ok(match mapping.property_type() {
            PropertyType::Object => mapping.to_json()?,
            _ => Value::String(mapping.to_plain_text()?),
        });
    };

    let value = match as_type.trim() {
        "bool" => Value::from(mapping.as_bool()?),
        "i16" => Value::from(mapping.as_i16()?),
        "i32" => Value::from(mapping.as_i32()?),
        "i64" => Value::from(mapping.as_i64()?),
        "f32" => Value::from(mapping.as_f32()?),
        "f64" => Value::from(mapping.as_f64()?),
        "string" => Value::from(mapping.as_string()?),
        "bool[]" => Value::from(mapping.as_bool_array()?),
        "i16[]" => Value::from(mapping.as_i16_array()?),
        "i32[]" => Value::from(mapping.as_i32_array()?),
        "i64[]" => Value::from(mapping.as_i64_array()?),
        "f32[]" => Value::from(mapping.as_f32_array()?),
        "f64[]" => Value::from(mapping.as_f64_array()?),
        "string[]" => Value::from(mapping.as_string_array()?),
        "json" => mapping.to_json()?,
        other => {
            return Err(AppError::BadRequest(format!(
                "unknown value type '{}'",
                other
            )));
        },
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(ty: PropertyType, value: Value) -> BlobMapping {
        BlobMapping::new(ty, encode_json(ty, &value).unwrap())
    }

    #[test]
    fn test_plain_scalars_and_arrays() {
        let m = mapping(PropertyType::Plain, json!("Welcome!"));
        assert_eq!(render(&m, None).unwrap(), json!("Welcome!"));

        let m = mapping(PropertyType::Plain, json!(["spam", 3, true]));
        assert_eq!(render(&m, None).unwrap(), json!("spam,3,true"));
        assert_eq!(
            render(&m, Some("string[]")).unwrap(),
            json!(["spam", "3", "true"])
        );
    }

    #[test]
    fn test_number_values() {
        let m = mapping(PropertyType::Number, json!(true));
        assert_eq!(m.len(), 1);
        assert_eq!(render(&m, None).unwrap(), json!("true"));

        let m = mapping(PropertyType::Number, json!(-12));
        assert_eq!(render(&m, None).unwrap(), json!("fffffffffffffff4"));
        assert_eq!(render(&m, Some("i64")).unwrap(), json!(-12));

        let m = mapping(PropertyType::Number, json!(2.5));
        assert_eq!(render(&m, None).unwrap(), json!("4004000000000000"));
        assert_eq!(render(&m, Some("f64")).unwrap(), json!(2.5));

        let m = mapping(PropertyType::Number, json!([1, 2, 3]));
        assert_eq!(render(&m, Some("i64[]")).unwrap(), json!([1, 2, 3]));

        let m = mapping(PropertyType::Number, json!([true, false]));
        assert_eq!(render(&m, None).unwrap(), json!("0680"));
        assert_eq!(render(&m, Some("bool[]")).unwrap(), json!([true, false]));
    }

    #[test]
    fn test_number_rejects_text() {
        let err = encode_json(PropertyType::Number, &json!("five")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = encode_json(PropertyType::Number, &json!([1, "two"])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_object_document() {
        let doc = json!({"enabled": true, "banned_words": ["spam"]});
        let m = mapping(PropertyType::Object, doc.clone());

        assert_eq!(render(&m, None).unwrap(), doc);
        assert!(matches!(
            render(&m, Some("string")).unwrap_err(),
            AppError::Store(_)
        ));
    }

    #[test]
    fn test_unknown_accessor() {
        let m = mapping(PropertyType::Plain, json!("x"));
        assert!(matches!(
            render(&m, Some("u128")).unwrap_err(),
            AppError::BadRequest(_)
        ));
    }
}
