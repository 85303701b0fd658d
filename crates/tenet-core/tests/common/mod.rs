#![allow(dead_code)]
use std::fmt::Debug;

use tenet_core::{BlobMapping, PropertyType, PropertyValue};

/// Tenant id used across the integration tests.
pub const TENANT: u64 = 123456789012345678;

/// Every declared type, in a stable order.
pub const ALL_TYPES: [PropertyType; 3] = [
    PropertyType::Plain,
    PropertyType::Number,
    PropertyType::Object,
];

/// Encodes `value` as `ty`, decodes it back and asserts equality.
/// Panics with the type name on mismatch (intended for tests).
pub fn assert_round_trip<V>(ty: PropertyType, value: V)
where
    V: PropertyValue + PartialEq + Debug,
{
    let mapping = BlobMapping::encode(ty, &value)
        .unwrap_or_else(|e| panic!("encode {:?} as {}: {}", value, ty, e));
    let decoded: V = mapping
        .get()
        .unwrap_or_else(|e| panic!("decode {:?} as {}: {}", value, ty, e));
    assert_eq!(decoded, value, "round trip through {}", ty);
}
