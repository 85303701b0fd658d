//! Validation of property coordinates and tenant lookups.
//!
//! Lookups are snowflake ids: the upper 42 bits hold milliseconds since the
//! platform epoch (2015-01-01T00:00:00Z). A lookup is accepted when its
//! embedded timestamp is at least one millisecond past the epoch and not
//! later than the current time plus [`LOOKUP_CLOCK_SKEW_MS`].

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Result, TenetError};

/// Maximum category length, in characters.
pub const MAX_CATEGORY_LEN: usize = 50;

/// Maximum key length, in characters.
pub const MAX_KEY_LEN: usize = 500;

/// Platform epoch of snowflake ids, in Unix milliseconds.
pub const PLATFORM_EPOCH_MS: u64 = 1_420_070_400_000;

/// Number of low bits below the timestamp in a snowflake id.
pub const TIMESTAMP_SHIFT: u32 = 22;

/// Smallest acceptable lookup: timestamp of one millisecond past the epoch.
pub const MIN_LOOKUP: u64 = 1 << TIMESTAMP_SHIFT;

/// Tolerated clock difference between the id issuer and this process.
pub const LOOKUP_CLOCK_SKEW_MS: u64 = 60_000;

/// Validates a property category.
pub fn validate_category(category: &str) -> Result<()> {
    validate_coordinate("category", category, MAX_CATEGORY_LEN)
}

/// Validates a property key.
pub fn validate_key(key: &str) -> Result<()> {
    validate_coordinate("key", key, MAX_KEY_LEN)
}

fn validate_coordinate(field: &str, value: &str, max_len: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TenetError::validation(field, "must not be blank"));
    }

    let len = value.chars().count();
    if len > max_len {
        return Err(TenetError::validation(
            field,
            format!("length {} exceeds maximum of {}", len, max_len),
        ));
    }

    Ok(())
}

/// Returns the Unix-millisecond timestamp embedded in a raw lookup.
pub fn lookup_timestamp_millis(raw: u64) -> u64 {
    (raw >> TIMESTAMP_SHIFT).saturating_add(PLATFORM_EPOCH_MS)
}

/// Validates a raw tenant lookup against the snowflake range.
pub fn validate_lookup(raw: u64) -> Result<()> {
    validate_lookup_at(raw, now_millis())
}

/// Validates a raw lookup against an explicit current time.
pub fn validate_lookup_at(raw: u64, now_ms: u64) -> Result<()> {
    if raw < MIN_LOOKUP {
        return Err(TenetError::validation(
            "lookup",
            format!("{} is below the minimum tenant id {}", raw, MIN_LOOKUP),
        ));
    }

    let created = lookup_timestamp_millis(raw);
    if created > now_ms.saturating_add(LOOKUP_CLOCK_SKEW_MS) {
        return Err(TenetError::validation(
            "lookup",
            format!("{} encodes a creation time in the future", raw),
        ));
    }

    Ok(())
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(PLATFORM_EPOCH_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_length_boundary() {
        assert!(validate_category(&"c".repeat(50)).is_ok());
        assert!(validate_category(&"c".repeat(51)).is_err());
    }

    #[test]
    fn test_key_length_boundary() {
        assert!(validate_key(&"k".repeat(500)).is_ok());
        assert!(validate_key(&"k".repeat(501)).is_err());
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        assert!(validate_category(&"é".repeat(50)).is_ok());
    }

    #[test]
    fn test_blank_rejected() {
        assert!(validate_category("").is_err());
        assert!(validate_category("   ").is_err());
        assert!(validate_key("\t").is_err());
    }

    #[test]
    fn test_lookup_lower_bound() {
        assert!(validate_lookup(0).is_err());
        assert!(validate_lookup(MIN_LOOKUP - 1).is_err());
        assert!(validate_lookup(MIN_LOOKUP).is_ok());
    }

    #[test]
    fn test_lookup_future_rejected() {
        let now = PLATFORM_EPOCH_MS + 1_000_000;
        let in_range = 1_000_000u64 << TIMESTAMP_SHIFT;
        let future = (1_000_000u64 + LOOKUP_CLOCK_SKEW_MS + 1) << TIMESTAMP_SHIFT;

        assert!(validate_lookup_at(in_range, now).is_ok());
        assert!(validate_lookup_at(future, now).is_err());
        assert!(validate_lookup(u64::MAX).is_err());
    }

    #[test]
    fn test_known_tenant_ids() {
        assert!(validate_lookup(123456789012345678).is_ok());
        assert!(validate_lookup(80351110224678912).is_ok());
    }

    #[test]
    fn test_timestamp_extraction() {
        assert_eq!(lookup_timestamp_millis(MIN_LOOKUP), PLATFORM_EPOCH_MS + 1);
    }
}
