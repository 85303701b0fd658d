mod common;

use common::TENANT;
use tenet_core::{Lookup, PropertyInfo, PropertyType, Result, TenetError};

#[test]
fn test_category_boundary() {
    let ok = PropertyInfo::new(1, "c".repeat(50), "key", true, PropertyType::Plain);
    let too_long = PropertyInfo::new(1, "c".repeat(51), "key", true, PropertyType::Plain);

    assert!(ok.is_ok());
    match too_long {
        Err(TenetError::Validation { field, .. }) => assert_eq!(field, "category"),
        other => panic!("expected category validation error, got {:?}", other),
    }
}

#[test]
fn test_key_boundary() {
    let ok = PropertyInfo::new(1, "moderation", "k".repeat(500), true, PropertyType::Plain);
    let too_long = PropertyInfo::new(1, "moderation", "k".repeat(501), true, PropertyType::Plain);

    assert!(ok.is_ok());
    match too_long {
        Err(TenetError::Validation { field, .. }) => assert_eq!(field, "key"),
        other => panic!("expected key validation error, got {:?}", other),
    }
}

#[test]
fn test_lookup_workflow() {
    fn scoped(raw: u64) -> Result<String> {
        let lookup = Lookup::new(raw)?;
        Ok(format!("tenant {}", lookup))
    }

    assert_eq!(scoped(TENANT).unwrap(), format!("tenant {}", TENANT));

    let err = scoped(42).unwrap_err();
    assert!(err.is_validation_error());
    assert!(err.to_string().contains("lookup"));
}

#[test]
fn test_lookup_timestamp_is_after_epoch() {
    let lookup = Lookup::new(TENANT).unwrap();
    assert!(lookup.timestamp_millis() > tenet_core::validation::PLATFORM_EPOCH_MS);
}

#[test]
fn test_property_info_identity() {
    let a = PropertyInfo::new(4, "moderation", "auto_mod_enabled", true, PropertyType::Number)
        .unwrap();
    let b = a.clone();

    assert_eq!(a, b);
    assert_eq!(a.category(), "moderation");
    assert_eq!(a.name(), "auto_mod_enabled");
    assert!(a.is_modifiable());
    assert_eq!(a.property_type(), PropertyType::Number);
}

#[test]
fn test_error_propagation_with_question_mark() {
    fn step1() -> Result<()> {
        Err(TenetError::unavailable("schema not created"))
    }

    fn step2() -> Result<String> {
        step1()?;
        Ok("success".into())
    }

    let err = step2().unwrap_err();
    assert!(err.is_transient());
}
