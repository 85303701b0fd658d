//! Common type definitions and newtypes for Tenet.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TenetError};
use crate::validation;

/// Encoding family of a stored property value.
///
/// # Example
///
/// ```
/// use tenet_core::PropertyType;
///
/// let ty: PropertyType = "number".parse().unwrap();
/// assert_eq!(ty, PropertyType::Number);
/// assert_eq!(ty.to_string(), "NUMBER");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PropertyType {
    /// Human-readable text; arrays are comma-joined.
    Plain,
    /// Fixed-width big-endian primitives.
    Number,
    /// Versioned JSON document.
    Object,
}

impl PropertyType {
    /// Returns the canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Plain => "PLAIN",
            PropertyType::Number => "NUMBER",
            PropertyType::Object => "OBJECT",
        }
    }

    /// Returns true if values of this type can be shown to end users as text.
    pub fn is_user_readable(&self) -> bool {
        !matches!(self, PropertyType::Object)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = TenetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PLAIN" => Ok(PropertyType::Plain),
            "NUMBER" => Ok(PropertyType::Number),
            "OBJECT" => Ok(PropertyType::Object),
            other => Err(TenetError::validation(
                "type",
                format!("unknown property type '{}'", other),
            )),
        }
    }
}

/// Immutable metadata identifying a registered property.
///
/// A property is unique by `(category, name)` and, once persisted, by `id`.
///
/// # Example
///
/// ```
/// use tenet_core::{PropertyInfo, PropertyType};
///
/// let info = PropertyInfo::new(7, "moderation", "auto_mod_enabled", true, PropertyType::Number)
///     .unwrap();
/// assert_eq!(info.id(), 7);
/// assert_eq!(info.to_string(), "moderation/auto_mod_enabled#7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PropertyInfoRecord")]
pub struct PropertyInfo {
    id: i32,
    category: String,
    name: String,
    modifiable: bool,
    #[serde(rename = "type")]
    property_type: PropertyType,
}

impl PropertyInfo {
    /// Creates property metadata, validating the id, category and name.
    pub fn new(
        id: i32,
        category: impl Into<String>,
        name: impl Into<String>,
        modifiable: bool,
        property_type: PropertyType,
    ) -> Result<Self> {
        let category = category.into();
        let name = name.into();

        if id < 0 {
            return Err(TenetError::validation(
                "id",
                format!("property id must be non-negative, got {}", id),
            ));
        }
        validation::validate_category(&category)?;
        validation::validate_key(&name)?;

        Ok(Self {
            id,
            category,
            name,
            modifiable,
            property_type,
        })
    }

    /// Returns the store-assigned id.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Returns the category, usually the owning feature's name.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the property key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether end users may modify the value.
    pub fn is_modifiable(&self) -> bool {
        self.modifiable
    }

    /// Returns the declared encoding family.
    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }
}

/// Unvalidated wire form of [`PropertyInfo`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PropertyInfoRecord {
    id: i32,
    category: String,
    name: String,
    modifiable: bool,
    #[serde(rename = "type")]
    property_type: PropertyType,
}

impl TryFrom<PropertyInfoRecord> for PropertyInfo {
    type Error = TenetError;

    fn try_from(record: PropertyInfoRecord) -> Result<Self> {
        PropertyInfo::new(
            record.id,
            record.category,
            record.name,
            record.modifiable,
            record.property_type,
        )
    }
}

impl fmt::Display for PropertyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.category, self.name, self.id)
    }
}

/// Validated tenant identifier.
///
/// The only way to obtain a `Lookup` is through validation, so a value of
/// this type can always be handed to a backing store.
///
/// # Example
///
/// ```
/// use tenet_core::Lookup;
///
/// let lookup = Lookup::new(123456789012345678).unwrap();
/// assert_eq!(lookup.get(), 123456789012345678);
/// assert!(Lookup::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Lookup(u64);

impl Lookup {
    /// Validates and wraps a raw tenant id.
    pub fn new(raw: u64) -> Result<Self> {
        validation::validate_lookup(raw)?;
        Ok(Self(raw))
    }

    /// Returns the raw id.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Returns the creation time encoded in the id, as milliseconds since the
    /// Unix epoch.
    pub fn timestamp_millis(&self) -> u64 {
        validation::lookup_timestamp_millis(self.0)
    }
}

impl TryFrom<u64> for Lookup {
    type Error = TenetError;

    fn try_from(raw: u64) -> Result<Self> {
        Self::new(raw)
    }
}

impl TryFrom<i64> for Lookup {
    type Error = TenetError;

    fn try_from(raw: i64) -> Result<Self> {
        let raw = u64::try_from(raw).map_err(|_| {
            TenetError::validation("lookup", format!("lookup must be positive, got {}", raw))
        })?;
        Self::new(raw)
    }
}

impl FromStr for Lookup {
    type Err = TenetError;

    fn from_str(s: &str) -> Result<Self> {
        let raw = s.trim().parse::<u64>().map_err(|e| {
            TenetError::validation("lookup", format!("'{}' is not a tenant id: {}", s, e))
        })?;
        Self::new(raw)
    }
}

impl<'de> Deserialize<'de> for Lookup {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = u64::deserialize(deserializer)?;
        Lookup::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
