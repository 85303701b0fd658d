//! Error types for Tenet.
//!
//! This module defines the error hierarchy used throughout the property
//! store. All errors implement the standard `std::error::Error` trait via
//! `thiserror`.
//!
//! # Error Handling Philosophy
//!
//! - Functions that can fail return `Result<T, TenetError>`
//! - Validation happens locally, before any backing store is touched
//! - Nothing is retried here; retry policy belongs to the caller
//!
//! # Example
//!
//! ```
//! use tenet_core::{Result, TenetError};
//!
//! fn load_flag(category: &str) -> Result<bool> {
//!     if category.trim().is_empty() {
//!         return Err(TenetError::validation("category", "must not be blank"));
//!     }
//!     Ok(true)
//! }
//!
//! assert!(load_flag("moderation").is_ok());
//! assert!(load_flag(" ").unwrap_err().is_validation_error());
//! ```

use thiserror::Error;

use crate::types::PropertyType;

/// Main error type for Tenet operations.
///
/// Each variant carries enough context to tell which property, field or
/// store the failure concerns.
#[derive(Debug, Error)]
pub enum TenetError {
    /// A category, key or lookup failed validation.
    #[error("Validation error for field '{field}': {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },

    /// Requested property metadata is not registered.
    #[error("Property not found: {what}")]
    NotFound {
        /// Identity that was requested (category/key or id)
        what: String,
    },

    /// A property with the same category and key already exists.
    #[error("Property '{category}/{key}' is already registered")]
    AlreadyRegistered {
        /// Category of the existing property
        category: String,
        /// Key of the existing property
        key: String,
    },

    /// Stored bytes do not decode as the requested type.
    #[error("Cannot decode {declared} property as {expected}: {reason}")]
    Decode {
        /// Type the caller asked for
        expected: String,
        /// Type the property was declared with
        declared: PropertyType,
        /// Why decoding failed
        reason: String,
    },

    /// The stored value cannot be represented in the requested form.
    #[error("Cannot convert {declared} property to {target}")]
    Conversion {
        /// Type the property was declared with
        declared: PropertyType,
        /// Requested representation
        target: String,
    },

    /// The backing store has not been initialized yet.
    #[error("Store unavailable: {reason}")]
    StoreUnavailable {
        /// Why the store is not ready
        reason: String,
    },

    /// The backing store failed while executing an operation.
    #[error("Store error in '{store}': {message}")]
    StoreFailure {
        /// Name of the store that failed
        store: String,
        /// Description of what went wrong
        message: String,
        /// Native store error
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TenetError {
    // ============================================
    // Convenience constructors
    // ============================================

    /// Creates a Validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a NotFound error.
    ///
    /// # Example
    ///
    /// ```
    /// use tenet_core::TenetError;
    ///
    /// let error = TenetError::not_found("moderation/auto_mod_enabled");
    /// assert!(error.is_not_found());
    /// ```
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Creates an AlreadyRegistered error.
    pub fn already_registered(category: impl Into<String>, key: impl Into<String>) -> Self {
        Self::AlreadyRegistered {
            category: category.into(),
            key: key.into(),
        }
    }

    /// Creates a Decode error.
    pub fn decode(
        expected: impl Into<String>,
        declared: PropertyType,
        reason: impl Into<String>,
    ) -> Self {
        Self::Decode {
            expected: expected.into(),
            declared,
            reason: reason.into(),
        }
    }

    /// Creates a Conversion error.
    pub fn conversion(declared: PropertyType, target: impl Into<String>) -> Self {
        Self::Conversion {
            declared,
            target: target.into(),
        }
    }

    /// Creates a StoreUnavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            reason: reason.into(),
        }
    }

    /// Creates a StoreFailure without a cause.
    pub fn store_failure(store: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreFailure {
            store: store.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a StoreFailure wrapping the store's native error.
    pub fn store_failure_with_cause<E>(
        store: impl Into<String>,
        message: impl Into<String>,
        cause: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::StoreFailure {
            store: store.into(),
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================
    // Query methods
    // ============================================

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns true if the requested property is not registered.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if a registration collided with an existing property.
    pub fn is_already_registered(&self) -> bool {
        matches!(self, Self::AlreadyRegistered { .. })
    }

    /// Returns true if this is a decode or conversion error.
    pub fn is_codec_error(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::Conversion { .. })
    }

    /// Returns true if the backing store was not ready.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    /// Returns true if the backing store failed.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::StoreFailure { .. })
    }

    /// Returns true if the same call might succeed later.
    pub fn is_transient(&self) -> bool {
        self.is_unavailable()
    }
}

/// Type alias for Results with TenetError.
pub type Result<T> = std::result::Result<T, TenetError>;
