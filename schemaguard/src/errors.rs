//! Error types for schemaguard.
//!
//! Schema lookup failures are a tagged enum so the validator can tell an
//! absent schema apart from infrastructure trouble without comparing
//! against a sentinel value.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for schemaguard operations.
#[derive(Debug, Error)]
pub enum SchemaguardError {
    /// A schema lookup failed for a reason other than a missing schema.
    #[error("{0}")]
    Lookup(#[from] LookupError),

    /// One or more objects failed structural validation.
    #[error("{0} invalid objects found")]
    InvalidObjects(usize),

    /// The command was invoked incorrectly.
    #[error("{0}")]
    Usage(String),

    /// Candidate objects could not be loaded.
    #[error("Object source error: {0}")]
    Source(String),

    /// The schema catalog could not be loaded.
    #[error("Schema catalog error: {0}")]
    Catalog(String),

    /// A validation task panicked or was aborted by the runtime.
    #[error("Task join error: {0}")]
    TaskJoin(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemaguardError {
    /// Creates a usage error.
    #[must_use]
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Returns true if the error stems from how the command was invoked.
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}

impl From<tokio::task::JoinError> for SchemaguardError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskJoin(err.to_string())
    }
}

impl From<serde_json::Error> for SchemaguardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for SchemaguardError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Errors returned when resolving a validator for a type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No schema is registered for the type.
    #[error("no schema found for {discriminator}")]
    SchemaNotFound {
        /// The type that has no schema.
        discriminator: String,
    },

    /// The schema exists but could not be fetched.
    #[error("fetch {discriminator}: {reason}")]
    Fetch {
        /// The type whose schema was requested.
        discriminator: String,
        /// Why the fetch failed.
        reason: String,
    },

    /// The schema was fetched but could not be decoded.
    #[error("decode {discriminator}: {reason}")]
    Decode {
        /// The type whose schema was requested.
        discriminator: String,
        /// Why decoding failed.
        reason: String,
    },

    /// Resolving or running the validator panicked.
    #[error("validator for {discriminator} panicked: {reason}")]
    Panicked {
        /// The type being validated.
        discriminator: String,
        /// The panic message.
        reason: String,
    },
}

impl LookupError {
    /// Creates a schema-not-found error.
    #[must_use]
    pub fn not_found(discriminator: impl Into<String>) -> Self {
        Self::SchemaNotFound {
            discriminator: discriminator.into(),
        }
    }

    /// Creates a fetch error.
    #[must_use]
    pub fn fetch(discriminator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            discriminator: discriminator.into(),
            reason: reason.into(),
        }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(discriminator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            discriminator: discriminator.into(),
            reason: reason.into(),
        }
    }

    /// Creates an error for a panicking validator.
    #[must_use]
    pub fn panicked(discriminator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Panicked {
            discriminator: discriminator.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if no schema is registered for the type.
    ///
    /// This is the only lookup failure that is not escalated.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SchemaNotFound { .. })
    }

    /// Returns the kind of failure as a stable string.
    #[must_use]
    pub fn kind(&self) -> LookupErrorKind {
        match self {
            Self::SchemaNotFound { .. } => LookupErrorKind::SchemaNotFound,
            Self::Fetch { .. } => LookupErrorKind::Fetch,
            Self::Decode { .. } => LookupErrorKind::Decode,
            Self::Panicked { .. } => LookupErrorKind::Panicked,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("kind".to_string(), serde_json::json!(self.kind()));
        match self {
            Self::SchemaNotFound { discriminator } => {
                map.insert("discriminator".to_string(), serde_json::json!(discriminator));
            }
            Self::Fetch { discriminator, reason }
            | Self::Decode { discriminator, reason }
            | Self::Panicked { discriminator, reason } => {
                map.insert("discriminator".to_string(), serde_json::json!(discriminator));
                map.insert("reason".to_string(), serde_json::json!(reason));
            }
        }
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Discriminant of a [`LookupError`], used in structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupErrorKind {
    /// No schema registered.
    SchemaNotFound,
    /// Fetch failure.
    Fetch,
    /// Decode failure.
    Decode,
    /// Validator panic.
    Panicked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_classified() {
        let err = LookupError::not_found("v1/ConfigMap");
        assert!(err.is_not_found());
        assert_eq!(err.kind(), LookupErrorKind::SchemaNotFound);

        let err = LookupError::fetch("v1/ConfigMap", "connection refused");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_lookup_error_display() {
        let err = LookupError::fetch("apps/v1/Deployment", "timeout");
        assert_eq!(err.to_string(), "fetch apps/v1/Deployment: timeout");
    }

    #[test]
    fn test_lookup_error_to_dict() {
        let dict = LookupError::decode("v1/Service", "bad yaml").to_dict();
        assert_eq!(dict.get("kind").unwrap(), "decode");
        assert_eq!(dict.get("reason").unwrap(), "bad yaml");
    }

    #[test]
    fn test_invalid_objects_message() {
        let err = SchemaguardError::InvalidObjects(3);
        assert_eq!(err.to_string(), "3 invalid objects found");
    }

    #[test]
    fn test_lookup_converts_into_top_level() {
        let err: SchemaguardError = LookupError::fetch("v1/Pod", "boom").into();
        assert!(matches!(err, SchemaguardError::Lookup(_)));
        assert!(!err.is_usage());
    }
}
