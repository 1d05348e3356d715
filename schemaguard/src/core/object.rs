//! Candidate objects submitted for validation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SchemaguardError;

/// The structural type identity used to select a validator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDiscriminator {
    /// The API version, `group/version` or a bare `version` for the core group.
    pub api_version: String,
    /// The kind.
    pub kind: String,
}

impl TypeDiscriminator {
    /// Creates a new discriminator.
    #[must_use]
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }

    /// Returns the API group, empty for the core group.
    #[must_use]
    pub fn group(&self) -> &str {
        self.api_version
            .rsplit_once('/')
            .map_or("", |(group, _)| group)
    }

    /// Returns the API version without its group.
    #[must_use]
    pub fn version(&self) -> &str {
        self.api_version
            .rsplit_once('/')
            .map_or(self.api_version.as_str(), |(_, version)| version)
    }
}

impl fmt::Display for TypeDiscriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Kind={}", self.api_version, self.kind)
    }
}

/// A configuration unit submitted for validation.
///
/// Objects are immutable once built; the validator only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateObject {
    /// The type of the object.
    pub discriminator: TypeDiscriminator,
    /// `metadata.name`.
    pub name: String,
    /// `metadata.namespace`, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Where the object was loaded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// The full document.
    pub content: serde_json::Value,
}

impl CandidateObject {
    /// Builds an object from a decoded document.
    ///
    /// The document must carry `apiVersion`, `kind` and `metadata.name`.
    pub fn from_value(content: serde_json::Value) -> Result<Self, SchemaguardError> {
        let field = |path: &[&str]| -> Option<String> {
            let mut current = &content;
            for key in path {
                current = current.get(key)?;
            }
            current.as_str().map(str::to_string)
        };

        let api_version = field(&["apiVersion"])
            .ok_or_else(|| SchemaguardError::Source("object has no apiVersion".to_string()))?;
        let kind = field(&["kind"])
            .ok_or_else(|| SchemaguardError::Source("object has no kind".to_string()))?;
        let name = field(&["metadata", "name"]).ok_or_else(|| {
            SchemaguardError::Source(format!("{kind} object has no metadata.name"))
        })?;
        let namespace = field(&["metadata", "namespace"]).filter(|ns| !ns.is_empty());

        Ok(Self {
            discriminator: TypeDiscriminator::new(api_version, kind),
            name,
            namespace,
            origin: None,
            content,
        })
    }

    /// Records where the object came from.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Returns the kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.discriminator.kind
    }
}
