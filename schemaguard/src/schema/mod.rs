//! Schema client and validator interfaces.
//!
//! The validation core only talks to a schema authority through
//! [`SchemaClient`]. Implementations must be safe to call from many workers
//! at once.

mod catalog;
mod structural;

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::core::{CandidateObject, TypeDiscriminator};
use crate::errors::LookupError;

pub use catalog::{CatalogClient, CatalogEntry, SchemaCatalog};
pub use structural::{FieldType, StructuralSchema};

/// Validates object content against one resolved schema.
pub trait SchemaValidator: Send + Sync + Debug {
    /// Returns one message per violation, in a stable order.
    ///
    /// An empty result means the content is valid.
    fn validate(&self, content: &serde_json::Value) -> Vec<String>;
}

/// Access to a schema authority.
#[async_trait]
pub trait SchemaClient: Send + Sync {
    /// Returns a stable, human-readable identifier for the object.
    fn display_name(&self, object: &CandidateObject) -> String {
        default_display_name(object)
    }

    /// Resolves the validator for a type.
    ///
    /// Fails with [`LookupError::SchemaNotFound`] when the authority has no
    /// schema for the type, and with another variant when the lookup itself
    /// failed.
    async fn validator_for(
        &self,
        discriminator: &TypeDiscriminator,
    ) -> Result<Arc<dyn SchemaValidator>, LookupError>;
}

/// Formats `<kind> <name>`, with ` -n <namespace>` for namespaced objects.
#[must_use]
pub fn default_display_name(object: &CandidateObject) -> String {
    match &object.namespace {
        Some(ns) => format!("{} {} -n {}", object.kind(), object.name, ns),
        None => format!("{} {}", object.kind(), object.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::object;

    #[test]
    fn test_display_name_cluster_scoped() {
        let obj = object("v1", "Namespace", "prod");
        assert_eq!(default_display_name(&obj), "Namespace prod");
    }

    #[test]
    fn test_display_name_namespaced() {
        let mut obj = object("apps/v1", "Deployment", "web");
        obj.namespace = Some("prod".to_string());
        assert_eq!(default_display_name(&obj), "Deployment web -n prod");
    }
}
