//! A schema client backed by a local catalog file.
//!
//! The catalog lists one entry per type. An entry either carries its schema
//! inline or points at a schema file relative to the catalog. Referenced
//! files are loaded on first use and cached; a file that cannot be read or
//! decoded is a lookup failure, not a missing schema.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::{SchemaClient, SchemaValidator, StructuralSchema};
use crate::core::TypeDiscriminator;
use crate::errors::{LookupError, SchemaguardError};

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// The API version of the type.
    pub api_version: String,
    /// The kind of the type.
    pub kind: String,
    /// Path to a schema file, relative to the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Inline schema, used when `file` is absent.
    #[serde(flatten)]
    pub schema: StructuralSchema,
}

impl CatalogEntry {
    /// Returns the discriminator this entry describes.
    #[must_use]
    pub fn discriminator(&self) -> TypeDiscriminator {
        TypeDiscriminator::new(self.api_version.clone(), self.kind.clone())
    }
}

/// The catalog document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaCatalog {
    /// Known schemas.
    #[serde(default)]
    pub schemas: Vec<CatalogEntry>,
}

#[derive(Debug)]
enum SchemaSource {
    Inline(Arc<StructuralSchema>),
    File(PathBuf),
}

/// Schema client over a [`SchemaCatalog`].
#[derive(Debug)]
pub struct CatalogClient {
    sources: HashMap<TypeDiscriminator, SchemaSource>,
    loaded: DashMap<TypeDiscriminator, Arc<StructuralSchema>>,
}

impl CatalogClient {
    /// Builds a client from a catalog whose file references resolve
    /// against `base_dir`.
    pub fn from_catalog(
        catalog: SchemaCatalog,
        base_dir: impl AsRef<Path>,
    ) -> Result<Self, SchemaguardError> {
        let base_dir = base_dir.as_ref();
        let mut sources = HashMap::with_capacity(catalog.schemas.len());

        for entry in catalog.schemas {
            let discriminator = entry.discriminator();
            let source = match entry.file {
                Some(file) => SchemaSource::File(base_dir.join(file)),
                None => SchemaSource::Inline(Arc::new(entry.schema)),
            };
            if sources.insert(discriminator.clone(), source).is_some() {
                return Err(SchemaguardError::Catalog(format!(
                    "duplicate entry for {discriminator}"
                )));
            }
        }

        Ok(Self {
            sources,
            loaded: DashMap::new(),
        })
    }

    /// Loads a catalog from a YAML or JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaguardError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            SchemaguardError::Catalog(format!("read {}: {err}", path.display()))
        })?;
        let catalog: SchemaCatalog = serde_yaml::from_str(&text).map_err(|err| {
            SchemaguardError::Catalog(format!("parse {}: {err}", path.display()))
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_catalog(catalog, base_dir)
    }

    /// Returns the number of types in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if the catalog lists no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    async fn load_file(
        discriminator: &TypeDiscriminator,
        path: &Path,
    ) -> Result<StructuralSchema, LookupError> {
        let text = tokio::fs::read_to_string(path).await.map_err(|err| {
            LookupError::fetch(discriminator.to_string(), format!("{}: {err}", path.display()))
        })?;
        serde_yaml::from_str(&text).map_err(|err| {
            LookupError::decode(discriminator.to_string(), format!("{}: {err}", path.display()))
        })
    }
}

#[async_trait]
impl SchemaClient for CatalogClient {
    async fn validator_for(
        &self,
        discriminator: &TypeDiscriminator,
    ) -> Result<Arc<dyn SchemaValidator>, LookupError> {
        let path = match self.sources.get(discriminator) {
            None => return Err(LookupError::not_found(discriminator.to_string())),
            Some(SchemaSource::Inline(schema)) => return Ok(schema.clone()),
            Some(SchemaSource::File(path)) => path,
        };

        if let Some(schema) = self.loaded.get(discriminator) {
            return Ok(schema.clone());
        }

        debug!(discriminator = %discriminator, path = %path.display(), "Loading schema file");
        let schema = Arc::new(Self::load_file(discriminator, path).await?);
        // Concurrent first lookups may both load; the first insert wins.
        let schema = self
            .loaded
            .entry(discriminator.clone())
            .or_insert(schema)
            .clone();
        Ok(schema)
    }
}
