//! Loads candidate objects from a per-environment directory.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::ObjectSource;
use crate::core::CandidateObject;
use crate::errors::SchemaguardError;

/// Reads `<root>/<environment>/` for `.json`, `.yaml` and `.yml` files.
///
/// Files are read in path order. A YAML file may hold several documents and
/// a JSON file may hold one object or an array of objects. Empty documents
/// are skipped.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Creates a source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the directory holding an environment's objects.
    #[must_use]
    pub fn environment_dir(&self, environment: &str) -> PathBuf {
        self.root.join(environment)
    }

    fn documents(path: &Path) -> Result<Vec<serde_json::Value>, SchemaguardError> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path.extension().is_some_and(|ext| ext == "json");

        let mut documents = Vec::new();
        if is_json {
            match serde_json::from_str(&text)? {
                serde_json::Value::Array(items) => documents.extend(items),
                value => documents.push(value),
            }
        } else {
            for document in serde_yaml::Deserializer::from_str(&text) {
                documents.push(serde_json::Value::deserialize(document)?);
            }
        }

        documents.retain(|doc| !doc.is_null());
        Ok(documents)
    }
}

impl ObjectSource for DirectorySource {
    fn objects(&self, environment: &str) -> Result<Vec<CandidateObject>, SchemaguardError> {
        let dir = self.environment_dir(environment);
        let entries = std::fs::read_dir(&dir).map_err(|err| {
            SchemaguardError::Source(format!("read {}: {err}", dir.display()))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let wanted = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| matches!(ext, "json" | "yaml" | "yml"));
            if wanted && path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        let mut objects = Vec::new();
        for path in files {
            let origin = path.display().to_string();
            for document in Self::documents(&path)
                .map_err(|err| SchemaguardError::Source(format!("{origin}: {err}")))?
            {
                let object = CandidateObject::from_value(document).map_err(|err| match err {
                    SchemaguardError::Source(msg) => SchemaguardError::Source(format!("{origin}: {msg}")),
                    other => other,
                })?;
                objects.push(object.with_origin(origin.clone()));
            }
        }

        debug!(environment, count = objects.len(), dir = %dir.display(), "Loaded objects");
        Ok(objects)
    }
}
