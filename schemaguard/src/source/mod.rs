//! Sources of candidate objects.

mod directory;

use crate::core::CandidateObject;
use crate::errors::SchemaguardError;

pub use directory::DirectorySource;

/// Supplies the ordered candidate objects for an environment.
pub trait ObjectSource: Send + Sync {
    /// Returns the objects to validate for `environment`, already filtered.
    fn objects(&self, environment: &str) -> Result<Vec<CandidateObject>, SchemaguardError>;
}

/// An in-memory source that returns the same objects for every environment.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    objects: Vec<CandidateObject>,
}

impl StaticSource {
    /// Creates a source over the given objects.
    #[must_use]
    pub fn new(objects: Vec<CandidateObject>) -> Self {
        Self { objects }
    }
}

impl ObjectSource for StaticSource {
    fn objects(&self, _environment: &str) -> Result<Vec<CandidateObject>, SchemaguardError> {
        Ok(self.objects.clone())
    }
}
