//! Thread-safe outcome statistics.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::Outcome;

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Outcome counts for one run.
///
/// Name sequences keep the order in which outcomes were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    /// Number of valid objects.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub valid: usize,
    /// Objects without a schema.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<String>,
    /// Objects that violated their schema.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invalid: Vec<String>,
    /// Objects whose schema lookup failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ValidationStats {
    /// Returns the number of objects recorded.
    #[must_use]
    pub fn total(&self) -> usize {
        self.valid + self.unknown.len() + self.invalid.len() + self.errors.len()
    }

    /// Returns true if any object was invalid.
    #[must_use]
    pub fn has_invalid(&self) -> bool {
        !self.invalid.is_empty()
    }
}

/// Records outcomes from concurrent workers.
///
/// Every record operation takes the same lock, so no contribution is lost
/// or counted twice.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    inner: Mutex<ValidationStats>,
}

impl StatsAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a valid object.
    pub fn record_valid(&self) {
        self.inner.lock().valid += 1;
    }

    /// Records an object without a schema.
    pub fn record_unknown(&self, name: impl Into<String>) {
        self.inner.lock().unknown.push(name.into());
    }

    /// Records an invalid object.
    pub fn record_invalid(&self, name: impl Into<String>) {
        self.inner.lock().invalid.push(name.into());
    }

    /// Records an object whose schema lookup failed.
    pub fn record_error(&self, name: impl Into<String>) {
        self.inner.lock().errors.push(name.into());
    }

    /// Records `outcome` in the matching bucket.
    pub fn record(&self, name: &str, outcome: &Outcome) {
        match outcome {
            Outcome::Valid => self.record_valid(),
            Outcome::Invalid(_) => self.record_invalid(name),
            Outcome::Unknown => self.record_unknown(name),
            Outcome::Error(_) => self.record_error(name),
        }
    }

    /// Returns a copy of the current statistics.
    #[must_use]
    pub fn snapshot(&self) -> ValidationStats {
        self.inner.lock().clone()
    }

    /// Consumes the aggregator and returns its statistics.
    #[must_use]
    pub fn into_inner(self) -> ValidationStats {
        self.inner.into_inner()
    }
}
