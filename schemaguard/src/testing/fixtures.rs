//! Object fixtures.

use serde_json::json;

use crate::core::CandidateObject;

/// Builds a cluster-scoped object with only identifying fields.
#[must_use]
pub fn object(api_version: &str, kind: &str, name: &str) -> CandidateObject {
    object_with_content(json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": {"name": name},
    }))
}

/// Builds an object from a full document.
///
/// # Panics
///
/// Panics if the document lacks `apiVersion`, `kind` or `metadata.name`.
#[must_use]
#[allow(clippy::expect_used)]
pub fn object_with_content(content: serde_json::Value) -> CandidateObject {
    CandidateObject::from_value(content).expect("fixture documents carry identifying fields")
}
