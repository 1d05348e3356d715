//! A minimal structural schema: required paths and typed properties.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::SchemaValidator;

/// The JSON type expected at a property path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// A string.
    String,
    /// An integral number.
    Integer,
    /// Any number.
    Number,
    /// A boolean.
    Boolean,
    /// A mapping.
    Object,
    /// A sequence.
    Array,
}

impl FieldType {
    fn matches(self, value: &serde_json::Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Object => write!(f, "object"),
            Self::Array => write!(f, "array"),
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(n) if n.is_f64() => "number",
        serde_json::Value::Number(_) => "integer",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Required dotted paths plus expected types for dotted paths.
///
/// Violations are reported required paths first, in declaration order, then
/// mistyped properties in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralSchema {
    /// Paths that must be present and non-null.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Expected types, checked only where the path is present.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, FieldType>,
}

impl StructuralSchema {
    /// Creates an empty schema that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required path.
    #[must_use]
    pub fn require(mut self, path: impl Into<String>) -> Self {
        self.required.push(path.into());
        self
    }

    /// Adds a typed property.
    #[must_use]
    pub fn property(mut self, path: impl Into<String>, field_type: FieldType) -> Self {
        self.properties.insert(path.into(), field_type);
        self
    }

    fn lookup<'a>(content: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
        path.split('.')
            .try_fold(content, |current, key| current.get(key))
            .filter(|value| !value.is_null())
    }
}

impl SchemaValidator for StructuralSchema {
    fn validate(&self, content: &serde_json::Value) -> Vec<String> {
        let mut violations = Vec::new();

        for path in &self.required {
            if Self::lookup(content, path).is_none() {
                violations.push(format!("{path}: required value missing"));
            }
        }

        for (path, expected) in &self.properties {
            if let Some(value) = Self::lookup(content, path) {
                if !expected.matches(value) {
                    violations.push(format!(
                        "{path}: expected {expected}, got {}",
                        json_type_name(value)
                    ));
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn deployment_schema() -> StructuralSchema {
        StructuralSchema::new()
            .require("spec")
            .require("spec.template")
            .property("spec.replicas", FieldType::Integer)
            .property("metadata.labels", FieldType::Object)
    }

    #[test]
    fn test_valid_content() {
        let content = json!({
            "metadata": {"name": "web", "labels": {"app": "web"}},
            "spec": {"replicas": 2, "template": {}}
        });
        assert!(deployment_schema().validate(&content).is_empty());
    }

    #[test]
    fn test_reports_every_violation_in_order() {
        let content = json!({
            "metadata": {"name": "web", "labels": "web"},
            "spec": {"replicas": "two"}
        });
        assert_eq!(
            deployment_schema().validate(&content),
            vec![
                "spec.template: required value missing".to_string(),
                "metadata.labels: expected object, got string".to_string(),
                "spec.replicas: expected integer, got string".to_string(),
            ]
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        let schema = StructuralSchema::new().require("data");
        let violations = schema.validate(&json!({"data": null}));
        assert_eq!(violations, vec!["data: required value missing".to_string()]);
    }

    #[test]
    fn test_float_is_not_integer() {
        let schema = StructuralSchema::new().property("spec.replicas", FieldType::Integer);
        let violations = schema.validate(&json!({"spec": {"replicas": 1.5}}));
        assert_eq!(
            violations,
            vec!["spec.replicas: expected integer, got number".to_string()]
        );
    }

    #[test]
    fn test_deserialize_from_yaml() {
        let schema: StructuralSchema = serde_yaml::from_str(
            "required: [data]\nproperties:\n  data: object\n",
        )
        .unwrap();
        assert_eq!(schema.required, vec!["data".to_string()]);
        assert_eq!(schema.properties.get("data"), Some(&FieldType::Object));
    }
}
