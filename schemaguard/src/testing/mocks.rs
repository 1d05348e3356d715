//! Mock collaborators for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::core::TypeDiscriminator;
use crate::errors::LookupError;
use crate::schema::{SchemaClient, SchemaValidator};

/// A validator that always returns the same violations.
#[derive(Debug, Clone, Default)]
pub struct FixedValidator {
    violations: Vec<String>,
}

impl FixedValidator {
    /// Creates a validator returning `violations`.
    #[must_use]
    pub fn new(violations: Vec<String>) -> Self {
        Self { violations }
    }
}

impl SchemaValidator for FixedValidator {
    fn validate(&self, _content: &serde_json::Value) -> Vec<String> {
        self.violations.clone()
    }
}

/// A validator that panics with a fixed message.
#[derive(Debug, Clone)]
pub struct PanickingValidator {
    message: String,
}

impl PanickingValidator {
    /// Creates a validator that panics with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl SchemaValidator for PanickingValidator {
    #[allow(clippy::panic)]
    fn validate(&self, _content: &serde_json::Value) -> Vec<String> {
        panic!("{}", self.message)
    }
}

#[derive(Debug, Clone)]
enum Script {
    Validator(Arc<dyn SchemaValidator>),
    Fail(String),
}

/// A schema client whose behavior is scripted per kind.
///
/// Kinds without a script have no schema.
#[derive(Debug, Default)]
pub struct ScriptedSchemaClient {
    scripts: HashMap<String, Script>,
    delay: Option<Duration>,
    lookups: AtomicUsize,
}

impl ScriptedSchemaClient {
    /// Creates a client that knows no schemas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects of `kind` are valid.
    #[must_use]
    pub fn valid(self, kind: &str) -> Self {
        self.violations(kind, &[])
    }

    /// Objects of `kind` fail with `violations`.
    #[must_use]
    pub fn violations(mut self, kind: &str, violations: &[&str]) -> Self {
        let violations = violations.iter().map(ToString::to_string).collect();
        self.scripts.insert(
            kind.to_string(),
            Script::Validator(Arc::new(FixedValidator::new(violations))),
        );
        self
    }

    /// Validating objects of `kind` panics with `message`.
    #[must_use]
    pub fn panicking(mut self, kind: &str, message: &str) -> Self {
        self.scripts.insert(
            kind.to_string(),
            Script::Validator(Arc::new(PanickingValidator::new(message))),
        );
        self
    }

    /// Lookups for `kind` fail with a fetch error.
    #[must_use]
    pub fn failing(mut self, kind: &str, reason: &str) -> Self {
        self.scripts.insert(kind.to_string(), Script::Fail(reason.to_string()));
        self
    }

    /// Delays every lookup.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns the number of lookups made.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SchemaClient for ScriptedSchemaClient {
    async fn validator_for(
        &self,
        discriminator: &TypeDiscriminator,
    ) -> Result<Arc<dyn SchemaValidator>, LookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.scripts.get(&discriminator.kind) {
            None => Err(LookupError::not_found(discriminator.to_string())),
            Some(Script::Validator(validator)) => Ok(validator.clone()),
            Some(Script::Fail(reason)) => {
                Err(LookupError::fetch(discriminator.to_string(), reason.clone()))
            }
        }
    }
}

/// A cloneable in-memory writer; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything written so far as text.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_client() {
        let client = ScriptedSchemaClient::new()
            .valid("ConfigMap")
            .failing("Service", "down");

        let validator = client
            .validator_for(&TypeDiscriminator::new("v1", "ConfigMap"))
            .await
            .unwrap();
        assert!(validator.validate(&serde_json::Value::Null).is_empty());

        let err = client
            .validator_for(&TypeDiscriminator::new("v1", "Service"))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Fetch { .. }));

        let err = client
            .validator_for(&TypeDiscriminator::new("v1", "Secret"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(client.lookups(), 3);
    }

    #[test]
    fn test_shared_buffer_clones_share_contents() {
        let buffer = SharedBuffer::new();
        let mut writer = buffer.clone();
        writer.write_all(b"hello").unwrap();
        assert_eq!(buffer.contents(), "hello");
    }
}
