//! Validation of a single object.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::StatsAggregator;
use crate::core::{CandidateObject, Outcome};
use crate::errors::LookupError;
use crate::output::{LockedWriter, Reporter};
use crate::schema::SchemaClient;

/// Resolves, validates, reports and records one object at a time.
///
/// Each call writes exactly one report block and makes exactly one
/// statistics contribution. Only lookup failures other than a missing schema
/// are returned as errors; missing schemas and invalid content are recorded
/// and returned as outcomes. A panicking client or validator is reported as
/// an errored object and returned as [`LookupError::Panicked`].
pub struct ObjectValidator {
    client: Arc<dyn SchemaClient>,
    reporter: Reporter,
    sink: Arc<LockedWriter>,
    stats: Arc<StatsAggregator>,
}

impl ObjectValidator {
    /// Creates a validator.
    #[must_use]
    pub fn new(
        client: Arc<dyn SchemaClient>,
        reporter: Reporter,
        sink: Arc<LockedWriter>,
        stats: Arc<StatsAggregator>,
    ) -> Self {
        Self {
            client,
            reporter,
            sink,
            stats,
        }
    }

    /// Validates one object.
    pub async fn validate(&self, object: &CandidateObject) -> Result<Outcome, LookupError> {
        let name = self.client.display_name(object);

        let (outcome, propagated) = match AssertUnwindSafe(self.classify(object))
            .catch_unwind()
            .await
        {
            Ok(classified) => classified,
            Err(payload) => {
                let err = LookupError::panicked(
                    object.discriminator.to_string(),
                    panic_message(payload.as_ref()),
                );
                error!(object = %name, error = %err, "Validator panicked");
                (Outcome::Error(err.to_string()), Some(err))
            }
        };

        if let Err(err) = self.sink.write_block(&self.reporter.format(&name, &outcome)) {
            warn!(object = %name, error = %err, "Failed to write report line");
        }
        self.stats.record(&name, &outcome);
        debug!(object = %name, outcome = %outcome.kind(), "Validated object");

        match propagated {
            Some(err) => Err(err),
            None => Ok(outcome),
        }
    }

    async fn classify(&self, object: &CandidateObject) -> (Outcome, Option<LookupError>) {
        match self.client.validator_for(&object.discriminator).await {
            Err(err) if err.is_not_found() => (Outcome::Unknown, None),
            Err(err) => (Outcome::Error(err.to_string()), Some(err)),
            Ok(validator) => (
                Outcome::from_violations(validator.validate(&object.content)),
                None,
            ),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

impl std::fmt::Debug for ObjectValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectValidator")
            .field("reporter", &self.reporter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Palette;
    use crate::testing::{object, ScriptedSchemaClient, SharedBuffer};
    use pretty_assertions::assert_eq;

    fn validator(client: ScriptedSchemaClient) -> (ObjectValidator, SharedBuffer, Arc<StatsAggregator>) {
        let buffer = SharedBuffer::new();
        let stats = Arc::new(StatsAggregator::new());
        let validator = ObjectValidator::new(
            Arc::new(client),
            Reporter::new(Palette::plain()),
            Arc::new(LockedWriter::new(buffer.clone())),
            stats.clone(),
        );
        (validator, buffer, stats)
    }

    #[tokio::test]
    async fn test_valid_object() {
        let client = ScriptedSchemaClient::new().valid("ConfigMap");
        let (validator, buffer, stats) = validator(client);

        let outcome = validator.validate(&object("v1", "ConfigMap", "a")).await.unwrap();

        assert_eq!(outcome, Outcome::Valid);
        assert_eq!(buffer.contents(), "\u{2714} ConfigMap a is valid\n");
        assert_eq!(stats.snapshot().valid, 1);
    }

    #[tokio::test]
    async fn test_invalid_object_is_not_an_error() {
        let client = ScriptedSchemaClient::new().violations("Deployment", &["spec: missing", "kind: wrong"]);
        let (validator, buffer, stats) = validator(client);

        let outcome = validator
            .validate(&object("apps/v1", "Deployment", "web"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Invalid(vec!["spec: missing".to_string(), "kind: wrong".to_string()])
        );
        assert_eq!(
            buffer.contents(),
            "\u{2718} Deployment web is invalid\n\t- spec: missing\n\t- kind: wrong\n"
        );
        assert_eq!(stats.snapshot().invalid, vec!["Deployment web"]);
    }

    #[tokio::test]
    async fn test_missing_schema_is_unknown() {
        let (validator, buffer, stats) = validator(ScriptedSchemaClient::new());

        let outcome = validator
            .validate(&object("example.com/v1", "Widget", "w"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Unknown);
        assert_eq!(
            buffer.contents(),
            "? Widget w: no schema found, cannot validate\n"
        );
        assert_eq!(stats.snapshot().unknown, vec!["Widget w"]);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_recorded_and_propagated() {
        let client = ScriptedSchemaClient::new().failing("Pod", "connection refused");
        let (validator, buffer, stats) = validator(client);

        let err = validator.validate(&object("v1", "Pod", "p")).await.unwrap_err();

        assert!(!err.is_not_found());
        assert_eq!(
            buffer.contents(),
            format!("\u{2718} Pod p: schema fetch error {err}\n")
        );
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.errors, vec!["Pod p"]);
        assert_eq!(snapshot.total(), 1);
    }

    #[tokio::test]
    async fn test_panicking_validator_is_reported_as_error() {
        let client = ScriptedSchemaClient::new().panicking("ConfigMap", "schema exploded");
        let (validator, buffer, stats) = validator(client);

        let err = validator
            .validate(&object("v1", "ConfigMap", "settings"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            LookupError::panicked("v1, Kind=ConfigMap", "schema exploded")
        );
        assert_eq!(
            buffer.contents(),
            "\u{2718} ConfigMap settings: schema fetch error validator for v1, Kind=ConfigMap panicked: schema exploded\n"
        );
        assert_eq!(stats.snapshot().errors, vec!["ConfigMap settings"]);
    }
}
