//! Span attributes and timing for validation runs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::Span;
use uuid::Uuid;

/// Fields attached to the span of one validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSpanAttributes {
    /// Run identifier.
    pub run_id: Uuid,
    /// Environment being validated.
    pub environment: Option<String>,
    /// Number of objects in the run.
    pub object_count: usize,
    /// Effective concurrency limit.
    pub parallel: usize,
}

impl RunSpanAttributes {
    /// Creates attributes for a new run with a fresh identifier.
    #[must_use]
    pub fn new(object_count: usize, parallel: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            environment: None,
            object_count,
            parallel,
        }
    }

    /// Sets the environment name.
    #[must_use]
    pub fn with_environment(mut self, environment: Option<String>) -> Self {
        self.environment = environment;
        self
    }

    /// Opens the run span.
    #[must_use]
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "validation_run",
            run_id = %self.run_id,
            environment = self.environment.as_deref().unwrap_or(""),
            objects = self.object_count,
            parallel = self.parallel,
        )
    }

    /// Flattens the attributes into dotted keys.
    #[must_use]
    pub fn to_fields(&self) -> HashMap<String, String> {
        let mut fields = HashMap::new();
        fields.insert("run.id".to_string(), self.run_id.to_string());
        if let Some(ref env) = self.environment {
            fields.insert("run.environment".to_string(), env.clone());
        }
        fields.insert("run.objects".to_string(), self.object_count.to_string());
        fields.insert("run.parallel".to_string(), self.parallel.to_string());
        fields
    }
}

/// Simple span timing helper.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
}

impl SpanTimer {
    /// Starts a new timer.
    #[must_use]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Returns elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}
