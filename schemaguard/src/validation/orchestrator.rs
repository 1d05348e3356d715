//! Drives object validation over a whole object set.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use super::{ObjectValidator, StatsAggregator, ValidationStats};
use crate::core::{CandidateObject, JobResult};
use crate::errors::SchemaguardError;
use crate::executor::{BoundedExecutor, DEFAULT_CONCURRENCY};
use crate::observability::{RunSpanAttributes, SpanTimer};
use crate::output::{LockedWriter, Palette, Reporter};
use crate::schema::SchemaClient;

/// Where a run currently is.
///
/// Runs move strictly forward: `Idle → Dispatching → Draining → Reduced`.
/// Starting another run resets the phase to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// No run started yet.
    #[default]
    Idle,
    /// Tasks are being handed to the executor.
    Dispatching,
    /// Waiting for every dispatched task.
    Draining,
    /// The verdict has been computed.
    Reduced,
}

impl RunPhase {
    /// Returns true if a run may move from `self` to `next`.
    #[must_use]
    pub fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (_, Self::Idle)
                | (Self::Idle, Self::Dispatching)
                | (Self::Dispatching, Self::Draining)
                | (Self::Draining, Self::Reduced)
        )
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Dispatching => write!(f, "dispatching"),
            Self::Draining => write!(f, "draining"),
            Self::Reduced => write!(f, "reduced"),
        }
    }
}

/// Settings for a validation run.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum number of in-flight validations.
    pub parallel: usize,
    /// Whether report blocks carry ANSI colors.
    pub colors: bool,
    /// Environment name, used in logs only.
    pub environment: Option<String>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            parallel: DEFAULT_CONCURRENCY,
            colors: false,
            environment: None,
        }
    }
}

impl OrchestratorConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the concurrency limit.
    #[must_use]
    pub fn with_parallel(mut self, parallel: usize) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enables or disables colors.
    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    /// Sets the environment name.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }
}

/// What a run produced.
#[derive(Debug)]
pub struct ValidationReport {
    /// Identifier of the run, as logged.
    pub run_id: Uuid,
    /// Final statistics.
    pub stats: ValidationStats,
    /// The reduced verdict.
    pub result: JobResult,
}

/// Reduces final statistics and a captured task failure to a verdict.
///
/// A captured failure aborts the job regardless of the statistics; otherwise
/// any invalid object makes it a partial failure.
#[must_use]
pub fn reduce(stats: &ValidationStats, captured: Option<SchemaguardError>) -> JobResult {
    match captured {
        Some(cause) => JobResult::Aborted(cause),
        None if stats.has_invalid() => JobResult::PartialFailure {
            invalid: stats.invalid.len(),
        },
        None => JobResult::Success,
    }
}

/// Validates object sets concurrently against a schema client.
pub struct ValidationOrchestrator {
    client: Arc<dyn SchemaClient>,
    sink: Arc<LockedWriter>,
    config: OrchestratorConfig,
    phase: Mutex<RunPhase>,
}

impl ValidationOrchestrator {
    /// Creates an orchestrator writing reports to `sink`.
    #[must_use]
    pub fn new(
        client: Arc<dyn SchemaClient>,
        sink: Arc<LockedWriter>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            client,
            sink,
            config,
            phase: Mutex::new(RunPhase::Idle),
        }
    }

    /// Returns the phase of the most recently started run.
    ///
    /// Runs sharing one orchestrator share this value; callers running
    /// several sets at once should read outcomes from each
    /// [`ValidationReport`] instead.
    #[must_use]
    pub fn phase(&self) -> RunPhase {
        *self.phase.lock()
    }

    fn enter(&self, phase: RunPhase) {
        let mut current = self.phase.lock();
        let from = *current;
        if from.can_advance_to(phase) {
            debug!(from = %from, to = %phase, "Run phase transition");
        } else {
            warn!(from = %from, to = %phase, "Out-of-order run phase transition");
        }
        *current = phase;
    }

    /// Validates every object and reduces the outcome.
    ///
    /// Every object is reported even when a lookup fails part way through;
    /// the summary is written once all work has finished.
    pub async fn run(&self, objects: Vec<CandidateObject>) -> ValidationReport {
        let executor = BoundedExecutor::new(self.config.parallel);
        let attributes = RunSpanAttributes::new(objects.len(), executor.max_concurrency())
            .with_environment(self.config.environment.clone());
        let run_id = attributes.run_id;
        let span = attributes.span();

        async move {
            let timer = SpanTimer::start();
            self.enter(RunPhase::Idle);
            info!(objects = objects.len(), "Starting validation run");
            debug!(fields = ?attributes.to_fields(), "Run attributes");

            let stats = Arc::new(StatsAggregator::new());
            let validator = Arc::new(ObjectValidator::new(
                self.client.clone(),
                Reporter::new(Palette::for_colors(self.config.colors)),
                self.sink.clone(),
                stats.clone(),
            ));

            self.enter(RunPhase::Dispatching);
            let batch = executor.dispatch(objects, move |object: CandidateObject| {
                let validator = validator.clone();
                async move { validator.validate(&object).await.map(|_| ()) }
            });

            self.enter(RunPhase::Draining);
            let captured = batch.join().await.err();

            let stats = stats.snapshot();
            self.write_summary(&stats);

            let result = reduce(&stats, captured);
            self.enter(RunPhase::Reduced);

            if result.is_aborted() {
                warn!(verdict = %result, duration_ms = timer.elapsed_ms(), "Validation run aborted");
            } else {
                info!(
                    verdict = %result,
                    duration_ms = timer.elapsed_ms(),
                    valid = stats.valid,
                    unknown = stats.unknown.len(),
                    invalid = stats.invalid.len(),
                    "Validation run finished"
                );
            }

            ValidationReport {
                run_id,
                stats,
                result,
            }
        }
        .instrument(span)
        .await
    }

    fn write_summary(&self, stats: &ValidationStats) {
        let reporter = Reporter::new(Palette::for_colors(self.config.colors));
        let written = reporter
            .format_summary(stats)
            .and_then(|summary| self.sink.write_block(&summary).map_err(SchemaguardError::from));
        if let Err(err) = written {
            warn!(error = %err, "Failed to write summary");
        }
    }
}

impl fmt::Debug for ValidationOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationOrchestrator")
            .field("config", &self.config)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}
