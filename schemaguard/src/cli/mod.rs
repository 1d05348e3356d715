//! Command-line surface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::{ColorMode, ValidateConfig};
use crate::core::CandidateObject;
use crate::errors::SchemaguardError;
use crate::executor::DEFAULT_CONCURRENCY;
use crate::observability::LogFormat;
use crate::output::LockedWriter;
use crate::schema::{CatalogClient, SchemaClient};
use crate::source::{DirectorySource, ObjectSource};
use crate::validation::{ValidationOrchestrator, ValidationReport};

/// Validate configuration objects against the schemas of a cluster.
#[derive(Parser, Debug)]
#[command(name = "schemaguard", version, about)]
pub struct Cli {
    /// Log line format on stderr (text or json).
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate every object of an environment against its schema.
    Validate(ValidateArgs),
}

/// Arguments of `validate`.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// The environment to validate.
    pub environment: String,

    /// Number of parallel validations to run.
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub parallel: usize,

    /// Root directory holding one object directory per environment.
    #[arg(long, default_value = "objects")]
    pub objects: PathBuf,

    /// Schema catalog file.
    #[arg(long, default_value = "schemas/catalog.yaml")]
    pub catalog: PathBuf,

    /// When to color output (auto, always, never).
    #[arg(long, default_value = "auto")]
    pub color: ColorMode,
}

impl ValidateArgs {
    /// Converts parsed arguments into a command configuration.
    #[must_use]
    pub fn into_config(self, log_format: LogFormat) -> ValidateConfig {
        let mut config = ValidateConfig::new(self.environment)
            .with_parallel(self.parallel)
            .with_color(self.color)
            .with_objects_dir(self.objects)
            .with_catalog(self.catalog);
        config.log_format = log_format;
        config
    }
}

/// Validates an environment with explicit collaborators.
///
/// Returns the run report; use [`crate::core::JobResult::into_result`] on
/// its verdict to turn failures into an error.
pub async fn validate_with(
    config: &ValidateConfig,
    source: &dyn ObjectSource,
    client: Arc<dyn SchemaClient>,
    sink: Arc<LockedWriter>,
) -> Result<ValidationReport, SchemaguardError> {
    config.validate()?;
    let objects = source.objects(&config.environment)?;
    Ok(run_objects(config, objects, client, sink).await)
}

/// Runs `validate` using the directory source and catalog client.
///
/// The catalog and the object files are read on the blocking pool.
pub async fn run_validate(
    config: &ValidateConfig,
    sink: Arc<LockedWriter>,
) -> Result<(), SchemaguardError> {
    config.validate()?;

    let catalog = config.catalog.clone();
    let objects_dir = config.objects_dir.clone();
    let environment = config.environment.clone();
    let (client, objects) = tokio::task::spawn_blocking(move || {
        let client = CatalogClient::load(&catalog)?;
        let objects = DirectorySource::new(objects_dir).objects(&environment)?;
        Ok::<_, SchemaguardError>((client, objects))
    })
    .await??;

    run_objects(config, objects, Arc::new(client), sink)
        .await
        .result
        .into_result()
}

async fn run_objects(
    config: &ValidateConfig,
    objects: Vec<CandidateObject>,
    client: Arc<dyn SchemaClient>,
    sink: Arc<LockedWriter>,
) -> ValidationReport {
    info!(environment = %config.environment, objects = objects.len(), "Validating environment");
    let orchestrator = ValidationOrchestrator::new(client, sink, config.orchestrator_config());
    orchestrator.run(objects).await
}
