//! # Schemaguard
//!
//! Validates batches of configuration objects against a schema authority.
//!
//! Schemaguard provides:
//!
//! - **Concurrent validation**: objects are checked in parallel under a bounded
//!   concurrency limit
//! - **Outcome classification**: every object is valid, invalid, unknown (no
//!   schema) or errored (schema lookup failed)
//! - **Thread-safe statistics**: outcomes are aggregated behind a single lock
//! - **A single verdict**: lookup failures abort the job, invalid objects make
//!   it a partial failure
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use schemaguard::prelude::*;
//!
//! let client = Arc::new(CatalogClient::load("schemas/catalog.yaml")?);
//! let objects = DirectorySource::new("objects").objects("dev")?;
//!
//! let orchestrator = ValidationOrchestrator::new(
//!     client,
//!     Arc::new(LockedWriter::stdout()),
//!     OrchestratorConfig::new().with_parallel(5),
//! );
//! let report = orchestrator.run(objects).await;
//! report.result.into_result()?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod executor;
pub mod observability;
pub mod output;
pub mod schema;
pub mod source;
pub mod testing;
pub mod validation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ColorMode, ValidateConfig, BASELINE_ENVIRONMENT};
    pub use crate::core::{CandidateObject, JobResult, Outcome, TypeDiscriminator};
    pub use crate::errors::{LookupError, SchemaguardError};
    pub use crate::executor::BoundedExecutor;
    pub use crate::output::{LockedWriter, Palette, Reporter};
    pub use crate::schema::{CatalogClient, SchemaClient, SchemaValidator, StructuralSchema};
    pub use crate::source::{DirectorySource, ObjectSource, StaticSource};
    pub use crate::validation::{
        ObjectValidator, OrchestratorConfig, StatsAggregator, ValidationOrchestrator,
        ValidationReport, ValidationStats,
    };
    pub use std::sync::Arc;
}
