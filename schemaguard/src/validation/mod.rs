//! The validation core: per-object validation, statistics and the
//! orchestrator that drives them concurrently.

mod orchestrator;
mod stats;
mod validator;


pub use orchestrator::{reduce, OrchestratorConfig, RunPhase, ValidationOrchestrator, ValidationReport};
pub use stats::{StatsAggregator, ValidationStats};
pub use validator::ObjectValidator;
