//! Configuration for the validate command.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::SchemaguardError;
use crate::executor::DEFAULT_CONCURRENCY;
use crate::observability::LogFormat;
use crate::validation::OrchestratorConfig;

/// The reserved environment holding baseline values; it cannot be validated.
pub const BASELINE_ENVIRONMENT: &str = "_";

/// When to color report output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Color when stdout is a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

impl ColorMode {
    /// Resolves the mode against the environment.
    #[must_use]
    pub fn resolve(self) -> bool {
        self.resolve_with(
            std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()),
            std::io::stdout().is_terminal(),
        )
    }

    /// Resolves the mode from explicit environment facts.
    #[must_use]
    pub fn resolve_with(self, no_color: bool, is_terminal: bool) -> bool {
        match self {
            Self::Auto => !no_color && is_terminal,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Always => write!(f, "always"),
            Self::Never => write!(f, "never"),
        }
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown color mode: {other}")),
        }
    }
}

/// Settings for one `validate` invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateConfig {
    /// The environment to validate.
    pub environment: String,
    /// Maximum number of in-flight validations.
    #[serde(default = "default_parallel")]
    pub parallel: usize,
    /// When to color output.
    #[serde(default)]
    pub color: ColorMode,
    /// Root directory holding one object directory per environment.
    #[serde(default = "default_objects_dir")]
    pub objects_dir: PathBuf,
    /// Path to the schema catalog.
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
    /// Log line format.
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_parallel() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_objects_dir() -> PathBuf {
    PathBuf::from("objects")
}

fn default_catalog() -> PathBuf {
    PathBuf::from("schemas/catalog.yaml")
}

impl ValidateConfig {
    /// Creates a configuration for `environment` with defaults.
    #[must_use]
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            parallel: default_parallel(),
            color: ColorMode::default(),
            objects_dir: default_objects_dir(),
            catalog: default_catalog(),
            log_format: LogFormat::default(),
        }
    }

    /// Sets the concurrency limit.
    #[must_use]
    pub fn with_parallel(mut self, parallel: usize) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the color mode.
    #[must_use]
    pub fn with_color(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }

    /// Sets the objects root directory.
    #[must_use]
    pub fn with_objects_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.objects_dir = dir.into();
        self
    }

    /// Sets the catalog path.
    #[must_use]
    pub fn with_catalog(mut self, catalog: impl Into<PathBuf>) -> Self {
        self.catalog = catalog.into();
        self
    }

    /// Rejects environments that cannot be validated.
    pub fn validate(&self) -> Result<(), SchemaguardError> {
        if self.environment.is_empty() {
            return Err(SchemaguardError::usage("exactly one environment required"));
        }
        if self.environment == BASELINE_ENVIRONMENT {
            return Err(SchemaguardError::usage(
                "cannot validate baseline environment, use a real environment",
            ));
        }
        Ok(())
    }

    /// Builds the orchestrator settings, resolving the color mode.
    #[must_use]
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig::new()
            .with_parallel(self.parallel.max(1))
            .with_colors(self.color.resolve())
            .with_environment(self.environment.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ValidateConfig::new("dev");
        assert_eq!(config.parallel, 5);
        assert_eq!(config.color, ColorMode::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_baseline_rejected() {
        let err = ValidateConfig::new(BASELINE_ENVIRONMENT).validate().unwrap_err();
        assert!(err.is_usage());
        assert!(err.to_string().contains("baseline"));
    }

    #[test]
    fn test_empty_environment_rejected() {
        assert!(ValidateConfig::new("").validate().unwrap_err().is_usage());
    }

    #[test]
    fn test_zero_parallel_is_clamped() {
        let config = ValidateConfig::new("dev")
            .with_parallel(0)
            .with_color(ColorMode::Never);
        let orchestrator = config.orchestrator_config();
        assert_eq!(orchestrator.parallel, 1);
        assert!(!orchestrator.colors);
        assert_eq!(orchestrator.environment.as_deref(), Some("dev"));
    }

    #[test]
    fn test_color_mode_resolution() {
        assert!(ColorMode::Auto.resolve_with(false, true));
        assert!(!ColorMode::Auto.resolve_with(true, true));
        assert!(!ColorMode::Auto.resolve_with(false, false));
        assert!(ColorMode::Always.resolve_with(true, false));
        assert!(!ColorMode::Never.resolve_with(false, true));
    }

    #[test]
    fn test_color_mode_parse() {
        assert_eq!("Always".parse::<ColorMode>().unwrap(), ColorMode::Always);
        assert!("sometimes".parse::<ColorMode>().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ValidateConfig =
            serde_yaml::from_str("environment: prod\ncolor: never\n").unwrap();
        assert_eq!(config.environment, "prod");
        assert_eq!(config.parallel, 5);
        assert_eq!(config.color, ColorMode::Never);
        assert_eq!(config.catalog, PathBuf::from("schemas/catalog.yaml"));
    }
}
