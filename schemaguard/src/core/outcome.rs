//! Per-object outcomes and the run-level verdict.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SchemaguardError;

/// The classification of a single object's validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    /// The object matched its schema.
    Valid,
    /// The object violated its schema; one message per violation.
    Invalid(Vec<String>),
    /// No schema is available for the object's type.
    Unknown,
    /// Looking up the schema failed.
    Error(String),
}

impl Outcome {
    /// Returns the variant without its payload.
    #[must_use]
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Valid => OutcomeKind::Valid,
            Self::Invalid(_) => OutcomeKind::Invalid,
            Self::Unknown => OutcomeKind::Unknown,
            Self::Error(_) => OutcomeKind::Error,
        }
    }

    /// Builds an outcome from a list of violations.
    #[must_use]
    pub fn from_violations(violations: Vec<String>) -> Self {
        if violations.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(violations)
        }
    }
}

/// Payload-free discriminant of [`Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// See [`Outcome::Valid`].
    Valid,
    /// See [`Outcome::Invalid`].
    Invalid,
    /// See [`Outcome::Unknown`].
    Unknown,
    /// See [`Outcome::Error`].
    Error,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Invalid => write!(f, "invalid"),
            Self::Unknown => write!(f, "unknown"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The reduced verdict of a whole run.
#[derive(Debug)]
pub enum JobResult {
    /// Nothing was invalid and every lookup succeeded or found no schema.
    Success,
    /// Some objects were invalid; no lookup failed.
    PartialFailure {
        /// Number of invalid objects.
        invalid: usize,
    },
    /// A schema lookup failed; takes precedence over every other outcome.
    Aborted(SchemaguardError),
}

impl JobResult {
    /// Returns true for [`JobResult::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns true if the run was aborted.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }

    /// Converts the verdict into a result for the command layer.
    pub fn into_result(self) -> Result<(), SchemaguardError> {
        match self {
            Self::Success => Ok(()),
            Self::PartialFailure { invalid } => Err(SchemaguardError::InvalidObjects(invalid)),
            Self::Aborted(cause) => Err(cause),
        }
    }
}

impl fmt::Display for JobResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::PartialFailure { invalid } => write!(f, "partial failure ({invalid} invalid)"),
            Self::Aborted(cause) => write!(f, "aborted: {cause}"),
        }
    }
}
