//! Core domain model types for schemaguard.
//!
//! This module contains the fundamental types used throughout the crate:
//! - Candidate objects and their type discriminators
//! - Per-object outcomes and the run-level job result

mod object;
mod outcome;

pub use object::{CandidateObject, TypeDiscriminator};
pub use outcome::{JobResult, Outcome, OutcomeKind};
