//! Testing utilities for schemaguard.
//!
//! This module provides:
//! - A scripted schema client with per-kind behavior
//! - A cloneable in-memory writer for capturing reports
//! - Object fixtures

mod fixtures;
mod mocks;

pub use fixtures::{object, object_with_content};
pub use mocks::{FixedValidator, PanickingValidator, ScriptedSchemaClient, SharedBuffer};
