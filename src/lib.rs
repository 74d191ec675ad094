//! Gradle build step library.
//!
//! This crate runs a Gradle project's build as a pipeline step: an optional
//! CycloneDX BOM, the configured build task, and an optional publish to a
//! Maven repository whose published artifact names are handed to later
//! pipeline steps. It is used by the `gradle-execute-build` binary and can be
//! driven programmatically with substitute executors for testing.
//!
//! # Modules
//!
//! - [`artifacts`] - Published artifact discovery from Gradle module metadata
//! - [`bom`] - CycloneDX BOM generation stage
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Step configuration loading and validation
//! - [`environment`] - Pipeline environment hand-off to later steps
//! - [`error`] - Semantic error types for the build step
//! - [`executor`] - Gradle task execution
//! - [`files`] - File system access abstraction
//! - [`output`] - Progress, summary, and dry-run formatting
//! - [`pipeline`] - Stage orchestration
//! - [`publish`] - Maven publish stage
//! - [`script`] - Gradle init script rendering

pub mod artifacts;
pub mod bom;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod executor;
pub mod files;
pub mod output;
pub mod pipeline;
pub mod publish;
pub mod script;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
