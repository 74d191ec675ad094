//! Error types for the Gradle build step.
//!
//! Each variant names the stage or operation that failed so that a failing
//! run can be traced back to a misconfigured step, a broken build, or a
//! Gradle version whose publication metadata no longer matches.

use crate::artifacts::ArtifactError;
use crate::executor::ExecutionError;
use crate::pipeline::Stage;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while running the build step.
#[derive(Debug, Error)]
pub enum StepError {
    /// An init script template failed to parse or render.
    #[error("failed to render {template} init script: {source}")]
    Template {
        /// Name of the template that failed.
        template: &'static str,
        /// The underlying template engine error.
        #[source]
        source: tera::Error,
    },

    /// A Gradle task could not be run or exited unsuccessfully.
    #[error("{stage} stage: gradle task {task} failed: {source}")]
    BuildExecution {
        /// Stage that issued the task.
        stage: Stage,
        /// Name of the Gradle task.
        task: String,
        /// The underlying executor failure.
        #[source]
        source: ExecutionError,
    },

    /// Published artifacts could not be read from the module metadata.
    #[error("failed to get published artifacts: {source}")]
    ArtifactDiscovery {
        /// The underlying extraction failure.
        #[source]
        source: ArtifactError,
    },

    /// The configuration is inconsistent.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the problem.
        reason: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    ConfigRead {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this step.
    #[error("invalid configuration file {path}: {source}")]
    ConfigParse {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// The pipeline environment could not be written to disk.
    #[error("failed to write pipeline environment to {path}: {source}")]
    EnvironmentWrite {
        /// Path that was being written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl StepError {
    /// Returns the stage that produced the error, if it came from a stage.
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::BuildExecution { stage, .. } => Some(*stage),
            Self::Template { .. } | Self::ArtifactDiscovery { .. } => Some(Stage::Publish),
            _ => None,
        }
    }
}

/// Result type alias using [`StepError`].
pub type Result<T> = std::result::Result<T, StepError>;
