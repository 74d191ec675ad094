//! Build pipeline orchestration.
//!
//! A run is a fixed, linear sequence: an optional BOM stage, the project's
//! build task, and an optional publish stage. The first failing stage ends
//! the run; stages already completed are not undone and nothing is retried.

use crate::bom::create_bom;
use crate::config::BuildConfiguration;
use crate::environment::PipelineEnvironment;
use crate::error::{Result, StepError};
use crate::executor::{ExecutionRequest, TaskExecutor};
use crate::files::FileAccess;
use crate::output::{publish_summary, write_stderr_line};
use crate::publish::publish_artifacts;
use std::fmt;
use std::io::Write;

/// A stage of the build pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// CycloneDX BOM generation.
    Bom,
    /// The configured build task.
    Build,
    /// Publishing to the Maven repository.
    Publish,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bom => "bom",
            Self::Build => "build",
            Self::Publish => "publish",
        };
        f.write_str(name)
    }
}

/// Runs the build step's stages against a project.
pub struct Pipeline<'a> {
    config: &'a BuildConfiguration,
    executor: &'a dyn TaskExecutor,
    files: &'a dyn FileAccess,
    quiet: bool,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline for `config`.
    ///
    /// `executor` runs every Gradle task; `files` reads the module metadata
    /// after publishing.
    #[must_use]
    pub fn new(
        config: &'a BuildConfiguration,
        executor: &'a dyn TaskExecutor,
        files: &'a dyn FileAccess,
    ) -> Self {
        Self {
            config,
            executor,
            files,
            quiet: false,
        }
    }

    /// Suppress progress output.
    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Runs every enabled stage in order.
    ///
    /// Progress is written to `stderr` unless quiet. On success with
    /// publishing enabled, `env` holds the published artifacts; otherwise it
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the first stage error encountered.
    pub fn run(&self, env: &mut PipelineEnvironment, stderr: &mut dyn Write) -> Result<()> {
        if self.config.create_bom {
            self.stage(Stage::Bom, stderr, || create_bom(self.config, self.executor))?;
        }

        self.stage(Stage::Build, stderr, || self.build())?;

        if self.config.publish {
            self.stage(Stage::Publish, stderr, || {
                publish_artifacts(self.config, self.executor, self.files, env)
            })?;
            self.progress(
                stderr,
                publish_summary(env.artifacts(), &self.config.repository_url),
            );
            for artifact in env.artifacts() {
                self.progress(stderr, format!("  - {artifact}"));
            }
        }

        Ok(())
    }

    fn build(&self) -> Result<()> {
        let request = ExecutionRequest::for_task(self.config, self.config.task.as_str());
        self.executor
            .execute(&request)
            .map(|_| ())
            .map_err(|source| StepError::BuildExecution {
                stage: Stage::Build,
                task: self.config.task.clone(),
                source,
            })
    }

    fn stage(
        &self,
        stage: Stage,
        stderr: &mut dyn Write,
        action: impl FnOnce() -> Result<()>,
    ) -> Result<()> {
        log::info!("starting {stage} stage");
        self.progress(stderr, format!("Running {stage} stage..."));
        action().inspect_err(|err| log::error!("{stage} stage failed: {err}"))?;
        log::info!("{stage} stage completed");
        Ok(())
    }

    fn progress(&self, stderr: &mut dyn Write, message: impl fmt::Display) {
        if !self.quiet {
            write_stderr_line(stderr, message);
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
