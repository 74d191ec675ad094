//! Shared pipeline output.
//!
//! Later pipeline steps (staging promotion, scanning) read the list of
//! published artifacts from the common pipeline environment. The publish
//! stage writes it once; [`PipelineEnvironment::persist`] then stores it as
//! `commonPipelineEnvironment/custom/artifacts.json` under the environment
//! root.

use crate::artifacts::ArtifactList;
use crate::error::{Result, StepError};
use camino::{Utf8Path, Utf8PathBuf};

/// Default directory holding the pipeline environment.
pub const DEFAULT_ENVIRONMENT_DIR: &str = ".pipeline";

/// Location of the artifact list relative to the environment root.
pub const ARTIFACTS_FILE: &str = "commonPipelineEnvironment/custom/artifacts.json";

/// Values this step exposes to the rest of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineEnvironment {
    artifacts: ArtifactList,
}

impl PipelineEnvironment {
    /// Create an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Published artifacts; empty until the publish stage succeeds.
    #[must_use]
    pub fn artifacts(&self) -> &ArtifactList {
        &self.artifacts
    }

    /// Records the published artifacts.
    pub fn set_artifacts(&mut self, artifacts: ArtifactList) {
        self.artifacts = artifacts;
    }

    /// Writes the environment below `root` and returns the file written.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::EnvironmentWrite`] if the directory or file
    /// cannot be written.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use gradle_execute_build::artifacts::{Artifact, ArtifactList};
    /// use gradle_execute_build::environment::PipelineEnvironment;
    ///
    /// let temp = tempfile::tempdir()?;
    /// let root = Utf8PathBuf::try_from(temp.path().to_path_buf())?;
    /// let mut env = PipelineEnvironment::new();
    /// env.set_artifacts(ArtifactList::from(vec![Artifact::new("a.jar")]));
    ///
    /// let written = env.persist(&root)?;
    /// assert!(written.ends_with("artifacts.json"));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn persist(&self, root: &Utf8Path) -> Result<Utf8PathBuf> {
        let path = root.join(ARTIFACTS_FILE);
        let write_error = |source| StepError::EnvironmentWrite {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        let json = serde_json::to_string_pretty(&self.artifacts)
            .map_err(|err| write_error(std::io::Error::other(err)))?;
        std::fs::write(&path, json).map_err(write_error)?;

        Ok(path)
    }
}
