//! Build step configuration.
//!
//! `BuildConfiguration` is assembled once at start-up from an optional TOML
//! file and command-line overrides, then shared read-only by every stage.
//! Unknown keys are rejected so that typos in pipeline configuration surface
//! immediately rather than silently disabling publishing.

use crate::error::{Result, StepError};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::fmt;

/// Default Gradle task run by the build stage.
pub const DEFAULT_TASK: &str = "build";

/// Configuration for a single build step run.
#[derive(Clone, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfiguration {
    /// Directory containing `build.gradle` or `build.gradle.kts`.
    pub path: Utf8PathBuf,
    /// Gradle task executed by the build stage.
    pub task: String,
    /// Use the project's `gradlew` instead of a system `gradle`.
    pub use_wrapper: bool,
    /// Generate a CycloneDX BOM before building.
    pub create_bom: bool,
    /// Publish artifacts to the configured Maven repository after building.
    pub publish: bool,
    /// Maven group ID override for the publication.
    pub artifact_group_id: Option<String>,
    /// Maven artifact ID override for the publication.
    pub artifact_id: Option<String>,
    /// Version override for the publication.
    pub artifact_version: Option<String>,
    /// Maven repository URL that artifacts are published to.
    pub repository_url: String,
    /// Repository user name.
    pub repository_username: String,
    /// Repository password.
    pub repository_password: String,
}

impl Default for BuildConfiguration {
    fn default() -> Self {
        Self {
            path: Utf8PathBuf::from("."),
            task: DEFAULT_TASK.to_owned(),
            use_wrapper: false,
            create_bom: false,
            publish: false,
            artifact_group_id: None,
            artifact_id: None,
            artifact_version: None,
            repository_url: String::new(),
            repository_username: String::new(),
            repository_password: String::new(),
        }
    }
}

impl fmt::Debug for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.repository_password.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("BuildConfiguration")
            .field("path", &self.path)
            .field("task", &self.task)
            .field("use_wrapper", &self.use_wrapper)
            .field("create_bom", &self.create_bom)
            .field("publish", &self.publish)
            .field("artifact_group_id", &self.artifact_group_id)
            .field("artifact_id", &self.artifact_id)
            .field("artifact_version", &self.artifact_version)
            .field("repository_url", &self.repository_url)
            .field("repository_username", &self.repository_username)
            .field("repository_password", &password)
            .finish()
    }
}

impl BuildConfiguration {
    /// Parses a configuration from TOML text.
    ///
    /// `origin` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::ConfigParse`] if the text is not valid TOML or
    /// contains unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use gradle_execute_build::config::BuildConfiguration;
    ///
    /// let config = BuildConfiguration::from_toml_str(
    ///     "publish = true\nrepository_url = \"https://repo.example.com\"\n",
    ///     Utf8Path::new("step.toml"),
    /// )?;
    /// assert!(config.publish);
    /// assert_eq!(config.task, "build");
    /// # Ok::<(), gradle_execute_build::error::StepError>(())
    /// ```
    pub fn from_toml_str(contents: &str, origin: &Utf8Path) -> Result<Self> {
        toml::from_str(contents).map_err(|source| StepError::ConfigParse {
            path: origin.to_owned(),
            source,
        })
    }

    /// Loads a configuration file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::ConfigRead`] if the file cannot be read, or
    /// [`StepError::ConfigParse`] if it cannot be parsed.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| StepError::ConfigRead {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }

    /// Checks that the configuration can drive a run.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InvalidConfiguration`] when the project path or
    /// task name is blank, or publishing is enabled without a repository URL.
    pub fn validate(&self) -> Result<()> {
        if self.path.as_str().trim().is_empty() {
            return Err(StepError::InvalidConfiguration {
                reason: "project path must not be empty; use \".\" for the current directory"
                    .to_owned(),
            });
        }
        if self.task.trim().is_empty() {
            return Err(StepError::InvalidConfiguration {
                reason: "build task must not be empty".to_owned(),
            });
        }
        if self.publish && self.repository_url.trim().is_empty() {
            return Err(StepError::InvalidConfiguration {
                reason: "publishing requires a repository URL".to_owned(),
            });
        }
        Ok(())
    }

    /// Returns the group ID when set to a non-empty value.
    #[must_use]
    pub fn group_id(&self) -> Option<&str> {
        non_empty(self.artifact_group_id.as_deref())
    }

    /// Returns the artifact ID when set to a non-empty value.
    #[must_use]
    pub fn artifact_id(&self) -> Option<&str> {
        non_empty(self.artifact_id.as_deref())
    }

    /// Returns the artifact version when set to a non-empty value.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        non_empty(self.artifact_version.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
