//! CLI argument definitions for the Gradle build step.
//!
//! Every setting can come from a TOML configuration file; flags given on the
//! command line take precedence over the file. Repository credentials may
//! also be supplied through environment variables so that they stay out of
//! process listings and shell history.

use crate::config::BuildConfiguration;
use crate::environment::DEFAULT_ENVIRONMENT_DIR;
use crate::error::Result;
use camino::Utf8PathBuf;
use clap::Parser;

/// Run a Gradle build with optional BOM generation and Maven publishing.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "gradle-execute-build")]
#[command(version, about)]
#[command(long_about = concat!(
    "Run a Gradle build with optional BOM generation and Maven publishing.\n\n",
    "Stages run in order: an optional CycloneDX BOM (--create-bom), the ",
    "configured build task, and an optional publish to a Maven repository ",
    "(--publish). The first failing stage stops the run.\n\n",
    "After publishing, the names of the published artifacts are written to ",
    "<environment-dir>/commonPipelineEnvironment/custom/artifacts.json.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Build with the project wrapper:\n",
    "    $ gradle-execute-build --use-wrapper\n\n",
    "  Generate a BOM, build, and publish:\n",
    "    $ GRADLE_REPOSITORY_PASSWORD=... gradle-execute-build --create-bom \\\n",
    "        --publish --repository-url https://repo.example.com/staging \\\n",
    "        --repository-username deployer\n\n",
    "  Preview the stages and init script:\n",
    "    $ gradle-execute-build --config step.toml --dry-run",
))]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Project directory containing the Gradle build file [default: .]. After
    /// publishing, module metadata is read from
    /// ./build/publications/maven/module.json relative to the working
    /// directory, not this path.
    #[arg(long, value_name = "DIR")]
    pub path: Option<Utf8PathBuf>,

    /// Gradle task to run [default: build].
    #[arg(long, value_name = "TASK")]
    pub task: Option<String>,

    /// Use the project's Gradle wrapper.
    #[arg(long)]
    pub use_wrapper: bool,

    /// Generate a CycloneDX BOM before building.
    #[arg(long)]
    pub create_bom: bool,

    /// Publish artifacts after building.
    #[arg(long)]
    pub publish: bool,

    /// Group ID for the published artifacts.
    #[arg(long, value_name = "GROUP")]
    pub artifact_group_id: Option<String>,

    /// Artifact ID for the published artifacts.
    #[arg(long, value_name = "ID")]
    pub artifact_id: Option<String>,

    /// Version for the published artifacts.
    #[arg(long, value_name = "VERSION")]
    pub artifact_version: Option<String>,

    /// Maven repository URL to publish to.
    #[arg(long, value_name = "URL")]
    pub repository_url: Option<String>,

    /// Repository user name.
    #[arg(long, value_name = "USER", env = "GRADLE_REPOSITORY_USERNAME")]
    pub repository_username: Option<String>,

    /// Repository password.
    #[arg(
        long,
        value_name = "PASSWORD",
        env = "GRADLE_REPOSITORY_PASSWORD",
        hide_env_values = true
    )]
    pub repository_password: Option<String>,

    /// Directory receiving the pipeline environment [default: .pipeline].
    #[arg(long, value_name = "DIR")]
    pub environment_dir: Option<Utf8PathBuf>,

    /// Show the stages and publish init script without running Gradle.
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Resolves the run configuration from the optional file and flags.
    ///
    /// Boolean flags can only switch a stage on; a stage enabled in the file
    /// stays enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded or the
    /// resulting configuration is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::Parser;
    /// use gradle_execute_build::cli::Cli;
    ///
    /// let cli = Cli::parse_from(["gradle-execute-build", "--task", "assemble", "--create-bom"]);
    /// let config = cli.configuration()?;
    /// assert_eq!(config.task, "assemble");
    /// assert!(config.create_bom);
    /// # Ok::<(), gradle_execute_build::error::StepError>(())
    /// ```
    pub fn configuration(&self) -> Result<BuildConfiguration> {
        let base = match &self.config {
            Some(path) => BuildConfiguration::load(path)?,
            None => BuildConfiguration::default(),
        };
        let config = self.apply_overrides(base);
        config.validate()?;
        Ok(config)
    }

    /// Applies command-line values on top of `config`.
    #[must_use]
    pub fn apply_overrides(&self, config: BuildConfiguration) -> BuildConfiguration {
        BuildConfiguration {
            path: self.path.clone().unwrap_or(config.path),
            task: self.task.clone().unwrap_or(config.task),
            use_wrapper: self.use_wrapper || config.use_wrapper,
            create_bom: self.create_bom || config.create_bom,
            publish: self.publish || config.publish,
            artifact_group_id: self.artifact_group_id.clone().or(config.artifact_group_id),
            artifact_id: self.artifact_id.clone().or(config.artifact_id),
            artifact_version: self.artifact_version.clone().or(config.artifact_version),
            repository_url: self.repository_url.clone().unwrap_or(config.repository_url),
            repository_username: self
                .repository_username
                .clone()
                .unwrap_or(config.repository_username),
            repository_password: self
                .repository_password
                .clone()
                .unwrap_or(config.repository_password),
        }
    }

    /// Directory receiving the pipeline environment.
    #[must_use]
    pub fn environment_dir(&self) -> Utf8PathBuf {
        self.environment_dir
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_ENVIRONMENT_DIR))
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
