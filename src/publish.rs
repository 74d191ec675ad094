//! Artifact publishing.
//!
//! Publishing injects a generated init script that applies `maven-publish`
//! and points the project at the configured repository, runs Gradle's
//! `publish` task, then reads the module metadata Gradle wrote to find out
//! which artifacts went out.

use crate::artifacts::extract_published_artifacts;
use crate::config::BuildConfiguration;
use crate::environment::PipelineEnvironment;
use crate::error::{Result, StepError};
use crate::executor::{ExecutionRequest, TaskExecutor};
use crate::files::FileAccess;
use crate::pipeline::Stage;
use crate::script::render_publish_init_script;
use camino::Utf8Path;

/// Gradle task provided by `maven-publish`.
pub const PUBLISH_TASK: &str = "publish";

/// Module metadata written by `maven-publish` for the `maven` publication.
pub const MODULE_METADATA_PATH: &str = "./build/publications/maven/module.json";

/// Publishes the project and records the published artifacts in `env`.
///
/// # Errors
///
/// Returns [`StepError::Template`] if the init script cannot be rendered,
/// [`StepError::BuildExecution`] if the publish task fails, or
/// [`StepError::ArtifactDiscovery`] if the module metadata cannot be read.
/// `env` is only written when every step succeeds.
pub fn publish_artifacts(
    config: &BuildConfiguration,
    executor: &dyn TaskExecutor,
    files: &dyn FileAccess,
    env: &mut PipelineEnvironment,
) -> Result<()> {
    publish_artifacts_from(
        Utf8Path::new(MODULE_METADATA_PATH),
        config,
        executor,
        files,
        env,
    )
}

/// Like [`publish_artifacts`], reading module metadata from `metadata_path`.
///
/// # Errors
///
/// See [`publish_artifacts`].
pub fn publish_artifacts_from(
    metadata_path: &Utf8Path,
    config: &BuildConfiguration,
    executor: &dyn TaskExecutor,
    files: &dyn FileAccess,
    env: &mut PipelineEnvironment,
) -> Result<()> {
    let init_script = render_publish_init_script(config)?;

    let request = ExecutionRequest::for_task(config, PUBLISH_TASK).with_init_script(init_script);
    executor
        .execute(&request)
        .map_err(|source| StepError::BuildExecution {
            stage: Stage::Publish,
            task: PUBLISH_TASK.to_owned(),
            source,
        })?;

    let artifacts = extract_published_artifacts(metadata_path, files)
        .map_err(|source| StepError::ArtifactDiscovery { source })?;

    log::info!(
        "published {} artifact(s) to {}",
        artifacts.len(),
        config.repository_url
    );
    env.set_artifacts(artifacts);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::ArtifactError;
    use crate::executor::{ExecutionError, MockTaskExecutor};
    use crate::files::MockFileAccess;
    use crate::test_utils::InMemoryFileAccess;

    const METADATA: &str = r#"{"variants":[{"name":"apiElements","files":[{"name":"a.jar"},{"name":"a.pom"}]},{"name":"sourcesElements","files":[{"name":"a-sources.jar"}]}]}"#;

    fn config() -> BuildConfiguration {
        BuildConfiguration {
            publish: true,
            artifact_version: Some("2.0.0".to_owned()),
            repository_url: "https://repo.example.com/staging".to_owned(),
            repository_username: "deployer".to_owned(),
            repository_password: "s3cret".to_owned(),
            ..BuildConfiguration::default()
        }
    }

    fn succeeding_executor() -> MockTaskExecutor {
        let mut executor = MockTaskExecutor::new();
        executor.expect_execute().returning(|_| Ok(String::new()));
        executor
    }

    #[test]
    fn publishes_with_generated_init_script() {
        let mut executor = MockTaskExecutor::new();
        executor
            .expect_execute()
            .withf(|request| {
                let script = request.init_script.as_deref().unwrap_or_default();
                request.task == PUBLISH_TASK
                    && script.contains("version = '2.0.0'")
                    && script.contains("url = \"https://repo.example.com/staging\"")
                    && !script.contains("groupId =")
            })
            .times(1)
            .returning(|_| Ok(String::new()));
        let files = InMemoryFileAccess::new().with_file(MODULE_METADATA_PATH, METADATA);
        let mut env = PipelineEnvironment::new();

        publish_artifacts(&config(), &executor, &files, &mut env).expect("publish should succeed");

        assert_eq!(env.artifacts().names(), vec!["a.jar", "a.pom"]);
    }

    #[test]
    fn task_failure_skips_artifact_discovery() {
        let mut executor = MockTaskExecutor::new();
        executor.expect_execute().returning(|_| {
            Err(ExecutionError::Failed {
                program: "gradle".to_owned(),
                code: Some(1),
                stderr: "401 Unauthorized".to_owned(),
            })
        });
        let mut files = MockFileAccess::new();
        files.expect_exists().never();
        files.expect_read().never();
        let mut env = PipelineEnvironment::new();

        let err = publish_artifacts(&config(), &executor, &files, &mut env)
            .expect_err("failing publish should fail");

        assert!(matches!(
            err,
            StepError::BuildExecution {
                stage: Stage::Publish,
                ..
            }
        ));
        assert!(env.artifacts().is_empty());
    }

    #[test]
    fn missing_metadata_is_an_artifact_discovery_error() {
        let files = InMemoryFileAccess::new();
        let mut env = PipelineEnvironment::new();

        let err = publish_artifacts(&config(), &succeeding_executor(), &files, &mut env)
            .expect_err("missing metadata should fail");

        assert!(matches!(
            err,
            StepError::ArtifactDiscovery {
                source: ArtifactError::FileNotFound { .. }
            }
        ));
        assert!(env.artifacts().is_empty());
    }

    #[test]
    fn reads_metadata_from_custom_path() {
        let files = InMemoryFileAccess::new().with_file("out/module.json", METADATA);
        let mut env = PipelineEnvironment::new();

        publish_artifacts_from(
            Utf8Path::new("out/module.json"),
            &config(),
            &succeeding_executor(),
            &files,
            &mut env,
        )
        .expect("publish should succeed");

        assert_eq!(env.artifacts().len(), 2);
    }
}
