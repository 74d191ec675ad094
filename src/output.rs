//! Progress and summary output for the build step.
//!
//! Progress goes to an injected writer (stderr in the binary) so that tests
//! can capture it. Write failures are ignored.

use crate::artifacts::ArtifactList;
use crate::config::BuildConfiguration;
use crate::pipeline::Stage;
use std::io::Write;

/// Writes a line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format a summary after publishing.
///
/// # Example
///
/// ```
/// use gradle_execute_build::artifacts::{Artifact, ArtifactList};
/// use gradle_execute_build::output::publish_summary;
///
/// let artifacts = ArtifactList::from(vec![Artifact::new("a.jar")]);
/// assert_eq!(
///     publish_summary(&artifacts, "https://repo.example.com"),
///     "Published 1 artifact to https://repo.example.com"
/// );
/// ```
#[must_use]
pub fn publish_summary(artifacts: &ArtifactList, repository_url: &str) -> String {
    let count = artifacts.len();
    let plural = if count == 1 { "artifact" } else { "artifacts" };
    format!("Published {count} {plural} to {repository_url}")
}

/// Returns the stages `config` enables, in execution order.
#[must_use]
pub fn planned_stages(config: &BuildConfiguration) -> Vec<Stage> {
    let mut stages = Vec::with_capacity(3);
    if config.create_bom {
        stages.push(Stage::Bom);
    }
    stages.push(Stage::Build);
    if config.publish {
        stages.push(Stage::Publish);
    }
    stages
}

/// Configuration information for dry-run output.
#[derive(Debug, Clone)]
pub struct DryRunInfo<'a> {
    /// The resolved configuration.
    pub config: &'a BuildConfiguration,
    /// Publish init script, when publishing is enabled.
    pub publish_script: Option<&'a str>,
}

impl DryRunInfo<'_> {
    /// Format the dry-run report.
    #[must_use]
    pub fn display_text(&self) -> String {
        let config = self.config;
        let stages: Vec<String> = planned_stages(config)
            .iter()
            .map(|stage| match stage {
                Stage::Build => format!("{stage} ({})", config.task),
                Stage::Bom | Stage::Publish => stage.to_string(),
            })
            .collect();

        let mut text = format!(
            concat!(
                "Dry run - no tasks will be executed\n\n",
                "Project path: {}\n",
                "Build task: {}\n",
                "Use wrapper: {}\n",
                "Stages: {}"
            ),
            config.path,
            config.task,
            config.use_wrapper,
            stages.join(" -> "),
        );

        if let Some(script) = self.publish_script {
            text.push_str("\n\nPublish init script:\n");
            text.push_str(&redact_password(script));
        }
        text
    }
}

/// Masks the value of the credentials `password` assignment.
fn redact_password(script: &str) -> String {
    script
        .split_inclusive('\n')
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with("password = ") {
                let indent = line.strip_suffix(trimmed).unwrap_or_default();
                let newline = if line.ends_with('\n') { "\n" } else { "" };
                format!("{indent}password = \"<redacted>\"{newline}")
            } else {
                line.to_owned()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::Artifact;
    use rstest::rstest;

    #[rstest]
    #[case::none(0, "Published 0 artifacts to https://repo")]
    #[case::one(1, "Published 1 artifact to https://repo")]
    #[case::many(3, "Published 3 artifacts to https://repo")]
    fn publish_summary_pluralises(#[case] count: usize, #[case] expected: &str) {
        let artifacts: ArtifactList = (0..count)
            .map(|i| Artifact::new(format!("a{i}.jar")))
            .collect();
        assert_eq!(publish_summary(&artifacts, "https://repo"), expected);
    }

    #[rstest]
    #[case::build_only(false, false, vec![Stage::Build])]
    #[case::with_bom(true, false, vec![Stage::Bom, Stage::Build])]
    #[case::with_publish(false, true, vec![Stage::Build, Stage::Publish])]
    #[case::all(true, true, vec![Stage::Bom, Stage::Build, Stage::Publish])]
    fn planned_stages_follow_flags(
        #[case] create_bom: bool,
        #[case] publish: bool,
        #[case] expected: Vec<Stage>,
    ) {
        let config = BuildConfiguration {
            create_bom,
            publish,
            ..BuildConfiguration::default()
        };
        assert_eq!(planned_stages(&config), expected);
    }

    #[test]
    fn dry_run_text_lists_stages_and_redacts_password() {
        let config = BuildConfiguration {
            create_bom: true,
            publish: true,
            repository_password: "s3cret".to_owned(),
            ..BuildConfiguration::default()
        };
        let info = DryRunInfo {
            config: &config,
            publish_script: Some("password = \"s3cret\""),
        };

        let text = info.display_text();

        assert!(text.contains("Stages: bom -> build (build) -> publish"));
        assert!(text.contains("password = \"<redacted>\""));
        assert!(!text.contains("s3cret"));
    }

    #[test]
    fn redaction_leaves_other_lines_untouched() {
        let config = BuildConfiguration {
            publish: true,
            repository_url: "https://repo.example.com".to_owned(),
            repository_password: "java".to_owned(),
            ..BuildConfiguration::default()
        };
        let script = crate::script::render_publish_init_script(&config).expect("render script");
        let info = DryRunInfo {
            config: &config,
            publish_script: Some(&script),
        };

        let text = info.display_text();

        assert!(text.contains("apply plugin: 'java'"));
        assert!(text.contains("from components.java"));
        assert!(text.contains("                    password = \"<redacted>\"\n"));
        assert!(!text.contains("password = \"java\""));
    }

    #[test]
    fn write_stderr_line_appends_newline() {
        let mut buffer = Vec::new();
        write_stderr_line(&mut buffer, "Running build stage...");
        assert_eq!(buffer, b"Running build stage...\n");
    }
}
