//! Gradle init script generation.
//!
//! Init scripts let the step reconfigure a project (apply `maven-publish`,
//! point it at a staging repository) without touching its own build files.
//! Templates are rendered with `tera`; optional Maven coordinates are gated
//! on explicit presence flags computed here rather than on template
//! truthiness, so an empty string and an absent value behave identically.

use crate::config::BuildConfiguration;
use crate::error::{Result, StepError};
use serde::Serialize;
use tera::{Context, Tera};

/// Template name used for the publish init script.
pub const PUBLISH_TEMPLATE_NAME: &str = "publish.gradle";

/// Init script that configures a Maven publication and target repository.
pub const PUBLISH_INIT_SCRIPT_TEMPLATE: &str = r#"
rootProject {
    apply plugin: 'maven-publish'
    apply plugin: 'java'

    publishing {
        publications {
            maven(MavenPublication) {
                versionMapping {
                    usage('java-api') {
                        fromResolutionOf('runtimeClasspath')
                    }
                    usage('java-runtime') {
                        fromResolutionResult()
                    }
                }
{%- if has_group_id %}
                groupId = '{{ group_id }}'
{%- endif %}
{%- if has_artifact_id %}
                artifactId = '{{ artifact_id }}'
{%- endif %}
{%- if has_version %}
                version = '{{ version }}'
{%- endif %}
                from components.java
            }
        }
        repositories {
            maven {
                credentials {
                    username = "{{ repository_username }}"
                    password = "{{ repository_password }}"
                }
                url = "{{ repository_url }}"
            }
        }
    }
}
"#;

/// Values substituted into the publish init script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishScriptContext {
    has_group_id: bool,
    group_id: String,
    has_artifact_id: bool,
    artifact_id: String,
    has_version: bool,
    version: String,
    repository_url: String,
    repository_username: String,
    repository_password: String,
}

impl PublishScriptContext {
    /// Derive the template context from the step configuration.
    #[must_use]
    pub fn from_configuration(config: &BuildConfiguration) -> Self {
        let group_id = config.group_id().unwrap_or_default();
        let artifact_id = config.artifact_id().unwrap_or_default();
        let version = config.version().unwrap_or_default();
        Self {
            has_group_id: !group_id.is_empty(),
            group_id: group_id.to_owned(),
            has_artifact_id: !artifact_id.is_empty(),
            artifact_id: artifact_id.to_owned(),
            has_version: !version.is_empty(),
            version: version.to_owned(),
            repository_url: config.repository_url.clone(),
            repository_username: config.repository_username.clone(),
            repository_password: config.repository_password.clone(),
        }
    }
}

/// Renders `template` with the serialisable `values`.
///
/// `name` identifies the template in errors and must not end in an
/// auto-escaped extension such as `.html`.
///
/// # Errors
///
/// Returns [`StepError::Template`] when the template does not parse or a
/// substitution fails; no partial output is produced.
///
/// # Examples
///
/// ```
/// use gradle_execute_build::script::render_template;
/// use std::collections::BTreeMap;
///
/// let values = BTreeMap::from([("task", "build")]);
/// let script = render_template("task.gradle", "tasks.named('{{ task }}')", &values)?;
/// assert_eq!(script, "tasks.named('build')");
/// # Ok::<(), gradle_execute_build::error::StepError>(())
/// ```
pub fn render_template<T: Serialize>(
    name: &'static str,
    template: &str,
    values: &T,
) -> Result<String> {
    let to_error = |source| StepError::Template {
        template: name,
        source,
    };
    let context = Context::from_serialize(values).map_err(to_error)?;
    let mut tera = Tera::default();
    tera.add_raw_template(name, template).map_err(to_error)?;
    tera.render(name, &context).map_err(to_error)
}

/// Renders the publish init script for `config`.
///
/// # Errors
///
/// Returns [`StepError::Template`] if rendering fails.
pub fn render_publish_init_script(config: &BuildConfiguration) -> Result<String> {
    render_template(
        PUBLISH_TEMPLATE_NAME,
        PUBLISH_INIT_SCRIPT_TEMPLATE,
        &PublishScriptContext::from_configuration(config),
    )
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
