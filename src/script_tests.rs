//! Unit tests for init script rendering.

use super::*;
use rstest::rstest;

fn publishing_config() -> BuildConfiguration {
    BuildConfiguration {
        publish: true,
        repository_url: "https://repo.example.com/staging".to_owned(),
        repository_username: "deployer".to_owned(),
        repository_password: "s3cret".to_owned(),
        ..BuildConfiguration::default()
    }
}

fn coordinate_lines(script: &str) -> Vec<&str> {
    script
        .lines()
        .map(str::trim)
        .filter(|line| {
            line.starts_with("groupId =")
                || line.starts_with("artifactId =")
                || line.starts_with("version =")
        })
        .collect()
}

#[test]
fn omits_all_coordinates_when_unset() {
    let script = render_publish_init_script(&publishing_config()).expect("render");
    assert!(coordinate_lines(&script).is_empty());
    assert!(script.contains("                }\n                from components.java"));
}

#[test]
fn empty_strings_are_treated_as_unset() {
    let config = BuildConfiguration {
        artifact_group_id: Some(String::new()),
        artifact_id: Some(String::new()),
        artifact_version: Some(String::new()),
        ..publishing_config()
    };
    let script = render_publish_init_script(&config).expect("render");
    assert!(coordinate_lines(&script).is_empty());
}

#[rstest]
#[case::group_only(Some("com.example"), None, None, vec!["groupId = 'com.example'"])]
#[case::artifact_only(None, Some("service"), None, vec!["artifactId = 'service'"])]
#[case::version_only(None, None, Some("1.2.3"), vec!["version = '1.2.3'"])]
#[case::group_and_version(
    Some("com.example"),
    None,
    Some("1.2.3"),
    vec!["groupId = 'com.example'", "version = '1.2.3'"]
)]
#[case::all(
    Some("com.example"),
    Some("service"),
    Some("1.2.3"),
    vec!["groupId = 'com.example'", "artifactId = 'service'", "version = '1.2.3'"]
)]
fn emits_exactly_the_configured_coordinates(
    #[case] group: Option<&str>,
    #[case] artifact: Option<&str>,
    #[case] version: Option<&str>,
    #[case] expected: Vec<&str>,
) {
    let config = BuildConfiguration {
        artifact_group_id: group.map(str::to_owned),
        artifact_id: artifact.map(str::to_owned),
        artifact_version: version.map(str::to_owned),
        ..publishing_config()
    };
    let script = render_publish_init_script(&config).expect("render");
    assert_eq!(coordinate_lines(&script), expected);
}

#[test]
fn coordinates_sit_between_version_mapping_and_component() {
    let config = BuildConfiguration {
        artifact_group_id: Some("com.example".to_owned()),
        ..publishing_config()
    };
    let script = render_publish_init_script(&config).expect("render");
    assert!(script.contains(
        "                }\n                groupId = 'com.example'\n                from components.java"
    ));
}

#[test]
fn substitutes_repository_and_credentials() {
    let script = render_publish_init_script(&publishing_config()).expect("render");
    assert!(script.contains("username = \"deployer\""));
    assert!(script.contains("password = \"s3cret\""));
    assert!(script.contains("url = \"https://repo.example.com/staging\""));
}

#[test]
fn unset_credentials_render_as_empty_strings() {
    let script = render_publish_init_script(&BuildConfiguration::default()).expect("render");
    assert!(script.contains("username = \"\""));
    assert!(script.contains("password = \"\""));
    assert!(script.contains("url = \"\""));
}

#[test]
fn values_are_not_html_escaped() {
    let config = BuildConfiguration {
        repository_url: "https://repo.example.com/?a=1&b=2".to_owned(),
        ..publishing_config()
    };
    let script = render_publish_init_script(&config).expect("render");
    assert!(script.contains("url = \"https://repo.example.com/?a=1&b=2\""));
}

#[test]
fn applies_publishing_plugins() {
    let script = render_publish_init_script(&publishing_config()).expect("render");
    assert!(script.contains("apply plugin: 'maven-publish'"));
    assert!(script.contains("maven(MavenPublication)"));
    assert!(script.contains("from components.java"));
}

#[rstest]
#[case::unclosed_block("{% if has_group_id %}groupId")]
#[case::unknown_variable("{{ missing_value }}")]
fn template_errors_are_reported(#[case] template: &str) {
    let err = render_template("broken.gradle", template, &PublishScriptContext::default())
        .expect_err("rendering should fail");
    assert!(
        matches!(
            err,
            StepError::Template {
                template: "broken.gradle",
                ..
            }
        ),
        "unexpected error: {err:?}"
    );
}
