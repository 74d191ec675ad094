//! Unit tests for CLI parsing and configuration precedence.

use super::*;
use crate::error::StepError;
use rstest::rstest;

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["gradle-execute-build"];
    argv.extend_from_slice(args);
    Cli::parse_from(argv)
}

fn write_config(contents: &str) -> (tempfile::TempDir, Utf8PathBuf) {
    let temp = tempfile::tempdir().expect("temp dir");
    let path = Utf8PathBuf::try_from(temp.path().join("step.toml")).expect("UTF-8 path");
    std::fs::write(&path, contents).expect("write config");
    (temp, path)
}

#[test]
fn no_flags_yield_default_build() {
    let config = parse(&[]).configuration().expect("configuration");
    assert_eq!(config.task, "build");
    assert_eq!(config.path, Utf8PathBuf::from("."));
    assert!(!config.create_bom);
    assert!(!config.publish);
}

#[rstest]
#[case::use_wrapper("--use-wrapper")]
#[case::create_bom("--create-bom")]
fn boolean_flags_enable_settings(#[case] flag: &str) {
    let config = parse(&[flag]).configuration().expect("configuration");
    assert!(config.use_wrapper || config.create_bom);
    assert_eq!(config.use_wrapper, flag == "--use-wrapper");
    assert_eq!(config.create_bom, flag == "--create-bom");
}

#[test]
fn publish_flag_requires_repository_url() {
    let err = parse(&["--publish"])
        .configuration()
        .expect_err("publish without URL should fail");
    assert!(matches!(err, StepError::InvalidConfiguration { .. }));
}

#[test]
fn publish_coordinates_are_parsed() {
    let config = parse(&[
        "--publish",
        "--repository-url",
        "https://repo.example.com",
        "--artifact-group-id",
        "com.example",
        "--artifact-id",
        "service",
        "--artifact-version",
        "1.0.0",
    ])
    .configuration()
    .expect("configuration");

    assert!(config.publish);
    assert_eq!(config.repository_url, "https://repo.example.com");
    assert_eq!(config.group_id(), Some("com.example"));
    assert_eq!(config.artifact_id(), Some("service"));
    assert_eq!(config.version(), Some("1.0.0"));
}

#[test]
fn flags_override_config_file() {
    let (_temp, path) = write_config(
        r#"
task = "assemble"
path = "service"
artifact_version = "1.0.0"
create_bom = true
"#,
    );
    let cli = parse(&[
        "--config",
        path.as_str(),
        "--task",
        "check",
        "--artifact-version",
        "2.0.0",
    ]);

    let config = cli.configuration().expect("configuration");

    assert_eq!(config.task, "check");
    assert_eq!(config.path, Utf8PathBuf::from("service"));
    assert_eq!(config.version(), Some("2.0.0"));
    assert!(config.create_bom, "file setting should be kept");
}

#[test]
fn missing_config_file_is_reported() {
    let err = parse(&["--config", "does-not-exist.toml"])
        .configuration()
        .expect_err("missing config should fail");
    assert!(matches!(err, StepError::ConfigRead { .. }));
}

#[test]
fn password_is_read_from_environment() {
    temp_env::with_var("GRADLE_REPOSITORY_PASSWORD", Some("from-env"), || {
        let cli = parse(&[]);
        assert_eq!(cli.repository_password.as_deref(), Some("from-env"));
    });
}

#[test]
fn password_flag_wins_over_environment() {
    temp_env::with_var("GRADLE_REPOSITORY_PASSWORD", Some("from-env"), || {
        let cli = parse(&["--repository-password", "from-flag"]);
        assert_eq!(cli.repository_password.as_deref(), Some("from-flag"));
    });
}

#[test]
fn username_is_read_from_environment() {
    temp_env::with_var("GRADLE_REPOSITORY_USERNAME", Some("deployer"), || {
        let config = parse(&[]).configuration().expect("configuration");
        assert_eq!(config.repository_username, "deployer");
    });
}

#[rstest]
#[case::default(&[], ".pipeline")]
#[case::explicit(&["--environment-dir", "out/env"], "out/env")]
fn environment_dir_resolution(#[case] args: &[&str], #[case] expected: &str) {
    assert_eq!(parse(args).environment_dir(), Utf8PathBuf::from(expected));
}

#[test]
fn dry_run_and_quiet_flags_parse() {
    let cli = parse(&["--dry-run", "-q"]);
    assert!(cli.dry_run);
    assert!(cli.quiet);
}

#[test]
fn empty_path_in_config_file_is_rejected() {
    let (_temp, path) = write_config("path = \"\"\n");
    let err = parse(&["--config", path.as_str()])
        .configuration()
        .expect_err("empty project path should fail");
    assert!(matches!(err, StepError::InvalidConfiguration { .. }));
}

#[test]
fn path_help_names_metadata_location() {
    use clap::CommandFactory;

    let command = Cli::command();
    let help = command
        .get_arguments()
        .find(|arg| arg.get_id() == "path")
        .and_then(|arg| arg.get_help())
        .map(ToString::to_string)
        .expect("path argument should have help");
    assert!(help.contains("build/publications/maven/module.json"));
    assert!(help.contains("working directory"));
}
