//! Gradle build step CLI entrypoint.
//!
//! This binary runs a Gradle build with optional BOM generation and Maven
//! publishing. After a successful publish it writes the published artifact
//! names to the pipeline environment for later steps.

use clap::Parser;
use gradle_execute_build::cli::Cli;
use gradle_execute_build::config::BuildConfiguration;
use gradle_execute_build::environment::PipelineEnvironment;
use gradle_execute_build::error::Result;
use gradle_execute_build::executor::{GradleExecutor, SystemCommandExecutor};
use gradle_execute_build::files::SystemFileAccess;
use gradle_execute_build::output::{DryRunInfo, write_stderr_line};
use gradle_execute_build::pipeline::Pipeline;
use gradle_execute_build::script::render_publish_init_script;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let config = cli.configuration()?;
    log::debug!("resolved configuration: {config:?}");

    // Dry-run mode: show the plan without invoking Gradle
    if cli.dry_run {
        return run_dry(&config, stderr);
    }

    let commands = SystemCommandExecutor;
    let executor = GradleExecutor::new(&commands);
    let files = SystemFileAccess;
    let mut env = PipelineEnvironment::new();

    Pipeline::new(&config, &executor, &files)
        .quiet(cli.quiet)
        .run(&mut env, stderr)?;

    if config.publish {
        let written = env.persist(&cli.environment_dir())?;
        if !cli.quiet {
            write_stderr_line(stderr, format!("Pipeline environment written to {written}"));
        }
    }

    Ok(())
}

/// Prints the planned stages and, when publishing, the rendered init script.
fn run_dry(config: &BuildConfiguration, stderr: &mut dyn Write) -> Result<()> {
    let publish_script = if config.publish {
        Some(render_publish_init_script(config)?)
    } else {
        None
    };
    let info = DryRunInfo {
        config,
        publish_script: publish_script.as_deref(),
    };
    write_stderr_line(stderr, info.display_text());
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}
