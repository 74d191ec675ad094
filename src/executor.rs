//! Gradle task execution.
//!
//! Stages never spawn Gradle themselves; they describe what to run as an
//! [`ExecutionRequest`] and hand it to a [`TaskExecutor`]. The production
//! [`GradleExecutor`] turns a request into a `gradle`/`gradlew` command line,
//! materialises any init script as a temporary file, and delegates the
//! process spawn to a [`CommandExecutor`].

use crate::config::BuildConfiguration;
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;
use std::process::{Command, Output};

/// Executable used when the wrapper is not requested or not present.
pub const GRADLE_EXECUTABLE: &str = "gradle";

/// File name of the Gradle wrapper launcher.
#[cfg(windows)]
pub const WRAPPER_EXECUTABLE: &str = "gradlew.bat";

/// File name of the Gradle wrapper launcher.
#[cfg(not(windows))]
pub const WRAPPER_EXECUTABLE: &str = "gradlew";

/// Build files recognised in the project directory.
pub const BUILD_FILES: &[&str] = &["build.gradle", "build.gradle.kts"];

/// Errors arising from running a Gradle task.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// No Gradle build file was found in the project directory.
    #[error("the gradle build script could not be found in {path}")]
    BuildFileNotFound {
        /// Project directory that was searched.
        path: Utf8PathBuf,
    },

    /// The init script could not be written to a temporary file.
    #[error("failed to write init script: {source}")]
    InitScript {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The Gradle process could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Gradle ran but exited unsuccessfully.
    #[error("{program} exited with {}: {stderr}", exit_description(.code))]
    Failed {
        /// Program that was invoked.
        program: String,
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
        /// Captured standard error, trimmed.
        stderr: String,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no exit code".to_owned(),
    }
}

/// A single Gradle task invocation.
///
/// Requests are built fresh for every stage so that each may carry its own
/// init script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    /// Project directory containing the build file.
    pub path: Utf8PathBuf,
    /// Gradle task to run.
    pub task: String,
    /// Prefer the project's wrapper launcher.
    pub use_wrapper: bool,
    /// Init script text applied to the run, if any.
    pub init_script: Option<String>,
}

impl ExecutionRequest {
    /// Create a request for `task` using the project settings in `config`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gradle_execute_build::config::BuildConfiguration;
    /// use gradle_execute_build::executor::ExecutionRequest;
    ///
    /// let config = BuildConfiguration::default();
    /// let request = ExecutionRequest::for_task(&config, "publish")
    ///     .with_init_script("rootProject { }");
    /// assert_eq!(request.task, "publish");
    /// assert!(request.init_script.is_some());
    /// ```
    #[must_use]
    pub fn for_task(config: &BuildConfiguration, task: impl Into<String>) -> Self {
        Self {
            path: config.path.clone(),
            task: task.into(),
            use_wrapper: config.use_wrapper,
            init_script: None,
        }
    }

    /// Attach init script text to the request.
    #[must_use]
    pub fn with_init_script(mut self, content: impl Into<String>) -> Self {
        self.init_script = Some(content.into());
        self
    }
}

/// Runs Gradle tasks on behalf of the pipeline stages.
#[cfg_attr(test, mockall::automock)]
pub trait TaskExecutor {
    /// Runs the requested task and returns its captured standard output.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot be started or exits unsuccessfully.
    fn execute(&self, request: &ExecutionRequest) -> Result<String, ExecutionError>;
}

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<Output> {
        Command::new(program).args(args).output()
    }
}

/// Runs Gradle tasks through a [`CommandExecutor`].
///
/// # Examples
///
/// ```no_run
/// use gradle_execute_build::config::BuildConfiguration;
/// use gradle_execute_build::executor::{
///     ExecutionRequest, GradleExecutor, SystemCommandExecutor, TaskExecutor,
/// };
///
/// let commands = SystemCommandExecutor;
/// let gradle = GradleExecutor::new(&commands);
/// let request = ExecutionRequest::for_task(&BuildConfiguration::default(), "build");
/// let stdout = gradle.execute(&request)?;
/// println!("{stdout}");
/// # Ok::<(), gradle_execute_build::executor::ExecutionError>(())
/// ```
pub struct GradleExecutor<'a> {
    commands: &'a dyn CommandExecutor,
}

impl<'a> GradleExecutor<'a> {
    /// Create an executor that spawns Gradle through `commands`.
    #[must_use]
    pub fn new(commands: &'a dyn CommandExecutor) -> Self {
        Self { commands }
    }
}

impl TaskExecutor for GradleExecutor<'_> {
    fn execute(&self, request: &ExecutionRequest) -> Result<String, ExecutionError> {
        ensure_build_file(&request.path)?;

        let program = gradle_program(request);
        // Held until the command returns; dropping it removes the file.
        let init_script = request
            .init_script
            .as_deref()
            .filter(|content| !content.is_empty())
            .map(write_init_script)
            .transpose()?;
        let args = gradle_args(request, init_script.as_ref().map(|(_, path)| path.as_path()));

        log::debug!("running {program} {}", args.join(" "));
        let output = self
            .commands
            .run(&program, &args)
            .map_err(|source| ExecutionError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExecutionError::Failed {
                program,
                code: output.status.code(),
                stderr: stderr.trim().to_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn ensure_build_file(path: &Utf8Path) -> Result<(), ExecutionError> {
    if BUILD_FILES.iter().any(|name| path.join(name).is_file()) {
        Ok(())
    } else {
        Err(ExecutionError::BuildFileNotFound {
            path: path.to_owned(),
        })
    }
}

/// Chooses between the project wrapper and a system `gradle`.
fn gradle_program(request: &ExecutionRequest) -> String {
    if !request.use_wrapper {
        return GRADLE_EXECUTABLE.to_owned();
    }

    let wrapper = request.path.join(WRAPPER_EXECUTABLE);
    if wrapper.is_file() {
        wrapper.into_string()
    } else {
        log::warn!("gradle wrapper not found at {wrapper}; falling back to {GRADLE_EXECUTABLE}");
        GRADLE_EXECUTABLE.to_owned()
    }
}

/// Builds `[--init-script FILE] <task> -p <path>`.
fn gradle_args(request: &ExecutionRequest, init_script: Option<&Utf8Path>) -> Vec<String> {
    let mut args = Vec::with_capacity(5);
    if let Some(script) = init_script {
        args.push("--init-script".to_owned());
        args.push(script.to_string());
    }
    args.push(request.task.clone());
    args.push("-p".to_owned());
    args.push(request.path.to_string());
    args
}

fn write_init_script(
    content: &str,
) -> Result<(tempfile::NamedTempFile, Utf8PathBuf), ExecutionError> {
    let mut file = tempfile::Builder::new()
        .prefix("initScript")
        .suffix(".gradle")
        .tempfile()
        .map_err(|source| ExecutionError::InitScript { source })?;
    file.write_all(content.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|source| ExecutionError::InitScript { source })?;

    let path = Utf8PathBuf::try_from(file.path().to_path_buf()).map_err(|err| {
        ExecutionError::InitScript {
            source: std::io::Error::other(err.to_string()),
        }
    })?;
    Ok((file, path))
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
