//! Shared test doubles for the build step.
//!
//! Available to unit tests and, through the `test-support` feature, to the
//! behavioural suites under `tests/`.

use crate::executor::{CommandExecutor, ExecutionError, ExecutionRequest, TaskExecutor};
use crate::files::FileAccess;
use camino::{Utf8Path, Utf8PathBuf};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with the given stdout.
#[must_use]
pub fn success_output(stdout: &str) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.as_bytes().to_vec(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The program to execute (e.g., "gradle").
    pub program: String,
    /// The arguments to pass to the program.
    pub args: Vec<String>,
    /// The result to return when this command is invoked.
    pub result: std::io::Result<Output>,
}

impl ExpectedCall {
    /// Expect `program` to be run with `args` and answer with `result`.
    #[must_use]
    pub fn new(program: &str, args: &[&str], result: std::io::Result<Output>) -> Self {
        Self {
            program: program.to_owned(),
            args: args.iter().map(|arg| (*arg).to_owned()).collect(),
            result,
        }
    }
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Records expected command invocations and returns predefined results,
/// allowing tests to verify command execution without side effects.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
        }
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<Output> {
        let mut expected = self.expected.borrow_mut();
        let Some(call) = expected.pop_front() else {
            panic!("unexpected command invocation: {program} {args:?}");
        };

        assert_eq!(call.program, program);
        assert_eq!(call.args.as_slice(), args);

        call.result
    }
}

/// A `TaskExecutor` that records requests and replays scripted failures.
///
/// Every task succeeds with empty output unless it was registered with
/// [`RecordingTaskExecutor::failing`].
#[derive(Debug, Default)]
pub struct RecordingTaskExecutor {
    requests: RefCell<Vec<ExecutionRequest>>,
    failures: HashMap<String, String>,
}

impl RecordingTaskExecutor {
    /// Creates an executor where every task succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `task` fail with the given stderr text.
    #[must_use]
    pub fn failing(mut self, task: &str, stderr: &str) -> Self {
        self.failures.insert(task.to_owned(), stderr.to_owned());
        self
    }

    /// Returns every request received, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<ExecutionRequest> {
        self.requests.borrow().clone()
    }

    /// Returns the task names received, in order.
    #[must_use]
    pub fn tasks(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|request| request.task.clone())
            .collect()
    }

    /// Returns the first request for `task`, if one was received.
    #[must_use]
    pub fn request_for(&self, task: &str) -> Option<ExecutionRequest> {
        self.requests
            .borrow()
            .iter()
            .find(|request| request.task == task)
            .cloned()
    }

    /// Returns `true` if `task` was requested.
    #[must_use]
    pub fn was_called(&self, task: &str) -> bool {
        self.request_for(task).is_some()
    }
}

impl TaskExecutor for RecordingTaskExecutor {
    fn execute(&self, request: &ExecutionRequest) -> Result<String, ExecutionError> {
        self.requests.borrow_mut().push(request.clone());
        match self.failures.get(&request.task) {
            Some(stderr) => Err(ExecutionError::Failed {
                program: "gradle".to_owned(),
                code: Some(1),
                stderr: stderr.clone(),
            }),
            None => Ok(String::new()),
        }
    }
}

/// A `FileAccess` serving files from memory.
#[derive(Debug, Default)]
pub struct InMemoryFileAccess {
    files: HashMap<Utf8PathBuf, Vec<u8>>,
    reads: Cell<usize>,
}

impl InMemoryFileAccess {
    /// Creates an empty file map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given contents.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<Utf8PathBuf>, content: &str) -> Self {
        self.files.insert(path.into(), content.as_bytes().to_vec());
        self
    }

    /// Number of `read` calls served so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl FileAccess for InMemoryFileAccess {
    fn exists(&self, path: &Utf8Path) -> std::io::Result<bool> {
        Ok(self.files.contains_key(path))
    }

    fn read(&self, path: &Utf8Path) -> std::io::Result<Vec<u8>> {
        self.reads.set(self.reads.get() + 1);
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound))
    }
}
