//! Test doubles for the pipeline's process and network seams.
//!
//! [`RecordingRunner`] stands in for [`ProcessRunner`]: it records every
//! command, answers with scripted outputs, and can run side effects (such as
//! pretending `make install` wrote files). [`MockFetcher`] stands in for
//! [`ArtifactFetcher`] and serves archive bytes from memory.
//!
//! # Example
//!
//! ```rust,ignore
//! let runner = RecordingRunner::succeeding();
//! runner.expect_contains("version -d", MockProcessOutput::success("OPENSSLDIR: \"/etc/ssl\""));
//! runner.on_command("make install_dev", |cmd| { /* write files */ });
//! ```

pub mod fixtures;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::errors::BuildError;
use crate::sources::fetch::ArtifactFetcher;
use crate::util::process::{ProcessBuilder, ProcessResult, ProcessRunner};

pub use fixtures::*;

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Create an output with both stdout and stderr.
    pub fn with_output(status: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    fn to_result(&self) -> ProcessResult {
        ProcessResult {
            code: Some(self.status),
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
        }
    }
}

/// Pattern for matching rendered command lines.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s.as_str()),
            CommandPattern::Contains(s) => cmd.contains(s.as_str()),
            CommandPattern::Any => true,
        }
    }
}

enum Response {
    Output(MockProcessOutput),
    LaunchFailure,
}

type SideEffect = Box<dyn Fn(&ProcessBuilder) + Send>;

#[derive(Default)]
struct State {
    expectations: Vec<(CommandPattern, Response)>,
    effects: Vec<(CommandPattern, SideEffect)>,
    calls: Vec<ProcessBuilder>,
    default_output: Option<MockProcessOutput>,
}

/// Fake [`ProcessRunner`] that records commands instead of spawning them.
#[derive(Default)]
pub struct RecordingRunner {
    state: Mutex<State>,
}

impl RecordingRunner {
    /// A strict runner: unexpected commands fail to launch.
    pub fn new() -> Self {
        RecordingRunner::default()
    }

    /// A runner where every unexpected command succeeds silently.
    pub fn succeeding() -> Self {
        let runner = RecordingRunner::new();
        runner.set_default(MockProcessOutput::success(""));
        runner
    }

    fn push(&self, pattern: CommandPattern, response: Response) -> &Self {
        self.state
            .lock()
            .unwrap()
            .expectations
            .push((pattern, response));
        self
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::Exact(cmd.to_string()), Response::Output(output))
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&self, prefix: &str, output: MockProcessOutput) -> &Self {
        self.push(
            CommandPattern::StartsWith(prefix.to_string()),
            Response::Output(output),
        )
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&self, substring: &str, output: MockProcessOutput) -> &Self {
        self.push(
            CommandPattern::Contains(substring.to_string()),
            Response::Output(output),
        )
    }

    /// Make commands containing `substring` fail to launch.
    pub fn fail_launch_contains(&self, substring: &str) -> &Self {
        self.push(
            CommandPattern::Contains(substring.to_string()),
            Response::LaunchFailure,
        )
    }

    /// Run `effect` whenever a command containing `substring` is executed.
    pub fn on_command(
        &self,
        substring: &str,
        effect: impl Fn(&ProcessBuilder) + Send + 'static,
    ) -> &Self {
        self.state.lock().unwrap().effects.push((
            CommandPattern::Contains(substring.to_string()),
            Box::new(effect),
        ));
        self
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&self, output: MockProcessOutput) -> &Self {
        self.state.lock().unwrap().default_output = Some(output);
        self
    }

    /// Rendered command lines, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(ProcessBuilder::display_command)
            .collect()
    }

    /// Recorded commands, in call order.
    pub fn commands(&self) -> Vec<ProcessBuilder> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Index of the first recorded call containing `substring`.
    pub fn position(&self, substring: &str) -> Option<usize> {
        self.calls().iter().position(|c| c.contains(substring))
    }

    fn respond(&self, cmd: &ProcessBuilder) -> Result<ProcessResult, BuildError> {
        let line = cmd.display_command();
        let mut state = self.state.lock().unwrap();
        state.calls.push(cmd.clone());

        for (pattern, effect) in &state.effects {
            if pattern.matches(&line) {
                effect(cmd);
            }
        }

        let response = state
            .expectations
            .iter()
            .find(|(pattern, _)| pattern.matches(&line))
            .map(|(_, response)| match response {
                Response::Output(output) => Some(output.clone()),
                Response::LaunchFailure => None,
            })
            .unwrap_or_else(|| state.default_output.clone());

        match response {
            Some(output) => Ok(output.to_result()),
            None => Err(BuildError::BuildStepFailed {
                command: line,
                code: None,
                reason: Some("could not launch: mock has no such program".to_string()),
            }),
        }
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<(), BuildError> {
        let result = self.respond(cmd)?;
        if !result.success() {
            return Err(BuildError::BuildStepFailed {
                command: cmd.display_command(),
                code: result.code,
                reason: None,
            });
        }
        Ok(())
    }

    fn capture(&self, cmd: &ProcessBuilder) -> Result<ProcessResult, BuildError> {
        self.respond(cmd)
    }
}

/// Fake [`ArtifactFetcher`] serving archives from memory.
#[derive(Debug, Default)]
pub struct MockFetcher {
    archives: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        MockFetcher::default()
    }

    /// Serve `body` for `url`.
    pub fn serve(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.archives.insert(url.into(), body.into());
        self
    }

    /// Serve a generated source tarball for every dependency in `deps`,
    /// under each one's real URL.
    pub fn serving_sources(deps: &[&crate::core::dependency::DependencySpec]) -> Self {
        deps.iter().fold(MockFetcher::new(), |fetcher, dep| {
            fetcher.serve(dep.url(), source_tarball(&dep.source_dir()))
        })
    }

    /// URLs requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl ArtifactFetcher for MockFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), BuildError> {
        self.requests.lock().unwrap().push(url.to_string());
        let body = self.archives.get(url).ok_or_else(|| BuildError::FetchFailed {
            url: url.to_string(),
            reason: "HTTP 404 Not Found".to_string(),
        })?;
        std::fs::write(dest, body).map_err(|e| BuildError::FetchFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Write an empty file at `path`, creating parents.
pub fn touch(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"").unwrap();
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_records_and_scripts() {
        let runner = RecordingRunner::new();
        runner.expect("make -j4", MockProcessOutput::success("done"));
        runner.expect_prefix("make install", MockProcessOutput::failure(2, "boom"));

        runner.run(&ProcessBuilder::new("make").arg("-j4")).unwrap();
        let err = runner
            .run(&ProcessBuilder::new("make").arg("install"))
            .unwrap_err();
        assert!(err.to_string().contains("exit code 2"));

        assert!(runner.run(&ProcessBuilder::new("cmake")).is_err());
        assert_eq!(runner.calls(), ["make -j4", "make install", "cmake"]);
    }

    #[test]
    fn test_side_effects_run() {
        let tmp = tempfile::tempdir().unwrap();
        let marker = tmp.path().join("installed");
        let runner = RecordingRunner::succeeding();
        let target = marker.clone();
        runner.on_command("install", move |_| {
            touch(&target);
        });

        runner.run(&ProcessBuilder::new("make").arg("install")).unwrap();
        assert!(marker.exists());
    }

    #[test]
    fn test_fetcher_serves_known_urls_only() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = MockFetcher::new().serve("https://example.com/a.tar.gz", b"abc".to_vec());

        fetcher
            .fetch("https://example.com/a.tar.gz", &tmp.path().join("a"))
            .unwrap();
        assert!(fetcher
            .fetch("https://example.com/b.tar.gz", &tmp.path().join("b"))
            .is_err());
        assert_eq!(fetcher.requests().len(), 2);
    }
}
