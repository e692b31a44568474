//! Subprocess execution.
//!
//! Commands are plain [`ProcessBuilder`] values so the step sequence of a
//! build can be inspected without spawning anything; a [`ProcessRunner`]
//! decides how they are actually executed.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::core::errors::BuildError;

/// A typed command line: program, arguments, environment and working
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    pub fn get_program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.envs(&self.env);
        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }

    /// Display the command for logs and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().map(|arg| quote_for_display(arg)));
        parts.join(" ")
    }

    fn launch_error(&self, err: std::io::Error) -> BuildError {
        BuildError::BuildStepFailed {
            command: self.display_command(),
            code: None,
            reason: Some(format!("could not launch: {}", err)),
        }
    }
}

fn quote_for_display(arg: &str) -> String {
    let needs_quotes = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '\\' | '$' | '`'));
    if needs_quotes {
        format!("'{}'", arg.replace('\'', r"'\''"))
    } else {
        arg.to_string()
    }
}

/// Outcome of a captured command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    /// Exit code, `None` if terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Trimmed stdout, falling back to trimmed stderr when stdout is empty.
    pub fn primary_output(&self) -> &str {
        let stdout = self.stdout.trim();
        if stdout.is_empty() {
            self.stderr.trim()
        } else {
            stdout
        }
    }
}

/// Executes commands on behalf of the pipeline.
pub trait ProcessRunner {
    /// Run to completion with output streamed to the console. Fails with
    /// `BuildStepFailed` on launch failure or any non-zero exit.
    fn run(&self, cmd: &ProcessBuilder) -> Result<(), BuildError>;

    /// Run to completion and capture output. Only a launch failure is an
    /// error; the exit status is returned to the caller.
    fn capture(&self, cmd: &ProcessBuilder) -> Result<ProcessResult, BuildError>;
}

/// Runs commands as real child processes of this one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<(), BuildError> {
        tracing::info!("==> {}", cmd.display_command());

        let status = cmd
            .build_command()
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| cmd.launch_error(e))?;

        if !status.success() {
            return Err(BuildError::BuildStepFailed {
                command: cmd.display_command(),
                code: status.code(),
                reason: None,
            });
        }
        Ok(())
    }

    fn capture(&self, cmd: &ProcessBuilder) -> Result<ProcessResult, BuildError> {
        tracing::debug!("running `{}`", cmd.display_command());

        let output = cmd
            .build_command()
            .stdin(Stdio::null())
            .output()
            .map_err(|e| cmd.launch_error(e))?;

        Ok(ProcessResult {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ErrorKind;

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("./Configure").args([
            "--prefix=/opt/sanitized",
            "shared",
            "CFLAGS=-O1 -fsanitize=memory",
        ]);

        assert_eq!(
            pb.display_command(),
            "./Configure --prefix=/opt/sanitized shared 'CFLAGS=-O1 -fsanitize=memory'"
        );
    }

    #[test]
    fn test_builder_is_inspectable() {
        let pb = ProcessBuilder::new("make")
            .arg("install")
            .env("DESTDIR", "/tmp/stage")
            .cwd("/tmp/yaml-0.2.5");

        assert_eq!(pb.get_program(), Path::new("make"));
        assert_eq!(pb.get_args(), ["install"]);
        assert_eq!(pb.get_env().get("DESTDIR").map(String::as_str), Some("/tmp/stage"));
        assert_eq!(pb.get_cwd(), Some(Path::new("/tmp/yaml-0.2.5")));
    }

    #[test]
    fn test_primary_output_falls_back_to_stderr() {
        let result = ProcessResult {
            code: Some(0),
            stdout: "  \n".to_string(),
            stderr: "rdbg 1.9.2\n".to_string(),
        };
        assert_eq!(result.primary_output(), "rdbg 1.9.2");
        assert!(result.success());
    }

    #[test]
    fn test_missing_program_is_step_failure() {
        let err = SystemRunner
            .run(&ProcessBuilder::new("sanideps-definitely-not-a-program"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BuildStepFailed);
        assert!(err.to_string().contains("could not launch"));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_step_failure() {
        let err = SystemRunner
            .run(&ProcessBuilder::new("sh").args(["-c", "exit 3"]))
            .unwrap_err();
        match err {
            BuildError::BuildStepFailed { code, command, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(command, "sh -c 'exit 3'");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_capture() {
        let result = SystemRunner
            .capture(&ProcessBuilder::new("echo").arg("hello"))
            .unwrap();
        assert!(result.success());
        assert_eq!(result.stdout.trim(), "hello");
    }
}
