//! Post-install verification of a runtime's command-line tools.
//!
//! Every tool in the check list must exist in the runtime's binary
//! directory, have a script launcher where the platform needs one, run, and
//! print a version matching its pattern. The runtime's own `-v` output must
//! equal its compiled-in description. Every check runs; failures are only
//! tallied.

pub mod checks;
pub mod format;
pub mod types;

use regex::Regex;

use crate::core::errors::BuildError;
use crate::core::platform::Platform;
use crate::util::process::{find_executable, ProcessBuilder, ProcessRunner};

pub use checks::{default_checks, VERSION_RE};
pub use format::{format_check, format_report, format_report_json};
pub use types::{
    CheckStatus, CliCheck, CliCheckResult, CliReport, DescriptionCheck, OutputFormat, RuntimeInfo,
};

/// Ruby snippet printing the binary directory and description, one per line.
const PROBE_SCRIPT: &str = "puts RbConfig::CONFIG['bindir'], RUBY_DESCRIPTION";

impl RuntimeInfo {
    /// Ask the runtime `program` (looked up on PATH) where its binaries live
    /// and how it describes itself.
    pub fn probe(runner: &dyn ProcessRunner, program: &str) -> Result<Self, BuildError> {
        let path = find_executable(program).ok_or_else(|| {
            BuildError::Prerequisite(format!("`{}` was not found on PATH", program))
        })?;

        let cmd = ProcessBuilder::new(&path).args(["-e", PROBE_SCRIPT]);
        let result = runner.capture(&cmd)?;
        if !result.success() {
            return Err(BuildError::BuildStepFailed {
                command: cmd.display_command(),
                code: result.code,
                reason: None,
            });
        }

        let mut lines = result.stdout.lines().map(str::trim);
        match (lines.next(), lines.next()) {
            (Some(bin_dir), Some(description)) if !bin_dir.is_empty() => Ok(RuntimeInfo {
                program: program.to_string(),
                bin_dir: bin_dir.into(),
                description: description.to_string(),
            }),
            _ => Err(BuildError::Prerequisite(format!(
                "could not read bindir and description from `{}`",
                cmd.display_command()
            ))),
        }
    }
}

/// Runs the check list against one runtime install.
pub struct CliVerifier<'a> {
    runtime: RuntimeInfo,
    platform: Platform,
    runner: &'a dyn ProcessRunner,
    checks: Vec<CliCheck>,
}

impl<'a> CliVerifier<'a> {
    pub fn new(runtime: RuntimeInfo, runner: &'a dyn ProcessRunner) -> Self {
        CliVerifier {
            runtime,
            platform: Platform::current(),
            runner,
            checks: default_checks(),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_checks(mut self, checks: Vec<CliCheck>) -> Self {
        self.checks = checks;
        self
    }

    pub fn checks(&self) -> &[CliCheck] {
        &self.checks
    }

    /// Run every check, then the description check.
    pub fn run(&self) -> CliReport {
        let checks = self
            .checks
            .iter()
            .map(|check| {
                let result = self.verify_tool(check);
                tracing::debug!(tool = %result.tool, status = ?result.status, "checked");
                result
            })
            .collect();

        CliReport {
            checks,
            description: self.verify_description(),
        }
    }

    /// Check one tool. Only the runtime's own binary directory is searched.
    pub fn verify_tool(&self, check: &CliCheck) -> CliCheckResult {
        let tool = check.tool();
        let tool_path = self.runtime.bin_dir.join(tool);
        if !tool_path.is_file() {
            return CliCheckResult::new(tool, CheckStatus::MissingBinary);
        }

        let Some(launcher) = self.platform.find_launcher(&tool_path) else {
            return CliCheckResult::new(tool, CheckStatus::MissingPlatformLauncher);
        };

        let pattern = match Regex::new(&check.pattern) {
            Ok(re) => re,
            Err(e) => {
                return CliCheckResult::new(
                    tool,
                    CheckStatus::ExecutionError(format!("bad pattern: {}", e)),
                )
            }
        };

        let cmd = ProcessBuilder::new(&launcher).args(check.args());
        let output = match self.runner.capture(&cmd) {
            Ok(output) => output,
            Err(e) => return CliCheckResult::new(tool, CheckStatus::ExecutionError(e.to_string())),
        };

        match pattern.captures(output.primary_output()) {
            Some(caps) => CliCheckResult::ok(tool, caps.get(1).map(|m| m.as_str().to_string())),
            None => CliCheckResult::new(tool, CheckStatus::VersionMismatch),
        }
    }

    /// Compare `<runtime> -v` against the compiled-in description.
    pub fn verify_description(&self) -> DescriptionCheck {
        let program = self
            .runtime
            .bin_dir
            .join(self.platform.executable_name(&self.runtime.program));
        let command = format!("{} -v", self.runtime.program);

        let reported = self
            .runner
            .capture(&ProcessBuilder::new(&program).arg("-v"))
            .map(|output| output.stdout.trim().to_string())
            .map_err(|e| tracing::warn!("{}", e))
            .ok();

        DescriptionCheck {
            command,
            reported,
            expected: self.runtime.description.clone(),
        }
    }
}
