//! Public types for the CLI verifier.

use std::path::PathBuf;

use serde::Serialize;

/// Output format for verification results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable table (default)
    #[default]
    Human,
    /// Machine-readable JSON output
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = OutputFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            _ => Err(OutputFormatParseError(s.to_string())),
        }
    }
}

/// Error parsing output format option.
#[derive(Debug, Clone)]
pub struct OutputFormatParseError(pub String);

impl std::fmt::Display for OutputFormatParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid output format '{}', valid values: human, json",
            self.0
        )
    }
}

impl std::error::Error for OutputFormatParseError {}

/// One tool to check: how to invoke it and what its output must look like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliCheck {
    /// Command line, tool name first (e.g. `rake -V`)
    pub invocation: String,
    /// Regex the tool's output must match; group 1 is the version
    pub pattern: String,
}

impl CliCheck {
    pub fn new(invocation: impl Into<String>, pattern: impl Into<String>) -> Self {
        CliCheck {
            invocation: invocation.into(),
            pattern: pattern.into(),
        }
    }

    /// The tool name: the first word of the invocation.
    pub fn tool(&self) -> &str {
        self.invocation.split_whitespace().next().unwrap_or("")
    }

    /// Arguments after the tool name.
    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.invocation.split_whitespace().skip(1)
    }
}

/// Outcome of one tool check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "kebab-case")]
pub enum CheckStatus {
    Ok,
    VersionMismatch,
    MissingBinary,
    MissingPlatformLauncher,
    ExecutionError(String),
}

impl CheckStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }
}

/// Per-tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CliCheckResult {
    pub tool: String,
    #[serde(flatten)]
    pub status: CheckStatus,
    /// Version captured by the pattern, when the check passed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl CliCheckResult {
    pub fn new(tool: impl Into<String>, status: CheckStatus) -> Self {
        CliCheckResult {
            tool: tool.into(),
            status,
            version: None,
        }
    }

    pub fn ok(tool: impl Into<String>, version: Option<String>) -> Self {
        CliCheckResult {
            tool: tool.into(),
            status: CheckStatus::Ok,
            version,
        }
    }
}

/// Comparison of the runtime's `-v` output against its self-description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptionCheck {
    /// The command that was run (e.g. `ruby -v`)
    pub command: String,
    /// What the command printed, trimmed; `None` if it could not run
    pub reported: Option<String>,
    /// The description the runtime was built with
    pub expected: String,
}

impl DescriptionCheck {
    pub fn matches(&self) -> bool {
        self.reported.as_deref() == Some(self.expected.as_str())
    }
}

/// The runtime whose tools are being checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    /// Runtime executable name (e.g. `ruby`)
    pub program: String,
    /// Directory the runtime installed its binaries into
    pub bin_dir: PathBuf,
    /// The runtime's compiled-in description string
    pub description: String,
}

/// Aggregated result of a verifier run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CliReport {
    pub checks: Vec<CliCheckResult>,
    pub description: DescriptionCheck,
}

impl CliReport {
    /// Number of failed checks, the description check included.
    pub fn error_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.status.is_ok()).count()
            + usize::from(!self.description.matches())
    }

    pub fn passed(&self) -> bool {
        self.error_count() == 0
    }
}
