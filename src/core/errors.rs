//! Error taxonomy for the dependency build pipeline.
//!
//! Every step returns a [`BuildError`]; the orchestrator wraps step failures
//! in [`BuildError::Dependency`] so the terminal error names the dependency
//! and the step that failed.

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use super::dependency::Stage;

/// Error raised by any stage of the build pipeline.
#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error("configuration error: {0}")]
    #[diagnostic(
        code(sanideps::config),
        help("see `sanideps build --help`; options can also be set in the [build] table of the config file")
    )]
    Configuration(String),

    #[error("missing prerequisite: {0}")]
    #[diagnostic(
        code(sanideps::prerequisite),
        help("install the missing host tool, or pass --openssldir=<dir> to skip the `openssl` query")
    )]
    Prerequisite(String),

    #[error("failed to fetch {url}: {reason}")]
    #[diagnostic(
        code(sanideps::fetch),
        help("downloads are not retried and must match their pinned SHA-256")
    )]
    FetchFailed { url: String, reason: String },

    #[error("failed to extract {}: {reason}", archive.display())]
    #[diagnostic(code(sanideps::extract))]
    ExtractFailed { archive: PathBuf, reason: String },

    #[error("`{command}` failed: {}", describe_exit(*code, reason.as_deref()))]
    #[diagnostic(
        code(sanideps::step),
        help("the failing tool's own output, if any, is shown above")
    )]
    BuildStepFailed {
        command: String,
        code: Option<i32>,
        reason: Option<String>,
    },

    #[error("failed to remove {}: {reason}", path.display())]
    #[diagnostic(code(sanideps::cleanup), severity(Warning))]
    Cleanup { path: PathBuf, reason: String },

    #[error("failed to create build workspace: {0}")]
    #[diagnostic(code(sanideps::workspace))]
    Workspace(#[source] std::io::Error),

    #[error("{dependency}: {stage} step failed")]
    #[diagnostic(code(sanideps::dependency))]
    Dependency {
        dependency: &'static str,
        stage: Stage,
        #[source]
        source: Box<BuildError>,
    },
}

fn describe_exit(code: Option<i32>, reason: Option<&str>) -> String {
    match (code, reason) {
        (Some(code), _) => format!("exit code {}", code),
        (None, Some(reason)) => reason.to_string(),
        (None, None) => "terminated by signal".to_string(),
    }
}

/// Flat classification of a [`BuildError`], ignoring dependency wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Prerequisite,
    FetchFailed,
    ExtractFailed,
    BuildStepFailed,
    Cleanup,
    Workspace,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Configuration => "ConfigurationError",
            ErrorKind::Prerequisite => "PrerequisiteMissing",
            ErrorKind::FetchFailed => "FetchFailed",
            ErrorKind::ExtractFailed => "ExtractFailed",
            ErrorKind::BuildStepFailed => "BuildStepFailed",
            ErrorKind::Cleanup => "CleanupError",
            ErrorKind::Workspace => "WorkspaceError",
        };
        f.write_str(name)
    }
}

impl BuildError {
    /// Wrap this error with the dependency and stage it occurred in.
    pub fn in_stage(self, dependency: &'static str, stage: Stage) -> Self {
        BuildError::Dependency {
            dependency,
            stage,
            source: Box::new(self),
        }
    }

    /// The innermost error, with any dependency context stripped.
    pub fn root(&self) -> &BuildError {
        match self {
            BuildError::Dependency { source, .. } => source.root(),
            other => other,
        }
    }

    /// Classify the root cause.
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            BuildError::Configuration(_) => ErrorKind::Configuration,
            BuildError::Prerequisite(_) => ErrorKind::Prerequisite,
            BuildError::FetchFailed { .. } => ErrorKind::FetchFailed,
            BuildError::ExtractFailed { .. } => ErrorKind::ExtractFailed,
            BuildError::BuildStepFailed { .. } => ErrorKind::BuildStepFailed,
            BuildError::Cleanup { .. } => ErrorKind::Cleanup,
            BuildError::Workspace(_) => ErrorKind::Workspace,
            BuildError::Dependency { .. } => unreachable!("root() strips dependency context"),
        }
    }

    /// The dependency and stage this error was raised in, if known.
    pub fn failed_step(&self) -> Option<(&'static str, Stage)> {
        match self {
            BuildError::Dependency {
                dependency, stage, ..
            } => Some((dependency, *stage)),
            _ => None,
        }
    }

    /// Whether this error aborts the pipeline.
    pub fn is_fatal(&self) -> bool {
        self.kind() != ErrorKind::Cleanup
    }

    /// The diagnostic help line of the root cause, if it has one.
    pub fn help_text(&self) -> Option<String> {
        self.root().help().map(|help| help.to_string())
    }
}
