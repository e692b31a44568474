//! Build configuration.
//!
//! [`BuildOptions`] is the raw, mergeable input collected from the command
//! line and the config file. It is validated exactly once into a
//! [`BuildConfig`], which is immutable and passed by reference into the
//! orchestrator and each dependency builder.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::BuildError;
use crate::util::shell::split_words;

/// Unvalidated build options. Every field is optional so that sources can be
/// layered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildOptions {
    /// Installation prefix (required by the time options are validated)
    pub prefix: Option<PathBuf>,

    /// C compiler passed to configure as `CC=`
    pub cc: Option<String>,

    /// Compile flags passed to configure as `CFLAGS=`
    pub cflags: Option<String>,

    /// Link flags passed to configure as `LDFLAGS=`
    pub ldflags: Option<String>,

    /// Extra `make` arguments, shell-quoted (e.g. `-j8 V=1`)
    pub makeopts: Option<String>,

    /// Certificate store directory for OpenSSL, skipping the host query
    pub openssl_dir: Option<PathBuf>,

    /// Parent directory for the ephemeral build workspace
    pub workspace_root: Option<PathBuf>,
}

impl BuildOptions {
    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merge(&mut self, other: BuildOptions) {
        if other.prefix.is_some() {
            self.prefix = other.prefix;
        }
        if other.cc.is_some() {
            self.cc = other.cc;
        }
        if other.cflags.is_some() {
            self.cflags = other.cflags;
        }
        if other.ldflags.is_some() {
            self.ldflags = other.ldflags;
        }
        if other.makeopts.is_some() {
            self.makeopts = other.makeopts;
        }
        if other.openssl_dir.is_some() {
            self.openssl_dir = other.openssl_dir;
        }
        if other.workspace_root.is_some() {
            self.workspace_root = other.workspace_root;
        }
    }
}

/// Validated, immutable build configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    prefix: PathBuf,
    cc: Option<String>,
    cflags: Option<String>,
    ldflags: Option<String>,
    make_args: Vec<String>,
    openssl_dir: Option<PathBuf>,
    workspace_root: Option<PathBuf>,
}

impl BuildConfig {
    /// Shorthand for a configuration with only a prefix.
    pub fn new(prefix: impl Into<PathBuf>) -> Result<Self, BuildError> {
        BuildConfig::try_from(BuildOptions {
            prefix: Some(prefix.into()),
            ..BuildOptions::default()
        })
    }

    /// Installation prefix (always absolute).
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// `<prefix>/lib`
    pub fn lib_dir(&self) -> PathBuf {
        self.prefix.join("lib")
    }

    /// `<prefix>/include`
    pub fn include_dir(&self) -> PathBuf {
        self.prefix.join("include")
    }

    pub fn cc(&self) -> Option<&str> {
        self.cc.as_deref()
    }

    /// Extra arguments for every `make` compile step.
    pub fn make_args(&self) -> &[String] {
        &self.make_args
    }

    /// Certificate store override, if any.
    pub fn openssl_dir(&self) -> Option<&Path> {
        self.openssl_dir.as_deref()
    }

    /// Where the workspace is created; `None` means the system temp dir.
    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }

    /// Toolchain overrides in the `VAR=value` form both configure scripts
    /// accept.
    pub fn toolchain_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(cc) = &self.cc {
            args.push(format!("CC={}", cc));
        }
        if let Some(cflags) = &self.cflags {
            args.push(format!("CFLAGS={}", cflags));
        }
        if let Some(ldflags) = &self.ldflags {
            args.push(format!("LDFLAGS={}", ldflags));
        }
        args
    }
}

impl TryFrom<BuildOptions> for BuildConfig {
    type Error = BuildError;

    fn try_from(options: BuildOptions) -> Result<Self, Self::Error> {
        let prefix = options
            .prefix
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| BuildError::Configuration("--prefix must be specified".to_string()))?;

        let prefix = if prefix.is_absolute() {
            prefix
        } else {
            std::env::current_dir()
                .map_err(|e| {
                    BuildError::Configuration(format!(
                        "cannot resolve relative prefix {}: {}",
                        prefix.display(),
                        e
                    ))
                })?
                .join(prefix)
        };

        let make_args = match options.makeopts.as_deref() {
            Some(opts) => split_words(opts)
                .map_err(|e| BuildError::Configuration(format!("invalid --makeopts: {}", e)))?,
            None => Vec::new(),
        };

        Ok(BuildConfig {
            prefix,
            cc: options.cc,
            cflags: options.cflags,
            ldflags: options.ldflags,
            make_args,
            openssl_dir: options.openssl_dir,
            workspace_root: options.workspace_root,
        })
    }
}
