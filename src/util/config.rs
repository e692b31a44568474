//! Configuration file support.
//!
//! An optional TOML file supplies defaults for both commands:
//!
//! ```toml
//! [build]
//! prefix = "/opt/sanitized"
//! cc = "clang"
//! cflags = "-fsanitize=memory -fsanitize-memory-track-origins -O1"
//! ldflags = "-fsanitize=memory"
//! makeopts = "-j8"
//!
//! [cli-test]
//! runtime = "ruby"
//! ```
//!
//! The file is read from `--config` when given, otherwise from
//! `~/.sanideps/config.toml` if it exists. Command-line values override it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::config::BuildOptions;

/// Contents of a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Defaults for `sanideps build`
    pub build: BuildOptions,

    /// Defaults for `sanideps cli-test`
    #[serde(rename = "cli-test")]
    pub cli_test: CliTestConfig,
}

/// Defaults for the CLI verifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliTestConfig {
    /// Runtime executable name (e.g. `ruby`)
    pub runtime: Option<String>,

    /// Runtime binary directory
    pub bindir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }
}

/// Get the global config directory (~/.sanideps).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".sanideps"))
}

/// Get the global config path (~/.sanideps/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Load the effective configuration file.
///
/// An explicit path must exist and parse; the global file is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::load(path);
    }

    match global_config_path() {
        Some(path) if path.is_file() => {
            tracing::debug!("loading config from {}", path.display());
            Config::load(&path)
        }
        _ => Ok(Config::default()),
    }
}
