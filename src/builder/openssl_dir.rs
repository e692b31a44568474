//! Discovery of the host OpenSSL certificate store.
//!
//! The sanitized OpenSSL must trust the same roots as the distribution's
//! build, so its `--openssldir` is taken from `openssl version -d` on the
//! host. The host tool is a hard prerequisite unless the caller passes the
//! directory explicitly.

use std::path::PathBuf;

use regex::Regex;

use crate::core::errors::BuildError;
use crate::util::process::{find_executable, ProcessBuilder, ProcessRunner};
use crate::util::shell::split_words;

/// Host command queried for the certificate store.
pub const HOST_OPENSSL: &str = "openssl";

/// The `openssl version -d` invocation.
pub fn query_command() -> ProcessBuilder {
    let program = find_executable(HOST_OPENSSL).unwrap_or_else(|| PathBuf::from(HOST_OPENSSL));
    ProcessBuilder::new(program).args(["version", "-d"])
}

/// Ask the host `openssl` for its configured `OPENSSLDIR`.
pub fn discover(runner: &dyn ProcessRunner) -> Result<PathBuf, BuildError> {
    let cmd = query_command();
    let result = runner.capture(&cmd).map_err(|e| {
        BuildError::Prerequisite(format!(
            "cannot query the host certificate store ({})",
            e.root()
        ))
    })?;

    if !result.success() {
        return Err(BuildError::Prerequisite(format!(
            "`{}` exited with {:?}: {}",
            cmd.display_command(),
            result.code,
            result.stderr.trim()
        )));
    }

    let dir = parse_openssl_dir(&result.stdout)?;
    tracing::info!("using host certificate store {}", dir.display());
    Ok(dir)
}

/// Extract the directory from output like `OPENSSLDIR: "/usr/lib/ssl"`.
pub fn parse_openssl_dir(output: &str) -> Result<PathBuf, BuildError> {
    let unparsable = || {
        BuildError::Prerequisite(format!(
            "unrecognised `openssl version -d` output: {:?}",
            output.trim()
        ))
    };

    let re = Regex::new(r"(?m)^\s*OPENSSLDIR:(.*)$").map_err(|_| unparsable())?;
    let raw = re
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .ok_or_else(unparsable)?;

    let dir = split_words(raw)
        .ok()
        .and_then(|words| words.into_iter().next())
        .filter(|dir| !dir.is_empty())
        .ok_or_else(unparsable)?;

    Ok(PathBuf::from(dir))
}
