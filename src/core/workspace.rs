//! Ephemeral build workspace.
//!
//! A [`Workspace`] owns one uniquely named temporary directory for the whole
//! orchestrator run. Every downloaded archive and extracted source tree lives
//! inside it. Commands are pointed at it explicitly through their working
//! directory; the process-wide current directory is never changed.
//!
//! [`Workspace::release`] deletes the directory and reports failures. If the
//! handle is dropped without being released (early return, panic), the
//! directory is still removed.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::errors::BuildError;
use crate::util::fs::ensure_dir;

const WORKSPACE_PREFIX: &str = "sanideps-";

/// A uniquely named temporary directory scoped to one build.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh workspace in the system temp directory.
    pub fn acquire() -> Result<Self, BuildError> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir()
            .map_err(BuildError::Workspace)?;
        tracing::debug!("created workspace {}", dir.path().display());
        Ok(Workspace { dir })
    }

    /// Create a fresh workspace under `root`, creating `root` if needed.
    pub fn acquire_in(root: &Path) -> Result<Self, BuildError> {
        ensure_dir(root).map_err(BuildError::Workspace)?;
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(root)
            .map_err(BuildError::Workspace)?;
        tracing::debug!("created workspace {}", dir.path().display());
        Ok(Workspace { dir })
    }

    /// Root of the workspace.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Resolve a path relative to the workspace.
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Recursively delete the workspace.
    pub fn release(self) -> Result<(), BuildError> {
        let path = self.dir.path().to_path_buf();
        tracing::debug!("removing workspace {}", path.display());
        self.dir.close().map_err(|e| BuildError::Cleanup {
            path,
            reason: e.to_string(),
        })
    }
}
