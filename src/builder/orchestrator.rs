//! Sequencing of the dependency builds.
//!
//! [`BuildOrchestrator::run`] resolves prerequisites, acquires one
//! [`Workspace`], builds every dependency in order inside it, and releases
//! the workspace whether or not the builds succeeded. The first failure ends
//! the run; artifacts already installed by earlier dependencies stay under
//! the prefix.

use std::path::PathBuf;

use super::openssl_dir;
use super::{DependencyBuilder, DependencyOutcome};
use crate::core::config::BuildConfig;
use crate::core::dependency::{self, DependencySpec};
use crate::core::errors::BuildError;
use crate::core::workspace::Workspace;
use crate::sources::fetch::ArtifactFetcher;
use crate::util::fs::find_shared_libraries;
use crate::util::process::ProcessRunner;

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub prefix: PathBuf,
    /// Certificate store OpenSSL was configured with, if any
    pub cert_dir: Option<PathBuf>,
    /// One entry per dependency, in build order
    pub dependencies: Vec<DependencyOutcome>,
    /// Shared libraries present under `<prefix>/lib` afterwards
    pub shared_libraries: Vec<PathBuf>,
}

/// Builds all dependencies, in order, inside one workspace.
pub struct BuildOrchestrator<'a> {
    runner: &'a dyn ProcessRunner,
    fetcher: &'a dyn ArtifactFetcher,
    dependencies: Vec<DependencySpec>,
}

impl<'a> BuildOrchestrator<'a> {
    /// An orchestrator for the standard OpenSSL + libyaml pair.
    pub fn new(runner: &'a dyn ProcessRunner, fetcher: &'a dyn ArtifactFetcher) -> Self {
        BuildOrchestrator {
            runner,
            fetcher,
            dependencies: dependency::all().into_iter().cloned().collect(),
        }
    }

    /// Replace the dependency list.
    pub fn with_dependencies(mut self, dependencies: Vec<DependencySpec>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn dependencies(&self) -> &[DependencySpec] {
        &self.dependencies
    }

    /// Build every dependency into `config.prefix()`.
    pub fn run(&self, config: &BuildConfig) -> Result<BuildReport, BuildError> {
        let cert_dir = self.resolve_cert_dir(config)?;

        let workspace = match config.workspace_root() {
            Some(root) => Workspace::acquire_in(root)?,
            None => Workspace::acquire()?,
        };
        tracing::info!("==> cd {}", workspace.path().display());

        let result = self.build_all(config, &workspace, cert_dir.as_deref());

        if let Err(e) = workspace.release() {
            tracing::warn!("{}", e);
        }

        let dependencies = result?;
        Ok(BuildReport {
            prefix: config.prefix().to_path_buf(),
            cert_dir,
            dependencies,
            shared_libraries: find_shared_libraries(&config.lib_dir()),
        })
    }

    fn build_all(
        &self,
        config: &BuildConfig,
        workspace: &Workspace,
        cert_dir: Option<&std::path::Path>,
    ) -> Result<Vec<DependencyOutcome>, BuildError> {
        let mut outcomes = Vec::with_capacity(self.dependencies.len());
        for spec in &self.dependencies {
            let mut builder = DependencyBuilder::new(spec, config, self.runner, self.fetcher);
            if let Some(dir) = cert_dir {
                builder = builder.with_cert_dir(dir);
            }
            outcomes.push(builder.run(workspace)?);
        }
        Ok(outcomes)
    }

    /// The certificate store, if any dependency needs one. Resolved before
    /// the workspace exists so a missing host tool fails without side
    /// effects.
    fn resolve_cert_dir(&self, config: &BuildConfig) -> Result<Option<PathBuf>, BuildError> {
        if !self.dependencies.iter().any(|d| d.needs_cert_dir) {
            return Ok(None);
        }
        match config.openssl_dir() {
            Some(dir) => {
                tracing::info!("using certificate store {}", dir.display());
                Ok(Some(dir.to_path_buf()))
            }
            None => openssl_dir::discover(self.runner).map(Some),
        }
    }
}
