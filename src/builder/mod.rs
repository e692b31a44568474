//! Per-dependency build driver.
//!
//! A [`DependencyBuilder`] walks one dependency through
//! `fetched → extracted → configured → compiled → installed → cleaned`.
//! Every transition either succeeds or aborts the whole build; there is no
//! retry and no way back to an earlier state.

pub mod openssl_dir;
pub mod orchestrator;

use std::path::{Path, PathBuf};

use crate::core::config::BuildConfig;
use crate::core::dependency::{DependencySpec, Stage};
use crate::core::errors::BuildError;
use crate::core::workspace::Workspace;
use crate::sources::fetch::ArtifactFetcher;
use crate::util::fs::remove_glob;
use crate::util::hash::sha256_file;
use crate::util::process::{ProcessBuilder, ProcessRunner};

pub use orchestrator::{BuildOrchestrator, BuildReport};

/// What a finished dependency build left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyOutcome {
    pub name: &'static str,
    pub version: &'static str,
    /// Files deleted by post-install cleanup
    pub removed: Vec<PathBuf>,
}

/// Drives configure → compile → install for a single dependency.
pub struct DependencyBuilder<'a> {
    spec: &'a DependencySpec,
    config: &'a BuildConfig,
    runner: &'a dyn ProcessRunner,
    fetcher: &'a dyn ArtifactFetcher,
    cert_dir: Option<&'a Path>,
    stage: Stage,
}

impl<'a> DependencyBuilder<'a> {
    pub fn new(
        spec: &'a DependencySpec,
        config: &'a BuildConfig,
        runner: &'a dyn ProcessRunner,
        fetcher: &'a dyn ArtifactFetcher,
    ) -> Self {
        DependencyBuilder {
            spec,
            config,
            runner,
            fetcher,
            cert_dir: None,
            stage: Stage::Pending,
        }
    }

    /// Certificate store passed as `--openssldir`, for specs that need one.
    pub fn with_cert_dir(mut self, dir: &'a Path) -> Self {
        self.cert_dir = Some(dir);
        self
    }

    /// The last state reached.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Run every step inside `workspace`.
    pub fn run(&mut self, workspace: &Workspace) -> Result<DependencyOutcome, BuildError> {
        tracing::info!("building {}", self.spec);

        let archive = workspace.join(self.spec.archive_name());
        let source_dir = workspace.join(self.spec.source_dir());

        let fetched = self.fetch(&archive);
        self.transition(Stage::Fetched, fetched)?;

        let extracted = self.extract(&archive, workspace.path(), &source_dir);
        self.transition(Stage::Extracted, extracted)?;

        tracing::info!("==> cd {}", source_dir.display());

        let configured = self
            .configure_command(&source_dir)
            .and_then(|cmd| self.runner.run(&cmd));
        self.transition(Stage::Configured, configured)?;

        let compiled = self.runner.run(&self.compile_command(&source_dir));
        self.transition(Stage::Compiled, compiled)?;

        let installed = self
            .install_commands(&source_dir)
            .iter()
            .try_for_each(|cmd| self.runner.run(cmd));
        self.transition(Stage::Installed, installed)?;

        let removed = self.clean();
        self.transition(Stage::Cleaned, Ok(()))?;

        tracing::info!("installed {} into {}", self.spec, self.config.prefix().display());
        Ok(DependencyOutcome {
            name: self.spec.name,
            version: self.spec.version,
            removed,
        })
    }

    fn transition(&mut self, to: Stage, result: Result<(), BuildError>) -> Result<(), BuildError> {
        debug_assert_eq!(self.stage.next(), Some(to), "out-of-order transition");
        match result {
            Ok(()) => {
                tracing::debug!("{}: {} done", self.spec.name, to);
                self.stage = to;
                Ok(())
            }
            Err(e) => Err(e.in_stage(self.spec.name, to)),
        }
    }

    fn fetch(&self, archive: &Path) -> Result<(), BuildError> {
        let url = self.spec.url();
        self.fetcher.fetch(&url, archive)?;

        if let Some(expected) = self.spec.sha256 {
            let actual = sha256_file(archive).map_err(|e| BuildError::FetchFailed {
                url: url.clone(),
                reason: format!("cannot hash {}: {}", archive.display(), e),
            })?;
            if actual != expected {
                return Err(BuildError::FetchFailed {
                    url,
                    reason: format!(
                        "checksum mismatch\n  expected: {}\n  actual:   {}",
                        expected, actual
                    ),
                });
            }
            tracing::debug!("checksum verified: {}", &actual[..16]);
        }
        Ok(())
    }

    fn extract(&self, archive: &Path, into: &Path, source_dir: &Path) -> Result<(), BuildError> {
        self.fetcher.extract(archive, into)?;
        if !source_dir.is_dir() {
            return Err(BuildError::ExtractFailed {
                archive: archive.to_path_buf(),
                reason: format!("archive did not contain {}/", self.spec.source_dir()),
            });
        }
        Ok(())
    }

    /// The configure invocation, run from `source_dir`.
    pub fn configure_command(&self, source_dir: &Path) -> Result<ProcessBuilder, BuildError> {
        let mut cmd = ProcessBuilder::new(self.spec.configure_script)
            .cwd(source_dir)
            .arg(format!("--prefix={}", self.config.prefix().display()));

        if self.spec.needs_cert_dir {
            let cert_dir = self.cert_dir.ok_or_else(|| {
                BuildError::Prerequisite(format!(
                    "{} needs a certificate store directory",
                    self.spec.name
                ))
            })?;
            // --openssldir goes right after --libdir.
            let (libdir, rest) = self.spec.configure_args.split_at(
                self.spec
                    .configure_args
                    .iter()
                    .position(|a| a.starts_with("--libdir"))
                    .map_or(0, |i| i + 1),
            );
            cmd = cmd
                .args(libdir)
                .arg(format!("--openssldir={}", cert_dir.display()))
                .args(rest);
        } else {
            cmd = cmd.args(self.spec.configure_args);
        }

        Ok(cmd.args(self.config.toolchain_args()))
    }

    /// The compile invocation, run from `source_dir`.
    pub fn compile_command(&self, source_dir: &Path) -> ProcessBuilder {
        ProcessBuilder::new("make")
            .cwd(source_dir)
            .args(self.config.make_args())
    }

    /// The install invocations, run from `source_dir` in order.
    pub fn install_commands(&self, source_dir: &Path) -> Vec<ProcessBuilder> {
        self.spec
            .install_targets
            .iter()
            .map(|target| ProcessBuilder::new("make").cwd(source_dir).arg(target))
            .collect()
    }

    /// Remove post-install leftovers. Failures are logged, never fatal.
    fn clean(&self) -> Vec<PathBuf> {
        let mut removed = Vec::new();
        for pattern in self.spec.cleanup_globs {
            let removal = remove_glob(self.config.prefix(), pattern);
            for failure in &removal.failures {
                tracing::warn!("{}: {}", self.spec.name, failure);
            }
            removed.extend(removal.removed);
        }
        removed
    }
}
