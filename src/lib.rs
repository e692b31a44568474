//! sanideps - builds sanitizer-instrumented native dependencies from source
//!
//! This crate fetches, configures, compiles and installs OpenSSL and libyaml
//! into a caller-chosen prefix with caller-chosen compiler flags, and checks
//! a runtime install's command-line tools afterwards.

pub mod builder;
pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test utilities and mocks for sanideps unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides fake process execution and archive fetching.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildOrchestrator, BuildReport};
pub use crate::core::{BuildConfig, BuildError, DependencySpec, Workspace};
pub use ops::CliVerifier;
