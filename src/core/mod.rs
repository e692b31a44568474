//! Core data structures for sanideps.
//!
//! This module contains the foundational types used throughout the crate:
//! - Pinned dependency specifications and build stages
//! - Validated build configuration
//! - The scratch workspace
//! - The error taxonomy

pub mod config;
pub mod dependency;
pub mod errors;
pub mod platform;
pub mod workspace;

pub use config::{BuildConfig, BuildOptions};
pub use dependency::{DependencySpec, Stage, LIBYAML, OPENSSL};
pub use errors::{BuildError, ErrorKind};
pub use platform::Platform;
pub use workspace::Workspace;
