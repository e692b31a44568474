//! Shared utilities

pub mod config;
pub mod fs;
pub mod hash;
pub mod process;
pub mod shell;

pub use config::Config;
pub use process::{ProcessBuilder, ProcessRunner, SystemRunner};
