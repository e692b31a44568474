//! High-level operations.
//!
//! This module contains the implementation of the non-build commands.

pub mod cli_verify;

pub use cli_verify::{
    format_report, format_report_json, CliReport, CliVerifier, OutputFormat, RuntimeInfo,
};
