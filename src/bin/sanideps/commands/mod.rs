//! Command implementations

pub mod build;
