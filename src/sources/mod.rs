//! Fetching and unpacking dependency sources.

pub mod archive;
pub mod fetch;

pub use archive::extract_tarball;
pub use fetch::{ArtifactFetcher, HttpFetcher};
