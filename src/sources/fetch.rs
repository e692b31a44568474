//! Downloading source archives.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use url::Url;

use super::archive::extract_tarball;
use crate::core::errors::BuildError;

/// Fetches and unpacks dependency sources.
pub trait ArtifactFetcher {
    /// Download `url` to `dest`. Any transport error or non-2xx response is a
    /// `FetchFailed`; nothing is retried.
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), BuildError>;

    /// Extract a downloaded archive into `dir`.
    fn extract(&self, archive: &Path, dir: &Path) -> Result<(), BuildError> {
        extract_tarball(archive, dir)
    }
}

/// Downloads over HTTP(S) with a fresh client per request.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    show_progress: bool,
}

impl HttpFetcher {
    pub fn new() -> Self {
        HttpFetcher {
            show_progress: true,
        }
    }

    /// Disable the download progress bar.
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    fn progress_bar(&self, len: Option<u64>) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        match len {
            Some(len) => {
                let pb = ProgressBar::new(len);
                pb.set_style(
                    ProgressStyle::with_template(
                        "  {msg} [{bar:30}] {bytes}/{total_bytes} ({bytes_per_sec})",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
                );
                pb
            }
            None => ProgressBar::new_spinner(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        HttpFetcher::new()
    }
}

impl ArtifactFetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), BuildError> {
        let fail = |reason: String| BuildError::FetchFailed {
            url: url.to_string(),
            reason,
        };

        let parsed = Url::parse(url).map_err(|e| fail(format!("invalid URL: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(fail(format!("unsupported scheme `{}`", parsed.scheme())));
        }

        tracing::info!("==> GET {}", parsed);

        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("sanideps/", env!("CARGO_PKG_VERSION")))
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(|e| fail(e.to_string()))?;

        let response = client
            .get(parsed)
            .header(reqwest::header::CONNECTION, "close")
            .send()
            .map_err(|e| fail(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fail(format!("HTTP {}", response.status())));
        }

        let pb = self.progress_bar(response.content_length());
        if let Some(name) = dest.file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }

        let file = File::create(dest)
            .map_err(|e| fail(format!("failed to create {}: {}", dest.display(), e)))?;
        let mut writer = BufWriter::new(file);
        let mut reader = pb.wrap_read(response);

        let written = std::io::copy(&mut reader, &mut writer)
            .map_err(|e| fail(format!("download interrupted: {}", e)))?;
        writer
            .flush()
            .map_err(|e| fail(format!("failed to write {}: {}", dest.display(), e)))?;
        pb.finish_and_clear();

        tracing::debug!("downloaded {} bytes to {}", written, dest.display());
        Ok(())
    }
}
