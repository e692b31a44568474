//! Static descriptions of the native dependencies we rebuild.
//!
//! A [`DependencySpec`] is a compile-time constant: the pinned version, where
//! the source archive lives, and which configure/install targets produce a
//! shared-only install. The version string is the single source for the URL,
//! the archive name, and the extracted directory name, so fetch and extract
//! always agree.

use std::fmt;

/// Pinned OpenSSL release.
pub const OPENSSL_VERSION: &str = "3.3.0";

/// Pinned libyaml release.
pub const LIBYAML_VERSION: &str = "0.2.5";

/// The TLS/crypto library.
pub static OPENSSL: DependencySpec = DependencySpec {
    name: "openssl",
    version: OPENSSL_VERSION,
    url_template: "https://www.openssl.org/source/openssl-{version}.tar.gz",
    archive_template: "openssl-{version}.tar.gz",
    source_dir_template: "openssl-{version}",
    sha256: Some("53e66b043322a606abf0087e7699a0e033a37fa13feb9742df35c3a33b18fb02"),
    configure_script: "./Configure",
    configure_args: &["--libdir=lib", "shared", "no-tests", "no-apps"],
    needs_cert_dir: true,
    // `install_sw` would also populate OPENSSLDIR, which is host state.
    install_targets: &["install_dev"],
    cleanup_globs: &["lib/*.a"],
};

/// The YAML parsing library.
pub static LIBYAML: DependencySpec = DependencySpec {
    name: "libyaml",
    version: LIBYAML_VERSION,
    url_template: "https://pyyaml.org/download/libyaml/yaml-{version}.tar.gz",
    archive_template: "yaml-{version}.tar.gz",
    source_dir_template: "yaml-{version}",
    sha256: Some("c642ae9b75fee120b2d96c712538bd2cf283228d2337df2cf2988e3c02678ef4"),
    configure_script: "./configure",
    configure_args: &["--disable-static", "--enable-shared"],
    needs_cert_dir: false,
    install_targets: &["install"],
    cleanup_globs: &[],
};

/// The dependencies in build order.
pub fn all() -> [&'static DependencySpec; 2] {
    [&OPENSSL, &LIBYAML]
}

/// How to fetch, configure and install one dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    /// Short name used in logs and errors.
    pub name: &'static str,
    /// Pinned upstream version.
    pub version: &'static str,
    /// Download URL, with `{version}` substituted.
    pub url_template: &'static str,
    /// Archive file name, with `{version}` substituted.
    pub archive_template: &'static str,
    /// Top-level directory inside the archive, with `{version}` substituted.
    pub source_dir_template: &'static str,
    /// Expected SHA-256 of the archive.
    pub sha256: Option<&'static str>,
    /// Configure script, relative to the source directory.
    pub configure_script: &'static str,
    /// Fixed configure arguments (after `--prefix`).
    pub configure_args: &'static [&'static str],
    /// Whether configure takes `--openssldir=<host cert store>`.
    pub needs_cert_dir: bool,
    /// `make` targets run for the install step, in order.
    pub install_targets: &'static [&'static str],
    /// Globs, relative to the prefix, removed after install.
    pub cleanup_globs: &'static [&'static str],
}

impl DependencySpec {
    fn expand(&self, template: &str) -> String {
        template.replace("{version}", self.version)
    }

    /// The source archive URL.
    pub fn url(&self) -> String {
        self.expand(self.url_template)
    }

    /// The file name the archive is saved as inside the workspace.
    pub fn archive_name(&self) -> String {
        self.expand(self.archive_template)
    }

    /// The directory the archive extracts to.
    pub fn source_dir(&self) -> String {
        self.expand(self.source_dir_template)
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}

/// States of the per-dependency build, in the only order they can occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Pending,
    Fetched,
    Extracted,
    Configured,
    Compiled,
    Installed,
    Cleaned,
}

impl Stage {
    /// The state reached after this one, or `None` once cleaned.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Pending => Some(Stage::Fetched),
            Stage::Fetched => Some(Stage::Extracted),
            Stage::Extracted => Some(Stage::Configured),
            Stage::Configured => Some(Stage::Compiled),
            Stage::Compiled => Some(Stage::Installed),
            Stage::Installed => Some(Stage::Cleaned),
            Stage::Cleaned => None,
        }
    }

    /// Name of the step that transitions into this state.
    pub fn step_name(self) -> &'static str {
        match self {
            Stage::Pending => "pending",
            Stage::Fetched => "fetch",
            Stage::Extracted => "extract",
            Stage::Configured => "configure",
            Stage::Compiled => "compile",
            Stage::Installed => "install",
            Stage::Cleaned => "cleanup",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.step_name())
    }
}
