//! Host platform capabilities, resolved once at startup.

use std::path::{Path, PathBuf};

/// Platform family, as far as launching tools is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Whether native executables carry a file suffix.
    pub fn has_executable_suffix(self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// Extensions of script launchers that must sit next to each installed
    /// tool. Empty where tools are launched directly.
    pub fn launcher_extensions(self) -> &'static [&'static str] {
        match self {
            Platform::Unix => &[],
            Platform::Windows => &["bat", "cmd"],
        }
    }

    /// File name of a native executable.
    pub fn executable_name(self, name: &str) -> String {
        if self.has_executable_suffix() {
            format!("{}.exe", name)
        } else {
            name.to_string()
        }
    }

    /// Find the launcher for `tool_path`, if this platform needs one.
    ///
    /// Returns `Some(tool_path)` itself where no launcher is required.
    pub fn find_launcher(self, tool_path: &Path) -> Option<PathBuf> {
        let extensions = self.launcher_extensions();
        if extensions.is_empty() {
            return Some(tool_path.to_path_buf());
        }

        extensions
            .iter()
            .map(|ext| {
                let mut name = tool_path.as_os_str().to_owned();
                name.push(".");
                name.push(ext);
                PathBuf::from(name)
            })
            .find(|candidate| candidate.is_file())
    }
}
