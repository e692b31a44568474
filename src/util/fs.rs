//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use walkdir::WalkDir;

use crate::core::errors::BuildError;

/// Outcome of [`remove_glob`].
#[derive(Debug, Default)]
pub struct Removal {
    /// Files that were deleted
    pub removed: Vec<PathBuf>,
    /// Files (or patterns) that could not be deleted
    pub failures: Vec<BuildError>,
}

/// Delete every file matching `pattern` under `base`.
///
/// Removal is best effort: failures are collected rather than returned
/// early, so one stubborn file does not keep the others around.
pub fn remove_glob(base: &Path, pattern: &str) -> Removal {
    let mut removal = Removal::default();
    let full_pattern = base.join(pattern);
    // Only `pattern` is a glob; metacharacters in `base` are literal.
    let pattern_str = format!(
        "{}/{}",
        Pattern::escape(&base.to_string_lossy()),
        pattern
    );

    let paths = match glob(&pattern_str) {
        Ok(paths) => paths,
        Err(e) => {
            removal.failures.push(BuildError::Cleanup {
                path: full_pattern.clone(),
                reason: format!("invalid glob pattern: {}", e),
            });
            return removal;
        }
    };

    for entry in paths {
        match entry {
            Ok(path) => {
                if path.is_dir() {
                    continue;
                }
                tracing::info!("==> rm {}", path.display());
                match fs::remove_file(&path) {
                    Ok(()) => removal.removed.push(path),
                    Err(e) => removal.failures.push(BuildError::Cleanup {
                        path,
                        reason: e.to_string(),
                    }),
                }
            }
            Err(e) => removal.failures.push(BuildError::Cleanup {
                path: e.path().to_path_buf(),
                reason: e.error().to_string(),
            }),
        }
    }

    removal
}

/// Whether a file name looks like a shared library (`libfoo.so.3`,
/// `libfoo.3.dylib`, `foo.dll`).
pub fn is_shared_library(name: &str) -> bool {
    name.ends_with(".so")
        || name.contains(".so.")
        || name.ends_with(".dylib")
        || name.ends_with(".dll")
}

/// List shared libraries (files and symlinks) directly or transitively under
/// `dir`, sorted. A missing directory yields an empty list.
pub fn find_shared_libraries(dir: &Path) -> Vec<PathBuf> {
    let mut libs: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| !e.file_type().is_dir())
        .filter(|e| is_shared_library(&e.file_name().to_string_lossy()))
        .map(|e| e.into_path())
        .collect();
    libs.sort();
    libs
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
