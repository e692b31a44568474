//! Source archive extraction.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;

use crate::core::errors::BuildError;

/// Extract a `.tar.gz` archive into `dest`.
///
/// Entries keep their paths, so an archive with a versioned top-level
/// directory (`openssl-3.3.0/...`) lands at `dest/openssl-3.3.0`. Entries
/// that would escape `dest` are rejected. A corrupt or truncated archive
/// fails with `ExtractFailed`.
pub fn extract_tarball(archive_path: &Path, dest: &Path) -> Result<(), BuildError> {
    let fail = |reason: String| BuildError::ExtractFailed {
        archive: archive_path.to_path_buf(),
        reason,
    };

    let file = File::open(archive_path).map_err(|e| fail(e.to_string()))?;
    unpack(GzDecoder::new(file), dest).map_err(fail)
}

fn unpack<R: Read>(reader: R, dest: &Path) -> Result<(), String> {
    std::fs::create_dir_all(dest)
        .map_err(|e| format!("failed to create {}: {}", dest.display(), e))?;

    let mut archive = Archive::new(reader);
    archive.set_preserve_permissions(true);

    let entries = archive
        .entries()
        .map_err(|e| format!("failed to read archive entries: {}", e))?;

    let mut count = 0usize;
    for entry in entries {
        let mut entry = entry.map_err(|e| format!("failed to read archive entry: {}", e))?;
        let entry_path = entry
            .path()
            .map_err(|e| format!("invalid entry path: {}", e))?
            .into_owned();

        match entry.header().entry_type() {
            tar::EntryType::XGlobalHeader | tar::EntryType::XHeader => continue,
            _ => {}
        }

        // `unpack_in` refuses `..` components and absolute paths.
        let unpacked = entry
            .unpack_in(dest)
            .map_err(|e| format!("failed to extract {}: {}", entry_path.display(), e))?;
        if !unpacked {
            return Err(format!(
                "archive entry escapes destination directory: {}",
                entry_path.display()
            ));
        }
        count += 1;
    }

    if count == 0 {
        return Err("archive is empty".to_string());
    }
    tracing::debug!("extracted {} entries into {}", count, dest.display());
    Ok(())
}
