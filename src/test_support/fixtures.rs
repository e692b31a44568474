//! Fixtures: generated source archives and canned tool outputs.

use flate2::write::GzEncoder;
use flate2::Compression;
use tar::{Builder, Header};

use super::MockProcessOutput;

/// Build a `.tar.gz` shaped like an autotools release: everything under a
/// single `<top_dir>/` directory, with `configure`, `Configure`, a source
/// file, and a chunk of incompressible data.
pub fn source_tarball(top_dir: &str) -> Vec<u8> {
    let mut builder = Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

    let mut dir = Header::new_gnu();
    dir.set_entry_type(tar::EntryType::Directory);
    dir.set_mode(0o755);
    dir.set_size(0);
    dir.set_cksum();
    builder
        .append_data(&mut dir, format!("{}/", top_dir), std::io::empty())
        .unwrap();

    let script = b"#!/bin/sh\nexit 0\n".to_vec();
    for name in ["configure", "Configure"] {
        append_file(&mut builder, &format!("{}/{}", top_dir, name), &script, 0o755);
    }
    append_file(
        &mut builder,
        &format!("{}/src/api.c", top_dir),
        b"int api(void) { return 0; }\n",
        0o644,
    );
    append_file(
        &mut builder,
        &format!("{}/data.bin", top_dir),
        &noise(16 * 1024),
        0o644,
    );

    builder.into_inner().unwrap().finish().unwrap()
}

fn append_file(builder: &mut Builder<GzEncoder<Vec<u8>>>, path: &str, data: &[u8], mode: u32) {
    let mut header = Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(mode);
    header.set_cksum();
    builder.append_data(&mut header, path, data).unwrap();
}

/// Deterministic, poorly compressible bytes.
fn noise(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x2545_f491;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

/// Canned outputs of `openssl version -d`.
pub mod openssl_outputs {
    use super::MockProcessOutput;

    pub fn debian() -> MockProcessOutput {
        MockProcessOutput::success("OPENSSLDIR: \"/usr/lib/ssl\"\n")
    }

    pub fn fedora() -> MockProcessOutput {
        MockProcessOutput::success("OPENSSLDIR: \"/etc/pki/tls\"\n")
    }
}

/// Canned version outputs of the runtime's command-line tools.
pub mod tool_outputs {
    use super::MockProcessOutput;

    pub fn rake() -> MockProcessOutput {
        MockProcessOutput::success("rake, version 13.0.6\n")
    }

    pub fn bundler() -> MockProcessOutput {
        MockProcessOutput::success("Bundler version 2.5.9\n")
    }

    /// Prints its version on stderr only.
    pub fn rdbg() -> MockProcessOutput {
        MockProcessOutput::with_output(0, "", "rdbg 1.9.2\n")
    }
}
