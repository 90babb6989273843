//! Zip bundling and extraction over [`Storage`].

use crate::error::RolError;
use crate::storage::{join_key, Storage};
use std::io::{Cursor, Read, Write};
use std::path::{Component, Path};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Build a zip archive holding `entries` as `(name, contents)` pairs, in order.
pub fn bundle<N, B>(entries: &[(N, B)]) -> Result<Vec<u8>, RolError>
where
    N: AsRef<str>,
    B: AsRef<[u8]>,
{
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, bytes) in entries {
        writer.start_file(name.as_ref(), options)?;
        writer.write_all(bytes.as_ref())?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOC: u64 = 64 << 20;

/// The declared size comes from the archive header and is not trusted.
fn capacity_hint(declared: u64) -> usize {
    declared.min(MAX_PREALLOC) as usize
}

/// Read every file entry of an archive into memory, in archive order.
pub fn read_entries(archive_bytes: &[u8]) -> Result<Vec<(String, Vec<u8>)>, RolError> {
    let mut archive = ZipArchive::new(Cursor::new(archive_bytes))?;
    let mut out = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let enclosed = file.enclosed_name();
        let Some(key) = enclosed.as_deref().and_then(path_to_key) else {
            tracing::warn!(entry = file.name(), "skipping zip entry with unsafe name");
            continue;
        };
        let mut bytes = Vec::with_capacity(capacity_hint(file.size()));
        file.read_to_end(&mut bytes)?;
        out.push((key, bytes));
    }

    Ok(out)
}

/// Extract an archive under `dir` in `storage`, overwriting colliding names.
///
/// Returns the keys written.
pub fn extract_into(
    archive_bytes: &[u8],
    storage: &dyn Storage,
    dir: &str,
) -> Result<Vec<String>, RolError> {
    let mut written = Vec::new();
    for (name, bytes) in read_entries(archive_bytes)? {
        let key = join_key(dir, &name);
        storage.put(&key, &bytes)?;
        written.push(key);
    }
    tracing::debug!(dir, files = written.len(), "extracted archive");
    Ok(written)
}

fn path_to_key(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?.to_string()),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
