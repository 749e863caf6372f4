//! # File-Backed Stores
//!
//! The knowledge blob and the question/answer history each live in one flat
//! file. Both are rewritten wholesale on save.

pub mod history;
pub mod knowledge;

use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes `content` to a uniquely named temp file beside `target` and renames it
/// over `target`, so readers never observe a half-written file and concurrent
/// writers never share a temp file.
pub(crate) fn atomic_write(target: &Path, content: &[u8]) -> io::Result<()> {
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(content)?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(target).map_err(|e| e.error)?;
    Ok(())
}

/// Removes `path`, treating an already-missing file as success.
pub(crate) fn remove_if_exists(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
