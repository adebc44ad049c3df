use crate::error::{ContextError, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Readers see either the old file or the new one, never a partial write.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let write_failure = |source: std::io::Error| ContextError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_failure)?;
    // The tempfile is removed on drop if anything below fails.
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_failure)?;
    tmp.write_all(data).map_err(write_failure)?;
    tmp.as_file().sync_all().map_err(write_failure)?;
    tmp.persist(path).map_err(|e| write_failure(e.error))?;
    Ok(())
}

/// Read `path` as UTF-8, returning `None` if it does not exist.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
