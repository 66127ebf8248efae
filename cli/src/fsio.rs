#![deny(missing_docs)]

//! # Filesystem Writes
//!
//! The only code that puts bytes on disk. Mutated files are overwritten
//! atomically (temp file in the destination directory, then rename) so a
//! failed registration can never leave a half-written registry behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use goforge_core::{AppError, AppResult};

/// Atomically replaces `path` with `contents`.
pub fn write_atomic(path: &Path, contents: &str) -> AppResult<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| AppError::General(format!("no parent directory for {:?}", path)))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path).map_err(|e| AppError::Io(e.error))?;
    Ok(())
}

/// Creates `path` as a new directory; failure (including already-exists) is
/// surfaced with the path in the message.
pub fn create_new_dir(path: &Path) -> AppResult<()> {
    fs::create_dir(path)
        .map_err(|e| AppError::General(format!("failed to create directory {:?}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("main.go");
        fs::write(&path, "old").unwrap();
        write_atomic(&path, "new contents").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new contents");
    }

    #[test]
    fn test_create_new_dir_fails_on_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("internal");
        create_new_dir(&path).unwrap();
        assert!(create_new_dir(&path).is_err());
    }
}
