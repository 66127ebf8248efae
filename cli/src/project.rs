#![deny(missing_docs)]

//! # Project Discovery
//!
//! Locates the project root (the nearest ancestor directory containing
//! `go.mod`) and reads the project's module path out of the manifest.

use std::fs;
use std::path::{Path, PathBuf};

use goforge_core::{AppError, AppResult};

/// Walks up from `start` until a directory containing `go.mod` is found.
pub fn find_project_root(start: &Path) -> AppResult<PathBuf> {
    let mut dir = start.canonicalize()?;
    loop {
        if dir.join("go.mod").is_file() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(AppError::General(
                "go.mod not found in any parent directory".into(),
            ));
        }
    }
}

/// Reads the module path from the project manifest: the second
/// whitespace-delimited token of the first line of `go.mod`.
pub fn read_project_name(root: &Path) -> AppResult<String> {
    let manifest = root.join("go.mod");
    let text = fs::read_to_string(&manifest)?;
    let first_line = text.lines().next().unwrap_or("");
    first_line
        .split_whitespace()
        .nth(1)
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::General(format!(
                "malformed manifest {:?}: first line must be 'module <path>'",
                manifest
            ))
        })
}
