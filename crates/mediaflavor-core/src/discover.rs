//! Candidate path discovery.
//!
//! Expands directories into the files beneath them and normalizes every path
//! to a canonical absolute form, so the candidate set sees each file once.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{ResolveError, Result};

/// Expand `inputs` into a sorted, deduplicated list of absolute file paths.
///
/// Directories are walked recursively; entries whose name starts with `.` are
/// skipped. A missing input is an error.
pub fn discover_paths<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        let canonical = fs::canonicalize(input).map_err(|e| ResolveError::io(input, e))?;
        if canonical.is_dir() {
            collect_files(&canonical, &mut files)?;
        } else {
            files.push(canonical);
        }
    }

    files.sort();
    files.dedup();
    debug!(inputs = inputs.len(), files = files.len(), "paths discovered");
    Ok(files)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| ResolveError::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| ResolveError::io(dir, e))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| ResolveError::io(&path, e))?;
        if file_type.is_dir() {
            collect_files(&path, files)?;
        } else if file_type.is_file() {
            files.push(path);
        } else if file_type.is_symlink() {
            let target = fs::canonicalize(&path).map_err(|e| ResolveError::io(&path, e))?;
            if target.is_file() {
                files.push(target);
            }
        }
    }

    Ok(())
}
