//! Atomic file writing for bundle output.
//!
//! Each target is written as one group: the bundle, its `.map` file and any
//! emitted assets. Every file goes to a temporary sibling first and is renamed
//! into place once the whole group is on disk, so each file is replaced
//! atomically. A failure while writing the temporaries leaves none of the
//! group visible. A failed rename can leave earlier files of the group in
//! place; the remaining temporaries are removed either way. Groups written for
//! earlier targets are left alone.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use tracing::{debug, warn};

use crate::error::{BuildError, Result};

/// Resolve an emitted asset name against the bundle directory.
///
/// Names are cleaned first; anything that still escapes `base_dir` (for
/// example `../../etc/passwd` or an absolute path) is rejected.
pub fn validate_output_path(base_dir: &Path, filename: &str) -> Result<PathBuf> {
    if filename.is_empty() {
        return Err(BuildError::InvalidOutputPath(
            "asset file name is empty".to_string(),
        ));
    }
    if filename.contains('\0') {
        return Err(BuildError::InvalidOutputPath(
            "Filename contains null byte".to_string(),
        ));
    }

    let full_path = base_dir.join(Path::new(filename).clean()).clean();

    if !full_path.starts_with(base_dir) || full_path == base_dir {
        return Err(BuildError::InvalidOutputPath(format!(
            "Path '{}' escapes output directory '{}' (resolved to '{}')",
            filename,
            base_dir.display(),
            full_path.display()
        )));
    }

    Ok(full_path)
}

/// Write every `(path, contents)` pair through a temporary sibling.
///
/// Parent directories are created as needed. Nothing is renamed into place
/// until every temporary has been written.
pub fn write_files_atomic(operations: &[(PathBuf, &[u8])]) -> Result<()> {
    let mut temp_files: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(operations.len());

    for (target_path, content) in operations {
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                cleanup_temp_files(&temp_files);
                BuildError::io(parent, e)
            })?;
        }

        let temp_path = temp_path_for(target_path);
        fs::write(&temp_path, content).map_err(|e| {
            cleanup_temp_files(&temp_files);
            BuildError::io(&temp_path, e)
        })?;

        temp_files.push((temp_path, target_path.clone()));
    }

    for (temp_path, target_path) in &temp_files {
        fs::rename(temp_path, target_path).map_err(|e| {
            cleanup_temp_files(&temp_files);
            BuildError::io(target_path, e)
        })?;
        debug!(path = %target_path.display(), "wrote file");
    }

    Ok(())
}

/// `bundle.js` → `.bundle.js.tmp`, so siblings never share a temporary.
fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(target.file_name().unwrap_or_default());
    name.push(".tmp");
    target.with_file_name(name)
}

fn cleanup_temp_files(temp_files: &[(PathBuf, PathBuf)]) {
    for (temp_path, _) in temp_files {
        if temp_path.exists() {
            if let Err(e) = fs::remove_file(temp_path) {
                warn!(
                    path = %temp_path.display(),
                    "failed to clean up temporary file: {e}"
                );
            }
        }
    }
}
