//! File materialization.
//!
//! Bundling covers transformed code; everything else a consumer needs is
//! copied. The skip-if-absent rule for files (directories are created
//! eagerly, files only when missing) lets a scope directory hold both
//! bundler output and untouched auxiliary assets without the copy stage
//! clobbering what the bundler just wrote.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::Result;

/// Copy hand-written type-declaration files (`*.d.ts`) from the top level
/// of `src_dir` into `out_dir`. Everything else at that level is either
/// bundled separately or intentionally excluded.
pub fn copy_local_files(src_dir: &Path, out_dir: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in fs::read_dir(src_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if !name.to_string_lossy().ends_with(".d.ts") {
            continue;
        }
        fs::copy(entry.path(), out_dir.join(&name))?;
        copied += 1;
    }
    Ok(copied)
}

/// Mirror `src_dir` into `dst_dir`: directories eagerly, files only when
/// the destination does not already exist.
///
/// Returns the number of files copied. Existing files are bundler output
/// and must not be overwritten.
pub fn copy_recursive(src_dir: &Path, dst_dir: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(src_dir) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src_dir)
            .expect("walkdir yields paths under its root");
        let target = dst_dir.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if !target.exists() {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Run [`copy_recursive`] once per scope directory under `src_root`.
///
/// A scope directory missing from `src_root` contributes zero files and no
/// error; not every configuration ships auxiliary files for every scope.
pub fn copy_scoped_files(src_root: &Path, out_dir: &Path, scopes: &[String]) -> Result<usize> {
    let mut copied = 0;
    for scope in scopes {
        let src = src_root.join(scope);
        if !src.is_dir() {
            tracing::debug!(scope, "no auxiliary files for scope");
            continue;
        }
        copied += copy_recursive(&src, &out_dir.join(scope))?;
    }
    Ok(copied)
}
