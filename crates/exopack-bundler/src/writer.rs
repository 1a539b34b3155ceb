//! Output file writing: banner injection and path containment.

use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::{Error, Result};

const BANNER: &str = "\"use strict\";";

/// Write one bundled module to disk and report the bytes written.
///
/// Prepends a `"use strict"` banner when the code does not already carry
/// one (idempotent across pipeline re-runs), creates parent directories as
/// needed, and refuses paths that escape `out_root`.
pub fn write_bundle_file(out_root: &Path, out_file: &Path, code: &str) -> Result<u64> {
    let target = validate_output_path(out_root, out_file)?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = if code.trim_start().starts_with(BANNER)
        || code.trim_start().starts_with("'use strict'")
    {
        code.to_string()
    } else {
        format!("{BANNER}\n{code}")
    };

    fs::write(&target, &contents)?;
    Ok(contents.len() as u64)
}

/// Ensure an output path stays inside the output root.
///
/// Cleans `.` / `..` components before the containment check, so traversal
/// through joined components is caught as well.
fn validate_output_path(out_root: &Path, out_file: &Path) -> Result<PathBuf> {
    let root = out_root.to_path_buf().clean();
    let target = if out_file.is_absolute() {
        out_file.to_path_buf().clean()
    } else {
        root.join(out_file).clean()
    };

    if !target.starts_with(&root) {
        return Err(Error::InvalidOutputPath(format!(
            "'{}' escapes output directory '{}'",
            out_file.display(),
            root.display()
        )));
    }
    Ok(target)
}
