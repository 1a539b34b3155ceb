//! Entry point resolution against the installed dependency tree.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Resolve a package specifier to a concrete entry file.
///
/// `specifier` is either a package name (`zod`, `@scope/name`) or a deep
/// export (`@scope/name/client/stdio.js`). Package roots are resolved through
/// their `package.json` `main` field (falling back to `index.js`); deep
/// exports are resolved as plain files, trying a `.js` suffix when the
/// subpath has no extension.
pub fn resolve_entry(root_dir: &Path, specifier: &str) -> Result<PathBuf> {
    let node_modules = root_dir.join("node_modules");
    let not_found = || Error::PackageNotFound {
        specifier: specifier.to_string(),
        root: root_dir.display().to_string(),
    };

    let (package, subpath) = split_specifier(specifier);
    let package_dir = node_modules.join(package);

    if let Some(subpath) = subpath {
        let direct = package_dir.join(subpath);
        if direct.is_file() {
            return Ok(direct);
        }
        let with_ext = package_dir.join(format!("{subpath}.js"));
        if with_ext.is_file() {
            return Ok(with_ext);
        }
        return Err(not_found());
    }

    let manifest = package_dir.join("package.json");
    let main = std::fs::read_to_string(&manifest)
        .ok()
        .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
        .and_then(|json| json.get("main").and_then(|m| m.as_str().map(String::from)))
        .unwrap_or_else(|| "index.js".to_string());

    let entry = package_dir.join(&main);
    if entry.is_file() {
        return Ok(entry);
    }
    // `main` may point at an extensionless path or a directory.
    let with_ext = package_dir.join(format!("{main}.js"));
    if with_ext.is_file() {
        return Ok(with_ext);
    }
    let as_index = entry.join("index.js");
    if as_index.is_file() {
        return Ok(as_index);
    }
    Err(not_found())
}

/// Split a specifier into its package name and optional subpath.
///
/// Scoped names keep their first two segments: `@scope/name/lib/x` splits
/// into `@scope/name` and `lib/x`.
fn split_specifier(specifier: &str) -> (&str, Option<&str>) {
    let segments_in_name = if specifier.starts_with('@') { 2 } else { 1 };
    let mut index = 0;
    for _ in 0..segments_in_name {
        match specifier[index..].find('/') {
            Some(offset) => index += offset + 1,
            None => return (specifier, None),
        }
    }
    (&specifier[..index - 1], Some(&specifier[index..]))
}
