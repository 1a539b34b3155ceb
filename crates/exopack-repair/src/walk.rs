//! Tree traversal for the repair and rewrite passes.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::rewrite::{AliasRewriter, ExternalRequireRewriter};
use crate::{
    DefaultExportFixer, ExportTableFixer, Fixer, GypLiteralFixer, NestedExportFixer, Result,
    RootRelativeFixer,
};

/// Counters reported by a tree pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RepairStats {
    /// `.js` files inspected.
    pub files_scanned: usize,
    /// Files rewritten on disk.
    pub files_changed: usize,
}

/// Run every repair pass over one file's content.
///
/// Passes run in a fixed order; each consumes the previous pass's output.
/// The parent-require fold only applies to files at the output root, where
/// `at_root` is true. `None` means no pass matched.
pub fn repair_content(content: &str, at_root: bool) -> Option<String> {
    let mut current = content.to_string();
    let mut changed = false;

    if let Some(next) = ExportTableFixer::new().run(&current) {
        current = next;
        changed = true;
    }
    if let Some(next) = DefaultExportFixer::new().run(&current) {
        current = next;
        changed = true;
    }
    if let Some(next) = NestedExportFixer::new().run(&current) {
        current = next;
        changed = true;
    }
    if at_root {
        if let Some(next) = RootRelativeFixer::new().run(&current) {
            current = next;
            changed = true;
        }
    }
    if let Some(next) = GypLiteralFixer::new().run(&current) {
        current = next;
        changed = true;
    }

    changed.then_some(current)
}

/// Apply the repair passes to every `.js` file under `out_dir`.
///
/// Files are rewritten only when at least one pass matched, so a second run
/// over an already-repaired tree touches nothing.
pub fn repair_tree(out_dir: &Path) -> Result<RepairStats> {
    let mut stats = RepairStats::default();

    for entry in WalkDir::new(out_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() || !has_js_extension(entry.path()) {
            continue;
        }
        stats.files_scanned += 1;

        let at_root = entry.path().parent() == Some(out_dir);
        let content = fs::read_to_string(entry.path())?;
        if let Some(repaired) = repair_content(&content, at_root) {
            fs::write(entry.path(), repaired)?;
            stats.files_changed += 1;
            tracing::debug!(file = %entry.path().display(), "repaired");
        }
    }

    tracing::debug!(?stats, dir = %out_dir.display(), "repair pass complete");
    Ok(stats)
}

/// Parameters for the consumer-tree rewrite.
#[derive(Debug, Clone)]
pub struct RewriteConfig {
    /// Root of the consuming source tree.
    pub root: PathBuf,
    /// Vendor directory holding the bundled output (skipped during the
    /// walk, targeted by the rewrites).
    pub vendor_dir: PathBuf,
    /// Every vendored specifier, flat and scoped.
    pub packages: Vec<String>,
    /// `#alias` prefix to root-relative directory.
    pub aliases: Vec<(String, String)>,
}

/// Point bare requires and `#alias` specifiers in the consuming tree at
/// concrete relative paths.
pub fn rewrite_consumer_tree(config: &RewriteConfig) -> Result<RepairStats> {
    let mut stats = RepairStats::default();
    let externals = ExternalRequireRewriter::new(config.packages.iter().cloned());
    let aliases = AliasRewriter::new(config.aliases.iter().cloned());

    let walker = WalkDir::new(&config.root).into_iter().filter_entry(|e| {
        e.file_name() != "node_modules" && e.file_name() != ".git" && e.path() != config.vendor_dir
    });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !has_js_extension(entry.path()) {
            continue;
        }
        stats.files_scanned += 1;

        let file_dir = entry.path().parent().unwrap_or(&config.root);
        let vendor_prefix = relative_prefix(file_dir, &config.vendor_dir);
        let root_prefix = relative_prefix(file_dir, &config.root);

        let content = fs::read_to_string(entry.path())?;
        let mut current = content;
        let mut changed = false;
        if let Some(next) = externals.rewrite(&current, &vendor_prefix) {
            current = next;
            changed = true;
        }
        if let Some(next) = aliases.rewrite(&current, &root_prefix) {
            current = next;
            changed = true;
        }

        if changed {
            fs::write(entry.path(), current)?;
            stats.files_changed += 1;
            tracing::debug!(file = %entry.path().display(), "rewrote imports");
        }
    }

    Ok(stats)
}

fn has_js_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "js")
}

/// Relative path prefix from one directory to a target, in forward-slash
/// specifier form: `"."`, `"./sub"`, `".."`, or `"../other"`.
fn relative_prefix(from_dir: &Path, to: &Path) -> String {
    let from: Vec<_> = from_dir.components().collect();
    let to: Vec<_> = to.components().collect();

    let mut shared = 0;
    while shared < from.len() && shared < to.len() && from[shared] == to[shared] {
        shared += 1;
    }

    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - shared];
    parts.extend(to[shared..].iter().map(|c| c.as_os_str().to_string_lossy().into_owned()));

    if parts.is_empty() {
        ".".to_string()
    } else if parts[0] == ".." {
        parts.join("/")
    } else {
        format!("./{}", parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_prefixes() {
        let root = Path::new("/repo");
        assert_eq!(relative_prefix(root, Path::new("/repo/vendor")), "./vendor");
        assert_eq!(relative_prefix(Path::new("/repo/src"), Path::new("/repo/vendor")), "../vendor");
        assert_eq!(relative_prefix(Path::new("/repo/src/deep"), root), "../..");
        assert_eq!(relative_prefix(root, root), ".");
    }

    #[test]
    fn repairs_root_files_differently_from_nested_files() {
        let tmp = tempfile::tempdir().unwrap();
        let nested_dir = tmp.path().join("@scope");
        fs::create_dir_all(&nested_dir).unwrap();

        fs::write(tmp.path().join("top.js"), "require('../util');\n").unwrap();
        fs::write(nested_dir.join("inner.js"), "require('../util');\n").unwrap();

        let stats = repair_tree(tmp.path()).unwrap();
        assert_eq!(stats, RepairStats { files_scanned: 2, files_changed: 1 });

        let top = fs::read_to_string(tmp.path().join("top.js")).unwrap();
        assert_eq!(top, "require('./util');\n");
        // Nested files keep their parent references.
        let inner = fs::read_to_string(nested_dir.join("inner.js")).unwrap();
        assert_eq!(inner, "require('../util');\n");
    }

    #[test]
    fn second_run_touches_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("lib.js"),
            "require.resolve(\"node-gyp/bin/node-gyp.js\");\nmodule3.module.exports = x;\n",
        )
        .unwrap();

        let first = repair_tree(tmp.path()).unwrap();
        assert_eq!(first.files_changed, 1);
        let second = repair_tree(tmp.path()).unwrap();
        assert_eq!(second.files_changed, 0);
    }

    #[test]
    fn skips_non_js_files() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("types.d.ts"), "export declare const x: 1;").unwrap();
        fs::write(tmp.path().join("data.json"), "{}").unwrap();
        let stats = repair_tree(tmp.path()).unwrap();
        assert_eq!(stats.files_scanned, 0);
    }

    #[test]
    fn rewrites_consumer_sources_but_not_vendor_output() {
        let tmp = tempfile::tempdir().unwrap();
        let vendor = tmp.path().join("vendor");
        let src = tmp.path().join("src");
        fs::create_dir_all(&vendor).unwrap();
        fs::create_dir_all(&src).unwrap();

        fs::write(src.join("app.js"), "const z = require(\"zod\");\nconst log = require('#shared/log.js');\n").unwrap();
        fs::write(tmp.path().join("main.js"), "require('zod');\n").unwrap();
        fs::write(vendor.join("zod.js"), "require(\"zod\");\n").unwrap();

        let stats = rewrite_consumer_tree(&RewriteConfig {
            root: tmp.path().to_path_buf(),
            vendor_dir: vendor.clone(),
            packages: vec!["zod".to_string()],
            aliases: vec![("#shared".to_string(), "src/shared".to_string())],
        })
        .unwrap();
        assert_eq!(stats.files_changed, 2);

        let app = fs::read_to_string(src.join("app.js")).unwrap();
        assert!(app.contains("require(\"../vendor/zod.js\")"));
        assert!(app.contains("require('../src/shared/log.js')"));

        let main = fs::read_to_string(tmp.path().join("main.js")).unwrap();
        assert!(main.contains("require('./vendor/zod.js')"));

        // The vendor output itself is never rewritten.
        let vendored = fs::read_to_string(vendor.join("zod.js")).unwrap();
        assert_eq!(vendored, "require(\"zod\");\n");
    }
}
