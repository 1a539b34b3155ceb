//! Forced `node_modules` resolution for self-aliased packages.
//!
//! A handful of packages are aliased to themselves in this project's module
//! resolution configuration. Importing them from outside the installed
//! dependency tree would resolve through the alias and recurse forever. This
//! plugin short-circuits those specifiers to their physical location under
//! `node_modules` and keeps them non-external, so they are still inlined -
//! just from the right place.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use exopack_manifest::FORCED_NODE_MODULES;
use rolldown_common::ResolvedExternal;
use rolldown_plugin::{
    HookResolveIdArgs, HookResolveIdOutput, HookResolveIdReturn, HookUsage, Plugin, PluginContext,
};

#[derive(Debug, Clone)]
pub struct ForcedNodeModulesPlugin {
    /// Root directory containing the `node_modules` tree.
    root_dir: PathBuf,
}

impl ForcedNodeModulesPlugin {
    pub fn new(root_dir: impl AsRef<Path>) -> Self {
        Self { root_dir: root_dir.as_ref().to_path_buf() }
    }
}

impl Plugin for ForcedNodeModulesPlugin {
    fn name(&self) -> Cow<'static, str> {
        "exopack:forced-node-modules".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::ResolveId
    }

    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        let specifier = args.specifier.to_string();
        let importer = args.importer.map(|i| i.to_string());
        let root_dir = self.root_dir.clone();

        async move {
            if !FORCED_NODE_MODULES.contains(&specifier.as_str()) {
                return Ok(None);
            }

            // Imports from inside the installed tree already resolve to the
            // physical package; only importers outside it hit the alias loop.
            if let Some(importer) = &importer {
                if importer.contains("node_modules") {
                    return Ok(None);
                }
            }

            // Fall through to default resolution (and its error handling) if
            // the package is not physically present.
            let Some(entry) = node_modules_entry(&root_dir, &specifier) else {
                return Ok(None);
            };

            tracing::debug!(specifier, entry = %entry.display(), "forcing node_modules resolution");
            Ok(Some(HookResolveIdOutput {
                id: entry.to_string_lossy().into_owned().into(),
                external: Some(ResolvedExternal::Bool(false)),
                ..Default::default()
            }))
        }
    }
}

/// Locate a package's entry file directly under `node_modules`.
fn node_modules_entry(root_dir: &Path, name: &str) -> Option<PathBuf> {
    let package_dir = root_dir.join("node_modules").join(name);
    let main = std::fs::read_to_string(package_dir.join("package.json"))
        .ok()
        .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
        .and_then(|json| json.get("main").and_then(|m| m.as_str().map(String::from)))
        .unwrap_or_else(|| "index.js".to_string());

    let entry = package_dir.join(&main);
    if entry.is_file() {
        return Some(entry);
    }
    let with_ext = package_dir.join(format!("{main}.js"));
    with_ext.is_file().then_some(with_ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_lookup_reads_main_field() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("node_modules/shell-quote");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("package.json"), r#"{ "main": "quote.js" }"#).unwrap();
        std::fs::write(dir.join("quote.js"), "module.exports = {};").unwrap();

        let entry = node_modules_entry(tmp.path(), "shell-quote").unwrap();
        assert!(entry.ends_with("node_modules/shell-quote/quote.js"));
    }

    #[test]
    fn absent_package_falls_through() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(node_modules_entry(tmp.path(), "shell-quote").is_none());
    }
}
