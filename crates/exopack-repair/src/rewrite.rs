//! Consumer-tree rewrites.
//!
//! After packages are vendored, the consuming application's own sources
//! still hold bare specifiers (`require("zod")`) and internal aliases
//! (`require("#shared/log")`). These rewriters point both at concrete
//! relative paths so the tree runs without a `node_modules` directory or a
//! loader that understands the alias map. Unlike the repair fixers they are
//! parameterized per file, since the relative prefix depends on where the
//! file sits.

use std::sync::LazyLock;

use regex::Regex;

/// Rewrites bare requires of vendored packages to paths into the vendor
/// directory.
#[derive(Debug, Clone)]
pub struct ExternalRequireRewriter {
    packages: Vec<String>,
}

impl ExternalRequireRewriter {
    /// `packages` holds every vendored specifier: flat names, scoped
    /// `@scope/name` names, and deep subpath entries.
    pub fn new(packages: impl IntoIterator<Item = String>) -> Self {
        Self { packages: packages.into_iter().collect() }
    }

    /// Rewrite `content` for a file whose directory reaches the vendor
    /// directory via `vendor_prefix` (e.g. `"./vendor"` or `"../vendor"`).
    ///
    /// Returns `None` when no bare require of a vendored package appears.
    pub fn rewrite(&self, content: &str, vendor_prefix: &str) -> Option<String> {
        let mut current = content.to_string();
        let mut changed = false;
        for package in &self.packages {
            let target = format!("{vendor_prefix}/{}", vendor_file(package));
            for quote in ['"', '\''] {
                let needle = format!("require({quote}{package}{quote})");
                if current.contains(&needle) {
                    let replacement = format!("require({quote}{target}{quote})");
                    current = current.replace(&needle, &replacement);
                    changed = true;
                }
            }
        }
        changed.then_some(current)
    }
}

/// Vendor-relative file name for a specifier: the emitted bundles carry a
/// `.js` extension unless the specifier already names one.
fn vendor_file(specifier: &str) -> String {
    if specifier.ends_with(".js") {
        specifier.to_string()
    } else {
        format!("{specifier}.js")
    }
}

/// `require("#alias/rest")` in either quote style.
static ALIAS_REQUIRE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"require\((["'])(#[^"')]+)(["'])\)"#).unwrap());

/// Resolves internal `#alias/*` specifiers to relative paths.
#[derive(Debug, Clone)]
pub struct AliasRewriter {
    /// Alias prefix (with leading `#`) to root-relative target directory.
    aliases: Vec<(String, String)>,
}

impl AliasRewriter {
    pub fn new(aliases: impl IntoIterator<Item = (String, String)>) -> Self {
        Self { aliases: aliases.into_iter().collect() }
    }

    /// Rewrite `content` for a file whose directory reaches the tree root
    /// via `root_prefix` (e.g. `"."` or `".."`). Unknown aliases are left
    /// untouched.
    pub fn rewrite(&self, content: &str, root_prefix: &str) -> Option<String> {
        let mut changed = false;
        let rewritten = ALIAS_REQUIRE.replace_all(content, |caps: &regex::Captures<'_>| {
            let quote = &caps[1];
            let specifier = &caps[2];
            match self.resolve(specifier, root_prefix) {
                Some(path) => {
                    changed = true;
                    format!("require({quote}{path}{quote})")
                }
                None => caps[0].to_string(),
            }
        });
        changed.then(|| rewritten.into_owned())
    }

    fn resolve(&self, specifier: &str, root_prefix: &str) -> Option<String> {
        for (alias, target) in &self.aliases {
            if specifier == alias {
                return Some(format!("{root_prefix}/{target}"));
            }
            if let Some(rest) = specifier.strip_prefix(alias.as_str()) {
                if let Some(rest) = rest.strip_prefix('/') {
                    return Some(format!("{root_prefix}/{target}/{rest}"));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_bare_requires_at_the_vendor_directory() {
        let rewriter =
            ExternalRequireRewriter::new(["zod".to_string(), "@smithy/node-config-provider".to_string()]);
        let source = "const z = require(\"zod\");\nconst p = require('@smithy/node-config-provider');\n";
        let out = rewriter.rewrite(source, "./vendor").unwrap();
        assert!(out.contains("require(\"./vendor/zod.js\")"));
        assert!(out.contains("require('./vendor/@smithy/node-config-provider.js')"));
    }

    #[test]
    fn deep_subpath_entries_keep_their_extension() {
        let rewriter =
            ExternalRequireRewriter::new(["@modelcontextprotocol/sdk/client/stdio.js".to_string()]);
        let source = "require(\"@modelcontextprotocol/sdk/client/stdio.js\");";
        let out = rewriter.rewrite(source, "../vendor").unwrap();
        assert!(out.contains("require(\"../vendor/@modelcontextprotocol/sdk/client/stdio.js\")"));
    }

    #[test]
    fn ignores_unvendored_packages() {
        let rewriter = ExternalRequireRewriter::new(["zod".to_string()]);
        assert!(rewriter.rewrite("require(\"express\");", "./vendor").is_none());
        // Subpaths of a vendored package are not bare requires of it.
        assert!(rewriter.rewrite("require(\"zod/locales\");", "./vendor").is_none());
    }

    #[test]
    fn resolves_alias_requires_relative_to_root() {
        let rewriter = AliasRewriter::new([("#shared".to_string(), "src/shared".to_string())]);
        let source = "const log = require('#shared/log.js');\n";
        let out = rewriter.rewrite(source, "..").unwrap();
        assert_eq!(out, "const log = require('../src/shared/log.js');\n");
    }

    #[test]
    fn leaves_unknown_aliases_untouched() {
        let rewriter = AliasRewriter::new([("#shared".to_string(), "src/shared".to_string())]);
        assert!(rewriter.rewrite("require('#other/x.js');", ".").is_none());
    }
}
