use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One bundlable unit: a flat npm package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
    /// Bare package name (`zod`) or, inside a [`ScopedGroup`], the name
    /// under the scope (`sdk` for `@modelcontextprotocol/sdk`).
    pub name: String,

    /// Whether to invoke the bundler. When `false`, a hand-written
    /// re-export shim with the same name is copied verbatim instead.
    #[serde(default = "default_true")]
    pub bundle: bool,

    /// Whether a bundling failure is tolerated. Optional packages that fail
    /// to resolve are logged and skipped; they never abort the build.
    #[serde(default)]
    pub optional: bool,
}

impl PackageSpec {
    /// A package that is bundled and required to succeed.
    pub fn bundled(name: impl Into<String>) -> Self {
        Self { name: name.into(), bundle: true, optional: false }
    }

    /// A hand-written shim copied verbatim, never bundled.
    pub fn copied(name: impl Into<String>) -> Self {
        Self { name: name.into(), bundle: false, optional: false }
    }

    /// A bundled package whose absence is tolerated.
    pub fn optional(name: impl Into<String>) -> Self {
        Self { name: name.into(), bundle: true, optional: true }
    }
}

/// A group of packages sharing an `@scope/` namespace.
///
/// The group's output lands under `<out>/<scope>/`. `subpaths` declares deep
/// exports (rooted at the scope, e.g. `sdk/client/stdio.js`) that are bundled
/// as independent entry points under the same directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedGroup {
    /// Scope including the `@` prefix, e.g. `@smithy`.
    pub scope: String,

    /// Packages under this scope.
    #[serde(default)]
    pub packages: Vec<PackageSpec>,

    /// Deep-export entry points, relative to the scope directory.
    #[serde(default)]
    pub subpaths: Vec<String>,
}

impl ScopedGroup {
    /// Full npm name (`@scope/name`) for a package in this group.
    pub fn full_name(&self, package: &PackageSpec) -> String {
        format!("{}/{}", self.scope, package.name)
    }
}

/// The declarative list of packages the pipeline processes.
///
/// Read-only for the duration of a build. The compiled-in
/// [`default_manifest`] is used unless the caller supplies a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Flat (unscoped) packages, processed in order.
    #[serde(default)]
    pub flat: Vec<PackageSpec>,

    /// Scoped groups, processed after the flat packages.
    #[serde(default)]
    pub scoped: Vec<ScopedGroup>,
}

impl Manifest {
    /// Load a manifest from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.display().to_string(),
            source,
        })?;
        let manifest: Manifest =
            serde_json::from_str(&text).map_err(|source| Error::Parse {
                path: path.display().to_string(),
                source,
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Reject structurally empty scoped groups.
    pub fn validate(&self) -> Result<()> {
        for group in &self.scoped {
            if group.packages.is_empty() && group.subpaths.is_empty() {
                return Err(Error::EmptyScope(group.scope.clone()));
            }
        }
        Ok(())
    }

    /// Every specifier the pipeline emits a file for: flat names, scoped
    /// `@scope/name` names, and `@scope/<subpath>` deep exports. This is
    /// the set the consumer-tree rewrite targets.
    pub fn specifiers(&self) -> Vec<String> {
        let mut out: Vec<String> = self.flat.iter().map(|p| p.name.clone()).collect();
        for group in &self.scoped {
            out.extend(group.packages.iter().map(|p| group.full_name(p)));
            out.extend(group.subpaths.iter().map(|s| format!("{}/{}", group.scope, s)));
        }
        out
    }

    /// Total number of package entries (flat + scoped + subpaths).
    pub fn entry_count(&self) -> usize {
        self.flat.len()
            + self
                .scoped
                .iter()
                .map(|g| g.packages.len() + g.subpaths.len())
                .sum::<usize>()
    }
}

fn default_true() -> bool {
    true
}

/// The compiled-in package manifest.
///
/// This is configuration data, not design: the set changes whenever the
/// surrounding tools pick up or drop a dependency.
pub fn default_manifest() -> Manifest {
    Manifest {
        flat: vec![
            PackageSpec::bundled("zod"),
            PackageSpec::bundled("picomatch"),
            PackageSpec::bundled("shell-quote"),
            PackageSpec::bundled("marked"),
            PackageSpec::bundled("diff"),
            PackageSpec::bundled("ws"),
            PackageSpec::bundled("moment"),
            PackageSpec::bundled("update-notifier"),
            // Hand-written re-export shim, copied as-is.
            PackageSpec::copied("proxy-from-env"),
            // Native module; absent on most build hosts.
            PackageSpec::optional("node-pty"),
        ],
        scoped: vec![
            ScopedGroup {
                scope: "@modelcontextprotocol".into(),
                packages: vec![PackageSpec::bundled("sdk")],
                subpaths: vec!["sdk/client/stdio.js".into()],
            },
            ScopedGroup {
                scope: "@smithy".into(),
                packages: vec![
                    PackageSpec::bundled("shared-ini-file-loader"),
                    PackageSpec::bundled("node-config-provider"),
                ],
                subpaths: vec![],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_manifest_is_valid() {
        let manifest = default_manifest();
        manifest.validate().unwrap();
        assert!(manifest.entry_count() > 10);
    }

    #[test]
    fn full_name_joins_scope_and_package() {
        let group = ScopedGroup {
            scope: "@smithy".into(),
            packages: vec![PackageSpec::bundled("node-config-provider")],
            subpaths: vec![],
        };
        assert_eq!(group.full_name(&group.packages[0]), "@smithy/node-config-provider");
    }

    #[test]
    fn specifiers_cover_flat_scoped_and_subpaths() {
        let specifiers = default_manifest().specifiers();
        assert!(specifiers.contains(&"zod".to_string()));
        assert!(specifiers.contains(&"@smithy/node-config-provider".to_string()));
        assert!(specifiers.contains(&"@modelcontextprotocol/sdk/client/stdio.js".to_string()));
    }

    #[test]
    fn manifest_loads_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("externals.json");
        std::fs::write(
            &path,
            r#"{
                "flat": [
                    { "name": "zod" },
                    { "name": "proxy-from-env", "bundle": false },
                    { "name": "node-pty", "optional": true }
                ],
                "scoped": [
                    { "scope": "@smithy", "packages": [{ "name": "shared-ini-file-loader" }] }
                ]
            }"#,
        )
        .unwrap();

        let manifest = Manifest::from_file(&path).unwrap();
        assert_eq!(manifest.flat.len(), 3);
        assert!(manifest.flat[0].bundle, "bundle defaults to true");
        assert!(!manifest.flat[1].bundle);
        assert!(manifest.flat[2].optional);
        assert_eq!(manifest.scoped[0].scope, "@smithy");
    }

    #[test]
    fn empty_scope_is_rejected() {
        let manifest = Manifest {
            flat: vec![],
            scoped: vec![ScopedGroup { scope: "@empty".into(), packages: vec![], subpaths: vec![] }],
        };
        assert!(matches!(manifest.validate(), Err(Error::EmptyScope(_))));
    }
}
