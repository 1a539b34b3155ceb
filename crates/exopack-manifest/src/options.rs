use serde::{Deserialize, Serialize};

/// Per-package bundler option overrides.
///
/// Merged on top of the bundler's defaults for the one package being bundled.
/// An empty value means "no special handling".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorOverrides {
    /// Additional import specifiers left external (not inlined).
    #[serde(default)]
    pub externals: Vec<String>,

    /// Additional compile-time constant substitutions, as
    /// `(token, replacement JS expression)` pairs.
    #[serde(default)]
    pub defines: Vec<(String, String)>,
}

impl VendorOverrides {
    fn externals(externals: &[&str]) -> Self {
        Self {
            externals: externals.iter().map(|s| s.to_string()).collect(),
            defines: Vec::new(),
        }
    }

    fn defines(defines: &[(&str, &str)]) -> Self {
        Self {
            externals: Vec::new(),
            defines: defines
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Reduce a specifier to its package name.
///
/// Scoped names keep two segments, bare names one, so a deep export like
/// `@scope/name/lib/x` looks up overrides as `@scope/name`.
fn package_name(specifier: &str) -> &str {
    let segments = if specifier.starts_with('@') { 2 } else { 1 };
    let mut end = 0;
    for _ in 0..segments {
        match specifier[end..].find('/') {
            Some(offset) => end += offset + 1,
            None => return specifier,
        }
    }
    &specifier[..end - 1]
}

/// Bundler overrides for packages known to need special handling.
///
/// Pure function over the package name or any deeper specifier into it;
/// subpath entry points inherit their parent package's overrides. Unknown
/// names get empty overrides. Each case encodes one hand-verified fact
/// about the package:
///
/// - `update-notifier` would phone home at require time; pinning its opt-out
///   environment flag lets tree-shaking drop the network path entirely.
/// - `moment` ships locale data we never load; leaving the locale directory
///   external keeps half a megabyte out of the bundle.
/// - `ws` declares native peer dependencies that are optional at runtime and
///   must not be resolved at bundle time.
/// - `@smithy/node-config-provider` requires its sibling loader package,
///   which in turn is bundled on its own; inlining it here would duplicate
///   the module and re-create the circular reference.
/// - `@modelcontextprotocol/sdk` reads `import.meta.url`, which does not
///   exist in CommonJS output; substitute the equivalent `__filename`
///   expression at build time.
pub fn package_specific_options(name: &str) -> VendorOverrides {
    match package_name(name) {
        "update-notifier" => {
            VendorOverrides::defines(&[("process.env.NO_UPDATE_NOTIFIER", "\"1\"")])
        }
        "moment" => VendorOverrides::externals(&["./locale"]),
        "ws" => VendorOverrides::externals(&["bufferutil", "utf-8-validate"]),
        "@smithy/node-config-provider" => {
            VendorOverrides::externals(&["@smithy/shared-ini-file-loader"])
        }
        "@modelcontextprotocol/sdk" => VendorOverrides::defines(&[(
            "import.meta.url",
            "require(\"url\").pathToFileURL(__filename).href",
        )]),
        _ => VendorOverrides::default(),
    }
}
