//! Bundler option assembly: externals, defines, and module resolution.

use std::path::Path;

use rolldown::{BundlerOptions, InputItem, IsExternal, OutputFormat, Platform, ResolveOptions};

/// Runtime built-ins provided by the host and therefore never inlined.
///
/// Both the bare and the `node:`-prefixed spellings are externalized.
pub const NODE_BUILTINS: &[&str] = &[
    "assert",
    "buffer",
    "child_process",
    "constants",
    "crypto",
    "dns",
    "events",
    "fs",
    "fs/promises",
    "http",
    "https",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "querystring",
    "readline",
    "stream",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "tls",
    "tty",
    "url",
    "util",
    "v8",
    "worker_threads",
    "zlib",
];

/// Compile-time constant substitutions applied to every bundled package.
///
/// These simulate a production Node environment so tree-shaking can remove
/// browser-only paths, debug logging, and test instrumentation.
pub fn default_defines() -> Vec<(String, String)> {
    let pairs: &[(&str, &str)] = &[
        ("process.env.NODE_ENV", "\"production\""),
        ("process.env.DEBUG", "undefined"),
        ("process.env.VERBOSE", "undefined"),
        ("process.env.NODE_TEST_CONTEXT", "undefined"),
        ("typeof window", "\"undefined\""),
        ("typeof document", "\"undefined\""),
        ("typeof navigator", "\"undefined\""),
        ("typeof localStorage", "\"undefined\""),
        ("typeof XMLHttpRequest", "\"undefined\""),
        ("typeof WebSocket", "\"undefined\""),
        ("typeof jest", "\"undefined\""),
        ("global.__coverage__", "undefined"),
    ];
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Build the Rolldown options for bundling one package entry.
///
/// Single entry, CJS output, Node platform, built-ins plus any per-package
/// externals kept external. Tree-shaking is Rolldown's default and stays on.
pub(crate) fn vendor_bundler_options(
    entry: &Path,
    root_dir: &Path,
    extra_externals: &[String],
) -> BundlerOptions {
    let mut externals: Vec<String> = Vec::with_capacity(NODE_BUILTINS.len() * 2);
    for builtin in NODE_BUILTINS {
        externals.push((*builtin).to_string());
        externals.push(format!("node:{builtin}"));
    }
    externals.extend(extra_externals.iter().cloned());

    let mut options = BundlerOptions {
        format: Some(OutputFormat::Cjs),
        platform: Some(Platform::Node),
        ..Default::default()
    };
    options.input = Some(vec![InputItem {
        name: None,
        import: entry.to_string_lossy().into_owned(),
    }]);
    options.external = Some(IsExternal::from(externals));
    options.cwd = Some(root_dir.to_path_buf());
    options.resolve = Some(configure_resolution(root_dir));
    options
}

/// Module resolution rooted at the installed-dependency tree.
///
/// Walks `node_modules` directories from the root upward, CommonJS-first
/// conditions since the output format is synchronous `require`.
fn configure_resolution(root_dir: &Path) -> ResolveOptions {
    let mut modules = Vec::new();
    let mut current = root_dir;
    loop {
        modules.push(current.join("node_modules").to_string_lossy().to_string());
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    modules.push("node_modules".to_string());

    ResolveOptions {
        main_fields: Some(vec!["main".to_string(), "module".to_string()]),
        condition_names: Some(vec![
            "require".to_string(),
            "node".to_string(),
            "default".to_string(),
        ]),
        extensions: Some(vec![
            ".js".to_string(),
            ".json".to_string(),
            ".cjs".to_string(),
            ".mjs".to_string(),
        ]),
        modules: Some(modules),
        symlinks: Some(true),
        ..Default::default()
    }
}
