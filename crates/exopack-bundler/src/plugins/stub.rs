//! Stub substitution for modules whose real implementation is not wanted.
//!
//! Specifiers matching the manifest's stub table resolve to a synthetic
//! namespace keyed by the stub file name; the load hook then serves the
//! embedded stub source. Because substitution happens at resolve time it
//! applies to every import site, including nested and transitive ones.

use std::borrow::Cow;
use std::sync::LazyLock;

use anyhow::Context;
use exopack_manifest::STUB_TABLE;
use regex::Regex;
use rolldown_common::{ModuleType, ResolvedExternal};
use rolldown_plugin::{
    HookLoadArgs, HookLoadOutput, HookLoadReturn, HookResolveIdArgs, HookResolveIdOutput,
    HookResolveIdReturn, HookUsage, Plugin, PluginContext,
};

/// Marker prefix for stub module ids. The leading NUL keeps other plugins
/// and the default resolver from treating the id as a real path.
const STUB_PREFIX: &str = "\0exopack-stub:";

/// Stub sources embedded at compile time, keyed by stub file name.
///
/// `include_str!` makes the "every referenced stub exists" invariant a
/// compile-time guarantee.
static STUB_SOURCES: &[(&str, &str)] = &[
    ("iconv-lite.js", include_str!("../../stubs/iconv-lite.js")),
    ("debug.js", include_str!("../../stubs/debug.js")),
];

static COMPILED_TABLE: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    STUB_TABLE
        .iter()
        .map(|(pattern, file)| {
            let re = Regex::new(pattern).unwrap_or_else(|e| panic!("bad stub pattern {pattern}: {e}"));
            (re, *file)
        })
        .collect()
});

/// Look up an embedded stub source by file name.
pub fn stub_source(name: &str) -> Option<&'static str> {
    STUB_SOURCES
        .iter()
        .find(|(file, _)| *file == name)
        .map(|(_, source)| *source)
}

#[derive(Debug, Default, Clone)]
pub struct StubPlugin;

impl StubPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for StubPlugin {
    fn name(&self) -> Cow<'static, str> {
        "exopack:stubs".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::ResolveId | HookUsage::Load
    }

    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        let specifier = args.specifier.to_string();

        async move {
            for (pattern, file) in COMPILED_TABLE.iter() {
                if pattern.is_match(&specifier) {
                    tracing::debug!(specifier, stub = file, "substituting stub module");
                    return Ok(Some(HookResolveIdOutput {
                        id: format!("{STUB_PREFIX}{file}").into(),
                        external: Some(ResolvedExternal::Bool(false)),
                        ..Default::default()
                    }));
                }
            }
            Ok(None)
        }
    }

    fn load(
        &self,
        _ctx: &PluginContext,
        args: &HookLoadArgs<'_>,
    ) -> impl std::future::Future<Output = HookLoadReturn> + Send {
        let id = args.id.to_string();

        async move {
            let Some(name) = id.strip_prefix(STUB_PREFIX) else {
                return Ok(None);
            };

            let source = stub_source(name)
                .with_context(|| format!("no embedded stub source for {name}"))?;

            Ok(Some(HookLoadOutput {
                code: source.to_string().into(),
                module_type: Some(ModuleType::Js),
                ..Default::default()
            }))
        }
    }
}
