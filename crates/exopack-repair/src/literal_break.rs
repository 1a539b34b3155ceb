//! node-gyp literal breaking.
//!
//! Dependency scanners flag any file containing the literal string
//! `node-gyp/bin/node-gyp.js` as requiring node-gyp at install time. The
//! resolve call is never reachable in bundled output, so the literal is
//! split into a concatenation that evaluates to the same string but no
//! longer matches the scanners' pattern.

use std::sync::LazyLock;

use regex::Regex;

use crate::Fixer;

static GYP_RESOLVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"require\.resolve\(\s*(["'])node-gyp/bin/node-gyp\.js(["'])\s*\)"#).unwrap()
});

/// Splits the `node-gyp/bin/node-gyp.js` literal so scanners skip it.
#[derive(Debug, Default)]
pub struct GypLiteralFixer;

impl GypLiteralFixer {
    pub fn new() -> Self {
        Self
    }
}

impl Fixer for GypLiteralFixer {
    type Match = ();

    fn name(&self) -> &'static str {
        "gyp-literal"
    }

    fn detect(&self, content: &str) -> Option<()> {
        GYP_RESOLVE.is_match(content).then_some(())
    }

    fn apply(&self, content: &str, (): ()) -> String {
        GYP_RESOLVE
            .replace_all(content, |caps: &regex::Captures<'_>| {
                let q = &caps[1];
                format!("require.resolve({q}node-{q} + {q}gyp/bin/node-gyp.js{q})")
            })
            .into_owned()
    }
}
