//! Compile-time constant substitution.
//!
//! Replaces known constant expressions in module source before bundling so
//! Rolldown's tree-shaking can prove branches dead. Two token shapes are
//! supported: member chains (`process.env.NODE_ENV`) and `typeof` probes
//! (`typeof window`). Like every define mechanism this is a token-level
//! rewrite, not a scope-aware one.

use std::borrow::Cow;
use std::sync::Arc;

use regex::{NoExpand, Regex};
use rolldown_common::ModuleType;
use rolldown_plugin::{
    HookTransformArgs, HookTransformOutput, HookTransformReturn, HookUsage, Plugin,
    SharedTransformPluginContext,
};

#[derive(Debug)]
pub struct DefinePlugin {
    replacements: Arc<Vec<(Regex, String)>>,
}

impl DefinePlugin {
    pub fn new(defines: Vec<(String, String)>) -> Self {
        let replacements = defines
            .into_iter()
            .map(|(token, value)| (compile_token(&token), value))
            .collect();
        Self { replacements: Arc::new(replacements) }
    }
}

/// Compile a define token to an anchored regex.
///
/// `typeof foo` tolerates arbitrary whitespace between the keyword and the
/// identifier; member chains are matched literally with word boundaries on
/// both ends so `process.env.NODE_ENV2` is left alone.
fn compile_token(token: &str) -> Regex {
    let pattern = match token.strip_prefix("typeof ") {
        Some(ident) => format!(r"\btypeof\s+{}\b", regex::escape(ident.trim())),
        None => format!(r"\b{}\b", regex::escape(token)),
    };
    Regex::new(&pattern).unwrap_or_else(|e| panic!("bad define token {token}: {e}"))
}

/// Apply a compiled replacement table to one module's source.
///
/// Returns `None` when nothing matched so callers can skip the rewrite.
fn apply_defines(code: &str, replacements: &[(Regex, String)]) -> Option<String> {
    let mut current = Cow::Borrowed(code);
    let mut changed = false;
    for (pattern, value) in replacements {
        if pattern.is_match(&current) {
            current = Cow::Owned(pattern.replace_all(&current, NoExpand(value)).into_owned());
            changed = true;
        }
    }
    changed.then(|| current.into_owned())
}

impl Plugin for DefinePlugin {
    fn name(&self) -> Cow<'static, str> {
        "exopack:define".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::Transform
    }

    fn transform(
        &self,
        _ctx: SharedTransformPluginContext,
        args: &HookTransformArgs<'_>,
    ) -> impl std::future::Future<Output = HookTransformReturn> + Send {
        let code = args.code.to_string();
        let module_type = args.module_type.clone();
        let replacements = Arc::clone(&self.replacements);

        async move {
            if !matches!(module_type, ModuleType::Js | ModuleType::Jsx | ModuleType::Ts | ModuleType::Tsx) {
                return Ok(None);
            }

            match apply_defines(&code, &replacements) {
                Some(rewritten) => Ok(Some(HookTransformOutput {
                    code: Some(rewritten),
                    map: None,
                    side_effects: None,
                    module_type: None,
                })),
                None => Ok(None),
            }
        }
    }
}
