//! Root-level parent-require rewriting.
//!
//! Files sitting at the output root have no parent directory inside the
//! tree, so a surviving `require("../helpers")` can only have meant a
//! sibling. Single-hop parent references are folded to `./`; deeper hops
//! (`../../x`) are left untouched since no sibling interpretation exists
//! for them. The walker applies this pass to root-level files only.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::Fixer;

/// `require("../<something>")` where the path does not climb further.
static PARENT_REQUIRE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"require\((["'])\.\./([^.])"#).unwrap());

/// Folds `require("../x")` into `require("./x")` for root-level files.
#[derive(Debug, Default)]
pub struct RootRelativeFixer;

impl RootRelativeFixer {
    pub fn new() -> Self {
        Self
    }
}

impl Fixer for RootRelativeFixer {
    type Match = ();

    fn name(&self) -> &'static str {
        "root-relative"
    }

    fn detect(&self, content: &str) -> Option<()> {
        PARENT_REQUIRE.is_match(content).then_some(())
    }

    fn apply(&self, content: &str, (): ()) -> String {
        PARENT_REQUIRE
            .replace_all(content, |caps: &Captures<'_>| {
                format!("require({}./{}", &caps[1], &caps[2])
            })
            .into_owned()
    }
}
