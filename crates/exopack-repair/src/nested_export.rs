//! Nested export-assignment removal.
//!
//! When a scoped package is flattened, the bundler occasionally emits an
//! assignment through an inlined module wrapper of the exact shape
//! `module2.module.exports = <value>;`. The wrapper object has no `module`
//! property, so the statement throws at require time. The whole line is
//! deleted; no replacement is possible or needed.

use std::sync::LazyLock;

use regex::Regex;

use crate::Fixer;

static NESTED_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*module\d+\.module\.exports\s*=\s*[^\n]*;[ \t]*\n?").unwrap()
});

/// Deletes broken `moduleN.module.exports = ...;` lines.
#[derive(Debug, Default)]
pub struct NestedExportFixer;

impl NestedExportFixer {
    pub fn new() -> Self {
        Self
    }
}

impl Fixer for NestedExportFixer {
    type Match = ();

    fn name(&self) -> &'static str {
        "nested-export"
    }

    fn detect(&self, content: &str) -> Option<()> {
        NESTED_ASSIGNMENT.is_match(content).then_some(())
    }

    fn apply(&self, content: &str, (): ()) -> String {
        NESTED_ASSIGNMENT.replace_all(content, "").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deletes_the_broken_line() {
        let source = "var module2 = { exports: {} };\nmodule2.module.exports = wrapped;\nmodule.exports = real;\n";
        let out = NestedExportFixer::new().run(source).unwrap();
        assert_eq!(out, "var module2 = { exports: {} };\nmodule.exports = real;\n");
    }

    #[test]
    fn keeps_legitimate_export_assignments() {
        let source = "module.exports = real;\nmodule2.exports = inner;\n";
        assert!(NestedExportFixer::new().run(source).is_none());
    }

    #[test]
    fn is_idempotent() {
        let fixer = NestedExportFixer::new();
        let once = fixer
            .run("module12.module.exports = x;\nkeep();\n")
            .unwrap();
        assert_eq!(once, "keep();\n");
        assert!(fixer.run(&once).is_none());
    }
}
