//! Default-export collapsing.
//!
//! A CJS bundle of an ESM package whose whole surface is one default export
//! leaves consumers with `require("x").default`. This pass makes the value
//! itself the module export. The primary detection is structural: an export
//! table populated with a single `default` getter plus the finalize call
//! onto `module.exports`. A textual fallback covers the older
//! single-assignment idiom `exports.default = X;`. The fallback is anchored
//! to the start of the line so the bundler's internal module-wrapper
//! variables (`module2.exports.default`, `module3.exports.default`, ...)
//! are never rewritten.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::Fixer;

/// Population call carrying exactly one `default` getter.
static DEFAULT_ONLY_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)\b[A-Za-z_$][\w$]*\(\s*([A-Za-z_$][\w$]*),\s*\{\s*default:\s*\(\)\s*=>\s*([A-Za-z_$][\w$.]*),?\s*\}\s*\);",
    )
    .unwrap()
});

/// Bare `exports.default = X;` statement on its own line.
static TEXTUAL_DEFAULT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([ \t]*)exports\.default\s*=\s*([^;\n]+);").unwrap()
});

pub enum DefaultExportMatch {
    /// Table population plus finalize call, with the local identifier the
    /// default getter returns.
    Structural {
        population: Range<usize>,
        finalize: Range<usize>,
        local: String,
    },
    /// At least one bare `exports.default = X;` line.
    Textual,
}

/// Collapses a sole default export into the module export itself.
#[derive(Debug, Default)]
pub struct DefaultExportFixer;

impl DefaultExportFixer {
    pub fn new() -> Self {
        Self
    }
}

impl Fixer for DefaultExportFixer {
    type Match = DefaultExportMatch;

    fn name(&self) -> &'static str {
        "default-export"
    }

    fn detect(&self, content: &str) -> Option<DefaultExportMatch> {
        for caps in DEFAULT_ONLY_TABLE.captures_iter(content) {
            let table_ident = caps.get(1).unwrap().as_str();
            let local = caps.get(2).unwrap().as_str();

            let finalize = Regex::new(&format!(
                r"module\.exports\s*=\s*[A-Za-z_$][\w$]*\(\s*{}\s*\);",
                regex::escape(table_ident)
            ))
            .unwrap();
            if let Some(m) = finalize.find(content) {
                return Some(DefaultExportMatch::Structural {
                    population: caps.get(0).unwrap().range(),
                    finalize: m.range(),
                    local: local.to_string(),
                });
            }
        }

        TEXTUAL_DEFAULT
            .is_match(content)
            .then_some(DefaultExportMatch::Textual)
    }

    fn apply(&self, content: &str, matched: DefaultExportMatch) -> String {
        match matched {
            DefaultExportMatch::Structural { population, finalize, local } => {
                let assignment = format!("module.exports = {local};");
                // Spans never overlap; splice in ascending order.
                let (first, second, second_text): (&Range<usize>, &Range<usize>, &str) =
                    if population.start < finalize.start {
                        (&population, &finalize, &assignment)
                    } else {
                        (&finalize, &population, "")
                    };
                let first_text = if first == &population { "" } else { assignment.as_str() };

                let mut out = String::with_capacity(content.len());
                out.push_str(&content[..first.start]);
                out.push_str(first_text);
                let mut mid = &content[first.end..second.start];
                if first_text.is_empty() {
                    mid = mid.strip_prefix('\n').unwrap_or(mid);
                }
                out.push_str(mid);
                out.push_str(second_text);
                out.push_str(&content[second.end..]);
                out
            }
            DefaultExportMatch::Textual => TEXTUAL_DEFAULT
                .replace_all(content, |caps: &regex::Captures<'_>| {
                    format!("{}module.exports = {};", &caps[1], &caps[2])
                })
                .into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRUCTURAL: &str = r#"var src_exports = {};
__export(src_exports, {
  default: () => createClient
});
module.exports = __toCommonJS(src_exports);
function createClient(opts) { return opts; }
"#;

    #[test]
    fn collapses_structural_default_table() {
        let out = DefaultExportFixer::new().run(STRUCTURAL).unwrap();
        assert!(out.contains("module.exports = createClient;"));
        assert!(!out.contains("__export(src_exports"));
        assert!(!out.contains("__toCommonJS"));
    }

    #[test]
    fn rewrites_textual_single_assignment() {
        let source = "function make() {}\nexports.default = make;\n";
        let out = DefaultExportFixer::new().run(source).unwrap();
        assert_eq!(out, "function make() {}\nmodule.exports = make;\n");
    }

    #[test]
    fn leaves_module_wrapper_variables_alone() {
        // module2 is the bundler's wrapper for an inlined dependency; its
        // .default assignment is interior wiring, not the file's export.
        let source = "module2.exports.default = inner;\n";
        assert!(DefaultExportFixer::new().run(source).is_none());
    }

    #[test]
    fn ignores_multi_entry_tables() {
        let source = "__export(src_exports, {\n  default: () => a,\n  other: () => b\n});\nmodule.exports = __toCommonJS(src_exports);\n";
        // Not a sole default export and not a textual assignment.
        assert!(DefaultExportFixer::new().run(source).is_none());
    }

    #[test]
    fn is_idempotent() {
        let fixer = DefaultExportFixer::new();
        let once = fixer.run(STRUCTURAL).unwrap();
        assert!(fixer.run(&once).is_none());
    }
}
