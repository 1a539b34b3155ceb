//! Export-table normalization.
//!
//! Minified CJS output registers exports through a helper pair: a population
//! call that fills a table with lazy getters, and a finalize call that wires
//! the table onto `module.exports`:
//!
//! ```text
//! __export(src_exports, {
//!   parse: () => parse,
//!   stringify: () => stringify2
//! });
//! module.exports = __toCommonJS(src_exports);
//! ```
//!
//! Getter-based exports defeat static `require` analysis in several loaders,
//! so this pass removes the population call and materializes an explicit
//! `module.exports = { ... }` assignment mapping each export name to its
//! local identifier. The assignment replaces the dead `0 && (module.exports
//! = { ... })` annotation stub when the bundler left one, and is appended to
//! the file otherwise.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::Fixer;

/// Helper call filling an export table with getter entries.
static POPULATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)\b[A-Za-z_$][\w$]*\(\s*([A-Za-z_$][\w$]*),\s*\{\s*([^{}]*?)\}\s*\);",
    )
    .unwrap()
});

/// One `name: () => local` getter entry inside the population object.
static ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z_$][\w$]*)\s*:\s*\(\)\s*=>\s*([A-Za-z_$][\w$.]*)").unwrap()
});

/// The dead `0 && (module.exports = { ... });` annotation stub.
static DEAD_STUB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)0\s*&&\s*\(module\.exports\s*=\s*\{[^{}]*\}\);").unwrap()
});

pub struct ExportTableMatch {
    /// Byte span of the population call statement.
    population: Range<usize>,
    /// Export name to local identifier, in source order.
    entries: Vec<(String, String)>,
}

/// Rewrites the two-call export idiom into an explicit export assignment.
#[derive(Debug, Default)]
pub struct ExportTableFixer;

impl ExportTableFixer {
    pub fn new() -> Self {
        Self
    }
}

impl Fixer for ExportTableFixer {
    type Match = ExportTableMatch;

    fn name(&self) -> &'static str {
        "export-table"
    }

    fn detect(&self, content: &str) -> Option<ExportTableMatch> {
        for caps in POPULATION.captures_iter(content) {
            let table_ident = caps.get(1).unwrap().as_str();
            let body = caps.get(2).unwrap().as_str();

            let entries: Vec<(String, String)> = ENTRY
                .captures_iter(body)
                .map(|e| (e[1].to_string(), e[2].to_string()))
                .collect();
            if entries.is_empty() || !body_is_only_entries(body) {
                continue;
            }
            // A table holding nothing but a default getter belongs to the
            // default-collapsing pass, which runs after this one.
            if entries.len() == 1 && entries[0].0 == "default" {
                continue;
            }

            // Only the table the file actually finalizes onto
            // module.exports is an export table.
            let finalize = Regex::new(&format!(
                r"module\.exports\s*=\s*[A-Za-z_$][\w$]*\(\s*{}\s*\);",
                regex::escape(table_ident)
            ))
            .unwrap();
            if !finalize.is_match(content) {
                continue;
            }

            let whole = caps.get(0).unwrap();
            return Some(ExportTableMatch {
                population: whole.range(),
                entries,
            });
        }
        None
    }

    fn apply(&self, content: &str, matched: ExportTableMatch) -> String {
        let mut out = String::with_capacity(content.len());
        out.push_str(&content[..matched.population.start]);
        let mut rest = &content[matched.population.end..];
        if let Some(stripped) = rest.strip_prefix('\n') {
            rest = stripped;
        }
        out.push_str(rest);

        let assignment = render_assignment(&matched.entries);
        if let Some(stub) = DEAD_STUB.find(&out) {
            let mut replaced = String::with_capacity(out.len() + assignment.len());
            replaced.push_str(&out[..stub.start()]);
            replaced.push_str(&assignment);
            replaced.push_str(&out[stub.end()..]);
            replaced
        } else {
            append_statement(&out, &assignment)
        }
    }
}

/// True when the population body contains nothing but getter entries, so an
/// arbitrary two-argument call carrying an object literal is not mistaken
/// for an export table.
fn body_is_only_entries(body: &str) -> bool {
    let stripped = ENTRY.replace_all(body, "");
    stripped.chars().all(|c| c.is_whitespace() || c == ',')
}

fn render_assignment(entries: &[(String, String)]) -> String {
    let mut out = String::from("module.exports = {\n");
    for (name, local) in entries {
        out.push_str("  ");
        out.push_str(name);
        out.push_str(": ");
        out.push_str(local);
        out.push_str(",\n");
    }
    out.push_str("};");
    out
}

/// Append a statement at the end of the file, before any trailing source-map
/// comment.
fn append_statement(content: &str, statement: &str) -> String {
    if let Some(pos) = content.rfind("//# sourceMappingURL=") {
        let (head, tail) = content.split_at(pos);
        format!("{}{}\n{}", head, statement, tail)
    } else {
        let mut out = content.to_string();
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(statement);
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIFIED: &str = r#"var src_exports = {};
__export(src_exports, {
  parse: () => parse,
  stringify: () => stringify2
});
module.exports = __toCommonJS(src_exports);
function parse(s) { return s; }
function stringify2(v) { return String(v); }
0 && (module.exports = {
  parse,
  stringify
});
"#;

    #[test]
    fn replaces_dead_stub_with_explicit_table() {
        let fixer = ExportTableFixer::new();
        let out = fixer.run(MINIFIED).unwrap();

        assert!(!out.contains("__export(src_exports"));
        assert!(out.contains("module.exports = {\n  parse: parse,\n  stringify: stringify2,\n};"));
        // The finalize call is untouched; the explicit table overrides it.
        assert!(out.contains("module.exports = __toCommonJS(src_exports);"));
    }

    #[test]
    fn appends_when_no_dead_stub_exists() {
        let source = r#"var lib_exports = {};
__export(lib_exports, {
  run: () => run
});
module.exports = __toCommonJS(lib_exports);
function run() {}
"#;
        let fixer = ExportTableFixer::new();
        let out = fixer.run(source).unwrap();
        assert!(out.trim_end().ends_with("module.exports = {\n  run: run,\n};"));
    }

    #[test]
    fn keeps_assignment_before_sourcemap_comment() {
        let source = "var m_exports = {};\n__export(m_exports, {\n  a: () => a\n});\nmodule.exports = __toCommonJS(m_exports);\nvar a = 1;\n//# sourceMappingURL=m.js.map\n";
        let fixer = ExportTableFixer::new();
        let out = fixer.run(source).unwrap();
        let table_pos = out.find("module.exports = {\n  a: a,").unwrap();
        let map_pos = out.find("//# sourceMappingURL").unwrap();
        assert!(table_pos < map_pos);
    }

    #[test]
    fn is_idempotent() {
        let fixer = ExportTableFixer::new();
        let once = fixer.run(MINIFIED).unwrap();
        assert!(fixer.run(&once).is_none());
    }

    #[test]
    fn ignores_tables_never_finalized_onto_exports() {
        // Same getter shape, but the object never reaches module.exports.
        let source = "__export(helpers, {\n  x: () => x\n});\nmodule.exports = other;\n";
        assert!(ExportTableFixer::new().run(source).is_none());
    }

    #[test]
    fn leaves_sole_default_tables_for_the_default_pass() {
        let source = "__export(src_exports, {\n  default: () => impl\n});\nmodule.exports = __toCommonJS(src_exports);\n";
        assert!(ExportTableFixer::new().run(source).is_none());
    }

    #[test]
    fn ignores_plain_two_argument_calls() {
        let source = "configure(app, { port: 8080 });\nmodule.exports = app;\n";
        assert!(ExportTableFixer::new().run(source).is_none());
    }
}
