//! # exopack-repair
//!
//! Post-bundle text repair for the vendored-module output tree.
//!
//! The bundler's CommonJS output is correct but carries minifier idioms and
//! flattening artifacts that trip downstream loaders and static analyzers.
//! This crate applies a fixed, ordered sequence of independent, idempotent
//! text transforms to every emitted `.js` file:
//!
//! 1. [`ExportTableFixer`] - turn the minified two-call export idiom into an
//!    explicit `module.exports = { ... }` assignment.
//! 2. [`DefaultExportFixer`] - collapse single-default-export wrappers so
//!    the module's export is the value itself, no `.default` hop.
//! 3. [`NestedExportFixer`] - delete the always-broken
//!    `module2.module.exports = ...` artifact of scoped-package bundling.
//! 4. [`RootRelativeFixer`] - rewrite `require("../x")` to `require("./x")`
//!    in files at the output root, where no parent directory exists.
//! 5. [`GypLiteralFixer`] - break the `node-gyp/bin/node-gyp.js` literal so
//!    dependency scanners do not flag consumers as needing node-gyp.
//!
//! Two companion rewrites serve the consuming tree rather than the vendor
//! output: [`rewrite::ExternalRequireRewriter`] points bare requires of
//! bundled packages at the vendor directory, and [`rewrite::AliasRewriter`]
//! resolves internal `#alias/*` specifiers to relative paths.
//!
//! Every pass is a strict no-op when its target pattern is absent, and
//! files are rewritten on disk only when at least one pass matched.

mod default_export;
mod export_table;
mod literal_break;
mod nested_export;
mod relative_imports;
pub mod rewrite;
mod walk;

pub use default_export::DefaultExportFixer;
pub use export_table::ExportTableFixer;
pub use literal_break::GypLiteralFixer;
pub use nested_export::NestedExportFixer;
pub use relative_imports::RootRelativeFixer;
pub use walk::{RepairStats, RewriteConfig, repair_content, repair_tree, rewrite_consumer_tree};

/// Errors raised while repairing emitted files.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying filesystem failure; traversal errors other than
    /// "not found" indicate an environment problem and propagate.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk failure.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type alias for repair operations.
pub type Result<T> = std::result::Result<T, Error>;

/// One best-effort text repair heuristic.
///
/// `detect` either finds the pass's target pattern (returning whatever
/// evidence `apply` needs) or reports a clean miss; `apply` performs the
/// rewrite. The provided [`Fixer::run`] combines the two into the
/// "rewritten content or no-op" shape the tree walker consumes. Keeping
/// detection separate lets each heuristic be unit-tested against literal
/// before/after fixtures, independent of the bundler that produced them.
pub trait Fixer {
    /// Evidence gathered by detection, consumed by application.
    type Match;

    /// Stable identifier used in debug logging.
    fn name(&self) -> &'static str;

    /// Find the target pattern, or `None` when this pass is a no-op.
    fn detect(&self, content: &str) -> Option<Self::Match>;

    /// Rewrite `content` using the detected match.
    fn apply(&self, content: &str, matched: Self::Match) -> String;

    /// Detect and apply in one step; `None` means "unchanged".
    fn run(&self, content: &str) -> Option<String> {
        let matched = self.detect(content)?;
        let rewritten = self.apply(content, matched);
        tracing::debug!(fixer = self.name(), "repair pass matched");
        Some(rewritten)
    }
}
