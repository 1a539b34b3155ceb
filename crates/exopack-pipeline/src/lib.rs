//! # exopack-pipeline
//!
//! Drives a full vendoring build: bundle every manifest package (or copy
//! its hand-written shim), materialize auxiliary files into the output
//! tree, then run the text-repair passes over everything emitted.
//!
//! Per-package failures are captured as [`PackageOutcome`] values rather
//! than bubbling out of the loop; whether the build as a whole succeeded is
//! a pure function over the collected outcomes ([`overall_success`]), so
//! the optional-versus-required policy is testable without a bundler run.
//! Only infrastructure failures (output directory creation, the repair
//! walk) abort [`run_pipeline`] itself.

mod materialize;
mod orchestrator;
mod outcome;
mod reporter;

pub use materialize::{copy_local_files, copy_recursive, copy_scoped_files};
pub use orchestrator::{BuildReport, PipelineConfig, run_pipeline};
pub use outcome::{BuildTotals, PackageOutcome, fold_outcomes, overall_success};
pub use reporter::{NullReporter, Reporter};

/// Errors that abort a pipeline run.
///
/// Package-level bundling failures never appear here; they are folded into
/// the run's [`PackageOutcome`] list instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Manifest failed validation or could not be loaded.
    #[error(transparent)]
    Manifest(#[from] exopack_manifest::Error),

    /// The post-bundle repair walk failed.
    #[error(transparent)]
    Repair(#[from] exopack_repair::Error),

    /// Filesystem failure outside any single package's bundling.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk failure during materialization.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
