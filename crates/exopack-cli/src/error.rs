//! CLI error types and miette conversion.

use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Pipeline infrastructure failure (manifest, repair walk, I/O).
    #[error(transparent)]
    Pipeline(#[from] exopack_pipeline::Error),

    /// Manifest loading or validation failure.
    #[error(transparent)]
    Manifest(#[from] exopack_manifest::Error),

    /// Consumer-tree rewrite failure.
    #[error(transparent)]
    Rewrite(#[from] exopack_repair::Error),

    /// One or more required packages failed to bundle.
    #[error("{failed} required package(s) failed to bundle")]
    BuildFailed { failed: usize },

    /// I/O errors from file system operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Convert a [`CliError`] to a miette report for terminal display.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::BuildFailed { failed } => miette::miette!(
            "{failed} required package(s) failed to bundle; see errors above"
        ),
        other => miette::miette!("{other}"),
    }
}
