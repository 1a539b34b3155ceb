//! # exopack-bundler
//!
//! Single-package bundling on top of Rolldown.
//!
//! Given one npm package (or a deep `scope/name/subpath` export) and an
//! installed dependency tree, [`bundle_package`] produces exactly one
//! self-contained CommonJS file: Node built-ins stay external, everything
//! else is inlined, and dead code is eliminated through compile-time
//! constant substitution.
//!
//! Three plugins shape resolution and loading:
//!
//! - [`plugins::ForcedNodeModulesPlugin`] resolves a fixed allow-list of
//!   packages straight out of `node_modules`, breaking self-referential
//!   path-alias loops without changing bundling semantics.
//! - [`plugins::StubPlugin`] substitutes hand-written stub sources for a
//!   small set of module specifiers, at every import depth.
//! - [`plugins::DefinePlugin`] replaces known constant expressions
//!   (`process.env.NODE_ENV`, `typeof window`, ...) so the bundler can
//!   prove browser-only and debug-only paths unreachable.
//!
//! ```no_run
//! use exopack_bundler::{BundleRequest, bundle_package};
//! use exopack_manifest::package_specific_options;
//!
//! # #[tokio::main]
//! # async fn main() -> exopack_bundler::Result<()> {
//! let request = BundleRequest::new("zod", "/repo", "/repo/vendor/zod.js")
//!     .with_overrides(package_specific_options("zod"));
//! if let Some(bytes) = bundle_package(&request).await? {
//!     println!("zod.js: {bytes} bytes");
//! }
//! # Ok(()) }
//! ```

mod bundle;
mod entry;
mod options;
pub mod plugins;
mod writer;

pub use bundle::{BundleRequest, bundle_package};
pub use entry::resolve_entry;
pub use options::{NODE_BUILTINS, default_defines};
pub use writer::write_bundle_file;

/// Error types for exopack-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Package entry point could not be located under `node_modules`.
    #[error("cannot resolve package '{specifier}' under {root}")]
    PackageNotFound { specifier: String, root: String },

    /// Error from the Rolldown bundler.
    #[error("bundler error for '{specifier}': {message}")]
    Bundler { specifier: String, message: String },

    /// Output path escapes the output directory.
    #[error("invalid output path: {0}")]
    InvalidOutputPath(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for exopack-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn bundler(specifier: &str, error: &dyn std::fmt::Debug) -> Self {
        Error::Bundler {
            specifier: specifier.to_string(),
            message: format!("{error:?}"),
        }
    }
}
