//! # exopack-manifest
//!
//! The package manifest for the external-dependency bundling pipeline.
//!
//! This crate holds the declarative list of npm packages that exopack turns
//! into standalone CommonJS modules, plus the small amount of hand-vetted
//! knowledge the bundler needs for packages with sharp edges:
//!
//! - [`Manifest`] / [`PackageSpec`] / [`ScopedGroup`] - which packages to
//!   bundle, which to copy verbatim, which may legitimately fail.
//! - [`package_specific_options`] - per-package bundler overrides (externals
//!   and compile-time defines) for packages known to need special handling.
//! - [`STUB_TABLE`] - module specifier patterns that are replaced with
//!   hand-written stub implementations at bundle time.
//! - [`FORCED_NODE_MODULES`] - packages that must resolve from the installed
//!   dependency tree to break a self-referential path-alias loop.
//!
//! Everything here is data plus pure functions; no I/O happens in this crate
//! apart from [`Manifest::from_file`], which deserializes a JSON manifest.

mod options;
mod spec;

pub use options::{VendorOverrides, package_specific_options};
pub use spec::{Manifest, PackageSpec, ScopedGroup, default_manifest};

/// Packages whose names are aliased to themselves in this project's module
/// resolution configuration. Bundling them without forcing resolution into
/// `node_modules` would recurse into the alias forever.
///
/// Keep this list short and hand-reviewed; it is a conservative allow-list,
/// never inferred from dependency metadata.
pub const FORCED_NODE_MODULES: &[&str] = &["shell-quote", "picomatch"];

/// Module specifier patterns that are replaced with stub implementations.
///
/// Each entry maps a regular expression over import specifiers to the name of
/// a stub source file shipped with the bundler crate. Only modules whose used
/// surface is small and fully understood belong here: a charset shim that
/// covers the encodings we actually decode, and a no-op `debug` logger.
pub const STUB_TABLE: &[(&str, &str)] = &[
    (r"^iconv-lite$", "iconv-lite.js"),
    (r"^debug$", "debug.js"),
];

/// Errors raised while loading or validating a manifest.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Manifest file could not be read.
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Manifest file is not valid JSON for the expected shape.
    #[error("failed to parse manifest {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A scoped group declares neither packages nor subpaths.
    #[error("scoped group '{0}' declares no packages and no subpaths")]
    EmptyScope(String),
}

/// Result type alias for manifest operations.
pub type Result<T> = std::result::Result<T, Error>;
