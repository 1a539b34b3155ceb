//! One-package bundler invocation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use exopack_manifest::VendorOverrides;
use rolldown::BundlerBuilder;
use rolldown_common::Output;
use rolldown_plugin::__inner::SharedPluginable;

use crate::entry::resolve_entry;
use crate::options::{default_defines, vendor_bundler_options};
use crate::plugins::{DefinePlugin, ForcedNodeModulesPlugin, StubPlugin};
use crate::writer::write_bundle_file;
use crate::{Error, Result};

/// Everything needed to bundle one package entry into one output file.
#[derive(Debug, Clone)]
pub struct BundleRequest {
    /// Package name or `scope/name/subpath` deep export.
    pub specifier: String,

    /// Root directory containing the `node_modules` tree.
    pub root_dir: PathBuf,

    /// Output root; `out_file` must stay inside it.
    pub out_root: PathBuf,

    /// Absolute or out_root-relative path of the emitted file.
    pub out_file: PathBuf,

    /// Package-specific option overrides.
    pub overrides: VendorOverrides,
}

impl BundleRequest {
    pub fn new(
        specifier: impl Into<String>,
        root_dir: impl Into<PathBuf>,
        out_file: impl Into<PathBuf>,
    ) -> Self {
        let out_file = out_file.into();
        let out_root = out_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            specifier: specifier.into(),
            root_dir: root_dir.into(),
            out_root,
            out_file,
            overrides: VendorOverrides::default(),
        }
    }

    /// Widen the output containment root (for nested scope directories).
    pub fn with_out_root(mut self, out_root: impl Into<PathBuf>) -> Self {
        self.out_root = out_root.into();
        self
    }

    pub fn with_overrides(mut self, overrides: VendorOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Bundle one package into a single self-contained CommonJS file.
///
/// Returns the number of bytes written, or `None` when the bundler produced
/// no output chunk (an empty or already-satisfied target); `None` must not
/// be counted as a bundled package. Resolution and compile errors surface as
/// [`Error::Bundler`] and are the caller's to tolerate or propagate.
pub async fn bundle_package(request: &BundleRequest) -> Result<Option<u64>> {
    let entry = resolve_entry(&request.root_dir, &request.specifier)?;
    tracing::debug!(specifier = %request.specifier, entry = %entry.display(), "bundling package");

    let options = vendor_bundler_options(&entry, &request.root_dir, &request.overrides.externals);

    let mut defines = default_defines();
    defines.extend(request.overrides.defines.iter().cloned());

    let plugins: Vec<SharedPluginable> = vec![
        Arc::new(ForcedNodeModulesPlugin::new(&request.root_dir)),
        Arc::new(StubPlugin::new()),
        Arc::new(DefinePlugin::new(defines)),
    ];

    let mut bundler = BundlerBuilder::default()
        .with_options(options)
        .with_plugins(plugins)
        .build()
        .map_err(|e| Error::bundler(&request.specifier, &e))?;

    let bundle = bundler
        .generate()
        .await
        .map_err(|e| Error::bundler(&request.specifier, &e))?;

    let Some(code) = first_chunk_code(&bundle.assets) else {
        tracing::debug!(specifier = %request.specifier, "bundler produced no output");
        return Ok(None);
    };

    let size = write_bundle_file(&request.out_root, &request.out_file, code)?;
    Ok(Some(size))
}

/// Pull the emitted module code out of the bundler output.
///
/// A single-entry CJS build emits exactly one chunk; empty chunks count as
/// "nothing produced".
fn first_chunk_code(assets: &[Output]) -> Option<&str> {
    for output in assets {
        if let Output::Chunk(chunk) = output {
            if !chunk.code.is_empty() {
                return Some(&chunk.code);
            }
        }
    }
    None
}
