//! The build driver.
//!
//! Stages run in a fixed order with hard barriers between them: every
//! package is bundled or copied first, auxiliary files are materialized
//! second, and the repair passes walk the finished tree last. Bundling is
//! awaited sequentially so log output follows manifest order.

use std::path::{Path, PathBuf};

use exopack_bundler::{BundleRequest, bundle_package};
use exopack_manifest::{Manifest, PackageSpec, package_specific_options};
use exopack_repair::{RepairStats, repair_tree};

use crate::materialize::{copy_local_files, copy_scoped_files};
use crate::outcome::{BuildTotals, PackageOutcome, fold_outcomes, overall_success};
use crate::reporter::Reporter;
use crate::Result;

/// Inputs for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Packages to process.
    pub manifest: Manifest,
    /// Directory containing the `node_modules` tree.
    pub root_dir: PathBuf,
    /// Directory holding hand-written shims and `.d.ts` declarations.
    pub shim_dir: PathBuf,
    /// Output tree for bundled and copied files.
    pub out_dir: PathBuf,
    /// Suppress skip notices for optional packages.
    pub quiet: bool,
}

/// Everything one run produced, success or not.
#[derive(Debug)]
pub struct BuildReport {
    /// Specifier and outcome for every manifest entry, in process order.
    pub outcomes: Vec<(String, PackageOutcome)>,
    /// Fold of the outcomes.
    pub totals: BuildTotals,
    /// Auxiliary files placed by the materializer.
    pub files_copied: usize,
    /// Repair-walk counters.
    pub repair: RepairStats,
}

impl BuildReport {
    /// True when no required package failed.
    pub fn success(&self) -> bool {
        overall_success(self.outcomes.iter().map(|(_, o)| o))
    }
}

/// Run the full pipeline: bundle/copy, materialize, repair.
///
/// Per-package failures land in the report's outcome list; only manifest
/// validation and infrastructure failures return `Err`. Callers decide the
/// process exit status from [`BuildReport::success`].
pub async fn run_pipeline(config: &PipelineConfig, reporter: &dyn Reporter) -> Result<BuildReport> {
    config.manifest.validate()?;
    std::fs::create_dir_all(&config.out_dir)?;

    let mut outcomes: Vec<(String, PackageOutcome)> = Vec::new();

    for spec in &config.manifest.flat {
        let out_file = config.out_dir.join(format!("{}.js", spec.name));
        let outcome = process_package(config, reporter, spec, &spec.name, out_file).await;
        outcomes.push((spec.name.clone(), outcome));
    }

    for group in &config.manifest.scoped {
        let scope_dir = config.out_dir.join(&group.scope);
        std::fs::create_dir_all(&scope_dir)?;

        for spec in &group.packages {
            let full_name = group.full_name(spec);
            let out_file = scope_dir.join(format!("{}.js", spec.name));
            let outcome = process_package(config, reporter, spec, &full_name, out_file).await;
            outcomes.push((full_name, outcome));
        }

        for subpath in &group.subpaths {
            let specifier = format!("{}/{}", group.scope, subpath);
            let out_file = scope_dir.join(subpath_output(subpath));
            let outcome = bundle_entry(config, reporter, &specifier, out_file, false).await;
            outcomes.push((specifier, outcome));
        }
    }

    reporter.step("materializing auxiliary files");
    // A project without shims simply has nothing to materialize.
    let files_copied = if config.shim_dir.is_dir() {
        let scopes: Vec<String> =
            config.manifest.scoped.iter().map(|g| g.scope.clone()).collect();
        copy_local_files(&config.shim_dir, &config.out_dir)?
            + copy_scoped_files(&config.shim_dir, &config.out_dir, &scopes)?
    } else {
        tracing::debug!(dir = %config.shim_dir.display(), "shim directory absent");
        0
    };

    reporter.step("repairing emitted files");
    let repair = repair_tree(&config.out_dir)?;

    let totals = fold_outcomes(outcomes.iter().map(|(_, o)| o));
    tracing::debug!(?totals, files_copied, "pipeline complete");

    Ok(BuildReport { outcomes, totals, files_copied, repair })
}

/// Bundle or copy one manifest entry according to its spec.
async fn process_package(
    config: &PipelineConfig,
    reporter: &dyn Reporter,
    spec: &PackageSpec,
    specifier: &str,
    out_file: PathBuf,
) -> PackageOutcome {
    if spec.bundle {
        bundle_entry(config, reporter, specifier, out_file, spec.optional).await
    } else {
        copy_shim(config, reporter, specifier, &out_file)
    }
}

/// Invoke the bundler for one entry, folding failure into an outcome.
async fn bundle_entry(
    config: &PipelineConfig,
    reporter: &dyn Reporter,
    specifier: &str,
    out_file: PathBuf,
    optional: bool,
) -> PackageOutcome {
    reporter.step(&format!("bundling {specifier}"));

    let request = BundleRequest::new(specifier, &config.root_dir, out_file)
        .with_out_root(&config.out_dir)
        .with_overrides(package_specific_options(specifier));

    match bundle_package(&request).await {
        Ok(Some(size)) => {
            reporter.success(&format!("{specifier} ({size} bytes)"));
            PackageOutcome::Bundled(size)
        }
        Ok(None) => PackageOutcome::Skipped("bundler produced no output".to_string()),
        Err(error) if optional => {
            if !config.quiet {
                reporter.log(&format!("skipping optional package {specifier}: {error}"));
            }
            PackageOutcome::Skipped(error.to_string())
        }
        Err(error) => {
            reporter.error(&format!("{specifier}: {error}"));
            PackageOutcome::Failed(error.to_string())
        }
    }
}

/// Copy a hand-written re-export shim verbatim.
fn copy_shim(
    config: &PipelineConfig,
    reporter: &dyn Reporter,
    specifier: &str,
    out_file: &Path,
) -> PackageOutcome {
    let source = config.shim_dir.join(format!("{specifier}.js"));
    match std::fs::copy(&source, out_file) {
        Ok(_) => {
            reporter.success(&format!("{specifier} (copied)"));
            PackageOutcome::Copied
        }
        Err(error) => {
            reporter.error(&format!("{specifier}: cannot copy shim: {error}"));
            PackageOutcome::Failed(format!("cannot copy shim from {}: {error}", source.display()))
        }
    }
}

/// Output path for a deep-export entry, relative to the scope directory.
/// Extensionless subpaths gain `.js` to match their emitted form.
fn subpath_output(subpath: &str) -> PathBuf {
    if Path::new(subpath).extension().is_some() {
        PathBuf::from(subpath)
    } else {
        PathBuf::from(format!("{subpath}.js"))
    }
}
