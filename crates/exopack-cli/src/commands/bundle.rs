//! The `exopack bundle` command.

use std::time::Instant;

use exopack_manifest::{Manifest, default_manifest};
use exopack_pipeline::{PipelineConfig, run_pipeline};

use crate::cli::BundleArgs;
use crate::error::{CliError, Result};
use crate::ui::{self, ConsoleReporter};

/// Run the full vendoring pipeline.
///
/// 1. Load the manifest (JSON file or the compiled-in default)
/// 2. Optionally clean the output directory
/// 3. Bundle/copy every package, materialize auxiliary files, repair
/// 4. Print a summary and fail if any required package failed
pub async fn execute(args: BundleArgs, verbose: bool, quiet: bool) -> Result<()> {
    let start_time = Instant::now();

    let manifest = match &args.manifest {
        Some(path) => Manifest::from_file(path)?,
        None => default_manifest(),
    };
    tracing::debug!(entries = manifest.entry_count(), "manifest loaded");

    if args.clean && args.out.exists() {
        if !quiet {
            ui::info(&format!("cleaning {}", args.out.display()));
        }
        std::fs::remove_dir_all(&args.out)?;
    }

    let config = PipelineConfig {
        manifest,
        root_dir: args.root.clone(),
        shim_dir: args.shims.clone(),
        out_dir: args.out.clone(),
        quiet,
    };
    let reporter = ConsoleReporter::new(verbose, quiet);
    let report = run_pipeline(&config, &reporter).await?;

    if !quiet {
        ui::success(&format!(
            "{} bundled, {} copied, {} written in {}",
            report.totals.bundled,
            report.totals.copied + report.files_copied,
            ui::format_size(report.totals.total_size),
            ui::format_duration(start_time.elapsed()),
        ));
    }

    if report.success() {
        Ok(())
    } else {
        Err(CliError::BuildFailed { failed: report.totals.failed })
    }
}
