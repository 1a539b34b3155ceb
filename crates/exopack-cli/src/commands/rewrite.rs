//! The `exopack rewrite` command.
//!
//! Applies the consumer-tree companion passes: bare requires of vendored
//! packages become relative paths into the vendor directory, and `#alias/*`
//! specifiers resolve against the tree root.

use exopack_manifest::{Manifest, default_manifest};
use exopack_repair::{RewriteConfig, rewrite_consumer_tree};

use crate::cli::RewriteArgs;
use crate::error::Result;
use crate::ui;

pub fn execute(args: RewriteArgs, quiet: bool) -> Result<()> {
    let manifest = match &args.manifest {
        Some(path) => Manifest::from_file(path)?,
        None => default_manifest(),
    };

    let vendor_dir = if args.vendor.is_absolute() {
        args.vendor.clone()
    } else {
        args.root.join(&args.vendor)
    };

    let config = RewriteConfig {
        root: args.root.clone(),
        vendor_dir,
        packages: manifest.specifiers(),
        aliases: args.aliases.clone(),
    };
    let stats = rewrite_consumer_tree(&config)?;

    if !quiet {
        ui::success(&format!(
            "rewrote {} of {} files",
            stats.files_changed, stats.files_scanned
        ));
    }
    Ok(())
}
