//! Command-line interface definition.
//!
//! Built with clap v4 derive macros. Two subcommands:
//!
//! - `exopack bundle` - run the full vendoring pipeline
//! - `exopack rewrite` - point a consuming tree's imports at the vendor
//!   directory

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// exopack - vendor npm dependencies as standalone CommonJS modules
#[derive(Parser, Debug)]
#[command(
    name = "exopack",
    version,
    about = "Bundle external npm dependencies into standalone CommonJS files",
    long_about = "exopack bundles each configured npm package into a single\n\
                  self-contained CommonJS file, copies hand-written shims and\n\
                  type declarations, and repairs the emitted text so the output\n\
                  loads without node_modules."
)]
pub struct Cli {
    /// Enable verbose logging (debug level, per-package detail)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bundle every manifest package into the output directory
    Bundle(BundleArgs),

    /// Rewrite bare and #alias requires in a consuming source tree
    Rewrite(RewriteArgs),
}

#[derive(Args, Debug)]
pub struct BundleArgs {
    /// Directory containing the node_modules tree
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Output directory for bundled files
    #[arg(long, default_value = "vendor")]
    pub out: PathBuf,

    /// Directory holding hand-written shims and .d.ts declarations
    #[arg(long, default_value = "shims")]
    pub shims: PathBuf,

    /// Package manifest as JSON; the compiled-in manifest is used when
    /// omitted
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Remove the output directory before bundling
    #[arg(long)]
    pub clean: bool,
}

#[derive(Args, Debug)]
pub struct RewriteArgs {
    /// Root of the consuming source tree
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Vendor directory the rewrites point at (skipped during the walk)
    #[arg(long, default_value = "vendor")]
    pub vendor: PathBuf,

    /// Package manifest as JSON; the compiled-in manifest is used when
    /// omitted
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Alias mapping of the form '#name=relative/dir'; repeatable
    #[arg(long = "alias", value_parser = parse_alias)]
    pub aliases: Vec<(String, String)>,
}

/// Parse one `#alias=target/dir` pair.
fn parse_alias(value: &str) -> Result<(String, String), String> {
    let Some((alias, target)) = value.split_once('=') else {
        return Err(format!("expected '#alias=dir', got '{value}'"));
    };
    if !alias.starts_with('#') || target.is_empty() {
        return Err(format!("expected '#alias=dir', got '{value}'"));
    }
    Ok((alias.to_string(), target.to_string()))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bundle_defaults() {
        let cli = Cli::parse_from(["exopack", "bundle"]);
        let Command::Bundle(args) = cli.command else { panic!("expected bundle") };
        assert_eq!(args.root, PathBuf::from("."));
        assert_eq!(args.out, PathBuf::from("vendor"));
        assert_eq!(args.shims, PathBuf::from("shims"));
        assert!(!args.clean);
        assert!(args.manifest.is_none());
    }

    #[test]
    fn alias_pairs_parse() {
        let cli = Cli::parse_from([
            "exopack", "rewrite", "--alias", "#shared=src/shared", "--alias", "#gen=build/gen",
        ]);
        let Command::Rewrite(args) = cli.command else { panic!("expected rewrite") };
        assert_eq!(
            args.aliases,
            vec![
                ("#shared".to_string(), "src/shared".to_string()),
                ("#gen".to_string(), "build/gen".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_alias_is_rejected() {
        assert!(parse_alias("shared=src/shared").is_err());
        assert!(parse_alias("#shared").is_err());
        assert!(parse_alias("#shared=").is_err());
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["exopack", "-v", "-q", "bundle"]).is_err());
    }
}
