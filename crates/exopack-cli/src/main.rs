//! exopack CLI entry point.
//!
//! Parses arguments, initializes logging and color handling, and dispatches
//! to the command implementations.

use clap::Parser;
use exopack_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Bundle(bundle_args) => {
            commands::bundle_execute(bundle_args, args.verbose, args.quiet).await
        }
        cli::Command::Rewrite(rewrite_args) => {
            commands::rewrite_execute(rewrite_args, args.quiet)
        }
    };

    result.map_err(error::cli_error_to_miette)
}
