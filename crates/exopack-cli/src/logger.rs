//! Logging setup for the exopack CLI.
//!
//! Structured logging via the `tracing` ecosystem. Verbosity order:
//! `--verbose` (debug for exopack crates), then `--quiet` (errors only),
//! then `RUST_LOG`, then info-level default.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Crate targets covered by the verbosity flags. Tracing targets use the
/// crate name with underscores, not the package name.
const CRATE_TARGETS: &[&str] = &[
    "exopack_cli",
    "exopack_pipeline",
    "exopack_bundler",
    "exopack_repair",
    "exopack_manifest",
];

fn log_filter(verbose: bool, quiet: bool) -> EnvFilter {
    let directives = |level: &str| {
        CRATE_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    };

    if verbose {
        EnvFilter::new(directives("debug"))
    } else if quiet {
        EnvFilter::new(directives("error"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives("info")))
    }
}

/// Initialize the global tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = log_filter(verbose, quiet);

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_filter_names_every_crate_target() {
        let directives = log_filter(false, true).to_string();
        for target in CRATE_TARGETS {
            assert!(
                directives.contains(&format!("{target}=error")),
                "missing {target} in {directives}"
            );
        }
    }

    #[test]
    fn verbose_filter_enables_debug_for_every_crate_target() {
        let directives = log_filter(true, false).to_string();
        for target in CRATE_TARGETS {
            assert!(directives.contains(&format!("{target}=debug")));
        }
    }
}
