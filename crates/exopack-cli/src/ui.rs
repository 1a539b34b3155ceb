//! Terminal output helpers.
//!
//! Status messages go to stderr so stdout stays clean for piping. The
//! [`ConsoleReporter`] adapts these helpers to the pipeline's injected
//! logging capability.

use std::time::Duration;

use exopack_pipeline::Reporter;
use owo_colors::OwoColorize;

/// Configure global color handling from the `--no-color` flag and the
/// `NO_COLOR` convention.
pub fn init_colors(no_color: bool) {
    if no_color || std::env::var_os("NO_COLOR").is_some() {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
}

/// Print a success message to stderr.
pub fn success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), message);
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

/// Byte count with a binary-unit suffix, two decimals above bytes.
///
/// ```
/// use exopack_cli::ui::format_size;
///
/// assert_eq!(format_size(731), "731 B");
/// assert_eq!(format_size(2048), "2.00 KB");
/// assert_eq!(format_size(5_242_880), "5.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.2} {}", UNITS[unit])
    }
}

/// Elapsed time as milliseconds, fractional seconds, or minutes.
///
/// ```
/// use std::time::Duration;
/// use exopack_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(85)), "85ms");
/// assert_eq!(format_duration(Duration::from_millis(2250)), "2.25s");
/// assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let ms = duration.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}m {}s", duration.as_secs() / 60, duration.as_secs() % 60)
    }
}

/// Pipeline reporter backed by the terminal helpers.
///
/// `--quiet` reduces output to errors; `--verbose` adds per-package step
/// lines on top of the success/skip output.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    verbose: bool,
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }
}

impl Reporter for ConsoleReporter {
    fn step(&self, message: &str) {
        if self.verbose {
            info(message);
        }
    }

    fn success(&self, message: &str) {
        if !self.quiet {
            success(message);
        }
    }

    fn error(&self, message: &str) {
        error(message);
    }

    fn log(&self, message: &str) {
        if !self.quiet {
            warning(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_round_to_two_decimals() {
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.00 GB");
    }

    #[test]
    fn durations_pick_the_right_unit() {
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
        assert_eq!(format_duration(Duration::from_secs(61)), "1m 1s");
    }
}
