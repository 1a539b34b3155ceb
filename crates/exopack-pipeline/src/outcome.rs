//! Per-package outcomes and their reduction.
//!
//! Each processed package yields exactly one [`PackageOutcome`]; the driver
//! folds the list into [`BuildTotals`] and decides success with
//! [`overall_success`]. Keeping the policy a pure function over the outcome
//! list means the optional-versus-required rules need no bundler to test.

/// What happened to one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOutcome {
    /// Bundled successfully; holds the bytes written.
    Bundled(u64),
    /// Hand-written shim copied verbatim.
    Copied,
    /// Tolerated absence: an optional package failed, or the bundler
    /// produced no output. Excluded from totals, never fails the build.
    Skipped(String),
    /// A required package failed. The build as a whole is failed, though
    /// remaining packages are still processed for complete reporting.
    Failed(String),
}

/// Aggregate counters over one build.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildTotals {
    /// Packages bundled.
    pub bundled: usize,
    /// Shims copied.
    pub copied: usize,
    /// Skipped entries (optional failures, empty output).
    pub skipped: usize,
    /// Required failures.
    pub failed: usize,
    /// Total bytes across all bundled files.
    pub total_size: u64,
}

/// Reduce outcomes to totals.
pub fn fold_outcomes<'a, I>(outcomes: I) -> BuildTotals
where
    I: IntoIterator<Item = &'a PackageOutcome>,
{
    let mut totals = BuildTotals::default();
    for outcome in outcomes {
        match outcome {
            PackageOutcome::Bundled(size) => {
                totals.bundled += 1;
                totals.total_size += size;
            }
            PackageOutcome::Copied => totals.copied += 1,
            PackageOutcome::Skipped(_) => totals.skipped += 1,
            PackageOutcome::Failed(_) => totals.failed += 1,
        }
    }
    totals
}

/// A build succeeds exactly when no required package failed.
pub fn overall_success<'a, I>(outcomes: I) -> bool
where
    I: IntoIterator<Item = &'a PackageOutcome>,
{
    !outcomes
        .into_iter()
        .any(|o| matches!(o, PackageOutcome::Failed(_)))
}
