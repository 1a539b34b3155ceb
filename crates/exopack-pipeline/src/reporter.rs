//! Injected logging capability.
//!
//! The pipeline reports progress through a capability object instead of
//! writing to process streams, so orchestration logic is testable without
//! capturing stdio. The CLI supplies a colored terminal implementation;
//! tests supply recorders.

/// Build progress sink.
pub trait Reporter: Send + Sync {
    /// A stage or package is starting.
    fn step(&self, message: &str);

    /// A package or stage finished successfully.
    fn success(&self, message: &str);

    /// A fatal or per-package error.
    fn error(&self, message: &str);

    /// Informational output (skip notices, summaries).
    fn log(&self, message: &str);
}

/// Discards everything. Used by tests and quiet non-terminal callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn step(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
    fn log(&self, _message: &str) {}
}
