//! Command implementations.

mod bundle;
mod rewrite;

pub use bundle::execute as bundle_execute;
pub use rewrite::execute as rewrite_execute;
