//! Library surface of the exopack CLI.
//!
//! Split from `main.rs` so integration tests can exercise argument parsing,
//! logging setup, and command plumbing directly.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;
