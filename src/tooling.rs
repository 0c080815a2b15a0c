//! Tooling layer
//!
//! Command-line front end over the file manager store: argument parsing,
//! text rendering and the interactive browser.

pub mod browse;
pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
