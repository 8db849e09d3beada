//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Construct the gateway, template, and orchestrator once per run
//! - Delegate to the mode handlers
//!
//! The CLI layer is thin: all release decisions live in
//! [`crate::core::version`] and [`crate::release`].

pub mod args;
pub mod commands;

pub use args::{Cli, Mode};

use anyhow::Result;

use crate::ui::output::Verbosity;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    commands::dispatch(cli, verbosity).await
}
