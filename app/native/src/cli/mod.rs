//! CLI module for Homescreen.
//!
//! `homescreen run` serves the message bus on stdin/stdout. The other
//! commands work directly on the wallpaper collection and configuration,
//! without a running event loop.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::HomescreenError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), HomescreenError> {
    let cli = Cli::parse();
    cli.execute()
}
