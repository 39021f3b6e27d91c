//! CLI command definitions using Clap.
//!
//! - `run` - Serve the message bus on stdin/stdout
//! - `wallpaper` - Wallpaper collection commands
//! - `config` - Configuration file commands

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::error::HomescreenError;
use crate::{config, schema};

pub mod config_cmd;
pub mod run;
pub mod wallpaper;

pub use config_cmd::ConfigCommands;
pub use run::RunArgs;
pub use wallpaper::WallpaperCommands;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Homescreen CLI - idle screen core for a voice assistant device.
#[derive(Parser, Debug)]
#[command(name = "homescreen")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Defaults to `run` when omitted.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Serve the homescreen message bus.
    ///
    /// Reads newline-delimited `{ "event": ..., "data": ... }` objects from
    /// stdin and writes view-model updates and triggers to stdout, one JSON
    /// object per line. Logs go to stderr.
    Run(RunArgs),

    /// Wallpaper collection commands.
    #[command(subcommand)]
    Wallpaper(WallpaperCommands),

    /// Configuration file commands.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output the configuration JSON Schema.
    ///
    /// Can be redirected to a file for use with editors that support JSON
    /// Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(homescreen completions --shell zsh)"
    ///   homescreen completions --shell fish > ~/.config/fish/completions/homescreen.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> { self.config.as_ref().map(PathBuf::from) }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the command
    /// fails.
    pub fn execute(&self) -> Result<(), HomescreenError> {
        match &self.command {
            Some(Commands::Schema) => {
                println!("{}", schema::generate_schema_json());
                Ok(())
            }
            Some(Commands::Completions { shell }) => {
                Self::print_completions(*shell);
                Ok(())
            }
            Some(Commands::Config(ConfigCommands::Path)) => {
                config_cmd::show_config_path(self.config_path().as_deref());
                Ok(())
            }
            command => {
                let loaded = config::load(self.config_path().as_deref())?;
                match command {
                    Some(Commands::Wallpaper(cmd)) => wallpaper::execute(cmd, &loaded),
                    Some(Commands::Config(cmd)) => config_cmd::execute(cmd, &loaded),
                    Some(Commands::Run(args)) => run::execute(args, &loaded),
                    _ => run::execute(&RunArgs::default(), &loaded),
                }
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "homescreen", &mut io::stdout());
    }
}
