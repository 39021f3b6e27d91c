//! Config CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::cli::output;
use crate::config::{HomescreenConfig, LoadedConfig, config_paths};
use crate::error::HomescreenError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Write a configuration file filled with the default values.
    #[command(after_long_help = r#"Examples:
  homescreen config init                         # Create config at default location
  homescreen config init --force                 # Overwrite existing config
  homescreen config init --path ./config.jsonc   # Create at custom path
  homescreen config init --stdout                # Print defaults to stdout"#)]
    Init {
        /// Overwrite existing configuration file if it exists.
        #[arg(long, short)]
        force: bool,

        /// Custom path for the configuration file.
        #[arg(long, short, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Print the defaults to stdout instead of writing a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Show the configuration search paths and which one is in use.
    Path,

    /// Print the effective configuration (defaults merged with the file).
    Show,
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands, loaded: &LoadedConfig) -> Result<(), HomescreenError> {
    match cmd {
        ConfigCommands::Init { force, path, stdout } => {
            if *stdout {
                println!("{}", default_config_json()?);
                Ok(())
            } else {
                init_config(*force, path.clone())
            }
        }
        ConfigCommands::Path => {
            show_config_path(loaded.path.as_deref());
            Ok(())
        }
        ConfigCommands::Show => {
            output::print_highlighted_json(&serde_json::to_value(&loaded.config)?);
            Ok(())
        }
    }
}

fn default_config_json() -> Result<String, HomescreenError> {
    Ok(serde_json::to_string_pretty(&HomescreenConfig::default())?)
}

/// Initialize a new configuration file.
fn init_config(force: bool, custom_path: Option<PathBuf>) -> Result<(), HomescreenError> {
    let config_path = custom_path.unwrap_or_else(|| {
        config_paths().into_iter().next().unwrap_or_else(|| PathBuf::from("config.jsonc"))
    });

    if config_path.exists() && !force {
        return Err(HomescreenError::ConfigError(format!(
            "Configuration file already exists at: {}\nUse --force to overwrite.",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&config_path, default_config_json()?)?;

    println!("Configuration file created at: {}", config_path.display());
    Ok(())
}

/// Show the configuration file search paths.
///
/// An explicit `--config` path is listed first.
pub fn show_config_path(explicit: Option<&Path>) {
    println!("Configuration file search paths (in priority order):\n");

    let mut paths = config_paths();
    if let Some(path) = explicit {
        paths.insert(0, path.to_path_buf());
    }

    let mut found_config = false;
    for (i, path) in paths.iter().enumerate() {
        let exists = path.exists();
        let marker = if exists && !found_config {
            found_config = true;
            " (active)"
        } else if exists {
            " (exists)"
        } else {
            ""
        };

        println!("  {}. {}{}", i + 1, path.display(), marker);
    }

    if !found_config {
        println!("\nNo configuration file found, defaults are in use.");
        println!("Run 'homescreen config init' to create one.");
    }
}
