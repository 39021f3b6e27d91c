//! Wallpaper CLI commands.
//!
//! These work on the wallpaper directories and the settings file directly, so
//! they can be used while no event loop is running. A running loop picks up
//! added files on its next rescan.

use clap::Subcommand;
use serde_json::json;

use crate::cli::output;
use crate::config::LoadedConfig;
use crate::constants::WALLPAPER_SETTING_KEY;
use crate::error::HomescreenError;
use crate::settings::{JsonFileSettings, Settings};
use crate::wallpaper::{LocalFetcher, WallpaperEntry, WallpaperManager};

/// Wallpaper subcommands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum WallpaperCommands {
    /// List available wallpapers.
    ///
    /// Built-in wallpapers come first, then user-added ones. The selected
    /// wallpaper is marked.
    List {
        /// Print the collection as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Rotate to the next wallpaper and remember it.
    Next,

    /// Select a wallpaper by name.
    ///
    /// Matches the exact name, then case-insensitively, then by file stem.
    /// Falls back to the default wallpaper when nothing matches.
    #[command(after_long_help = r"Examples:
  homescreen wallpaper select forest.jpg
  homescreen wallpaper select FOREST        # Case-insensitive stem match")]
    Select {
        /// The wallpaper name.
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Add a wallpaper from a source and select it.
    #[command(after_long_help = r"Examples:
  homescreen wallpaper add file:///media/usb/beach.jpg
  homescreen wallpaper add ~/Pictures/beach.jpg")]
    Add {
        /// Source of the image (`file://` URL or local path).
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Print the full path of the selected wallpaper.
    Path,
}

/// Execute wallpaper subcommands.
///
/// # Errors
///
/// Returns an error if the wallpaper directories cannot be prepared or the
/// command fails.
pub fn execute(cmd: &WallpaperCommands, loaded: &LoadedConfig) -> Result<(), HomescreenError> {
    let base_dir = loaded.base_dir();
    let mut manager = WallpaperManager::new(&loaded.config.wallpapers, &base_dir)?;
    let settings = JsonFileSettings::open(&loaded.config.settings_file(&base_dir));
    manager.restore(settings.get_str(WALLPAPER_SETTING_KEY).as_deref());

    match cmd {
        WallpaperCommands::List { json } => execute_list(&manager, *json),
        WallpaperCommands::Next => {
            let entry = manager.next();
            commit(&manager, &settings, &entry)
        }
        WallpaperCommands::Select { name } => {
            let (entry, notice) = select_with_notice(&mut manager, name);
            if let Some(notice) = notice {
                eprintln!("{notice}");
            }
            commit(&manager, &settings, &entry)
        }
        WallpaperCommands::Add { url } => {
            let entry = manager.add(url, &LocalFetcher)?;
            commit(&manager, &settings, &entry)
        }
        WallpaperCommands::Path => {
            println!("{}", manager.selected_path().display());
            Ok(())
        }
    }
}

/// Selects `name`, with a notice when nothing matched and the default was used.
fn select_with_notice(
    manager: &mut WallpaperManager,
    name: &str,
) -> (WallpaperEntry, Option<String>) {
    let matched = manager.lookup(name).is_some();
    let entry = manager.select(name);
    let notice = (!matched).then(|| {
        format!("No wallpaper named '{name}', using {}", manager.default_entry().name)
    });
    (entry, notice)
}

/// Execute the wallpaper list command.
fn execute_list(manager: &WallpaperManager, as_json: bool) -> Result<(), HomescreenError> {
    if as_json {
        let value = json!({
            "wallpapers": manager.collection(),
            "selected": manager.selected(),
        });
        output::print_highlighted_json(&value);
        return Ok(());
    }

    if manager.collection().is_empty() {
        println!("No wallpapers found.");
        return Ok(());
    }

    for entry in manager.collection() {
        println!("{}", output::format_wallpaper(entry, entry == manager.selected()));
    }
    Ok(())
}

/// Persists the selection and prints where it lives.
fn commit(
    manager: &WallpaperManager,
    settings: &dyn Settings,
    entry: &WallpaperEntry,
) -> Result<(), HomescreenError> {
    settings.set(WALLPAPER_SETTING_KEY, json!(entry.name))?;
    println!("{}", manager.selected_path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use tempfile::TempDir;

    use super::*;
    use crate::config::{HomescreenConfig, WallpaperConfig};
    use crate::wallpaper::processing::test_images;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: WallpaperCommands,
    }

    fn loaded(root: &TempDir) -> LoadedConfig {
        let skill = root.path().join("skill");
        fs::create_dir_all(&skill).unwrap();
        fs::write(skill.join("a.png"), test_images::png()).unwrap();
        fs::write(skill.join("b.png"), test_images::png()).unwrap();

        LoadedConfig {
            config: HomescreenConfig {
                wallpapers: WallpaperConfig {
                    skill_directory: "skill".to_string(),
                    user_directory: "user".to_string(),
                    ..Default::default()
                },
                settings_path: "settings.json".to_string(),
                ..Default::default()
            },
            path: Some(root.path().join("config.jsonc")),
        }
    }

    fn persisted(root: &TempDir) -> Option<String> {
        JsonFileSettings::open(&root.path().join("settings.json")).get_str(WALLPAPER_SETTING_KEY)
    }

    #[test]
    fn test_wallpaper_list_parse() {
        let cli = TestCli::try_parse_from(["test", "list", "--json"]).unwrap();
        assert!(matches!(cli.command, WallpaperCommands::List { json: true }));
    }

    #[test]
    fn test_wallpaper_select_parse() {
        let cli = TestCli::try_parse_from(["test", "select", "forest"]).unwrap();
        match cli.command {
            WallpaperCommands::Select { name } => assert_eq!(name, "forest"),
            _ => panic!("Expected Select command"),
        }
    }

    #[test]
    fn test_wallpaper_add_requires_url() {
        assert!(TestCli::try_parse_from(["test", "add"]).is_err());
    }

    #[test]
    fn test_next_persists_across_invocations() {
        let root = TempDir::new().unwrap();
        let loaded = loaded(&root);

        execute(&WallpaperCommands::Next, &loaded).unwrap();
        assert_eq!(persisted(&root).as_deref(), Some("a.png"));

        execute(&WallpaperCommands::Next, &loaded).unwrap();
        assert_eq!(persisted(&root).as_deref(), Some("b.png"));
    }

    #[test]
    fn test_select_by_stem_persists_real_name() {
        let root = TempDir::new().unwrap();
        let loaded = loaded(&root);

        execute(&WallpaperCommands::Select { name: "B".to_string() }, &loaded).unwrap();
        assert_eq!(persisted(&root).as_deref(), Some("b.png"));
    }

    #[test]
    fn test_select_notice_only_on_fallback() {
        let root = TempDir::new().unwrap();
        let loaded = loaded(&root);
        let mut manager =
            WallpaperManager::new(&loaded.config.wallpapers, &loaded.base_dir()).unwrap();

        let (entry, notice) = select_with_notice(&mut manager, "B");
        assert_eq!(entry.name, "b.png");
        assert_eq!(notice, None);

        let (entry, notice) = select_with_notice(&mut manager, "desert");
        assert_eq!(&entry, manager.default_entry());
        assert_eq!(notice.as_deref(), Some("No wallpaper named 'desert', using default.png"));
    }

    #[test]
    fn test_add_from_local_path() {
        let root = TempDir::new().unwrap();
        let loaded = loaded(&root);
        let source = root.path().join("photo.jpg");
        fs::write(&source, test_images::jpeg()).unwrap();

        let url = format!("file://{}", source.display());
        execute(&WallpaperCommands::Add { url }, &loaded).unwrap();

        let name = persisted(&root).unwrap();
        assert!(name.starts_with("wallpaper-"));
        assert!(root.path().join("user").join(&name).is_file());
    }

    #[test]
    fn test_add_missing_source_fails_without_persisting() {
        let root = TempDir::new().unwrap();
        let loaded = loaded(&root);

        let result = execute(&WallpaperCommands::Add { url: "/no/such.jpg".to_string() }, &loaded);

        assert!(matches!(result, Err(HomescreenError::FetchError(_))));
        assert!(persisted(&root).is_none());
    }
}
