//! CLI output formatting utilities.

use std::fmt::Write as _;

use colored::Colorize;
use serde_json::Value;

use crate::wallpaper::{WallpaperEntry, WallpaperOrigin};

const INDENT: &str = "  ";

/// Prints JSON with syntax highlighting.
///
/// Colors:
/// - Keys: Cyan
/// - Strings: Green
/// - Numbers: Yellow
/// - Booleans/Null: Magenta
pub fn print_highlighted_json(value: &Value) {
    println!("{}", highlight_json(value));
}

/// Renders `value` as indented, colored JSON.
#[must_use]
pub fn highlight_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Null => out.push_str(&"null".magenta().to_string()),
        Value::Bool(b) => out.push_str(&b.to_string().magenta().to_string()),
        Value::Number(n) => out.push_str(&n.to_string().yellow().to_string()),
        Value::String(s) => out.push_str(&quoted(s).green().to_string()),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Array(items) => {
            out.push_str(&"[".bold().to_string());
            for (i, item) in items.iter().enumerate() {
                separator(out, i, depth + 1);
                write_value(out, item, depth + 1);
            }
            closing(out, "]", depth);
        }
        Value::Object(map) => {
            out.push_str(&"{".bold().to_string());
            for (i, (key, item)) in map.iter().enumerate() {
                separator(out, i, depth + 1);
                let _ = write!(out, "{}: ", quoted(key).cyan());
                write_value(out, item, depth + 1);
            }
            closing(out, "}", depth);
        }
    }
}

fn separator(out: &mut String, index: usize, depth: usize) {
    if index > 0 {
        out.push(',');
    }
    out.push('\n');
    out.push_str(&INDENT.repeat(depth));
}

fn closing(out: &mut String, bracket: &str, depth: usize) {
    out.push('\n');
    out.push_str(&INDENT.repeat(depth));
    out.push_str(&bracket.bold().to_string());
}

fn quoted(s: &str) -> String { Value::String(s.to_string()).to_string() }

/// Formats one wallpaper line for `wallpaper list`.
#[must_use]
pub fn format_wallpaper(entry: &WallpaperEntry, selected: bool) -> String {
    let marker = if selected { "●".green().to_string() } else { " ".to_string() };
    let origin = match entry.origin {
        WallpaperOrigin::BuiltIn => "built-in".dimmed(),
        WallpaperOrigin::UserAdded => "user".blue(),
    };
    let name = if selected { entry.name.bold().to_string() } else { entry.name.clone() };
    format!("{marker} {name} {origin}")
}
