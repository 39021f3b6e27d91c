#![allow(clippy::multiple_crate_versions)]

//! Homescreen - idle screen core for a voice assistant device.
//!
//! - `homescreen run` (or no arguments): serves the message bus on stdin/stdout
//! - `homescreen wallpaper ...`: manages the wallpaper collection offline

fn main() {
    homescreen_lib::init_logging();

    if let Err(err) = homescreen_lib::cli::run() {
        eprintln!("homescreen: {err}");
        std::process::exit(1);
    }
}
