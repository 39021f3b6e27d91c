//! Platform helpers shared across Homescreen components.
//!
//! - [`path`] - Shell-like path expansion for configured directories
//! - [`thread`] - Named background threads

pub mod path;
pub mod thread;

pub use path::{expand, expand_and_resolve};
pub use thread::spawn_named_thread;
