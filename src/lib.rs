//! Keymode - modal key reinterpretation engine
//!
//! This crate turns physical key events into named editor actions using
//! Insert/Command modes, transient repeat overlays, dual-role leader keys
//! and optional keyboard layout translation. It follows the Elm
//! Architecture: one `update` function mutates the model and returns
//! commands the runtime executes.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod host;
pub mod keymap;
pub mod layout;
pub mod messages;
pub mod model;
pub mod notify;
pub mod runtime;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::EngineConfig;
pub use messages::{KeyEvent, Msg};
pub use model::EngineModel;
pub use update::update;
