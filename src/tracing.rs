//! Diagnostics for the engine
//!
//! Configure via the RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=mode=info,keymode::update=debug` - scoped filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/keymode/logs/keymode.log` with daily rotation.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::{EngineModel, Mode};

/// Initialize tracing subscriber with console and file logging
///
/// The console respects RUST_LOG and defaults to `warn`. The file layer
/// always logs at debug level.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "keymode.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of engine state for diffing around an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSnapshot {
    pub mode: Mode,
    pub overlay: Option<String>,
    pub pending: Option<String>,
    pub layout_enabled: bool,
}

impl EngineSnapshot {
    pub fn from_model(model: &EngineModel) -> Self {
        Self {
            mode: model.mode,
            overlay: model.overlay.as_ref().map(|o| o.group.to_string()),
            pending: model.pending.as_ref().map(|p| p.display()),
            layout_enabled: model.layout.is_enabled(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &EngineSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.mode != other.mode {
            changes.push(format!("mode: {} → {}", self.mode, other.mode));
        }
        if self.overlay != other.overlay {
            changes.push(format!(
                "overlay: {} → {}",
                self.overlay.as_deref().unwrap_or("-"),
                other.overlay.as_deref().unwrap_or("-")
            ));
        }
        if self.pending != other.pending {
            changes.push(format!(
                "pending: {} → {}",
                self.pending.as_deref().unwrap_or("-"),
                other.pending.as_deref().unwrap_or("-")
            ));
        }
        if self.layout_enabled != other.layout_enabled {
            changes.push(format!(
                "layout: {} → {}",
                self.layout_enabled, other.layout_enabled
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
