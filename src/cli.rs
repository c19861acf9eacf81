//! Command-line interface
//!
//! Supports:
//! - Validating a keymap and layout (`check`)
//! - Driving the engine from stdin (`run`)

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::keymap::{parse_key_string, KeymapError, Leader, TableSet};
use crate::layout::LayoutSet;
use crate::messages::Msg;

/// Modal key reinterpretation engine
#[derive(Parser, Debug)]
#[command(name = "keymode", version, about = "Modal key reinterpretation engine")]
pub struct CliArgs {
    /// Engine config file (defaults to ~/.config/keymode/config.yaml)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Keymap file; replaces the user keymap override
    #[arg(long, value_name = "FILE", global = true)]
    pub keymap: Option<PathBuf>,

    /// Layout to translate chords through
    #[arg(long, value_name = "NAME", global = true)]
    pub layout: Option<String>,

    /// Start with layout translation enabled
    #[arg(long, global = true)]
    pub translate: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Validate the keymap and layout, then print a summary
    Check {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read one event per line from stdin and report what the engine does
    Run,
}

/// Parse one line of `run` input into a message
///
/// Blank lines and `#` comments yield `None`.
pub fn parse_input_line(line: &str) -> Result<Option<Msg>, KeymapError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let first = words.next().unwrap_or_default();
    let rest: Vec<&str> = words.collect();

    let msg = match (first, rest.as_slice()) {
        ("tap", [leader]) => Msg::tap(parse_leader(leader)?),
        ("hold", [leader]) => Msg::hold(parse_leader(leader)?),
        ("toggle-layout", []) => Msg::ToggleLayout,
        ("layout", ["on"]) => Msg::SetLayoutEnabled(true),
        ("layout", ["off"]) => Msg::SetLayoutEnabled(false),
        ("cancel", []) => Msg::CancelPending,
        ("quit", []) => Msg::Quit,
        (token, []) => Msg::key(parse_key_string(token)?),
        _ => return Err(KeymapError::InvalidKey(line.to_string())),
    };

    Ok(Some(msg))
}

fn parse_leader(name: &str) -> Result<Leader, KeymapError> {
    Leader::ALL
        .into_iter()
        .find(|leader| leader.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| KeymapError::InvalidKey(format!("unknown leader '{}'", name)))
}

/// What `check` reports about a loaded keymap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeymapSummary {
    pub layout: String,
    pub layout_enabled: bool,
    pub global: usize,
    pub insert: usize,
    pub command: usize,
    pub overlays: BTreeMap<String, usize>,
    pub repeat_actions: usize,
    pub leaders: BTreeMap<String, LeaderSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderSummary {
    pub tap: Option<String>,
    pub hold: usize,
}

impl KeymapSummary {
    pub fn new(tables: &TableSet, layout: &LayoutSet) -> Self {
        let overlays = tables
            .overlays
            .iter()
            .map(|(group, table)| (group.to_string(), table.len()))
            .collect();

        let leaders = Leader::ALL
            .into_iter()
            .map(|leader| {
                let slot = tables.leader(leader);
                let summary = LeaderSummary {
                    tap: slot.tap.as_ref().map(|a| a.to_string()),
                    hold: slot.hold.len(),
                };
                (leader.name().to_string(), summary)
            })
            .collect();

        Self {
            layout: layout.layout().name().to_string(),
            layout_enabled: layout.is_enabled(),
            global: tables.global.len(),
            insert: tables.insert.len(),
            command: tables.command.len(),
            overlays,
            repeat_actions: tables.repeat().len(),
            leaders,
        }
    }
}

impl std::fmt::Display for KeymapSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.layout_enabled { "on" } else { "off" };
        writeln!(f, "layout:   {} ({})", self.layout, state)?;
        writeln!(f, "global:   {} bindings", self.global)?;
        writeln!(f, "insert:   {} bindings", self.insert)?;
        writeln!(f, "command:  {} bindings", self.command)?;
        for (group, count) in &self.overlays {
            writeln!(f, "overlay {}: {} bindings", group, count)?;
        }
        writeln!(f, "repeatable actions: {}", self.repeat_actions)?;
        for (name, leader) in &self.leaders {
            writeln!(
                f,
                "leader {}: tap {}, {} hold bindings",
                name,
                leader.tap.as_deref().unwrap_or("-"),
                leader.hold
            )?;
        }
        Ok(())
    }
}
