//! YAML configuration parsing for keymaps
//!
//! Parses keymap.yaml files into binding declarations and implements the
//! chord-token grammar shared with the layout translator.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use super::action::{Action, ActionRef, GroupId};
use super::binding::{BindingDecl, BindingTarget, Leader};
use super::types::{KeyCode, Keystroke, Modifiers};

/// Action name that declares an explicit terminator
const SUPPRESSED: &str = "Suppressed";

/// Root structure of a keymap YAML file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeymapConfig {
    #[serde(default)]
    pub global: Vec<BindingConfig>,
    #[serde(default)]
    pub insert: Vec<BindingConfig>,
    #[serde(default)]
    pub command: Vec<BindingConfig>,
    /// Overlay tables keyed by group id
    #[serde(default)]
    pub overlays: BTreeMap<String, Vec<BindingConfig>>,
    /// Repeatable actions keyed by the overlay group they keep alive
    #[serde(default)]
    pub repeat: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub leaders: LeadersConfig,
}

/// A single binding entry from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingConfig {
    pub key: String,
    pub action: String,
    #[serde(default)]
    pub direct: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeadersConfig {
    #[serde(default)]
    pub primary: Option<LeaderConfig>,
    #[serde(default)]
    pub secondary: Option<LeaderConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeaderConfig {
    #[serde(default)]
    pub tap: Option<String>,
    #[serde(default)]
    pub hold: Vec<BindingConfig>,
}

/// Declarations for one leader key: its two independent slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaderDecl {
    pub tap: Option<Action>,
    pub hold: Vec<BindingDecl>,
}

/// The full, validated set of binding declarations
///
/// This is what gets (re)built into tables; it is kept around so a layout
/// toggle can rebuild everything from scratch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeymapDecl {
    pub global: Vec<BindingDecl>,
    pub insert: Vec<BindingDecl>,
    pub command: Vec<BindingDecl>,
    pub overlays: BTreeMap<GroupId, Vec<BindingDecl>>,
    pub repeat: BTreeMap<GroupId, Vec<ActionRef>>,
    pub primary: LeaderDecl,
    pub secondary: LeaderDecl,
}

impl KeymapDecl {
    pub fn leader(&self, leader: Leader) -> &LeaderDecl {
        match leader {
            Leader::Primary => &self.primary,
            Leader::Secondary => &self.secondary,
        }
    }

    fn leader_mut(&mut self, leader: Leader) -> &mut LeaderDecl {
        match leader {
            Leader::Primary => &mut self.primary,
            Leader::Secondary => &mut self.secondary,
        }
    }

    /// Layer `user` on top of `self`
    ///
    /// Entries with the same chord replace the base entry in place, new
    /// chords are appended. Repeat groups extend the base group. A leader's
    /// tap target is replaced only when the override sets one.
    pub fn merge(mut self, user: KeymapDecl) -> KeymapDecl {
        let KeymapDecl {
            global,
            insert,
            command,
            overlays,
            repeat,
            primary,
            secondary,
        } = user;

        self.global = merge_bindings(self.global, global);
        self.insert = merge_bindings(self.insert, insert);
        self.command = merge_bindings(self.command, command);

        for (group, entries) in overlays {
            let base = self.overlays.remove(&group).unwrap_or_default();
            self.overlays.insert(group, merge_bindings(base, entries));
        }

        for (group, actions) in repeat {
            let members = self.repeat.entry(group).or_default();
            for action in actions {
                if !members.contains(&action) {
                    members.push(action);
                }
            }
        }

        for (leader, LeaderDecl { tap, hold }) in
            [(Leader::Primary, primary), (Leader::Secondary, secondary)]
        {
            let base = self.leader_mut(leader);
            if tap.is_some() {
                base.tap = tap;
            }
            base.hold = merge_bindings(std::mem::take(&mut base.hold), hold);
        }

        self
    }
}

/// Merge override declarations into base declarations, matching by chord
pub fn merge_bindings(base: Vec<BindingDecl>, user: Vec<BindingDecl>) -> Vec<BindingDecl> {
    let mut result = base;

    for user_binding in user {
        let chord = normalize_chord(&user_binding.chord);
        let existing_idx = result
            .iter()
            .position(|b| normalize_chord(&b.chord) == chord && b.direct == user_binding.direct);

        if let Some(idx) = existing_idx {
            result[idx] = user_binding;
        } else {
            result.push(user_binding);
        }
    }

    result
}

fn normalize_chord(chord: &str) -> String {
    chord.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Load keymap declarations from a YAML file
pub fn load_keymap_file(path: &Path) -> Result<KeymapDecl, KeymapError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| KeymapError::IoError(format!("{}: {}", path.display(), e)))?;

    parse_keymap_yaml(&content)
}

/// Parse keymap declarations from a YAML string
pub fn parse_keymap_yaml(yaml: &str) -> Result<KeymapDecl, KeymapError> {
    let config: KeymapConfig =
        serde_yaml::from_str(yaml).map_err(|e| KeymapError::ParseError(e.to_string()))?;

    let mut decl = KeymapDecl {
        global: parse_entries(config.global)?,
        insert: parse_entries(config.insert)?,
        command: parse_entries(config.command)?,
        ..KeymapDecl::default()
    };

    for (group, entries) in config.overlays {
        decl.overlays
            .insert(GroupId::new(group.as_str()), parse_entries(entries)?);
    }

    for (group, actions) in config.repeat {
        let members = actions
            .iter()
            .map(|name| match parse_action(name)? {
                Action::Host(action) => Ok(action),
                builtin => Err(KeymapError::InvalidAction(format!(
                    "{} cannot be repeatable (group {})",
                    builtin, group
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        decl.repeat.insert(GroupId::new(group.as_str()), members);
    }

    if let Some(primary) = config.leaders.primary {
        decl.primary = parse_leader(primary)?;
    }
    if let Some(secondary) = config.leaders.secondary {
        decl.secondary = parse_leader(secondary)?;
    }

    Ok(decl)
}

fn parse_leader(config: LeaderConfig) -> Result<LeaderDecl, KeymapError> {
    let tap = config.tap.as_deref().map(parse_action).transpose()?;
    Ok(LeaderDecl {
        tap,
        hold: parse_entries(config.hold)?,
    })
}

fn parse_entries(entries: Vec<BindingConfig>) -> Result<Vec<BindingDecl>, KeymapError> {
    entries
        .into_iter()
        .map(|entry| {
            let target = if entry.action == SUPPRESSED {
                BindingTarget::Suppressed
            } else {
                BindingTarget::Action(parse_action(&entry.action)?)
            };
            Ok(BindingDecl {
                chord: entry.key,
                target,
                direct: entry.direct,
            })
        })
        .collect()
}

fn parse_action(name: &str) -> Result<Action, KeymapError> {
    Action::from_str(name).map_err(|_| KeymapError::InvalidAction(name.to_string()))
}

/// Split a chord token into its modifier prefix (with trailing `+`) and base key
///
/// `"Ctrl+x"` → `("Ctrl+", "x")`, `"x"` → `("", "x")`, `"Ctrl++"` → `("Ctrl+", "+")`.
pub fn split_token(token: &str) -> (&str, &str) {
    if token == "+" {
        return ("", token);
    }
    if token.ends_with("++") {
        let split = token.len() - 1;
        return (&token[..split], &token[split..]);
    }
    match token.rfind('+') {
        Some(idx) => (&token[..=idx], &token[idx + 1..]),
        None => ("", token),
    }
}

/// Parse a chord token like "Ctrl+Shift+s" into a Keystroke
pub fn parse_key_string(token: &str) -> Result<Keystroke, KeymapError> {
    if token.is_empty() {
        return Err(KeymapError::InvalidKey("empty key token".to_string()));
    }

    let (prefix, base) = split_token(token);
    if base.is_empty() {
        return Err(KeymapError::InvalidKey(format!(
            "Modifier without key: {}",
            token
        )));
    }

    let mut mods = Modifiers::NONE;
    if !prefix.is_empty() {
        for part in prefix[..prefix.len() - 1].split('+') {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => mods = mods | Modifiers::CTRL,
                "shift" => mods = mods | Modifiers::SHIFT,
                "alt" | "option" | "opt" => mods = mods | Modifiers::ALT,
                "meta" | "super" | "win" | "cmd" => mods = mods | Modifiers::META,
                _ => {
                    return Err(KeymapError::InvalidKey(format!(
                        "Unknown modifier '{}' in {}",
                        part, token
                    )))
                }
            }
        }
    }

    Ok(Keystroke::new(parse_key_code(base)?, mods))
}

/// Parse a key code from string
fn parse_key_code(key: &str) -> Result<KeyCode, KeymapError> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_control() || c.is_whitespace() {
            return Err(KeymapError::InvalidKey(format!(
                "Non-printable key: {:?}",
                c
            )));
        }
        return Ok(KeyCode::Char(c));
    }

    let lower = key.to_lowercase();
    match lower.as_str() {
        "return" | "enter" => Ok(KeyCode::Return),
        "escape" | "esc" => Ok(KeyCode::Escape),
        "tab" => Ok(KeyCode::Tab),
        "backspace" | "back" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "space" => Ok(KeyCode::Space),

        "up" | "arrowup" => Ok(KeyCode::Up),
        "down" | "arrowdown" => Ok(KeyCode::Down),
        "left" | "arrowleft" => Ok(KeyCode::Left),
        "right" | "arrowright" => Ok(KeyCode::Right),

        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" | "pgup" => Ok(KeyCode::PageUp),
        "pagedown" | "pgdown" | "pgdn" => Ok(KeyCode::PageDown),
        "insert" | "ins" => Ok(KeyCode::Insert),

        _ => match lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            Some(n @ 1..=24) => Ok(KeyCode::F(n)),
            _ => Err(KeymapError::InvalidKey(format!("Unknown key: {}", key))),
        },
    }
}

/// Parse a whitespace-separated chord into its keystroke sequence
pub fn parse_chord(chord: &str) -> Result<Vec<Keystroke>, KeymapError> {
    let keystrokes = chord
        .split_whitespace()
        .map(parse_key_string)
        .collect::<Result<Vec<_>, _>>()?;

    if keystrokes.is_empty() {
        return Err(KeymapError::InvalidKey("empty chord".to_string()));
    }
    Ok(keystrokes)
}

/// Errors that can occur when loading keymaps and layouts
///
/// All of these surface at startup or on a table rebuild, never while
/// resolving live key events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeymapError {
    IoError(String),
    ParseError(String),
    InvalidKey(String),
    InvalidAction(String),
    /// A chord in a table could not be tokenized
    InputFormat {
        table: String,
        entry: String,
        reason: String,
    },
    InvalidLayout(String),
    UnknownLayout(String),
    UnknownGroup(String),
}

impl fmt::Display for KeymapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeymapError::IoError(e) => write!(f, "IO error: {}", e),
            KeymapError::ParseError(e) => write!(f, "Parse error: {}", e),
            KeymapError::InvalidKey(k) => write!(f, "Invalid key: {}", k),
            KeymapError::InvalidAction(a) => write!(f, "Invalid action: {}", a),
            KeymapError::InputFormat {
                table,
                entry,
                reason,
            } => write!(f, "Malformed chord in table '{}': {} ({})", table, entry, reason),
            KeymapError::InvalidLayout(e) => write!(f, "Invalid layout: {}", e),
            KeymapError::UnknownLayout(name) => write!(f, "Unknown layout: {}", name),
            KeymapError::UnknownGroup(group) => write!(f, "Unknown overlay group: {}", group),
        }
    }
}

impl std::error::Error for KeymapError {}
