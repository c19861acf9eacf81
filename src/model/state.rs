//! Engine state value types: mode, overlay, pending input, indicator

use std::fmt;
use std::time::Instant;

use crate::keymap::{chord_display, GroupId, Keystroke, Leader};

/// The engine's modal state; exactly one is active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    Insert,
    #[default]
    Command,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Insert => write!(f, "insert"),
            Mode::Command => write!(f, "command"),
        }
    }
}

/// The active transient overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayState {
    pub group: GroupId,
    /// Last time a member action kept the overlay alive
    pub last_activity: Instant,
}

impl OverlayState {
    pub fn new(group: GroupId) -> Self {
        Self {
            group,
            last_activity: Instant::now(),
        }
    }

    /// Record another member action
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

/// Keystrokes collected while waiting for a chord to complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingInput {
    /// A multi-token chord in the layered tables
    Chord(Vec<Keystroke>),
    /// Keys typed after a leader hold; resolved only in that leader's table
    LeaderHold {
        leader: Leader,
        keys: Vec<Keystroke>,
    },
}

impl PendingInput {
    /// Status text for the pending input, e.g. `primary: b`
    pub fn display(&self) -> String {
        match self {
            PendingInput::Chord(keys) => chord_display(keys),
            PendingInput::LeaderHold { leader, keys } if keys.is_empty() => {
                format!("{}:", leader)
            }
            PendingInput::LeaderHold { leader, keys } => {
                format!("{}: {}", leader, chord_display(keys))
            }
        }
    }
}

/// Externally visible state: the mode, or Repeat while an overlay is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorState {
    Command,
    Insert,
    Repeat,
}

impl IndicatorState {
    /// Project mode and overlay presence onto the indicator
    pub fn project(mode: Mode, overlay_active: bool) -> Self {
        match (overlay_active, mode) {
            (true, _) => IndicatorState::Repeat,
            (false, Mode::Command) => IndicatorState::Command,
            (false, Mode::Insert) => IndicatorState::Insert,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            IndicatorState::Command => "C",
            IndicatorState::Insert => "I",
            IndicatorState::Repeat => "R",
        }
    }

    /// Colour token for whoever renders the indicator
    pub fn color_token(self) -> &'static str {
        match self {
            IndicatorState::Command => "indicator.command",
            IndicatorState::Insert => "indicator.insert",
            IndicatorState::Repeat => "indicator.repeat",
        }
    }
}

impl fmt::Display for IndicatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.glyph(), self.color_token())
    }
}
