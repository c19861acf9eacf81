//! Binding declarations and built bindings

use std::fmt;

use super::action::Action;
use super::types::{chord_display, Keystroke};

/// What a chord is bound to inside one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingTarget {
    /// Resolve to this action
    Action(Action),
    /// Explicit terminator: resolution stops here with no action,
    /// lower-priority tables are not consulted
    Suppressed,
}

impl BindingTarget {
    pub fn action(&self) -> Option<&Action> {
        match self {
            BindingTarget::Action(action) => Some(action),
            BindingTarget::Suppressed => None,
        }
    }
}

/// A declarative (chord, action) entry as written in a keymap file
///
/// The chord is still a string in logical-layout terms; it becomes
/// keystrokes only when a table is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingDecl {
    pub chord: String,
    pub target: BindingTarget,
    /// Bypass layout translation (literal control sequences)
    pub direct: bool,
}

impl BindingDecl {
    pub fn new(chord: impl Into<String>, action: Action) -> Self {
        Self {
            chord: chord.into(),
            target: BindingTarget::Action(action),
            direct: false,
        }
    }

    pub fn suppressed(chord: impl Into<String>) -> Self {
        Self {
            chord: chord.into(),
            target: BindingTarget::Suppressed,
            direct: false,
        }
    }

    /// Mark this entry as exempt from layout translation (builder pattern)
    pub fn direct(mut self) -> Self {
        self.direct = true;
        self
    }
}

impl fmt::Display for BindingDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            BindingTarget::Action(action) => write!(f, "\"{}\" -> {}", self.chord, action),
            BindingTarget::Suppressed => write!(f, "\"{}\" -> Suppressed", self.chord),
        }
    }
}

/// A built binding: physical keystrokes mapped to a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// The keystroke sequence (usually 1, more for prefix chords)
    pub keystrokes: Vec<Keystroke>,
    pub target: BindingTarget,
}

impl Binding {
    pub fn new(keystrokes: Vec<Keystroke>, target: BindingTarget) -> Self {
        Self { keystrokes, target }
    }

    /// Check if this is a multi-keystroke binding
    pub fn is_chord(&self) -> bool {
        self.keystrokes.len() > 1
    }

    pub fn display_string(&self) -> String {
        chord_display(&self.keystrokes)
    }
}

/// One of the two leader keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leader {
    Primary,
    Secondary,
}

impl Leader {
    pub const ALL: [Leader; 2] = [Leader::Primary, Leader::Secondary];

    pub fn name(self) -> &'static str {
        match self {
            Leader::Primary => "primary",
            Leader::Secondary => "secondary",
        }
    }
}

impl fmt::Display for Leader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
