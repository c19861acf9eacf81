//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types. Real key events and
//! timer expiries share one queue and are processed one at a time.

use crate::keymap::{Keystroke, Leader};

/// A key event as delivered by the upstream classification layer
///
/// Tap and hold of a leader key arrive as distinct identities; the engine
/// never measures how long a key was held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// An ordinary (physical) keystroke
    Key(Keystroke),
    /// A leader key was tapped
    LeaderTap(Leader),
    /// A leader key was held; following keys resolve in its hold table
    LeaderHold(Leader),
}

/// The two idle countdowns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Insert-mode inactivity
    Insert,
    /// Overlay inactivity
    Repeat,
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A key event to resolve
    Key(KeyEvent),
    /// An idle timer ran out; only the generation it was armed with counts
    TimerFired { kind: TimerKind, generation: u64 },
    /// Flip layout translation and rebuild tables
    ToggleLayout,
    /// Set layout translation explicitly (idempotent)
    SetLayoutEnabled(bool),
    /// Abandon a pending chord or leader prefix (upstream timeout/abort)
    CancelPending,
    /// Stop the engine
    Quit,
}

impl Msg {
    pub fn key(keystroke: Keystroke) -> Self {
        Msg::Key(KeyEvent::Key(keystroke))
    }

    pub fn tap(leader: Leader) -> Self {
        Msg::Key(KeyEvent::LeaderTap(leader))
    }

    pub fn hold(leader: Leader) -> Self {
        Msg::Key(KeyEvent::LeaderHold(leader))
    }
}
