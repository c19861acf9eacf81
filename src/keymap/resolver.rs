//! Layered binding resolution
//!
//! ```text
//! Overlay (if active) → Mode table (Insert | Command) → Global
//! ```
//!
//! The first layer that has an opinion about the sequence wins: a bound
//! action is returned, a `Suppressed` entry ends resolution as unbound, a
//! proper prefix asks for more input. Only an absent sequence falls
//! through to the next layer. Leader-hold prefixes resolve in their own
//! table and never consult the layers above.

use std::collections::HashMap;

use super::action::{Action, GroupId};
use super::binding::Leader;
use super::config::{KeymapDecl, KeymapError};
use super::repeat::RepeatRegistry;
use super::table::{BindingTable, Lookup};
use super::types::Keystroke;
use crate::layout::LayoutTable;
use crate::model::Mode;

/// Outcome of resolving a keystroke sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Execute this action
    Action(Action),
    /// Sequence is a prefix of a longer chord; wait for the next key
    Pending,
    /// Nothing bound; the host falls back to its own default
    Unbound,
}

/// The two bindable slots of a leader key
#[derive(Debug, Clone, Default)]
pub struct LeaderSlot {
    pub tap: Option<Action>,
    pub hold: BindingTable,
}

/// Every table the engine resolves against, built together
///
/// A table set is immutable. Changing the layout builds a complete new set
/// and swaps it in whole.
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    pub global: BindingTable,
    pub insert: BindingTable,
    pub command: BindingTable,
    pub overlays: HashMap<GroupId, BindingTable>,
    pub primary: LeaderSlot,
    pub secondary: LeaderSlot,
    pub repeat: RepeatRegistry,
    /// Whether chords were translated through a layout
    pub translated: bool,
}

impl TableSet {
    /// Build all tables from declarations
    ///
    /// Fails on the first malformed chord, or when a repeat group has no
    /// overlay table.
    pub fn build(decl: &KeymapDecl, layout: Option<&LayoutTable>) -> Result<Self, KeymapError> {
        let mut overlays = HashMap::new();
        for (group, entries) in &decl.overlays {
            let table = BindingTable::build(format!("overlay:{}", group), entries, layout)?;
            overlays.insert(group.clone(), table);
        }

        let repeat = RepeatRegistry::from_groups(&decl.repeat)?;
        if let Some(missing) = repeat.groups().into_iter().find(|g| !overlays.contains_key(*g)) {
            return Err(KeymapError::UnknownGroup(missing.to_string()));
        }

        let leader_slot = |leader: Leader| -> Result<LeaderSlot, KeymapError> {
            let declared = decl.leader(leader);
            Ok(LeaderSlot {
                tap: declared.tap.clone(),
                hold: BindingTable::build(format!("leader:{}", leader), &declared.hold, layout)?,
            })
        };

        let set = Self {
            global: BindingTable::build("global", &decl.global, layout)?,
            insert: BindingTable::build("insert", &decl.insert, layout)?,
            command: BindingTable::build("command", &decl.command, layout)?,
            primary: leader_slot(Leader::Primary)?,
            secondary: leader_slot(Leader::Secondary)?,
            overlays,
            repeat,
            translated: layout.is_some(),
        };

        tracing::debug!(
            global = set.global.len(),
            insert = set.insert.len(),
            command = set.command.len(),
            overlays = set.overlays.len(),
            translated = set.translated,
            "built binding tables"
        );

        Ok(set)
    }

    pub fn mode_table(&self, mode: Mode) -> &BindingTable {
        match mode {
            Mode::Insert => &self.insert,
            Mode::Command => &self.command,
        }
    }

    pub fn overlay(&self, group: &GroupId) -> Option<&BindingTable> {
        self.overlays.get(group)
    }

    pub fn leader(&self, leader: Leader) -> &LeaderSlot {
        match leader {
            Leader::Primary => &self.primary,
            Leader::Secondary => &self.secondary,
        }
    }

    pub fn repeat(&self) -> &RepeatRegistry {
        &self.repeat
    }

    /// Resolve a sequence through Overlay → Mode → Global
    pub fn resolve(
        &self,
        keystrokes: &[Keystroke],
        mode: Mode,
        overlay: Option<&GroupId>,
    ) -> Resolution {
        let overlay_table = overlay.and_then(|group| self.overlay(group));
        let layers = overlay_table
            .into_iter()
            .chain([self.mode_table(mode), &self.global]);

        for table in layers {
            match table.lookup(keystrokes) {
                Lookup::Bound(action) => return Resolution::Action(action.clone()),
                Lookup::Suppressed => return Resolution::Unbound,
                Lookup::Pending => return Resolution::Pending,
                Lookup::Absent => continue,
            }
        }

        Resolution::Unbound
    }

    /// Resolve a sequence typed after a leader was held
    pub fn resolve_leader_hold(&self, leader: Leader, keystrokes: &[Keystroke]) -> Resolution {
        match self.leader(leader).hold.lookup(keystrokes) {
            Lookup::Bound(action) => Resolution::Action(action.clone()),
            Lookup::Pending => Resolution::Pending,
            Lookup::Suppressed | Lookup::Absent => Resolution::Unbound,
        }
    }

    /// Resolve a leader tap to its tap slot
    pub fn resolve_leader_tap(&self, leader: Leader) -> Resolution {
        match &self.leader(leader).tap {
            Some(action) => Resolution::Action(action.clone()),
            None => Resolution::Unbound,
        }
    }
}
