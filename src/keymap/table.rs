//! Immutable binding tables

use std::collections::{HashMap, HashSet};

use super::action::Action;
use super::binding::{Binding, BindingDecl, BindingTarget};
use super::config::{parse_chord, KeymapError};
use super::types::Keystroke;
use crate::layout::LayoutTable;

/// Result of looking a keystroke sequence up in one table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The sequence is bound to an action
    Bound(&'a Action),
    /// The sequence is explicitly terminated in this table
    Suppressed,
    /// The sequence is a proper prefix of a longer binding
    Pending,
    /// The table knows nothing about the sequence
    Absent,
}

/// A chord → target mapping, built once and never edited
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    name: String,
    /// Bindings in declaration order (later duplicates already removed)
    bindings: Vec<Binding>,
    /// Fast lookup from full sequence to index into `bindings`
    lookup: HashMap<Vec<Keystroke>, usize>,
    /// Every proper prefix of a multi-keystroke binding
    prefixes: HashSet<Vec<Keystroke>>,
}

impl BindingTable {
    /// Create an empty table
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build a table from declarations
    ///
    /// Each chord is translated through `layout` unless the entry is
    /// `direct` or no layout is given. The first malformed chord fails the
    /// whole table with [`KeymapError::InputFormat`] naming that entry.
    pub fn build(
        name: impl Into<String>,
        decls: &[BindingDecl],
        layout: Option<&LayoutTable>,
    ) -> Result<Self, KeymapError> {
        let name = name.into();
        let mut bindings = Vec::with_capacity(decls.len());

        for decl in decls {
            let chord = match layout {
                Some(layout) if !decl.direct => layout.translate(&decl.chord),
                _ => Ok(decl.chord.clone()),
            };
            let keystrokes = chord.and_then(|chord| parse_chord(&chord)).map_err(|e| {
                KeymapError::InputFormat {
                    table: name.clone(),
                    entry: decl.to_string(),
                    reason: e.to_string(),
                }
            })?;
            bindings.push(Binding::new(keystrokes, decl.target.clone()));
        }

        Ok(Self::with_bindings(name, bindings))
    }

    /// Create a table from already-built bindings
    ///
    /// A later binding for the same sequence replaces the earlier one.
    pub fn with_bindings(name: impl Into<String>, bindings: Vec<Binding>) -> Self {
        let mut table = Self::empty(name);
        for binding in bindings {
            table.add_binding(binding);
        }
        table
    }

    fn add_binding(&mut self, binding: Binding) {
        if binding.keystrokes.is_empty() {
            return;
        }

        for len in 1..binding.keystrokes.len() {
            self.prefixes.insert(binding.keystrokes[..len].to_vec());
        }

        if let Some(&idx) = self.lookup.get(&binding.keystrokes) {
            tracing::debug!(
                table = %self.name,
                chord = %binding.display_string(),
                "later binding overrides earlier one"
            );
            self.bindings[idx] = binding;
        } else {
            self.lookup
                .insert(binding.keystrokes.clone(), self.bindings.len());
            self.bindings.push(binding);
        }
    }

    /// Look up a keystroke sequence
    ///
    /// An exact binding wins over a longer binding sharing the prefix.
    pub fn lookup(&self, keystrokes: &[Keystroke]) -> Lookup<'_> {
        if let Some(&idx) = self.lookup.get(keystrokes) {
            return match &self.bindings[idx].target {
                BindingTarget::Action(action) => Lookup::Bound(action),
                BindingTarget::Suppressed => Lookup::Suppressed,
            };
        }

        if self.prefixes.contains(keystrokes) {
            Lookup::Pending
        } else {
            Lookup::Absent
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Get the binding for an action (first match)
    pub fn binding_for(&self, action: &Action) -> Option<&Binding> {
        self.bindings
            .iter()
            .find(|b| b.target.action() == Some(action))
    }
}
