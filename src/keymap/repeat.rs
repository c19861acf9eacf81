//! Repeatable-action registry

use std::collections::{BTreeMap, HashMap};

use super::action::{Action, ActionRef, GroupId};
use super::config::KeymapError;

/// Maps each repeatable host action to the overlay group it keeps alive
///
/// Groups are disjoint: an action belongs to at most one group. Absence
/// from the registry means the action is not repeatable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepeatRegistry {
    groups: HashMap<ActionRef, GroupId>,
}

impl RepeatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `group → members` declarations
    pub fn from_groups(groups: &BTreeMap<GroupId, Vec<ActionRef>>) -> Result<Self, KeymapError> {
        let mut registry = Self::new();
        for (group, members) in groups {
            registry.register(group.clone(), members.iter().cloned())?;
        }
        Ok(registry)
    }

    /// Add members to a group; fails if an action already belongs to another group
    pub fn register(
        &mut self,
        group: GroupId,
        members: impl IntoIterator<Item = ActionRef>,
    ) -> Result<(), KeymapError> {
        for action in members {
            match self.groups.get(&action) {
                Some(existing) if existing != &group => {
                    return Err(KeymapError::InvalidAction(format!(
                        "{} is repeatable in both '{}' and '{}'",
                        action, existing, group
                    )));
                }
                _ => {
                    self.groups.insert(action, group.clone());
                }
            }
        }
        Ok(())
    }

    /// Overlay group kept alive by `action`, if it is repeatable
    pub fn group_of(&self, action: &Action) -> Option<&GroupId> {
        action.as_host().and_then(|a| self.groups.get(a))
    }

    /// Every distinct group referenced by the registry
    pub fn groups(&self) -> Vec<&GroupId> {
        let mut groups: Vec<_> = self.groups.values().collect();
        groups.sort();
        groups.dedup();
        groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
