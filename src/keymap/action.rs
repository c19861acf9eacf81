//! Action identifiers: what a binding resolves to
//!
//! The host owns the behavior behind every [`ActionRef`]; the engine only
//! carries the name around. A handful of names are engine built-ins that
//! drive the mode machine instead of being handed to the host.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Opaque identifier of a host-supplied action
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionRef(Arc<str>);

impl ActionRef {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Identifier of an overlay group (e.g. `line-nav`, `word-nav`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(Arc<str>);

impl GroupId {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// What a resolved binding asks for
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Switch to Insert mode
    EnterInsert,
    /// Switch to Command mode
    EnterCommand,
    /// Leave Insert mode, or clear overlay/selection/pending input in Command mode
    Escape,
    /// Flip layout translation on or off
    ToggleLayout,
    /// Anything else is executed by the host
    Host(ActionRef),
}

impl Action {
    pub fn host(name: &str) -> Self {
        Action::Host(ActionRef::new(name))
    }

    /// The host action behind this, if any
    pub fn as_host(&self) -> Option<&ActionRef> {
        match self {
            Action::Host(action) => Some(action),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Action::EnterInsert => "EnterInsert",
            Action::EnterCommand => "EnterCommand",
            Action::Escape => "Escape",
            Action::ToggleLayout => "ToggleLayout",
            Action::Host(action) => action.name(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Parses action names from keymap YAML; unknown names become host actions
impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(());
        }
        match name {
            "EnterInsert" => Ok(Action::EnterInsert),
            "EnterCommand" => Ok(Action::EnterCommand),
            "Escape" => Ok(Action::Escape),
            "ToggleLayout" => Ok(Action::ToggleLayout),
            _ => Ok(Action::host(name)),
        }
    }
}
