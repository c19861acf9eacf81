//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.
//! They are executed in order by the runtime.

use std::time::Duration;

use crate::keymap::ActionRef;
use crate::messages::TimerKind;
use crate::model::IndicatorState;

/// Side effects produced by `update`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Run a host action; its outcome is logged only
    Execute(ActionRef),
    /// Clear the host's selection if it has one
    ClearSelection,
    /// (Re)start an idle countdown
    ArmTimer {
        kind: TimerKind,
        generation: u64,
        after: Duration,
    },
    /// Stop an idle countdown
    CancelTimer(TimerKind),
    /// Show a new indicator state
    ShowIndicator(IndicatorState),
    /// Tell the external listener whether Insert mode is active
    NotifyInsert(bool),
    /// Input fell through every table; the host handles it itself
    Passthrough(crate::messages::KeyEvent),
    /// Stop the engine loop
    Quit,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Collapse a list into a single command
    pub fn batch(cmds: Vec<Cmd>) -> Option<Cmd> {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Cmd::Batch(cmds)),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// Flatten nested batches into execution order
    pub fn into_vec(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::into_vec).collect(),
            cmd => vec![cmd],
        }
    }
}

// Allow converting Option<Cmd> to Cmd
impl From<Option<Cmd>> for Cmd {
    fn from(opt: Option<Cmd>) -> Self {
        opt.unwrap_or(Cmd::None)
    }
}
