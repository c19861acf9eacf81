//! Insert / Command transitions
//!
//! Every function here is total: any mode may receive any transition, and
//! the ones that do not apply are no-ops.

use crate::commands::Cmd;
use crate::messages::TimerKind;
use crate::model::{EngineModel, Mode};

use super::overlay;

/// Command → Insert
///
/// Always clears the overlay, even if already in Insert mode.
pub fn enter_insert(model: &mut EngineModel) -> Vec<Cmd> {
    let mut cmds = overlay::clear(model);
    model.pending = None;

    if model.mode == Mode::Insert {
        return cmds;
    }

    tracing::info!(target: "mode", "command → insert");
    model.mode = Mode::Insert;
    cmds.push(Cmd::NotifyInsert(true));
    cmds
}

/// Insert → Command
pub fn enter_command(model: &mut EngineModel) -> Vec<Cmd> {
    if model.mode == Mode::Command {
        return Vec::new();
    }

    tracing::info!(target: "mode", "insert → command");
    model.mode = Mode::Command;
    model.pending = None;

    let mut cmds = Vec::new();
    if model.timers.insert.cancel() {
        cmds.push(Cmd::CancelTimer(TimerKind::Insert));
    }
    cmds.push(Cmd::NotifyInsert(false));
    cmds
}

/// Escape: leave Insert mode, or in Command mode drop the overlay, any
/// pending input and the host's selection
pub fn escape(model: &mut EngineModel) -> Vec<Cmd> {
    let mut cmds = overlay::clear(model);
    model.pending = None;

    match model.mode {
        Mode::Insert => cmds.extend(enter_command(model)),
        Mode::Command => cmds.push(Cmd::ClearSelection),
    }
    cmds
}
