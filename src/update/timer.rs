//! Idle timer expiry

use crate::commands::Cmd;
use crate::keymap::Action;
use crate::messages::TimerKind;
use crate::model::{EngineModel, Mode};

use super::key;

/// Handle a timer fire from the timer thread
///
/// Fires from an arming that has since been reset or cancelled are
/// dropped, as are fires whose condition no longer holds (Insert timer
/// outside Insert mode, Repeat timer without an overlay). A live fire
/// becomes an Escape processed like any other.
pub fn update_timer(model: &mut EngineModel, kind: TimerKind, generation: u64) -> Vec<Cmd> {
    if !model.timers.slot(kind).is_current(generation) {
        tracing::trace!(?kind, generation, "ignoring stale timer fire");
        return Vec::new();
    }

    let applies = match kind {
        TimerKind::Insert => model.mode == Mode::Insert,
        TimerKind::Repeat => model.overlay.is_some(),
    };
    model.timers.slot_mut(kind).cancel();

    if !applies {
        tracing::debug!(?kind, "timer fired with nothing to expire");
        return Vec::new();
    }

    tracing::info!(?kind, "idle timeout, synthesizing Escape");
    key::dispatch(model, Action::Escape)
}
