//! Repeat overlay lifecycle

use crate::commands::Cmd;
use crate::keymap::{Action, GroupId};
use crate::messages::TimerKind;
use crate::model::{EngineModel, OverlayState};

/// Apply the repeat registry after an action ran
///
/// A repeatable action installs (or keeps) its group's overlay and restarts
/// the repeat countdown. Anything else clears the overlay. Only the
/// action's identity matters, never how it went.
pub fn after_action(model: &mut EngineModel, action: &Action) -> Vec<Cmd> {
    match model.tables.repeat().group_of(action).cloned() {
        Some(group) => install(model, group),
        None => clear(model),
    }
}

/// Install the overlay for `group`, replacing any other group's overlay
pub fn install(model: &mut EngineModel, group: GroupId) -> Vec<Cmd> {
    match model.overlay.as_mut() {
        Some(overlay) if overlay.group == group => {
            tracing::trace!(
                group = %group,
                idle_ms = overlay.last_activity.elapsed().as_millis() as u64,
                "overlay kept alive"
            );
            overlay.touch();
        }
        Some(previous) => {
            tracing::debug!(from = %previous.group, to = %group, "replacing overlay");
            model.overlay = Some(OverlayState::new(group));
        }
        None => {
            tracing::debug!(group = %group, "installing overlay");
            model.overlay = Some(OverlayState::new(group));
        }
    }

    let slot = &mut model.timers.repeat;
    let generation = slot.arm();
    vec![Cmd::ArmTimer {
        kind: TimerKind::Repeat,
        generation,
        after: slot.duration,
    }]
}

/// Remove the overlay, if any, and stop its countdown
pub fn clear(model: &mut EngineModel) -> Vec<Cmd> {
    if let Some(overlay) = model.overlay.take() {
        tracing::debug!(group = %overlay.group, "clearing overlay");
    }

    if model.timers.repeat.cancel() {
        vec![Cmd::CancelTimer(TimerKind::Repeat)]
    } else {
        Vec::new()
    }
}
