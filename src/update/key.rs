//! Key event resolution and action dispatch

use crate::commands::Cmd;
use crate::keymap::{Action, KeyCode, Keystroke, Leader, Resolution};
use crate::messages::KeyEvent;
use crate::model::{EngineModel, PendingInput};

use super::{layout, mode, overlay};

/// Resolve one key event and run whatever it maps to
pub fn update_key(model: &mut EngineModel, event: KeyEvent) -> Vec<Cmd> {
    match event {
        KeyEvent::LeaderTap(leader) => leader_tap(model, leader),
        KeyEvent::LeaderHold(leader) => {
            if let Some(abandoned) = model.pending.take() {
                tracing::debug!(pending = %abandoned.display(), "leader hold abandons pending input");
            }
            tracing::debug!(%leader, "leader prefix started");
            model.pending = Some(PendingInput::LeaderHold {
                leader,
                keys: Vec::new(),
            });
            Vec::new()
        }
        KeyEvent::Key(keystroke)
            if keystroke == Keystroke::key(KeyCode::Escape) && model.pending.is_some() =>
        {
            let mut cmds = abort_pending(model);
            cmds.extend(chord_key(model, Vec::new(), keystroke));
            cmds
        }
        KeyEvent::Key(keystroke) => match model.pending.take() {
            Some(PendingInput::LeaderHold { leader, keys }) => {
                leader_hold_key(model, leader, keys, keystroke)
            }
            Some(PendingInput::Chord(keys)) => chord_key(model, keys, keystroke),
            None => chord_key(model, Vec::new(), keystroke),
        },
    }
}

/// Drop the pending prefix ahead of an Escape
///
/// Chord keys go back to the host; a leader prefix is discarded.
fn abort_pending(model: &mut EngineModel) -> Vec<Cmd> {
    match model.pending.take() {
        Some(PendingInput::Chord(keys)) => keys
            .into_iter()
            .map(|k| Cmd::Passthrough(KeyEvent::Key(k)))
            .collect(),
        Some(PendingInput::LeaderHold { leader, keys }) => {
            tracing::debug!(
                %leader,
                keys = %crate::keymap::chord_display(&keys),
                "leader prefix aborted by escape"
            );
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn leader_tap(model: &mut EngineModel, leader: Leader) -> Vec<Cmd> {
    if let Some(abandoned) = model.pending.take() {
        tracing::debug!(pending = %abandoned.display(), "leader tap abandons pending input");
    }

    match model.tables.resolve_leader_tap(leader) {
        Resolution::Action(action) => dispatch(model, action),
        Resolution::Pending | Resolution::Unbound => {
            vec![Cmd::Passthrough(KeyEvent::LeaderTap(leader))]
        }
    }
}

fn leader_hold_key(
    model: &mut EngineModel,
    leader: Leader,
    mut keys: Vec<Keystroke>,
    keystroke: Keystroke,
) -> Vec<Cmd> {
    keys.push(keystroke);

    match model.tables.resolve_leader_hold(leader, &keys) {
        Resolution::Action(action) => dispatch(model, action),
        Resolution::Pending => {
            model.pending = Some(PendingInput::LeaderHold { leader, keys });
            Vec::new()
        }
        Resolution::Unbound => {
            tracing::debug!(
                %leader,
                keys = %crate::keymap::chord_display(&keys),
                "leader prefix aborted"
            );
            Vec::new()
        }
    }
}

fn chord_key(model: &mut EngineModel, mut keys: Vec<Keystroke>, keystroke: Keystroke) -> Vec<Cmd> {
    keys.push(keystroke);

    let resolution = model
        .tables
        .resolve(&keys, model.mode, model.overlay_group());

    match resolution {
        Resolution::Action(action) => dispatch(model, action),
        Resolution::Pending => {
            model.pending = Some(PendingInput::Chord(keys));
            Vec::new()
        }
        Resolution::Unbound => keys
            .into_iter()
            .map(|k| Cmd::Passthrough(KeyEvent::Key(k)))
            .collect(),
    }
}

/// Run a resolved action: host execution, repeat registry, then mode effects
pub fn dispatch(model: &mut EngineModel, action: Action) -> Vec<Cmd> {
    tracing::debug!(%action, mode = %model.mode, "dispatching action");

    let mut cmds = Vec::new();
    if let Action::Host(action_ref) = &action {
        cmds.push(Cmd::Execute(action_ref.clone()));
    }

    cmds.extend(overlay::after_action(model, &action));

    match action {
        Action::EnterInsert => cmds.extend(mode::enter_insert(model)),
        Action::EnterCommand => cmds.extend(mode::enter_command(model)),
        Action::Escape => cmds.extend(mode::escape(model)),
        Action::ToggleLayout => {
            layout::toggle_layout(model);
        }
        Action::Host(_) => {}
    }

    cmds
}
