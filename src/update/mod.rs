//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions. Side effects
//! come back as [`Cmd`]s for the runtime to execute in order.

mod key;
pub mod layout;
pub mod mode;
pub mod overlay;
mod timer;

use crate::commands::Cmd;
use crate::messages::{KeyEvent, Msg, TimerKind};
use crate::model::{EngineModel, Mode, PendingInput};

#[cfg(debug_assertions)]
use crate::tracing::EngineSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use key::{dispatch, update_key};
pub use layout::{set_layout_enabled, toggle_layout};
pub use timer::update_timer;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut EngineModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut EngineModel, msg: Msg) -> Option<Cmd> {
    let is_key = matches!(msg, Msg::Key(_));

    let mut cmds = match msg {
        Msg::Key(event) => key::update_key(model, event),
        Msg::TimerFired { kind, generation } => timer::update_timer(model, kind, generation),
        Msg::ToggleLayout => {
            layout::toggle_layout(model);
            Vec::new()
        }
        Msg::SetLayoutEnabled(enabled) => {
            layout::set_layout_enabled(model, enabled);
            Vec::new()
        }
        Msg::CancelPending => cancel_pending(model),
        Msg::Quit => vec![Cmd::Quit],
    };

    // Any keystroke in Insert mode restarts the idle countdown
    if is_key && model.mode == Mode::Insert {
        let slot = &mut model.timers.insert;
        let generation = slot.arm();
        cmds.push(Cmd::ArmTimer {
            kind: TimerKind::Insert,
            generation,
            after: slot.duration,
        });
    }

    let indicator = model.indicator_state();
    if indicator != model.indicator {
        model.indicator = indicator;
        cmds.push(Cmd::ShowIndicator(indicator));
    }

    Cmd::batch(cmds)
}

/// Abandon whatever chord or leader prefix is in progress
///
/// Keys collected for an ordinary chord go back to the host; a leader
/// prefix is dropped silently.
fn cancel_pending(model: &mut EngineModel) -> Vec<Cmd> {
    match model.pending.take() {
        Some(PendingInput::Chord(keys)) => keys
            .into_iter()
            .map(|k| Cmd::Passthrough(KeyEvent::Key(k)))
            .collect(),
        Some(PendingInput::LeaderHold { leader, .. }) => {
            tracing::debug!(%leader, "leader prefix cancelled");
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after engine state and logs diffs for debugging.
#[cfg(debug_assertions)]
fn update_traced(model: &mut EngineModel, msg: Msg) -> Option<Cmd> {
    let msg_name = format!("{:?}", msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    let before = EngineSnapshot::from_model(model);
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(model, msg);

    let after = EngineSnapshot::from_model(model);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "state", %diff, "state changed");
    }

    model.assert_invariants(&msg_name);

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::keymap::{default_keymap, GroupId, KeyCode, Keystroke, Leader};
    use crate::layout::{load_layout, LayoutSet};
    use crate::model::IndicatorState;

    fn model() -> EngineModel {
        let keymap = default_keymap().unwrap();
        let layout = LayoutSet::new(load_layout("colemak-dh", None).unwrap(), false);
        EngineModel::new(keymap, layout, &EngineConfig::default()).unwrap()
    }

    fn send(model: &mut EngineModel, msg: Msg) -> Vec<Cmd> {
        update(model, msg).map(Cmd::into_vec).unwrap_or_default()
    }

    fn press(model: &mut EngineModel, c: char) -> Vec<Cmd> {
        send(model, Msg::key(Keystroke::char(c)))
    }

    fn executed(cmds: &[Cmd]) -> Vec<String> {
        cmds.iter()
            .filter_map(|c| match c {
                Cmd::Execute(action) => Some(action.name().to_string()),
                _ => None,
            })
            .collect()
    }

    fn armed_generation(cmds: &[Cmd], kind: TimerKind) -> Option<u64> {
        cmds.iter().find_map(|c| match c {
            Cmd::ArmTimer {
                kind: k,
                generation,
                ..
            } if *k == kind => Some(*generation),
            _ => None,
        })
    }

    #[test]
    fn test_command_key_executes_host_action() {
        let mut model = model();
        let cmds = press(&mut model, 'x');
        assert_eq!(executed(&cmds), vec!["DeleteChar"]);
        assert!(model.overlay.is_none());
    }

    #[test]
    fn test_repeatable_action_installs_overlay_and_shows_repeat() {
        let mut model = model();
        let cmds = press(&mut model, 'j');

        assert_eq!(executed(&cmds), vec!["LineDown"]);
        assert_eq!(model.overlay_group(), Some(&GroupId::from("line-nav")));
        assert!(armed_generation(&cmds, TimerKind::Repeat).is_some());
        assert!(cmds.contains(&Cmd::ShowIndicator(IndicatorState::Repeat)));
    }

    #[test]
    fn test_non_member_action_clears_overlay() {
        let mut model = model();
        press(&mut model, 'j');
        let cmds = press(&mut model, 'x');

        assert!(model.overlay.is_none());
        assert!(cmds.contains(&Cmd::CancelTimer(TimerKind::Repeat)));
        assert!(cmds.contains(&Cmd::ShowIndicator(IndicatorState::Command)));
    }

    #[test]
    fn test_overlay_suppression_hides_mode_binding() {
        let mut model = model();
        press(&mut model, 'j');
        let cmds = press(&mut model, 'i');

        // Suppressed in the overlay: the Command table's EnterInsert is skipped
        assert_eq!(
            cmds,
            vec![Cmd::Passthrough(KeyEvent::Key(Keystroke::char('i')))]
        );
        assert_eq!(model.mode, Mode::Command);
        assert!(model.overlay.is_some());
    }

    #[test]
    fn test_enter_insert_notifies_and_arms_insert_timer() {
        let mut model = model();
        let cmds = press(&mut model, 'i');

        assert_eq!(model.mode, Mode::Insert);
        assert!(cmds.contains(&Cmd::NotifyInsert(true)));
        assert!(armed_generation(&cmds, TimerKind::Insert).is_some());
        assert!(cmds.contains(&Cmd::ShowIndicator(IndicatorState::Insert)));
    }

    #[test]
    fn test_insert_mode_passes_typing_through() {
        let mut model = model();
        press(&mut model, 'i');
        let cmds = press(&mut model, 'q');

        assert!(cmds.contains(&Cmd::Passthrough(KeyEvent::Key(Keystroke::char('q')))));
        assert!(armed_generation(&cmds, TimerKind::Insert).is_some());
    }

    #[test]
    fn test_escape_in_command_clears_selection() {
        let mut model = model();
        let cmds = send(&mut model, Msg::key(Keystroke::key(KeyCode::Escape)));
        assert_eq!(cmds, vec![Cmd::ClearSelection]);
    }

    #[test]
    fn test_chord_waits_then_executes() {
        let mut model = model();
        assert!(press(&mut model, 'g').is_empty());
        assert!(model.pending.is_some());

        let cmds = press(&mut model, 'g');
        assert_eq!(executed(&cmds), vec!["DocumentStart"]);
        assert!(model.pending.is_none());
    }

    #[test]
    fn test_broken_chord_passes_keys_through() {
        let mut model = model();
        press(&mut model, 'g');
        let cmds = press(&mut model, 'q');
        assert_eq!(
            cmds,
            vec![
                Cmd::Passthrough(KeyEvent::Key(Keystroke::char('g'))),
                Cmd::Passthrough(KeyEvent::Key(Keystroke::char('q'))),
            ]
        );
    }

    #[test]
    fn test_cancel_pending_chord_returns_keys() {
        let mut model = model();
        press(&mut model, 'g');
        let cmds = send(&mut model, Msg::CancelPending);
        assert_eq!(
            cmds,
            vec![Cmd::Passthrough(KeyEvent::Key(Keystroke::char('g')))]
        );
    }

    #[test]
    fn test_leader_tap_and_hold_are_separate() {
        let mut model = model();
        let cmds = send(&mut model, Msg::tap(Leader::Primary));
        assert_eq!(executed(&cmds), vec!["TypeSpace"]);

        assert!(send(&mut model, Msg::hold(Leader::Primary)).is_empty());
        let cmds = press(&mut model, 'f');
        assert_eq!(executed(&cmds), vec!["FindFile"]);
        assert!(model.pending.is_none());
    }

    #[test]
    fn test_leader_hold_miss_is_swallowed() {
        let mut model = model();
        send(&mut model, Msg::hold(Leader::Secondary));
        let cmds = press(&mut model, 'x');
        assert!(cmds.is_empty());
        assert!(model.pending.is_none());
    }

    #[test]
    fn test_stale_repeat_timer_is_ignored() {
        let mut model = model();
        let first = armed_generation(&press(&mut model, 'j'), TimerKind::Repeat).unwrap();
        press(&mut model, 'k');

        let cmds = send(
            &mut model,
            Msg::TimerFired {
                kind: TimerKind::Repeat,
                generation: first,
            },
        );
        assert!(cmds.is_empty());
        assert!(model.overlay.is_some());
    }

    #[test]
    fn test_repeat_timer_expiry_escapes() {
        let mut model = model();
        let generation = armed_generation(&press(&mut model, 'j'), TimerKind::Repeat).unwrap();

        let cmds = send(
            &mut model,
            Msg::TimerFired {
                kind: TimerKind::Repeat,
                generation,
            },
        );
        assert!(model.overlay.is_none());
        assert!(cmds.contains(&Cmd::ClearSelection));
        assert!(cmds.contains(&Cmd::ShowIndicator(IndicatorState::Command)));
    }

    #[test]
    fn test_insert_timer_expiry_returns_to_command() {
        let mut model = model();
        let generation = armed_generation(&press(&mut model, 'i'), TimerKind::Insert).unwrap();

        let cmds = send(
            &mut model,
            Msg::TimerFired {
                kind: TimerKind::Insert,
                generation,
            },
        );
        assert_eq!(model.mode, Mode::Command);
        assert!(cmds.contains(&Cmd::NotifyInsert(false)));
    }

    #[test]
    fn test_toggle_layout_action_rebuilds_tables() {
        let mut model = model();
        assert!(!model.layout.is_enabled());

        send(&mut model, Msg::ToggleLayout);
        assert!(model.layout.is_enabled());

        // `j` now lives where Colemak-DH puts it
        let cmds = press(&mut model, 'n');
        assert_eq!(executed(&cmds), vec!["LineDown"]);
    }

    #[test]
    fn test_set_layout_enabled_is_idempotent() {
        let mut model = model();
        send(&mut model, Msg::SetLayoutEnabled(true));
        let tables = model.tables();
        send(&mut model, Msg::SetLayoutEnabled(true));
        assert!(std::sync::Arc::ptr_eq(&tables, &model.tables));
    }

    #[test]
    fn test_quit() {
        let mut model = model();
        assert_eq!(update(&mut model, Msg::Quit), Some(Cmd::Quit));
    }
}
