//! Binding resolution tests
//!
//! Layer priority, suppression, chords, layout translation and leader keys

mod common;

use common::{executed, press, send, test_config, test_model, test_model_with, TEST_KEYMAP};

use keymode::commands::Cmd;
use keymode::keymap::{parse_chord, Action, GroupId, Leader, Resolution};
use keymode::messages::{KeyEvent, Msg};
use keymode::model::Mode;

fn resolve(model: &keymode::EngineModel, chord: &str, overlay: Option<&str>) -> Resolution {
    let keys = parse_chord(chord).unwrap();
    let group = overlay.map(GroupId::from);
    model.tables.resolve(&keys, model.mode, group.as_ref())
}

// ========================================================================
// Layer Priority
// ========================================================================

#[test]
fn test_mode_table_beats_global() {
    let model = test_model();
    assert_eq!(
        resolve(&model, "a", None),
        Resolution::Action(Action::host("CommandA"))
    );
}

#[test]
fn test_overlay_beats_mode_table() {
    let model = test_model();
    assert_eq!(
        resolve(&model, "a", Some("line-nav")),
        Resolution::Action(Action::host("OverlayA"))
    );
}

#[test]
fn test_overlay_suppression_stops_fallthrough() {
    let model = test_model();
    // word-nav suppresses "a" although Command and Global both bind it
    assert_eq!(resolve(&model, "a", Some("word-nav")), Resolution::Unbound);
}

#[test]
fn test_priority_through_live_overlays() {
    let mut model = test_model();
    assert_eq!(executed(&press(&mut model, "a")), vec!["CommandA"]);

    press(&mut model, "j");
    assert_eq!(executed(&press(&mut model, "a")), vec!["OverlayA"]);

    press(&mut model, "w");
    let cmds = press(&mut model, "a");
    assert!(executed(&cmds).is_empty());
    assert!(cmds.contains(&Cmd::Passthrough(KeyEvent::Key(
        keymode::keymap::Keystroke::char('a')
    ))));
}

#[test]
fn test_global_reached_when_mode_table_is_silent() {
    let mut model = test_model();
    press(&mut model, "i");
    assert_eq!(model.mode, Mode::Insert);
    assert_eq!(executed(&press(&mut model, "a")), vec!["GlobalA"]);
    assert_eq!(executed(&press(&mut model, "Ctrl+s")), vec!["Save"]);
}

#[test]
fn test_unbound_key_passes_through() {
    let mut model = test_model();
    let cmds = press(&mut model, "z");
    assert_eq!(
        cmds,
        vec![Cmd::Passthrough(KeyEvent::Key(
            keymode::keymap::Keystroke::char('z')
        ))]
    );
}

// ========================================================================
// Chords
// ========================================================================

#[test]
fn test_chord_prefix_is_pending() {
    let model = test_model();
    assert_eq!(resolve(&model, "d", None), Resolution::Pending);
    assert_eq!(
        resolve(&model, "d d", None),
        Resolution::Action(Action::host("DeleteLine"))
    );
}

#[test]
fn test_abandoned_chord_does_not_resolve_second_key() {
    let mut model = test_model();
    assert!(press(&mut model, "d").is_empty());
    let cmds = press(&mut model, "j");
    assert!(executed(&cmds).is_empty());
    assert_eq!(cmds.len(), 2);
    assert!(model.pending.is_none());
}

// ========================================================================
// Layout Translation
// ========================================================================

#[test]
fn test_translated_tables_use_layout_positions() {
    let mut config = test_config();
    config.layout_enabled = true;
    let mut model = test_model_with(TEST_KEYMAP, &config);

    // Colemak-DH puts the QWERTY `j` position on `n`
    assert_eq!(executed(&press(&mut model, "n")), vec!["LineDown"]);
    // Direct entries are left alone
    assert_eq!(executed(&press(&mut model, "Ctrl+s")), vec!["Save"]);
}

#[test]
fn test_toggle_layout_round_trip_restores_tables() {
    let mut model = test_model();
    send(&mut model, Msg::ToggleLayout);
    assert!(model.layout.is_enabled());
    send(&mut model, Msg::ToggleLayout);
    assert!(!model.layout.is_enabled());
    assert_eq!(executed(&press(&mut model, "j")), vec!["LineDown"]);
}

// ========================================================================
// Leader Keys
// ========================================================================

#[test]
fn test_leader_tap_and_hold_resolve_disjoint_tables() {
    let mut model = test_model();

    assert_eq!(
        executed(&send(&mut model, Msg::tap(Leader::Primary))),
        vec!["TapAction"]
    );

    send(&mut model, Msg::hold(Leader::Primary));
    assert_eq!(executed(&press(&mut model, "x")), vec!["HoldAction"]);

    // Without the hold prefix `x` is the Command binding
    assert_eq!(executed(&press(&mut model, "x")), vec!["DeleteChar"]);
}

#[test]
fn test_tap_during_hold_never_reaches_hold_table() {
    let mut model = test_model();

    send(&mut model, Msg::hold(Leader::Primary));
    assert_eq!(
        executed(&send(&mut model, Msg::tap(Leader::Primary))),
        vec!["TapAction"]
    );
    assert!(model.pending.is_none());
    assert_eq!(executed(&press(&mut model, "x")), vec!["DeleteChar"]);
}

#[test]
fn test_hold_prefix_ignores_mode_bindings() {
    let mut model = test_model();
    send(&mut model, Msg::hold(Leader::Secondary));
    let cmds = press(&mut model, "j");
    assert!(cmds.is_empty());
    assert!(model.overlay.is_none());
}

#[test]
fn test_leader_without_tap_target_passes_through() {
    let mut model = test_model();
    let cmds = send(&mut model, Msg::tap(Leader::Secondary));
    assert_eq!(
        cmds,
        vec![Cmd::Passthrough(KeyEvent::LeaderTap(Leader::Secondary))]
    );
}

#[test]
fn test_cancel_pending_drops_leader_prefix() {
    let mut model = test_model();
    send(&mut model, Msg::hold(Leader::Secondary));
    assert!(send(&mut model, Msg::CancelPending).is_empty());
    assert!(model.pending.is_none());
    assert_eq!(executed(&press(&mut model, "x")), vec!["DeleteChar"]);
}

#[test]
fn test_escape_aborts_leader_prefix_and_leaves_insert() {
    let mut model = test_model();
    press(&mut model, "i");
    assert_eq!(model.mode, Mode::Insert);

    send(&mut model, Msg::hold(Leader::Primary));
    let cmds = press(&mut model, "Escape");
    assert!(model.pending.is_none());
    assert_eq!(model.mode, Mode::Command);
    assert!(cmds.contains(&Cmd::NotifyInsert(false)));
}
