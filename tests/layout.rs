//! Layout translation tests

use keymode::keymap::{parse_chord, KeymapError};
use keymode::layout::{builtin_layout_names, load_layout, LayoutSet, LayoutTable};

#[test]
fn test_every_builtin_layout_round_trips_covered_keys() {
    for name in builtin_layout_names() {
        let layout = load_layout(&name, None).unwrap();
        assert!(!layout.is_empty(), "{} covers no keys", name);

        for key in layout.covered_keys() {
            let glyph = layout.translate(key).unwrap();
            assert_eq!(layout.untranslate(&glyph).unwrap(), key, "{}: {}", name, key);
        }
    }
}

#[test]
fn test_round_trip_with_modifiers_and_chords() {
    let layout = load_layout("colemak-dh", None).unwrap();

    for chord in ["Ctrl+j", "g g", "Ctrl+Shift+k x", "Escape", "F5 ;"] {
        let glyphs = layout.translate(chord).unwrap();
        assert!(parse_chord(&glyphs).is_ok());
        assert_eq!(layout.untranslate(&glyphs).unwrap(), chord);
    }
}

#[test]
fn test_translation_normalizes_whitespace() {
    let layout = LayoutTable::identity("qwerty");
    assert_eq!(layout.translate("  g \t g ").unwrap(), "g g");
}

#[test]
fn test_malformed_chord_fails_translation() {
    let layout = load_layout("dvorak", None).unwrap();
    assert!(matches!(
        layout.translate("Hyper+j"),
        Err(KeymapError::InvalidKey(_))
    ));
    assert!(layout.translate("   ").is_err());
}

#[test]
fn test_unknown_layout() {
    assert_eq!(
        load_layout("workman-x", None).unwrap_err(),
        KeymapError::UnknownLayout("workman-x".to_string())
    );
}

#[test]
fn test_set_enabled_reports_change() {
    let mut set = LayoutSet::new(load_layout("colemak-dh", None).unwrap(), false);
    assert!(set.translation().is_none());
    assert!(set.set_enabled(true));
    assert!(!set.set_enabled(true));
    assert_eq!(set.translation().map(LayoutTable::name), Some("colemak-dh"));
    assert!(!set.toggle());
}
