//! Layout translation: logical key labels → physical glyphs
//!
//! Binding chords are written against one canonical layout. When layout
//! translation is enabled every (non-direct) chord is rewritten token by
//! token through the active [`LayoutTable`] before the binding tables are
//! built, so a keyboard running a different layout keeps the same
//! positional bindings.
//!
//! Translation happens only while tables are built. Live key events are
//! never translated; instead the whole table set is rebuilt when the
//! layout flag flips.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::keymap::{parse_key_string, split_token, KeymapError};

/// Layout tables embedded at compile time
const DEFAULT_LAYOUTS_YAML: &str = include_str!("../layouts.yaml");

/// Root structure of a layouts YAML file
#[derive(Debug, Deserialize)]
struct LayoutsConfig {
    layouts: BTreeMap<String, BTreeMap<String, String>>,
}

/// A bijective mapping from logical key labels to physical glyphs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutTable {
    name: String,
    forward: HashMap<String, String>,
    inverse: HashMap<String, String>,
}

impl LayoutTable {
    /// A layout that covers nothing (every token passes through)
    pub fn identity(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            forward: HashMap::new(),
            inverse: HashMap::new(),
        }
    }

    /// Build a layout from (logical, glyph) pairs
    ///
    /// Both sides must be single un-modified key tokens. Two logical keys
    /// may not share a glyph. Lowercase letter pairs also map their
    /// uppercase forms unless those are already covered.
    pub fn from_pairs<I, K, V>(name: impl Into<String>, pairs: I) -> Result<Self, KeymapError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::identity(name);
        let mut letters = Vec::new();

        for (logical, glyph) in pairs {
            let (logical, glyph) = (logical.into(), glyph.into());
            table.check_key(&logical)?;
            table.check_key(&glyph)?;
            if let (Some(l), Some(g)) = (single_lowercase(&logical), single_lowercase(&glyph)) {
                letters.push((l, g));
            }
            table.insert(logical, glyph)?;
        }

        for (l, g) in letters {
            let (upper_l, upper_g) = (l.to_uppercase().to_string(), g.to_uppercase().to_string());
            if table.forward.contains_key(&upper_l) || table.inverse.contains_key(&upper_g) {
                tracing::debug!(
                    layout = %table.name,
                    key = %upper_l,
                    "shifted variant already covered, not derived"
                );
                continue;
            }
            table.insert(upper_l, upper_g)?;
        }

        Ok(table)
    }

    fn check_key(&self, key: &str) -> Result<(), KeymapError> {
        let stroke = parse_key_string(key).map_err(|e| {
            KeymapError::InvalidLayout(format!("{}: '{}' ({})", self.name, key, e))
        })?;
        if !stroke.mods.is_empty() {
            return Err(KeymapError::InvalidLayout(format!(
                "{}: '{}' carries modifiers",
                self.name, key
            )));
        }
        Ok(())
    }

    fn insert(&mut self, logical: String, glyph: String) -> Result<(), KeymapError> {
        if let Some(existing) = self.inverse.get(&glyph) {
            if existing != &logical {
                return Err(KeymapError::InvalidLayout(format!(
                    "{}: '{}' and '{}' both map to '{}'",
                    self.name, existing, logical, glyph
                )));
            }
        }
        if let Some(previous) = self.forward.get(&logical) {
            if previous != &glyph {
                return Err(KeymapError::InvalidLayout(format!(
                    "{}: '{}' mapped twice ('{}', '{}')",
                    self.name, logical, previous, glyph
                )));
            }
        }
        self.inverse.insert(glyph.clone(), logical.clone());
        self.forward.insert(logical, glyph);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Glyph for a logical key, if covered
    pub fn glyph(&self, logical: &str) -> Option<&str> {
        self.forward.get(logical).map(String::as_str)
    }

    /// Logical key for a glyph, if covered
    pub fn logical(&self, glyph: &str) -> Option<&str> {
        self.inverse.get(glyph).map(String::as_str)
    }

    /// Logical keys this layout maps
    pub fn covered_keys(&self) -> impl Iterator<Item = &str> {
        self.forward.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Translate a whole chord from logical labels to physical glyphs
    pub fn translate(&self, chord: &str) -> Result<String, KeymapError> {
        map_chord(chord, &self.forward)
    }

    /// Inverse of [`LayoutTable::translate`]
    pub fn untranslate(&self, chord: &str) -> Result<String, KeymapError> {
        map_chord(chord, &self.inverse)
    }
}

fn single_lowercase(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_lowercase() => Some(c),
        _ => None,
    }
}

/// Split on whitespace, map each token's base key, rejoin with single spaces
///
/// Modifier prefixes are kept and only the base key is looked up. Unmapped
/// tokens pass through unchanged. Every resulting token must satisfy the
/// chord grammar.
fn map_chord(chord: &str, map: &HashMap<String, String>) -> Result<String, KeymapError> {
    let mut tokens = Vec::new();

    for token in chord.split_whitespace() {
        let (prefix, base) = split_token(token);
        let mapped = match map.get(base) {
            Some(glyph) => format!("{}{}", prefix, glyph),
            None => token.to_string(),
        };
        parse_key_string(&mapped)?;
        tokens.push(mapped);
    }

    if tokens.is_empty() {
        return Err(KeymapError::InvalidKey("empty chord".to_string()));
    }
    Ok(tokens.join(" "))
}

/// Translate `chord` through `layout`
pub fn translate(chord: &str, layout: &LayoutTable) -> Result<String, KeymapError> {
    layout.translate(chord)
}

/// The selected layout plus the process-wide translation flag
#[derive(Debug, Clone)]
pub struct LayoutSet {
    active: Arc<LayoutTable>,
    enabled: bool,
}

impl LayoutSet {
    pub fn new(layout: LayoutTable, enabled: bool) -> Self {
        Self {
            active: Arc::new(layout),
            enabled,
        }
    }

    pub fn layout(&self) -> &LayoutTable {
        &self.active
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The table to translate through when building bindings, if enabled
    pub fn translation(&self) -> Option<&LayoutTable> {
        self.enabled.then_some(&*self.active)
    }

    /// Flip the flag, returning the new state
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// Set the flag; returns whether it changed
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.enabled != enabled;
        self.enabled = enabled;
        changed
    }
}

/// Parse every layout in a layouts YAML document
pub fn parse_layouts_yaml(yaml: &str) -> Result<Vec<LayoutTable>, KeymapError> {
    let config: LayoutsConfig =
        serde_yaml::from_str(yaml).map_err(|e| KeymapError::ParseError(e.to_string()))?;

    config
        .layouts
        .into_iter()
        .map(|(name, pairs)| LayoutTable::from_pairs(name, pairs))
        .collect()
}

/// Find a layout by name: a user layouts file first, then the embedded tables
pub fn load_layout(name: &str, user_file: Option<&Path>) -> Result<LayoutTable, KeymapError> {
    if let Some(path) = user_file.filter(|p| p.exists()) {
        let content = std::fs::read_to_string(path)
            .map_err(|e| KeymapError::IoError(format!("{}: {}", path.display(), e)))?;
        if let Some(layout) = parse_layouts_yaml(&content)?
            .into_iter()
            .find(|l| l.name() == name)
        {
            tracing::info!("Loaded layout '{}' from {}", name, path.display());
            return Ok(layout);
        }
    }

    parse_layouts_yaml(DEFAULT_LAYOUTS_YAML)?
        .into_iter()
        .find(|l| l.name() == name)
        .ok_or_else(|| KeymapError::UnknownLayout(name.to_string()))
}

/// Names of the layouts compiled into the binary
pub fn builtin_layout_names() -> Vec<String> {
    parse_layouts_yaml(DEFAULT_LAYOUTS_YAML)
        .map(|layouts| layouts.into_iter().map(|l| l.name().to_string()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LayoutTable {
        LayoutTable::from_pairs("sample", [("e", "f"), ("f", "t"), ("j", "n"), ("p", ";")])
            .unwrap()
    }

    #[test]
    fn test_translate_maps_each_token() {
        let layout = sample();
        assert_eq!(layout.translate("e j").unwrap(), "f n");
        assert_eq!(translate("  e   x ", &layout).unwrap(), "f x");
    }

    #[test]
    fn test_translate_keeps_modifiers() {
        let layout = sample();
        assert_eq!(layout.translate("Ctrl+e").unwrap(), "Ctrl+f");
        assert_eq!(layout.translate("Return").unwrap(), "Return");
    }

    #[test]
    fn test_shifted_variant_derived() {
        let layout = sample();
        assert_eq!(layout.glyph("E"), Some("F"));
        assert_eq!(layout.glyph("P"), None);
    }

    #[test]
    fn test_translate_rejects_malformed_token() {
        let layout = sample();
        assert!(matches!(
            layout.translate("Ctrl+"),
            Err(KeymapError::InvalidKey(_))
        ));
        assert!(layout.translate("").is_err());
    }

    #[test]
    fn test_rejects_non_injective_layout() {
        let err = LayoutTable::from_pairs("bad", [("a", "x"), ("b", "x")]).unwrap_err();
        assert!(matches!(err, KeymapError::InvalidLayout(_)));
    }

    #[test]
    fn test_rejects_modified_glyph() {
        assert!(LayoutTable::from_pairs("bad", [("a", "Ctrl+b")]).is_err());
    }

    #[test]
    fn test_builtin_layouts_are_bijective() {
        let layouts = parse_layouts_yaml(DEFAULT_LAYOUTS_YAML).unwrap();
        assert!(!layouts.is_empty());

        for layout in &layouts {
            for key in layout.covered_keys() {
                let glyph = layout.translate(key).unwrap();
                assert_eq!(
                    layout.untranslate(&glyph).unwrap(),
                    key,
                    "{}: {} → {} does not invert",
                    layout.name(),
                    key,
                    glyph
                );
            }
        }
    }

    #[test]
    fn test_load_layout_by_name() {
        let layout = load_layout("colemak-dh", None).unwrap();
        assert_eq!(layout.glyph("j"), Some("n"));
        assert_eq!(layout.glyph("P"), Some(":"));

        assert!(matches!(
            load_layout("nope", None),
            Err(KeymapError::UnknownLayout(_))
        ));
    }

    #[test]
    fn test_user_layout_file_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layouts.yaml");
        std::fs::write(&path, "layouts:\n  colemak-dh:\n    \"j\": \"x\"\n").unwrap();

        let layout = load_layout("colemak-dh", Some(&path)).unwrap();
        assert_eq!(layout.glyph("j"), Some("x"));
    }

    #[test]
    fn test_layout_set_toggle() {
        let mut set = LayoutSet::new(sample(), false);
        assert!(set.translation().is_none());
        assert!(set.toggle());
        assert!(set.translation().is_some());
        assert!(!set.set_enabled(true));
        assert!(set.set_enabled(false));
        assert!(!set.is_enabled());
    }
}
