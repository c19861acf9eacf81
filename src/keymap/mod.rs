//! Declarative, layered keyboard mapping
//!
//! This module turns keymap declarations into immutable binding tables and
//! resolves keystroke sequences against them:
//! - Chords are whitespace-separated tokens (`"g g"`, `"Ctrl+x"`)
//! - Tables exist per mode, globally, per overlay group and per leader hold
//! - An entry is either bound to an action or explicitly `Suppressed`
//! - Repeatable actions name the overlay group they keep alive
//!
//! # Architecture
//!
//! ```text
//! keymap.yaml → KeymapDecl → (layout translation) → TableSet::build()
//! Keystroke* → TableSet::resolve() → Resolution
//! ```

mod action;
mod binding;
mod config;
mod defaults;
mod repeat;
mod resolver;
mod table;
mod types;

pub use action::{Action, ActionRef, GroupId};
pub use binding::{Binding, BindingDecl, BindingTarget, Leader};
pub use config::{
    load_keymap_file, merge_bindings, parse_chord, parse_key_string, parse_keymap_yaml,
    split_token, KeymapDecl, KeymapError, LeaderDecl,
};
pub use defaults::{default_keymap, get_default_keymap_yaml, load_keymap};
pub use repeat::RepeatRegistry;
pub use resolver::{LeaderSlot, Resolution, TableSet};
pub use table::{BindingTable, Lookup};
pub use types::{chord_display, KeyCode, Keystroke, Modifiers};
