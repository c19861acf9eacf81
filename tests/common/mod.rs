//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use keymode::commands::Cmd;
use keymode::config::EngineConfig;
use keymode::host::{Host, Indicator, Notifier};
use keymode::keymap::{parse_key_string, parse_keymap_yaml, ActionRef};
use keymode::layout::{load_layout, LayoutSet};
use keymode::messages::{KeyEvent, Msg};
use keymode::model::{EngineModel, IndicatorState};
use keymode::update::update;

/// Small keymap covering every layer
pub const TEST_KEYMAP: &str = r#"
global:
  - key: "a"
    action: GlobalA
  - key: "Ctrl+s"
    action: Save
    direct: true
command:
  - key: "a"
    action: CommandA
  - key: "i"
    action: EnterInsert
  - key: "Escape"
    action: Escape
    direct: true
  - key: "j"
    action: LineDown
  - key: "k"
    action: LineUp
  - key: "w"
    action: WordRight
  - key: "x"
    action: DeleteChar
  - key: "d d"
    action: DeleteLine
  - key: "f"
    action: FailMove
insert:
  - key: "Escape"
    action: EnterCommand
    direct: true
overlays:
  line-nav:
    - key: "j"
      action: LineDown
    - key: "k"
      action: LineUp
    - key: "a"
      action: OverlayA
  word-nav:
    - key: "w"
      action: WordRight
    - key: "a"
      action: Suppressed
repeat:
  line-nav: [LineDown, LineUp, FailMove]
  word-nav: [WordRight]
leaders:
  primary:
    tap: TapAction
    hold:
      - key: "x"
        action: HoldAction
  secondary:
    hold:
      - key: "c"
        action: ToggleComment
"#;

pub fn test_config() -> EngineConfig {
    EngineConfig::default()
}

/// Model over `TEST_KEYMAP` with translation off
pub fn test_model() -> EngineModel {
    test_model_with(TEST_KEYMAP, &test_config())
}

pub fn test_model_with(yaml: &str, config: &EngineConfig) -> EngineModel {
    let keymap = parse_keymap_yaml(yaml).expect("test keymap parses");
    let layout = LayoutSet::new(
        load_layout(&config.layout, None).expect("builtin layout"),
        config.layout_enabled,
    );
    EngineModel::new(keymap, layout, config).expect("tables build")
}

/// Run a message through update and flatten the commands
pub fn send(model: &mut EngineModel, msg: Msg) -> Vec<Cmd> {
    update(model, msg).map(Cmd::into_vec).unwrap_or_default()
}

/// Press one key given in chord token syntax, e.g. `"Ctrl+s"`
pub fn press(model: &mut EngineModel, token: &str) -> Vec<Cmd> {
    let keystroke = parse_key_string(token).expect("valid key token");
    send(model, Msg::key(keystroke))
}

/// Names of host actions the commands execute, in order
pub fn executed(cmds: &[Cmd]) -> Vec<String> {
    cmds.iter()
        .filter_map(|c| match c {
            Cmd::Execute(action) => Some(action.name().to_string()),
            _ => None,
        })
        .collect()
}

/// Everything the runtime asked of the outside world, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Executed(String),
    ClearedSelection,
    Passthrough(KeyEvent),
    Indicator(IndicatorState),
    Notified(bool),
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Host that records requests; actions named `Fail*` return an error
pub struct RecordingHost {
    pub log: EventLog,
    pub selection: bool,
}

impl RecordingHost {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            selection: false,
        }
    }
}

impl Host for RecordingHost {
    fn execute(&mut self, action: &ActionRef) -> anyhow::Result<()> {
        self.log
            .lock()
            .unwrap()
            .push(Event::Executed(action.name().to_string()));
        if action.name().starts_with("Fail") {
            anyhow::bail!("{} refused", action);
        }
        Ok(())
    }

    fn selection_active(&self) -> bool {
        self.selection
    }

    fn clear_selection(&mut self) {
        self.selection = false;
        self.log.lock().unwrap().push(Event::ClearedSelection);
    }

    fn passthrough(&mut self, event: KeyEvent) {
        self.log.lock().unwrap().push(Event::Passthrough(event));
    }
}

pub struct RecordingIndicator(pub EventLog);

impl Indicator for RecordingIndicator {
    fn show(&mut self, state: IndicatorState) {
        self.0.lock().unwrap().push(Event::Indicator(state));
    }
}

pub struct RecordingNotifier(pub EventLog);

impl Notifier for RecordingNotifier {
    fn notify(&mut self, insert_active: bool) {
        self.0.lock().unwrap().push(Event::Notified(insert_active));
    }
}
