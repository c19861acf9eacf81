use std::io::BufRead;

use anyhow::{Context, Result};
use clap::Parser;

use keymode::cli::{parse_input_line, CliArgs, CliCommand, KeymapSummary};
use keymode::config::EngineConfig;
use keymode::host::{Host, Indicator};
use keymode::keymap::{load_keymap, ActionRef};
use keymode::layout::{load_layout, LayoutSet};
use keymode::messages::{KeyEvent, Msg};
use keymode::model::{EngineModel, IndicatorState};
use keymode::notify::ProcessNotifier;
use keymode::runtime::Engine;

/// Host that reports every request on stdout
#[derive(Debug, Default)]
struct EchoHost {
    selection: bool,
}

impl Host for EchoHost {
    fn execute(&mut self, action: &ActionRef) -> Result<()> {
        println!("execute {}", action);
        if action.name().starts_with("Select") {
            self.selection = true;
        }
        Ok(())
    }

    fn selection_active(&self) -> bool {
        self.selection
    }

    fn clear_selection(&mut self) {
        println!("clear-selection");
        self.selection = false;
    }

    fn passthrough(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Key(keystroke) => println!("passthrough {}", keystroke),
            KeyEvent::LeaderTap(leader) => println!("passthrough tap {}", leader),
            KeyEvent::LeaderHold(leader) => println!("passthrough hold {}", leader),
        }
    }
}

struct StdoutIndicator;

impl Indicator for StdoutIndicator {
    fn show(&mut self, state: IndicatorState) {
        println!("indicator {}", state);
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    keymode::tracing::init();

    let config = match &args.config {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };

    let layout_name = args.layout.clone().unwrap_or_else(|| config.layout.clone());
    let layouts_file = keymode::config_paths::layouts_file();
    let layout = load_layout(&layout_name, layouts_file.as_deref())
        .with_context(|| format!("loading layout '{}'", layout_name))?;

    let keymap = load_keymap(args.keymap.as_deref()).context("loading keymap")?;

    let enabled = args.translate || config.layout_enabled;
    let model = EngineModel::new(keymap, LayoutSet::new(layout, enabled), &config)
        .context("building binding tables")?;

    match args.command.unwrap_or(CliCommand::Run) {
        CliCommand::Check { json } => {
            let summary = KeymapSummary::new(&model.tables, &model.layout);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary);
            }
            Ok(())
        }
        CliCommand::Run => run(model, &config),
    }
}

fn run(model: EngineModel, config: &EngineConfig) -> Result<()> {
    let notifier = ProcessNotifier::new(config.notify_command.clone());
    let mut engine = Engine::new(model, EchoHost::default(), StdoutIndicator, notifier)
        .context("starting timer thread")?;

    let tx = engine.sender();
    std::thread::Builder::new()
        .name("keymode-input".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::error!("Failed to read input: {}", e);
                        break;
                    }
                };
                match parse_input_line(&line) {
                    Ok(Some(msg)) => {
                        if tx.send(msg).is_err() {
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => eprintln!("{}", e),
                }
            }
            let _ = tx.send(Msg::Quit);
        })
        .context("starting input thread")?;

    engine.run();
    Ok(())
}
