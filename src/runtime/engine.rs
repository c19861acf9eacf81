//! The engine event loop
//!
//! Key events, layout requests and timer fires all arrive on one queue and
//! are handled strictly one at a time. Commands returned by `update` are
//! executed in order before the next message is taken.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::commands::Cmd;
use crate::host::{Host, Indicator, Notifier};
use crate::messages::Msg;
use crate::model::EngineModel;
use crate::update::update;

use super::timers::TimerSupervisor;

pub struct Engine<H, I, N> {
    model: EngineModel,
    host: H,
    indicator: I,
    notifier: N,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    timers: TimerSupervisor,
}

impl<H: Host, I: Indicator, N: Notifier> Engine<H, I, N> {
    pub fn new(model: EngineModel, host: H, indicator: I, notifier: N) -> std::io::Result<Self> {
        let (msg_tx, msg_rx) = mpsc::channel();
        let timers = TimerSupervisor::spawn(msg_tx.clone())?;

        Ok(Self {
            model,
            host,
            indicator,
            notifier,
            msg_tx,
            msg_rx,
            timers,
        })
    }

    /// A handle for posting messages from other threads
    pub fn sender(&self) -> Sender<Msg> {
        self.msg_tx.clone()
    }

    pub fn model(&self) -> &EngineModel {
        &self.model
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Process messages until `Msg::Quit` or every sender is gone
    pub fn run(&mut self) {
        self.indicator.show(self.model.indicator);
        tracing::info!(mode = %self.model.mode, "engine started");

        while let Ok(msg) = self.msg_rx.recv() {
            if !self.handle(msg) {
                break;
            }
        }

        tracing::info!("engine stopped");
    }

    /// Run one message through `update` and execute its commands
    ///
    /// Returns false when the engine should stop.
    pub fn handle(&mut self, msg: Msg) -> bool {
        match update(&mut self.model, msg) {
            Some(cmd) => self.process_cmd(cmd),
            None => true,
        }
    }

    fn process_cmd(&mut self, cmd: Cmd) -> bool {
        match cmd {
            Cmd::None => {}
            Cmd::Execute(action) => {
                if let Err(e) = self.host.execute(&action) {
                    tracing::warn!("Action {} failed: {:#}", action, e);
                }
            }
            Cmd::ClearSelection => {
                if self.host.selection_active() {
                    self.host.clear_selection();
                }
            }
            Cmd::ArmTimer {
                kind,
                generation,
                after,
            } => self.timers.arm(kind, generation, after),
            Cmd::CancelTimer(kind) => self.timers.cancel(kind),
            Cmd::ShowIndicator(state) => self.indicator.show(state),
            Cmd::NotifyInsert(active) => self.notifier.notify(active),
            Cmd::Passthrough(event) => self.host.passthrough(event),
            Cmd::Quit => return false,
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    if !self.process_cmd(cmd) {
                        return false;
                    }
                }
            }
        }
        true
    }
}
