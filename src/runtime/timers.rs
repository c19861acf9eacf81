//! Idle timeout supervisor
//!
//! One background thread owns every deadline. The engine forwards
//! `ArmTimer` / `CancelTimer` commands to it, and it reports expiry by
//! posting `Msg::TimerFired` into the engine's queue. Whether a fire still
//! matters is decided by `update`, never here.

use std::collections::HashMap;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::messages::{Msg, TimerKind};

/// Requests sent to the timer thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerRequest {
    Arm {
        kind: TimerKind,
        generation: u64,
        after: Duration,
    },
    Cancel(TimerKind),
    Shutdown,
}

/// Handle to the timer thread; stops it on drop
#[derive(Debug)]
pub struct TimerSupervisor {
    tx: Sender<TimerRequest>,
    handle: Option<JoinHandle<()>>,
}

impl TimerSupervisor {
    /// Start the timer thread, posting fires into `events`
    pub fn spawn(events: Sender<Msg>) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel::<TimerRequest>();

        let handle = thread::Builder::new()
            .name("keymode-timers".into())
            .spawn(move || {
                let mut deadlines: HashMap<TimerKind, (Instant, u64)> = HashMap::new();

                loop {
                    let next = deadlines.values().map(|(at, _)| *at).min();
                    let request = match next {
                        Some(at) => {
                            let wait = at.saturating_duration_since(Instant::now());
                            rx.recv_timeout(wait)
                        }
                        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                    };

                    match request {
                        Ok(TimerRequest::Arm {
                            kind,
                            generation,
                            after,
                        }) => {
                            deadlines.insert(kind, (Instant::now() + after, generation));
                        }
                        Ok(TimerRequest::Cancel(kind)) => {
                            deadlines.remove(&kind);
                        }
                        Ok(TimerRequest::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                        Err(RecvTimeoutError::Timeout) => {}
                    }

                    let now = Instant::now();
                    let expired: Vec<TimerKind> = deadlines
                        .iter()
                        .filter(|(_, (at, _))| *at <= now)
                        .map(|(kind, _)| *kind)
                        .collect();

                    for kind in expired {
                        if let Some((_, generation)) = deadlines.remove(&kind) {
                            tracing::debug!(?kind, generation, "timer expired");
                            if events.send(Msg::TimerFired { kind, generation }).is_err() {
                                return;
                            }
                        }
                    }
                }

                tracing::debug!("timer thread stopped");
            })?;

        Ok(Self {
            tx,
            handle: Some(handle),
        })
    }

    pub fn arm(&self, kind: TimerKind, generation: u64, after: Duration) {
        self.send(TimerRequest::Arm {
            kind,
            generation,
            after,
        });
    }

    pub fn cancel(&self, kind: TimerKind) {
        self.send(TimerRequest::Cancel(kind));
    }

    fn send(&self, request: TimerRequest) {
        if self.tx.send(request).is_err() {
            tracing::warn!("Timer thread is gone; request dropped");
        }
    }
}

impl Drop for TimerSupervisor {
    fn drop(&mut self) {
        let _ = self.tx.send(TimerRequest::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
