//! Insert-mode notification via an external command

use std::process::{Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

use crate::host::Notifier;

/// Spawns the configured command with `1` (Insert entered) or `0`
/// (Insert left) appended
///
/// Fire-and-forget: the child is reaped on a short-lived thread and
/// failures are dropped after a debug log.
#[derive(Debug, Clone, Default)]
pub struct ProcessNotifier {
    command: Vec<String>,
}

impl ProcessNotifier {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    pub fn is_configured(&self) -> bool {
        !self.command.is_empty()
    }

    /// The full argv for one notification
    pub fn argv(&self, insert_active: bool) -> Option<Vec<String>> {
        if !self.is_configured() {
            return None;
        }
        let flag = if insert_active { "1" } else { "0" };
        let mut argv = self.command.clone();
        argv.push(flag.to_string());
        Some(argv)
    }

    /// Start one notification and reap it in the background
    ///
    /// The handle yields the exit status, or `None` when waiting failed.
    /// Returns `None` when nothing is configured or the spawn failed.
    pub fn spawn(&self, insert_active: bool) -> Option<JoinHandle<Option<ExitStatus>>> {
        let argv = self.argv(insert_active)?;

        let mut child = match Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                tracing::debug!("Notification command {:?} failed: {}", argv[0], e);
                return None;
            }
        };

        let reaper = std::thread::Builder::new()
            .name("keymode-notify".into())
            .spawn(move || match child.wait() {
                Ok(status) => {
                    if !status.success() {
                        tracing::debug!("Notification command exited with {}", status);
                    }
                    Some(status)
                }
                Err(e) => {
                    tracing::debug!("Waiting on notification command failed: {}", e);
                    None
                }
            });

        match reaper {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::debug!("Failed to start notification reaper: {}", e);
                None
            }
        }
    }
}

impl Notifier for ProcessNotifier {
    fn notify(&mut self, insert_active: bool) {
        let _ = self.spawn(insert_active);
    }
}
