//! Idle timer bookkeeping
//!
//! The model only tracks which arming of each timer is current. The clock
//! itself runs in the runtime's timer thread, which reports expiry back as
//! a message carrying the generation it was armed with.

use std::time::Duration;

use crate::messages::TimerKind;

/// Default idle timeout for both timers
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(120);

/// State of one idle countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSlot {
    pub duration: Duration,
    pub generation: u64,
    pub armed: bool,
}

impl TimerSlot {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            generation: 0,
            armed: false,
        }
    }

    /// Start or restart the countdown, returning its generation
    pub fn arm(&mut self) -> u64 {
        self.generation += 1;
        self.armed = true;
        self.generation
    }

    /// Stop the countdown; returns whether it was running
    pub fn cancel(&mut self) -> bool {
        let was_armed = self.armed;
        self.armed = false;
        was_armed
    }

    /// Whether a fire with this generation is the live one
    pub fn is_current(&self, generation: u64) -> bool {
        self.armed && self.generation == generation
    }
}

/// Both idle countdowns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timers {
    pub insert: TimerSlot,
    pub repeat: TimerSlot,
}

impl Timers {
    pub fn new(insert: Duration, repeat: Duration) -> Self {
        Self {
            insert: TimerSlot::new(insert),
            repeat: TimerSlot::new(repeat),
        }
    }

    pub fn slot(&self, kind: TimerKind) -> &TimerSlot {
        match kind {
            TimerKind::Insert => &self.insert,
            TimerKind::Repeat => &self.repeat,
        }
    }

    pub fn slot_mut(&mut self, kind: TimerKind) -> &mut TimerSlot {
        match kind {
            TimerKind::Insert => &mut self.insert,
            TimerKind::Repeat => &mut self.repeat,
        }
    }
}

impl Default for Timers {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT, DEFAULT_IDLE_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rearm_invalidates_previous_generation() {
        let mut slot = TimerSlot::new(DEFAULT_IDLE_TIMEOUT);
        let first = slot.arm();
        let second = slot.arm();
        assert!(!slot.is_current(first));
        assert!(slot.is_current(second));
    }

    #[test]
    fn test_cancel_invalidates_generation() {
        let mut slot = TimerSlot::new(DEFAULT_IDLE_TIMEOUT);
        let generation = slot.arm();
        assert!(slot.cancel());
        assert!(!slot.is_current(generation));
        assert!(!slot.cancel());
    }
}
