//! Runtime - drives the update loop and performs side effects
//!
//! - `engine` - the single-consumer event loop executing commands
//! - `timers` - the idle timeout thread

pub mod engine;
pub mod timers;

pub use engine::Engine;
pub use timers::{TimerRequest, TimerSupervisor};
