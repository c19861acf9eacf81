//! Seams between the engine and the outside world
//!
//! The engine never touches the editor, the screen or other processes
//! directly. The runtime drives these traits from the commands `update`
//! returns.

use crate::keymap::ActionRef;
use crate::messages::KeyEvent;
use crate::model::IndicatorState;

/// The application whose actions the engine triggers
pub trait Host {
    /// Run a named action
    ///
    /// The result is only logged; mode and overlay handling never depend
    /// on it.
    fn execute(&mut self, action: &ActionRef) -> anyhow::Result<()>;

    /// Whether something is currently selected
    fn selection_active(&self) -> bool;

    fn clear_selection(&mut self);

    /// Input no table claimed; the host applies its own default handling
    fn passthrough(&mut self, event: KeyEvent) {
        tracing::trace!(?event, "unhandled passthrough");
    }
}

/// Mode indicator display
pub trait Indicator {
    fn show(&mut self, state: IndicatorState);
}

/// External listener told whenever Insert mode starts or ends
pub trait Notifier {
    fn notify(&mut self, insert_active: bool);
}
