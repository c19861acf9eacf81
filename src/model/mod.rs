//! Engine model - the complete state of the modal engine
//!
//! Everything that changes while keys are processed lives in
//! [`EngineModel`]. It is mutated only by [`crate::update::update`].

pub mod state;
pub mod timers;

pub use state::{IndicatorState, Mode, OverlayState, PendingInput};
pub use timers::{TimerSlot, Timers, DEFAULT_IDLE_TIMEOUT};

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::keymap::{KeymapDecl, KeymapError, TableSet};
use crate::layout::LayoutSet;

/// The complete engine state
#[derive(Debug, Clone)]
pub struct EngineModel {
    pub mode: Mode,
    /// At most one overlay is ever active
    pub overlay: Option<OverlayState>,
    pub pending: Option<PendingInput>,
    /// Current table set; replaced whole on rebuild
    pub tables: Arc<TableSet>,
    /// Declarations the tables are built from
    pub keymap: Arc<KeymapDecl>,
    pub layout: LayoutSet,
    pub timers: Timers,
    /// Last indicator state handed to the runtime
    pub indicator: IndicatorState,
}

impl EngineModel {
    /// Build the initial model: Command mode, no overlay, tables built
    pub fn new(
        keymap: KeymapDecl,
        layout: LayoutSet,
        config: &EngineConfig,
    ) -> Result<Self, KeymapError> {
        let tables = TableSet::build(&keymap, layout.translation())?;
        let mode = Mode::default();

        Ok(Self {
            mode,
            overlay: None,
            pending: None,
            tables: Arc::new(tables),
            keymap: Arc::new(keymap),
            layout,
            timers: Timers::new(config.insert_timeout(), config.repeat_timeout()),
            indicator: IndicatorState::project(mode, false),
        })
    }

    /// Indicator state implied by the current mode and overlay
    pub fn indicator_state(&self) -> IndicatorState {
        IndicatorState::project(self.mode, self.overlay.is_some())
    }

    /// Snapshot of the current tables for readers outside the update loop
    pub fn tables(&self) -> Arc<TableSet> {
        Arc::clone(&self.tables)
    }

    /// Rebuild every table for the current layout flag and swap them in
    ///
    /// On failure the previous tables stay active.
    pub fn rebuild_tables(&mut self) -> Result<(), KeymapError> {
        let tables = TableSet::build(&self.keymap, self.layout.translation())?;
        self.tables = Arc::new(tables);
        Ok(())
    }

    pub fn overlay_group(&self) -> Option<&crate::keymap::GroupId> {
        self.overlay.as_ref().map(|o| &o.group)
    }

    /// Assert state invariants (debug builds only)
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self, context: &str) {
        debug_assert_eq!(
            self.overlay.is_some(),
            self.timers.repeat.armed,
            "Repeat timer must run exactly while an overlay is active (after {})",
            context
        );
        debug_assert!(
            self.mode == Mode::Insert || !self.timers.insert.armed,
            "Insert timer must not run outside Insert mode (after {})",
            context
        );
        if let Some(overlay) = &self.overlay {
            debug_assert!(
                self.tables.overlay(&overlay.group).is_some(),
                "Active overlay {} has no table (after {})",
                overlay.group,
                context
            );
        }
    }

    /// No-op in release builds
    #[cfg(not(debug_assertions))]
    #[inline]
    pub fn assert_invariants(&self, _context: &str) {}
}
