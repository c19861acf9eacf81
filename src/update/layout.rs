//! Layout translation toggling

use crate::model::EngineModel;

/// Flip layout translation, returning the resulting state
pub fn toggle_layout(model: &mut EngineModel) -> bool {
    let enabled = !model.layout.is_enabled();
    set_layout_enabled(model, enabled)
}

/// Turn layout translation on or off, rebuilding every table
///
/// Setting the current state again does nothing. If the rebuild fails the
/// old tables and flag stay in place. Returns the resulting state.
pub fn set_layout_enabled(model: &mut EngineModel, enabled: bool) -> bool {
    if !model.layout.set_enabled(enabled) {
        return enabled;
    }

    match model.rebuild_tables() {
        Ok(()) => {
            tracing::info!(
                layout = %model.layout.layout().name(),
                enabled,
                "layout translation switched"
            );
            if let Some(abandoned) = model.pending.take() {
                tracing::debug!(pending = %abandoned.display(), "rebuild abandons pending input");
            }
        }
        Err(e) => {
            tracing::error!("Failed to rebuild tables for layout change: {}", e);
            model.layout.set_enabled(!enabled);
        }
    }

    model.layout.is_enabled()
}
