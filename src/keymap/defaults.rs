//! Default keymap and override discovery
//!
//! The default declarations ship inside the binary. They can be overridden
//! by a keymap.yaml in the working directory and by the user's keymap in
//! the config directory.

use std::path::Path;

use super::config::{load_keymap_file, parse_keymap_yaml, KeymapDecl, KeymapError};

/// Default keymap YAML embedded at compile time
const DEFAULT_KEYMAP_YAML: &str = include_str!("../../keymap.yaml");

/// Get the embedded default keymap YAML content
pub fn get_default_keymap_yaml() -> &'static str {
    DEFAULT_KEYMAP_YAML
}

/// Parse the embedded defaults
pub fn default_keymap() -> Result<KeymapDecl, KeymapError> {
    parse_keymap_yaml(DEFAULT_KEYMAP_YAML)
}

/// Load and merge keymaps: defaults + overrides
///
/// Loading order (each layer overrides the previous):
/// 1. Embedded default keymap (compiled into binary)
/// 2. keymap.yaml in current directory (project-local overrides)
/// 3. User keymap at ~/.config/keymode/keymap.yaml
///
/// An explicit `path` replaces steps 2 and 3. Override files that fail to
/// parse are skipped with a warning; an explicit path that fails is an error.
pub fn load_keymap(path: Option<&Path>) -> Result<KeymapDecl, KeymapError> {
    let mut decl = default_keymap()?;
    tracing::info!("Loaded embedded default keymap");

    if let Some(path) = path {
        let user = load_keymap_file(path)?;
        tracing::info!("Merging keymap from {}", path.display());
        return Ok(decl.merge(user));
    }

    let local = Path::new("keymap.yaml");
    if local.exists() {
        match load_keymap_file(local) {
            Ok(local_decl) => {
                tracing::info!("Merging project keymap.yaml");
                decl = decl.merge(local_decl);
            }
            Err(e) => tracing::warn!("Failed to load project keymap.yaml: {}", e),
        }
    }

    if let Some(user_path) = crate::config_paths::keymap_file() {
        if user_path.exists() {
            match load_keymap_file(&user_path) {
                Ok(user_decl) => {
                    tracing::info!("Merging user keymap from {}", user_path.display());
                    decl = decl.merge(user_decl);
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to load user keymap from {}: {}",
                        user_path.display(),
                        e
                    );
                }
            }
        }
    }

    Ok(decl)
}
