//! Collision registry settings
//!
//! Persisted as JSON next to the game's other configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Tuning for rule registration and kind resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CollisionSettings {
    /// Reject registrations that would replace an existing rule
    pub strict: bool,
    /// Track visited kinds while resolving (for diamond-heavy hierarchies)
    pub dedupe_ancestry: bool,
}

impl CollisionSettings {
    /// Strict registration with default resolution
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &Path) -> Self {
        if let Ok(json) = std::fs::read_to_string(path) {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded collision settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring invalid settings in {}: {}", path.display(), e),
            }
        }

        log::info!("Using default collision settings");
        Self::default()
    }

    /// Save settings to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Collision settings saved to {}", path.display());
        Ok(())
    }
}
