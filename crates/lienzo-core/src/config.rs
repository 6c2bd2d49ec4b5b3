//! Editor configuration.

use crate::error::ConfigError;
use crate::snap::{GUIDE_THRESHOLD, SNAP_THRESHOLD, SnapEngine, SnapMode, SnapPolicy};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Duration;

/// Default debounce window before a change is persisted.
pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 1500;

/// Tunables for an editor and its persistence.
///
/// Every field has a default, so a partial JSON document is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub guide_threshold: f64,
    pub snap_threshold: f64,
    pub snap_mode: SnapMode,
    pub snap_policy: SnapPolicy,
    /// Maximum number of undo steps kept. `None` keeps everything.
    pub history_limit: Option<usize>,
    /// Smallest width or height accepted by resize.
    pub min_item_size: f64,
    /// Initial viewport size in screen units.
    pub viewport: Size,
    pub autosave_debounce_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            guide_threshold: GUIDE_THRESHOLD,
            snap_threshold: SNAP_THRESHOLD,
            snap_mode: SnapMode::default(),
            snap_policy: SnapPolicy::default(),
            history_limit: None,
            min_item_size: 1.0,
            viewport: Size::new(800.0, 600.0),
            autosave_debounce_ms: DEFAULT_AUTOSAVE_DEBOUNCE_MS,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn snap_engine(&self) -> SnapEngine {
        SnapEngine {
            guide_threshold: self.guide_threshold,
            snap_threshold: self.snap_threshold,
            mode: self.snap_mode,
            policy: self.snap_policy,
        }
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }
}
