use crate::errors::EditorError;
use crate::state::Device;
use serde::{Deserialize, Serialize};

/// Editor engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of history snapshots kept (0 = unlimited)
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Device the canvas starts on
    #[serde(default)]
    pub initial_device: Device,

    /// Accept structural commands while live mode is on
    #[serde(default)]
    pub allow_structural_edits_in_live: bool,
}

fn default_max_history() -> usize {
    100
}

impl EditorConfig {
    /// Parse config from a JSON string; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        serde_json::from_str(json).map_err(EditorError::Config)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
            initial_device: Device::default(),
            allow_structural_edits_in_live: false,
        }
    }
}
