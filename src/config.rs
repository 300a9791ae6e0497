//! Runtime tunables for the engine. Balance constants live next to the code
//! they govern (`ledger::COST_GROWTH`, `ledger::PRESTIGE_THRESHOLD`, ...).

use serde::{Deserialize, Serialize};

use crate::error::SaveError;

/// localStorage key the browser build writes snapshots under.
pub const DEFAULT_STORAGE_KEY: &str = "flip-o-nomics-storage";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How long a slot stays mid-flip after a flip starts.
    pub flip_lockout_ms: f64,
    /// Minimum engine time between snapshot writes while state is dirty.
    pub autosave_debounce_ms: f64,
    pub ticks_per_sec: u32,
    /// Frame gaps longer than this are clamped.
    pub max_frame_delta_ms: f64,
    pub storage_key: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            flip_lockout_ms: 700.0,
            autosave_debounce_ms: 2_000.0,
            ticks_per_sec: 20,
            max_frame_delta_ms: 500.0,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        serde_json::from_str(json).map_err(SaveError::Parse)
    }
}
