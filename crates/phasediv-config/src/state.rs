//! Per-instance state saved with a patch.
//!
//! The only persisted field is the clock rendering mode. The document is a
//! small JSON object:
//!
//! ```json
//! { "gateMode": true }
//! ```
//!
//! A missing `gateMode` field restores trigger mode; unknown fields are
//! ignored so documents written by newer versions still load.

use phasediv_core::PhaseDivider;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Serializable snapshot of a divider's persisted state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DividerState {
    /// Gate mode (`true`) or trigger mode (`false`).
    #[serde(rename = "gateMode", alias = "gate_mode")]
    pub gate_mode: bool,
}

impl DividerState {
    /// Read the current state of `divider`.
    pub fn capture(divider: &PhaseDivider) -> Self {
        Self {
            gate_mode: divider.gate_mode(),
        }
    }

    /// Publish this state to `divider`.
    ///
    /// Safe to call from a non-audio thread while the divider is running:
    /// the flag is shared through an atomic.
    pub fn apply(&self, divider: &PhaseDivider) {
        divider.set_gate_mode(self.gate_mode);
        tracing::debug!(gate_mode = self.gate_mode, "divider state restored");
    }

    /// Serialize to a JSON document.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(ConfigError::JsonSerialize)
    }

    /// Parse a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::JsonParse)
    }
}
