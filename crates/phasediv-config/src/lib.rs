//! Patch state and preset management for phasediv clock modules.
//!
//! # Features
//!
//! - **Patch State**: The per-instance JSON document a host stores with a
//!   patch (the gate-mode flag)
//! - **Presets**: Knob values plus state in TOML files, validated against
//!   the module registry before they touch a running module
//!
//! # Example
//!
//! ```rust,no_run
//! use phasediv_config::{DividerState, ModulePreset};
//! use phasediv_core::PhaseDivider;
//!
//! // Restore a patch
//! let divider = PhaseDivider::new();
//! DividerState::from_json(r#"{"gateMode":true}"#)?.apply(&divider);
//!
//! // Save the current knobs as a preset
//! let preset = ModulePreset::capture("Gate 1:1", &divider);
//! preset.save("presets/gate.toml")?;
//!
//! // Load it back into a fresh divider
//! let divider = ModulePreset::load("presets/gate.toml")?.instantiate()?;
//! assert!(divider.gate_mode());
//! # Ok::<(), phasediv_config::ConfigError>(())
//! ```

mod error;
mod preset;
mod state;

pub use error::ConfigError;
pub use preset::{DEFAULT_MODULE, ModulePreset, PHASE_ONLY_MODULE};
pub use state::DividerState;

/// Re-export commonly used types from phasediv-registry
pub use phasediv_registry::{ModuleDescriptor, ModuleRegistry, ModuleTag};
