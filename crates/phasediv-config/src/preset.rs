//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use phasediv_core::{ParamDescriptor, ParameterInfo, PhaseDivider};
use phasediv_registry::ModuleRegistry;

use crate::error::ConfigError;
use crate::state::DividerState;

/// Module id used when a preset does not name one.
pub const DEFAULT_MODULE: &str = "divider";

/// Module id of the divider variant without a rate input.
pub const PHASE_ONLY_MODULE: &str = "divider-phase";

/// Knob settings and state for one module, stored as TOML.
///
/// Parameters are keyed by their stable string id, so presets survive
/// reordering of parameter indices.
///
/// # TOML Format
///
/// ```toml
/// name = "Shuffle Triplets"
/// description = "3:2 with a heavy swing"
/// module = "divider"
///
/// [params]
/// div_from = 2.0
/// div_to = 3.0
/// div_swing = 66.0
///
/// [state]
/// gateMode = false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModulePreset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Registry id of the module the preset targets.
    #[serde(default = "default_module")]
    pub module: String,

    /// Knob values keyed by parameter string id.
    #[serde(default)]
    pub params: BTreeMap<String, f32>,

    /// Persisted per-instance state.
    #[serde(default)]
    pub state: DividerState,
}

fn default_module() -> String {
    DEFAULT_MODULE.to_string()
}

impl ModulePreset {
    /// Create a new preset with no parameter overrides.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            module: default_module(),
            params: BTreeMap::new(),
            state: DividerState::default(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Target a different module id.
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Set a parameter by string id.
    pub fn with_param(mut self, string_id: impl Into<String>, value: f32) -> Self {
        self.params.insert(string_id.into(), value);
        self
    }

    /// Set the gate-mode flag.
    pub fn with_gate_mode(mut self, gate_mode: bool) -> Self {
        self.state.gate_mode = gate_mode;
        self
    }

    /// Snapshot every knob and the state of a running divider.
    pub fn capture(name: impl Into<String>, divider: &PhaseDivider) -> Self {
        let params = (0..divider.param_count())
            .filter_map(|i| {
                divider
                    .param_info(i)
                    .map(|desc| (desc.string_id.to_string(), divider.get_param(i)))
            })
            .collect();
        let module = if divider.has_rate_input() {
            DEFAULT_MODULE
        } else {
            PHASE_ONLY_MODULE
        };
        Self {
            name: name.into(),
            description: None,
            module: module.to_string(),
            params,
            state: DividerState::capture(divider),
        }
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), name = %preset.name, "preset loaded");
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating the parent directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), name = %self.name, "preset saved");
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the module id and every parameter against the registry.
    ///
    /// Parameters must name a known string id (or display name) and carry a
    /// finite value inside the descriptor's range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolve_params().map(|_| ())
    }

    /// Validate, then write knobs and state into `divider`.
    ///
    /// Nothing is applied if any parameter is invalid.
    pub fn apply_to(&self, divider: &mut PhaseDivider) -> Result<(), ConfigError> {
        for (index, value) in self.resolve_params()? {
            divider.set_param(index, value);
        }
        self.state.apply(divider);
        Ok(())
    }

    /// Build a fresh divider of the preset's module type with the preset
    /// applied.
    pub fn instantiate(&self) -> Result<PhaseDivider, ConfigError> {
        let mut divider = ModuleRegistry::global()
            .create_divider(&self.module)
            .ok_or_else(|| ConfigError::UnknownModule(self.module.clone()))?;
        self.apply_to(&mut divider)?;
        Ok(divider)
    }

    /// Map every parameter to `(index, value)`, failing on the first
    /// problem.
    fn resolve_params(&self) -> Result<Vec<(usize, f32)>, ConfigError> {
        let descriptors = ModuleRegistry::global()
            .param_info(&self.module)
            .ok_or_else(|| ConfigError::UnknownModule(self.module.clone()))?;

        self.params
            .iter()
            .map(|(key, &value)| {
                let (index, desc) = find_descriptor(&descriptors, key)
                    .ok_or_else(|| ConfigError::invalid_param(&self.module, key, "unknown parameter"))?;
                if !value.is_finite() {
                    return Err(ConfigError::invalid_param(&self.module, key, "value is not finite"));
                }
                if !desc.contains(value) {
                    return Err(ConfigError::invalid_param(
                        &self.module,
                        key,
                        format!("value {value} out of range [{}, {}]", desc.min, desc.max),
                    ));
                }
                Ok((index, value))
            })
            .collect()
    }
}

fn find_descriptor<'a>(
    descriptors: &'a [ParamDescriptor],
    key: &str,
) -> Option<(usize, &'a ParamDescriptor)> {
    descriptors.iter().enumerate().find(|(_, desc)| {
        desc.string_id.eq_ignore_ascii_case(key) || desc.name.eq_ignore_ascii_case(key)
    })
}

impl Default for ModulePreset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
