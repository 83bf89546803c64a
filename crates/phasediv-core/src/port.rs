//! Input ports and the divider's jack layout.
//!
//! A [`Port`] is an input jack as the tick sees it: a voltage plus whether a
//! cable is plugged in. Modules distinguish "no cable" from "0 V" because an
//! unpatched ratio input falls back to its knob while a patched one at 0 V
//! pulls the ratio to 1.

/// Input jack state for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Port {
    value: f32,
    connected: bool,
}

impl Port {
    /// An unpatched jack.
    pub const DISCONNECTED: Self = Self {
        value: 0.0,
        connected: false,
    };

    /// A patched jack carrying `value` volts.
    #[inline]
    pub const fn connected(value: f32) -> Self {
        Self {
            value,
            connected: true,
        }
    }

    /// Whether a cable is plugged in.
    #[inline]
    pub const fn is_connected(&self) -> bool {
        self.connected
    }

    /// Raw voltage. Unpatched jacks read 0 V.
    #[inline]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Voltage if patched.
    #[inline]
    pub fn get(&self) -> Option<f32> {
        self.connected.then_some(self.value)
    }
}

impl From<Option<f32>> for Port {
    fn from(value: Option<f32>) -> Self {
        value.map_or(Port::DISCONNECTED, Port::connected)
    }
}

/// Input jack indices for the host-style slice interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum InputId {
    /// Modulates the "from" side of the ratio (0–10 V).
    RatioFrom = 0,
    /// Modulates the "to" side of the ratio (0–10 V).
    RatioTo,
    /// Bends the swing knob (±5 V).
    Swing,
    /// External phase ramp.
    Phase,
    /// Volts-per-second rate.
    Rate,
    /// Reset trigger.
    Reset,
}

impl InputId {
    /// Number of input jacks.
    pub const COUNT: usize = 6;
}

/// Output jack indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum OutputId {
    /// Clock (0 or 10 V).
    Clock = 0,
    /// Swing-shaped phase (0–10 V).
    Phase,
}

impl OutputId {
    /// Number of output jacks.
    pub const COUNT: usize = 2;
}

/// Indicator light indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LightId {
    /// Lit while the phase input drives the module.
    ExternalPhase = 0,
    /// Lit while the rate input drives the module.
    ExternalRate,
}

impl LightId {
    /// Number of lights.
    pub const COUNT: usize = 2;
}

/// Everything the divider reads from its jacks in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DividerInputs {
    /// Ratio "from" CV.
    pub ratio_from: Port,
    /// Ratio "to" CV.
    pub ratio_to: Port,
    /// Bipolar swing CV.
    pub swing: Port,
    /// Phase ramp.
    pub phase: Port,
    /// Volts-per-second rate.
    pub rate: Port,
    /// Reset trigger.
    pub reset: Port,
}

impl DividerInputs {
    /// Builds inputs from a slice indexed by [`InputId`]. Missing entries
    /// read as disconnected.
    pub fn from_slice(ports: &[Port]) -> Self {
        let at = |id: InputId| ports.get(id as usize).copied().unwrap_or_default();
        Self {
            ratio_from: at(InputId::RatioFrom),
            ratio_to: at(InputId::RatioTo),
            swing: at(InputId::Swing),
            phase: at(InputId::Phase),
            rate: at(InputId::Rate),
            reset: at(InputId::Reset),
        }
    }
}

/// Everything the divider writes in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DividerOutputs {
    /// Clock output, 0 or 10 V.
    pub clock: f32,
    /// Swing-shaped phase, 0–10 V.
    pub phase: f32,
    /// External phase indicator, 0 or 0.5.
    pub phase_light: f32,
    /// External rate indicator, 0 or 0.5.
    pub rate_light: f32,
}

impl DividerOutputs {
    /// Writes outputs and lights into host slices indexed by [`OutputId`]
    /// and [`LightId`]. Short slices are written as far as they reach.
    pub fn write_to(&self, outputs: &mut [f32], lights: &mut [f32]) {
        if let Some(v) = outputs.get_mut(OutputId::Clock as usize) {
            *v = self.clock;
        }
        if let Some(v) = outputs.get_mut(OutputId::Phase as usize) {
            *v = self.phase;
        }
        if let Some(v) = lights.get_mut(LightId::ExternalPhase as usize) {
            *v = self.phase_light;
        }
        if let Some(v) = lights.get_mut(LightId::ExternalRate as usize) {
            *v = self.rate_light;
        }
    }
}
