//! PhaseDiv Core - ratio clock divider/multiplier for modular synthesis
//!
//! This crate contains the per-sample algorithm behind the PhaseDivider
//! module: it follows an incoming phase ramp (or a volts-per-second rate),
//! scales it by a `to / from` ratio, bends it through a swing curve and
//! emits a clock as either short triggers or a phase-locked gate.
//!
//! # Core Abstractions
//!
//! ## Module System
//!
//! - [`Module`] - Object-safe per-tick trait with slice-based jacks
//! - [`ModuleWithParams`] - `Module` + knob introspection behind one vtable
//! - [`ParameterInfo`] / [`ParamDescriptor`] - Knob metadata for hosts and presets
//!
//! ## Divider
//!
//! - [`PhaseDivider`] - The clock divider itself
//! - [`Ratio`] - `from`/`to` resolution from knobs and 0–10 V CV
//! - [`Swing`] - Swing amount, remap curve and threshold crossing
//! - [`GateMode`] - Trigger/gate flag shared with non-audio threads
//!
//! ## Utilities
//!
//! - [`SchmittTrigger`] - Rising-edge detection with hysteresis
//! - [`PulseGenerator`] - Time-based one-shot pulse
//! - [`Port`] - Input voltage plus patched/unpatched state
//!
//! # no_std Support
//!
//! Disable the default `std` feature to use the core on embedded targets:
//!
//! ```toml
//! [dependencies]
//! phasediv-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use phasediv_core::{DividerInputs, PhaseDivider, Port};
//!
//! let mut divider = PhaseDivider::new();
//! divider.set_to(3.0);
//!
//! let mut inputs = DividerInputs::default();
//! inputs.rate = Port::connected(2.0);
//! let out = divider.process_inputs(&inputs, 1.0 / 48000.0);
//! assert!(out.phase >= 0.0 && out.phase < 10.0);
//! assert_eq!(out.rate_light, 0.5);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations, locks or I/O in the tick
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Wait-free flag sharing**: Gate mode is a single atomic

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod divider;
pub mod gate_mode;
pub mod module;
pub mod module_with_params;
pub mod param_info;
pub mod port;
pub mod ratio;
pub mod swing;
pub mod trigger;

// Re-export main types at crate root
pub use divider::{
    CLOCK_HIGH, GATE_BLIP_SECONDS, GLITCH_THRESHOLD, LIGHT_ON, PhaseDivider, TRIGGER_PULSE_SECONDS,
};
pub use gate_mode::GateMode;
pub use module::{Module, ProcessArgs};
pub use module_with_params::ModuleWithParams;
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamUnit, ParameterInfo};
pub use port::{DividerInputs, DividerOutputs, InputId, LightId, OutputId, Port};
pub use ratio::Ratio;
pub use swing::{PHASE_RANGE, Swing};
pub use trigger::{PulseGenerator, SchmittState, SchmittTrigger};
