//! Ratio clock divider/multiplier with swing.
//!
//! [`PhaseDivider`] follows an incoming timing reference and produces a new
//! phase ramp and clock at `to / from` times its speed, with the cycle split
//! unevenly by the swing amount.
//!
//! Each tick the accumulator is advanced from one of three sources, in
//! priority order:
//!
//! 1. **Reset**: a rising edge on the reset jack zeroes the accumulator and
//!    forces a clock pulse.
//! 2. **Phase ramp**: while the phase jack is patched, the accumulator
//!    follows the ramp's per-sample delta scaled by the ratio. Large jumps
//!    that reverse direction are taken as the ramp wrapping around and are
//!    replaced by the previous delta.
//! 3. **Rate**: otherwise, when the rate capability is enabled and its jack
//!    is patched, the accumulator advances at `volts * 10 * ratio / 2` units
//!    per second.
//!
//! With none of these active the accumulator holds.
//!
//! ## Parameter Indices (`ParameterInfo`)
//!
//! | Index | Name | Range | Default |
//! |-------|------|-------|---------|
//! | 0 | From | 1–99 (stepped) | 1 |
//! | 1 | To | 1–99 (stepped) | 1 |
//! | 2 | Swing | 1–99 % | 50 |

use crate::gate_mode::GateMode;
use crate::module::{Module, ProcessArgs};
use crate::param_info::{ParamDescriptor, ParamId, ParameterInfo};
use crate::port::{DividerInputs, DividerOutputs, InputId, LightId, OutputId, Port};
use crate::ratio::Ratio;
use crate::swing::{PHASE_RANGE, Swing};
use crate::trigger::{PulseGenerator, SchmittTrigger};

/// Clock pulse length in trigger mode, seconds.
pub const TRIGGER_PULSE_SECONDS: f32 = 1e-3;

/// Off-blip length after a reset in gate mode, seconds.
pub const GATE_BLIP_SECONDS: f32 = 1e-4;

/// Per-tick phase delta above which a sign flip counts as a ramp wrap.
///
/// Empirical; kept for compatibility with existing patches.
pub const GLITCH_THRESHOLD: f32 = 0.1;

/// High level of the clock output, volts.
pub const CLOCK_HIGH: f32 = 10.0;

/// Brightness of a lit indicator.
pub const LIGHT_ON: f32 = 0.5;

/// Gate mode is high while the output phase is below this.
const GATE_HIGH_BELOW: f32 = 5.0;

/// Sign as -1, 0 or 1. Unlike `f32::signum`, zero maps to zero.
#[inline]
fn sign(x: f32) -> i8 {
    i8::from(x > 0.0) - i8::from(x < 0.0)
}

/// Non-finite voltages read as 0 V.
#[inline]
fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

/// Patched and finite, or `None`.
#[inline]
fn cv(port: Port) -> Option<f32> {
    port.get().map(finite_or_zero)
}

/// Wrap into `[0, 10)`, however far outside the range `x` is.
#[inline]
fn wrap_phase(x: f64) -> f64 {
    let mut wrapped = libm::fmod(x, PHASE_RANGE);
    if wrapped < 0.0 {
        wrapped += PHASE_RANGE;
    }
    // -tiny + 10.0 can round up to exactly 10.0
    if wrapped >= PHASE_RANGE { 0.0 } else { wrapped }
}

/// Clock divider/multiplier with swing.
///
/// # Example
///
/// ```rust
/// use phasediv_core::{DividerInputs, ParameterInfo, PhaseDivider, Port};
///
/// let mut divider = PhaseDivider::new();
/// divider.set_param(1, 2.0); // to = 2, ratio 2:1
///
/// let sample_time = 1.0 / 48000.0;
/// let mut inputs = DividerInputs::default();
/// for i in 0..48000 {
///     inputs.phase = Port::connected(i as f32 * 10.0 / 48000.0);
///     let out = divider.process_inputs(&inputs, sample_time);
///     assert!((0.0..10.0).contains(&out.phase));
/// }
/// assert_eq!(divider.effective_ratio(), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct PhaseDivider {
    from_knob: f32,
    to_knob: f32,
    swing_knob: f32,

    ratio: Ratio,
    swing: Swing,

    /// Running phase in `[0, 10)`. f64 so long runs of tiny deltas do not drift.
    half_phase: f64,
    /// `half_phase` before this tick's update, for threshold crossing.
    last_half_phase: f64,

    last_phase_in: f32,
    last_phase_in_delta: f32,
    last_phase_connected: bool,

    output_phase: f32,

    clock_pulse: PulseGenerator,
    clock_active: bool,
    reset_trigger: SchmittTrigger,

    gate_mode: GateMode,
    rate_input: bool,
}

impl Default for PhaseDivider {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseDivider {
    /// Create a divider with the rate input enabled.
    pub fn new() -> Self {
        Self {
            from_knob: 1.0,
            to_knob: 1.0,
            swing_knob: 50.0,
            ratio: Ratio::default(),
            swing: Swing::default(),
            half_phase: 0.0,
            last_half_phase: 0.0,
            last_phase_in: 0.0,
            last_phase_in_delta: 0.0,
            last_phase_connected: false,
            output_phase: 0.0,
            clock_pulse: PulseGenerator::default(),
            clock_active: false,
            reset_trigger: SchmittTrigger::default(),
            gate_mode: GateMode::default(),
            rate_input: true,
        }
    }

    /// Create a divider that ignores the rate jack.
    pub fn without_rate_input() -> Self {
        Self {
            rate_input: false,
            ..Self::new()
        }
    }

    /// Whether the rate jack is honored.
    pub fn has_rate_input(&self) -> bool {
        self.rate_input
    }

    /// Set the "from" knob (1–99).
    pub fn set_from(&mut self, from: f32) {
        self.set_param(0, from);
    }

    /// Set the "to" knob (1–99).
    pub fn set_to(&mut self, to: f32) {
        self.set_param(1, to);
    }

    /// Set the swing knob (1–99).
    pub fn set_swing(&mut self, swing: f32) {
        self.set_param(2, swing);
    }

    /// Handle to the gate-mode flag, for the UI or persistence thread.
    pub fn gate_mode_handle(&self) -> GateMode {
        self.gate_mode.clone()
    }

    /// Current gate-mode flag.
    pub fn gate_mode(&self) -> bool {
        self.gate_mode.get()
    }

    /// Publish a new gate-mode flag.
    pub fn set_gate_mode(&self, enabled: bool) {
        self.gate_mode.set(enabled);
    }

    /// "From" side of the ratio as of the last tick.
    pub fn ratio_from(&self) -> u32 {
        self.ratio.from()
    }

    /// "To" side of the ratio as of the last tick.
    pub fn ratio_to(&self) -> u32 {
        self.ratio.to()
    }

    /// `to / from` as of the last tick.
    pub fn effective_ratio(&self) -> f64 {
        self.ratio.value()
    }

    /// Swing amount as of the last tick, including CV.
    pub fn swing(&self) -> f32 {
        self.swing.value()
    }

    /// Internal accumulator, `[0, 10)`.
    pub fn half_phase(&self) -> f64 {
        self.half_phase
    }

    /// Swing-shaped output phase, `[0, 10)`.
    pub fn output_phase(&self) -> f32 {
        self.output_phase
    }

    /// Whether the clock pulse timer was high on the last tick.
    pub fn clock_pulse_active(&self) -> bool {
        self.clock_active
    }

    /// Advance by one sample.
    pub fn process_inputs(&mut self, inputs: &DividerInputs, sample_time: f32) -> DividerOutputs {
        self.ratio.update(
            self.from_knob,
            cv(inputs.ratio_from),
            self.to_knob,
            cv(inputs.ratio_to),
        );
        self.swing.update(self.swing_knob, cv(inputs.swing));

        let gate_mode = self.gate_mode.get();
        let pulse_length = if gate_mode {
            GATE_BLIP_SECONDS
        } else {
            TRIGGER_PULSE_SECONDS
        };
        let ratio = self.ratio.value();
        let phase_connected = inputs.phase.is_connected();
        let phase_in = finite_or_zero(inputs.phase.value());
        let rate_active = self.rate_input && !phase_connected && inputs.rate.is_connected();

        if self.reset_trigger.process(finite_or_zero(inputs.reset.value())) {
            self.output_phase = 0.0;
            self.half_phase = 0.0;
            self.last_half_phase = 0.0;
            self.clock_pulse.trigger(pulse_length);
        } else if phase_connected {
            if self.last_phase_connected {
                let mut delta = phase_in - self.last_phase_in;
                if libm::fabsf(delta) > GLITCH_THRESHOLD && sign(delta) != sign(self.last_phase_in_delta) {
                    delta = self.last_phase_in_delta;
                }
                self.last_phase_in_delta = delta;
                self.half_phase += f64::from(delta) * ratio * 0.5;
            }
        } else if rate_active {
            let volts = f64::from(finite_or_zero(inputs.rate.value()));
            self.half_phase += volts * f64::from(sample_time) * PHASE_RANGE * ratio * 0.5;
        }

        self.half_phase = wrap_phase(self.half_phase);
        self.output_phase = self.swing.remap(self.half_phase);

        if !gate_mode && self.swing.crossed(self.last_half_phase, self.half_phase) {
            self.clock_pulse.trigger(pulse_length);
        }

        self.last_half_phase = self.half_phase;
        self.last_phase_in = phase_in;
        self.last_phase_connected = phase_connected;

        self.clock_active = self.clock_pulse.process(sample_time);
        let clock_high = if gate_mode {
            self.output_phase < GATE_HIGH_BELOW && !self.clock_active
        } else {
            self.clock_active
        };

        DividerOutputs {
            clock: if clock_high { CLOCK_HIGH } else { 0.0 },
            phase: self.output_phase,
            phase_light: if phase_connected { LIGHT_ON } else { 0.0 },
            rate_light: if rate_active { LIGHT_ON } else { 0.0 },
        }
    }
}

impl Module for PhaseDivider {
    fn input_count(&self) -> usize {
        InputId::COUNT
    }

    fn output_count(&self) -> usize {
        OutputId::COUNT
    }

    fn light_count(&self) -> usize {
        LightId::COUNT
    }

    #[inline]
    fn process(&mut self, args: &ProcessArgs, inputs: &[Port], outputs: &mut [f32], lights: &mut [f32]) {
        let inputs = DividerInputs::from_slice(inputs);
        self.process_inputs(&inputs, args.sample_time)
            .write_to(outputs, lights);
    }

    fn reset(&mut self) {
        self.ratio = Ratio::default();
        self.swing = Swing::default();
        self.half_phase = 0.0;
        self.last_half_phase = 0.0;
        self.last_phase_in = 0.0;
        self.last_phase_in_delta = 0.0;
        self.last_phase_connected = false;
        self.output_phase = 0.0;
        self.clock_pulse.reset();
        self.clock_active = false;
        self.reset_trigger.reset();
    }
}

impl ParameterInfo for PhaseDivider {
    fn param_count(&self) -> usize {
        3
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::ratio_step("From", "From").with_id(ParamId(100), "div_from")),
            1 => Some(ParamDescriptor::ratio_step("To", "To").with_id(ParamId(101), "div_to")),
            2 => Some(ParamDescriptor::swing().with_id(ParamId(102), "div_swing")),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.from_knob,
            1 => self.to_knob,
            2 => self.swing_knob,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(desc) = self.param_info(index) else {
            return;
        };
        let value = desc.clamp(finite_or_zero(value));
        match index {
            0 => self.from_knob = value,
            1 => self.to_knob = value,
            2 => self.swing_knob = value,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;
    const DT: f32 = 1.0 / SR;

    fn phase_inputs(v: f32) -> DividerInputs {
        DividerInputs {
            phase: Port::connected(v),
            ..DividerInputs::default()
        }
    }

    #[test]
    fn test_sign() {
        assert_eq!(sign(2.0), 1);
        assert_eq!(sign(-0.1), -1);
        assert_eq!(sign(0.0), 0);
        assert_eq!(sign(-0.0), 0);
    }

    #[test]
    fn test_wrap_phase() {
        assert_eq!(wrap_phase(0.0), 0.0);
        assert_eq!(wrap_phase(10.0), 0.0);
        assert!((wrap_phase(12.5) - 2.5).abs() < 1e-12);
        assert!((wrap_phase(-2.5) - 7.5).abs() < 1e-12);
        assert!((wrap_phase(37.0) - 7.0).abs() < 1e-12);
        assert!((wrap_phase(-31.0) - 9.0).abs() < 1e-12);
        let tiny = wrap_phase(-1e-17);
        assert!((0.0..10.0).contains(&tiny));
    }

    #[test]
    fn test_defaults() {
        let divider = PhaseDivider::new();
        assert_eq!(divider.get_param(0), 1.0);
        assert_eq!(divider.get_param(1), 1.0);
        assert_eq!(divider.get_param(2), 50.0);
        assert!(!divider.gate_mode());
        assert!(divider.has_rate_input());
        assert!(!PhaseDivider::without_rate_input().has_rate_input());
    }

    #[test]
    fn test_unpatched_holds() {
        let mut divider = PhaseDivider::new();
        for _ in 0..1000 {
            let out = divider.process_inputs(&DividerInputs::default(), DT);
            assert_eq!(out.phase, 0.0);
            assert_eq!(out.clock, 0.0);
            assert_eq!(out.phase_light, 0.0);
            assert_eq!(out.rate_light, 0.0);
        }
        assert_eq!(divider.half_phase(), 0.0);
    }

    #[test]
    fn test_first_connected_tick_only_seeds() {
        let mut divider = PhaseDivider::new();
        divider.process_inputs(&phase_inputs(3.0), DT);
        assert_eq!(divider.half_phase(), 0.0);
        divider.process_inputs(&phase_inputs(3.05), DT);
        assert!((divider.half_phase() - 0.025).abs() < 1e-6);
    }

    #[test]
    fn test_glitch_substitutes_previous_delta() {
        let mut divider = PhaseDivider::new();
        divider.process_inputs(&phase_inputs(9.90), DT);
        divider.process_inputs(&phase_inputs(9.95), DT);
        let before = divider.half_phase();
        // Ramp wraps from 9.95 to 0.0: delta -9.95 with opposite sign
        divider.process_inputs(&phase_inputs(0.0), DT);
        let advanced = divider.half_phase() - before;
        assert!((advanced - 0.025).abs() < 1e-5, "advanced {advanced}");
        // Small consistent delta resumes normal tracking
        let before = divider.half_phase();
        divider.process_inputs(&phase_inputs(0.02), DT);
        assert!((divider.half_phase() - before - 0.01).abs() < 1e-5);
    }

    #[test]
    fn test_small_reversal_is_tracked() {
        let mut divider = PhaseDivider::new();
        divider.process_inputs(&phase_inputs(5.0), DT);
        divider.process_inputs(&phase_inputs(5.05), DT);
        let before = divider.half_phase();
        divider.process_inputs(&phase_inputs(5.0), DT);
        assert!((divider.half_phase() - (before - 0.025)).abs() < 1e-5);
    }

    #[test]
    fn test_reset_zeroes_and_pulses() {
        let mut divider = PhaseDivider::new();
        let mut inputs = phase_inputs(0.0);
        for i in 0..100 {
            inputs.phase = Port::connected(i as f32 * 0.05);
            divider.process_inputs(&inputs, DT);
        }
        assert!(divider.half_phase() > 0.0);

        inputs.reset = Port::connected(10.0);
        inputs.phase = Port::connected(5.1);
        let out = divider.process_inputs(&inputs, DT);
        assert_eq!(out.phase, 0.0);
        assert_eq!(divider.half_phase(), 0.0);
        assert_eq!(out.clock, CLOCK_HIGH);
    }

    #[test]
    fn test_reset_needs_rising_edge() {
        let mut divider = PhaseDivider::new();
        let inputs = DividerInputs {
            reset: Port::connected(10.0),
            ..DividerInputs::default()
        };
        // Already high on the first tick: no edge
        let out = divider.process_inputs(&inputs, DT);
        assert_eq!(out.clock, 0.0);
    }

    #[test]
    fn test_rate_input_advances() {
        let mut divider = PhaseDivider::new();
        let inputs = DividerInputs {
            rate: Port::connected(1.0),
            ..DividerInputs::default()
        };
        // 1 V/s at ratio 1 advances 5 units per second
        for _ in 0..(SR as usize / 10) {
            let out = divider.process_inputs(&inputs, DT);
            assert_eq!(out.rate_light, LIGHT_ON);
            assert_eq!(out.phase_light, 0.0);
        }
        assert!((divider.half_phase() - 0.5).abs() < 1e-3, "{}", divider.half_phase());
    }

    #[test]
    fn test_rate_input_disabled() {
        let mut divider = PhaseDivider::without_rate_input();
        let inputs = DividerInputs {
            rate: Port::connected(1.0),
            ..DividerInputs::default()
        };
        for _ in 0..100 {
            let out = divider.process_inputs(&inputs, DT);
            assert_eq!(out.rate_light, 0.0);
        }
        assert_eq!(divider.half_phase(), 0.0);
    }

    #[test]
    fn test_phase_input_takes_priority_over_rate() {
        let mut divider = PhaseDivider::new();
        let inputs = DividerInputs {
            phase: Port::connected(1.0),
            rate: Port::connected(5.0),
            ..DividerInputs::default()
        };
        for _ in 0..100 {
            let out = divider.process_inputs(&inputs, DT);
            assert_eq!(out.phase_light, LIGHT_ON);
            assert_eq!(out.rate_light, 0.0);
        }
        assert_eq!(divider.half_phase(), 0.0);
    }

    /// Counts rising clock edges over `ticks` steps of a 0.05 V/sample ramp.
    fn count_pulses(divider: &mut PhaseDivider, ticks: usize) -> usize {
        let mut v = 9.0_f32;
        divider.process_inputs(&phase_inputs(v), DT);
        let mut pulses = 0;
        let mut was_high = false;
        for _ in 0..ticks {
            v += 0.05;
            if v >= 10.0 {
                v -= 10.0;
            }
            let out = divider.process_inputs(&phase_inputs(v), DT);
            let high = out.clock == CLOCK_HIGH;
            if high && !was_high {
                pulses += 1;
            }
            was_high = high;
        }
        pulses
    }

    #[test]
    fn test_trigger_pulse_on_threshold_crossing() {
        // 300 * 0.025 = 7.5 accumulator units: passes 5.0 once, no wrap
        let mut divider = PhaseDivider::new();
        assert_eq!(count_pulses(&mut divider, 300), 1);
    }

    #[test]
    fn test_trigger_pulse_on_wrap() {
        // 500 * 0.025 = 12.5 units: the wrap from ~10 to ~0 falls back
        // across the threshold and fires too
        let mut divider = PhaseDivider::new();
        assert_eq!(count_pulses(&mut divider, 500), 2);
    }

    #[test]
    fn test_gate_mode_suppresses_edge_pulses() {
        let mut divider = PhaseDivider::new();
        divider.set_gate_mode(true);
        count_pulses(&mut divider, 300);
        assert!(!divider.clock_pulse_active());
    }

    #[test]
    fn test_gate_mode_follows_phase() {
        let mut divider = PhaseDivider::new();
        divider.set_gate_mode(true);
        let mut v = 0.0;
        divider.process_inputs(&phase_inputs(v), DT);
        for _ in 0..1000 {
            v += 0.01;
            if v >= 10.0 {
                v -= 10.0;
            }
            let out = divider.process_inputs(&phase_inputs(v), DT);
            let expected = if out.phase < 5.0 { CLOCK_HIGH } else { 0.0 };
            assert_eq!(out.clock, expected, "phase {}", out.phase);
        }
    }

    #[test]
    fn test_gate_mode_reset_blip() {
        let mut divider = PhaseDivider::new();
        divider.set_gate_mode(true);
        let mut inputs = DividerInputs::default();
        let out = divider.process_inputs(&inputs, DT);
        assert_eq!(out.clock, CLOCK_HIGH);

        inputs.reset = Port::connected(10.0);
        let out = divider.process_inputs(&inputs, DT);
        assert_eq!(out.clock, 0.0, "reset blip pulls the gate low");

        // 100 us at 48 kHz is ~4.8 samples
        let mut low = 1;
        for _ in 0..20 {
            if divider.process_inputs(&inputs, DT).clock == 0.0 {
                low += 1;
            }
        }
        assert!((4..=6).contains(&low), "blip lasted {low} samples");
    }

    #[test]
    fn test_output_phase_below_full_scale_at_threshold() {
        let mut divider = PhaseDivider::new();
        divider.set_from(99.0);
        divider.half_phase = 5.0 - 1e-7;
        divider.last_half_phase = divider.half_phase;
        let out = divider.process_inputs(&DividerInputs::default(), DT);
        assert!(out.phase < 10.0, "output phase {}", out.phase);
        assert!(out.phase > 9.99, "output phase {}", out.phase);
        assert_eq!(out.phase, divider.output_phase());
    }

    #[test]
    fn test_ratio_cv_and_swing_cv() {
        let mut divider = PhaseDivider::new();
        divider.set_from(9.0);
        divider.set_to(5.0);
        divider.set_swing(50.0);
        let inputs = DividerInputs {
            ratio_from: Port::connected(0.0),
            swing: Port::connected(-5.0),
            ..DividerInputs::default()
        };
        divider.process_inputs(&inputs, DT);
        assert_eq!(divider.ratio_from(), 1);
        assert_eq!(divider.ratio_to(), 5);
        assert_eq!(divider.effective_ratio(), 5.0);
        assert_eq!(divider.swing(), 1.0);
    }

    #[test]
    fn test_non_finite_inputs_stay_finite() {
        let mut divider = PhaseDivider::new();
        let inputs = DividerInputs {
            ratio_from: Port::connected(f32::NAN),
            swing: Port::connected(f32::INFINITY),
            phase: Port::connected(f32::NAN),
            reset: Port::connected(f32::NAN),
            ..DividerInputs::default()
        };
        for _ in 0..10 {
            let out = divider.process_inputs(&inputs, DT);
            assert!(out.phase.is_finite());
            assert!(out.clock.is_finite());
        }
        assert!(divider.half_phase().is_finite());
        divider.set_param(2, f32::NAN);
        assert_eq!(divider.get_param(2), 1.0);
    }

    #[test]
    fn test_module_slice_interface() {
        let mut divider = PhaseDivider::new();
        let args = ProcessArgs::from_sample_rate(SR);
        let mut inputs = [Port::DISCONNECTED; InputId::COUNT];
        let mut outputs = [0.0; OutputId::COUNT];
        let mut lights = [0.0; LightId::COUNT];

        inputs[InputId::Phase as usize] = Port::connected(0.0);
        divider.process(&args, &inputs, &mut outputs, &mut lights);
        inputs[InputId::Phase as usize] = Port::connected(0.08);
        divider.process(&args, &inputs, &mut outputs, &mut lights);

        // Accumulator 0.04, stretched over the 0-5 half to 0.08
        assert!((outputs[OutputId::Phase as usize] - 0.08).abs() < 1e-5);
        assert_eq!(lights[LightId::ExternalPhase as usize], LIGHT_ON);
    }

    #[test]
    fn test_module_reset_keeps_knobs_and_flag() {
        let mut divider = PhaseDivider::new();
        divider.set_to(4.0);
        divider.set_gate_mode(true);
        divider.process_inputs(&phase_inputs(0.0), DT);
        divider.process_inputs(&phase_inputs(0.05), DT);
        Module::reset(&mut divider);
        assert_eq!(divider.half_phase(), 0.0);
        assert_eq!(divider.get_param(1), 4.0);
        assert!(divider.gate_mode());
    }
}
