//! Edge detection and one-shot pulses.
//!
//! [`SchmittTrigger`] turns a noisy trigger voltage into clean rising edges.
//! [`PulseGenerator`] holds a pulse for a fixed wall-clock duration, so pulse
//! width is the same at every sample rate.

/// Schmitt trigger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchmittState {
    /// Below the low threshold (or not yet above the high one).
    Low,
    /// Above the high threshold.
    High,
    /// No sample seen yet.
    #[default]
    Uninitialized,
}

/// Rising-edge detector with hysteresis.
///
/// The first sample only seeds the state, so a jack that is already high
/// when the module starts does not fire.
///
/// # Example
///
/// ```rust
/// use phasediv_core::SchmittTrigger;
///
/// let mut trig = SchmittTrigger::default();
/// assert!(!trig.process(0.0));
/// assert!(trig.process(5.0));
/// assert!(!trig.process(5.0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SchmittTrigger {
    state: SchmittState,
    low_threshold: f32,
    high_threshold: f32,
}

impl SchmittTrigger {
    /// Create a trigger with the given thresholds.
    pub const fn new(low_threshold: f32, high_threshold: f32) -> Self {
        Self {
            state: SchmittState::Uninitialized,
            low_threshold,
            high_threshold,
        }
    }

    /// Process one sample. Returns `true` on a low-to-high transition.
    #[inline]
    pub fn process(&mut self, input: f32) -> bool {
        match self.state {
            SchmittState::Uninitialized => {
                if input >= self.high_threshold {
                    self.state = SchmittState::High;
                } else if input <= self.low_threshold {
                    self.state = SchmittState::Low;
                }
            }
            SchmittState::High => {
                if input <= self.low_threshold {
                    self.state = SchmittState::Low;
                }
            }
            SchmittState::Low => {
                if input >= self.high_threshold {
                    self.state = SchmittState::High;
                    return true;
                }
            }
        }
        false
    }

    /// Current state.
    pub fn state(&self) -> SchmittState {
        self.state
    }

    /// Forget the last sample.
    pub fn reset(&mut self) {
        self.state = SchmittState::Uninitialized;
    }
}

impl Default for SchmittTrigger {
    /// 0 V / 1 V hysteresis, the usual trigger-input convention.
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// Retriggerable one-shot timer measured in seconds.
///
/// Retriggering while active keeps whichever pulse ends later.
///
/// # Example
///
/// ```rust
/// use phasediv_core::PulseGenerator;
///
/// let mut pulse = PulseGenerator::default();
/// pulse.trigger(1e-3);
/// // 48 kHz: about 48 samples high
/// let high = (0..100).filter(|_| pulse.process(1.0 / 48000.0)).count();
/// assert!((48..=49).contains(&high));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PulseGenerator {
    remaining: f32,
}

impl PulseGenerator {
    /// Start (or extend) a pulse of `duration` seconds.
    #[inline]
    pub fn trigger(&mut self, duration: f32) {
        if duration > self.remaining {
            self.remaining = duration;
        }
    }

    /// Advance by `delta_time` seconds. Returns whether the pulse was high
    /// at the start of this tick.
    #[inline]
    pub fn process(&mut self, delta_time: f32) -> bool {
        if self.remaining > 0.0 {
            self.remaining -= delta_time;
            true
        } else {
            false
        }
    }

    /// Cancel any pending pulse.
    pub fn reset(&mut self) {
        self.remaining = 0.0;
    }
}
