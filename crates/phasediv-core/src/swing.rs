//! Swing: uneven split of each cycle into a short and a long segment.
//!
//! The swing value (1–99) places a threshold at `swing / 10` inside the
//! 0–10 accumulator range. Each side of the threshold is stretched to a full
//! 0–10 output ramp, so the output phase restarts at the threshold.

/// Full scale of the accumulator and of the phase output.
pub const PHASE_RANGE: f64 = 10.0;

const SWING_MIN: f32 = 1.0;
const SWING_MAX: f32 = 99.0;

/// Largest `f32` below [`PHASE_RANGE`].
const PHASE_OUT_MAX: f32 = f32::from_bits(10.0_f32.to_bits() - 1);

/// Current swing amount, 1–99.
///
/// # Example
///
/// ```rust
/// use phasediv_core::Swing;
///
/// let mut swing = Swing::default();
/// swing.update(50.0, Some(5.0));
/// assert_eq!(swing.value(), 99.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swing {
    value: f32,
}

impl Default for Swing {
    fn default() -> Self {
        Self { value: 50.0 }
    }
}

impl Swing {
    /// Recompute swing from the knob and an optional ±5 V CV.
    ///
    /// Negative CV bends the knob toward 1, positive toward 99. A CV of
    /// exactly 0 V leaves the previous value in place rather than snapping
    /// back to the knob.
    #[inline]
    pub fn update(&mut self, knob: f32, cv: Option<f32>) -> f32 {
        let knob = knob.clamp(SWING_MIN, SWING_MAX);
        match cv {
            Some(cv) => {
                let amount = (cv / 5.0).clamp(-1.0, 1.0);
                if amount < 0.0 {
                    self.value = (knob + (knob - SWING_MIN) * amount).max(SWING_MIN);
                } else if amount > 0.0 {
                    self.value = (knob + (SWING_MAX - knob) * amount).min(SWING_MAX);
                }
            }
            None => self.value = knob,
        }
        self.value
    }

    /// Swing amount, 1–99.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Accumulator position where the short segment ends.
    #[inline]
    pub fn threshold(&self) -> f64 {
        f64::from(self.value) / 10.0
    }

    /// Map an accumulator position in `[0, 10)` to the output phase.
    ///
    /// Below the threshold the short segment is stretched to 0–10; above it
    /// the long segment is. The result jumps from ~10 back to 0 exactly at
    /// the threshold, and never equals 10.
    #[inline]
    pub fn remap(&self, half_phase: f64) -> f32 {
        let threshold = self.threshold();
        let phase = if half_phase < threshold {
            half_phase / threshold * PHASE_RANGE
        } else {
            (half_phase - threshold) / (PHASE_RANGE - threshold) * PHASE_RANGE
        };
        // The narrowing cast can round up to 10
        (phase as f32).clamp(0.0, PHASE_OUT_MAX)
    }

    /// Whether the accumulator moved across the threshold between two
    /// ticks, in either direction.
    #[inline]
    pub fn crossed(&self, previous: f64, current: f64) -> bool {
        let threshold = self.threshold();
        (previous < threshold && threshold <= current)
            || (previous > threshold && threshold >= current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpatched_follows_knob() {
        let mut swing = Swing::default();
        assert_eq!(swing.update(30.0, None), 30.0);
        assert_eq!(swing.update(0.0, None), 1.0);
        assert_eq!(swing.update(120.0, None), 99.0);
    }

    #[test]
    fn test_cv_bends_toward_limits() {
        let mut swing = Swing::default();
        assert_eq!(swing.update(50.0, Some(-5.0)), 1.0);
        assert_eq!(swing.update(50.0, Some(5.0)), 99.0);
        assert_eq!(swing.update(50.0, Some(-2.5)), 25.5);
        assert_eq!(swing.update(50.0, Some(2.5)), 74.5);
        // Clamped beyond ±5 V
        assert_eq!(swing.update(50.0, Some(-12.0)), 1.0);
    }

    #[test]
    fn test_zero_cv_holds_previous_value() {
        let mut swing = Swing::default();
        swing.update(50.0, Some(5.0));
        assert_eq!(swing.update(50.0, Some(0.0)), 99.0);
        // The hold also ignores knob moves
        assert_eq!(swing.update(20.0, Some(0.0)), 99.0);
        // Unplugging snaps to the knob
        assert_eq!(swing.update(20.0, None), 20.0);
    }

    #[test]
    fn test_remap_endpoints() {
        let swing = Swing::default();
        assert_eq!(swing.threshold(), 5.0);
        assert_eq!(swing.remap(0.0), 0.0);
        assert_eq!(swing.remap(2.5), 5.0);
        assert_eq!(swing.remap(5.0), 0.0);
        assert_eq!(swing.remap(7.5), 5.0);
    }

    #[test]
    fn test_remap_one_sided_limits() {
        let mut swing = Swing::default();
        swing.update(30.0, None);
        let threshold = swing.threshold();
        let below = swing.remap(threshold - 1e-9);
        let above = swing.remap(threshold + 1e-9);
        assert!((below - 10.0).abs() < 1e-5, "left limit {below}");
        assert!(above.abs() < 1e-5, "right limit {above}");
    }

    #[test]
    fn test_remap_stays_below_full_scale() {
        let swing = Swing::default();
        let threshold = swing.threshold();
        let below = swing.remap(threshold - 1e-7);
        assert!(below < 10.0, "remap just below threshold gave {below}");
        assert_eq!(below, PHASE_OUT_MAX);

        let top = swing.remap(PHASE_RANGE - 1e-12);
        assert!(top < 10.0, "remap near full scale gave {top}");
    }

    #[test]
    fn test_crossed_both_directions() {
        let swing = Swing::default();
        assert!(swing.crossed(4.9, 5.0));
        assert!(swing.crossed(4.9, 5.1));
        assert!(swing.crossed(5.1, 4.9));
        assert!(swing.crossed(5.1, 5.0));
        assert!(!swing.crossed(5.0, 5.1));
        assert!(!swing.crossed(4.0, 4.5));
        assert!(!swing.crossed(5.0, 5.0));
    }
}
