//! Rational clock ratio from two stepped knobs and their CV inputs.

use libm::floorf;

/// Smallest value either side of the ratio can take.
pub const RATIO_MIN: f32 = 1.0;
/// Largest value either side of the ratio can take.
pub const RATIO_MAX: f32 = 99.0;

/// Pulls rounding slightly toward floor so a CV parked on a half-step does
/// not flicker between two ratios.
const ROUNDING_BIAS: f32 = 0.01;

/// Resolve one side of the ratio.
///
/// Unpatched, the knob value is used as is. Patched, the CV (clamped to
/// 0–10 V) sweeps linearly from 1 at 0 V up to the knob value at 10 V:
///
/// `round(clamp(cv, 0, 10) / 10 * (knob - 1) + 1)`
///
/// # Example
///
/// ```rust
/// use phasediv_core::ratio::resolve_ratio_side;
///
/// assert_eq!(resolve_ratio_side(8.0, None), 8);
/// assert_eq!(resolve_ratio_side(8.0, Some(0.0)), 1);
/// assert_eq!(resolve_ratio_side(8.0, Some(10.0)), 8);
/// assert_eq!(resolve_ratio_side(8.0, Some(5.0)), 4);
/// ```
#[inline]
pub fn resolve_ratio_side(knob: f32, cv: Option<f32>) -> u32 {
    let knob = knob.clamp(RATIO_MIN, RATIO_MAX);
    let value = match cv {
        Some(cv) => {
            let amount = cv.clamp(0.0, 10.0) / 10.0;
            floorf(amount * (knob - 1.0) + 1.0 + 0.5 - ROUNDING_BIAS)
        }
        None => libm::roundf(knob),
    };
    value.clamp(RATIO_MIN, RATIO_MAX) as u32
}

/// Current `to / from` ratio.
///
/// Ratios above 1 multiply the incoming clock, below 1 divide it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    from: u32,
    to: u32,
}

impl Default for Ratio {
    fn default() -> Self {
        Self { from: 1, to: 1 }
    }
}

impl Ratio {
    /// Recompute both sides from knob values and optional CVs.
    #[inline]
    pub fn update(&mut self, from_knob: f32, from_cv: Option<f32>, to_knob: f32, to_cv: Option<f32>) {
        self.from = resolve_ratio_side(from_knob, from_cv);
        self.to = resolve_ratio_side(to_knob, to_cv);
    }

    /// The "from" side.
    pub fn from(&self) -> u32 {
        self.from
    }

    /// The "to" side.
    pub fn to(&self) -> u32 {
        self.to
    }

    /// `to / from`. `from` is never zero.
    #[inline]
    pub fn value(&self) -> f64 {
        f64::from(self.to) / f64::from(self.from)
    }
}
