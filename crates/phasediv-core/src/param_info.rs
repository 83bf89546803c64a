//! Parameter introspection for module knobs.
//!
//! Hosts discover a module's knobs through the [`ParameterInfo`] trait and
//! describe each one with a [`ParamDescriptor`]. This is what lets a panel,
//! a preset file, or a command-line `--param` flag address a knob without
//! knowing the concrete module type.
//!
//! Parameters are accessed by zero-based index. Each descriptor also carries
//! a stable [`ParamId`] and a `string_id` that survive reordering, so presets
//! written by one build can be read by the next.
//!
//! # Example
//!
//! ```rust
//! use phasediv_core::{ParameterInfo, ParamDescriptor, ParamId};
//!
//! struct Divider {
//!     from: f32,
//! }
//!
//! impl ParameterInfo for Divider {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::ratio_step("From", "From")
//!                 .with_id(ParamId(100), "div_from")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.from,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if let Some(desc) = self.param_info(index) {
//!             self.from = desc.clamp(value);
//!         }
//!     }
//! }
//! ```

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` must never change for a given parameter.
///
/// # Convention
///
/// Each module gets a base ID; params are sequential from there:
/// - Divider: 100, 101, 102
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Parameter capability flags.
///
/// # Example
///
/// ```rust
/// use phasediv_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// assert!(!ParamFlags::AUTOMATABLE.contains(ParamFlags::STEPPED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// Host can automate this parameter.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter has discrete integer steps.
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Trait for modules that expose introspectable knobs.
///
/// # Thread Safety
///
/// This trait does not require thread safety. Knob values are written by the
/// host between ticks, on the same thread that runs the tick.
pub trait ParameterInfo {
    /// Returns the number of parameters this module exposes.
    fn param_count(&self) -> usize;

    /// Returns the descriptor for the parameter at the given index.
    ///
    /// Returns `None` if `index >= param_count()`.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Gets the current value of the parameter at the given index.
    ///
    /// Returns `0.0` for out-of-range indices.
    fn get_param(&self, index: usize) -> f32;

    /// Sets the value of the parameter at the given index.
    ///
    /// Implementations clamp into the descriptor range. Out-of-range indices
    /// are ignored.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter index by name (case-insensitive).
    ///
    /// Matches the descriptor's `name`, `short_name` and `string_id`.
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|desc| {
                desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name)
                    || desc.string_id.eq_ignore_ascii_case(name)
            })
        })
    }
}

/// Describes a single knob's metadata for display and validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display.
    pub name: &'static str,

    /// Short name for narrow panel displays, max 8 characters.
    pub short_name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum allowed value.
    pub min: f32,

    /// Maximum allowed value.
    pub max: f32,

    /// Value at instantiation.
    pub default: f32,

    /// Recommended step increment for encoder-based control.
    pub step: f32,

    /// Stable numeric ID. Default: `ParamId(0)` (unassigned).
    pub id: ParamId,

    /// Human-readable stable ID used as the preset key (e.g. `"div_swing"`).
    pub string_id: &'static str,

    /// Capability flags.
    pub flags: ParamFlags,
}

impl ParamDescriptor {
    /// Integer ratio knob, 1–99, default 1.
    pub fn ratio_step(name: &'static str, short_name: &'static str) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min: 1.0,
            max: 99.0,
            default: 1.0,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
        }
    }

    /// Swing knob, 1–99 percent, default 50.
    ///
    /// The bounds keep the swing threshold strictly inside the cycle; 0 and
    /// 100 would collapse one half of the remap to zero width.
    pub fn swing() -> Self {
        Self {
            name: "Swing",
            short_name: "Swing",
            unit: ParamUnit::Percent,
            min: 1.0,
            max: 99.0,
            default: 50.0,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Sets the stable parameter ID and string ID.
    ///
    /// # Example
    ///
    /// ```rust
    /// use phasediv_core::{ParamDescriptor, ParamId};
    ///
    /// let desc = ParamDescriptor::swing().with_id(ParamId(102), "div_swing");
    /// assert_eq!(desc.id, ParamId(102));
    /// assert_eq!(desc.string_id, "div_swing");
    /// ```
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Returns `true` if the parameter only takes integer values.
    #[inline]
    pub const fn is_stepped(&self) -> bool {
        self.flags.contains(ParamFlags::STEPPED)
    }

    /// Clamps a value to this parameter's valid range, rounding stepped
    /// parameters to the nearest integer.
    ///
    /// # Example
    ///
    /// ```rust
    /// use phasediv_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::ratio_step("From", "From");
    /// assert_eq!(desc.clamp(0.0), 1.0);
    /// assert_eq!(desc.clamp(3.6), 4.0);
    /// assert_eq!(desc.clamp(250.0), 99.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        let value = if self.is_stepped() {
            libm::roundf(value)
        } else {
            value
        };
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Returns `true` if `value` lies inside `[min, max]`.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Percentage (%).
    Percent,

    /// No unit.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// # Example
    ///
    /// ```rust
    /// use phasediv_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Percent.suffix(), "%");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Percent => "%",
            ParamUnit::None => "",
        }
    }
}
