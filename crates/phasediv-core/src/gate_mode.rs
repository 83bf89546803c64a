//! Lock-free gate/trigger mode flag.
//!
//! The clock output's rendering mode is toggled from a menu or restored from
//! a saved patch on a non-audio thread, and read by the tick on the audio
//! thread. [`GateMode`] publishes it through a single atomic so the tick
//! never waits on a lock.

#[cfg(not(feature = "std"))]
use alloc::sync::Arc;
#[cfg(feature = "std")]
use std::sync::Arc;

use core::sync::atomic::{AtomicBool, Ordering};

/// Shared handle to a module's gate-mode flag.
///
/// Clones share the same flag. `false` is trigger mode (short pulses on each
/// swing edge), `true` is gate mode (square wave from the phase position).
///
/// # Example
///
/// ```rust
/// use phasediv_core::GateMode;
///
/// let flag = GateMode::default();
/// let ui_handle = flag.clone();
///
/// ui_handle.toggle();
/// assert!(flag.get());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GateMode {
    enabled: Arc<AtomicBool>,
}

impl GateMode {
    /// Create a flag with the given initial value.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    /// Read the flag.
    #[inline]
    pub fn get(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Publish a new value.
    pub fn set(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
        #[cfg(feature = "tracing")]
        tracing::debug!(enabled, "gate mode set");
    }

    /// Flip the flag and return the new value.
    pub fn toggle(&self) -> bool {
        let enabled = !self.enabled.fetch_xor(true, Ordering::Relaxed);
        #[cfg(feature = "tracing")]
        tracing::debug!(enabled, "gate mode toggled");
        enabled
    }
}
