//! Host-facing module trait.
//!
//! The host calls [`Module::process`] exactly once per sample on its audio
//! thread, handing over the jack states and the elapsed time for that tick.
//!
//! ## Design Decisions
//!
//! - **Index-based jacks**: inputs, outputs and lights are plain slices
//!   indexed by the module's own id enums, so the trait stays object-safe
//!   and a host can hold `Box<dyn Module>` without knowing the concrete type.
//!
//! - **No allocations**: `process` must not allocate, lock, or do I/O.

use crate::port::Port;

/// Per-tick engine information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessArgs {
    /// Seconds elapsed during this tick (`1 / sample_rate`).
    pub sample_time: f32,
}

impl ProcessArgs {
    /// Arguments for a fixed sample rate.
    pub fn from_sample_rate(sample_rate: f32) -> Self {
        Self {
            sample_time: 1.0 / sample_rate,
        }
    }
}

impl Default for ProcessArgs {
    fn default() -> Self {
        Self::from_sample_rate(48000.0)
    }
}

/// Core trait for all modules.
pub trait Module {
    /// Number of input jacks.
    fn input_count(&self) -> usize;

    /// Number of output jacks.
    fn output_count(&self) -> usize;

    /// Number of indicator lights.
    fn light_count(&self) -> usize {
        0
    }

    /// Advance the module by one sample.
    ///
    /// `inputs` shorter than [`input_count`](Self::input_count) read as
    /// unpatched; short `outputs`/`lights` are written as far as they reach.
    fn process(&mut self, args: &ProcessArgs, inputs: &[Port], outputs: &mut [f32], lights: &mut [f32]);

    /// Run `frames` ticks with `inputs_at(frame)` supplying the jacks and
    /// `on_output(frame, outputs)` receiving each result.
    ///
    /// Convenience for offline hosts; the real-time host calls
    /// [`process`](Self::process) directly.
    fn process_block(
        &mut self,
        args: &ProcessArgs,
        frames: usize,
        inputs_at: &mut dyn FnMut(usize, &mut [Port]),
        on_output: &mut dyn FnMut(usize, &[f32]),
    ) {
        let mut inputs = [Port::DISCONNECTED; 16];
        let mut outputs = [0.0_f32; 16];
        let mut lights = [0.0_f32; 16];
        let n_in = self.input_count().min(inputs.len());
        let n_out = self.output_count().min(outputs.len());
        let n_light = self.light_count().min(lights.len());
        for frame in 0..frames {
            inputs_at(frame, &mut inputs[..n_in]);
            self.process(args, &inputs[..n_in], &mut outputs[..n_out], &mut lights[..n_light]);
            on_output(frame, &outputs[..n_out]);
        }
    }

    /// Clear running state without touching knob values or persisted flags.
    fn reset(&mut self);
}
