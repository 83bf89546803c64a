//! Offline render command.
//!
//! Drives a divider once per sample from a synthetic phase ramp or a
//! constant rate and writes the clock and phase outputs to a stereo WAV.

use anyhow::{Context, ensure};
use clap::{Args, ValueEnum};
use phasediv_config::ModulePreset;
use phasediv_core::{CLOCK_HIGH, DividerInputs, ParameterInfo, PhaseDivider, Port};
use std::path::{Path, PathBuf};

/// Length of the reset gate sent at each `--reset-at` time.
const RESET_GATE_SECONDS: f32 = 1e-3;

/// Timing reference fed to the divider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Source {
    /// Sawtooth ramp on the phase input
    #[default]
    Phase,
    /// Constant voltage on the rate input
    Rate,
}

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file (ch 1: clock, ch 2: phase, both scaled to 0-1)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Ratio "from" knob (1-99)
    #[arg(long)]
    from: Option<f32>,

    /// Ratio "to" knob (1-99)
    #[arg(long)]
    to: Option<f32>,

    /// Swing knob (1-99)
    #[arg(long)]
    swing: Option<f32>,

    /// Render the clock as a gate instead of triggers
    #[arg(long)]
    gate_mode: bool,

    /// Timing reference
    #[arg(long, value_enum, default_value_t = Source::Phase)]
    source: Source,

    /// Phase ramp frequency in cycles per second
    #[arg(long, default_value = "2.0")]
    freq: f32,

    /// Rate input voltage (V/s)
    #[arg(long, default_value = "1.0")]
    rate: f32,

    /// Duration in seconds
    #[arg(long, default_value = "2.0")]
    duration: f32,

    /// Sample rate
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Send a reset trigger at these times (seconds)
    #[arg(long, value_name = "SECONDS", num_args = 1..)]
    reset_at: Vec<f32>,

    /// Load knobs and state from a preset first
    #[arg(long, value_name = "FILE")]
    preset: Option<PathBuf>,

    /// Build the divider without a rate input
    #[arg(long)]
    no_rate_input: bool,
}

/// What to feed the divider, independent of argument parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub source: Source,
    pub freq: f32,
    pub rate: f32,
    pub sample_rate: u32,
    pub samples: usize,
    pub reset_at: Vec<f32>,
}

/// Interleaved output plus a summary.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    /// `[clock, phase]` frames, scaled to 0-1.
    pub frames: Vec<[f32; 2]>,
    /// Rising edges on the clock output.
    pub pulses: usize,
}

impl RenderPlan {
    fn inputs_at(&self, sample: usize, reset_windows: &[(usize, usize)]) -> DividerInputs {
        let t = sample as f64 / f64::from(self.sample_rate);
        let mut inputs = DividerInputs::default();
        match self.source {
            Source::Phase => {
                let cycles = t * f64::from(self.freq);
                inputs.phase = Port::connected((cycles.fract() * 10.0) as f32);
            }
            Source::Rate => inputs.rate = Port::connected(self.rate),
        }
        if !reset_windows.is_empty() {
            let high = reset_windows
                .iter()
                .any(|&(start, end)| (start..end).contains(&sample));
            inputs.reset = Port::connected(if high { 10.0 } else { 0.0 });
        }
        inputs
    }

    fn reset_windows(&self) -> Vec<(usize, usize)> {
        let sr = self.sample_rate as f32;
        let width = ((RESET_GATE_SECONDS * sr).round() as usize).max(1);
        self.reset_at
            .iter()
            .map(|&at| {
                let start = (at * sr).round() as usize;
                (start, start + width)
            })
            .collect()
    }

    /// Run the divider for the whole plan.
    pub fn run(&self, divider: &mut PhaseDivider) -> Rendered {
        let sample_time = 1.0 / self.sample_rate as f32;
        let windows = self.reset_windows();
        let mut rendered = Rendered {
            frames: Vec::with_capacity(self.samples),
            pulses: 0,
        };
        let mut was_high = false;

        for sample in 0..self.samples {
            let out = divider.process_inputs(&self.inputs_at(sample, &windows), sample_time);
            let high = out.clock >= CLOCK_HIGH;
            if high && !was_high {
                rendered.pulses += 1;
            }
            was_high = high;
            rendered.frames.push([out.clock / 10.0, out.phase / 10.0]);
        }
        rendered
    }
}

/// Write `[clock, phase]` frames as 32-bit float stereo.
pub fn write_frames(path: &Path, frames: &[[f32; 2]], sample_rate: u32) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for frame in frames {
        writer.write_sample(frame[0])?;
        writer.write_sample(frame[1])?;
    }
    writer.finalize()?;
    Ok(())
}

fn build_divider(args: &RenderArgs) -> anyhow::Result<PhaseDivider> {
    let mut divider = match &args.preset {
        Some(path) => ModulePreset::load(path)?.instantiate()?,
        None if args.no_rate_input => PhaseDivider::without_rate_input(),
        None => PhaseDivider::new(),
    };
    if args.preset.is_some() && args.no_rate_input && divider.has_rate_input() {
        tracing::warn!("--no-rate-input ignored: the preset selects the module type");
    }

    for (value, name) in [(args.from, "from"), (args.to, "to"), (args.swing, "swing")] {
        if let Some(v) = value {
            ensure!((1.0..=99.0).contains(&v), "--{name} must be between 1 and 99, got {v}");
        }
    }
    if let Some(v) = args.from {
        divider.set_from(v);
    }
    if let Some(v) = args.to {
        divider.set_to(v);
    }
    if let Some(v) = args.swing {
        divider.set_swing(v);
    }
    if args.gate_mode {
        divider.set_gate_mode(true);
    }
    Ok(divider)
}

pub fn run(args: &RenderArgs) -> anyhow::Result<()> {
    ensure!(args.sample_rate > 0, "--sample-rate must be positive");
    ensure!(
        args.duration.is_finite() && args.duration > 0.0,
        "--duration must be positive"
    );
    ensure!(args.freq.is_finite(), "--freq must be finite");
    ensure!(args.rate.is_finite(), "--rate must be finite");
    ensure!(
        args.reset_at.iter().all(|t| t.is_finite() && *t >= 0.0),
        "--reset-at times must be non-negative"
    );

    let mut divider = build_divider(args)?;
    if args.source == Source::Rate && !divider.has_rate_input() {
        tracing::warn!("rate source selected but the divider has no rate input; output will hold");
    }

    let plan = RenderPlan {
        source: args.source,
        freq: args.freq,
        rate: args.rate,
        sample_rate: args.sample_rate,
        samples: (args.duration * args.sample_rate as f32).round() as usize,
        reset_at: args.reset_at.clone(),
    };

    tracing::info!(
        from = divider.get_param(0),
        to = divider.get_param(1),
        swing = divider.get_param(2),
        gate_mode = divider.gate_mode(),
        source = ?plan.source,
        samples = plan.samples,
        "rendering"
    );

    let rendered = plan.run(&mut divider);
    write_frames(&args.output, &rendered.frames, args.sample_rate)?;

    tracing::info!(
        pulses = rendered.pulses,
        ratio = divider.effective_ratio(),
        "render complete"
    );
    println!(
        "Rendered {} samples to {} ({} clock pulses)",
        rendered.frames.len(),
        args.output.display(),
        rendered.pulses
    );
    Ok(())
}
