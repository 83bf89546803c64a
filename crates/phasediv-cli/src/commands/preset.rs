//! Preset save and show commands.

use anyhow::Context;
use clap::{Args, Subcommand};
use phasediv_config::{ModulePreset, ModuleRegistry};
use phasediv_core::{ParameterInfo, PhaseDivider};
use std::path::PathBuf;

#[derive(Args)]
pub struct PresetArgs {
    #[command(subcommand)]
    command: PresetCommand,
}

#[derive(Subcommand)]
enum PresetCommand {
    /// Write a preset file from knob values
    Save {
        /// Output TOML file
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Preset name
        #[arg(long, default_value = "Untitled")]
        name: String,

        /// Optional description
        #[arg(long)]
        description: Option<String>,

        /// Ratio "from" knob (1-99)
        #[arg(long, default_value = "1")]
        from: f32,

        /// Ratio "to" knob (1-99)
        #[arg(long, default_value = "1")]
        to: f32,

        /// Swing knob (1-99)
        #[arg(long, default_value = "50")]
        swing: f32,

        /// Store gate mode
        #[arg(long)]
        gate_mode: bool,

        /// Target the divider variant without a rate input
        #[arg(long)]
        no_rate_input: bool,
    },

    /// Print a preset file
    Show {
        /// Preset TOML file
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Print as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

pub fn run(args: PresetArgs) -> anyhow::Result<()> {
    match args.command {
        PresetCommand::Save {
            path,
            name,
            description,
            from,
            to,
            swing,
            gate_mode,
            no_rate_input,
        } => {
            let module = if no_rate_input {
                phasediv_config::PHASE_ONLY_MODULE
            } else {
                phasediv_config::DEFAULT_MODULE
            };
            let mut preset = ModulePreset::new(name)
                .with_module(module)
                .with_param("div_from", from)
                .with_param("div_to", to)
                .with_param("div_swing", swing)
                .with_gate_mode(gate_mode);
            preset.description = description;
            preset.validate()?;

            preset.save(&path)?;
            tracing::info!(path = %path.display(), "preset saved");
            println!("Saved preset '{}' to {}", preset.name, path.display());
        }

        PresetCommand::Show { path, json } => {
            let preset = ModulePreset::load(&path)?;
            if json {
                let text = serde_json::to_string_pretty(&preset)
                    .context("failed to encode preset as JSON")?;
                println!("{text}");
                return Ok(());
            }

            let divider: PhaseDivider = preset.instantiate()?;
            let module_name = ModuleRegistry::global()
                .get(&preset.module)
                .map_or(preset.module.as_str(), |d| d.name);

            println!("{}", preset.name);
            println!("{}", "=".repeat(preset.name.len()));
            if let Some(description) = &preset.description {
                println!("{description}");
            }
            println!();
            println!("Module:  {module_name}");
            println!("From:    {}", divider.get_param(0));
            println!("To:      {}", divider.get_param(1));
            println!("Swing:   {}", divider.get_param(2));
            println!(
                "Clock:   {}",
                if divider.gate_mode() { "gate" } else { "trigger" }
            );
        }
    }
    Ok(())
}
