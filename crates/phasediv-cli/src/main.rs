//! PhaseDiv CLI - offline host for the phasediv clock modules.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "phasediv")]
#[command(author, version, about = "PhaseDiv clock divider CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available modules and their parameters
    Modules(commands::modules::ModulesArgs),

    /// Render a divider run to a WAV file
    Render(commands::render::RenderArgs),

    /// Save and inspect module presets
    Preset(commands::preset::PresetArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Modules(args) => commands::modules::run(&args),
        Commands::Render(args) => commands::render::run(&args),
        Commands::Preset(args) => commands::preset::run(args),
    }
}
