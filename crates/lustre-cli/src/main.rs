//! Lustre CLI - render audio files through the enhancement engine.

mod commands;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lustre")]
#[command(author, version, about = "Lustre audio enhancement CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enhance a WAV file
    Process(commands::process::ProcessArgs),

    /// List and inspect presets
    Presets(commands::presets::PresetsArgs),

    /// Show the simulated rooms
    Rooms(commands::rooms::RoomsArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `presets show --json` stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Rooms(args) => commands::rooms::run(args),
    }
}
