//! Preset listing and inspection.

use clap::{Args, Subcommand};
use lustre_config::{Preset, PresetLibrary, Settings};

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List the factory presets
    List,

    /// Show the settings a preset produces from the defaults
    Show {
        /// Preset name
        name: String,

        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    let library = PresetLibrary::factory();
    match args.command {
        PresetsCommand::List => {
            list_presets(&library);
            Ok(())
        }
        PresetsCommand::Show { name, json } => show_preset(&library, &name, json),
    }
}

fn list_presets(library: &PresetLibrary) {
    println!("Factory Presets:");
    println!("================");
    for preset in library.iter() {
        let desc = preset.description.as_deref().unwrap_or("");
        println!("  {:12} - {}", preset.name, desc);
    }
}

fn show_preset(library: &PresetLibrary, name: &str, json: bool) -> anyhow::Result<()> {
    let preset = library.preset(name).map_err(|_| {
        anyhow::anyhow!(
            "Preset '{}' not found. Use 'lustre presets list' to see available presets.",
            name
        )
    })?;
    let settings = resolved_settings(preset);

    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    println!("Preset: {}", preset.name);
    println!("{}", "=".repeat(8 + preset.name.len()));
    if let Some(desc) = &preset.description {
        println!("Description: {}", desc);
    }
    println!();
    print!("{}", toml::to_string_pretty(&settings)?);
    Ok(())
}

fn resolved_settings(preset: &Preset) -> Settings {
    let mut settings = Settings::default();
    settings.apply(&preset.patch);
    settings
}
