//! File-based enhancement command.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use lustre_analysis::levels::{peak, rms};
use lustre_config::{Preset, PresetLibrary, SettingsPatch};
use lustre_core::linear_to_db;
use lustre_engine::{
    BufferSource, Engine, EngineConfig, ImpulseSeed, SourceHandle, VisualizationSnapshot,
};

use crate::wav;

/// Frames handed to the renderer per call.
const CHUNK_FRAMES: usize = 4096;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset name, or path to a preset TOML file
    #[arg(short, long)]
    preset: Option<String>,

    /// Settings patch file (TOML, or JSON by extension), applied after the preset
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Route the input straight to the output
    #[arg(long)]
    bypass: bool,

    /// Keep the chain but neutralize every stage
    #[arg(long)]
    disable: bool,

    /// Seed for room impulse synthesis (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Render block size in frames
    #[arg(long, default_value = "128")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32", value_parser = parse_bit_depth)]
    bit_depth: u16,
}

fn parse_bit_depth(s: &str) -> Result<u16, String> {
    match s.parse::<u16>() {
        Ok(bits @ (16 | 24 | 32)) => Ok(bits),
        _ => Err(format!("Invalid bit depth: '{}' (expected 16, 24, or 32)", s)),
    }
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let audio = wav::read_stereo(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let frames = audio.left.len();
    let sample_rate = audio.sample_rate as f32;
    println!(
        "  {} frames, {} Hz, {:.2}s",
        frames,
        audio.sample_rate,
        frames as f32 / sample_rate
    );

    let mut library = PresetLibrary::factory();
    let preset_name = match &args.preset {
        Some(name) => Some(resolve_preset(&mut library, name)?),
        None => None,
    };

    let config = EngineConfig::default()
        .with_sample_rate(sample_rate)
        .with_block_size(args.block_size)
        .with_seed(ImpulseSeed::from(args.seed));
    let mut engine = Engine::with_library(config, library);

    let input_rms = rms(&audio.left).max(rms(&audio.right));
    let input_peak = peak(&audio.left).max(peak(&audio.right));
    let source = SourceHandle::new(BufferSource::new(audio.left, audio.right));
    engine.init(&source);
    if let Some(err) = engine.last_error() {
        anyhow::bail!("engine initialization failed: {}", err);
    }

    if let Some(name) = &preset_name {
        println!("Loading preset: {}", name);
        engine.set_preset(name);
    }
    if let Some(path) = &args.settings {
        let patch = SettingsPatch::load(path)?;
        println!("Applying settings from {}", path.display());
        engine.load_settings(&patch);
    }
    if args.disable {
        engine.set_enabled(false);
    }
    if args.bypass {
        engine.set_bypass(true);
    }

    let mut renderer = engine
        .take_renderer()
        .context("renderer already taken")?;

    let pb = ProgressBar::new(frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut left = vec![0.0; frames];
    let mut right = vec![0.0; frames];
    for (l, r) in left
        .chunks_mut(CHUNK_FRAMES)
        .zip(right.chunks_mut(CHUNK_FRAMES))
    {
        renderer.render(l, r);
        pb.inc(l.len() as u64);
    }
    pb.finish_with_message("done");

    let output_rms = rms(&left).max(rms(&right));
    let output_peak = peak(&left).max(peak(&right));
    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(input_rms),
        linear_to_db(input_peak)
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(output_rms),
        linear_to_db(output_peak)
    );
    print_snapshot(&engine.visualization_data());

    println!("\nWriting {}...", args.output.display());
    wav::write_stereo(&args.output, &left, &right, audio.sample_rate, args.bit_depth)?;
    engine.destroy();
    println!("Done!");

    Ok(())
}

/// Register a preset file, or check a name against the library.
fn resolve_preset(library: &mut PresetLibrary, name: &str) -> anyhow::Result<String> {
    let path = Path::new(name);
    if path.extension().is_some_and(|ext| ext == "toml") && path.exists() {
        let preset = Preset::load(path)?;
        let name = preset.name.clone();
        library.register(preset);
        return Ok(name);
    }
    library.preset(name).map_err(|_| {
        anyhow::anyhow!(
            "Preset '{}' not found. Use 'lustre presets list' to see available presets.",
            name
        )
    })?;
    Ok(name.to_string())
}

fn print_snapshot(snapshot: &VisualizationSnapshot) {
    let (loudest_bin, loudest) = snapshot
        .spectrum
        .iter()
        .copied()
        .enumerate()
        .fold((0, 0.0_f32), |best, (i, v)| if v > best.1 { (i, v) } else { best });

    println!("\nFinal snapshot:");
    println!("  RMS (post-color): {:.3}", snapshot.rms);
    println!("  Peak (master):    {:.3}", snapshot.peak);
    println!(
        "  Loudest band:     {} of {} ({:.2})",
        loudest_bin,
        snapshot.spectrum.len(),
        loudest
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_depth_accepts_supported_values() {
        assert_eq!(parse_bit_depth("16"), Ok(16));
        assert_eq!(parse_bit_depth("24"), Ok(24));
        assert_eq!(parse_bit_depth("32"), Ok(32));
        assert!(parse_bit_depth("8").is_err());
        assert!(parse_bit_depth("loud").is_err());
    }

    #[test]
    fn resolve_known_and_unknown_presets() {
        let mut library = PresetLibrary::factory();
        assert_eq!(resolve_preset(&mut library, "Night").unwrap(), "Night");
        assert!(resolve_preset(&mut library, "nope").is_err());
    }

    #[test]
    fn resolve_registers_preset_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mine.toml");
        std::fs::write(&path, "name = \"mine\"\n[output]\nvolume = 0.5\n").unwrap();

        let mut library = PresetLibrary::factory();
        let name = resolve_preset(&mut library, path.to_str().unwrap()).unwrap();
        assert_eq!(name, "mine");
        assert!(library.get("mine").is_some());
    }
}
