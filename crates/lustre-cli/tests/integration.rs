//! Integration tests for the `lustre` binary.

use std::path::Path;
use std::process::Command;

fn lustre_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lustre"))
}

fn write_sine(path: &Path, frames: usize, channels: u16) {
    let spec = hound::WavSpec {
        channels,
        sample_rate: 48000,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        let s = 0.3 * (2.0 * std::f32::consts::PI * 220.0 * i as f32 / 48000.0).sin();
        for _ in 0..channels {
            writer.write_sample(s).unwrap();
        }
    }
    writer.finalize().unwrap();
}

fn read_samples(path: &Path) -> (hound::WavSpec, Vec<f32>) {
    let mut reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = reader.samples::<f32>().map(Result::unwrap).collect();
    (spec, samples)
}

// ---------------------------------------------------------------------------
// `lustre rooms` / `lustre presets`
// ---------------------------------------------------------------------------

#[test]
fn cli_rooms_lists_every_room() {
    let output = lustre_bin().arg("rooms").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for room in ["studio", "analog", "concert", "club", "theater", "open"] {
        assert!(stdout.contains(room), "rooms should list '{room}'");
    }
    assert!(stdout.contains("14400"), "studio is 0.3 s at 48 kHz");
}

#[test]
fn cli_presets_list_shows_factory_presets() {
    let output = lustre_bin().args(["presets", "list"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in lustre_config::FACTORY_PRESET_NAMES {
        assert!(stdout.contains(name), "list should contain '{name}'");
    }
}

#[test]
fn cli_presets_show_json() {
    let output = lustre_bin()
        .args(["presets", "show", "basshead", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let sub_bass = value["harmonic"]["subBass"].as_f64().unwrap();
    assert!((sub_bass - 0.7).abs() < 1e-6);
    assert_eq!(value["spatial"]["room"], "club");
}

#[test]
fn cli_presets_show_unknown_fails() {
    let output = lustre_bin()
        .args(["presets", "show", "nonexistent"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// `lustre process`
// ---------------------------------------------------------------------------

#[test]
fn cli_process_with_preset_writes_stereo() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_sine(&input, 9600, 1);

    let status = lustre_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .args(["--preset", "vocal", "--seed", "5"])
        .output()
        .unwrap();
    assert!(status.status.success(), "{}", String::from_utf8_lossy(&status.stderr));

    let stdout = String::from_utf8_lossy(&status.stdout);
    assert!(stdout.contains("Final snapshot"));

    let (spec, samples) = read_samples(&output);
    assert_eq!(spec.channels, 2);
    assert_eq!(samples.len(), 9600 * 2);
    assert!(samples.iter().all(|s| s.is_finite()));
    assert!(samples.iter().any(|&s| s != 0.0));
}

#[test]
fn cli_process_bypass_only_applies_volume() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_sine(&input, 4800, 2);

    let status = lustre_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .arg("--bypass")
        .status()
        .unwrap();
    assert!(status.success());

    let (_, dry) = read_samples(&input);
    let (_, wet) = read_samples(&output);
    assert_eq!(dry.len(), wet.len());
    for (d, w) in dry.iter().zip(&wet) {
        assert!((d * 0.8 - w).abs() < 1e-6);
    }
}

#[test]
fn cli_process_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    let settings = dir.path().join("quiet.json");
    write_sine(&input, 14400, 1);
    std::fs::write(&settings, r#"{"output": {"volume": 0.0}}"#).unwrap();

    let status = lustre_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .arg("--settings")
        .arg(&settings)
        .args(["--bypass", "--bit-depth", "16"])
        .status()
        .unwrap();
    assert!(status.success());

    let mut reader = hound::WavReader::open(&output).unwrap();
    assert_eq!(reader.spec().bits_per_sample, 16);
    // Volume glides down from 0.8 and has settled well before 200 ms.
    let tail: Vec<i32> = reader
        .samples::<i32>()
        .map(Result::unwrap)
        .skip(2 * 9600)
        .collect();
    assert!(tail.iter().all(|&s| s == 0));
}

#[test]
fn cli_process_rejects_unknown_preset() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    write_sine(&input, 480, 1);

    let status = lustre_bin()
        .arg("process")
        .arg(&input)
        .arg(dir.path().join("out.wav"))
        .args(["--preset", "nonexistent"])
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn cli_process_rejects_bad_bit_depth() {
    let status = lustre_bin()
        .args(["process", "a.wav", "b.wav", "--bit-depth", "12"])
        .status()
        .unwrap();
    assert!(!status.success());
}
