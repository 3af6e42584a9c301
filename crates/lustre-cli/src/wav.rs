//! Stereo WAV reading and writing.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

/// Decoded stereo audio.
pub struct StereoAudio {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
    pub sample_rate: u32,
}

/// Read a WAV file as stereo.
///
/// Mono files are duplicated to both channels; files with more than two
/// channels keep the first two.
pub fn read_stereo(path: &Path) -> anyhow::Result<StereoAudio> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let frames = samples.len() / channels;
    let mut left = Vec::with_capacity(frames);
    let mut right = Vec::with_capacity(frames);
    for frame in samples.chunks_exact(channels) {
        left.push(frame[0]);
        right.push(frame.get(1).copied().unwrap_or(frame[0]));
    }

    Ok(StereoAudio {
        left,
        right,
        sample_rate: spec.sample_rate,
    })
}

/// Write interleaved stereo. 32-bit output is float, 16 and 24 are integer.
pub fn write_stereo(
    path: &Path,
    left: &[f32],
    right: &[f32],
    sample_rate: u32,
    bits_per_sample: u16,
) -> anyhow::Result<()> {
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample,
        sample_format: if bits_per_sample == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };
    let mut writer = WavWriter::create(path, spec)?;

    if bits_per_sample == 32 {
        for (&l, &r) in left.iter().zip(right) {
            writer.write_sample(l)?;
            writer.write_sample(r)?;
        }
    } else {
        let max_val = (1i32 << (bits_per_sample - 1)) as f32;
        for (&l, &r) in left.iter().zip(right) {
            writer.write_sample((l * max_val).clamp(-max_val, max_val - 1.0) as i32)?;
            writer.write_sample((r * max_val).clamp(-max_val, max_val - 1.0) as i32)?;
        }
    }

    writer.finalize()?;
    Ok(())
}
