//! Visualization snapshots.
//!
//! A snapshot is a fresh copy of the analysers' last published buffers,
//! reduced for display:
//!
//! - **spectrum**: 256 bins, the maximum of each group of 4 post-color bins
//! - **waveform**: 256 samples, every 8th post-color sample clamped to ±1
//! - **rms**: RMS of the post-color time buffer
//! - **peak**: largest master-analyser bin
//!
//! Reading never blocks the renderer; a snapshot may mix two consecutive
//! publications.

use std::sync::Arc;

use lustre_analysis::AnalyserReadout;
use lustre_analysis::levels::{decimate_clamped, group_max, rms};
use serde::Serialize;

/// Bins in [`VisualizationSnapshot::spectrum`].
pub const SPECTRUM_BINS: usize = 256;
/// Samples in [`VisualizationSnapshot::waveform`].
pub const WAVEFORM_SAMPLES: usize = 256;

/// Point-in-time display data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualizationSnapshot {
    /// Normalized spectrum, each value in `0..=1`
    pub spectrum: Vec<f32>,
    /// Waveform, each value in `-1..=1`
    pub waveform: Vec<f32>,
    /// RMS level of the post-color signal
    pub rms: f32,
    /// Largest normalized master bin, `0..=1`
    pub peak: f32,
}

impl VisualizationSnapshot {
    /// An all-zero snapshot, reported before the engine is running.
    pub fn silent() -> Self {
        Self {
            spectrum: vec![0.0; SPECTRUM_BINS],
            waveform: vec![0.0; WAVEFORM_SAMPLES],
            rms: 0.0,
            peak: 0.0,
        }
    }
}

/// Control-side reader over the two analyser readouts.
#[derive(Debug, Clone)]
pub struct Visualizer {
    post_color: Arc<AnalyserReadout>,
    master: Arc<AnalyserReadout>,
}

impl Visualizer {
    /// Read from a post-color and a master analyser.
    pub fn new(post_color: Arc<AnalyserReadout>, master: Arc<AnalyserReadout>) -> Self {
        Self { post_color, master }
    }

    /// Copy and reduce the latest published buffers.
    pub fn snapshot(&self) -> VisualizationSnapshot {
        let mut bins = vec![0.0; self.post_color.frequency_bin_count()];
        self.post_color.copy_frequency(&mut bins);
        let mut spectrum = vec![0.0; SPECTRUM_BINS];
        group_max(&bins, &mut spectrum);

        let mut time = vec![0.0; self.post_color.time_len()];
        self.post_color.copy_time(&mut time);
        let mut waveform = vec![0.0; WAVEFORM_SAMPLES];
        decimate_clamped(&time, &mut waveform, 1.0);

        let mut master = vec![0.0; self.master.frequency_bin_count()];
        self.master.copy_frequency(&mut master);
        let peak = master.iter().copied().fold(0.0_f32, f32::max);

        VisualizationSnapshot {
            spectrum,
            waveform,
            rms: rms(&time),
            peak,
        }
    }
}
