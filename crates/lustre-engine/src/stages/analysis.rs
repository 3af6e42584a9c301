//! Analysis stage: a transparent tap feeding the post-color analyser.

use lustre_analysis::{Analyser, AnalyserConfig};
use lustre_core::Effect;

/// Analyser configuration shared by the post-color and master taps.
pub fn analyser_config(smoothing: f32) -> AnalyserConfig {
    AnalyserConfig {
        smoothing,
        ..AnalyserConfig::default()
    }
}

/// Render-side analysis stage. Audio passes through unchanged.
#[derive(Debug)]
pub struct AnalysisStage {
    analyser: Analyser,
}

impl AnalysisStage {
    /// Wrap an analyser.
    pub fn new(analyser: Analyser) -> Self {
        Self { analyser }
    }

    /// Update spectral smoothing.
    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.analyser.set_smoothing(smoothing);
    }
}

impl Effect for AnalysisStage {
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        self.analyser.push(&[left], &[right]);
        (left, right)
    }

    /// Records the block, then publishes spectrum and waveform.
    fn process_block_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.analyser.push(left, right);
        self.analyser.publish();
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    fn reset(&mut self) {
        self.analyser.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_is_untouched_and_published() {
        let analyser = Analyser::new(analyser_config(0.0));
        let readout = analyser.readout();
        let mut stage = AnalysisStage::new(analyser);

        let mut left: Vec<f32> = (0..2048).map(|i| (i as f32 * 0.3).sin() * 0.5).collect();
        let mut right = left.clone();
        let original = left.clone();
        stage.process_block_stereo(&mut left, &mut right);
        assert_eq!(left, original);

        let mut time = vec![0.0; readout.time_len()];
        readout.copy_time(&mut time);
        assert_eq!(time, original);

        let mut spectrum = vec![0.0; readout.frequency_bin_count()];
        readout.copy_frequency(&mut spectrum);
        assert!(spectrum.iter().any(|&b| b > 0.0));
    }
}
