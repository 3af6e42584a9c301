//! Streaming spectrum analyser with lock-free publication.
//!
//! The render side owns an [`Analyser`]: it pushes each block of audio
//! into a ring buffer, then [`publish`](Analyser::publish)es a windowed,
//! smoothed, dB-normalized spectrum plus the latest time-domain window.
//! Readers hold an `Arc<`[`AnalyserReadout`]`>` and copy whatever was
//! last published; a copy may straddle two publications, which display
//! code tolerates.
//!
//! Spectrum semantics:
//!
//! ```text
//! X[k]      = FFT(window · x)[k] / N
//! S[k]      = τ · S_prev[k] + (1 − τ) · |X[k]|
//! bin[k]    = clamp((20·log10 S[k] − min_db) / (max_db − min_db), 0, 1)
//! ```

use std::sync::Arc;

use lustre_core::{AtomicF32, linear_to_db};
use rustfft::{Fft, FftPlanner, num_complex::Complex};

use crate::fft::Window;
use crate::levels::normalize_db;

/// Analyser configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyserConfig {
    /// Transform size (power of two)
    pub fft_size: usize,
    /// dB value mapped to 0.0
    pub min_db: f32,
    /// dB value mapped to 1.0
    pub max_db: f32,
    /// Spectral smoothing `τ`, `0.0..1.0`
    pub smoothing: f32,
    /// Analysis window
    pub window: Window,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            min_db: -100.0,
            max_db: -30.0,
            smoothing: 0.8,
            window: Window::Blackman,
        }
    }
}

/// Last published analyser buffers, shared with readers.
#[derive(Debug)]
pub struct AnalyserReadout {
    frequency: Vec<AtomicF32>,
    time: Vec<AtomicF32>,
}

impl AnalyserReadout {
    fn new(fft_size: usize) -> Self {
        Self {
            frequency: (0..fft_size / 2).map(|_| AtomicF32::new(0.0)).collect(),
            time: (0..fft_size).map(|_| AtomicF32::new(0.0)).collect(),
        }
    }

    /// Number of spectrum bins (`fft_size / 2`).
    pub fn frequency_bin_count(&self) -> usize {
        self.frequency.len()
    }

    /// Number of time-domain samples (`fft_size`).
    pub fn time_len(&self) -> usize {
        self.time.len()
    }

    /// Copy normalized spectrum bins (`0..=1`) into `out`.
    pub fn copy_frequency(&self, out: &mut [f32]) {
        for (dst, cell) in out.iter_mut().zip(&self.frequency) {
            *dst = cell.load_relaxed();
        }
    }

    /// Copy the latest time-domain window, oldest sample first.
    pub fn copy_time(&self, out: &mut [f32]) {
        for (dst, cell) in out.iter_mut().zip(&self.time) {
            *dst = cell.load_relaxed();
        }
    }
}

/// Render-side analyser.
pub struct Analyser {
    config: AnalyserConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    ring: Vec<f32>,
    write_pos: usize,
    frame: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    /// Smoothed linear magnitudes
    smoothed: Vec<f32>,
    readout: Arc<AnalyserReadout>,
}

impl std::fmt::Debug for Analyser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyser")
            .field("config", &self.config)
            .field("write_pos", &self.write_pos)
            .finish_non_exhaustive()
    }
}

impl Analyser {
    /// Create an analyser. All buffers are allocated here.
    ///
    /// A `fft_size` below 32 is raised to 32; smoothing is clamped to
    /// `0.0..=0.99`.
    pub fn new(config: AnalyserConfig) -> Self {
        let fft_size = config.fft_size.max(32);
        let config = AnalyserConfig {
            fft_size,
            smoothing: config.smoothing.clamp(0.0, 0.99),
            ..config
        };

        let fft = FftPlanner::new().plan_fft_forward(fft_size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Self {
            config,
            fft,
            window: config.window.coefficients(fft_size),
            ring: vec![0.0; fft_size],
            write_pos: 0,
            frame: vec![Complex::new(0.0, 0.0); fft_size],
            scratch,
            smoothed: vec![0.0; fft_size / 2],
            readout: Arc::new(AnalyserReadout::new(fft_size)),
        }
    }

    /// Shared handle to the published buffers.
    pub fn readout(&self) -> Arc<AnalyserReadout> {
        Arc::clone(&self.readout)
    }

    /// Active configuration.
    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }

    /// Set spectral smoothing, clamped to `0.0..=0.99`.
    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.config.smoothing = smoothing.clamp(0.0, 0.99);
    }

    /// Append a stereo block, down-mixed to mono.
    pub fn push(&mut self, left: &[f32], right: &[f32]) {
        let len = self.ring.len();
        for (&l, &r) in left.iter().zip(right) {
            self.ring[self.write_pos] = (l + r) * 0.5;
            self.write_pos = (self.write_pos + 1) % len;
        }
    }

    /// Transform the current window and publish spectrum and waveform.
    pub fn publish(&mut self) {
        let n = self.ring.len();
        let start = self.write_pos;

        for i in 0..n {
            let x = self.ring[(start + i) % n];
            self.readout.time[i].store_relaxed(x);
            self.frame[i] = Complex::new(x * self.window[i], 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.frame, &mut self.scratch);

        let tau = self.config.smoothing;
        let scale = 1.0 / n as f32;
        let (min_db, max_db) = (self.config.min_db, self.config.max_db);
        for (k, smoothed) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.frame[k].norm() * scale;
            let value = tau * *smoothed + (1.0 - tau) * magnitude;
            *smoothed = if value.is_finite() { value } else { 0.0 };
            let normalized = normalize_db(linear_to_db(*smoothed), min_db, max_db);
            self.readout.frequency[k].store_relaxed(normalized);
        }
    }

    /// Clear audio history and smoothing state. Published buffers are kept.
    pub fn clear(&mut self) {
        self.ring.fill(0.0);
        self.smoothed.fill(0.0);
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine_block(freq: f32, sr: f32, offset: usize, len: usize, amp: f32) -> Vec<f32> {
        (offset..offset + len)
            .map(|i| amp * (2.0 * PI * freq * i as f32 / sr).sin())
            .collect()
    }

    #[test]
    fn test_silence_publishes_zeros() {
        let mut analyser = Analyser::new(AnalyserConfig::default());
        let block = vec![0.0; 128];
        analyser.push(&block, &block);
        analyser.publish();

        let readout = analyser.readout();
        let mut bins = vec![1.0; readout.frequency_bin_count()];
        readout.copy_frequency(&mut bins);
        assert!(bins.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_sine_peaks_at_its_bin() {
        let config = AnalyserConfig {
            smoothing: 0.0,
            ..AnalyserConfig::default()
        };
        let mut analyser = Analyser::new(config);
        // bin 100 of a 2048-point transform at 48 kHz
        let freq = 100.0 * 48000.0 / 2048.0;
        let signal = sine_block(freq, 48000.0, 0, 2048, 0.5);
        analyser.push(&signal, &signal);
        analyser.publish();

        let mut bins = vec![0.0; 1024];
        analyser.readout().copy_frequency(&mut bins);
        let loudest = bins
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(loudest, Some(100));
        assert!(bins.iter().all(|&b| (0.0..=1.0).contains(&b)));
    }

    #[test]
    fn test_smoothing_rises_gradually() {
        let config = AnalyserConfig {
            smoothing: 0.9,
            ..AnalyserConfig::default()
        };
        let mut analyser = Analyser::new(config);
        let signal = sine_block(1000.0, 48000.0, 0, 2048, 0.1);
        analyser.push(&signal, &signal);

        let readout = analyser.readout();
        let mut bins = vec![0.0; 1024];
        analyser.publish();
        readout.copy_frequency(&mut bins);
        let first = bins[43];
        for _ in 0..50 {
            analyser.publish();
        }
        readout.copy_frequency(&mut bins);
        assert!(bins[43] > first, "{} should exceed {}", bins[43], first);
    }

    #[test]
    fn test_time_buffer_is_chronological() {
        let config = AnalyserConfig {
            fft_size: 64,
            ..AnalyserConfig::default()
        };
        let mut analyser = Analyser::new(config);
        let ramp: Vec<f32> = (0..100).map(|i| i as f32).collect();
        analyser.push(&ramp, &ramp);
        analyser.publish();

        let mut time = vec![0.0; 64];
        analyser.readout().copy_time(&mut time);
        let expected: Vec<f32> = (36..100).map(|i| i as f32).collect();
        assert_eq!(time, expected);
    }

    #[test]
    fn test_config_is_sanitized() {
        let analyser = Analyser::new(AnalyserConfig {
            fft_size: 4,
            smoothing: 3.0,
            ..AnalyserConfig::default()
        });
        assert_eq!(analyser.config().fft_size, 32);
        assert_eq!(analyser.config().smoothing, 0.99);
        assert_eq!(analyser.readout().time_len(), 32);
    }
}
