//! Uniformly partitioned FFT convolution (overlap-save).
//!
//! The impulse response is split into [`PARTITION_SIZE`]-sample partitions,
//! each transformed once into a [`ConvolutionKernel`] on the control side.
//! The render side keeps a frequency-domain delay line of past input
//! spectra and, once per partition, multiplies and accumulates it against
//! the active kernel. Nothing is allocated after [`Convolver::new`].
//!
//! ```text
//! input ──► [prev | cur] ──FFT──► FDL ──Σ X[n-p]·H[p]──IFFT──► last half ──► output
//! ```
//!
//! Latency is one partition.

use std::sync::Arc;

use lustre_core::Effect;
use rustfft::{Fft, FftPlanner, num_complex::Complex};

/// Partition length in samples.
pub const PARTITION_SIZE: usize = 512;

const FFT_SIZE: usize = PARTITION_SIZE * 2;

/// Non-redundant bins of a real signal's spectrum.
const BINS: usize = PARTITION_SIZE + 1;

/// Level calibration applied to normalized kernels.
const GAIN_CALIBRATION: f32 = 0.00125;
const GAIN_CALIBRATION_SAMPLE_RATE: f32 = 44100.0;
/// Floor for the response RMS so near-silent responses stay bounded.
const MIN_POWER: f32 = 0.000125;

/// A stereo impulse response in partitioned spectral form.
#[derive(Debug, Clone)]
pub struct ConvolutionKernel {
    /// Per channel, `partitions * BINS` spectra laid out partition-major.
    spectra: [Vec<Complex<f32>>; 2],
    partitions: usize,
    length: usize,
}

impl ConvolutionKernel {
    /// Transform a stereo impulse response.
    ///
    /// With `normalize` set, the response is scaled by
    /// `0.00125 / rms * (44100 / sample_rate)`, so responses of different
    /// length and density land at comparable loudness. Channels of
    /// different length are zero-padded to the longer one.
    pub fn new(left: &[f32], right: &[f32], sample_rate: f32, normalize: bool) -> Self {
        let length = left.len().max(right.len());
        let partitions = length.div_ceil(PARTITION_SIZE);
        let scale = if normalize {
            normalization_scale(left, right, sample_rate)
        } else {
            1.0
        };

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);
        let mut frame = vec![Complex::new(0.0, 0.0); FFT_SIZE];

        let spectra = [left, right].map(|channel| {
            let mut spectrum = Vec::with_capacity(partitions * BINS);
            for p in 0..partitions {
                frame.fill(Complex::new(0.0, 0.0));
                let start = p * PARTITION_SIZE;
                let end = (start + PARTITION_SIZE).min(channel.len());
                if start < end {
                    for (slot, &h) in frame.iter_mut().zip(&channel[start..end]) {
                        *slot = Complex::new(h * scale, 0.0);
                    }
                }
                fft.process(&mut frame);
                spectrum.extend_from_slice(&frame[..BINS]);
            }
            spectrum
        });

        Self {
            spectra,
            partitions,
            length,
        }
    }

    /// Number of partitions.
    pub fn partitions(&self) -> usize {
        self.partitions
    }

    /// Length of the impulse response in samples.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether the response is empty (convolves to silence).
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Scale factor for energy-normalizing a stereo response.
pub fn normalization_scale(left: &[f32], right: &[f32], sample_rate: f32) -> f32 {
    let length = left.len().max(right.len());
    if length == 0 {
        return 1.0;
    }
    let energy: f32 = left.iter().chain(right).map(|&x| x * x).sum();
    let power = (energy / (2 * length) as f32).sqrt().max(MIN_POWER);
    GAIN_CALIBRATION / power * (GAIN_CALIBRATION_SAMPLE_RATE / sample_rate)
}

/// Per-channel streaming state.
#[derive(Debug, Clone)]
struct ChannelState {
    /// Previous partition followed by the one being filled.
    input: Vec<f32>,
    /// Frequency-domain delay line, `max_partitions * BINS`.
    fdl: Vec<Complex<f32>>,
    /// Output of the last completed partition.
    output: Vec<f32>,
}

impl ChannelState {
    fn new(max_partitions: usize) -> Self {
        Self {
            input: vec![0.0; FFT_SIZE],
            fdl: vec![Complex::new(0.0, 0.0); max_partitions * BINS],
            output: vec![0.0; PARTITION_SIZE],
        }
    }

    fn clear(&mut self) {
        self.input.fill(0.0);
        self.fdl.fill(Complex::new(0.0, 0.0));
        self.output.fill(0.0);
    }
}

/// Stereo convolver over a fixed bank of kernels.
///
/// Each channel is convolved with the matching channel of the active
/// kernel. Switching kernels clears the history so no tail of the old
/// response bleeds into the new one.
pub struct Convolver {
    bank: Vec<ConvolutionKernel>,
    active: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    work: Vec<Complex<f32>>,
    accum: Vec<Complex<f32>>,
    channels: [ChannelState; 2],
    /// FDL slot holding the newest input spectrum.
    head: usize,
    max_partitions: usize,
    /// Samples written into the current partition.
    fill: usize,
}

impl std::fmt::Debug for Convolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Convolver")
            .field("kernels", &self.bank.len())
            .field("active", &self.active)
            .field("max_partitions", &self.max_partitions)
            .finish_non_exhaustive()
    }
}

impl Convolver {
    /// Create a convolver over `bank`, sized for its longest kernel.
    ///
    /// Kernel 0 is active initially. An empty bank produces silence.
    pub fn new(bank: Vec<ConvolutionKernel>) -> Self {
        let max_partitions = bank.iter().map(ConvolutionKernel::partitions).max().unwrap_or(0).max(1);

        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(FFT_SIZE);
        let inverse = planner.plan_fft_inverse(FFT_SIZE);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        Self {
            bank,
            active: 0,
            forward,
            inverse,
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            work: vec![Complex::new(0.0, 0.0); FFT_SIZE],
            accum: vec![Complex::new(0.0, 0.0); FFT_SIZE],
            channels: [ChannelState::new(max_partitions), ChannelState::new(max_partitions)],
            head: 0,
            max_partitions,
            fill: 0,
        }
    }

    /// Make kernel `index` active. Out-of-range indices are ignored.
    ///
    /// Changing kernels clears the convolution history.
    pub fn select(&mut self, index: usize) {
        if index != self.active && index < self.bank.len() {
            self.active = index;
            self.reset();
        }
    }

    /// Index of the active kernel.
    pub fn active(&self) -> usize {
        self.active
    }

    /// Number of kernels in the bank.
    pub fn kernel_count(&self) -> usize {
        self.bank.len()
    }

    fn process_partition(&mut self) {
        let Some(kernel) = self.bank.get(self.active) else {
            for channel in &mut self.channels {
                channel.output.fill(0.0);
                channel.input.copy_within(PARTITION_SIZE.., 0);
            }
            return;
        };

        let slots = self.max_partitions;
        let head = self.head;
        let norm = 1.0 / FFT_SIZE as f32;

        for (channel, spectrum) in self.channels.iter_mut().zip(&kernel.spectra) {
            for (w, &x) in self.work.iter_mut().zip(&channel.input) {
                *w = Complex::new(x, 0.0);
            }
            self.forward
                .process_with_scratch(&mut self.work, &mut self.scratch);
            channel.fdl[head * BINS..(head + 1) * BINS].copy_from_slice(&self.work[..BINS]);

            self.accum.fill(Complex::new(0.0, 0.0));
            for p in 0..kernel.partitions {
                let slot = (head + slots - p) % slots;
                let x = &channel.fdl[slot * BINS..(slot + 1) * BINS];
                let h = &spectrum[p * BINS..(p + 1) * BINS];
                for ((acc, &xv), &hv) in self.accum[..BINS].iter_mut().zip(x).zip(h) {
                    *acc += xv * hv;
                }
            }
            // Hermitian mirror for a real time-domain result
            for b in 1..PARTITION_SIZE {
                self.accum[FFT_SIZE - b] = self.accum[b].conj();
            }
            self.inverse
                .process_with_scratch(&mut self.accum, &mut self.scratch);

            for (out, y) in channel.output.iter_mut().zip(&self.accum[PARTITION_SIZE..]) {
                *out = y.re * norm;
            }
            channel.input.copy_within(PARTITION_SIZE.., 0);
        }

        self.head = (head + 1) % slots;
    }
}

impl Effect for Convolver {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let i = self.fill;
        let [l, r] = &mut self.channels;
        l.input[PARTITION_SIZE + i] = left;
        r.input[PARTITION_SIZE + i] = right;
        let out = (l.output[i], r.output[i]);

        self.fill += 1;
        if self.fill == PARTITION_SIZE {
            self.fill = 0;
            self.process_partition();
        }
        out
    }

    /// Kernels are built for a fixed rate; nothing to recompute here.
    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    fn reset(&mut self) {
        for channel in &mut self.channels {
            channel.clear();
        }
        self.head = 0;
        self.fill = 0;
    }

    fn latency_samples(&self) -> usize {
        PARTITION_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(conv: &mut Convolver, left: &[f32], right: &[f32]) -> (Vec<f32>, Vec<f32>) {
        left.iter()
            .zip(right)
            .map(|(&l, &r)| conv.process_stereo(l, r))
            .unzip()
    }

    fn direct(input: &[f32], ir: &[f32]) -> Vec<f32> {
        (0..input.len())
            .map(|n| {
                ir.iter()
                    .enumerate()
                    .filter(|&(k, _)| k <= n)
                    .map(|(k, &h)| h * input[n - k])
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_identity_kernel_delays_by_one_partition() {
        let kernel = ConvolutionKernel::new(&[1.0], &[1.0], 48000.0, false);
        let mut conv = Convolver::new(vec![kernel]);

        let input: Vec<f32> = (0..2048).map(|i| libm::sinf(i as f32 * 0.02)).collect();
        let (left, right) = run(&mut conv, &input, &input);

        for n in 0..input.len() {
            let expected = if n >= PARTITION_SIZE { input[n - PARTITION_SIZE] } else { 0.0 };
            assert!((left[n] - expected).abs() < 1e-4, "left {n}: {} vs {}", left[n], expected);
            assert!((right[n] - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_matches_direct_convolution() {
        let ir_left: Vec<f32> = (0..1300).map(|i| libm::expf(-(i as f32) / 200.0) * libm::cosf(i as f32 * 0.3)).collect();
        let ir_right: Vec<f32> = (0..700).map(|i| if i % 97 == 0 { 0.5 } else { 0.0 }).collect();
        let kernel = ConvolutionKernel::new(&ir_left, &ir_right, 48000.0, false);
        assert_eq!(kernel.partitions(), 3);
        assert_eq!(kernel.len(), 1300);

        let mut conv = Convolver::new(vec![kernel]);
        let input: Vec<f32> = (0..4096).map(|i| libm::sinf(i as f32 * 0.071) * 0.5).collect();
        let (left, right) = run(&mut conv, &input, &input);

        let expected_left = direct(&input, &ir_left);
        let expected_right = direct(&input, &ir_right);
        for n in PARTITION_SIZE..input.len() {
            let m = n - PARTITION_SIZE;
            assert!((left[n] - expected_left[m]).abs() < 1e-3, "left {m}: {} vs {}", left[n], expected_left[m]);
            assert!((right[n] - expected_right[m]).abs() < 1e-3, "right {m}");
        }
    }

    #[test]
    fn test_normalization_scale() {
        // Constant unit response: rms 1
        let ones = vec![1.0; 1000];
        let scale = normalization_scale(&ones, &ones, 44100.0);
        assert!((scale - GAIN_CALIBRATION).abs() < 1e-9);

        let halves = vec![0.5; 1000];
        let scale = normalization_scale(&halves, &halves, 88200.0);
        assert!((scale - GAIN_CALIBRATION).abs() < 1e-9);

        assert_eq!(normalization_scale(&[], &[], 48000.0), 1.0);
    }

    #[test]
    fn test_select_switches_and_clears() {
        let a = ConvolutionKernel::new(&[1.0], &[1.0], 48000.0, false);
        let b = ConvolutionKernel::new(&[0.5], &[0.5], 48000.0, false);
        let mut conv = Convolver::new(vec![a, b]);

        let ones = vec![1.0; PARTITION_SIZE * 2];
        let (left, _) = run(&mut conv, &ones, &ones);
        assert!((left[PARTITION_SIZE + 10] - 1.0).abs() < 1e-4);

        conv.select(1);
        assert_eq!(conv.active(), 1);
        // History cleared: the first partition after a switch is silent
        let (left, _) = run(&mut conv, &ones, &ones);
        assert!(left[..PARTITION_SIZE].iter().all(|&x| x.abs() < 1e-6));
        assert!((left[PARTITION_SIZE + 10] - 0.5).abs() < 1e-4);

        conv.select(7);
        assert_eq!(conv.active(), 1);
    }

    #[test]
    fn test_empty_bank_is_silent() {
        let mut conv = Convolver::new(Vec::new());
        for _ in 0..2000 {
            assert_eq!(conv.process_stereo(1.0, -1.0), (0.0, 0.0));
        }
        assert_eq!(conv.latency_samples(), PARTITION_SIZE);
    }
}
