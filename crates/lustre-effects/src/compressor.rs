//! Dynamics compressor with soft-knee characteristics.
//!
//! A feed-forward compressor with linked stereo detection. Used twice in
//! the chain: as the fast transient tap of the harmonic stage and as the
//! main bus compressor of the dynamics stage.
//!
//! # Signal Flow
//!
//! ```text
//! Input → Envelope Follower → Gain Computer → Gain Reduction → Output
//!                                    ↓
//!                              Makeup Gain
//! ```
//!
//! # Parameters
//!
//! | Parameter | Range | Description |
//! |-----------|-------|-------------|
//! | Threshold | -60 to 0 dB | Level where compression begins |
//! | Ratio | 1:1 to 20:1 | Compression strength |
//! | Attack | 0.1-100 ms | How fast gain reduction engages |
//! | Release | 10-1000 ms | How fast gain reduction releases |
//! | Knee | 0-12 dB | Width of the soft transition |
//! | Makeup | 0-4 linear | Output level compensation |

use lustre_core::{Effect, EnvelopeFollower, SmoothedParam, db_to_linear, linear_to_db};

/// Gain computer for the static compression curve.
#[derive(Debug, Clone)]
struct GainComputer {
    threshold_db: f32,
    ratio: f32,
    knee_db: f32,
}

impl GainComputer {
    fn new() -> Self {
        Self {
            threshold_db: -18.0,
            ratio: 4.0,
            knee_db: 6.0,
        }
    }

    /// Gain change in dB (always non-positive) for a detector level.
    #[inline]
    fn compute_gain_db(&self, input_db: f32) -> f32 {
        let overshoot = input_db - self.threshold_db;
        let slope = 1.0 - 1.0 / self.ratio;

        if overshoot <= -self.knee_db / 2.0 {
            0.0
        } else if overshoot > self.knee_db / 2.0 {
            -(overshoot * slope)
        } else {
            let knee_factor = (overshoot + self.knee_db / 2.0) / self.knee_db;
            -(knee_factor * knee_factor * overshoot * slope)
        }
    }
}

/// Dynamics compressor.
///
/// # Example
///
/// ```rust
/// use lustre_core::Effect;
/// use lustre_effects::Compressor;
///
/// let mut comp = Compressor::new(48000.0);
/// comp.set_threshold_db(-20.0);
/// comp.set_ratio(4.0);
/// comp.set_attack_ms(5.0);
/// comp.set_release_ms(50.0);
///
/// let (left, right) = comp.process_stereo(0.5, 0.5);
/// assert!(left.is_finite() && right.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct Compressor {
    envelope_follower: EnvelopeFollower,
    gain_computer: GainComputer,
    makeup_gain: SmoothedParam,
    /// Last computed gain reduction in dB (always non-positive).
    last_gain_reduction_db: f32,
}

impl Compressor {
    /// Create a compressor: -18 dB, 4:1, 10 ms / 100 ms, 6 dB knee, unity makeup.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            envelope_follower: EnvelopeFollower::new(sample_rate),
            gain_computer: GainComputer::new(),
            makeup_gain: SmoothedParam::standard(1.0, sample_rate),
            last_gain_reduction_db: 0.0,
        }
    }

    /// Set threshold in dB.
    pub fn set_threshold_db(&mut self, threshold_db: f32) {
        self.gain_computer.threshold_db = threshold_db.clamp(-60.0, 0.0);
    }

    /// Threshold in dB.
    pub fn threshold_db(&self) -> f32 {
        self.gain_computer.threshold_db
    }

    /// Set compression ratio. `1.0` disables compression.
    pub fn set_ratio(&mut self, ratio: f32) {
        self.gain_computer.ratio = ratio.clamp(1.0, 20.0);
    }

    /// Compression ratio.
    pub fn ratio(&self) -> f32 {
        self.gain_computer.ratio
    }

    /// Set attack time in milliseconds.
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        self.envelope_follower
            .set_attack_ms(attack_ms.clamp(0.1, 100.0));
    }

    /// Set release time in milliseconds.
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.envelope_follower
            .set_release_ms(release_ms.clamp(10.0, 1000.0));
    }

    /// Set knee width in dB.
    pub fn set_knee_db(&mut self, knee_db: f32) {
        self.gain_computer.knee_db = knee_db.clamp(0.0, 12.0);
    }

    /// Set makeup gain as a linear factor (smoothed).
    pub fn set_makeup(&mut self, makeup: f32) {
        self.makeup_gain.set_target(makeup.clamp(0.0, 4.0));
    }

    /// Target makeup gain (linear).
    pub fn makeup(&self) -> f32 {
        self.makeup_gain.target()
    }

    /// Last computed gain reduction in dB (always non-positive).
    pub fn gain_reduction_db(&self) -> f32 {
        self.last_gain_reduction_db
    }
}

impl Effect for Compressor {
    /// Linked stereo: the envelope follows the mid signal so both channels
    /// receive identical gain and the image does not shift.
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let mid = (left + right) * 0.5;
        let envelope = self.envelope_follower.process(mid);
        let gain_reduction_db = self.gain_computer.compute_gain_db(linear_to_db(envelope));
        self.last_gain_reduction_db = gain_reduction_db;

        let gain = if gain_reduction_db == 0.0 {
            self.makeup_gain.advance()
        } else {
            db_to_linear(gain_reduction_db) * self.makeup_gain.advance()
        };
        (left * gain, right * gain)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.envelope_follower.set_sample_rate(sample_rate);
        self.makeup_gain.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.envelope_follower.reset();
        self.makeup_gain.snap_to_target();
        self.last_gain_reduction_db = 0.0;
    }
}
