//! Brickwall peak limiter with instant attack and exponential release.
//!
//! The last node of the dynamics stage. Peak detection uses the current
//! frame, so gain reduction lands on the very sample that would overshoot
//! and no lookahead latency is added.
//!
//! # Algorithm
//!
//! 1. Peak = `max(|L|, |R|)` (linked stereo).
//! 2. Target gain = `ceiling / peak` when the peak exceeds the ceiling,
//!    otherwise `1.0`.
//! 3. Gain follows the target down instantly and recovers with a one-pole
//!    release: `g[n] = c * g[n-1] + (1 - c) * target`.
//! 4. A final clamp to `±ceiling` catches rounding residue.

use libm::expf;
use lustre_core::{Effect, db_to_linear};

/// Default release time in milliseconds.
pub const DEFAULT_RELEASE_MS: f32 = 50.0;

/// Brickwall limiter.
///
/// # Example
///
/// ```rust
/// use lustre_core::Effect;
/// use lustre_effects::Limiter;
///
/// let mut lim = Limiter::new(48000.0);
/// lim.set_ceiling_db(-6.0);
///
/// let (left, _) = lim.process_stereo(1.0, 0.2);
/// assert!(left <= 0.502);
/// ```
#[derive(Debug, Clone)]
pub struct Limiter {
    sample_rate: f32,
    ceiling_db: f32,
    /// Linear ceiling, cached from `ceiling_db`
    ceiling: f32,
    release_ms: f32,
    /// `exp(-1 / (release_ms * sr / 1000))`
    release_coeff: f32,
    /// Current gain (linear, 1.0 = no reduction)
    gain: f32,
}

impl Limiter {
    /// Create a limiter with a 0 dB ceiling and 50 ms release.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            ceiling_db: 0.0,
            ceiling: 1.0,
            release_ms: DEFAULT_RELEASE_MS,
            release_coeff: compute_release_coeff(DEFAULT_RELEASE_MS, sample_rate),
            gain: 1.0,
        }
    }

    /// Set the ceiling (and threshold) in dB. Range: -60 to 0 dB.
    pub fn set_ceiling_db(&mut self, db: f32) {
        self.ceiling_db = db.clamp(-60.0, 0.0);
        self.ceiling = db_to_linear(self.ceiling_db);
    }

    /// Ceiling in dB.
    pub fn ceiling_db(&self) -> f32 {
        self.ceiling_db
    }

    /// Set the release time in milliseconds. Range: 1 to 1000 ms.
    pub fn set_release_ms(&mut self, ms: f32) {
        self.release_ms = ms.clamp(1.0, 1000.0);
        self.release_coeff = compute_release_coeff(self.release_ms, self.sample_rate);
    }

    /// Current gain reduction in dB (always non-positive).
    pub fn gain_reduction_db(&self) -> f32 {
        lustre_core::linear_to_db(self.gain)
    }
}

impl Effect for Limiter {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let peak = left.abs().max(right.abs());
        let target = if peak > self.ceiling {
            self.ceiling / peak
        } else {
            1.0
        };

        self.gain = if target < self.gain {
            target
        } else {
            let released = self.release_coeff * self.gain + (1.0 - self.release_coeff) * target;
            // Land on unity instead of creeping towards it forever.
            if 1.0 - released < 1e-6 { 1.0 } else { released }
        };

        let ceiling = self.ceiling;
        (
            (left * self.gain).clamp(-ceiling, ceiling),
            (right * self.gain).clamp(-ceiling, ceiling),
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.release_coeff = compute_release_coeff(self.release_ms, sample_rate);
    }

    fn reset(&mut self) {
        self.gain = 1.0;
    }
}

#[inline]
fn compute_release_coeff(release_ms: f32, sample_rate: f32) -> f32 {
    expf(-1.0 / (release_ms * sample_rate / 1000.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_exceeds_ceiling() {
        let mut lim = Limiter::new(48000.0);
        lim.set_ceiling_db(-1.0);
        let ceiling = db_to_linear(-1.0);

        for i in 0..48000 {
            let x = libm::sinf(i as f32 * 0.01) * 3.0;
            let (l, r) = lim.process_stereo(x, -0.5 * x);
            assert!(l.abs() <= ceiling, "sample {i}: {l}");
            assert!(r.abs() <= ceiling, "sample {i}: {r}");
        }
    }

    #[test]
    fn test_quiet_signal_passes_untouched() {
        let mut lim = Limiter::new(48000.0);
        lim.set_ceiling_db(-1.0);
        for i in 0..1000 {
            let x = libm::sinf(i as f32 * 0.05) * 0.5;
            assert_eq!(lim.process_stereo(x, x), (x, x));
        }
    }

    #[test]
    fn test_release_recovers() {
        let mut lim = Limiter::new(48000.0);
        lim.set_ceiling_db(-6.0);
        lim.process_stereo(1.0, 1.0);
        assert!(lim.gain_reduction_db() < -5.0);

        // 1 s of silence is 20 release time constants
        for _ in 0..48000 {
            lim.process_stereo(0.0, 0.0);
        }
        assert_eq!(lim.gain_reduction_db(), 0.0);
    }

    #[test]
    fn test_ceiling_clamped_to_range() {
        let mut lim = Limiter::new(48000.0);
        lim.set_ceiling_db(3.0);
        assert_eq!(lim.ceiling_db(), 0.0);
        lim.set_ceiling_db(-100.0);
        assert_eq!(lim.ceiling_db(), -60.0);
    }
}
