//! Parameter smoothing for zipper-free gain changes.
//!
//! Every gain the renderer applies per sample goes through a
//! [`SmoothedParam`]: the control side publishes a new target, the render
//! side glides towards it with a one-pole lowpass.
//!
//! ```rust
//! use lustre_core::SmoothedParam;
//!
//! let mut gain = SmoothedParam::standard(1.0, 48000.0);
//! gain.set_target(0.5);
//!
//! for _ in 0..480 {
//!     let g = gain.advance();
//!     assert!(g <= 1.0 && g >= 0.5);
//! }
//! ```

use libm::expf;

/// Distance below which a smoothed value lands exactly on its target.
const SNAP_EPSILON: f32 = 1e-6;

/// A parameter with built-in exponential smoothing.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    /// Current smoothed value
    current: f32,
    /// Target value we're smoothing towards
    target: f32,
    /// Smoothing coefficient (1 = instant)
    coeff: f32,
    sample_rate: f32,
    smoothing_time_ms: f32,
}

impl SmoothedParam {
    /// Default smoothing time for gains, in milliseconds.
    pub const STANDARD_MS: f32 = 10.0;

    /// Create a parameter with no smoothing (changes apply instantly).
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate: 48000.0,
            smoothing_time_ms: 0.0,
        }
    }

    /// Create a parameter with full configuration.
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self::new(initial);
        param.sample_rate = sample_rate;
        param.smoothing_time_ms = smoothing_time_ms;
        param.recalculate_coeff();
        param
    }

    /// Create a parameter with the 10 ms gain smoothing used by every stage.
    pub fn standard(initial: f32, sample_rate: f32) -> Self {
        Self::with_config(initial, sample_rate, Self::STANDARD_MS)
    }

    /// Set the target value (the parameter glides towards it).
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Set target and snap to it.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Update sample rate and recalculate the coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Set smoothing time in milliseconds (0 = instant).
    pub fn set_smoothing_time_ms(&mut self, time_ms: f32) {
        self.smoothing_time_ms = time_ms;
        self.recalculate_coeff();
    }

    /// Get the next smoothed value (advances by one sample).
    ///
    /// Once within `1e-6` of the target, or once the step no longer moves
    /// the value in `f32`, the value lands exactly on the target. A settled
    /// unity gain therefore multiplies by exactly `1.0`.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let diff = self.target - self.current;
        let next = self.current + self.coeff * diff;
        if diff.abs() < SNAP_EPSILON || next == self.current {
            self.current = self.target;
        } else {
            self.current = next;
        }
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether the value has reached its target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Skip ahead to the target value.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    /// `coeff = 1 - exp(-1 / (tau * sample_rate))`, with `tau` the
    /// smoothing time in seconds. After 5 tau the value is within 0.7%.
    fn recalculate_coeff(&mut self) {
        if self.smoothing_time_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0;
        } else {
            let samples = self.smoothing_time_ms / 1000.0 * self.sample_rate;
            self.coeff = 1.0 - expf(-1.0 / samples);
        }
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothed_param_instant_when_no_smoothing() {
        let mut param = SmoothedParam::new(1.0);
        param.set_target(0.5);
        assert_eq!(param.advance(), 0.5, "should snap instantly");
    }

    #[test]
    fn smoothed_param_gradual_approach() {
        let mut param = SmoothedParam::standard(0.0, 48000.0);
        param.set_target(1.0);

        for _ in 0..480 {
            param.advance();
        }

        let expected = 1.0 - expf(-1.0);
        assert!(
            (param.get() - expected).abs() < 0.05,
            "after one time constant expected ~{}, got {}",
            expected,
            param.get()
        );
    }

    #[test]
    fn smoothed_param_lands_exactly_on_target() {
        let mut param = SmoothedParam::standard(0.0, 48000.0);
        param.set_target(1.0);

        // ~14 ln(10) time constants bring the gap under 1e-6
        for _ in 0..48000 {
            param.advance();
        }

        assert!(param.is_settled());
        assert_eq!(param.get(), 1.0);
    }

    #[test]
    fn smoothed_param_never_overshoots() {
        let mut param = SmoothedParam::standard(1.0, 44100.0);
        param.set_target(0.25);
        let mut previous = param.get();
        for _ in 0..4410 {
            let value = param.advance();
            assert!(value <= previous && value >= 0.25);
            previous = value;
        }
    }

    #[test]
    fn set_immediate_skips_smoothing() {
        let mut param = SmoothedParam::standard(0.0, 48000.0);
        param.set_immediate(0.7);
        assert_eq!(param.get(), 0.7);
        assert_eq!(param.target(), 0.7);
        assert_eq!(param.advance(), 0.7);
    }
}
