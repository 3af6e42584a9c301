//! Table-driven wave-shaper for gentle saturation.
//!
//! The transfer curve is sampled into a fixed table that spans the input
//! range `[-1, 1]`; lookups interpolate linearly and inputs outside the
//! range read the end points. The table is allocated once and rewritten in
//! place whenever the drive amount changes.

use lustre_core::Effect;

/// Number of points in the transfer table.
pub const CURVE_POINTS: usize = 1024;

/// Drive multiplier: `k = CURVE_DRIVE * amount`.
const CURVE_DRIVE: f32 = 50.0;

/// Soft saturation curve `y = (1 + k) x / (1 + k |x|)`.
///
/// `k = 0` is the identity; larger `k` bends harder towards `±1`.
#[inline]
pub fn saturation_curve(x: f32, k: f32) -> f32 {
    (1.0 + k) * x / (1.0 + k * x.abs())
}

/// Wave-shaper node.
///
/// # Example
///
/// ```rust
/// use lustre_core::Effect;
/// use lustre_effects::WaveShaper;
///
/// let mut shaper = WaveShaper::new();
/// shaper.set_amount(0.1);
///
/// let (left, _) = shaper.process_stereo(0.25, 0.25);
/// assert!(left > 0.25 && left < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct WaveShaper {
    curve: Vec<f32>,
    amount: f32,
}

impl WaveShaper {
    /// Create a wave-shaper with an identity curve.
    pub fn new() -> Self {
        let mut shaper = Self {
            curve: vec![0.0; CURVE_POINTS],
            amount: 0.0,
        };
        shaper.regenerate();
        shaper
    }

    /// Set the drive amount (`k = 50 * amount`).
    ///
    /// The table is only rewritten when the amount actually changes.
    pub fn set_amount(&mut self, amount: f32) {
        let amount = amount.max(0.0);
        if amount != self.amount {
            self.amount = amount;
            self.regenerate();
        }
    }

    /// Current drive amount.
    pub fn amount(&self) -> f32 {
        self.amount
    }

    /// The sampled transfer curve.
    pub fn curve(&self) -> &[f32] {
        &self.curve
    }

    fn regenerate(&mut self) {
        let k = CURVE_DRIVE * self.amount;
        let last = (CURVE_POINTS - 1) as f32;
        for (i, point) in self.curve.iter_mut().enumerate() {
            let x = i as f32 * 2.0 / last - 1.0;
            *point = saturation_curve(x, k);
        }
    }

    /// Map one sample through the table.
    #[inline]
    pub fn shape(&self, input: f32) -> f32 {
        let last = CURVE_POINTS - 1;
        let position = (input + 1.0) * 0.5 * last as f32;
        if position <= 0.0 {
            return self.curve[0];
        }
        if position >= last as f32 {
            return self.curve[last];
        }
        let index = position as usize;
        let frac = position - index as f32;
        let a = self.curve[index];
        let b = self.curve[index + 1];
        a + (b - a) * frac
    }
}

impl Default for WaveShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for WaveShaper {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        (self.shape(left), self.shape(right))
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    fn reset(&mut self) {}
}
