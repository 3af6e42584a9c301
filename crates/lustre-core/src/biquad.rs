//! Biquad (bi-quadratic) filter structure.
//!
//! Provides a generic second-order IIR filter plus the coefficient
//! formulas the enhancement stages need: low-pass and high-pass taps,
//! peaking bands, and low/high shelves.
//!
//! Coefficient calculation uses the RBJ Audio EQ Cookbook formulas.

use core::f32::consts::PI;
use libm::{cosf, powf, sinf, sqrtf};

/// Unnormalized biquad coefficients: `(b0, b1, b2, a0, a1, a2)`.
pub type Coefficients = (f32, f32, f32, f32, f32, f32);

/// Generic biquad filter coefficients and state.
///
/// Implements the Direct Form I biquad structure:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients.
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Creates a biquad from a coefficient tuple.
    pub fn from_coefficients(coeffs: Coefficients) -> Self {
        let mut biquad = Self::new();
        biquad.apply(coeffs);
        biquad
    }

    /// Sets the biquad coefficients, normalizing by `a0`.
    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }

    /// Tuple form of [`set_coefficients`](Self::set_coefficients).
    ///
    /// Filter state is kept, so coefficient updates between render blocks
    /// do not restart the filter.
    pub fn apply(&mut self, coeffs: Coefficients) {
        let (b0, b1, b2, a0, a1, a2) = coeffs;
        self.set_coefficients(b0, b1, b2, a0, a1, a2);
    }

    /// Processes a single sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = crate::flush_denormal(output);

        output
    }

    /// Clears the filter history without touching coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    /// Magnitude response at `frequency`, as a linear factor.
    ///
    /// Evaluates `|H(e^jw)|` directly from the normalized coefficients.
    pub fn magnitude_at(&self, frequency: f32, sample_rate: f32) -> f32 {
        let w = 2.0 * PI * frequency / sample_rate;
        let (c1, s1) = (cosf(w), sinf(w));
        let (c2, s2) = (cosf(2.0 * w), sinf(2.0 * w));

        let num_re = self.b0 + self.b1 * c1 + self.b2 * c2;
        let num_im = -(self.b1 * s1 + self.b2 * s2);
        let den_re = 1.0 + self.a1 * c1 + self.a2 * c2;
        let den_im = -(self.a1 * s1 + self.a2 * s2);

        sqrtf((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im))
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// Corner frequencies are kept below Nyquist so low render rates stay stable.
#[inline]
fn omega(frequency: f32, sample_rate: f32) -> (f32, f32) {
    let w = 2.0 * PI * frequency.min(sample_rate * 0.49) / sample_rate;
    (cosf(w), sinf(w))
}

/// Low-pass coefficients (RBJ cookbook).
///
/// * `frequency` - Cutoff in Hz
/// * `q` - Q factor (0.707 for Butterworth)
pub fn lowpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (cos_w, sin_w) = omega(frequency, sample_rate);
    let alpha = sin_w / (2.0 * q);

    let b1 = 1.0 - cos_w;
    (b1 / 2.0, b1, b1 / 2.0, 1.0 + alpha, -2.0 * cos_w, 1.0 - alpha)
}

/// High-pass coefficients (RBJ cookbook).
pub fn highpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (cos_w, sin_w) = omega(frequency, sample_rate);
    let alpha = sin_w / (2.0 * q);

    let b0 = (1.0 + cos_w) / 2.0;
    (b0, -(1.0 + cos_w), b0, 1.0 + alpha, -2.0 * cos_w, 1.0 - alpha)
}

/// Peaking EQ coefficients: boost or cut around `frequency`.
///
/// At `gain_db == 0.0` numerator and denominator are identical, so the
/// filter is transparent.
pub fn peaking_eq_coefficients(frequency: f32, q: f32, gain_db: f32, sample_rate: f32) -> Coefficients {
    let a = powf(10.0, gain_db / 40.0);
    let (cos_w, sin_w) = omega(frequency, sample_rate);
    let alpha = sin_w / (2.0 * q);

    (
        1.0 + alpha * a,
        -2.0 * cos_w,
        1.0 - alpha * a,
        1.0 + alpha / a,
        -2.0 * cos_w,
        1.0 - alpha / a,
    )
}

/// Low-shelf coefficients: everything below `frequency` moves by `gain_db`.
///
/// `q` of 0.707 gives the cookbook's unit shelf slope.
pub fn low_shelf_coefficients(frequency: f32, q: f32, gain_db: f32, sample_rate: f32) -> Coefficients {
    let a = powf(10.0, gain_db / 40.0);
    let (cos_w, sin_w) = omega(frequency, sample_rate);
    let two_sqrt_a_alpha = 2.0 * sqrtf(a) * sin_w / (2.0 * q);

    (
        a * ((a + 1.0) - (a - 1.0) * cos_w + two_sqrt_a_alpha),
        2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w),
        a * ((a + 1.0) - (a - 1.0) * cos_w - two_sqrt_a_alpha),
        (a + 1.0) + (a - 1.0) * cos_w + two_sqrt_a_alpha,
        -2.0 * ((a - 1.0) + (a + 1.0) * cos_w),
        (a + 1.0) + (a - 1.0) * cos_w - two_sqrt_a_alpha,
    )
}

/// High-shelf coefficients: everything above `frequency` moves by `gain_db`.
pub fn high_shelf_coefficients(frequency: f32, q: f32, gain_db: f32, sample_rate: f32) -> Coefficients {
    let a = powf(10.0, gain_db / 40.0);
    let (cos_w, sin_w) = omega(frequency, sample_rate);
    let two_sqrt_a_alpha = 2.0 * sqrtf(a) * sin_w / (2.0 * q);

    (
        a * ((a + 1.0) + (a - 1.0) * cos_w + two_sqrt_a_alpha),
        -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w),
        a * ((a + 1.0) + (a - 1.0) * cos_w - two_sqrt_a_alpha),
        (a + 1.0) - (a - 1.0) * cos_w + two_sqrt_a_alpha,
        2.0 * ((a - 1.0) - (a + 1.0) * cos_w),
        (a + 1.0) - (a - 1.0) * cos_w - two_sqrt_a_alpha,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear_to_db;

    const SR: f32 = 48000.0;

    #[test]
    fn test_biquad_passthrough() {
        let mut biquad = Biquad::new();
        for i in 0..10 {
            let input = i as f32 * 0.1;
            assert!((biquad.process(input) - input).abs() < 1e-6);
        }
    }

    #[test]
    fn test_biquad_clear() {
        let mut biquad = Biquad::from_coefficients(lowpass_coefficients(500.0, 0.707, SR));
        for _ in 0..10 {
            biquad.process(1.0);
        }
        biquad.clear();
        assert_eq!(biquad.x1, 0.0);
        assert_eq!(biquad.y1, 0.0);
    }

    #[test]
    fn test_lowpass_passes_dc() {
        let mut biquad = Biquad::from_coefficients(lowpass_coefficients(80.0, 0.707, SR));
        let mut output = 0.0;
        for _ in 0..20000 {
            output = biquad.process(1.0);
        }
        assert!((output - 1.0).abs() < 0.01, "got {output}");
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let mut biquad = Biquad::from_coefficients(highpass_coefficients(12000.0, 0.707, SR));
        let mut output = 1.0;
        for _ in 0..2000 {
            output = biquad.process(1.0);
        }
        assert!(output.abs() < 1e-3, "got {output}");
    }

    #[test]
    fn test_zero_gain_filters_are_flat() {
        let shapes = [
            peaking_eq_coefficients(3000.0, 1.5, 0.0, SR),
            low_shelf_coefficients(200.0, 0.707, 0.0, SR),
            high_shelf_coefficients(8000.0, 0.707, 0.0, SR),
        ];
        for coeffs in shapes {
            let biquad = Biquad::from_coefficients(coeffs);
            for freq in [50.0, 200.0, 1000.0, 3000.0, 8000.0, 15000.0] {
                let mag = biquad.magnitude_at(freq, SR);
                assert!((mag - 1.0).abs() < 1e-4, "{freq} Hz: {mag}");
            }
        }
    }

    #[test]
    fn test_peaking_gain_at_center() {
        let biquad = Biquad::from_coefficients(peaking_eq_coefficients(3000.0, 1.5, 6.0, SR));
        let gain_db = linear_to_db(biquad.magnitude_at(3000.0, SR));
        assert!((gain_db - 6.0).abs() < 0.05, "got {gain_db}");
    }

    #[test]
    fn test_low_shelf_boosts_lows_only() {
        let biquad = Biquad::from_coefficients(low_shelf_coefficients(200.0, 0.707, 4.0, SR));
        let low = linear_to_db(biquad.magnitude_at(20.0, SR));
        let high = linear_to_db(biquad.magnitude_at(10000.0, SR));
        assert!((low - 4.0).abs() < 0.1, "low shelf: {low}");
        assert!(high.abs() < 0.1, "above shelf: {high}");
    }

    #[test]
    fn test_high_shelf_boosts_highs_only() {
        let biquad = Biquad::from_coefficients(high_shelf_coefficients(8000.0, 0.707, -3.0, SR));
        let low = linear_to_db(biquad.magnitude_at(100.0, SR));
        let high = linear_to_db(biquad.magnitude_at(20000.0, SR));
        assert!(low.abs() < 0.1, "below shelf: {low}");
        assert!((high + 3.0).abs() < 0.2, "high shelf: {high}");
    }
}
