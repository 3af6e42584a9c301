//! Window functions for spectral analysis

use std::f32::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Rectangular (no windowing)
    Rectangular,
    /// Hann window (raised cosine)
    Hann,
    /// Classic Blackman window (a0 = 0.42)
    Blackman,
}

impl Window {
    /// Window value at position `i` of an `n`-point window.
    #[inline]
    pub fn value(&self, i: usize, n: usize) -> f32 {
        let x = 2.0 * PI * i as f32 / n as f32;
        match self {
            Window::Rectangular => 1.0,
            Window::Hann => 0.5 * (1.0 - x.cos()),
            Window::Blackman => 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos(),
        }
    }

    /// Apply window to a buffer
    pub fn apply(&self, buffer: &mut [f32]) {
        let n = buffer.len();
        for (i, sample) in buffer.iter_mut().enumerate() {
            *sample *= self.value(i, n);
        }
    }

    /// Get window coefficients
    pub fn coefficients(&self, size: usize) -> Vec<f32> {
        (0..size).map(|i| self.value(i, size)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blackman_shape() {
        let coeffs = Window::Blackman.coefficients(2048);
        assert!(coeffs[0].abs() < 1e-6);
        assert!((coeffs[1024] - 1.0).abs() < 1e-5);
        assert!(coeffs.iter().all(|&w| (-1e-6..=1.0 + 1e-6).contains(&w)));
    }

    #[test]
    fn test_window_symmetry() {
        for window in [Window::Hann, Window::Blackman] {
            let coeffs = window.coefficients(512);
            for i in 1..256 {
                assert!((coeffs[i] - coeffs[512 - i]).abs() < 1e-5, "{window:?} at {i}");
            }
        }
    }

    #[test]
    fn test_apply_matches_coefficients() {
        let mut buffer = vec![2.0; 64];
        Window::Hann.apply(&mut buffer);
        let coeffs = Window::Hann.coefficients(64);
        for (b, c) in buffer.iter().zip(&coeffs) {
            assert!((b - 2.0 * c).abs() < 1e-6);
        }
        let mut flat = vec![0.5; 8];
        Window::Rectangular.apply(&mut flat);
        assert_eq!(flat, vec![0.5; 8]);
    }
}
