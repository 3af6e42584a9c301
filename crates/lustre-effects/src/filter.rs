//! Stereo biquad node with a selectable response shape.
//!
//! Every fixed-frequency band in the chain (shelves, peaks and the
//! harmonic stage's taps) is one of these: a pair of identical biquads
//! whose coefficients are recomputed only when gain actually changes.

use lustre_core::{
    Biquad, Coefficients, Effect, high_shelf_coefficients, highpass_coefficients,
    low_shelf_coefficients, lowpass_coefficients, peaking_eq_coefficients,
};

/// Response shape of a [`StereoFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterShape {
    /// Second-order low-pass
    Lowpass,
    /// Second-order high-pass
    Highpass,
    /// Bell boost/cut around the centre frequency
    Peaking,
    /// Boost/cut below the corner
    LowShelf,
    /// Boost/cut above the corner
    HighShelf,
}

impl FilterShape {
    /// Whether the shape has a gain control.
    pub fn has_gain(self) -> bool {
        matches!(self, Self::Peaking | Self::LowShelf | Self::HighShelf)
    }

    fn coefficients(self, frequency: f32, q: f32, gain_db: f32, sample_rate: f32) -> Coefficients {
        match self {
            Self::Lowpass => lowpass_coefficients(frequency, q, sample_rate),
            Self::Highpass => highpass_coefficients(frequency, q, sample_rate),
            Self::Peaking => peaking_eq_coefficients(frequency, q, gain_db, sample_rate),
            Self::LowShelf => low_shelf_coefficients(frequency, q, gain_db, sample_rate),
            Self::HighShelf => high_shelf_coefficients(frequency, q, gain_db, sample_rate),
        }
    }
}

/// Two biquads (left, right) sharing one design.
///
/// # Example
///
/// ```rust
/// use lustre_core::Effect;
/// use lustre_effects::{FilterShape, StereoFilter};
///
/// let mut body = StereoFilter::new(FilterShape::LowShelf, 150.0, 0.707, 48000.0);
/// body.set_gain_db(2.4);
///
/// let (left, right) = body.process_stereo(0.5, -0.5);
/// assert!(left.is_finite() && right.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct StereoFilter {
    shape: FilterShape,
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,
    left: Biquad,
    right: Biquad,
}

impl StereoFilter {
    /// Create a filter at 0 dB gain.
    ///
    /// The frequency is kept below Nyquist.
    pub fn new(shape: FilterShape, frequency: f32, q: f32, sample_rate: f32) -> Self {
        let mut filter = Self {
            shape,
            frequency,
            q: q.max(0.01),
            gain_db: 0.0,
            sample_rate,
            left: Biquad::new(),
            right: Biquad::new(),
        };
        filter.update_coefficients();
        filter
    }

    /// Set the gain in dB. Ignored by low/high-pass shapes.
    pub fn set_gain_db(&mut self, gain_db: f32) {
        if gain_db != self.gain_db {
            self.gain_db = gain_db;
            self.update_coefficients();
        }
    }

    /// Current gain in dB.
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Response shape.
    pub fn shape(&self) -> FilterShape {
        self.shape
    }

    /// Corner or centre frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Linear magnitude response of the current design at `frequency`.
    pub fn magnitude_at(&self, frequency: f32) -> f32 {
        self.left.magnitude_at(frequency, self.sample_rate)
    }

    fn update_coefficients(&mut self) {
        let frequency = self.frequency.clamp(1.0, self.sample_rate * 0.49);
        let coeffs = self
            .shape
            .coefficients(frequency, self.q, self.gain_db, self.sample_rate);
        self.left.apply(coeffs);
        self.right.apply(coeffs);
    }
}

impl Effect for StereoFilter {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        (self.left.process(left), self.right.process(right))
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_coefficients();
    }

    fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}
