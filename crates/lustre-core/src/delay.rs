//! Fractional delay line on a circular buffer.
//!
//! Used for the spatial stage's depth taps, where the delay time follows
//! a setting and must be readable at fractional sample positions.

/// Heap-allocated delay line with linear interpolation.
///
/// The buffer is allocated at construction and never reallocates.
///
/// # Example
///
/// ```rust
/// use lustre_core::InterpolatedDelay;
///
/// // 50ms max delay at 48kHz
/// let mut delay = InterpolatedDelay::from_time(48000.0, 0.05);
///
/// delay.write(1.0);
/// assert_eq!(delay.read(0.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedDelay {
    buffer: Vec<f32>,
    /// Next slot to be written
    write_pos: usize,
}

impl InterpolatedDelay {
    /// Creates a delay line holding `max_delay_samples` samples.
    ///
    /// A zero capacity is raised to one sample.
    pub fn new(max_delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_delay_samples.max(1)],
            write_pos: 0,
        }
    }

    /// Creates a delay line from a sample rate and maximum delay in seconds.
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Self {
        Self::new((sample_rate * max_seconds) as usize + 1)
    }

    /// Reads the sample written `delay_samples` writes ago.
    ///
    /// `0.0` is the most recently written sample; fractional delays
    /// interpolate linearly towards the older neighbour. Delays beyond the
    /// capacity are clamped.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        let delay = delay_samples.clamp(0.0, (len - 1) as f32);

        let delay_int = delay as usize;
        let frac = delay - delay_int as f32;

        let read_pos = (self.write_pos + len - delay_int - 1) % len;
        let older_pos = (read_pos + len - 1) % len;

        let a = self.buffer[read_pos];
        let b = self.buffer[older_pos];
        a + (b - a) * frac
    }

    /// Writes a sample and advances the write position.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Writes `sample`, then reads `delay_samples` behind it.
    ///
    /// A delay of `n` samples returns the input from `n` calls ago.
    #[inline]
    pub fn write_read(&mut self, sample: f32, delay_samples: f32) -> f32 {
        self.write(sample);
        self.read(delay_samples)
    }

    /// Zeroes the buffer.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Maximum delay capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}
