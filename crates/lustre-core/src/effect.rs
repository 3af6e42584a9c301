//! Stereo processing trait shared by every DSP node.
//!
//! Nodes process one stereo frame at a time. The trait is object-safe,
//! but stages hold their nodes in concrete fields and dispatch statically.

/// A stereo DSP node.
///
/// # Example
///
/// ```rust
/// use lustre_core::Effect;
///
/// struct Swap;
///
/// impl Effect for Swap {
///     fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
///         (right, left)
///     }
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///     fn reset(&mut self) {}
/// }
///
/// let mut node = Swap;
/// let mut left = [1.0, 2.0];
/// let mut right = [3.0, 4.0];
/// node.process_block_stereo(&mut left, &mut right);
/// assert_eq!(left, [3.0, 4.0]);
/// ```
pub trait Effect {
    /// Process one stereo frame.
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32);

    /// Process a block in place.
    ///
    /// Both slices must have the same length.
    fn process_block_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len(), "channel length mismatch");
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            (*l, *r) = self.process_stereo(*l, *r);
        }
    }

    /// Recalculate sample-rate dependent state.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal state (filter history, delay lines, envelopes)
    /// without changing parameters.
    fn reset(&mut self);

    /// Processing latency in samples. Most nodes have none.
    fn latency_samples(&self) -> usize {
        0
    }
}
