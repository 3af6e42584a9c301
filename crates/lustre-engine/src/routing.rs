//! Signal routing: summing points and the stage wiring.
//!
//! Every parallel path in the graph ends in a [`SummingPoint`]: `N` sends,
//! each with its own smoothed gain, added into one output:
//!
//! ```text
//! out = Σ gain[i] · in[i]      (gains smoothed over 10 ms)
//! ```
//!
//! Stage order is a [`Wiring`], a static list of [`StageId`]s. The engine
//! pre-builds both wirings and publishes one at a time through an
//! `ArcSwap`, which the renderer loads once per block.

use lustre_core::SmoothedParam;

/// `N` gain-controlled sends into one sum.
#[derive(Debug, Clone)]
pub struct SummingPoint<const N: usize> {
    sends: [SmoothedParam; N],
}

impl<const N: usize> SummingPoint<N> {
    /// Create a summing point starting at `gains` (no ramp).
    pub fn new(gains: [f32; N], sample_rate: f32) -> Self {
        Self {
            sends: gains.map(|gain| SmoothedParam::standard(gain, sample_rate)),
        }
    }

    /// Ramp every send towards a new gain.
    pub fn set_gains(&mut self, gains: [f32; N]) {
        for (send, gain) in self.sends.iter_mut().zip(gains) {
            send.set_target(gain);
        }
    }

    /// Target gains.
    pub fn gains(&self) -> [f32; N] {
        core::array::from_fn(|i| self.sends[i].target())
    }

    /// Whether every send has reached its target.
    pub fn is_settled(&self) -> bool {
        self.sends.iter().all(SmoothedParam::is_settled)
    }

    /// Jump every send to its target.
    pub fn snap(&mut self) {
        for send in &mut self.sends {
            send.snap_to_target();
        }
    }

    /// Update the smoothing rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for send in &mut self.sends {
            send.set_sample_rate(sample_rate);
        }
    }

    /// Sum one mono frame, advancing each send once.
    #[inline]
    pub fn mix(&mut self, inputs: [f32; N]) -> f32 {
        let mut sum = 0.0;
        for (send, x) in self.sends.iter_mut().zip(inputs) {
            sum += send.advance() * x;
        }
        sum
    }

    /// Sum one stereo frame, advancing each send once.
    #[inline]
    pub fn mix_stereo(&mut self, inputs: [(f32, f32); N]) -> (f32, f32) {
        let (mut left, mut right) = (0.0, 0.0);
        for (send, (l, r)) in self.sends.iter_mut().zip(inputs) {
            let gain = send.advance();
            left += gain * l;
            right += gain * r;
        }
        (left, right)
    }
}

/// A processing stage in the fixed pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Harmonic restoration
    Harmonic,
    /// Width, depth and room
    Spatial,
    /// Compressor and limiter
    Dynamics,
    /// Tonal color
    Color,
    /// Post-color analyser tap
    Analysis,
}

/// An ordered list of stages between the source and the output.
#[derive(Debug, PartialEq, Eq)]
pub struct Wiring {
    /// Stages in processing order
    pub stages: &'static [StageId],
}

impl Wiring {
    /// Source → Harmonic → Spatial → Dynamics → Color → Analysis → Output.
    pub const PIPELINE: Wiring = Wiring {
        stages: &[
            StageId::Harmonic,
            StageId::Spatial,
            StageId::Dynamics,
            StageId::Color,
            StageId::Analysis,
        ],
    };

    /// Source → Output.
    pub const BYPASS: Wiring = Wiring { stages: &[] };

    /// Whether this wiring skips every stage.
    pub fn is_bypass(&self) -> bool {
        self.stages.is_empty()
    }
}
