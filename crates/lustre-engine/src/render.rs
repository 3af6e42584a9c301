//! The render half of the engine.
//!
//! [`Renderer::render`] is called by the host's audio callback. Per block
//! of at most `block_size` frames it:
//!
//! 1. checks the context state (suspended or closed renders silence)
//! 2. pulls frames from the source, zero-filling past its end and
//!    replacing non-finite samples with silence
//! 3. picks up node parameters that changed since the last block
//! 4. loads the wiring once and runs its stages in order
//! 5. applies master volume and feeds the master analyser
//!
//! Nothing here allocates, locks or logs.

use std::sync::Arc;

use lustre_analysis::Analyser;
use lustre_core::{Effect, SmoothedParam};

use crate::context::{ContextState, StateCell};
use crate::engine::Shared;
use crate::params::NodeParams;
use crate::routing::StageId;
use crate::source::SampleStream;
use crate::stages::{AnalysisStage, ColorStage, DynamicsStage, HarmonicStage, SpatialStage};

/// Outcome of one [`Renderer::render`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// Audio was produced
    Rendered,
    /// The context waits for `resume`; output is silent
    Suspended,
    /// The engine was destroyed; output is silent
    Closed,
    /// The source ran out during this call; the rest is silent
    SourceEnded,
}

/// The stages, in fixed fields.
#[derive(Debug)]
pub(crate) struct Stages {
    pub harmonic: HarmonicStage,
    pub spatial: SpatialStage,
    pub dynamics: DynamicsStage,
    pub color: ColorStage,
    pub analysis: AnalysisStage,
}

/// Render-side state, handed to the host by
/// [`Engine::take_renderer`](crate::Engine::take_renderer).
pub struct Renderer {
    state: StateCell,
    shared: Arc<Shared>,
    source: Box<dyn SampleStream + Send>,
    source_ended: bool,
    stages: Stages,
    volume: SmoothedParam,
    master: Analyser,
    /// Parameters currently applied to the stages
    applied: NodeParams,
    block_size: usize,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("state", &self.state.get())
            .field("block_size", &self.block_size)
            .field("source_ended", &self.source_ended)
            .finish_non_exhaustive()
    }
}

impl Renderer {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        state: StateCell,
        shared: Arc<Shared>,
        source: Box<dyn SampleStream + Send>,
        stages: Stages,
        master: Analyser,
        applied: NodeParams,
        sample_rate: f32,
        block_size: usize,
    ) -> Self {
        Self {
            state,
            shared,
            source,
            source_ended: false,
            stages,
            volume: SmoothedParam::standard(applied.output.volume, sample_rate),
            master,
            applied,
            block_size,
        }
    }

    /// Fill `left` and `right` with processed audio.
    ///
    /// The slices may have any length (the shorter one is used); they are
    /// processed in blocks of the configured size.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) -> RenderStatus {
        let frames = left.len().min(right.len());
        let (left, right) = (&mut left[..frames], &mut right[..frames]);

        match self.state.get() {
            ContextState::Running => {}
            ContextState::Suspended => {
                left.fill(0.0);
                right.fill(0.0);
                return RenderStatus::Suspended;
            }
            ContextState::Closed => {
                left.fill(0.0);
                right.fill(0.0);
                return RenderStatus::Closed;
            }
        }

        let was_ended = self.source_ended;
        for (l, r) in left
            .chunks_mut(self.block_size)
            .zip(right.chunks_mut(self.block_size))
        {
            self.render_block(l, r);
        }

        if self.source_ended && !was_ended {
            RenderStatus::SourceEnded
        } else {
            RenderStatus::Rendered
        }
    }

    /// Whether the source has run out.
    pub fn source_ended(&self) -> bool {
        self.source_ended
    }

    fn render_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        let read = if self.source_ended {
            0
        } else {
            self.source.read(left, right).min(left.len())
        };
        if read < left.len() {
            self.source_ended = true;
            left[read..].fill(0.0);
            right[read..].fill(0.0);
        }
        // A single NaN or inf would live on in every filter's state.
        for sample in left[..read].iter_mut().chain(right[..read].iter_mut()) {
            if !sample.is_finite() {
                *sample = 0.0;
            }
        }

        self.pick_up_params();

        let stages: &'static [StageId] = self.shared.wiring.load().stages;
        for stage in stages {
            match stage {
                StageId::Harmonic => self.stages.harmonic.process_block_stereo(left, right),
                StageId::Spatial => self.stages.spatial.process_block_stereo(left, right),
                StageId::Dynamics => self.stages.dynamics.process_block_stereo(left, right),
                StageId::Color => self.stages.color.process_block_stereo(left, right),
                StageId::Analysis => self.stages.analysis.process_block_stereo(left, right),
            }
        }

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let gain = self.volume.advance();
            *l *= gain;
            *r *= gain;
        }
        self.master.push(left, right);
        self.master.publish();
    }

    /// Apply node parameters published since the last block.
    fn pick_up_params(&mut self) {
        let latest = self.shared.params.load();
        if latest == self.applied {
            return;
        }
        if latest.harmonic != self.applied.harmonic {
            self.stages.harmonic.apply(&latest.harmonic);
        }
        if latest.spatial != self.applied.spatial {
            self.stages.spatial.apply(&latest.spatial);
        }
        if latest.dynamics != self.applied.dynamics {
            self.stages.dynamics.apply(&latest.dynamics);
        }
        if latest.color != self.applied.color {
            self.stages.color.apply(&latest.color);
        }
        if latest.output != self.applied.output {
            self.volume.set_target(latest.output.volume);
            self.stages.analysis.set_smoothing(latest.output.smoothing);
            self.master.set_smoothing(latest.output.smoothing);
        }
        self.applied = latest;
    }
}
