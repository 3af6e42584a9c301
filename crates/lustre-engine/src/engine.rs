//! The graph manager.
//!
//! [`Engine`] is the control half: it owns the settings, derives node
//! parameters, publishes them to the renderer and tells listeners what
//! changed. It builds the whole graph once in [`Engine::init`]; after
//! that only [`Engine::set_bypass`] changes the topology, by swapping the
//! published [`Wiring`].
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──init──► NeedsResume ──resume──► Running
//!       │                      └──────── (start_suspended = false) ──┘
//!       └─ init fails ─► Failed (mutators no-op, init may be retried)
//! any ──destroy──► Destroyed (everything no-ops)
//! ```

use std::sync::Arc;

use arc_swap::ArcSwap;
use lustre_analysis::Analyser;
use lustre_config::{
    ColorPatch, DynamicsPatch, HarmonicPatch, OutputPatch, PresetLibrary, Settings, SettingsPatch,
    SpatialPatch,
};
use lustre_effects::{ConvolutionKernel, Convolver};
use tracing::{debug, error, info, warn};

use crate::config::EngineConfig;
use crate::context::{ContextState, RenderContext};
use crate::error::EngineError;
use crate::events::{EngineEvent, EventKind, EventRegistry, Listener};
use crate::impulse::ImpulseSynthesizer;
use crate::params::{NodeParams, OutputParams, SharedParams};
use crate::render::{Renderer, Stages};
use crate::routing::Wiring;
use crate::snapshot::{VisualizationSnapshot, Visualizer};
use crate::source::SourceHandle;
use crate::stages::analysis::analyser_config;
use crate::stages::{
    AnalysisStage, ColorStage, DynamicsStage, HarmonicStage, SpatialStage, color, dynamics,
    harmonic, spatial,
};

/// State shared with the renderer.
#[derive(Debug)]
pub(crate) struct Shared {
    pub params: SharedParams,
    pub wiring: ArcSwap<Wiring>,
}

/// Externally visible engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// `init` has not succeeded yet
    Uninitialized,
    /// The last `init` failed; see [`Engine::last_error`]
    Failed,
    /// Initialized, waiting for [`Engine::resume`]
    NeedsResume,
    /// Processing audio
    Running,
    /// Destroyed
    Destroyed,
}

/// Everything that exists only between `init` and `destroy`.
struct Active {
    context: RenderContext,
    shared: Arc<Shared>,
    pipeline: Arc<Wiring>,
    bypass: Arc<Wiring>,
    visualizer: Visualizer,
    renderer: Option<Renderer>,
}

enum Lifecycle {
    Idle,
    Failed,
    Active(Box<Active>),
    Destroyed,
}

/// The audio enhancement engine.
///
/// # Example
///
/// ```rust
/// use lustre_engine::{BufferSource, Engine, EngineConfig, ImpulseSeed, SourceHandle};
///
/// let config = EngineConfig::default().with_seed(ImpulseSeed::Fixed(1));
/// let mut engine = Engine::new(config);
/// let source = SourceHandle::new(BufferSource::mono(vec![0.25; 4800]));
/// engine.init(&source);
/// engine.set_preset("vocal");
///
/// let mut renderer = engine.take_renderer().unwrap();
/// let mut left = vec![0.0; 480];
/// let mut right = vec![0.0; 480];
/// renderer.render(&mut left, &mut right);
///
/// let snapshot = engine.visualization_data();
/// assert_eq!(snapshot.spectrum.len(), 256);
/// ```
pub struct Engine {
    config: EngineConfig,
    library: PresetLibrary,
    settings: Settings,
    enabled: bool,
    bypassed: bool,
    events: EventRegistry,
    lifecycle: Lifecycle,
    last_error: Option<EngineError>,
}

impl Engine {
    /// Create an engine with the factory presets.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_library(config, PresetLibrary::factory())
    }

    /// Create an engine with a custom preset library.
    pub fn with_library(config: EngineConfig, library: PresetLibrary) -> Self {
        Self {
            config,
            library,
            settings: Settings::default(),
            enabled: true,
            bypassed: false,
            events: EventRegistry::new(),
            lifecycle: Lifecycle::Idle,
            last_error: None,
        }
    }

    // ── Lifecycle ───────────────────────────────────────────────────────────

    /// Build the graph and attach to `source`.
    ///
    /// Only the first successful call does anything. On failure the engine
    /// stays uninitialized, the error is logged once and kept in
    /// [`last_error`](Self::last_error).
    pub fn init(&mut self, source: &SourceHandle) -> &mut Self {
        match self.lifecycle {
            Lifecycle::Active(_) => {
                debug!("init ignored: already initialized");
                return self;
            }
            Lifecycle::Destroyed => {
                debug!("init ignored: engine destroyed");
                self.last_error = Some(EngineError::AlreadyDestroyed);
                return self;
            }
            Lifecycle::Idle | Lifecycle::Failed => {}
        }

        match self.build(source) {
            Ok(active) => {
                info!(
                    sample_rate = active.context.sample_rate(),
                    block_size = active.context.block_size(),
                    state = ?active.context.state(),
                    "engine initialized"
                );
                self.lifecycle = Lifecycle::Active(Box::new(active));
                self.last_error = None;
                self.events.emit(&EngineEvent::Initialized);
            }
            Err(err) => {
                error!(error = %err, "engine initialization failed");
                self.lifecycle = Lifecycle::Failed;
                self.last_error = Some(err);
            }
        }
        self
    }

    fn build(&self, source: &SourceHandle) -> Result<Active, EngineError> {
        let context = RenderContext::new(&self.config)?;
        let stream = source.tap()?;
        let sample_rate = context.sample_rate();
        let params = self.derive_params();

        let bank: Vec<ConvolutionKernel> = ImpulseSynthesizer::new(self.config.seed)
            .synthesize_all(sample_rate)
            .iter()
            .map(|room| ConvolutionKernel::new(&room.left, &room.right, sample_rate, true))
            .collect();

        let post_color = Analyser::new(analyser_config(params.output.smoothing));
        let master = Analyser::new(analyser_config(params.output.smoothing));
        let visualizer = Visualizer::new(post_color.readout(), master.readout());

        let stages = Stages {
            harmonic: HarmonicStage::new(&params.harmonic, sample_rate),
            spatial: SpatialStage::new(&params.spatial, Convolver::new(bank), sample_rate),
            dynamics: DynamicsStage::new(&params.dynamics, sample_rate),
            color: ColorStage::new(&params.color, sample_rate),
            analysis: AnalysisStage::new(post_color),
        };

        let pipeline = Arc::new(Wiring::PIPELINE);
        let bypass = Arc::new(Wiring::BYPASS);
        let shared = Arc::new(Shared {
            params: SharedParams::new(&params),
            wiring: ArcSwap::new(Arc::clone(&pipeline)),
        });

        let renderer = Renderer::new(
            context.state_cell(),
            Arc::clone(&shared),
            stream,
            stages,
            master,
            params,
            sample_rate,
            context.block_size(),
        );

        Ok(Active {
            context,
            shared,
            pipeline,
            bypass,
            visualizer,
            renderer: Some(renderer),
        })
    }

    /// Start a suspended render context. No-op when already running.
    pub fn resume(&mut self) {
        if let Lifecycle::Active(active) = &self.lifecycle {
            if active.context.resume() {
                info!("render context resumed");
            }
        }
    }

    /// Close the render context and drop every listener.
    ///
    /// The renderer, if the host still holds it, renders silence from now on.
    pub fn destroy(&mut self) {
        if matches!(self.lifecycle, Lifecycle::Destroyed) {
            return;
        }
        if let Lifecycle::Active(active) = &self.lifecycle {
            active.context.close();
        }
        self.events.clear();
        self.lifecycle = Lifecycle::Destroyed;
        info!("engine destroyed");
    }

    /// Current state.
    pub fn state(&self) -> EngineState {
        match &self.lifecycle {
            Lifecycle::Idle => EngineState::Uninitialized,
            Lifecycle::Failed => EngineState::Failed,
            Lifecycle::Destroyed => EngineState::Destroyed,
            Lifecycle::Active(active) => match active.context.state() {
                ContextState::Suspended => EngineState::NeedsResume,
                ContextState::Running => EngineState::Running,
                ContextState::Closed => EngineState::Destroyed,
            },
        }
    }

    /// Why the last `init` did nothing, if it failed or came after `destroy`.
    pub fn last_error(&self) -> Option<&EngineError> {
        self.last_error.as_ref()
    }

    /// Hand the render half to the host. Succeeds once per engine.
    pub fn take_renderer(&mut self) -> Option<Renderer> {
        match &mut self.lifecycle {
            Lifecycle::Active(active) => active.renderer.take(),
            _ => None,
        }
    }

    // ── Topology ────────────────────────────────────────────────────────────

    /// Route the source straight to the output (`true`) or through every
    /// stage (`false`). Node parameters are untouched.
    pub fn set_bypass(&mut self, bypass: bool) {
        let Lifecycle::Active(active) = &self.lifecycle else {
            debug!("set_bypass ignored: engine not initialized");
            return;
        };
        let wiring = if bypass { &active.bypass } else { &active.pipeline };
        active.shared.wiring.store(Arc::clone(wiring));
        self.bypassed = bypass;
        info!(bypass, "bypass changed");
        self.events.emit(&EngineEvent::BypassChanged(bypass));
    }

    /// Keep the wiring but make every stage neutral (`false`), or restore
    /// the settings-derived parameters (`true`).
    pub fn set_enabled(&mut self, enabled: bool) {
        if !self.is_live("set_enabled") {
            return;
        }
        self.enabled = enabled;
        self.publish();
        info!(enabled, "processing enabled changed");
        self.events.emit(&EngineEvent::EnabledChanged(enabled));
    }

    /// Whether the source is routed straight to the output.
    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Whether stages apply their settings.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // ── Settings ────────────────────────────────────────────────────────────

    /// A copy of the current settings.
    pub fn get_settings(&self) -> Settings {
        self.settings.clone()
    }

    /// Apply each group present in `patch` through its setter.
    pub fn load_settings(&mut self, patch: &SettingsPatch) {
        if !self.is_live("load_settings") {
            return;
        }
        if let Some(harmonic) = &patch.harmonic {
            self.set_harmonic(harmonic);
        }
        if let Some(spatial) = &patch.spatial {
            self.set_spatial(spatial);
        }
        if let Some(dynamics) = &patch.dynamics {
            self.set_dynamics(dynamics);
        }
        if let Some(color) = &patch.color {
            self.set_color(color);
        }
        if let Some(output) = &patch.output {
            self.set_output(output);
        }
    }

    /// Merge a named preset. Unknown names are ignored with a warning.
    pub fn set_preset(&mut self, name: &str) {
        if !self.is_live("set_preset") {
            return;
        }
        let Some(preset) = self.library.get(name) else {
            warn!(preset = name, "unknown preset ignored");
            return;
        };
        let name = preset.name.clone();
        self.settings.apply(&preset.patch);
        self.publish();
        info!(preset = %name, "preset applied");
        self.events.emit(&EngineEvent::PresetChanged {
            name,
            settings: Box::new(self.settings.clone()),
        });
    }

    /// Merge harmonic fields.
    pub fn set_harmonic(&mut self, patch: &HarmonicPatch) {
        if !self.is_live("set_harmonic") {
            return;
        }
        self.settings.harmonic.merge(patch);
        self.publish();
        self.events
            .emit(&EngineEvent::HarmonicChanged(self.settings.harmonic.clone()));
    }

    /// Merge spatial fields. A room change switches the impulse.
    pub fn set_spatial(&mut self, patch: &SpatialPatch) {
        if !self.is_live("set_spatial") {
            return;
        }
        self.settings.spatial.merge(patch);
        self.publish();
        self.events
            .emit(&EngineEvent::SpatialChanged(self.settings.spatial.clone()));
    }

    /// Merge dynamics fields. A mode change re-derives the compressor curve.
    pub fn set_dynamics(&mut self, patch: &DynamicsPatch) {
        if !self.is_live("set_dynamics") {
            return;
        }
        self.settings.dynamics.merge(patch);
        self.publish();
        self.events
            .emit(&EngineEvent::DynamicsChanged(self.settings.dynamics.clone()));
    }

    /// Merge color fields.
    pub fn set_color(&mut self, patch: &ColorPatch) {
        if !self.is_live("set_color") {
            return;
        }
        self.settings.color.merge(patch);
        self.publish();
        self.events
            .emit(&EngineEvent::ColorChanged(self.settings.color.clone()));
    }

    /// Merge output fields.
    pub fn set_output(&mut self, patch: &OutputPatch) {
        if !self.is_live("set_output") {
            return;
        }
        self.settings.output.merge(patch);
        self.publish();
        self.events
            .emit(&EngineEvent::OutputChanged(self.settings.output.clone()));
    }

    /// Set master volume, clamped to `0..=1`.
    pub fn set_volume(&mut self, volume: f32) {
        self.set_output(&OutputPatch::default().volume(volume));
    }

    /// Node parameters as the renderer currently sees them.
    pub fn node_params(&self) -> NodeParams {
        match &self.lifecycle {
            Lifecycle::Active(active) => active.shared.params.load(),
            _ => self.derive_params(),
        }
    }

    /// The preset library.
    pub fn library(&self) -> &PresetLibrary {
        &self.library
    }

    /// Mutable access to the preset library, e.g. to register user presets.
    pub fn library_mut(&mut self) -> &mut PresetLibrary {
        &mut self.library
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ── Visualization and events ────────────────────────────────────────────

    /// Copy the latest analyser data. Silent before `init`.
    pub fn visualization_data(&self) -> VisualizationSnapshot {
        match &self.lifecycle {
            Lifecycle::Active(active) => active.visualizer.snapshot(),
            _ => VisualizationSnapshot::silent(),
        }
    }

    /// Subscribe to `kind`.
    pub fn on(&mut self, kind: EventKind, listener: Listener) {
        if matches!(self.lifecycle, Lifecycle::Destroyed) {
            return;
        }
        self.events.on(kind, listener);
    }

    /// Unsubscribe a listener previously passed to [`on`](Self::on).
    pub fn off(&mut self, kind: EventKind, listener: &Listener) -> bool {
        self.events.off(kind, listener)
    }

    // ── Internals ───────────────────────────────────────────────────────────

    fn is_live(&self, operation: &str) -> bool {
        let live = matches!(self.lifecycle, Lifecycle::Active(_));
        if !live {
            debug!(operation, "ignored: engine not initialized");
        }
        live
    }

    fn derive_params(&self) -> NodeParams {
        let s = &self.settings;
        let on = self.enabled;
        NodeParams {
            harmonic: harmonic::derive(&s.harmonic, on && s.harmonic.enabled),
            spatial: spatial::derive(&s.spatial, on && s.spatial.enabled),
            dynamics: dynamics::derive(&s.dynamics, on && s.dynamics.enabled),
            color: color::derive(&s.color, on && s.color.enabled),
            output: OutputParams::derive(&s.output),
        }
    }

    fn publish(&self) {
        if let Lifecycle::Active(active) = &self.lifecycle {
            active.shared.params.store(&self.derive_params());
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state())
            .field("enabled", &self.enabled)
            .field("bypassed", &self.bypassed)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
