//! Lustre Engine - real-time audio enhancement graph
//!
//! Taps a stereo source, runs it through five stages and hands the result
//! to the host, while a control-side [`Engine`] manages settings, presets,
//! bypass and listeners.
//!
//! # Signal Flow
//!
//! ```text
//! source ─► harmonic ─► spatial ─► dynamics ─► color ─► analysis ─► volume ─► master analyser ─► out
//!    └──────────────────────────── bypass ───────────────────────────┘
//! ```
//!
//! # Threading
//!
//! The engine is split in two halves:
//!
//! - [`Engine`] lives on the control thread. Setters merge settings, derive
//!   node parameters and publish them through atomic cells.
//! - [`Renderer`] lives in the host's audio callback. It reads the cells and
//!   the current [`Wiring`] once per block and never allocates, locks or
//!   logs.
//!
//! # Example
//!
//! ```rust
//! use lustre_config::HarmonicPatch;
//! use lustre_engine::{BufferSource, Engine, EngineConfig, EngineState, SourceHandle};
//!
//! let mut engine = Engine::new(EngineConfig::default());
//! engine.init(&SourceHandle::new(BufferSource::mono(vec![0.1; 1024])));
//! assert_eq!(engine.state(), EngineState::Running);
//!
//! engine.set_harmonic(&HarmonicPatch::default().sub_bass(0.8));
//! assert_eq!(engine.get_settings().harmonic.sub_bass, 0.8);
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod events;
pub mod impulse;
pub mod params;
pub mod render;
pub mod routing;
pub mod snapshot;
pub mod source;
pub mod stages;

pub use config::{EngineConfig, ImpulseSeed};
pub use context::{ContextState, RenderContext};
pub use engine::{Engine, EngineState};
pub use error::EngineError;
pub use events::{EngineEvent, EventKind, EventRegistry, Listener};
pub use impulse::{ImpulseSynthesizer, RoomAcoustics, RoomImpulse};
pub use params::{NodeParams, OutputParams, SharedParams};
pub use render::{RenderStatus, Renderer};
pub use routing::{StageId, SummingPoint, Wiring};
pub use snapshot::{SPECTRUM_BINS, VisualizationSnapshot, Visualizer, WAVEFORM_SAMPLES};
pub use source::{BufferSource, SampleStream, SourceHandle};
