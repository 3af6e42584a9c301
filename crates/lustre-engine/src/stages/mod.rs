//! The five processing stages.
//!
//! Each stage module pairs a pure `derive(settings, enabled)` mapping with
//! the render-side struct that owns the stage's DSP nodes. Stages implement
//! [`Effect`](lustre_core::Effect) and are held in fixed fields of the
//! renderer.

pub mod analysis;
pub mod color;
pub mod dynamics;
pub mod harmonic;
pub mod spatial;

pub use analysis::AnalysisStage;
pub use color::{ColorParams, ColorStage};
pub use dynamics::{DynamicsParams, DynamicsStage};
pub use harmonic::{HarmonicParams, HarmonicStage};
pub use spatial::{SpatialParams, SpatialStage};
