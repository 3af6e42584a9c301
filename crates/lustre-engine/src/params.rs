//! Node parameters shared between the control side and the renderer.
//!
//! Each stage has a plain `Copy` parameter struct produced by its pure
//! `derive` function and an atomic mirror the renderer reads at block
//! boundaries. Both are generated by [`node_params!`] so the two can
//! never drift apart.
//!
//! ```text
//! Settings ──derive──► HarmonicParams ──store──► SharedHarmonicParams
//!                                                      │ load (per block)
//!                                                      ▼
//!                                                 HarmonicStage
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use lustre_core::AtomicF32;
use serde::Serialize;

/// A value that can live in a lock-free cell.
pub trait ParamValue: Copy {
    /// Cell type holding the value.
    type Cell: std::fmt::Debug + Send + Sync;

    /// Create a cell.
    fn cell(self) -> Self::Cell;

    /// Read a cell.
    fn load(cell: &Self::Cell) -> Self;

    /// Write a cell.
    fn store(cell: &Self::Cell, value: Self);
}

impl ParamValue for f32 {
    type Cell = AtomicF32;

    fn cell(self) -> AtomicF32 {
        AtomicF32::new(self)
    }

    fn load(cell: &AtomicF32) -> f32 {
        cell.load()
    }

    fn store(cell: &AtomicF32, value: f32) {
        cell.store(value);
    }
}

impl ParamValue for usize {
    type Cell = AtomicUsize;

    fn cell(self) -> AtomicUsize {
        AtomicUsize::new(self)
    }

    fn load(cell: &AtomicUsize) -> usize {
        cell.load(Ordering::Acquire)
    }

    fn store(cell: &AtomicUsize, value: usize) {
        cell.store(value, Ordering::Release);
    }
}

/// Declares a parameter struct and its atomic mirror.
macro_rules! node_params {
    (
        $(#[$meta:meta])*
        $name:ident => $shared:ident {
            $( $(#[$field_meta:meta])* $field:ident: $ty:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
        pub struct $name {
            $( $(#[$field_meta])* pub $field: $ty, )+
        }

        #[doc = concat!("Lock-free mirror of [`", stringify!($name), "`].")]
        #[derive(Debug)]
        pub struct $shared {
            $( $field: <$ty as $crate::params::ParamValue>::Cell, )+
        }

        impl $shared {
            /// Create cells holding `params`.
            pub fn new(params: &$name) -> Self {
                Self {
                    $( $field: $crate::params::ParamValue::cell(params.$field), )+
                }
            }

            /// Publish `params`.
            pub fn store(&self, params: &$name) {
                $( <$ty as $crate::params::ParamValue>::store(&self.$field, params.$field); )+
            }

            /// Read the latest published values.
            pub fn load(&self) -> $name {
                $name {
                    $( $field: <$ty as $crate::params::ParamValue>::load(&self.$field), )+
                }
            }
        }
    };
}

pub(crate) use node_params;

use crate::stages::color::{ColorParams, SharedColorParams};
use crate::stages::dynamics::{DynamicsParams, SharedDynamicsParams};
use crate::stages::harmonic::{HarmonicParams, SharedHarmonicParams};
use crate::stages::spatial::{SharedSpatialParams, SpatialParams};

node_params! {
    /// Master output parameters.
    OutputParams => SharedOutputParams {
        /// Master gain, linear
        volume: f32,
        /// Analyser smoothing
        smoothing: f32,
    }
}

impl OutputParams {
    /// Map the output group. Output is never disabled.
    pub fn derive(settings: &lustre_config::OutputSettings) -> Self {
        Self {
            volume: settings.volume,
            smoothing: settings.smoothing,
        }
    }
}

/// Every derived node parameter in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeParams {
    /// Harmonic restoration
    pub harmonic: HarmonicParams,
    /// Width, depth and room
    pub spatial: SpatialParams,
    /// Compressor and limiter
    pub dynamics: DynamicsParams,
    /// Tonal color
    pub color: ColorParams,
    /// Master output
    pub output: OutputParams,
}

/// Atomic cells for every stage.
#[derive(Debug)]
pub struct SharedParams {
    /// Harmonic cells
    pub harmonic: SharedHarmonicParams,
    /// Spatial cells
    pub spatial: SharedSpatialParams,
    /// Dynamics cells
    pub dynamics: SharedDynamicsParams,
    /// Color cells
    pub color: SharedColorParams,
    /// Output cells
    pub output: SharedOutputParams,
}

impl SharedParams {
    /// Create cells holding `params`.
    pub fn new(params: &NodeParams) -> Self {
        Self {
            harmonic: SharedHarmonicParams::new(&params.harmonic),
            spatial: SharedSpatialParams::new(&params.spatial),
            dynamics: SharedDynamicsParams::new(&params.dynamics),
            color: SharedColorParams::new(&params.color),
            output: SharedOutputParams::new(&params.output),
        }
    }

    /// Publish every group.
    pub fn store(&self, params: &NodeParams) {
        self.harmonic.store(&params.harmonic);
        self.spatial.store(&params.spatial);
        self.dynamics.store(&params.dynamics);
        self.color.store(&params.color);
        self.output.store(&params.output);
    }

    /// Read every group.
    pub fn load(&self) -> NodeParams {
        NodeParams {
            harmonic: self.harmonic.load(),
            spatial: self.spatial.load(),
            dynamics: self.dynamics.load(),
            color: self.color.load(),
            output: self.output.load(),
        }
    }
}
