//! Lustre Effects - DSP nodes for the enhancement chain
//!
//! Stereo nodes built on lustre-core, each implementing [`Effect`]:
//!
//! - [`Compressor`] - Feed-forward soft-knee compressor, linked stereo
//! - [`Limiter`] - Brickwall limiter with instant attack
//! - [`Convolver`] - Partitioned FFT convolution over a bank of [`ConvolutionKernel`]s
//! - [`WaveShaper`] - Table-driven soft saturation
//! - [`StereoFilter`] - Biquad pair with a [`FilterShape`]
//!
//! Nodes own their state and are configured through setters on the
//! control side; none of them allocates while processing.
//!
//! ## Example
//!
//! ```rust
//! use lustre_core::Effect;
//! use lustre_effects::{Compressor, Limiter};
//!
//! let mut comp = Compressor::new(48000.0);
//! comp.set_threshold_db(-20.0);
//! comp.set_ratio(4.0);
//!
//! let mut limiter = Limiter::new(48000.0);
//! limiter.set_ceiling_db(-1.0);
//!
//! let (l, r) = comp.process_stereo(0.8, 0.7);
//! let (l, r) = limiter.process_stereo(l, r);
//! assert!(l.abs() <= 0.9 && r.abs() <= 0.9);
//! ```
//!
//! [`Effect`]: lustre_core::Effect

pub mod compressor;
pub mod convolver;
pub mod filter;
pub mod limiter;
pub mod waveshaper;

pub use compressor::Compressor;
pub use convolver::{ConvolutionKernel, Convolver, PARTITION_SIZE};
pub use filter::{FilterShape, StereoFilter};
pub use limiter::Limiter;
pub use waveshaper::{CURVE_POINTS, WaveShaper, saturation_curve};
