//! Lustre Core - DSP primitives for the enhancement engine
//!
//! Building blocks shared by every stage of the lustre processing chain.
//! Everything here is designed for the render path: no allocation after
//! construction, no locks, no blocking.
//!
//! # Core Abstractions
//!
//! ## Effect System
//!
//! - [`Effect`] - Stereo, object-safe processing trait for DSP nodes
//!
//! ## Parameter Handling
//!
//! - [`SmoothedParam`] - Exponential smoothing for click-free gain changes
//! - [`AtomicF32`] - Lock-free `f32` cell for control → render handoff
//!
//! ## Filters and Delays
//!
//! - [`Biquad`] - Second-order IIR filter with RBJ cookbook coefficients
//! - [`InterpolatedDelay`] - Fractional delay line on a circular buffer
//!
//! ## Dynamics
//!
//! - [`EnvelopeFollower`] - Peak envelope detection with attack/release
//!
//! ## Utilities
//!
//! - Level conversions: [`db_to_linear`], [`linear_to_db`]
//! - [`flush_denormal`], [`ms_to_samples`]
//!
//! # Example
//!
//! ```rust
//! use lustre_core::{Biquad, SmoothedParam, peaking_eq_coefficients};
//!
//! let mut presence = Biquad::new();
//! let (b0, b1, b2, a0, a1, a2) = peaking_eq_coefficients(3000.0, 1.5, 4.0, 48000.0);
//! presence.set_coefficients(b0, b1, b2, a0, a1, a2);
//!
//! let mut gain = SmoothedParam::standard(1.0, 48000.0);
//! gain.set_target(0.5);
//!
//! let out = presence.process(0.25) * gain.advance();
//! assert!(out.is_finite());
//! ```

pub mod atomic;
pub mod biquad;
pub mod delay;
pub mod effect;
pub mod envelope;
pub mod math;
pub mod param;

pub use atomic::AtomicF32;
pub use biquad::{
    Biquad, Coefficients, high_shelf_coefficients, highpass_coefficients,
    low_shelf_coefficients, lowpass_coefficients, peaking_eq_coefficients,
};
pub use delay::InterpolatedDelay;
pub use effect::Effect;
pub use envelope::EnvelopeFollower;
pub use math::{db_to_linear, flush_denormal, linear_to_db, ms_to_samples};
pub use param::SmoothedParam;
