//! Lustre Analysis - spectrum and level measurement
//!
//! - [`Analyser`] - Render-side FFT analyser publishing into an [`AnalyserReadout`]
//! - [`Window`] - Analysis window functions
//! - [`levels`] - RMS/peak measurement and display reductions
//!
//! # Example
//!
//! ```rust
//! use lustre_analysis::{Analyser, AnalyserConfig};
//!
//! let mut analyser = Analyser::new(AnalyserConfig::default());
//! let readout = analyser.readout();
//!
//! let block = vec![0.25_f32; 128];
//! analyser.push(&block, &block);
//! analyser.publish();
//!
//! let mut spectrum = vec![0.0; readout.frequency_bin_count()];
//! readout.copy_frequency(&mut spectrum);
//! assert!(spectrum.iter().all(|&b| (0.0..=1.0).contains(&b)));
//! ```

pub mod analyser;
pub mod fft;
pub mod levels;

pub use analyser::{Analyser, AnalyserConfig, AnalyserReadout};
pub use fft::Window;
