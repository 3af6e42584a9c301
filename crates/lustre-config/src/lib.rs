//! Settings model and preset management for the lustre enhancement engine.
//!
//! Everything the engine is told to do arrives as a [`SettingsPatch`]:
//! a partial settings tree where every group and field is optional.
//! Patches come from code, TOML, JSON, or named [`Preset`]s.
//!
//! # Features
//!
//! - **Settings**: Five groups (harmonic, spatial, dynamics, color, output)
//!   with documented ranges and defaults
//! - **Validation**: Out-of-range values are clamped, non-finite values and
//!   unknown names are ignored, each with a warning
//! - **Presets**: Named patches, looked up case-insensitively
//! - **Factory Presets**: Built-in presets embedded at compile time
//!
//! # Example
//!
//! ```rust
//! use lustre_config::{ColorPatch, PresetLibrary, Settings, SettingsPatch};
//!
//! let mut settings = Settings::default();
//!
//! let library = PresetLibrary::factory();
//! settings.apply(&library.preset("basshead").unwrap().patch);
//! assert_eq!(settings.color.body, 0.8);
//!
//! // Out-of-range values are clamped, not rejected
//! let patch = SettingsPatch {
//!     color: Some(ColorPatch::default().punch(3.0)),
//!     ..SettingsPatch::default()
//! };
//! settings.apply(&patch);
//! assert_eq!(settings.color.punch, 1.0);
//! ```

mod error;
mod patch;
mod preset;
mod settings;

/// Range checks used by every settings merge.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{FACTORY_PRESET_NAMES, factory_presets, get_factory_preset};
pub use patch::{
    ColorPatch, DynamicsPatch, HarmonicPatch, OutputPatch, SettingsPatch, SpatialPatch,
    parse_lenient,
};
pub use preset::{Preset, PresetLibrary};
pub use settings::{
    ColorSettings, DynamicsMode, DynamicsSettings, HarmonicSettings, OutputSettings, Room,
    Settings, SpatialSettings, UnknownVariant, ranges,
};
pub use validation::Checked;
