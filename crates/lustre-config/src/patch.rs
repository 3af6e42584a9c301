//! Partial settings: the unit of every update.
//!
//! Each group has a patch struct with every field optional. Absent fields
//! leave the stored value alone, unknown fields in text documents are
//! skipped, and unknown `room`/`mode` names are dropped with a warning
//! instead of failing the whole document.
//!
//! ```rust
//! use lustre_config::{HarmonicPatch, Settings, SettingsPatch};
//!
//! let patch = SettingsPatch::from_toml("[harmonic]\nsubBass = 0.7\n").unwrap();
//! let mut settings = Settings::default();
//! settings.apply(&patch);
//! assert_eq!(settings.harmonic.sub_bass, 0.7);
//! assert_eq!(settings.harmonic.air, 0.3);
//!
//! let same = HarmonicPatch::default().sub_bass(0.7);
//! assert_eq!(patch.harmonic, Some(same));
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::settings::{
    ColorSettings, DynamicsMode, DynamicsSettings, HarmonicSettings, OutputSettings, Room,
    Settings, SpatialSettings, UnknownVariant,
};

/// Deserialize an optional categorical name, dropping unknown names.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = UnknownVariant>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|name| parse_lenient(&name)))
}

/// Parse a categorical name; unknown names warn and yield `None`.
pub fn parse_lenient<T: FromStr<Err = UnknownVariant>>(name: &str) -> Option<T> {
    match name.parse() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(field = err.field, name = %err.name, "unknown name ignored");
            None
        }
    }
}

/// Generates chainable setters: `patch.field(value)`.
macro_rules! setters {
    ($($field:ident: $ty:ty),+ $(,)?) => {
        $(
            #[doc = concat!("Set `", stringify!($field), "`.")]
            pub fn $field(mut self, value: $ty) -> Self {
                self.$field = Some(value);
                self
            }
        )+
    };
}

/// Partial [`HarmonicSettings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HarmonicPatch {
    /// New `enabled`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// New `overtones`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overtones: Option<f32>,
    /// New `transients`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transients: Option<f32>,
    /// New `sub_bass`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_bass: Option<f32>,
    /// New `air`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air: Option<f32>,
}

impl HarmonicPatch {
    setters!(enabled: bool, overtones: f32, transients: f32, sub_bass: f32, air: f32);
}

/// Partial [`SpatialSettings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpatialPatch {
    /// New `enabled`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// New `width`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// New `depth`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<f32>,
    /// New `room`, if present.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub room: Option<Room>,
}

impl SpatialPatch {
    setters!(enabled: bool, width: f32, depth: f32, room: Room);

    /// Set the room by name. Unknown names leave the field absent.
    pub fn room_named(mut self, name: &str) -> Self {
        self.room = parse_lenient(name);
        self
    }
}

/// Partial [`DynamicsSettings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DynamicsPatch {
    /// New `enabled`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// New `mode`, if present.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub mode: Option<DynamicsMode>,
    /// New `attack`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack: Option<f32>,
    /// New `release`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<f32>,
    /// New `ceiling`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<f32>,
    /// New `input_gain`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_gain: Option<f32>,
    /// New `output_gain`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_gain: Option<f32>,
}

impl DynamicsPatch {
    setters!(
        enabled: bool,
        mode: DynamicsMode,
        attack: f32,
        release: f32,
        ceiling: f32,
        input_gain: f32,
        output_gain: f32,
    );

    /// Set the mode by name. Unknown names leave the field absent.
    pub fn mode_named(mut self, name: &str) -> Self {
        self.mode = parse_lenient(name);
        self
    }
}

/// Partial [`ColorSettings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorPatch {
    /// New `enabled`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// New `body`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<f32>,
    /// New `warmth`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warmth: Option<f32>,
    /// New `punch`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub punch: Option<f32>,
    /// New `brightness`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f32>,
    /// New `air`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air: Option<f32>,
}

impl ColorPatch {
    setters!(enabled: bool, body: f32, warmth: f32, punch: f32, brightness: f32, air: f32);
}

/// Partial [`OutputSettings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputPatch {
    /// New `volume`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,
    /// New `smoothing`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothing: Option<f32>,
}

impl OutputPatch {
    setters!(volume: f32, smoothing: f32);
}

/// A partial settings tree: any subset of groups, each partial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    /// `harmonic` group, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harmonic: Option<HarmonicPatch>,
    /// `spatial` group, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spatial: Option<SpatialPatch>,
    /// `dynamics` group, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamics: Option<DynamicsPatch>,
    /// `color` group, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorPatch>,
    /// `output` group, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputPatch>,
}

impl SettingsPatch {
    /// Parse a patch from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Parse a patch from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a patch from a file, choosing JSON for `.json` and TOML otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Whether no group is present.
    pub fn is_empty(&self) -> bool {
        self.harmonic.is_none()
            && self.spatial.is_none()
            && self.dynamics.is_none()
            && self.color.is_none()
            && self.output.is_none()
    }
}

impl From<&HarmonicSettings> for HarmonicPatch {
    fn from(s: &HarmonicSettings) -> Self {
        Self::default()
            .enabled(s.enabled)
            .overtones(s.overtones)
            .transients(s.transients)
            .sub_bass(s.sub_bass)
            .air(s.air)
    }
}

impl From<&SpatialSettings> for SpatialPatch {
    fn from(s: &SpatialSettings) -> Self {
        Self::default()
            .enabled(s.enabled)
            .width(s.width)
            .depth(s.depth)
            .room(s.room)
    }
}

impl From<&DynamicsSettings> for DynamicsPatch {
    fn from(s: &DynamicsSettings) -> Self {
        Self::default()
            .enabled(s.enabled)
            .mode(s.mode)
            .attack(s.attack)
            .release(s.release)
            .ceiling(s.ceiling)
            .input_gain(s.input_gain)
            .output_gain(s.output_gain)
    }
}

impl From<&ColorSettings> for ColorPatch {
    fn from(s: &ColorSettings) -> Self {
        Self::default()
            .enabled(s.enabled)
            .body(s.body)
            .warmth(s.warmth)
            .punch(s.punch)
            .brightness(s.brightness)
            .air(s.air)
    }
}

impl From<&OutputSettings> for OutputPatch {
    fn from(s: &OutputSettings) -> Self {
        Self::default().volume(s.volume).smoothing(s.smoothing)
    }
}

/// A patch that reproduces `settings` exactly when applied.
impl From<&Settings> for SettingsPatch {
    fn from(s: &Settings) -> Self {
        Self {
            harmonic: Some((&s.harmonic).into()),
            spatial: Some((&s.spatial).into()),
            dynamics: Some((&s.dynamics).into()),
            color: Some((&s.color).into()),
            output: Some((&s.output).into()),
        }
    }
}
