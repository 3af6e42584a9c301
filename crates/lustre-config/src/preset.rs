//! Named presets and the preset library.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::factory_presets;
use crate::patch::SettingsPatch;

/// A named partial settings tree.
///
/// # TOML Format
///
/// ```toml
/// name = "basshead"
/// description = "Heavy low end"
///
/// [harmonic]
/// subBass = 0.7
///
/// [color]
/// body = 0.8
/// punch = 0.7
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Lookup name.
    pub name: String,

    /// Optional one-line description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Groups this preset changes.
    #[serde(flatten)]
    pub patch: SettingsPatch,
}

impl Preset {
    /// Create a preset that changes nothing.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            patch: SettingsPatch::default(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the settings patch.
    pub fn with_patch(mut self, patch: SettingsPatch) -> Self {
        self.patch = patch;
        self
    }

    /// Parse a preset from TOML text. The name must not be blank.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let preset: Preset = toml::from_str(toml_str)?;
        if preset.name.trim().is_empty() {
            return Err(ConfigError::invalid_preset(preset.name, "name must not be empty"));
        }
        Ok(preset)
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Ordered collection of presets, looked up by case-insensitive name.
#[derive(Debug, Clone, Default)]
pub struct PresetLibrary {
    presets: Vec<Preset>,
}

impl PresetLibrary {
    /// An empty library.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A library holding the factory presets.
    pub fn factory() -> Self {
        Self {
            presets: factory_presets::factory_presets(),
        }
    }

    /// Add a preset, replacing any preset with the same name.
    pub fn register(&mut self, preset: Preset) {
        match self.position(&preset.name) {
            Some(index) => self.presets[index] = preset,
            None => self.presets.push(preset),
        }
    }

    /// Parse a TOML preset and register it.
    pub fn register_toml(&mut self, toml_str: &str) -> Result<(), ConfigError> {
        self.register(Preset::from_toml(toml_str)?);
        Ok(())
    }

    /// Look up a preset by name.
    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.position(name).map(|index| &self.presets[index])
    }

    /// Look up a preset by name, reporting a missing one as an error.
    pub fn preset(&self, name: &str) -> Result<&Preset, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::PresetNotFound(name.to_string()))
    }

    /// Preset names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.name.as_str())
    }

    /// All presets in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.presets
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
    }
}
