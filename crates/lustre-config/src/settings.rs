//! The settings tree: five groups of typed, range-limited fields.
//!
//! Every value stored here is already inside its documented range; the
//! only way to change a group is [`merge`](HarmonicSettings::merge) with a
//! partial group such as [`HarmonicPatch`], which clamps and filters on the
//! way in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::patch::{ColorPatch, DynamicsPatch, HarmonicPatch, OutputPatch, SettingsPatch, SpatialPatch};
use crate::validation::{merge_flag, merge_ranged};

/// Valid ranges for every numeric field.
pub mod ranges {
    use std::ops::RangeInclusive;

    /// Normalized amount fields (harmonic, color, depth).
    pub const UNIT: RangeInclusive<f32> = 0.0..=1.0;
    /// Stereo width (1.0 = unchanged).
    pub const WIDTH: RangeInclusive<f32> = 0.0..=2.0;
    /// Compressor attack in milliseconds.
    pub const ATTACK_MS: RangeInclusive<f32> = 0.1..=100.0;
    /// Compressor release in milliseconds.
    pub const RELEASE_MS: RangeInclusive<f32> = 10.0..=1000.0;
    /// Limiter ceiling in dB.
    pub const CEILING_DB: RangeInclusive<f32> = -24.0..=0.0;
    /// Linear input/output trims.
    pub const TRIM: RangeInclusive<f32> = 0.0..=2.0;
    /// Master volume.
    pub const VOLUME: RangeInclusive<f32> = 0.0..=1.0;
    /// Analyser smoothing.
    pub const SMOOTHING: RangeInclusive<f32> = 0.0..=0.99;
}

/// A categorical name that is not one of the known variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    /// Which field was being parsed (`"room"`, `"mode"`).
    pub field: &'static str,
    /// The rejected name.
    pub name: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.field, self.name)
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// All variants, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Lowercase name used in settings documents.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            /// Position in [`ALL`](Self::ALL).
            pub fn index(self) -> usize {
                self as usize
            }

            /// Variant at `index` in [`ALL`](Self::ALL).
            pub fn from_index(index: usize) -> Option<Self> {
                Self::ALL.get(index).copied()
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lower = s.trim().to_ascii_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == lower)
                    .ok_or_else(|| UnknownVariant {
                        field: $field,
                        name: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

named_enum! {
    /// Simulated acoustic space for the spatial stage.
    #[derive(Default)]
    Room, "room" {
        /// Small treated room
        #[default]
        Studio => "studio",
        /// Warm vintage chamber
        Analog => "analog",
        /// Large hall with a long tail
        Concert => "concert",
        /// Mid-size live room
        Club => "club",
        /// Dense, medium-long space
        Theater => "theater",
        /// Outdoors: short and sparse
        Open => "open",
    }
}

named_enum! {
    /// Compression character of the dynamics stage.
    #[derive(Default)]
    DynamicsMode, "mode" {
        /// Barely touches the signal
        Pure => "pure",
        /// Gentle glue with a little makeup
        Enhanced => "enhanced",
        /// General-purpose leveling
        #[default]
        Balanced => "balanced",
        /// Strong leveling at reduced output for quiet listening
        Night => "night",
        /// Heavy, loud, broadcast-style
        Compressed => "compressed",
    }
}

/// Harmonic restoration: presence, transients, sub and air.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HarmonicSettings {
    /// Stage on/off
    pub enabled: bool,
    /// Presence boost around 3 kHz
    pub overtones: f32,
    /// Parallel fast-compressor tap
    pub transients: f32,
    /// Low-end weight
    pub sub_bass: f32,
    /// Top-end sparkle
    pub air: f32,
}

impl Default for HarmonicSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            overtones: 0.3,
            transients: 0.3,
            sub_bass: 0.3,
            air: 0.3,
        }
    }
}

impl HarmonicSettings {
    /// Apply the present fields of `patch`.
    pub fn merge(&mut self, patch: &HarmonicPatch) {
        merge_flag(&mut self.enabled, patch.enabled);
        merge_ranged(&mut self.overtones, patch.overtones, ranges::UNIT, "harmonic.overtones");
        merge_ranged(&mut self.transients, patch.transients, ranges::UNIT, "harmonic.transients");
        merge_ranged(&mut self.sub_bass, patch.sub_bass, ranges::UNIT, "harmonic.subBass");
        merge_ranged(&mut self.air, patch.air, ranges::UNIT, "harmonic.air");
    }
}

/// Stereo image, depth and room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpatialSettings {
    /// Stage on/off
    pub enabled: bool,
    /// Mid/side width, 1.0 = unchanged
    pub width: f32,
    /// Early-reflection depth
    pub depth: f32,
    /// Convolution room
    pub room: Room,
}

impl Default for SpatialSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            width: 1.0,
            depth: 0.3,
            room: Room::Studio,
        }
    }
}

impl SpatialSettings {
    /// Apply the present fields of `patch`.
    pub fn merge(&mut self, patch: &SpatialPatch) {
        merge_flag(&mut self.enabled, patch.enabled);
        merge_ranged(&mut self.width, patch.width, ranges::WIDTH, "spatial.width");
        merge_ranged(&mut self.depth, patch.depth, ranges::UNIT, "spatial.depth");
        if let Some(room) = patch.room {
            self.room = room;
        }
    }
}

/// Compressor, limiter and trims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DynamicsSettings {
    /// Stage on/off
    pub enabled: bool,
    /// Compression character
    pub mode: DynamicsMode,
    /// Attack in ms
    pub attack: f32,
    /// Release in ms
    pub release: f32,
    /// Limiter ceiling in dB
    pub ceiling: f32,
    /// Linear gain before the compressor
    pub input_gain: f32,
    /// Linear gain after the limiter
    pub output_gain: f32,
}

impl Default for DynamicsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: DynamicsMode::Balanced,
            attack: 10.0,
            release: 250.0,
            ceiling: -1.0,
            input_gain: 1.0,
            output_gain: 1.0,
        }
    }
}

impl DynamicsSettings {
    /// Apply the present fields of `patch`.
    pub fn merge(&mut self, patch: &DynamicsPatch) {
        merge_flag(&mut self.enabled, patch.enabled);
        if let Some(mode) = patch.mode {
            self.mode = mode;
        }
        merge_ranged(&mut self.attack, patch.attack, ranges::ATTACK_MS, "dynamics.attack");
        merge_ranged(&mut self.release, patch.release, ranges::RELEASE_MS, "dynamics.release");
        merge_ranged(&mut self.ceiling, patch.ceiling, ranges::CEILING_DB, "dynamics.ceiling");
        merge_ranged(&mut self.input_gain, patch.input_gain, ranges::TRIM, "dynamics.inputGain");
        merge_ranged(&mut self.output_gain, patch.output_gain, ranges::TRIM, "dynamics.outputGain");
    }
}

/// Five-band tonal color. 0.5 is neutral for every band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorSettings {
    /// Stage on/off
    pub enabled: bool,
    /// Low shelf at 150 Hz
    pub body: f32,
    /// Bell at 400 Hz, also drives saturation
    pub warmth: f32,
    /// Bell at 2 kHz
    pub punch: f32,
    /// Bell at 6 kHz
    pub brightness: f32,
    /// High shelf at 10 kHz
    pub air: f32,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            body: 0.5,
            warmth: 0.5,
            punch: 0.5,
            brightness: 0.5,
            air: 0.5,
        }
    }
}

impl ColorSettings {
    /// Apply the present fields of `patch`.
    pub fn merge(&mut self, patch: &ColorPatch) {
        merge_flag(&mut self.enabled, patch.enabled);
        merge_ranged(&mut self.body, patch.body, ranges::UNIT, "color.body");
        merge_ranged(&mut self.warmth, patch.warmth, ranges::UNIT, "color.warmth");
        merge_ranged(&mut self.punch, patch.punch, ranges::UNIT, "color.punch");
        merge_ranged(&mut self.brightness, patch.brightness, ranges::UNIT, "color.brightness");
        merge_ranged(&mut self.air, patch.air, ranges::UNIT, "color.air");
    }
}

/// Master volume and analyser smoothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputSettings {
    /// Master volume
    pub volume: f32,
    /// Analyser spectral smoothing
    pub smoothing: f32,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            volume: 0.8,
            smoothing: 0.8,
        }
    }
}

impl OutputSettings {
    /// Apply the present fields of `patch`.
    pub fn merge(&mut self, patch: &OutputPatch) {
        merge_ranged(&mut self.volume, patch.volume, ranges::VOLUME, "output.volume");
        merge_ranged(&mut self.smoothing, patch.smoothing, ranges::SMOOTHING, "output.smoothing");
    }
}

/// The complete settings tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Harmonic restoration
    pub harmonic: HarmonicSettings,
    /// Stereo and room
    pub spatial: SpatialSettings,
    /// Compression and limiting
    pub dynamics: DynamicsSettings,
    /// Tonal color
    pub color: ColorSettings,
    /// Master output
    pub output: OutputSettings,
}

impl Settings {
    /// Merge every group present in `patch`.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(harmonic) = &patch.harmonic {
            self.harmonic.merge(harmonic);
        }
        if let Some(spatial) = &patch.spatial {
            self.spatial.merge(spatial);
        }
        if let Some(dynamics) = &patch.dynamics {
            self.dynamics.merge(dynamics);
        }
        if let Some(color) = &patch.color {
            self.color.merge(color);
        }
        if let Some(output) = &patch.output {
            self.output.merge(output);
        }
    }
}
