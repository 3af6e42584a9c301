//! Factory presets bundled with the library.
//!
//! Embedded at compile time and always available. Each document only
//! names the fields it changes; everything else keeps its current value.

use crate::Preset;

/// Factory preset names, in listing order.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "natural",
    "basshead",
    "vocal",
    "cinema",
    "night",
    "live",
    "lofi",
    "audiophile",
];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("natural", NATURAL_PRESET),
    ("basshead", BASSHEAD_PRESET),
    ("vocal", VOCAL_PRESET),
    ("cinema", CINEMA_PRESET),
    ("night", NIGHT_PRESET),
    ("live", LIVE_PRESET),
    ("lofi", LOFI_PRESET),
    ("audiophile", AUDIOPHILE_PRESET),
];

const NATURAL_PRESET: &str = r#"
name = "natural"
description = "Light restoration, small room, transparent dynamics"

[harmonic]
overtones = 0.2
transients = 0.2
subBass = 0.2
air = 0.2

[spatial]
width = 1.0
depth = 0.2
room = "studio"

[dynamics]
mode = "pure"

[color]
body = 0.5
warmth = 0.5
punch = 0.5
brightness = 0.5
air = 0.5
"#;

const BASSHEAD_PRESET: &str = r#"
name = "basshead"
description = "Deep sub and a solid low-mid punch"

[harmonic]
overtones = 0.3
transients = 0.5
subBass = 0.7

[spatial]
width = 1.1
room = "club"

[dynamics]
mode = "enhanced"

[color]
body = 0.8
warmth = 0.6
punch = 0.7
brightness = 0.45
air = 0.45
"#;

const VOCAL_PRESET: &str = r#"
name = "vocal"
description = "Forward mids and presence for speech and singing"

[harmonic]
overtones = 0.5
transients = 0.3
subBass = 0.1
air = 0.4

[spatial]
width = 0.9
depth = 0.2
room = "studio"

[dynamics]
mode = "balanced"

[color]
body = 0.4
warmth = 0.55
punch = 0.6
brightness = 0.65
air = 0.55
"#;

const CINEMA_PRESET: &str = r#"
name = "cinema"
description = "Wide image, big room, weighty low end"

[harmonic]
transients = 0.4
subBass = 0.6
air = 0.4

[spatial]
width = 1.4
depth = 0.6
room = "theater"

[dynamics]
mode = "enhanced"

[color]
body = 0.65
air = 0.6
"#;

const NIGHT_PRESET: &str = r#"
name = "night"
description = "Even level at low volume, tamed lows"

[harmonic]
transients = 0.1
subBass = 0.1

[spatial]
width = 0.9
depth = 0.1
room = "studio"

[dynamics]
mode = "night"
ceiling = -3.0

[color]
body = 0.4
brightness = 0.45
"#;

const LIVE_PRESET: &str = r#"
name = "live"
description = "Concert hall space and open top end"

[harmonic]
transients = 0.5
air = 0.5

[spatial]
width = 1.5
depth = 0.7
room = "concert"

[dynamics]
mode = "balanced"

[color]
punch = 0.6
air = 0.6
"#;

const LOFI_PRESET: &str = r#"
name = "lofi"
description = "Dark, saturated and squashed"

[harmonic]
overtones = 0.1
subBass = 0.4
air = 0.0

[spatial]
width = 0.7
depth = 0.3
room = "analog"

[dynamics]
mode = "compressed"

[color]
body = 0.6
warmth = 0.9
brightness = 0.2
air = 0.1
"#;

const AUDIOPHILE_PRESET: &str = r#"
name = "audiophile"
description = "Minimal processing with a touch of openness"

[harmonic]
overtones = 0.1
transients = 0.1
subBass = 0.1
air = 0.1

[spatial]
width = 1.0
depth = 0.1
room = "open"

[dynamics]
mode = "pure"
ceiling = -0.3

[color]
body = 0.5
warmth = 0.5
punch = 0.5
brightness = 0.5
air = 0.5
"#;

/// Get a factory preset by name.
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .find(|(preset_name, _)| preset_name.eq_ignore_ascii_case(name.trim()))
        .and_then(|(_, toml)| Preset::from_toml(toml).ok())
}

/// All factory presets, in listing order.
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}
