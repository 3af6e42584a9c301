//! Acoustic color stage: five tone bands and a parallel saturation tap.
//!
//! | Band | Shape | Centre | Gain |
//! |------|-------|--------|------|
//! | body | low shelf | 150 Hz | (v − 0.5) × 8 dB |
//! | warmth | peak | 400 Hz | (v − 0.5) × 6 dB |
//! | punch | peak | 2 kHz | (v − 0.5) × 4 dB |
//! | brightness | peak | 6 kHz | (v − 0.5) × 6 dB |
//! | air | high shelf | 10 kHz | (v − 0.5) × 8 dB |
//!
//! 0.5 is flat for every band. Saturation is fed from the last band:
//! drive = `max(0, (warmth − 0.4) × 0.5)`, mix = drive × 0.3.

use lustre_config::ColorSettings;
use lustre_core::Effect;
use lustre_effects::{FilterShape, StereoFilter, WaveShaper};

use crate::params::node_params;
use crate::routing::SummingPoint;

const BAND_Q: f32 = 0.707;

/// `(shape, centre Hz, dB per unit away from 0.5)` in processing order.
const BANDS: [(FilterShape, f32, f32); 5] = [
    (FilterShape::LowShelf, 150.0, 8.0),
    (FilterShape::Peaking, 400.0, 6.0),
    (FilterShape::Peaking, 2000.0, 4.0),
    (FilterShape::Peaking, 6000.0, 6.0),
    (FilterShape::HighShelf, 10000.0, 8.0),
];

node_params! {
    /// Derived color-stage parameters.
    ColorParams => SharedColorParams {
        /// Body shelf gain, dB
        body_db: f32,
        /// Warmth peak gain, dB
        warmth_db: f32,
        /// Punch peak gain, dB
        punch_db: f32,
        /// Brightness peak gain, dB
        brightness_db: f32,
        /// Air shelf gain, dB
        air_db: f32,
        /// Wave-shaper drive
        saturation: f32,
        /// Saturation tap level
        saturation_mix: f32,
    }
}

impl ColorParams {
    /// Band gains in processing order.
    pub fn band_gains(&self) -> [f32; 5] {
        [
            self.body_db,
            self.warmth_db,
            self.punch_db,
            self.brightness_db,
            self.air_db,
        ]
    }
}

/// Map color settings to node parameters.
///
/// Disabled flattens every band and mutes the saturation tap; the drive
/// keeps following `warmth` so the curve is ready when re-enabled.
pub fn derive(settings: &ColorSettings, enabled: bool) -> ColorParams {
    let saturation = ((settings.warmth - 0.4) * 0.5).max(0.0);
    if !enabled {
        return ColorParams {
            body_db: 0.0,
            warmth_db: 0.0,
            punch_db: 0.0,
            brightness_db: 0.0,
            air_db: 0.0,
            saturation,
            saturation_mix: 0.0,
        };
    }

    let values = [
        settings.body,
        settings.warmth,
        settings.punch,
        settings.brightness,
        settings.air,
    ];
    let [body_db, warmth_db, punch_db, brightness_db, air_db] =
        core::array::from_fn(|i| (values[i] - 0.5) * BANDS[i].2);
    ColorParams {
        body_db,
        warmth_db,
        punch_db,
        brightness_db,
        air_db,
        saturation,
        saturation_mix: saturation * 0.3,
    }
}

/// Render-side color stage.
#[derive(Debug, Clone)]
pub struct ColorStage {
    bands: [StereoFilter; 5],
    shaper: WaveShaper,
    /// filtered, saturated
    output: SummingPoint<2>,
}

impl ColorStage {
    /// Build the stage at `params`.
    pub fn new(params: &ColorParams, sample_rate: f32) -> Self {
        let mut stage = Self {
            bands: BANDS.map(|(shape, frequency, _)| {
                StereoFilter::new(shape, frequency, BAND_Q, sample_rate)
            }),
            shaper: WaveShaper::new(),
            output: SummingPoint::new([1.0, params.saturation_mix], sample_rate),
        };
        stage.apply(params);
        stage
    }

    /// Move towards new parameters. The curve is rebuilt only when the
    /// drive changes.
    pub fn apply(&mut self, params: &ColorParams) {
        for (band, gain_db) in self.bands.iter_mut().zip(params.band_gains()) {
            band.set_gain_db(gain_db);
        }
        self.shaper.set_amount(params.saturation);
        self.output.set_gains([1.0, params.saturation_mix]);
    }

    /// Current band gains in dB.
    pub fn band_gains(&self) -> [f32; 5] {
        core::array::from_fn(|i| self.bands[i].gain_db())
    }
}

impl Effect for ColorStage {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let mut frame = (left, right);
        for band in &mut self.bands {
            frame = band.process_stereo(frame.0, frame.1);
        }
        let saturated = self.shaper.process_stereo(frame.0, frame.1);
        self.output.mix_stereo([frame, saturated])
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        for band in &mut self.bands {
            band.set_sample_rate(sample_rate);
        }
        self.output.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        for band in &mut self.bands {
            band.reset();
        }
        self.output.snap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;

    #[test]
    fn test_neutral_midpoint() {
        let params = derive(&ColorSettings::default(), true);
        assert_eq!(params.band_gains(), [0.0; 5]);
        assert!((params.saturation - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_band_scales() {
        let full = ColorSettings {
            body: 1.0,
            warmth: 1.0,
            punch: 1.0,
            brightness: 1.0,
            air: 1.0,
            ..ColorSettings::default()
        };
        assert_eq!(derive(&full, true).band_gains(), [4.0, 3.0, 2.0, 3.0, 4.0]);

        let empty = ColorSettings {
            body: 0.0,
            warmth: 0.0,
            punch: 0.0,
            brightness: 0.0,
            air: 0.0,
            ..ColorSettings::default()
        };
        assert_eq!(derive(&empty, true).band_gains(), [-4.0, -3.0, -2.0, -3.0, -4.0]);
    }

    #[test]
    fn test_saturation_mapping() {
        let cold = derive(&ColorSettings { warmth: 0.3, ..ColorSettings::default() }, true);
        assert_eq!((cold.saturation, cold.saturation_mix), (0.0, 0.0));

        let hot = derive(&ColorSettings { warmth: 0.9, ..ColorSettings::default() }, true);
        assert!((hot.saturation - 0.25).abs() < 1e-6);
        assert!((hot.saturation_mix - 0.075).abs() < 1e-6);
    }

    #[test]
    fn test_disabled_is_flat_and_dry() {
        let settings = ColorSettings {
            body: 0.9,
            warmth: 0.8,
            ..ColorSettings::default()
        };
        let params = derive(&settings, false);
        assert_eq!(params.band_gains(), [0.0; 5]);
        assert_eq!(params.saturation_mix, 0.0);

        let mut stage = ColorStage::new(&params, SR);
        assert_eq!(stage.band_gains(), [0.0; 5]);
        for i in 0..2048 {
            let x = (i as f32 * 0.07).sin() * 0.5;
            let (l, r) = stage.process_stereo(x, x);
            assert!((l - x).abs() < 1e-5 && (r - x).abs() < 1e-5);
        }
    }

    #[test]
    fn test_apply_updates_bands() {
        let mut stage = ColorStage::new(&derive(&ColorSettings::default(), true), SR);
        let bright = derive(
            &ColorSettings {
                brightness: 1.0,
                ..ColorSettings::default()
            },
            true,
        );
        stage.apply(&bright);
        assert_eq!(stage.band_gains()[3], 3.0);
    }

    #[test]
    fn test_flat_after_rate_change() {
        let mut stage = ColorStage::new(&derive(&ColorSettings::default(), false), SR);
        stage.set_sample_rate(44100.0);
        stage.reset();
        assert_eq!(stage.band_gains(), [0.0; 5]);
        for i in 0..2048 {
            let x = (i as f32 * 0.07).sin() * 0.5;
            let (l, r) = stage.process_stereo(x, x);
            assert!((l - x).abs() < 1e-5 && (r - x).abs() < 1e-5, "frame {i}");
        }
    }
}
