//! Dynamics stage: input trim → compressor → makeup → limiter → output trim.
//!
//! The mode picks the compressor's threshold, ratio and makeup:
//!
//! | Mode | Threshold | Ratio | Makeup |
//! |------|-----------|-------|--------|
//! | pure | -6 dB | 1.2 | 1.0 |
//! | enhanced | -18 dB | 2.5 | 1.15 |
//! | balanced | -20 dB | 4 | 1.2 |
//! | night | -12 dB | 6 | 0.9 |
//! | compressed | -28 dB | 8 | 1.4 |
//!
//! Attack and release come from the settings (ms, stored here in seconds)
//! and the limiter ceiling from `ceiling`. Disabling sets ratio and makeup
//! to 1 and the trims to unity; the limiter stays in as a safety ceiling.

use lustre_config::{DynamicsMode, DynamicsSettings};
use lustre_core::{Effect, SmoothedParam};
use lustre_effects::{Compressor, Limiter};

use crate::params::node_params;

const KNEE_DB: f32 = 6.0;

node_params! {
    /// Derived dynamics-stage parameters.
    DynamicsParams => SharedDynamicsParams {
        /// Gain before the compressor, linear
        input_gain: f32,
        /// Compressor threshold, dB
        threshold_db: f32,
        /// Compression ratio
        ratio: f32,
        /// Compressor attack, seconds
        attack_s: f32,
        /// Compressor release, seconds
        release_s: f32,
        /// Makeup gain, linear
        makeup: f32,
        /// Limiter ceiling, dB
        ceiling_db: f32,
        /// Gain after the limiter, linear
        output_gain: f32,
    }
}

/// Compressor `(threshold dB, ratio, makeup)` for a mode.
pub const fn mode_curve(mode: DynamicsMode) -> (f32, f32, f32) {
    match mode {
        DynamicsMode::Pure => (-6.0, 1.2, 1.0),
        DynamicsMode::Enhanced => (-18.0, 2.5, 1.15),
        DynamicsMode::Balanced => (-20.0, 4.0, 1.2),
        DynamicsMode::Night => (-12.0, 6.0, 0.9),
        DynamicsMode::Compressed => (-28.0, 8.0, 1.4),
    }
}

/// Map dynamics settings to node parameters.
pub fn derive(settings: &DynamicsSettings, enabled: bool) -> DynamicsParams {
    let (threshold_db, ratio, makeup) = mode_curve(settings.mode);
    let params = DynamicsParams {
        input_gain: settings.input_gain,
        threshold_db,
        ratio,
        attack_s: settings.attack / 1000.0,
        release_s: settings.release / 1000.0,
        makeup,
        ceiling_db: settings.ceiling,
        output_gain: settings.output_gain,
    };
    if enabled {
        params
    } else {
        DynamicsParams {
            input_gain: 1.0,
            ratio: 1.0,
            makeup: 1.0,
            output_gain: 1.0,
            ..params
        }
    }
}

/// Render-side dynamics stage.
#[derive(Debug, Clone)]
pub struct DynamicsStage {
    input_gain: SmoothedParam,
    compressor: Compressor,
    limiter: Limiter,
    output_gain: SmoothedParam,
}

impl DynamicsStage {
    /// Build the stage at `params`.
    pub fn new(params: &DynamicsParams, sample_rate: f32) -> Self {
        let mut compressor = Compressor::new(sample_rate);
        compressor.set_knee_db(KNEE_DB);
        let mut stage = Self {
            input_gain: SmoothedParam::standard(params.input_gain, sample_rate),
            compressor,
            limiter: Limiter::new(sample_rate),
            output_gain: SmoothedParam::standard(params.output_gain, sample_rate),
        };
        stage.apply(params);
        stage.compressor.reset();
        stage
    }

    /// Move towards new parameters.
    pub fn apply(&mut self, params: &DynamicsParams) {
        self.input_gain.set_target(params.input_gain);
        self.compressor.set_threshold_db(params.threshold_db);
        self.compressor.set_ratio(params.ratio);
        self.compressor.set_attack_ms(params.attack_s * 1000.0);
        self.compressor.set_release_ms(params.release_s * 1000.0);
        self.compressor.set_makeup(params.makeup);
        self.limiter.set_ceiling_db(params.ceiling_db);
        self.output_gain.set_target(params.output_gain);
    }

    /// Current compressor gain reduction in dB.
    pub fn gain_reduction_db(&self) -> f32 {
        self.compressor.gain_reduction_db()
    }
}

impl Effect for DynamicsStage {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let trim = self.input_gain.advance();
        let (l, r) = self.compressor.process_stereo(left * trim, right * trim);
        let (l, r) = self.limiter.process_stereo(l, r);
        let trim = self.output_gain.advance();
        (l * trim, r * trim)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.input_gain.set_sample_rate(sample_rate);
        self.compressor.set_sample_rate(sample_rate);
        self.limiter.set_sample_rate(sample_rate);
        self.output_gain.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.input_gain.snap_to_target();
        self.compressor.reset();
        self.limiter.reset();
        self.output_gain.snap_to_target();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;

    fn settings(mode: DynamicsMode) -> DynamicsSettings {
        DynamicsSettings {
            mode,
            ..DynamicsSettings::default()
        }
    }

    #[test]
    fn test_night_mode_mapping() {
        let params = derive(&settings(DynamicsMode::Night), true);
        assert_eq!(params.threshold_db, -12.0);
        assert_eq!(params.ratio, 6.0);
        assert_eq!(params.makeup, 0.9);
    }

    #[test]
    fn test_times_in_seconds() {
        let params = derive(
            &DynamicsSettings {
                attack: 20.0,
                release: 500.0,
                ceiling: -3.0,
                ..DynamicsSettings::default()
            },
            true,
        );
        assert_eq!(params.attack_s, 0.02);
        assert_eq!(params.release_s, 0.5);
        assert_eq!(params.ceiling_db, -3.0);
    }

    #[test]
    fn test_disabled_is_unity_but_keeps_ceiling() {
        let params = derive(&settings(DynamicsMode::Compressed), false);
        assert_eq!((params.ratio, params.makeup), (1.0, 1.0));
        assert_eq!((params.input_gain, params.output_gain), (1.0, 1.0));
        assert_eq!(params.ceiling_db, -1.0);
        assert_eq!(params.threshold_db, -28.0);
    }

    #[test]
    fn test_disabled_passes_signal_below_ceiling() {
        let params = derive(&settings(DynamicsMode::Night), false);
        let mut stage = DynamicsStage::new(&params, SR);
        for i in 0..4800 {
            let x = (i as f32 * 0.01).sin() * 0.5;
            let (l, r) = stage.process_stereo(x, x);
            assert_eq!((l, r), (x, x), "frame {i}");
        }
    }

    #[test]
    fn test_output_never_exceeds_ceiling() {
        let params = derive(
            &DynamicsSettings {
                ceiling: -6.0,
                input_gain: 2.0,
                ..settings(DynamicsMode::Pure)
            },
            true,
        );
        let mut stage = DynamicsStage::new(&params, SR);
        let ceiling = lustre_core::db_to_linear(-6.0);
        for i in 0..4800 {
            let x = (i as f32 * 0.02).sin();
            let (l, r) = stage.process_stereo(x, -x);
            assert!(l.abs() <= ceiling + 1e-6 && r.abs() <= ceiling + 1e-6);
        }
    }

    #[test]
    fn test_compressed_mode_reduces_loud_input() {
        let params = derive(&settings(DynamicsMode::Compressed), true);
        let mut stage = DynamicsStage::new(&params, SR);
        for i in 0..9600 {
            let x = (i as f32 * 0.05).sin() * 0.8;
            stage.process_stereo(x, x);
        }
        assert!(stage.gain_reduction_db() < -3.0);
    }

    #[test]
    fn test_reset_releases_gain_reduction() {
        let params = derive(&settings(DynamicsMode::Compressed), true);
        let mut stage = DynamicsStage::new(&params, SR);
        stage.set_sample_rate(44100.0);
        for i in 0..8820 {
            let x = (i as f32 * 0.05).sin() * 0.8;
            stage.process_stereo(x, x);
        }
        assert!(stage.gain_reduction_db() < -3.0);

        stage.reset();
        assert_eq!(stage.gain_reduction_db(), 0.0);

        // Quiet material sits below threshold and passes at unity makeup.
        let quiet = derive(&settings(DynamicsMode::Night), false);
        stage.apply(&quiet);
        stage.reset();
        for i in 0..4410 {
            let x = (i as f32 * 0.01).sin() * 0.5;
            assert_eq!(stage.process_stereo(x, x), (x, x), "frame {i}");
        }
    }
}
