//! Harmonic restoration stage.
//!
//! ```text
//!           ┌──────────────────────────── dry ─────────────────────────────┐
//!           │                                                              ▼
//! in ──► low shelf 200 Hz ──► high shelf 8 kHz ──► presence 3 kHz ──┬──► wet bus ──► Σ ──► out
//!                                                                  ├─ compressor ──►┤
//!                                                                  ├─ LP 80 Hz ────►┤
//!                                                                  └─ HP 12 kHz ───►┘
//! ```
//!
//! | Setting | Node parameter |
//! |---------|----------------|
//! | overtones | presence gain = overtones × 6 dB |
//! | transients | compressor tap = transients × 0.5 |
//! | subBass | sub tap = subBass × 0.4, low shelf = subBass × 4 dB |
//! | air | air tap = air × 0.3, high shelf = air × 3 dB |
//!
//! Disabling only closes the wet bus and opens the dry path; tap gains
//! keep their values.

use lustre_config::HarmonicSettings;
use lustre_core::Effect;
use lustre_effects::{Compressor, FilterShape, StereoFilter};

use crate::params::node_params;
use crate::routing::SummingPoint;

const LOW_SHELF_HZ: f32 = 200.0;
const HIGH_SHELF_HZ: f32 = 8000.0;
const PRESENCE_HZ: f32 = 3000.0;
const PRESENCE_Q: f32 = 1.5;
const SUB_HZ: f32 = 80.0;
const AIR_HZ: f32 = 12000.0;
const SHELF_Q: f32 = 0.707;

node_params! {
    /// Derived harmonic-stage parameters.
    HarmonicParams => SharedHarmonicParams {
        /// Low shelf gain, dB
        low_shelf_db: f32,
        /// High shelf gain, dB
        high_shelf_db: f32,
        /// Presence peak gain, dB
        presence_db: f32,
        /// Transient compressor tap, linear
        transient_gain: f32,
        /// Sub-bass tap, linear
        sub_gain: f32,
        /// Air tap, linear
        air_gain: f32,
        /// Wet bus level
        wet: f32,
        /// Dry (stage input) level
        dry: f32,
    }
}

/// Map harmonic settings to node parameters.
pub fn derive(settings: &HarmonicSettings, enabled: bool) -> HarmonicParams {
    HarmonicParams {
        low_shelf_db: settings.sub_bass * 4.0,
        high_shelf_db: settings.air * 3.0,
        presence_db: settings.overtones * 6.0,
        transient_gain: settings.transients * 0.5,
        sub_gain: settings.sub_bass * 0.4,
        air_gain: settings.air * 0.3,
        wet: if enabled { 1.0 } else { 0.0 },
        dry: if enabled { 0.0 } else { 1.0 },
    }
}

/// Render-side harmonic stage.
#[derive(Debug, Clone)]
pub struct HarmonicStage {
    low_shelf: StereoFilter,
    high_shelf: StereoFilter,
    presence: StereoFilter,
    transient: Compressor,
    sub: StereoFilter,
    air: StereoFilter,
    /// presence, transient, sub, air
    wet_bus: SummingPoint<4>,
    /// dry, wet
    output: SummingPoint<2>,
}

impl HarmonicStage {
    /// Build the stage at `params`.
    pub fn new(params: &HarmonicParams, sample_rate: f32) -> Self {
        let mut transient = Compressor::new(sample_rate);
        transient.set_threshold_db(-24.0);
        transient.set_ratio(4.0);
        transient.set_attack_ms(3.0);
        transient.set_release_ms(50.0);
        transient.set_knee_db(6.0);

        let mut stage = Self {
            low_shelf: StereoFilter::new(FilterShape::LowShelf, LOW_SHELF_HZ, SHELF_Q, sample_rate),
            high_shelf: StereoFilter::new(FilterShape::HighShelf, HIGH_SHELF_HZ, SHELF_Q, sample_rate),
            presence: StereoFilter::new(FilterShape::Peaking, PRESENCE_HZ, PRESENCE_Q, sample_rate),
            transient,
            sub: StereoFilter::new(FilterShape::Lowpass, SUB_HZ, SHELF_Q, sample_rate),
            air: StereoFilter::new(FilterShape::Highpass, AIR_HZ, SHELF_Q, sample_rate),
            wet_bus: SummingPoint::new(Self::bus_gains(params), sample_rate),
            output: SummingPoint::new([params.dry, params.wet], sample_rate),
        };
        stage.apply(params);
        stage
    }

    /// Move towards new parameters. Gains ramp; filter gains switch.
    pub fn apply(&mut self, params: &HarmonicParams) {
        self.low_shelf.set_gain_db(params.low_shelf_db);
        self.high_shelf.set_gain_db(params.high_shelf_db);
        self.presence.set_gain_db(params.presence_db);
        self.wet_bus.set_gains(Self::bus_gains(params));
        self.output.set_gains([params.dry, params.wet]);
    }

    fn bus_gains(params: &HarmonicParams) -> [f32; 4] {
        [1.0, params.transient_gain, params.sub_gain, params.air_gain]
    }
}

impl Effect for HarmonicStage {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let (l, r) = self.low_shelf.process_stereo(left, right);
        let (l, r) = self.high_shelf.process_stereo(l, r);
        let presence = self.presence.process_stereo(l, r);

        let transient = self.transient.process_stereo(presence.0, presence.1);
        let sub = self.sub.process_stereo(presence.0, presence.1);
        let air = self.air.process_stereo(presence.0, presence.1);

        let wet = self.wet_bus.mix_stereo([presence, transient, sub, air]);
        self.output.mix_stereo([(left, right), wet])
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.low_shelf.set_sample_rate(sample_rate);
        self.high_shelf.set_sample_rate(sample_rate);
        self.presence.set_sample_rate(sample_rate);
        self.transient.set_sample_rate(sample_rate);
        self.sub.set_sample_rate(sample_rate);
        self.air.set_sample_rate(sample_rate);
        self.wet_bus.set_sample_rate(sample_rate);
        self.output.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.low_shelf.reset();
        self.high_shelf.reset();
        self.presence.reset();
        self.transient.reset();
        self.sub.reset();
        self.air.reset();
        self.wet_bus.snap();
        self.output.snap();
    }
}
