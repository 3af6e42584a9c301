//! Spatial stage: stereo width, depth delays and room convolution.
//!
//! ```text
//!          width matrix              ┌──── dry ─────────┐
//! in ──► [ L·gl, R·gr ] ──► bus ─────┼──── room conv ───┼──► Σ ──► out
//!                                    └──── depth delay ─┘
//! ```
//!
//! The width matrix is mid/side with the side scaled by `width`, written
//! as a direct L/R blend so `width = 1` is exact:
//!
//! ```text
//! L' = gl · ((1+w)/2 · L + (1−w)/2 · R)
//! R' = gr · ((1−w)/2 · L + (1+w)/2 · R)
//! gl = 1 + 0.1·(w−1),  gr = 1 − 0.1·(w−1)
//! ```
//!
//! Depth sets the left delay to `5 + 15·depth` ms, the right delay 2 ms
//! longer, and the delayed send to `depth × 0.15`. The room picks a
//! convolution kernel and its wet level; the dry send drops to
//! `1 − wet × 0.3` to hold loudness steady across rooms.

use lustre_config::SpatialSettings;
use lustre_core::{Effect, InterpolatedDelay, SmoothedParam};
use lustre_effects::Convolver;

use crate::impulse::RoomAcoustics;
use crate::params::node_params;
use crate::routing::SummingPoint;

const BASE_DELAY_MS: f32 = 5.0;
const DEPTH_DELAY_MS: f32 = 15.0;
const RIGHT_OFFSET_MS: f32 = 2.0;
/// Longest delay the lines must hold.
const MAX_DELAY_S: f32 = 0.025;

node_params! {
    /// Derived spatial-stage parameters.
    SpatialParams => SharedSpatialParams {
        /// Side channel scale
        side_gain: f32,
        /// Left path gain
        left_gain: f32,
        /// Right path gain
        right_gain: f32,
        /// Left depth delay, ms
        left_delay_ms: f32,
        /// Right depth delay, ms
        right_delay_ms: f32,
        /// Depth send level
        depth_gain: f32,
        /// Convolution send level
        wet: f32,
        /// Dry send level
        dry: f32,
        /// Active room, index into `Room::ALL`
        room: usize,
    }
}

/// Map spatial settings to node parameters.
///
/// Disabled gives an exact passthrough: unit width, no depth, no room.
/// The delay times and room still follow the settings so re-enabling
/// does not restart the lines.
pub fn derive(settings: &SpatialSettings, enabled: bool) -> SpatialParams {
    let left_delay_ms = BASE_DELAY_MS + DEPTH_DELAY_MS * settings.depth;
    let neutral = SpatialParams {
        side_gain: 1.0,
        left_gain: 1.0,
        right_gain: 1.0,
        left_delay_ms,
        right_delay_ms: left_delay_ms + RIGHT_OFFSET_MS,
        depth_gain: 0.0,
        wet: 0.0,
        dry: 1.0,
        room: settings.room.index(),
    };
    if !enabled {
        return neutral;
    }

    let width = settings.width;
    let wet = RoomAcoustics::of(settings.room).wet;
    SpatialParams {
        side_gain: width,
        left_gain: 1.0 + 0.1 * (width - 1.0),
        right_gain: 1.0 - 0.1 * (width - 1.0),
        depth_gain: settings.depth * 0.15,
        wet,
        dry: 1.0 - wet * 0.3,
        ..neutral
    }
}

/// Render-side spatial stage.
#[derive(Debug)]
pub struct SpatialStage {
    side: SmoothedParam,
    left_gain: SmoothedParam,
    right_gain: SmoothedParam,
    left_delay: InterpolatedDelay,
    right_delay: InterpolatedDelay,
    /// Delay times in samples
    left_time: SmoothedParam,
    right_time: SmoothedParam,
    convolver: Convolver,
    /// dry, convolution, depth
    output: SummingPoint<3>,
    sample_rate: f32,
}

impl SpatialStage {
    /// Build the stage around a convolver holding one kernel per room.
    pub fn new(params: &SpatialParams, convolver: Convolver, sample_rate: f32) -> Self {
        let to_samples = |ms: f32| ms * 0.001 * sample_rate;
        let mut stage = Self {
            side: SmoothedParam::standard(params.side_gain, sample_rate),
            left_gain: SmoothedParam::standard(params.left_gain, sample_rate),
            right_gain: SmoothedParam::standard(params.right_gain, sample_rate),
            left_delay: InterpolatedDelay::from_time(sample_rate, MAX_DELAY_S),
            right_delay: InterpolatedDelay::from_time(sample_rate, MAX_DELAY_S),
            left_time: SmoothedParam::with_config(to_samples(params.left_delay_ms), sample_rate, 50.0),
            right_time: SmoothedParam::with_config(to_samples(params.right_delay_ms), sample_rate, 50.0),
            convolver,
            output: SummingPoint::new([params.dry, params.wet, params.depth_gain], sample_rate),
            sample_rate,
        };
        stage.apply(params);
        stage
    }

    /// Move towards new parameters. A room change swaps the kernel.
    pub fn apply(&mut self, params: &SpatialParams) {
        self.side.set_target(params.side_gain);
        self.left_gain.set_target(params.left_gain);
        self.right_gain.set_target(params.right_gain);
        self.left_time
            .set_target(params.left_delay_ms * 0.001 * self.sample_rate);
        self.right_time
            .set_target(params.right_delay_ms * 0.001 * self.sample_rate);
        self.convolver.select(params.room);
        self.output
            .set_gains([params.dry, params.wet, params.depth_gain]);
    }

    /// Index of the active room kernel.
    pub fn active_room(&self) -> usize {
        self.convolver.active()
    }
}

impl Effect for SpatialStage {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let w = self.side.advance();
        let (a, b) = ((1.0 + w) * 0.5, (1.0 - w) * 0.5);
        let bus_l = self.left_gain.advance() * (a * left + b * right);
        let bus_r = self.right_gain.advance() * (b * left + a * right);

        let room = self.convolver.process_stereo(bus_l, bus_r);
        let depth = (
            self.left_delay
                .write_read(bus_l, self.left_time.advance()),
            self.right_delay
                .write_read(bus_r, self.right_time.advance()),
        );

        self.output.mix_stereo([(bus_l, bus_r), room, depth])
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        let scale = sample_rate / self.sample_rate;
        self.sample_rate = sample_rate;
        for param in [&mut self.side, &mut self.left_gain, &mut self.right_gain] {
            param.set_sample_rate(sample_rate);
        }
        for time in [&mut self.left_time, &mut self.right_time] {
            time.set_sample_rate(sample_rate);
            time.set_immediate(time.target() * scale);
        }
        self.left_delay = InterpolatedDelay::from_time(sample_rate, MAX_DELAY_S);
        self.right_delay = InterpolatedDelay::from_time(sample_rate, MAX_DELAY_S);
        self.output.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.left_delay.clear();
        self.right_delay.clear();
        self.convolver.reset();
        for param in [
            &mut self.side,
            &mut self.left_gain,
            &mut self.right_gain,
            &mut self.left_time,
            &mut self.right_time,
        ] {
            param.snap_to_target();
        }
        self.output.snap();
    }
}
