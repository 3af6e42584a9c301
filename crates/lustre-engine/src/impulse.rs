//! Room impulse synthesis.
//!
//! Each room is decaying stereo noise with a short burst of early
//! reflections:
//!
//! ```text
//! h[i] = n() · e^(−D·t)  +  [t < 50 ms] · n() · 0.3 · e^(−20·t)      t = i / fs
//! ```
//!
//! with `n()` uniform in `[−1, 1)`, `D` the room's density and the length
//! `round(fs · T)` for reverb time `T`. Rooms are synthesized once when
//! the engine initializes and never change afterwards.

use lustre_config::Room;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ImpulseSeed;

/// Early reflections last this long.
const EARLY_WINDOW_S: f32 = 0.05;
const EARLY_LEVEL: f32 = 0.3;
const EARLY_DECAY: f32 = 20.0;

/// Fixed acoustic description of a room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomAcoustics {
    /// Impulse length in seconds
    pub reverb_time: f32,
    /// Exponential decay rate
    pub density: f32,
    /// Convolution send level
    pub wet: f32,
}

impl RoomAcoustics {
    /// Acoustics of `room`.
    pub const fn of(room: Room) -> Self {
        let (reverb_time, density, wet) = match room {
            Room::Studio => (0.3, 2.0, 0.10),
            Room::Analog => (0.8, 3.0, 0.15),
            Room::Concert => (2.5, 1.5, 0.30),
            Room::Club => (1.2, 2.5, 0.20),
            Room::Theater => (1.8, 2.0, 0.25),
            Room::Open => (0.5, 6.0, 0.05),
        };
        Self {
            reverb_time,
            density,
            wet,
        }
    }

    /// Impulse length in frames at `sample_rate`.
    pub fn frames(&self, sample_rate: f32) -> usize {
        (sample_rate * self.reverb_time).round() as usize
    }
}

/// A synthesized stereo impulse response.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomImpulse {
    /// Room it was synthesized for
    pub room: Room,
    /// Left channel
    pub left: Vec<f32>,
    /// Right channel
    pub right: Vec<f32>,
}

impl RoomImpulse {
    /// Length in frames.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Whether the impulse is empty.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// Generates room impulses from one random stream.
#[derive(Debug)]
pub struct ImpulseSynthesizer {
    rng: StdRng,
}

impl ImpulseSynthesizer {
    /// Create a synthesizer. [`ImpulseSeed::Fixed`] gives reproducible rooms.
    pub fn new(seed: ImpulseSeed) -> Self {
        let rng = match seed {
            ImpulseSeed::Entropy => StdRng::from_entropy(),
            ImpulseSeed::Fixed(seed) => StdRng::seed_from_u64(seed),
        };
        Self { rng }
    }

    /// Synthesize one room.
    pub fn synthesize(&mut self, room: Room, sample_rate: f32) -> RoomImpulse {
        let acoustics = RoomAcoustics::of(room);
        let frames = acoustics.frames(sample_rate);
        let mut channel = || {
            (0..frames)
                .map(|i| {
                    let t = i as f32 / sample_rate;
                    let mut sample = self.noise() * (-acoustics.density * t).exp();
                    if t < EARLY_WINDOW_S {
                        sample += self.noise() * EARLY_LEVEL * (-EARLY_DECAY * t).exp();
                    }
                    sample
                })
                .collect::<Vec<f32>>()
        };
        let left = channel();
        let right = channel();
        RoomImpulse { room, left, right }
    }

    /// Synthesize every room, in [`Room::ALL`] order.
    pub fn synthesize_all(&mut self, sample_rate: f32) -> Vec<RoomImpulse> {
        Room::ALL
            .iter()
            .map(|&room| self.synthesize(room, sample_rate))
            .collect()
    }

    fn noise(&mut self) -> f32 {
        self.rng.gen_range(-1.0..1.0)
    }
}
