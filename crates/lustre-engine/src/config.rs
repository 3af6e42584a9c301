//! Host-facing engine configuration.

use serde::Deserialize;

/// Where the room impulse synthesizer gets its randomness.
///
/// Deserializes from an optional integer: absent means [`Entropy`](Self::Entropy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Option<u64>")]
pub enum ImpulseSeed {
    /// Fresh OS randomness; every engine gets slightly different rooms
    #[default]
    Entropy,
    /// Deterministic generator, identical rooms for identical seeds
    Fixed(u64),
}

impl From<Option<u64>> for ImpulseSeed {
    fn from(seed: Option<u64>) -> Self {
        seed.map_or(ImpulseSeed::Entropy, ImpulseSeed::Fixed)
    }
}

/// Engine configuration.
///
/// # TOML Format
///
/// ```toml
/// sample_rate = 44100
/// block_size = 256
/// start_suspended = false
/// seed = 7
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Render sample rate in Hz
    pub sample_rate: f32,
    /// Frames processed between parameter reads
    pub block_size: usize,
    /// Whether the context waits for [`Engine::resume`](crate::Engine::resume)
    pub start_suspended: bool,
    /// Impulse synthesis randomness
    pub seed: ImpulseSeed,
}

impl EngineConfig {
    /// Lowest accepted sample rate.
    pub const MIN_SAMPLE_RATE: f32 = 8000.0;
    /// Highest accepted sample rate.
    pub const MAX_SAMPLE_RATE: f32 = 384_000.0;
    /// Largest accepted render block.
    pub const MAX_BLOCK_SIZE: usize = 8192;

    /// Set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the render block size.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Start the render context suspended.
    pub fn suspended(mut self, start_suspended: bool) -> Self {
        self.start_suspended = start_suspended;
        self
    }

    /// Set the impulse seed.
    pub fn with_seed(mut self, seed: ImpulseSeed) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            block_size: 128,
            start_suspended: false,
            seed: ImpulseSeed::Entropy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_with_defaults() {
        let config: EngineConfig = toml::from_str("block_size = 256").unwrap();
        assert_eq!(config.block_size, 256);
        assert_eq!(config.sample_rate, 48000.0);
        assert_eq!(config.seed, ImpulseSeed::Entropy);
    }

    #[test]
    fn test_toml_full() {
        let config: EngineConfig = toml::from_str(
            "sample_rate = 44100\nblock_size = 64\nstart_suspended = true\nseed = 7\n",
        )
        .unwrap();
        assert_eq!(
            config,
            EngineConfig::default()
                .with_sample_rate(44100.0)
                .with_block_size(64)
                .suspended(true)
                .with_seed(ImpulseSeed::Fixed(7))
        );
    }
}
