//! Render context: sample rate, block size and run state.
//!
//! The state lives in one atomic shared by the control side (resume,
//! close) and the renderer (checked at every block).

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::config::EngineConfig;
use crate::error::EngineError;

/// Whether the render context may produce audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ContextState {
    /// Waiting for `resume`; renders silence
    Suspended = 0,
    /// Processing audio
    Running = 1,
    /// Released; renders silence forever
    Closed = 2,
}

impl ContextState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ContextState::Suspended,
            1 => ContextState::Running,
            _ => ContextState::Closed,
        }
    }
}

/// Shared run state of a render context.
#[derive(Debug, Clone)]
pub(crate) struct StateCell(Arc<AtomicU8>);

impl StateCell {
    fn new(state: ContextState) -> Self {
        Self(Arc::new(AtomicU8::new(state as u8)))
    }

    pub(crate) fn get(&self) -> ContextState {
        ContextState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move `from` → `to`; returns whether the transition happened.
    fn transition(&self, from: ContextState, to: ContextState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn close(&self) {
        self.0.store(ContextState::Closed as u8, Ordering::Release);
    }
}

/// Control-side handle to the render context.
#[derive(Debug)]
pub struct RenderContext {
    sample_rate: f32,
    block_size: usize,
    state: StateCell,
}

impl RenderContext {
    /// Validate `config` and create a context.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let rate_range = EngineConfig::MIN_SAMPLE_RATE..=EngineConfig::MAX_SAMPLE_RATE;
        if !rate_range.contains(&config.sample_rate) {
            return Err(EngineError::context(format!(
                "sample rate {} Hz outside {}..={} Hz",
                config.sample_rate,
                EngineConfig::MIN_SAMPLE_RATE,
                EngineConfig::MAX_SAMPLE_RATE
            )));
        }
        if config.block_size == 0 || config.block_size > EngineConfig::MAX_BLOCK_SIZE {
            return Err(EngineError::context(format!(
                "block size {} outside 1..={}",
                config.block_size,
                EngineConfig::MAX_BLOCK_SIZE
            )));
        }

        let initial = if config.start_suspended {
            ContextState::Suspended
        } else {
            ContextState::Running
        };
        Ok(Self {
            sample_rate: config.sample_rate,
            block_size: config.block_size,
            state: StateCell::new(initial),
        })
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Frames per render block.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Current run state.
    pub fn state(&self) -> ContextState {
        self.state.get()
    }

    /// Start a suspended context. Returns whether the state changed.
    pub fn resume(&self) -> bool {
        self.state
            .transition(ContextState::Suspended, ContextState::Running)
    }

    /// Close the context. Irreversible.
    pub fn close(&self) {
        self.state.close();
    }

    pub(crate) fn state_cell(&self) -> StateCell {
        self.state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_config() {
        let config = EngineConfig::default().with_sample_rate(f32::NAN);
        assert!(matches!(
            RenderContext::new(&config),
            Err(EngineError::ContextUnavailable(_))
        ));
        let config = EngineConfig::default().with_block_size(0);
        assert!(RenderContext::new(&config).is_err());
    }

    #[test]
    fn test_resume_is_idempotent() {
        let context = RenderContext::new(&EngineConfig::default().suspended(true)).unwrap();
        assert_eq!(context.state(), ContextState::Suspended);
        assert!(context.resume());
        assert!(!context.resume());
        assert_eq!(context.state(), ContextState::Running);
    }

    #[test]
    fn test_closed_cannot_resume() {
        let context = RenderContext::new(&EngineConfig::default().suspended(true)).unwrap();
        let shared = context.state_cell();
        context.close();
        assert!(!context.resume());
        assert_eq!(shared.get(), ContextState::Closed);
    }
}
