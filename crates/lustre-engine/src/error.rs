//! Engine error types.

use thiserror::Error;

/// Reasons the engine could not attach to a source.
///
/// Mutators never return these. An `init` failure leaves the engine
/// uninitialized and is kept for inspection via
/// [`Engine::last_error`](crate::Engine::last_error).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The render context could not be created
    #[error("render context unavailable: {0}")]
    ContextUnavailable(String),

    /// The source is already being processed by another engine
    #[error("source is already tapped by another engine")]
    SourceAlreadyTapped,

    /// The engine was destroyed
    #[error("engine has been destroyed")]
    AlreadyDestroyed,
}

impl EngineError {
    /// Create a context error.
    pub fn context(reason: impl Into<String>) -> Self {
        EngineError::ContextUnavailable(reason.into())
    }
}
