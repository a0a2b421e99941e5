//! # Runtime Errors
//!
//! Failures that originate in the runtime itself rather than in actor logic.
//! Domain crates map these into their own error types at the client boundary.

use std::time::Duration;

/// Errors that can occur while talking to an actor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}
