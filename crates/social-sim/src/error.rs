//! Error types shared by every domain actor.
//!
//! Each actor resolves its own preconditions and answers with a
//! [`DomainError`]; the engine adds nothing beyond
//! [`DomainError::Unavailable`] and [`DomainError::Timeout`].

use actor_runtime::RuntimeError;
use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Errors that can occur during domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// An entity id or name is unknown.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate name, id or membership.
    #[error("{0}")]
    Conflict(String),

    /// Author or creator mismatch.
    #[error("{0}")]
    Unauthorized(String),

    /// Malformed request fields.
    #[error("{0}")]
    Invalid(String),

    /// A cross-actor call exceeded its deadline.
    #[error("{0}")]
    Timeout(String),

    /// The target actor is gone or unknown.
    #[error("{0}")]
    Unavailable(String),

    /// A child deletion failed, so the parent was left untouched.
    #[error("Failed to delete {stage}: {source}")]
    CascadeFailed {
        stage: &'static str,
        source: Box<DomainError>,
    },
}

pub const ACTOR_UNAVAILABLE: &str = "Actor unavailable";
pub const REQUEST_TIMEOUT: &str = "Request timeout";

impl DomainError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        Self::Conflict(what.into())
    }

    pub fn unauthorized(what: impl Into<String>) -> Self {
        Self::Unauthorized(what.into())
    }

    pub fn invalid(what: impl Into<String>) -> Self {
        Self::Invalid(what.into())
    }

    pub fn cascade(stage: &'static str, source: DomainError) -> Self {
        Self::CascadeFailed {
            stage,
            source: Box::new(source),
        }
    }

    /// True for timeouts, including ones wrapped by a failed cascade.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::CascadeFailed { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}

impl From<RuntimeError> for DomainError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::Timeout(_) => Self::Timeout(REQUEST_TIMEOUT.to_string()),
            RuntimeError::ActorClosed | RuntimeError::ActorDropped => {
                Self::Unavailable(ACTOR_UNAVAILABLE.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cascade_error_message() {
        let err = DomainError::cascade(
            "comments",
            DomainError::from(RuntimeError::Timeout(Duration::from_secs(5))),
        );
        assert_eq!(err.to_string(), "Failed to delete comments: Request timeout");
        assert!(err.is_timeout());
    }

    #[test]
    fn test_runtime_errors_map_to_unavailable() {
        assert_eq!(
            DomainError::from(RuntimeError::ActorClosed),
            DomainError::Unavailable(ACTOR_UNAVAILABLE.to_string())
        );
    }
}
