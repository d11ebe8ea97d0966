//! Dispatch error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Serialized description of a failure raised inside an execution context.
///
/// This is what travels back in an error response. It keeps the failure's
/// category and message so the caller can re-raise it meaningfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{name}: {message}")]
pub struct Failure {
    /// Failure category, e.g. `"UnknownCommand"` or `"Panic"`
    pub name: String,
    /// Human-readable description
    pub message: String,
}

impl Failure {
    /// Creates a failure description.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Describes an arbitrary error value.
    pub fn from_error(error: &dyn std::error::Error) -> Self {
        Self::new("Error", error.to_string())
    }
}

/// Errors surfaced to callers of the dispatch protocol.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The remote implementation rejected the call
    #[error("remote call failed: {0}")]
    Remote(Failure),

    /// The execution context went away before answering
    #[error("execution context disconnected")]
    Disconnected,

    /// A message could not be serialized
    #[error("failed to encode message: {0}")]
    Encode(String),

    /// A message did not follow the wire format
    #[error("malformed message: {0}")]
    Decode(String),

    /// A pool was requested with zero contexts
    #[error("worker pool needs at least one execution context")]
    EmptyPool,

    /// The operating system refused to start a context thread
    #[error("failed to spawn execution context: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Result type for dispatch operations
pub type DispatchResult<T> = Result<T, DispatchError>;
