//! Transpiler error types

use dispatch::DispatchError;
use parser::GrammarError;
use thiserror::Error;

/// Errors that prevent the transpiler from running at all.
///
/// Problems in the input source are never reported this way; they come back
/// as a failed [`TransformOutput`](crate::TransformOutput).
#[derive(Debug, Error)]
pub enum TranspileError {
    /// The built-in grammar failed to compile
    #[error("grammar error: {0}")]
    Grammar(#[from] GrammarError),

    /// The worker pool could not be started
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// A configuration file could not be read
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file is not valid JSON for [`TranspileConfig`](crate::TranspileConfig)
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for transpiler setup
pub type TranspileResult<T> = Result<T, TranspileError>;
