//! Error types for the CLI

use std::path::PathBuf;
use thiserror::Error;
use transpiler::TranspileError;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// A source file could not be read
    #[error("could not read '{}': {source}", path.display())]
    Read {
        /// The file
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// An output file could not be written
    #[error("could not write '{}': {source}", path.display())]
    Write {
        /// The file
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Two inputs would be written to the same output file
    #[error("'{first}' and '{second}' both write '{}'", path.display())]
    OutputClash {
        /// The shared output file
        path: PathBuf,
        /// Unit written first
        first: String,
        /// Unit that would overwrite it
        second: String,
    },

    /// The transpiler could not be set up
    #[error(transparent)]
    Transpile(#[from] TranspileError),

    /// Standard input or output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
