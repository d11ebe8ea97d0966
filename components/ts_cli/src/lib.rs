//! TypeScript-subset transpiler CLI library
//!
//! Argument parsing and the [`Runner`] that reads sources, transforms them and
//! writes the results.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;
pub mod runner;

pub use cli::Cli;
pub use error::{CliError, CliResult};
pub use runner::{Report, Runner, STDIN_NAME};
