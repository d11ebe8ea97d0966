//! TypeScript-subset transpiler
//!
//! Strips type syntax from a TypeScript subset and emits JavaScript. The
//! grammar is built with the `parser` crate; batch compilation fans units
//! out over a `dispatch` worker pool.
//!
//! # Example
//!
//! ```
//! use transpiler::{Transpiler, TranspileConfig};
//!
//! let transpiler = Transpiler::new(&TranspileConfig::default()).unwrap();
//! let output = transpiler.transform("const answer: number = 42;");
//! assert!(!output.error);
//! assert_eq!(output.code.as_deref(), Some("const answer = 42;\n"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod config;
pub mod error;
pub mod grammar;
pub mod transform;

pub use batch::{compile_batch, worker_implementation, BatchCompiler, CompileUnit, TRANSFORM_COMMAND};
pub use config::TranspileConfig;
pub use error::{TranspileError, TranspileResult};
pub use grammar::{typescript_grammar, TypeScriptGrammar};
pub use transform::{transform, TransformOutput, Transpiler};
