//! Parser-combinator runtime
//!
//! Grammars are assembled from five node kinds (terminal, sequence, ordered
//! choice, repetition, symbolic reference) and compiled into matchers that
//! run directly over input text with packrat memoization.
//!
//! # Overview
//!
//! - [`GrammarBuilder`] - Constructs nodes and registers named rules
//! - [`Node`] - Grammar node model
//! - [`Parser`] - Compiled grammar; each parse uses a fresh [`MemoCache`]
//! - [`ParseError`] - Structural match failures, returned as values
//! - [`GrammarError`] - Problems in the grammar itself
//!
//! # Example
//!
//! ```
//! use core_types::Value;
//! use parser::{GrammarBuilder, ParseError};
//!
//! let g = GrammarBuilder::new();
//! let pair = g.sequence([
//!     g.literal("x").with_capture("a"),
//!     g.literal("y").with_capture("b"),
//! ]);
//! let parser = g.compile(&pair).unwrap();
//!
//! let success = parser.parse("xy").unwrap();
//! assert_eq!(success.value.get("a"), Some(&Value::from("x")));
//! assert_eq!(success.consumed, 2);
//!
//! assert!(matches!(
//!     parser.parse("xz"),
//!     Err(ParseError::SequenceStopped { position: 1, .. })
//! ));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod cache;
pub mod compiler;
pub mod engine;
pub mod error;
pub mod node;
pub mod registry;

pub use builder::GrammarBuilder;
pub use cache::{CacheStats, MemoCache};
pub use compiler::{compile, Compiler};
pub use engine::{ParseOptions, DEFAULT_MAX_DEPTH, ParseReport, ParseResult, Parser, Success};
pub use error::{GrammarError, ParseError};
pub use node::{Node, NodeId, NodeKind, Pattern, Reshape};
pub use registry::{SymbolId, SymbolRegistry};
