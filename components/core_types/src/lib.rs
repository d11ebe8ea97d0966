//! Core value, position, and diagnostic types shared by the transpiler components.
//!
//! # Overview
//!
//! - [`Value`] - Dynamic value produced by grammar reshapes and captures
//! - [`SourcePosition`] - Source code location
//! - [`Diagnostic`] - Structured, user-visible failure report
//! - [`DiagnosticKind`] - Category of a diagnostic
//!
//! # Examples
//!
//! ```
//! use core_types::{Diagnostic, DiagnosticKind, SourcePosition, Value};
//!
//! let value = Value::from("x");
//! assert_eq!(value.as_text(), Some("x"));
//!
//! let diagnostic = Diagnostic::new(DiagnosticKind::Syntax, "unexpected input")
//!     .at(SourcePosition::from_offset("let", 3));
//! assert_eq!(diagnostic.position.unwrap().column, 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod diagnostic;
mod source;
mod value;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use source::SourcePosition;
pub use value::Value;
