//! User-visible diagnostics.
//!
//! A `Diagnostic` is the structured failure report handed back to callers of
//! the transform surface. It is plain data and serializes to JSON so a worker
//! context can return it across a channel.

use crate::SourcePosition;
use serde::{Deserialize, Serialize};

/// The category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// Input did not match the grammar
    Syntax,
    /// Input matched a prefix but full consumption was required
    Incomplete,
    /// The grammar itself is broken (unresolved rule, bad pattern)
    Configuration,
    /// A worker context failed to produce a result
    Dispatch,
    /// Reading or writing a file failed
    Io,
}

/// A structured failure report.
///
/// # Examples
///
/// ```
/// use core_types::{Diagnostic, DiagnosticKind};
///
/// let diagnostic = Diagnostic::new(DiagnosticKind::Syntax, "unexpected input");
/// assert_eq!(diagnostic.kind, DiagnosticKind::Syntax);
/// assert!(diagnostic.position.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// The category of failure
    pub kind: DiagnosticKind,
    /// Human-readable description
    pub message: String,
    /// Where the failure was detected, if it has a source location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<SourcePosition>,
    /// Descriptions of what would have been accepted at `position`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected: Vec<String>,
}

impl Diagnostic {
    /// Creates a diagnostic without position or expectations.
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: None,
            expected: Vec::new(),
        }
    }

    /// Attaches a source position.
    pub fn at(mut self, position: SourcePosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Attaches the list of expected inputs.
    pub fn expecting(mut self, expected: Vec<String>) -> Self {
        self.expected = expected;
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.position {
            Some(pos) => write!(f, "{}: {}", pos, self.message)?,
            None => write!(f, "{}", self.message)?,
        }
        if !self.expected.is_empty() {
            write!(f, " (expected {})", self.expected.join(" or "))?;
        }
        Ok(())
    }
}
