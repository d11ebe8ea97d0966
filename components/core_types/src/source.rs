//! Source position tracking for diagnostics.
//!
//! The matching engine works on byte offsets. Diagnostics shown to users
//! carry line and column numbers, computed on demand from the offset.

use serde::{Deserialize, Serialize};

/// Represents a position in source code.
///
/// # Examples
///
/// ```
/// use core_types::SourcePosition;
///
/// let pos = SourcePosition::from_offset("let x;\nlet y;", 11);
/// assert_eq!(pos.line, 2);
/// assert_eq!(pos.column, 5);
/// assert_eq!(pos.offset, 11);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePosition {
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed, counted in characters)
    pub column: u32,
    /// Byte offset from the start of the source text
    pub offset: usize,
}

impl SourcePosition {
    /// Computes the line and column for a byte offset into `source`.
    ///
    /// Offsets past the end are clamped to the end of the source. Offsets that
    /// fall inside a multi-byte character are clamped down to its start.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }

        let before = &source[..offset];
        let line = before.matches('\n').count() as u32 + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() as u32 + 1;

        Self {
            line,
            column,
            offset,
        }
    }
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
