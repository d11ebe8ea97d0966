//! Parse error taxonomy and grammar configuration errors.
//!
//! [`ParseError`] values are returned as data by every matcher. Parents decide
//! whether to recover (nullable nodes, choice alternatives) or re-wrap
//! (sequence, choice). [`GrammarError`] reports a broken grammar at compile time.

use core_types::{Diagnostic, DiagnosticKind, SourcePosition};
use thiserror::Error;

/// Structural match failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A terminal's anchored pattern did not match the remaining input
    #[error("expected {expected} at offset {position}")]
    TerminalUnmatched {
        /// Byte offset of the attempt
        position: usize,
        /// Description of the pattern
        expected: String,
    },

    /// A sequence child failed; the sequence stopped without backtracking
    #[error("sequence stopped at offset {position}: {cause}")]
    SequenceStopped {
        /// Byte offset where the failing child was attempted
        position: usize,
        /// The failing child's error
        cause: Box<ParseError>,
    },

    /// Full-input matching was requested but input remains
    #[error("unconsumed input at offset {position}")]
    SequenceIncomplete {
        /// Byte offset of the first unconsumed byte
        position: usize,
    },

    /// Every alternative of an ordered choice failed
    #[error("no alternative matched at offset {position}")]
    ChoiceExhausted {
        /// Byte offset shared by all alternatives
        position: usize,
        /// Each alternative's error, in trial order
        alternatives: Vec<ParseError>,
    },

    /// Input nests named rules deeper than the parse allows. Fatal like
    /// [`SymbolUnresolved`](Self::SymbolUnresolved), but reported as a
    /// syntax diagnostic.
    #[error("nesting exceeds {limit} rules at offset {position}")]
    DepthExceeded {
        /// Byte offset of the rule entry that went over the limit
        position: usize,
        /// The configured limit
        limit: usize,
    },

    /// A reference names a rule that was never defined. Fatal: nothing recovers from it.
    #[error("rule `{name}` is not defined")]
    SymbolUnresolved {
        /// The referenced rule name
        name: String,
    },
}

impl ParseError {
    /// Byte offset of the failure, if it has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::TerminalUnmatched { position, .. }
            | ParseError::SequenceStopped { position, .. }
            | ParseError::SequenceIncomplete { position }
            | ParseError::ChoiceExhausted { position, .. }
            | ParseError::DepthExceeded { position, .. } => Some(*position),
            ParseError::SymbolUnresolved { .. } => None,
        }
    }

    /// Whether this error abandons the whole parse. Nullable nodes, choices
    /// and repetitions pass it through unchanged.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ParseError::SymbolUnresolved { .. } | ParseError::DepthExceeded { .. }
        )
    }

    /// Short name of the error kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParseError::TerminalUnmatched { .. } => "TerminalUnmatched",
            ParseError::SequenceStopped { .. } => "SequenceStopped",
            ParseError::SequenceIncomplete { .. } => "SequenceIncomplete",
            ParseError::ChoiceExhausted { .. } => "ChoiceExhausted",
            ParseError::DepthExceeded { .. } => "DepthExceeded",
            ParseError::SymbolUnresolved { .. } => "SymbolUnresolved",
        }
    }

    /// Returns the most specific failure in the error tree.
    ///
    /// Sequence errors descend into their cause. Choice errors pick the
    /// alternative whose deepest failure lies furthest into the input, the
    /// earliest alternative winning ties.
    pub fn deepest(&self) -> &ParseError {
        match self {
            ParseError::SequenceStopped { cause, .. } => cause.deepest(),
            ParseError::ChoiceExhausted { alternatives, .. } => {
                let mut best: Option<&ParseError> = None;
                for alternative in alternatives {
                    let candidate = alternative.deepest();
                    let further = match best {
                        None => true,
                        Some(current) => depth_key(candidate) > depth_key(current),
                    };
                    if further {
                        best = Some(candidate);
                    }
                }
                best.unwrap_or(self)
            }
            _ => self,
        }
    }

    /// Collects the descriptions of every terminal that failed at `position`,
    /// deduplicated, in the order they were tried.
    pub fn expected_at(&self, position: usize) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_expected(position, &mut out);
        out
    }

    fn collect_expected(&self, at: usize, out: &mut Vec<String>) {
        match self {
            ParseError::TerminalUnmatched { position, expected } => {
                if *position == at && !out.contains(expected) {
                    out.push(expected.clone());
                }
            }
            ParseError::SequenceStopped { cause, .. } => cause.collect_expected(at, out),
            ParseError::ChoiceExhausted { alternatives, .. } => {
                for alternative in alternatives {
                    alternative.collect_expected(at, out);
                }
            }
            ParseError::SequenceIncomplete { .. }
            | ParseError::DepthExceeded { .. }
            | ParseError::SymbolUnresolved { .. } => {}
        }
    }

    /// Returns a copy with every position moved forward by `offset`.
    ///
    /// Used when a slice of a larger input was parsed on its own.
    pub fn shifted(&self, offset: usize) -> ParseError {
        match self {
            ParseError::TerminalUnmatched { position, expected } => ParseError::TerminalUnmatched {
                position: position + offset,
                expected: expected.clone(),
            },
            ParseError::SequenceStopped { position, cause } => ParseError::SequenceStopped {
                position: position + offset,
                cause: Box::new(cause.shifted(offset)),
            },
            ParseError::SequenceIncomplete { position } => ParseError::SequenceIncomplete {
                position: position + offset,
            },
            ParseError::ChoiceExhausted {
                position,
                alternatives,
            } => ParseError::ChoiceExhausted {
                position: position + offset,
                alternatives: alternatives.iter().map(|a| a.shifted(offset)).collect(),
            },
            ParseError::DepthExceeded { position, limit } => ParseError::DepthExceeded {
                position: position + offset,
                limit: *limit,
            },
            ParseError::SymbolUnresolved { .. } => self.clone(),
        }
    }

    /// Builds the user-visible diagnostic for this error against `source`.
    pub fn to_diagnostic(&self, source: &str) -> Diagnostic {
        let leaf = self.deepest();
        match leaf {
            ParseError::SymbolUnresolved { name } => Diagnostic::new(
                DiagnosticKind::Configuration,
                format!("grammar rule `{}` is not defined", name),
            ),
            ParseError::SequenceIncomplete { position } => Diagnostic::new(
                DiagnosticKind::Incomplete,
                format!("unexpected {}", describe_input(source, *position)),
            )
            .at(SourcePosition::from_offset(source, *position)),
            ParseError::DepthExceeded { position, limit } => Diagnostic::new(
                DiagnosticKind::Syntax,
                format!("nesting too deep (more than {} levels)", limit),
            )
            .at(SourcePosition::from_offset(source, *position)),
            _ => {
                let position = leaf.position().unwrap_or(0);
                Diagnostic::new(
                    DiagnosticKind::Syntax,
                    format!("unexpected {}", describe_input(source, position)),
                )
                .at(SourcePosition::from_offset(source, position))
                .expecting(self.expected_at(position))
            }
        }
    }
}

fn depth_key(error: &ParseError) -> usize {
    error.position().unwrap_or(usize::MAX)
}

fn describe_input(source: &str, position: usize) -> String {
    match source.get(position..).and_then(|rest| rest.chars().next()) {
        Some(c) => format!("{:?}", c),
        None => "end of input".to_string(),
    }
}

/// Errors in the grammar itself, reported before any input is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// The same rule name was given two bodies
    #[error("rule `{0}` is defined more than once")]
    DuplicateRule(String),

    /// A regex terminal failed to compile
    #[error("invalid pattern /{pattern}/: {message}")]
    InvalidPattern {
        /// The regex source
        pattern: String,
        /// The regex engine's description of the problem
        message: String,
    },
}
