//! Single-source transform.

use crate::config::TranspileConfig;
use crate::error::TranspileResult;
use crate::grammar::typescript_grammar;
use core_types::Diagnostic;
use parser::{GrammarBuilder, ParseError, ParseOptions, Parser};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of transforming one source text.
///
/// Serializes as `{ "error": false, "code": "..." }` or
/// `{ "error": true, "diagnostic": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOutput {
    /// Whether the transform failed
    pub error: bool,
    /// Generated JavaScript, when successful
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// The most specific failure, when unsuccessful
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
}

impl TransformOutput {
    /// A successful transform.
    pub fn success(code: impl Into<String>) -> Self {
        Self {
            error: false,
            code: Some(code.into()),
            diagnostic: None,
        }
    }

    /// A failed transform.
    pub fn failure(diagnostic: Diagnostic) -> Self {
        Self {
            error: true,
            code: None,
            diagnostic: Some(diagnostic),
        }
    }
}

/// Compiled TypeScript-subset grammar.
///
/// Cloning is cheap; clones share the compiled matchers. Every transform
/// parses with its own cache.
#[derive(Debug, Clone)]
pub struct Transpiler {
    program: Parser,
    statement: Parser,
    options: ParseOptions,
}

impl Transpiler {
    /// Compiles the grammar.
    pub fn new(config: &TranspileConfig) -> TranspileResult<Self> {
        let g = GrammarBuilder::new();
        let grammar = typescript_grammar(&g);
        let program = g.compile(&grammar.program)?;
        let statement = g.compile(&grammar.statement)?;
        Ok(Self {
            program,
            statement,
            options: ParseOptions::default()
                .with_match_all(true)
                .with_memoize(config.memoize)
                .with_max_depth(config.max_depth),
        })
    }

    /// Transforms `source` into JavaScript.
    pub fn transform(&self, source: &str) -> TransformOutput {
        match self.program.parse_with(source, self.options) {
            Ok(success) => {
                debug!(bytes = source.len(), "transform succeeded");
                TransformOutput::success(success.value.flatten_text())
            }
            Err(ParseError::SequenceIncomplete { position }) => {
                let diagnostic = self.explain(source, position);
                debug!(%diagnostic, "transform failed");
                TransformOutput::failure(diagnostic)
            }
            Err(error) => TransformOutput::failure(error.to_diagnostic(source)),
        }
    }

    /// Re-parses the statement that stopped the program to find the most
    /// specific failure inside it.
    fn explain(&self, source: &str, position: usize) -> Diagnostic {
        let incomplete = ParseError::SequenceIncomplete { position };
        let Some(rest) = source.get(position..) else {
            return incomplete.to_diagnostic(source);
        };
        match self
            .statement
            .parse_with(rest, self.options.with_match_all(false))
        {
            Err(error) => error.shifted(position).to_diagnostic(source),
            Ok(_) => incomplete.to_diagnostic(source),
        }
    }
}

/// Transforms `source` with the default configuration.
pub fn transform(source: &str) -> TranspileResult<TransformOutput> {
    Ok(Transpiler::new(&TranspileConfig::default())?.transform(source))
}
