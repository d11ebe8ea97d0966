//! Matching engine.
//!
//! Runs compiled matchers over input text. Matching is synchronous and
//! single-threaded; every failure is returned as a [`ParseError`] value.
//! Each top-level call owns a fresh [`MemoCache`].

use crate::cache::{CacheStats, MemoCache};
use crate::compiler::{Matcher, Op};
use crate::error::ParseError;
use crate::registry::RuleTable;
use core_types::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// A successful match.
#[derive(Debug, Clone, PartialEq)]
pub struct Success {
    /// Reshaped value of the match
    pub value: Value,
    /// Bytes consumed from the match position
    pub consumed: usize,
}

impl Success {
    /// Creates a success value.
    pub fn new(value: Value, consumed: usize) -> Self {
        Self { value, consumed }
    }

    /// The result of a nullable node that did not match.
    pub fn empty() -> Self {
        Self::new(Value::Null, 0)
    }
}

/// Outcome of matching a node at a position.
pub type ParseResult = Result<Success, ParseError>;

/// Default limit on nested rule entries in one parse.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options for one top-level parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Require the root to consume the whole input
    pub match_all: bool,
    /// Read and write the memoization cache
    pub memoize: bool,
    /// Maximum number of named rules entered at once before the parse is
    /// abandoned with [`ParseError::DepthExceeded`]
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            match_all: false,
            memoize: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Sets full-input matching.
    pub fn with_match_all(mut self, match_all: bool) -> Self {
        self.match_all = match_all;
        self
    }

    /// Enables or disables memoization.
    pub fn with_memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    /// Sets the rule nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Result of a parse together with cache counters.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseReport {
    /// The parse result
    pub result: ParseResult,
    /// Cache counters for this parse
    pub stats: CacheStats,
}

/// Per-invocation matching state.
struct ParseState<'i> {
    input: &'i str,
    cache: MemoCache,
    depth: usize,
    max_depth: usize,
}

/// A compiled grammar, ready to parse input.
///
/// Parsers are immutable and can be shared between threads. Every call to a
/// parse method starts from offset 0 with an empty cache.
#[derive(Debug, Clone)]
pub struct Parser {
    root: Arc<Matcher>,
    rules: Arc<RuleTable>,
}

impl Parser {
    pub(crate) fn new(root: Matcher, rules: Arc<RuleTable>) -> Self {
        Self {
            root: Arc::new(root),
            rules,
        }
    }

    /// Parses a prefix of `input` with default options.
    pub fn parse(&self, input: &str) -> ParseResult {
        self.parse_with(input, ParseOptions::default())
    }

    /// Parses `input`, requiring that all of it is consumed.
    pub fn parse_all(&self, input: &str) -> ParseResult {
        self.parse_with(input, ParseOptions::default().with_match_all(true))
    }

    /// Parses `input` with the given options.
    pub fn parse_with(&self, input: &str, options: ParseOptions) -> ParseResult {
        self.parse_detailed(input, options).result
    }

    /// Parses `input` and reports cache counters alongside the result.
    pub fn parse_detailed(&self, input: &str, options: ParseOptions) -> ParseReport {
        let cache = if options.memoize {
            MemoCache::new()
        } else {
            MemoCache::disabled()
        };
        let mut state = ParseState {
            input,
            cache,
            depth: 0,
            max_depth: options.max_depth,
        };

        let mut result = self.root.run(&self.rules, &mut state, 0);
        if options.match_all {
            if let Ok(success) = &result {
                if success.consumed < input.len() {
                    result = Err(ParseError::SequenceIncomplete {
                        position: success.consumed,
                    });
                }
            }
        }

        let stats = state.cache.stats();
        trace!(
            input_len = input.len(),
            ok = result.is_ok(),
            hits = stats.hits,
            misses = stats.misses,
            "parse finished"
        );
        ParseReport { result, stats }
    }

    /// Wraps the parser as a plain function of the input.
    pub fn into_fn(self, options: ParseOptions) -> impl Fn(&str) -> ParseResult {
        move |input| self.parse_with(input, options)
    }
}

impl Matcher {
    /// Invokes the matcher. Terminals consult the cache themselves.
    fn run(&self, rules: &RuleTable, state: &mut ParseState<'_>, pos: usize) -> ParseResult {
        if self.is_terminal() {
            self.memoized(rules, state, pos)
        } else {
            self.evaluate(rules, state, pos)
        }
    }

    /// Looks up (id, position) before evaluating, and stores the result after.
    fn memoized(&self, rules: &RuleTable, state: &mut ParseState<'_>, pos: usize) -> ParseResult {
        if let Some(result) = state.cache.get(self.id, pos) {
            return result;
        }
        let result = self.evaluate(rules, state, pos);
        state.cache.insert(self.id, pos, result.clone());
        result
    }

    fn evaluate(&self, rules: &RuleTable, state: &mut ParseState<'_>, pos: usize) -> ParseResult {
        let result = match &self.op {
            Op::Literal(text) => self.match_literal(text, state.input, pos),
            Op::Pattern { regex, .. } => self.match_pattern(regex, state.input, pos),
            Op::Sequence { children, captures } => {
                self.match_sequence(children, *captures, rules, state, pos)
            }
            Op::Choice(alternatives) => self.match_choice(alternatives, rules, state, pos),
            Op::Repeat(child) => self.match_repeat(child, rules, state, pos),
            Op::Symbol { name, slot } => self.match_symbol(name, *slot, rules, state, pos),
        };
        match result {
            Err(error) if self.nullable && !error.is_fatal() => Ok(Success::empty()),
            other => other,
        }
    }

    fn apply_reshape(&self, value: Value) -> Value {
        match &self.reshape {
            Some(reshape) => reshape(value),
            None => value,
        }
    }

    fn terminal_success(&self, text: &str) -> ParseResult {
        Ok(Success::new(
            self.apply_reshape(Value::Text(text.to_string())),
            text.len(),
        ))
    }

    fn unmatched(&self, pos: usize) -> ParseResult {
        Err(ParseError::TerminalUnmatched {
            position: pos,
            expected: self.describe(),
        })
    }

    fn match_literal(&self, text: &str, input: &str, pos: usize) -> ParseResult {
        if input[pos..].starts_with(text) {
            self.terminal_success(text)
        } else {
            self.unmatched(pos)
        }
    }

    fn match_pattern(&self, regex: &regex::Regex, input: &str, pos: usize) -> ParseResult {
        let rest = &input[pos..];
        match regex.find(rest) {
            Some(found) => self.terminal_success(&rest[..found.end()]),
            None => self.unmatched(pos),
        }
    }

    fn match_sequence(
        &self,
        children: &[Matcher],
        captures: bool,
        rules: &RuleTable,
        state: &mut ParseState<'_>,
        pos: usize,
    ) -> ParseResult {
        let mut cursor = pos;
        let mut fields = BTreeMap::new();
        for child in children {
            match child.memoized(rules, state, cursor) {
                Ok(success) => {
                    if let Some(key) = &child.capture {
                        fields.insert(key.clone(), success.value);
                    }
                    cursor += success.consumed;
                }
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => {
                    return Err(ParseError::SequenceStopped {
                        position: cursor,
                        cause: Box::new(error),
                    })
                }
            }
        }

        let value = if captures {
            Value::Object(fields)
        } else {
            Value::Text(state.input[pos..cursor].to_string())
        };
        Ok(Success::new(self.apply_reshape(value), cursor - pos))
    }

    fn match_choice(
        &self,
        alternatives: &[Matcher],
        rules: &RuleTable,
        state: &mut ParseState<'_>,
        pos: usize,
    ) -> ParseResult {
        let mut errors = Vec::with_capacity(alternatives.len());
        for alternative in alternatives {
            match alternative.memoized(rules, state, pos) {
                Ok(success) => {
                    return Ok(Success::new(
                        self.apply_reshape(success.value),
                        success.consumed,
                    ))
                }
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => errors.push(error),
            }
        }
        Err(ParseError::ChoiceExhausted {
            position: pos,
            alternatives: errors,
        })
    }

    fn match_repeat(
        &self,
        child: &Matcher,
        rules: &RuleTable,
        state: &mut ParseState<'_>,
        pos: usize,
    ) -> ParseResult {
        let mut cursor = pos;
        let mut items = Vec::new();
        loop {
            match child.run(rules, state, cursor) {
                // zero-width successes would repeat forever
                Ok(success) if success.consumed == 0 => break,
                Ok(success) => {
                    items.push(success.value);
                    cursor += success.consumed;
                }
                Err(error) if error.is_fatal() => return Err(error),
                Err(_) => break,
            }
        }
        Ok(Success::new(
            self.apply_reshape(Value::List(items)),
            cursor - pos,
        ))
    }

    fn match_symbol(
        &self,
        name: &str,
        slot: Option<crate::registry::SymbolId>,
        rules: &RuleTable,
        state: &mut ParseState<'_>,
        pos: usize,
    ) -> ParseResult {
        let Some(rule) = slot.and_then(|id| rules.get(id)) else {
            return Err(ParseError::SymbolUnresolved {
                name: name.to_string(),
            });
        };
        if state.depth >= state.max_depth {
            debug!(
                rule = rules_name(rules, slot),
                pos,
                limit = state.max_depth,
                "nesting limit reached"
            );
            return Err(ParseError::DepthExceeded {
                position: pos,
                limit: state.max_depth,
            });
        }
        trace!(rule = rules_name(rules, slot), pos, depth = state.depth, "enter rule");
        state.depth += 1;
        let result = rule.run(rules, state, pos);
        state.depth -= 1;
        result.map(|success| Success::new(self.apply_reshape(success.value), success.consumed))
    }
}

fn rules_name(rules: &RuleTable, slot: Option<crate::registry::SymbolId>) -> &str {
    slot.map(|id| rules.name(id)).unwrap_or("?")
}
