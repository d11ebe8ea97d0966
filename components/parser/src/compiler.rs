//! Parser compiler.
//!
//! Transforms a grammar node tree into a tree of [`Matcher`]s. Regex
//! terminals are compiled here, once. Named rules are compiled into a slot
//! arena whose placeholders exist before any body compiles, so cyclic
//! references resolve at parse time.

use crate::engine::Parser;
use crate::error::GrammarError;
use crate::node::{Node, NodeId, NodeKind, Pattern, Reshape};
use crate::registry::{RuleTable, SymbolId, SymbolRegistry};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Compiled form of a grammar node.
pub(crate) struct Matcher {
    pub(crate) id: NodeId,
    pub(crate) capture: Option<String>,
    pub(crate) nullable: bool,
    pub(crate) reshape: Option<Reshape>,
    pub(crate) op: Op,
}

/// What a matcher does at a position.
pub(crate) enum Op {
    Literal(String),
    Pattern { regex: Regex, source: String },
    Sequence { children: Vec<Matcher>, captures: bool },
    Choice(Vec<Matcher>),
    Repeat(Box<Matcher>),
    Symbol { name: String, slot: Option<SymbolId> },
}

impl Matcher {
    /// Description of a terminal for diagnostics.
    pub(crate) fn describe(&self) -> String {
        match &self.op {
            Op::Literal(text) => Pattern::Literal(text.clone()).describe(),
            Op::Pattern { source, .. } => Pattern::Regex(source.clone()).describe(),
            Op::Sequence { .. } => "sequence".to_string(),
            Op::Choice(_) => "choice".to_string(),
            Op::Repeat(_) => "repetition".to_string(),
            Op::Symbol { name, .. } => name.clone(),
        }
    }

    pub(crate) fn is_terminal(&self) -> bool {
        matches!(self.op, Op::Literal(_) | Op::Pattern { .. })
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("id", &self.id)
            .field("op", &self.describe())
            .field("nullable", &self.nullable)
            .finish()
    }
}

/// Compiles nodes against a registry.
pub struct Compiler<'r> {
    registry: &'r SymbolRegistry,
    patterns: HashMap<String, Regex>,
}

impl<'r> Compiler<'r> {
    /// Creates a compiler resolving references through `registry`.
    pub fn new(registry: &'r SymbolRegistry) -> Self {
        Self {
            registry,
            patterns: HashMap::new(),
        }
    }

    /// Compiles every defined rule, then `root`.
    pub fn compile(mut self, root: &Node) -> Result<Parser, GrammarError> {
        let rules = RuleTable::with_placeholders(self.registry);
        let registry = self.registry;
        for (id, name, body) in registry.entries() {
            let Some(body) = body else {
                debug!(rule = name, "rule declared without a body");
                continue;
            };
            let matcher = self.compile_node(body)?;
            if !rules.install(id, matcher) {
                return Err(GrammarError::DuplicateRule(name.to_string()));
            }
        }
        let root = self.compile_node(root)?;
        debug!(
            rules = rules.installed(),
            patterns = self.patterns.len(),
            "compiled grammar"
        );
        Ok(Parser::new(root, Arc::new(rules)))
    }

    fn compile_node(&mut self, node: &Node) -> Result<Matcher, GrammarError> {
        let op = match node.kind() {
            NodeKind::Terminal(Pattern::Literal(text)) => Op::Literal(text.clone()),
            NodeKind::Terminal(Pattern::Regex(source)) => Op::Pattern {
                regex: self.anchored(source)?,
                source: source.clone(),
            },
            NodeKind::Sequence(children) => Op::Sequence {
                captures: children.iter().any(|child| child.capture().is_some()),
                children: self.compile_all(children)?,
            },
            NodeKind::Choice(alternatives) => Op::Choice(self.compile_all(alternatives)?),
            NodeKind::Repetition(child) => Op::Repeat(Box::new(self.compile_node(child)?)),
            NodeKind::SymbolRef(name) => Op::Symbol {
                name: name.clone(),
                slot: self.registry.lookup(name),
            },
        };
        Ok(Matcher {
            id: node.id(),
            capture: node.capture().map(str::to_string),
            nullable: node.is_nullable(),
            reshape: node.reshape().cloned(),
            op,
        })
    }

    fn compile_all(&mut self, nodes: &[Node]) -> Result<Vec<Matcher>, GrammarError> {
        nodes.iter().map(|node| self.compile_node(node)).collect()
    }

    /// Builds the regex anchored at the start of the remaining input.
    /// Identical sources share one compiled regex.
    fn anchored(&mut self, source: &str) -> Result<Regex, GrammarError> {
        if let Some(regex) = self.patterns.get(source) {
            return Ok(regex.clone());
        }
        let regex = RegexBuilder::new(&format!(r"\A(?:{})", source))
            .multi_line(true)
            .build()
            .map_err(|e| GrammarError::InvalidPattern {
                pattern: source.to_string(),
                message: e.to_string(),
            })?;
        self.patterns.insert(source.to_string(), regex.clone());
        Ok(regex)
    }
}

/// Compiles `root` with the rules in `registry` into a parser.
pub fn compile(registry: &SymbolRegistry, root: &Node) -> Result<Parser, GrammarError> {
    Compiler::new(registry).compile(root)
}
