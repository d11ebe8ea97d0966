//! Grammar builder.
//!
//! Factory methods that construct grammar nodes. The builder takes `&self`
//! everywhere so nested construction reads naturally:
//!
//! ```
//! use parser::GrammarBuilder;
//!
//! let g = GrammarBuilder::new();
//! let paren = g.symbol("paren", |g| {
//!     g.sequence([
//!         g.literal("("),
//!         g.choice([g.reference("paren"), g.literal("1")]),
//!         g.literal(")"),
//!     ])
//! });
//! let parser = g.compile(&paren).unwrap();
//! assert!(parser.parse("((1))").is_ok());
//! ```

use crate::compiler;
use crate::engine::Parser;
use crate::error::GrammarError;
use crate::node::{Node, NodeKind, Pattern};
use crate::registry::SymbolRegistry;
use std::cell::RefCell;
use std::collections::HashMap;

/// Constructs grammar nodes and owns the rule registry.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    literals: RefCell<HashMap<String, Node>>,
    registry: RefCell<SymbolRegistry>,
    errors: RefCell<Vec<GrammarError>>,
}

impl GrammarBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a terminal node.
    ///
    /// Identical literal patterns share one node; regex terminals are always new.
    pub fn terminal(&self, pattern: Pattern) -> Node {
        match pattern {
            Pattern::Literal(text) => {
                let mut literals = self.literals.borrow_mut();
                literals
                    .entry(text)
                    .or_insert_with_key(|text| {
                        Node::new(NodeKind::Terminal(Pattern::Literal(text.clone())))
                    })
                    .clone()
            }
            regex @ Pattern::Regex(_) => Node::new(NodeKind::Terminal(regex)),
        }
    }

    /// Creates a literal terminal.
    pub fn literal(&self, text: &str) -> Node {
        self.terminal(Pattern::Literal(text.to_string()))
    }

    /// Creates a regex terminal. The pattern is validated when the grammar compiles.
    pub fn regex(&self, source: &str) -> Node {
        self.terminal(Pattern::Regex(source.to_string()))
    }

    /// Creates a sequence node.
    ///
    /// Runs of adjacent plain literal children are merged into one literal.
    pub fn sequence(&self, children: impl IntoIterator<Item = Node>) -> Node {
        let mut merged: Vec<Node> = Vec::new();
        for child in children {
            let joined = match (merged.last().and_then(Node::plain_literal), child.plain_literal()) {
                (Some(prev), Some(next)) => Some(format!("{}{}", prev, next)),
                _ => None,
            };
            match joined {
                Some(text) => {
                    merged.pop();
                    merged.push(self.literal(&text));
                }
                None => merged.push(child),
            }
        }
        Node::new(NodeKind::Sequence(merged))
    }

    /// Creates an ordered choice node.
    pub fn choice(&self, alternatives: impl IntoIterator<Item = Node>) -> Node {
        Node::new(NodeKind::Choice(alternatives.into_iter().collect()))
    }

    /// Creates a repetition node (zero or more, greedy).
    pub fn repetition(&self, child: Node) -> Node {
        Node::new(NodeKind::Repetition(child))
    }

    /// Creates a reference to a named rule without defining it.
    pub fn reference(&self, name: &str) -> Node {
        Node::new(NodeKind::SymbolRef(name.to_string()))
    }

    /// Declares a rule so references to it resolve once it is defined.
    pub fn declare(&self, name: &str) {
        self.registry.borrow_mut().declare(name);
    }

    /// Installs the body of a named rule.
    ///
    /// Defining a rule twice is recorded and reported by [`compile`](Self::compile).
    pub fn define(&self, name: &str, body: Node) {
        let defined = self.registry.borrow_mut().define(name, body);
        if !defined {
            self.errors
                .borrow_mut()
                .push(GrammarError::DuplicateRule(name.to_string()));
        }
    }

    /// Defines a named rule and returns a reference to it.
    ///
    /// The rule is declared before `body` runs, so the body may refer to the
    /// rule itself.
    pub fn symbol<F>(&self, name: &str, body: F) -> Node
    where
        F: FnOnce(&Self) -> Node,
    {
        self.declare(name);
        let node = body(self);
        self.define(name, node);
        self.reference(name)
    }

    /// Whether a rule with this name has a body.
    pub fn is_defined(&self, name: &str) -> bool {
        self.registry.borrow().is_defined(name)
    }

    /// Compiles the registered rules and `root` into a parser.
    pub fn compile(&self, root: &Node) -> Result<Parser, GrammarError> {
        if let Some(error) = self.errors.borrow().first() {
            return Err(error.clone());
        }
        compiler::compile(&self.registry.borrow(), root)
    }
}
