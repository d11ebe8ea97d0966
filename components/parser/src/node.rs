//! Grammar node model.
//!
//! A grammar is a tree of [`Node`]s. Each node pairs a set of common
//! attributes (identity, capture key, nullability, reshape) with one of five
//! kinds. Nodes are plain data; behavior lives in the compiler and engine.

use core_types::Value;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Process-unique identity of a grammar node.
///
/// Identities key the memoization cache, so two nodes share an identity only
/// when they are guaranteed to produce the same result at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Allocates a new identity. Identities are never reused.
    pub fn fresh() -> Self {
        static NEXT_ID: AtomicU32 = AtomicU32::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric identity.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Pattern matched by a terminal node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Exact text
    Literal(String),
    /// Regular expression source, anchored at the match position when compiled
    Regex(String),
}

impl Pattern {
    /// Description used in diagnostics: quoted literals, slash-delimited regexes.
    pub fn describe(&self) -> String {
        match self {
            Pattern::Literal(text) => format!("{:?}", text),
            Pattern::Regex(source) => format!("/{}/", source),
        }
    }
}

/// Pure transform from a raw match value to a domain value.
pub type Reshape = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// The five grammar node kinds.
#[derive(Debug)]
pub enum NodeKind {
    /// Anchored literal or regex
    Terminal(Pattern),
    /// Children matched in order, fail-fast
    Sequence(Vec<Node>),
    /// Alternatives tried left to right, first success wins
    Choice(Vec<Node>),
    /// Child matched greedily zero or more times
    Repetition(Node),
    /// Reference to a named rule, resolved through the symbol registry
    SymbolRef(String),
}

/// A grammar node.
///
/// Cloning is cheap: the kind (and with it every child) is shared. The
/// modifier methods return a copy with a fresh identity so the copy never
/// aliases cache entries of the original.
#[derive(Clone)]
pub struct Node {
    id: NodeId,
    capture: Option<String>,
    nullable: bool,
    reshape: Option<Reshape>,
    kind: Arc<NodeKind>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            id: NodeId::fresh(),
            capture: None,
            nullable: false,
            reshape: None,
            kind: Arc::new(kind),
        }
    }

    fn derive(&self) -> Self {
        Self {
            id: NodeId::fresh(),
            ..self.clone()
        }
    }

    /// Returns a copy that yields `Null` with zero consumption instead of failing.
    pub fn nullable(&self) -> Node {
        Node {
            nullable: true,
            ..self.derive()
        }
    }

    /// Returns a copy whose value is stored under `key` by an enclosing sequence.
    pub fn with_capture(&self, key: impl Into<String>) -> Node {
        Node {
            capture: Some(key.into()),
            ..self.derive()
        }
    }

    /// Returns a copy that applies `f` to its match value.
    ///
    /// Applying `map` to a node that already reshapes composes the two, the
    /// existing reshape running first.
    pub fn map<F>(&self, f: F) -> Node
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        let reshape: Reshape = match &self.reshape {
            Some(inner) => {
                let inner = Arc::clone(inner);
                Arc::new(move |value| f(inner(value)))
            }
            None => Arc::new(f),
        };
        Node {
            reshape: Some(reshape),
            ..self.derive()
        }
    }

    /// The node's identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The capture key, if any.
    pub fn capture(&self) -> Option<&str> {
        self.capture.as_deref()
    }

    /// Whether failure is converted into an empty success.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// The reshape function, if one was set.
    pub fn reshape(&self) -> Option<&Reshape> {
        self.reshape.as_ref()
    }

    /// The node kind.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns the literal text if this is an unkeyed, non-nullable,
    /// unreshaped literal terminal, the only kind sequences may merge.
    pub(crate) fn plain_literal(&self) -> Option<&str> {
        if self.capture.is_some() || self.nullable || self.reshape.is_some() {
            return None;
        }
        match self.kind() {
            NodeKind::Terminal(Pattern::Literal(text)) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("capture", &self.capture)
            .field("nullable", &self.nullable)
            .field("reshape", &self.reshape.as_ref().map(|_| ".."))
            .field("kind", &self.kind)
            .finish()
    }
}
