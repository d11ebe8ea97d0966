//! Symbol registry for named rules.
//!
//! Rules are declared before their bodies exist so a body can reference
//! itself or rules defined later. The builder side records names and bodies;
//! the compiled side is an arena of slots indexed by [`SymbolId`], each slot
//! populated exactly once.

use crate::compiler::Matcher;
use crate::node::Node;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Index of a rule slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub(crate) usize);

#[derive(Debug)]
struct RuleEntry {
    name: String,
    body: Option<Node>,
}

/// Build-time table of named rules.
#[derive(Debug, Default)]
pub struct SymbolRegistry {
    names: HashMap<String, SymbolId>,
    rules: Vec<RuleEntry>,
}

impl SymbolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a rule, returning its slot. Declaring an existing name
    /// returns the existing slot.
    pub fn declare(&mut self, name: &str) -> SymbolId {
        if let Some(id) = self.names.get(name) {
            return *id;
        }
        let id = SymbolId(self.rules.len());
        self.rules.push(RuleEntry {
            name: name.to_string(),
            body: None,
        });
        self.names.insert(name.to_string(), id);
        id
    }

    /// Installs the body of a rule, declaring it first if needed.
    ///
    /// Returns `false` without changing anything if the rule already has a body.
    pub fn define(&mut self, name: &str, body: Node) -> bool {
        let id = self.declare(name);
        let entry = &mut self.rules[id.0];
        if entry.body.is_some() {
            return false;
        }
        entry.body = Some(body);
        true
    }

    /// Looks up a rule's slot by name.
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.names.get(name).copied()
    }

    /// Whether the rule has a body.
    pub fn is_defined(&self, name: &str) -> bool {
        self.lookup(name)
            .map(|id| self.rules[id.0].body.is_some())
            .unwrap_or(false)
    }

    /// Number of declared rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule has been declared.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (SymbolId, &str, Option<&Node>)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, entry)| (SymbolId(i), entry.name.as_str(), entry.body.as_ref()))
    }
}

/// Compiled rule arena.
///
/// Every declared rule gets an uninitialized slot before any body compiles.
/// A slot left uninitialized (declared, never defined) resolves to
/// `SymbolUnresolved` when invoked.
#[derive(Debug)]
pub(crate) struct RuleTable {
    slots: Vec<OnceLock<Matcher>>,
    names: Vec<String>,
}

impl RuleTable {
    pub(crate) fn with_placeholders(registry: &SymbolRegistry) -> Self {
        let names: Vec<String> = registry
            .entries()
            .map(|(_, name, _)| name.to_string())
            .collect();
        let slots = names.iter().map(|_| OnceLock::new()).collect();
        Self { slots, names }
    }

    /// Installs a compiled rule. Returns `false` if the slot was already filled.
    pub(crate) fn install(&self, id: SymbolId, matcher: Matcher) -> bool {
        self.slots[id.0].set(matcher).is_ok()
    }

    pub(crate) fn get(&self, id: SymbolId) -> Option<&Matcher> {
        self.slots.get(id.0).and_then(OnceLock::get)
    }

    pub(crate) fn name(&self, id: SymbolId) -> &str {
        &self.names[id.0]
    }

    pub(crate) fn installed(&self) -> usize {
        self.slots.iter().filter(|slot| slot.get().is_some()).count()
    }
}
