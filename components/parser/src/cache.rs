//! Packrat memoization cache.
//!
//! One cache per top-level parse. Entries map (node identity, byte offset) to
//! the node's complete result at that offset. The cache is created by the
//! parse entry point and dropped with it; it is never shared.

use crate::engine::ParseResult;
use crate::node::NodeId;
use std::collections::HashMap;

/// Cache counters reported after a parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that required evaluation
    pub misses: u64,
    /// Entries stored when the parse finished
    pub entries: usize,
}

/// Memoization table for a single parse invocation.
#[derive(Debug)]
pub struct MemoCache {
    entries: HashMap<(NodeId, usize), ParseResult>,
    enabled: bool,
    hits: u64,
    misses: u64,
}

impl MemoCache {
    /// Creates an empty, enabled cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            enabled: true,
            hits: 0,
            misses: 0,
        }
    }

    /// Creates a cache that never stores anything. Every lookup misses.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Whether lookups and stores take effect.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns a copy of the stored result for `id` at `position`.
    pub fn get(&mut self, id: NodeId, position: usize) -> Option<ParseResult> {
        if !self.enabled {
            return None;
        }
        match self.entries.get(&(id, position)) {
            Some(result) => {
                self.hits += 1;
                Some(result.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Stores the result for `id` at `position`.
    pub fn insert(&mut self, id: NodeId, position: usize, result: ParseResult) {
        if self.enabled {
            self.entries.insert((id, position), result);
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}

impl Default for MemoCache {
    fn default() -> Self {
        Self::new()
    }
}
