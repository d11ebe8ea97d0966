//! Transpiler configuration.

use crate::error::TranspileResult;
use serde::{Deserialize, Serialize};
use dispatch::DEFAULT_STACK_SIZE;
use parser::DEFAULT_MAX_DEPTH;
use std::path::Path;
use std::thread;

/// Settings shared by single-file and batch transforms.
///
/// Missing fields in a configuration file take their default values.
///
/// ```
/// use transpiler::TranspileConfig;
///
/// let config: TranspileConfig = serde_json::from_str(r#"{ "poolSize": 2 }"#).unwrap();
/// assert_eq!(config.pool_size, 2);
/// assert!(config.memoize);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranspileConfig {
    /// Number of worker contexts used by batch compilation
    pub pool_size: usize,
    /// Use the packrat cache while parsing
    pub memoize: bool,
    /// Deepest nesting of grammar rules a source may reach before it is
    /// rejected with a diagnostic
    pub max_depth: usize,
    /// Stack size in bytes of each batch worker thread
    pub stack_size: usize,
}

impl Default for TranspileConfig {
    fn default() -> Self {
        Self {
            pool_size: thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            memoize: true,
            max_depth: DEFAULT_MAX_DEPTH,
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl TranspileConfig {
    /// Reads a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> TranspileResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Sets the batch pool size.
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
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

    /// Sets the worker thread stack size.
    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }
}
