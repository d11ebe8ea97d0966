//! Batch compilation over a worker pool.
//!
//! Each unit's source travels to a worker as a transferred buffer, the unit
//! name as the only argument. Every worker context serves its own
//! [`Transpiler`]. Results are collected in submission order, whatever order
//! the workers finish in.

use crate::config::TranspileConfig;
use crate::error::TranspileResult;
use crate::transform::{TransformOutput, Transpiler};
use core_types::{Diagnostic, DiagnosticKind};
use dispatch::{Call, Failure, Implementation, PendingCall, WorkerPool};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

/// Command served by every batch worker.
pub const TRANSFORM_COMMAND: &str = "transform";

/// One unit of work handed over by the upstream tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileUnit {
    /// Display name, usually the file path
    pub name: String,
    /// Source text
    pub source: String,
}

impl CompileUnit {
    /// Creates a unit.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// The implementation a batch worker exposes.
pub fn worker_implementation(transpiler: Transpiler) -> Implementation {
    Implementation::new().register(TRANSFORM_COMMAND, move |call: Call| {
        let name = call.str_arg(0).unwrap_or("<unnamed>").to_string();
        let bytes = call
            .transfer
            .into_iter()
            .next()
            .ok_or_else(|| Failure::new("TypeError", format!("{}: no source buffer", name)))?;
        let source = String::from_utf8(bytes)
            .map_err(|e| Failure::new("EncodingError", format!("{}: {}", name, e)))?;
        let output = transpiler.transform(&source);
        serde_json::to_value(output).map_err(|e| Failure::from_error(&e))
    })
}

/// A reusable pool of transpiling workers.
pub struct BatchCompiler {
    pool: WorkerPool,
}

impl BatchCompiler {
    /// Compiles the grammar once and starts `config.pool_size` workers sharing it.
    pub fn new(config: &TranspileConfig) -> TranspileResult<Self> {
        let transpiler = Transpiler::new(config)?;
        let pool = WorkerPool::with_stack_size(config.pool_size, config.stack_size, |_slot| {
            worker_implementation(transpiler.clone())
        })?;
        debug!(workers = pool.size(), stack_size = config.stack_size, "batch compiler ready");
        Ok(Self { pool })
    }

    /// Number of workers.
    pub fn size(&self) -> usize {
        self.pool.size()
    }

    /// Transforms every unit. The output at index `i` belongs to `units[i]`.
    pub fn compile(&self, units: &[CompileUnit]) -> Vec<TransformOutput> {
        let calls: Vec<PendingCall> = units
            .iter()
            .map(|unit| {
                self.pool.dispatch_with_transfer(
                    TRANSFORM_COMMAND,
                    vec![json!(unit.name)],
                    vec![unit.source.clone().into_bytes()],
                )
            })
            .collect();

        calls
            .into_iter()
            .zip(units)
            .map(|(call, unit)| collect(call, unit))
            .collect()
    }

    /// Stops all workers.
    pub fn terminate(&mut self) {
        self.pool.terminate();
    }
}

fn collect(call: PendingCall, unit: &CompileUnit) -> TransformOutput {
    let id = call.id();
    match call.wait() {
        Ok(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            dispatch_failure(unit, format!("malformed worker result: {}", e))
        }),
        Err(error) => {
            warn!(unit = %unit.name, id, %error, "worker call failed");
            dispatch_failure(unit, error.to_string())
        }
    }
}

fn dispatch_failure(unit: &CompileUnit, message: String) -> TransformOutput {
    TransformOutput::failure(Diagnostic::new(
        DiagnosticKind::Dispatch,
        format!("{}: {}", unit.name, message),
    ))
}

/// Transforms `units` on a temporary pool of `pool_size` workers.
pub fn compile_batch(
    units: &[CompileUnit],
    pool_size: usize,
) -> TranspileResult<Vec<TransformOutput>> {
    let config = TranspileConfig::default().with_pool_size(pool_size);
    let mut compiler = BatchCompiler::new(&config)?;
    let outputs = compiler.compile(units);
    compiler.terminate();
    Ok(outputs)
}
