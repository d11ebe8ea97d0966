//! Reading sources, transforming them and writing results
//!
//! A single source is transformed in-process. Several sources go through a
//! [`BatchCompiler`] when more than one worker is configured.

use crate::error::{CliError, CliResult};
use core_types::Diagnostic;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use transpiler::{BatchCompiler, CompileUnit, TransformOutput, TranspileConfig, Transpiler};

/// Unit name used for source read from standard input.
pub const STDIN_NAME: &str = "<stdin>";

/// Outputs of one run, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    /// Unit name and its transform output
    pub outputs: Vec<(String, TransformOutput)>,
}

impl Report {
    /// Units that failed, with their diagnostics.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &Diagnostic)> {
        self.outputs
            .iter()
            .filter_map(|(name, output)| output.diagnostic.as_ref().map(|d| (name.as_str(), d)))
    }

    /// Number of failed units.
    pub fn failed(&self) -> usize {
        self.outputs.iter().filter(|(_, output)| output.error).count()
    }

    /// Whether every unit transformed successfully.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Drives transforms for the CLI
pub struct Runner {
    config: TranspileConfig,
    out_dir: Option<PathBuf>,
    check: bool,
}

impl Runner {
    /// Create a runner
    ///
    /// # Example
    /// ```
    /// use ts_cli::Runner;
    /// use transpiler::TranspileConfig;
    ///
    /// let runner = Runner::new(TranspileConfig::default().with_pool_size(1));
    /// let report = runner.run_source("inline.ts", "let a: number = 1;").unwrap();
    /// assert!(report.is_success());
    /// ```
    pub fn new(config: TranspileConfig) -> Self {
        Self {
            config,
            out_dir: None,
            check: false,
        }
    }

    /// Write `<stem>.js` files into `dir` instead of standard output
    pub fn with_out_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.out_dir = dir;
        self
    }

    /// Only report diagnostics
    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    /// Transform the given files
    ///
    /// # Errors
    /// Returns `CliError::Read` if a file cannot be read. Syntax errors in a
    /// file are not errors here; they are reported in the [`Report`].
    pub fn run_files(&self, files: &[PathBuf]) -> CliResult<Report> {
        let units = files
            .iter()
            .map(|path| read_unit(path))
            .collect::<CliResult<Vec<_>>>()?;
        self.transform_units(units)
    }

    /// Transform a single in-memory source
    pub fn run_source(&self, name: &str, source: impl Into<String>) -> CliResult<Report> {
        self.transform_units(vec![CompileUnit::new(name, source)])
    }

    fn transform_units(&self, units: Vec<CompileUnit>) -> CliResult<Report> {
        let outputs = if units.len() > 1 && self.config.pool_size > 1 {
            let workers = self.config.pool_size.min(units.len());
            info!(units = units.len(), workers, "compiling batch");
            let mut compiler =
                BatchCompiler::new(&self.config.clone().with_pool_size(workers))?;
            let outputs = compiler.compile(&units);
            compiler.terminate();
            outputs
        } else {
            debug!(units = units.len(), "compiling in-process");
            let transpiler = Transpiler::new(&self.config)?;
            units
                .iter()
                .map(|unit| transpiler.transform(&unit.source))
                .collect()
        };

        Ok(Report {
            outputs: units.into_iter().map(|unit| unit.name).zip(outputs).collect(),
        })
    }

    /// Where the output for unit `name` goes, or `None` for standard output
    pub fn output_path(&self, name: &str) -> Option<PathBuf> {
        let dir = self.out_dir.as_ref()?;
        if name == STDIN_NAME {
            return None;
        }
        let stem = Path::new(name).file_stem()?;
        Some(dir.join(format!("{}.js", stem.to_string_lossy())))
    }

    /// Write successful outputs
    ///
    /// # Errors
    /// Returns `CliError::OutputClash` before writing anything if two units
    /// map to the same output file, and `CliError::Write` if an output file
    /// cannot be written.
    pub fn emit(&self, report: &Report, stdout: &mut dyn Write) -> CliResult<()> {
        if self.check {
            return Ok(());
        }
        self.check_output_paths(report)?;
        for (name, output) in &report.outputs {
            let Some(code) = &output.code else {
                continue;
            };
            match self.output_path(name) {
                Some(path) => write_file(&path, code)?,
                None => stdout.write_all(code.as_bytes())?,
            }
        }
        stdout.flush()?;
        Ok(())
    }

    fn check_output_paths(&self, report: &Report) -> CliResult<()> {
        let mut claimed: HashMap<PathBuf, &str> = HashMap::new();
        for (name, output) in &report.outputs {
            if output.code.is_none() {
                continue;
            }
            let Some(path) = self.output_path(name) else {
                continue;
            };
            if let Some(first) = claimed.get(&path) {
                return Err(CliError::OutputClash {
                    path,
                    first: first.to_string(),
                    second: name.clone(),
                });
            }
            claimed.insert(path, name);
        }
        Ok(())
    }
}

fn read_unit(path: &Path) -> CliResult<CompileUnit> {
    let source = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(CompileUnit::new(path.display().to_string(), source))
}

fn write_file(path: &Path, code: &str) -> CliResult<()> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, code)
    };
    write().map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}
