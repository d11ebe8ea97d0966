//! Command-line arguments

use crate::error::CliResult;
use clap::Parser;
use std::path::PathBuf;
use transpiler::TranspileConfig;

/// Strip TypeScript types and emit JavaScript.
#[derive(Debug, Parser)]
#[command(name = "tsl", version, about)]
pub struct Cli {
    /// Source files to transform. Reads standard input when none are given.
    pub files: Vec<PathBuf>,

    /// Number of worker contexts for batch compilation
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory to write `<stem>.js` files into, instead of standard output
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Only report diagnostics; write no output
    #[arg(long)]
    pub check: bool,

    /// Disable the packrat cache
    #[arg(long)]
    pub no_memo: bool,
}

impl Cli {
    /// Builds the transpiler configuration. Flags override the config file.
    pub fn resolve_config(&self) -> CliResult<TranspileConfig> {
        let mut config = match &self.config {
            Some(path) => TranspileConfig::from_file(path)?,
            None => TranspileConfig::default(),
        };
        if let Some(jobs) = self.jobs {
            config.pool_size = jobs;
        }
        if self.no_memo {
            config.memoize = false;
        }
        Ok(config)
    }
}
