//! TypeScript-subset transpiler CLI
//!
//! Parses CLI arguments and delegates to the Runner.

use clap::Parser as ClapParser;
use std::io::{self, Read};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ts_cli::{Cli, CliResult, Runner, STDIN_NAME};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> CliResult<bool> {
    let config = cli.resolve_config()?;
    let runner = Runner::new(config)
        .with_out_dir(cli.out_dir.clone())
        .with_check(cli.check);

    let report = if cli.files.is_empty() {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        runner.run_source(STDIN_NAME, source)?
    } else {
        runner.run_files(&cli.files)?
    };

    for (name, diagnostic) in report.failures() {
        eprintln!("{}: {}", name, diagnostic);
    }
    runner.emit(&report, &mut io::stdout().lock())?;
    Ok(report.is_success())
}
