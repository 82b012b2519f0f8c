use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use ledgerkit_accounting::{Amount, EngineConfig};

/// Check that a journal entry's debits and credits balance.
#[derive(Debug, Parser)]
#[command(name = "ledgerkit-check", version)]
struct Args {
    /// JSON file with the journal lines (reads stdin when omitted)
    file: Option<PathBuf>,

    /// Largest difference still treated as balanced
    #[arg(long)]
    tolerance: Option<Amount>,

    /// Also require two or more lines with exactly one side populated each
    #[arg(long)]
    strict: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    ledgerkit_observability::init();
    let args = Args::parse();

    let mut config = EngineConfig::from_env();
    if let Some(tolerance) = args.tolerance {
        config.tolerance = tolerance;
    }
    if args.strict {
        config.strict_lines = true;
    }

    let input = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let report = ledgerkit_cli::check_document(&input, &config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(if report.accepted() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
