// dre-check - validate / normalize DRE payloads from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dre_check::{CurrencyOracle, CurrencyTable, DrePipeline, Iso4217};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dre-check", version, about = "Validate and normalize DRE (P&L) payloads")]
struct Cli {
    /// JSON array of accepted currency codes, replacing the built-in ISO-4217 table
    #[arg(long, global = true)]
    currencies: Option<PathBuf>,

    /// Print compact JSON instead of pretty-printed
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Structural and sign-policy checks only
    Validate {
        /// DRE JSON file ("-" for stdin)
        file: PathBuf,
    },

    /// Validate, then print the normalized document and its warnings
    Normalize {
        /// DRE JSON file ("-" for stdin)
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether the document was accepted
fn run(cli: Cli) -> Result<bool> {
    let oracle: Arc<dyn CurrencyOracle> = match &cli.currencies {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read currency table: {}", path.display()))?;
            let table = CurrencyTable::from_json(&raw)
                .with_context(|| format!("Invalid currency table: {}", path.display()))?;
            info!(codes = table.len(), "Using custom currency table");
            Arc::new(table)
        }
        None => Arc::new(Iso4217),
    };
    let pipeline = DrePipeline::with_oracle(oracle);

    match &cli.command {
        Command::Validate { file } => {
            let raw = load_json(file)?;
            let result = pipeline.validate(&raw);
            info!(ok = result.ok, errors = result.errors.len(), "Validated {}", file.display());
            print_json(&result, cli.compact)?;
            Ok(result.ok)
        }

        Command::Normalize { file } => {
            let raw = load_json(file)?;
            match pipeline.process(&raw) {
                Ok(result) => {
                    info!(warnings = result.warnings.len(), "Normalized {}", file.display());
                    print_json(&result, cli.compact)?;
                    Ok(true)
                }
                Err(failure) => {
                    info!(errors = failure.errors.len(), "Rejected {}", file.display());
                    print_json(&failure, cli.compact)?;
                    Ok(false)
                }
            }
        }
    }
}

fn load_json(path: &Path) -> Result<serde_json::Value> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?
    };

    serde_json::from_str(&text).with_context(|| format!("Not valid JSON: {}", path.display()))
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let out = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", out);
    Ok(())
}
