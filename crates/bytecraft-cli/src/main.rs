//! bytecraft CLI - decode MPS7 transaction logs
//!
//! # Commands
//!
//! - `bytecraft summary <FILE>` - Debit/credit totals, autopay counts and one user's balance
//! - `bytecraft dump <FILE>` - Decode the whole file to JSON, optionally with a custom schema
//!
//! Log verbosity follows `RUST_LOG` (default `info`); logs go to stderr.

mod error;
mod mps7;
mod report;

use std::{fs, path::Path, path::PathBuf};

use anyhow::Result;
use bytecraft::{Registry, Schema, serde::SchemaDef};
use clap::{Args, Parser, Subcommand};

use crate::{error::LogError, report::Summary};

#[derive(Parser)]
#[command(name = "bytecraft")]
#[command(about = "Decode MPS7 transaction logs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print totals, autopay counts and a user's balance
    Summary(SummaryArgs),

    /// Decode a file and print it as JSON
    Dump(DumpArgs),
}

#[derive(Args)]
struct SummaryArgs {
    /// MPS7 log file
    input: PathBuf,

    /// User whose balance is reported
    #[arg(long, default_value_t = report::DEFAULT_USER)]
    user: u64,
}

#[derive(Args)]
struct DumpArgs {
    /// Binary input file
    input: PathBuf,

    /// JSON schema definition to use instead of the MPS7 layout
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = Registry::standard();

    match cli.command {
        Commands::Summary(args) => summary(&registry, args),
        Commands::Dump(args) => dump(&registry, args),
    }
}

fn summary(registry: &Registry, args: SummaryArgs) -> Result<()> {
    let data = read_source(&args.input)?;
    let parsed = mps7::schema(registry)?
        .parse(&data)
        .map_err(LogError::from)?;

    let transactions = mps7::transactions(&parsed.data)?;
    tracing::info!(
        records = transactions.len(),
        first = transactions.iter().map(|tx| tx.timestamp).min(),
        last = transactions.iter().map(|tx| tx.timestamp).max(),
        trailing_bytes = data.len().saturating_sub(parsed.offset),
        "decoded log"
    );

    println!("{}", Summary::new(&transactions, args.user));
    Ok(())
}

fn dump(registry: &Registry, args: DumpArgs) -> Result<()> {
    let schema = match &args.schema {
        Some(path) => load_schema(path, registry)?,
        None => mps7::schema(registry)?,
    };

    let data = read_source(&args.input)?;
    let parsed = schema.parse(&data).map_err(LogError::from)?;
    tracing::debug!(offset = parsed.offset, len = data.len(), "decoded buffer");

    let json = if args.pretty {
        serde_json::to_string_pretty(&parsed.data)?
    } else {
        serde_json::to_string(&parsed.data)?
    };
    println!("{json}");
    Ok(())
}

fn read_source(path: &Path) -> Result<Vec<u8>, LogError> {
    fs::read(path).map_err(|source| LogError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

fn load_schema(path: &Path, registry: &Registry) -> Result<Schema, LogError> {
    let text = fs::read_to_string(path).map_err(|source| LogError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let def: SchemaDef = serde_json::from_str(&text).map_err(|err| LogError::SchemaFile {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })?;

    Ok(def.compile(registry)?)
}
