//! cardlens main entry point
//!
//! This is the command-line interface for the cardlens catalog extractor.

use anyhow::Context;
use cardlens::config::{load_config_with_hash, Config};
use cardlens::{CardError, CardId, Catalog, SearchQuery};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// cardlens: structured card records from a JavaScript-rendered catalog
///
/// cardlens drives a headless browser against the official card database,
/// waits for client-side rendering, and prints search results or card
/// details as JSON on stdout.
#[derive(Parser, Debug)]
#[command(name = "cardlens")]
#[command(version = "1.0.0")]
#[command(about = "Browser-driven card catalog extractor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the catalog by name, card id and/or category
    Search {
        /// Part of the card name
        #[arg(long)]
        name: Option<String>,

        /// Exact five-digit card id
        #[arg(long)]
        card_id: Option<String>,

        /// Category, e.g. "グッズ", "Supporter" or "energy"
        #[arg(long)]
        category: Option<String>,
    },

    /// Fetch the full record of one card
    Detail {
        /// Five-digit card id
        #[arg(value_name = "CARD_ID")]
        card_id: String,

        /// Regulation segment of the detail URL; pass "" to omit it
        #[arg(long)]
        regulation: Option<String>,
    },
}

/// Exit status of a run cut short by Ctrl-C (128 + SIGINT)
const INTERRUPTED_EXIT_CODE: u8 = 130;

/// How a command run ended when it did not fail
#[derive(Debug, PartialEq, Eq)]
enum Finished {
    Completed,
    Interrupted,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;
    let catalog = Catalog::with_chromium(config);

    let outcome = run_or_interrupt(run(&catalog, cli.command), tokio::signal::ctrl_c()).await;

    if let Err(e) = catalog.shutdown().await {
        tracing::warn!("Browser shutdown failed: {}", e);
    }

    Ok(match outcome? {
        Finished::Completed => ExitCode::SUCCESS,
        Finished::Interrupted => ExitCode::from(INTERRUPTED_EXIT_CODE),
    })
}

/// Runs `work` unless `interrupt` resolves first
async fn run_or_interrupt<W, I>(work: W, interrupt: I) -> anyhow::Result<Finished>
where
    W: Future<Output = anyhow::Result<()>>,
    I: Future,
{
    tokio::select! {
        result = work => result.map(|()| Finished::Completed),
        _ = interrupt => {
            tracing::warn!("Interrupted, shutting down browser");
            Ok(Finished::Interrupted)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries nothing but JSON.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("cardlens=info,warn"),
            1 => EnvFilter::new("cardlens=debug,info"),
            2 => EnvFilter::new("cardlens=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn load_configuration(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

async fn run(catalog: &Catalog, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Search {
            name,
            card_id,
            category,
        } => {
            let query = SearchQuery {
                name,
                card_id: card_id.as_deref().map(CardId::parse).transpose().map_err(report)?,
                category,
            };
            if query.is_empty() {
                return Err(report(CardError::InvalidParameter(
                    "at least one of --name, --card-id or --category is required".to_string(),
                )));
            }

            let cards = catalog.search(&query).await.map_err(report)?;
            print_json(&cards)
        }
        Command::Detail {
            card_id,
            regulation,
        } => {
            let card_id = CardId::parse(&card_id).map_err(report)?;
            let detail = catalog
                .detail(&card_id, regulation.as_deref())
                .await
                .map_err(report)?;
            print_json(&detail)
        }
    }
}

/// Logs a library error with its caller-facing classification
fn report(err: CardError) -> anyhow::Error {
    let kind = err.kind();
    tracing::error!("{} ({} {})", err, kind.status_code(), kind.code());
    anyhow::Error::new(err)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
