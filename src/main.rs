//! Feed-Harvest main entry point
//!
//! This is the command-line interface for the Feed-Harvest collector.

use anyhow::Context;
use clap::{Parser, Subcommand};
use feed_harvest::config::{load_config_with_hash, Config};
use feed_harvest::output::{load_table, resolve_output_file};
use feed_harvest::server::{serve, AppState};
use feed_harvest::service::{HarvestService, ScrapeRequest};
use feed_harvest::source::SourceRegistry;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Rows printed by `preview`
const PREVIEW_ROWS: usize = 100;

/// Feed-Harvest: incremental record collection from growing result feeds
///
/// Feed-Harvest pages through search feeds, deduplicates the records it
/// finds, and writes one CSV table per run.
#[derive(Parser, Debug)]
#[command(name = "feed-harvest")]
#[command(version)]
#[command(about = "Incremental record collection from growing result feeds", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = "harvest.toml")]
    config: PathBuf,

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
    /// Run one collection and print the JSON response
    Run {
        /// Registered source identifier
        #[arg(short, long)]
        source: String,

        /// Free-text search query
        query: String,

        /// Stop after this many unique records
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Serve the HTTP API
    Serve {
        /// Override the configured bind address
        #[arg(long)]
        bind: Option<SocketAddr>,
    },

    /// List available sources
    Sources,

    /// Validate the configuration and show what would run
    Check,

    /// Print the first rows of a written table
    Preview {
        /// File name inside the output directory, or a path
        file: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    match cli.command {
        Command::Run {
            source,
            query,
            limit,
        } => handle_run(&config, source, query, limit).await,
        Command::Serve { bind } => {
            handle_serve(&config, bind).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Sources => {
            handle_sources(&config)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check => {
            handle_check(&config, &hash);
            Ok(ExitCode::SUCCESS)
        }
        Command::Preview { file } => {
            handle_preview(&config, &file)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("feed_harvest=info,warn"),
            1 => EnvFilter::new("feed_harvest=debug,info"),
            2 => EnvFilter::new("feed_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so `run` output stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_service(config: &Config) -> anyhow::Result<HarvestService> {
    let registry = SourceRegistry::from_config(config).context("Failed to build sources")?;
    Ok(HarvestService::new(registry, &config.output.directory))
}

/// Handles `run`: one collection, JSON response on stdout
async fn handle_run(
    config: &Config,
    source: String,
    query: String,
    limit: Option<usize>,
) -> anyhow::Result<ExitCode> {
    let service = build_service(config)?;
    let response = service
        .run_collection(ScrapeRequest {
            source: Some(source),
            query: Some(query),
            limit,
        })
        .await;

    println!("{}", serde_json::to_string_pretty(&response)?);

    if response.success {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

async fn handle_serve(config: &Config, bind: Option<SocketAddr>) -> anyhow::Result<()> {
    let addr = match bind {
        Some(addr) => addr,
        None => config
            .server
            .bind
            .parse()
            .with_context(|| format!("Invalid bind address {}", config.server.bind))?,
    };

    let service = build_service(config)?;
    tracing::info!("Serving {} sources", service.list_sources().len());
    serve(AppState { service }, addr)
        .await
        .context("Server failed")?;
    Ok(())
}

fn handle_sources(config: &Config) -> anyhow::Result<()> {
    let registry = SourceRegistry::from_config(config).context("Failed to build sources")?;

    if registry.is_empty() {
        println!("No sources available");
        return Ok(());
    }

    for source in registry.list() {
        println!("{:<24} {}", source.id, source.description);
    }
    Ok(())
}

/// Handles `check`: validated config and what each run would use
fn handle_check(config: &Config, hash: &str) {
    println!("=== Feed-Harvest Configuration Check ===\n");
    println!("Config hash: {}", hash);

    println!("\nCollection:");
    println!("  Stall threshold: {}", config.collection.stall_threshold);
    println!(
        "  Targeted runs: {} advances, {}s",
        config.collection.targeted.max_advances, config.collection.targeted.time_budget_secs
    );
    println!(
        "  Exhaustive runs: {} advances, {}s",
        config.collection.exhaustive.max_advances,
        config.collection.exhaustive.time_budget_secs
    );

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);

    println!("\nOutput directory: {}", config.output.directory);
    println!("Server bind: {}", config.server.bind);

    println!("\nSources ({}):", config.sources.len());
    for source in &config.sources {
        let location = source
            .endpoint
            .as_deref()
            .or(source.path.as_deref())
            .unwrap_or("-");
        println!("  - {} ({:?}) {}", source.id, source.kind, location);
        println!("    columns: {}", source.columns.join(", "));
        println!("    key fields: {}", source.key_fields.join(", "));
    }

    println!("\n✓ Configuration is valid");
}

fn handle_preview(config: &Config, file: &str) -> anyhow::Result<()> {
    let path = if Path::new(file).components().count() > 1 {
        PathBuf::from(file)
    } else {
        resolve_output_file(Path::new(&config.output.directory), file)?
    };

    let table = load_table(&path, Some(PREVIEW_ROWS))
        .with_context(|| format!("Failed to read {}", path.display()))?;

    println!("{}", table.headers.join(" | "));
    for row in &table.rows {
        println!("{}", row.join(" | "));
    }
    println!("\n{} rows shown", table.rows.len());
    Ok(())
}
