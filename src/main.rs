//! Seoul catalog harvester entry point
//!
//! This is the command-line interface for exporting the Seoul Open Data Plaza
//! service catalog and its IO-parameter descriptions.

use anyhow::Context;
use clap::Parser;
use seoul_catalog_harvester::api::{CatalogQuery, PageRequest};
use seoul_catalog_harvester::config::{load_config_with_hash, validate, HarvestConfig};
use seoul_catalog_harvester::output::print_summary;
use seoul_catalog_harvester::{HarvestError, HarvestPlan, Harvester};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Seoul catalog harvester
///
/// Fetches the full service catalog of the Seoul Open Data Plaza and,
/// optionally, the input/output parameters of every listed service. Both
/// datasets are saved as JSON Lines and CSV.
#[derive(Parser, Debug)]
#[command(name = "seoul-catalog-harvester")]
#[command(version)]
#[command(about = "Seoul Open Data Plaza API catalog harvester", long_about = None)]
struct Cli {
    /// Seoul OpenAPI key
    #[arg(long, env = "SEOUL_API_KEY", hide_env_values = true, default_value = "")]
    key: String,

    /// Optional TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(long, value_name = "DIR")]
    outdir: Option<PathBuf>,

    /// Response format requested from the API
    #[arg(long, value_parser = ["json"])]
    format: Option<String>,

    /// Also fetch IO params per service id
    #[arg(long)]
    with_io: bool,

    /// Limit IO fetch to the first N services (0 = all)
    #[arg(long, default_value_t = 0)]
    io_sample_n: usize,

    /// Keep going when a service's IO fetch exhausts its retries
    #[arg(long, requires = "with_io")]
    skip_failed_io: bool,

    /// Seconds to sleep between pages
    #[arg(long)]
    sleep: Option<f64>,

    /// Restrict the catalog to one service id (e.g. OA-110)
    #[arg(long, value_name = "ID")]
    service_filter: Option<String>,

    /// Restrict the catalog to services matching a keyword
    #[arg(long)]
    keyword: Option<String>,

    /// Show the effective configuration and first request, then exit
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn plan(&self) -> HarvestPlan {
        HarvestPlan {
            query: CatalogQuery {
                service_filter: self.service_filter.clone(),
                keyword: self.keyword.clone(),
            },
            with_io: self.with_io,
            io_sample_n: self.io_sample_n,
            skip_failed_io: self.skip_failed_io,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &cli);
        return Ok(());
    }

    let key = cli.key.trim();
    if key.is_empty() {
        eprintln!("ERROR: {}", HarvestError::MissingApiKey);
        std::process::exit(1);
    }

    handle_harvest(config, key, &cli.plan()).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seoul_catalog_harvester=info,warn"),
            1 => EnvFilter::new("seoul_catalog_harvester=debug,info"),
            2 => EnvFilter::new("seoul_catalog_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the optional config file and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<HarvestConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("reading {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => HarvestConfig::default(),
    };

    if let Some(outdir) = &cli.outdir {
        config.output.dir = outdir.clone();
    }
    if let Some(format) = &cli.format {
        config.api.format = format.clone();
    }
    if let Some(sleep) = cli.sleep {
        config.paging.delay_secs = sleep;
    }

    validate(&config).context("invalid command-line settings")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what a harvest would do
fn handle_dry_run(config: &HarvestConfig, cli: &Cli) {
    println!("=== Seoul Catalog Harvester Dry Run ===\n");

    println!("API:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  Format: {}", config.api.format);

    println!("\nHTTP:");
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Attempts per request: {}", config.http.retries);
    println!("  Retry delay unit: {}s", config.http.retry_delay_secs);
    println!("  User agent: {}", config.http.user_agent);

    println!("\nPaging:");
    println!("  Catalog page size: {}", config.paging.catalog_page_size);
    println!("  IO page size: {}", config.paging.io_page_size);
    println!("  Delay between pages: {}s", config.paging.delay_secs);

    println!("\nOutput:");
    println!("  {}", config.output.catalog_path("jsonl").display());
    println!("  {}", config.output.catalog_path("csv").display());
    if cli.with_io {
        println!("  {}", config.output.io_path("jsonl").display());
        println!("  {}", config.output.io_path("csv").display());
        match cli.io_sample_n {
            0 => println!("\nIO params: every service"),
            n => println!("\nIO params: first {} services", n),
        }
    }

    let plan = cli.plan();
    let first = PageRequest::catalog(
        &config.api,
        cli.key.trim(),
        1,
        config.paging.catalog_page_size,
        &plan.query,
    );
    println!("\nFirst request: {}", first);

    if cli.key.trim().is_empty() {
        println!("\n! No API key set (--key or SEOUL_API_KEY)");
    } else {
        println!("\n✓ Configuration is valid");
    }
}

/// Handles the main harvest operation
async fn handle_harvest(
    config: HarvestConfig,
    key: &str,
    plan: &HarvestPlan,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Output directory: {}", config.output.dir.display());

    let harvester = Harvester::new(config, key)?;

    match harvester.run(plan).await {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
