//! howpopular command-line entry point.
//!
//! Logging goes to stderr so stdout carries only the report.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use howpopular_client::report;
use howpopular_client::{FetchConfig, Fetcher, RenderMode, Resolver};
use howpopular_core::cache::remove_cache_files;
use howpopular_core::{AppConfig, CacheStore};
use tracing_subscriber::EnvFilter;

const CACHE_CLEARED_MESSAGE: &str = "Cache cleared successfully";

/// Check the relative popularity of search queries by their hit counts.
#[derive(Debug, Parser)]
#[command(name = "howpopular", disable_version_flag = true)]
struct Cli {
    /// The queries to compare
    queries: Vec<String>,

    /// Clear the response cache
    #[arg(short = 'C', long = "clear-cache")]
    clear_cache: bool,

    /// Display the current version of howpopular
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// Show the results as a histogram
    #[arg(short = 'H', long = "histogram", alias = "histgram")]
    histogram: bool,
}

impl Cli {
    fn render_mode(&self) -> RenderMode {
        if self.histogram { RenderMode::Histogram } else { RenderMode::Plain }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.version {
        println!("howpopular {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    if cli.clear_cache {
        let config = AppConfig::load_unvalidated().context("failed to load configuration")?;
        let removed = remove_cache_files(&config.cache_base_path()).context("failed to clear the cache")?;
        tracing::debug!("removed {} cache files", removed);
        println!("{CACHE_CLEARED_MESSAGE}");
        return Ok(ExitCode::SUCCESS);
    }

    if cli.queries.is_empty() {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = AppConfig::load().context("failed to load configuration")?;
    tracing::debug!("loaded configuration: {:?}", config);

    let store = CacheStore::from_config(&config)
        .await
        .with_context(|| format!("failed to open cache at {}", config.cache_file().display()))?;

    let outcome = {
        let fetcher = Fetcher::new(FetchConfig::from_app_config(&config), &store)?;
        let resolver = Resolver::from_config(fetcher, &config);
        tracing::debug!("resolving {} queries with {}", cli.queries.len(), resolver.provider().name);
        report::run(&resolver, &cli.queries, cli.render_mode()).await?
    };

    if let Some(guidance) = outcome.guidance() {
        eprintln!("{guidance}");
    }
    for line in outcome.lines() {
        println!("{line}");
    }

    let code = outcome.exit_code();
    if code == 0 {
        store.close().await.context("failed to close the cache")?;
    }

    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
