//! Site-Mapper main entry point
//!
//! This is the command-line interface for the Site-Mapper crawler. The site
//! map goes to standard output (or `--output-file`); logs go to standard error.

use anyhow::{bail, Context};
use clap::Parser;
use site_mapper::config::{parse_config, Config};
use site_mapper::Crawler;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Mapper: a single-host site graph crawler
///
/// Site-Mapper starts from a seed page, follows every link that stays on the
/// seed's host and prints one `parent -> child` line per discovered link.
/// External hosts and media files are listed but never fetched.
#[derive(Parser, Debug)]
#[command(name = "site-mapper")]
#[command(version = "1.0.0")]
#[command(about = "A single-host site graph crawler", long_about = None)]
struct Cli {
    /// Absolute http(s) URL to start crawling from
    #[arg(value_name = "SEED_URL")]
    seed_url: Option<String>,

    /// Path to TOML configuration file; command-line values take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of concurrent workers
    #[arg(long, allow_negative_numbers = true)]
    num_workers: Option<i64>,

    /// Time limit in seconds for each request (0 disables the limit)
    #[arg(long, allow_negative_numbers = true)]
    client_timeout: Option<i64>,

    /// Write the site map to this file instead of standard output
    #[arg(long, value_name = "FILE")]
    output_file: Option<PathBuf>,

    /// User-Agent header sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Builds the effective configuration: file values first, flags on top
    fn into_config(self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path.display());
                parse_config(path)
                    .with_context(|| format!("Failed to load configuration from {}", path.display()))?
            }
            None => Config::default(),
        };

        if let Some(seed_url) = self.seed_url {
            config.seed_url = seed_url;
        }
        if let Some(num_workers) = self.num_workers {
            config.num_workers = num_workers;
        }
        if let Some(client_timeout) = self.client_timeout {
            config.client_timeout_secs = client_timeout;
        }
        if let Some(output_file) = self.output_file {
            config.output_file = Some(output_file);
        }
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }

        if config.seed_url.is_empty() {
            bail!("No seed URL given; pass SEED_URL or set seed-url in the config file");
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = cli.into_config()?;
    let crawler = Crawler::new(config).context("Invalid crawl configuration")?;

    tracing::info!("Crawling {}", crawler.seed());
    let stats = match crawler.run().await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!("Crawling took {:?}", stats.elapsed);
    tracing::info!("{}", stats);
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_mapper=info,warn"),
            1 => EnvFilter::new("site_mapper=debug,info"),
            2 => EnvFilter::new("site_mapper=trace,debug"),
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
