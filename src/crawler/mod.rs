//! Crawler module for the concurrent crawl pipeline
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and HTML link extraction
//! - The site filter that deduplicates and classifies discovered links
//! - The in-flight counter that detects when the crawl is finished
//! - The worker pool and the coordinator that sequences shutdown

mod coordinator;
mod counter;
mod fetcher;
mod filter;
mod parser;
mod queue;
mod site;
mod worker;

pub use coordinator::{CrawlPhase, Crawler, CrawlerBuilder};
pub use counter::CounterStats;
pub use fetcher::{build_http_client, Fetcher, HttpFetcher};
pub use filter::{Admission, FilterStats, VisitedSet};
pub use parser::{extract_hrefs, HtmlLinkExtractor, LinkExtractor};
pub use site::{PageResult, Site};
pub use worker::{discover_children, ScrapeError, WorkerStats};

use crate::config::Config;
use crate::output::CrawlStats;
use crate::CrawlError;

/// Runs a complete crawl with the default collaborators
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and open the site map sink
/// 2. Seed the pipeline with the configured URL
/// 3. Fetch every admitted page on the seed's host
/// 4. Write one `parent -> child` line per discovered link
///
/// # Returns
///
/// * `Ok(CrawlStats)` - Crawl completed; individual pages may still have failed
/// * `Err(CrawlError)` - Configuration was invalid or the pipeline broke
pub async fn crawl(config: Config) -> Result<CrawlStats, CrawlError> {
    Crawler::new(config)?.run().await
}
