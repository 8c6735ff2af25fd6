//! Worker pool member: fetches admitted sites and reports their links

use crate::crawler::counter::InFlight;
use crate::crawler::queue::WorkQueue;
use crate::crawler::{Fetcher, LinkExtractor, PageResult, Site};
use crate::url::{is_relative, parse_url, SiteUrl};
use crate::{ExtractError, FetchError};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Why a single page produced no result
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Per-worker totals, returned when the worker exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Pages fetched and parsed into a result
    pub mapped: u64,

    /// Pages retired because fetching or link extraction failed
    pub failed: u64,
}

/// One member of the worker pool
///
/// Every site taken from the queue is retired exactly once, whether or not
/// it could be fetched.
pub struct Worker {
    pub id: usize,
    pub queue: WorkQueue,
    pub fetcher: Arc<dyn Fetcher>,
    pub extractor: Arc<dyn LinkExtractor>,
    pub timeout: Option<Duration>,
    pub in_flight: InFlight,
    pub results: mpsc::Sender<PageResult>,
    pub candidates: mpsc::Sender<Site>,
}

impl Worker {
    /// Processes sites until the crawl queue is closed
    pub async fn run(self) -> WorkerStats {
        tracing::debug!(worker = self.id, "Worker started");
        let mut stats = WorkerStats::default();

        while let Some(site) = self.queue.next().await {
            let _retirement = Retirement(&self.in_flight);
            tracing::debug!(worker = self.id, url = %site.url(), "Processing site");

            match self.scrape(&site).await {
                Ok(children) => {
                    self.in_flight.credit(children.len());

                    let result = PageResult {
                        source: site,
                        children: children.clone(),
                    };
                    if let Err(e) = self.results.send(result).await {
                        tracing::error!(
                            worker = self.id,
                            url = %e.0.source.url(),
                            "Site map builder is gone; result dropped"
                        );
                    }

                    self.forward(children);
                    stats.mapped += 1;
                }
                Err(e) => {
                    tracing::error!(
                        worker = self.id,
                        url = %site.url(),
                        error = %e,
                        "Failed to parse site"
                    );
                    stats.failed += 1;
                }
            }
        }

        tracing::debug!(worker = self.id, ?stats, "Worker stopped");
        stats
    }

    /// Fetches a site and returns the distinct links found on it
    async fn scrape(&self, site: &Site) -> Result<Vec<Site>, ScrapeError> {
        let content = self.fetcher.fetch(site.url(), self.timeout).await?;
        let hrefs = self.extractor.extract_links(&content)?;
        tracing::trace!(url = %site.url(), links = hrefs.len(), "Extracted links");
        Ok(discover_children(site.url(), hrefs))
    }

    /// Hands children to the filter stage without holding up this worker
    ///
    /// The children were credited beforehand, so this send and the worker's
    /// own retirement may complete in either order.
    fn forward(&self, children: Vec<Site>) {
        if children.is_empty() {
            return;
        }

        let candidates = self.candidates.clone();
        tokio::spawn(async move {
            for child in children {
                if let Err(e) = candidates.send(child).await {
                    tracing::error!(url = %e.0.url(), "Site filter is gone; candidate dropped");
                }
            }
        });
    }
}

/// Retires the site being processed when dropped, including on unwind
struct Retirement<'a>(&'a InFlight);

impl Drop for Retirement<'_> {
    fn drop(&mut self) {
        self.0.retire();
    }
}

/// Resolves raw hrefs found on `page` into its distinct child sites
///
/// Unparseable hrefs are skipped. Relative links inherit the page's scheme
/// and host. The first occurrence of each resolved URL wins and order is
/// preserved.
pub fn discover_children(page: &SiteUrl, hrefs: Vec<String>) -> Vec<Site> {
    let mut seen = HashSet::new();
    let mut children = Vec::new();

    for href in hrefs {
        let url = match parse_url(&href) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(page = %page, href = %href, error = %e, "Skipping link");
                continue;
            }
        };

        let url = if is_relative(&url) {
            url.resolve_against(page)
        } else {
            url
        };

        if seen.insert(url.to_string()) {
            tracing::trace!("Appending new site: {} -> {}", page, url);
            children.push(Site::child(url, page.clone()));
        }
    }

    children
}
