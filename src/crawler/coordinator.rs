//! Crawler coordinator - wires the pipeline stages and sequences shutdown
//!
//! A crawl moves through five phases:
//! - `Validating`: configuration is checked and the sink opened, before any
//!   task exists
//! - `Seeding`: the seed is credited and handed to the site filter
//! - `Running`: counter, filter, site map builder and workers run until every
//!   worker has seen the crawl queue close
//! - `Draining`: the filter and result inputs are closed, then the counter
//! - `Done`: the site map builder has flushed its last line

use crate::config::{validate_client_timeout, validate_num_workers, validate_seed_url, Config};
use crate::crawler::counter::spawn_counter;
use crate::crawler::filter::spawn_filter;
use crate::crawler::queue::work_queue;
use crate::crawler::worker::{Worker, WorkerStats};
use crate::crawler::{Fetcher, HtmlLinkExtractor, HttpFetcher, LinkExtractor, Site};
use crate::output::{open_sink, spawn_sitemap_builder, CrawlStats};
use crate::url::SiteUrl;
use crate::CrawlError;
use chrono::Utc;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Lifecycle of a single crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Validating,
    Seeding,
    Running,
    Draining,
    Done,
}

fn enter(phase: CrawlPhase) {
    tracing::debug!(?phase, "Crawl phase changed");
}

/// Builder for a [`Crawler`]
///
/// Collaborators left unset fall back to the defaults: an HTTP fetcher with
/// the configured user agent, the HTML link extractor, and the sink named by
/// `output_file` (standard output when unset). An explicit sink takes
/// precedence over `output_file`.
pub struct CrawlerBuilder {
    config: Config,
    sink: Option<Box<dyn Write + Send>>,
    fetcher: Option<Arc<dyn Fetcher>>,
    extractor: Option<Arc<dyn LinkExtractor>>,
}

impl CrawlerBuilder {
    pub fn sink(mut self, sink: impl Write + Send + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn extractor(mut self, extractor: Arc<dyn LinkExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Validates the configuration and prepares a crawler
    ///
    /// Nothing is spawned and no request is sent if this fails.
    pub fn build(self) -> Result<Crawler, CrawlError> {
        enter(CrawlPhase::Validating);

        let seed = validate_seed_url(&self.config.seed_url)?;
        let num_workers = validate_num_workers(self.config.num_workers)?;
        let timeout = validate_client_timeout(self.config.client_timeout_secs)?;

        let sink = match self.sink {
            Some(sink) => sink,
            None => open_sink(self.config.output_file.as_deref())?,
        };

        let fetcher: Arc<dyn Fetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::new(&self.config.user_agent)?),
        };

        let extractor = self
            .extractor
            .unwrap_or_else(|| Arc::new(HtmlLinkExtractor));

        Ok(Crawler {
            seed,
            num_workers,
            timeout,
            sink,
            fetcher,
            extractor,
        })
    }
}

/// A validated, one-shot crawl
///
/// [`Crawler::run`] consumes the crawler, so each instance crawls exactly once.
pub struct Crawler {
    seed: SiteUrl,
    num_workers: usize,
    timeout: Option<Duration>,
    sink: Box<dyn Write + Send>,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
}

impl Crawler {
    pub fn builder(config: Config) -> CrawlerBuilder {
        CrawlerBuilder {
            config,
            sink: None,
            fetcher: None,
            extractor: None,
        }
    }

    /// Validates `config` and builds a crawler with default collaborators
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        Self::builder(config).build()
    }

    pub fn seed(&self) -> &SiteUrl {
        &self.seed
    }

    /// Crawls the seed's host and writes the site map
    ///
    /// Returns once every stage has stopped and the sink is flushed.
    /// Per-page failures are logged and counted, never returned.
    pub async fn run(self) -> Result<CrawlStats, CrawlError> {
        let started_at = Utc::now();
        let clock = Instant::now();
        let capacity = self.num_workers * 2;

        tracing::info!(
            seed = %self.seed,
            workers = self.num_workers,
            timeout = ?self.timeout,
            "Crawler started"
        );

        let (queue_tx, queue, closer) = work_queue(capacity);
        let (candidate_tx, candidate_rx) = mpsc::channel(capacity);
        let (result_tx, result_rx) = mpsc::channel(capacity);
        let (in_flight, counter) = spawn_counter(closer);

        enter(CrawlPhase::Seeding);
        in_flight.credit(1);
        candidate_tx
            .send(Site::seed(self.seed.clone()))
            .await
            .map_err(|_| CrawlError::Pipeline("site filter input closed before seeding".to_string()))?;

        enter(CrawlPhase::Running);
        let filter = spawn_filter(candidate_rx, queue_tx, in_flight.clone());
        let sitemap = spawn_sitemap_builder(result_rx, self.sink);

        let workers: Vec<_> = (0..self.num_workers)
            .map(|id| {
                let worker = Worker {
                    id,
                    queue: queue.clone(),
                    fetcher: Arc::clone(&self.fetcher),
                    extractor: Arc::clone(&self.extractor),
                    timeout: self.timeout,
                    in_flight: in_flight.clone(),
                    results: result_tx.clone(),
                    candidates: candidate_tx.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();
        drop(queue);

        let mut totals = WorkerStats::default();
        let mut worker_error = None;
        for worker in workers {
            match worker.await {
                Ok(stats) => {
                    totals.mapped += stats.mapped;
                    totals.failed += stats.failed;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Worker task failed");
                    worker_error.get_or_insert(CrawlError::Task(e));
                }
            }
        }

        enter(CrawlPhase::Draining);
        drop(candidate_tx);
        drop(result_tx);
        let filter_stats = filter.await?;
        drop(in_flight);
        let counter_stats = counter.await?;

        let sitemap_stats = sitemap.await?;
        enter(CrawlPhase::Done);

        if let Some(e) = worker_error {
            return Err(e);
        }
        if let Some(e) = sitemap_stats.error {
            return Err(CrawlError::Io(e));
        }

        let stats = CrawlStats {
            started_at,
            finished_at: Utc::now(),
            elapsed: clock.elapsed(),
            pages_mapped: totals.mapped,
            pages_failed: totals.failed,
            external_links: filter_stats.external,
            media_links: filter_stats.media,
            duplicate_links: filter_stats.duplicates,
            edges_written: sitemap_stats.edges,
            peak_in_flight: counter_stats.peak_in_flight,
        };

        tracing::debug!(
            admitted = filter_stats.admitted,
            results = sitemap_stats.results,
            late_deltas = counter_stats.late_deltas,
            "Crawl pipeline drained"
        );

        Ok(stats)
    }
}
