//! Crawl statistics assembled from the per-stage tallies

use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// Summary of one completed crawl run
#[derive(Debug, Clone)]
pub struct CrawlStats {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,

    /// Pages fetched and parsed into a result
    pub pages_mapped: u64,

    /// Pages retired because fetching or link extraction failed
    pub pages_failed: u64,

    /// Candidates retired for living on another host
    pub external_links: u64,

    /// Candidates retired as non-HTML resources
    pub media_links: u64,

    /// Candidates retired because their page was already admitted
    pub duplicate_links: u64,

    /// Lines written to the site map
    pub edges_written: u64,

    /// Highest number of sites in flight at once
    pub peak_in_flight: i64,
}

impl CrawlStats {
    /// Pages admitted to the crawl queue (each fetched at most once)
    pub fn pages_admitted(&self) -> u64 {
        self.pages_mapped + self.pages_failed
    }
}

impl fmt::Display for CrawlStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pages mapped, {} failed, {} edges written \
             ({} external, {} media, {} duplicate links skipped; peak in flight {}) in {:?}",
            self.pages_mapped,
            self.pages_failed,
            self.edges_written,
            self.external_links,
            self.media_links,
            self.duplicate_links,
            self.peak_in_flight,
            self.elapsed
        )
    }
}
