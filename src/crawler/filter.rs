//! Dedup/filter stage between link discovery and the crawl queue
//!
//! A single task consumes every candidate site and owns the visited set, so
//! deduplication needs no lock. Candidates are either retired here (external,
//! media, already seen) or admitted to the crawl queue with their in-flight
//! credit still attached.

use crate::crawler::counter::InFlight;
use crate::crawler::Site;
use crate::url::{canonical_key, is_external, is_media};
use std::collections::HashSet;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Outcome of classifying one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    External,
    Media,
    Duplicate,
}

/// Per-outcome totals for the filter stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub admitted: u64,
    pub external: u64,
    pub media: u64,
    pub duplicates: u64,
}

impl FilterStats {
    fn record(&mut self, admission: Admission) {
        match admission {
            Admission::Admitted => self.admitted += 1,
            Admission::External => self.external += 1,
            Admission::Media => self.media += 1,
            Admission::Duplicate => self.duplicates += 1,
        }
    }
}

/// Set of canonical keys for every page admitted so far
#[derive(Debug, Default)]
pub struct VisitedSet {
    keys: HashSet<String>,
}

impl VisitedSet {
    /// Decides whether `site` should be fetched, marking it as seen if so
    pub fn admit(&mut self, site: &Site) -> Admission {
        if is_external(site) {
            return Admission::External;
        }
        if is_media(site.url()) {
            return Admission::Media;
        }
        if self.keys.insert(canonical_key(site.url())) {
            Admission::Admitted
        } else {
            Admission::Duplicate
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Starts the filter task
///
/// It runs until every sender of `candidates` is dropped, then drops the
/// crawl queue sender.
pub fn spawn_filter(
    candidates: mpsc::Receiver<Site>,
    work_queue: mpsc::Sender<Site>,
    in_flight: InFlight,
) -> JoinHandle<FilterStats> {
    tokio::spawn(run_filter(candidates, work_queue, in_flight))
}

async fn run_filter(
    mut candidates: mpsc::Receiver<Site>,
    work_queue: mpsc::Sender<Site>,
    in_flight: InFlight,
) -> FilterStats {
    tracing::debug!("Site filter started");
    let mut visited = VisitedSet::default();
    let mut stats = FilterStats::default();

    while let Some(site) = candidates.recv().await {
        let admission = visited.admit(&site);
        stats.record(admission);

        if admission != Admission::Admitted {
            tracing::trace!(url = %site.url(), ?admission, "Candidate retired");
            in_flight.retire();
            continue;
        }

        tracing::debug!(url = %site.url(), "Admitting site to crawl queue");
        if let Err(mpsc::error::SendError(site)) = work_queue.send(site).await {
            tracing::error!(url = %site.url(), "Crawl queue is gone; retiring site");
            in_flight.retire();
        }
    }

    tracing::debug!(visited = visited.len(), "Site filter stopped");
    stats
}
