//! Crawl queue shared by the worker pool
//!
//! The queue is a bounded channel fed by the filter stage and drained by all
//! workers. It is closed by a one-shot signal rather than by dropping its
//! sender, because the stage that decides the crawl is over (the in-flight
//! counter) is not the stage that feeds it.

use crate::crawler::Site;
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};

/// Creates a crawl queue holding at most `capacity` admitted sites
pub fn work_queue(capacity: usize) -> (mpsc::Sender<Site>, WorkQueue, QueueCloser) {
    let (site_tx, site_rx) = mpsc::channel(capacity);
    let (closed_tx, closed_rx) = watch::channel(false);

    let queue = WorkQueue {
        sites: Arc::new(Mutex::new(site_rx)),
        closed: closed_rx,
    };

    (site_tx, queue, QueueCloser { closed: closed_tx })
}

/// Consumer side of the crawl queue; cheap to clone, one per worker
#[derive(Debug, Clone)]
pub struct WorkQueue {
    sites: Arc<Mutex<mpsc::Receiver<Site>>>,
    closed: watch::Receiver<bool>,
}

impl WorkQueue {
    /// Waits for the next admitted site
    ///
    /// Returns `None` once the queue has been closed, or once the feeding
    /// stage has gone away and every buffered site was handed out.
    pub async fn next(&self) -> Option<Site> {
        let mut closed = self.closed.clone();
        let mut sites = self.sites.lock().await;

        tokio::select! {
            biased;
            site = sites.recv() => site,
            _ = closed.wait_for(|closed| *closed) => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }
}

/// Irreversibly closes the crawl queue
#[derive(Debug)]
pub struct QueueCloser {
    closed: watch::Sender<bool>,
}

impl QueueCloser {
    /// Closes the queue; returns true only for the call that actually closed it
    pub fn close(&self) -> bool {
        !self.closed.send_replace(true)
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }
}
