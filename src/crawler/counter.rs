//! In-flight accounting and quiescence detection
//!
//! A single task owns the in-flight total. Every other stage reports changes
//! as signed deltas over an unbounded channel, so reporting never blocks and
//! all mutation is serialized. When the total returns to zero the crawl
//! queue is closed, which is the only termination signal the workers get.

use crate::crawler::queue::QueueCloser;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handle used by pipeline stages to report in-flight changes
#[derive(Debug, Clone)]
pub struct InFlight {
    deltas: mpsc::UnboundedSender<i64>,
}

impl InFlight {
    /// Accounts for `count` new candidates before they enter the pipeline
    pub fn credit(&self, count: usize) {
        if count > 0 {
            self.apply(count as i64);
        }
    }

    /// Removes one site from in-flight accounting
    pub fn retire(&self) {
        self.apply(-1);
    }

    fn apply(&self, delta: i64) {
        if self.deltas.send(delta).is_err() {
            tracing::warn!(delta, "In-flight counter has stopped; delta dropped");
        }
    }
}

/// Summary of the counter's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterStats {
    /// Highest in-flight total observed
    pub peak_in_flight: i64,

    /// Deltas applied before quiescence
    pub deltas_applied: u64,

    /// Deltas that arrived after the queue was closed (always 0 in a sound run)
    pub late_deltas: u64,
}

/// Running total of in-flight sites
#[derive(Debug, Default)]
struct Tally {
    in_flight: i64,
    stats: CounterStats,
}

impl Tally {
    /// Applies a delta and returns true if the total is now zero
    fn apply(&mut self, delta: i64) -> bool {
        self.in_flight += delta;
        self.stats.deltas_applied += 1;
        self.stats.peak_in_flight = self.stats.peak_in_flight.max(self.in_flight);
        self.in_flight == 0
    }
}

/// Starts the counter task; it closes `closer` when the total returns to zero
///
/// The task runs until every [`InFlight`] handle has been dropped.
pub fn spawn_counter(closer: QueueCloser) -> (InFlight, JoinHandle<CounterStats>) {
    let (delta_tx, delta_rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(run_counter(delta_rx, closer));
    (InFlight { deltas: delta_tx }, handle)
}

async fn run_counter(mut deltas: mpsc::UnboundedReceiver<i64>, closer: QueueCloser) -> CounterStats {
    tracing::debug!("In-flight counter started");
    let mut tally = Tally::default();

    while let Some(delta) = deltas.recv().await {
        if closer.is_closed() {
            tally.stats.late_deltas += 1;
            tracing::warn!(delta, "Delta received after the crawl queue was closed");
            continue;
        }

        let quiescent = tally.apply(delta);
        tracing::trace!(delta, in_flight = tally.in_flight, "In-flight count updated");

        if tally.in_flight < 0 {
            tracing::error!(in_flight = tally.in_flight, "In-flight count went negative");
        }

        if quiescent {
            tracing::debug!("No sites in flight, closing crawl queue");
            closer.close();
        }
    }

    tracing::debug!("In-flight counter stopped");
    tally.stats
}
