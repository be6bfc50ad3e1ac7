//! Eviction Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::{InstrumentedRwLock, Keyspace};
use crate::metrics::{Observer, Operation};

/// Handle to a running eviction task.
///
/// Dropping the handle also stops the task, but only [`Evictor::shutdown`]
/// waits for it to finish.
#[derive(Debug)]
pub struct Evictor {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Evictor {
    /// Spawns the eviction loop on the current Tokio runtime.
    ///
    /// Every `interval` the task takes the exclusive lock once and pops up
    /// to `batch_limit` expiration records, removing the entries they still
    /// describe. Anything left over is picked up on a later tick.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    pub fn spawn(
        keyspace: Arc<InstrumentedRwLock<Keyspace>>,
        observer: Arc<dyn Observer>,
        interval: Duration,
        batch_limit: usize,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run(keyspace, observer, interval, batch_limit, shutdown_rx));
        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Signals the task to stop and waits until it has exited.
    ///
    /// A sweep that is already running completes before this returns.
    pub async fn shutdown(self) {
        // Send only fails once the task is gone, which is the goal anyway.
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            warn!("Eviction task ended abnormally: {}", e);
        }
    }
}

async fn run(
    keyspace: Arc<InstrumentedRwLock<Keyspace>>,
    observer: Arc<dyn Observer>,
    interval: Duration,
    batch_limit: usize,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    info!("Starting eviction task with interval of {:?}", interval);

    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; sweeps start one interval in.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                sweep(&keyspace, observer.as_ref(), batch_limit);
            }
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    info!("Eviction task stopped");
}

/// Runs one eviction pass under the exclusive lock.
///
/// Returns the number of entries removed.
pub fn sweep(
    keyspace: &InstrumentedRwLock<Keyspace>,
    observer: &dyn Observer,
    batch_limit: usize,
) -> usize {
    let start = Instant::now();
    let removed = keyspace.write().evict_expired(Instant::now(), batch_limit);
    observer.observe_operation(Operation::Evict, start.elapsed());
    observer.record_outcome(Operation::Evict, true);

    if removed > 0 {
        info!("TTL eviction: removed {} expired entries", removed);
    } else {
        debug!("TTL eviction: no expired entries found");
    }
    removed
}
