//! Cache Statistics Module
//!
//! An [`Observer`] that accumulates operation counts, timings, lock waits
//! and size gauges in atomics, and exposes them as a serializable snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

use super::observer::{LockMode, Observer, Operation};

const OPERATION_COUNT: usize = Operation::ALL.len();

// == Per-Operation Counters ==
#[derive(Debug, Default)]
struct OperationCounters {
    success: AtomicU64,
    failure: AtomicU64,
    total_micros: AtomicU64,
}

// == Stats Observer ==
/// Thread-safe statistics collector.
#[derive(Debug, Default)]
pub struct StatsObserver {
    operations: [OperationCounters; OPERATION_COUNT],
    read_wait_micros: AtomicU64,
    write_wait_micros: AtomicU64,
    item_count: AtomicU64,
    memory_bytes: AtomicU64,
}

impl StatsObserver {
    // == Constructor ==
    /// Creates a collector with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Snapshot ==
    /// Returns a point-in-time copy of every counter.
    pub fn snapshot(&self) -> StatsSnapshot {
        let operations = Operation::ALL
            .iter()
            .map(|op| {
                let counters = &self.operations[op.index()];
                OperationStats {
                    operation: op.as_str(),
                    success: counters.success.load(Ordering::Relaxed),
                    failure: counters.failure.load(Ordering::Relaxed),
                    total_micros: counters.total_micros.load(Ordering::Relaxed),
                }
            })
            .collect();

        StatsSnapshot {
            operations,
            read_wait_micros: self.read_wait_micros.load(Ordering::Relaxed),
            write_wait_micros: self.write_wait_micros.load(Ordering::Relaxed),
            item_count: self.item_count.load(Ordering::Relaxed),
            memory_bytes: self.memory_bytes.load(Ordering::Relaxed),
        }
    }
}

impl Observer for StatsObserver {
    fn observe_operation(&self, op: Operation, elapsed: Duration) {
        self.operations[op.index()]
            .total_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    fn record_outcome(&self, op: Operation, success: bool) {
        let counters = &self.operations[op.index()];
        if success {
            counters.success.fetch_add(1, Ordering::Relaxed);
        } else {
            counters.failure.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn observe_lock_wait(&self, mode: LockMode, elapsed: Duration) {
        let micros = elapsed.as_micros() as u64;
        match mode {
            LockMode::Read => self.read_wait_micros.fetch_add(micros, Ordering::Relaxed),
            LockMode::Write => self.write_wait_micros.fetch_add(micros, Ordering::Relaxed),
        };
    }

    fn update_size(&self, items: usize, bytes: usize) {
        self.item_count.store(items as u64, Ordering::Relaxed);
        self.memory_bytes.store(bytes as u64, Ordering::Relaxed);
    }
}

// == Snapshot Types ==
/// Counters for a single operation.
#[derive(Debug, Clone, Serialize)]
pub struct OperationStats {
    pub operation: &'static str,
    pub success: u64,
    pub failure: u64,
    pub total_micros: u64,
}

/// Copy of all collected statistics.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub operations: Vec<OperationStats>,
    pub read_wait_micros: u64,
    pub write_wait_micros: u64,
    pub item_count: u64,
    pub memory_bytes: u64,
}

impl StatsSnapshot {
    /// Counters for `op`.
    pub fn operation(&self, op: Operation) -> &OperationStats {
        &self.operations[op.index()]
    }

    // == Hit Rate ==
    /// Fraction of gets that found a live key, or 0.0 if no gets were made.
    pub fn hit_rate(&self) -> f64 {
        let get = self.operation(Operation::Get);
        let total = get.success + get.failure;
        if total == 0 {
            0.0
        } else {
            get.success as f64 / total as f64
        }
    }
}
