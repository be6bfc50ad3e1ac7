//! Observer Module
//!
//! The seam through which the engine reports timings, outcomes and size
//! gauges. The engine never depends on a concrete metrics backend.

use std::time::Duration;

// == Operation Labels ==
/// Engine operations reported to an [`Observer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    Set,
    Del,
    ExpireKey,
    Reset,
    /// Search in wildcard mode
    Wildcard,
    /// Search in regex mode
    Regex,
    /// Footprint recomputation after a set
    SizeCalculation,
    /// One evictor sweep
    Evict,
}

impl Operation {
    /// All operations, in label order.
    pub const ALL: [Operation; 9] = [
        Operation::Get,
        Operation::Set,
        Operation::Del,
        Operation::ExpireKey,
        Operation::Reset,
        Operation::Wildcard,
        Operation::Regex,
        Operation::SizeCalculation,
        Operation::Evict,
    ];

    /// Metric label for this operation.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::Set => "set",
            Operation::Del => "del",
            Operation::ExpireKey => "expire_key",
            Operation::Reset => "reset",
            Operation::Wildcard => "wildcard",
            Operation::Regex => "regex",
            Operation::SizeCalculation => "size_calculation",
            Operation::Evict => "evict",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

// == Lock Mode ==
/// Which side of the reader/writer lock was acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockMode {
    Read,
    Write,
}

impl LockMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LockMode::Read => "read",
            LockMode::Write => "write",
        }
    }
}

// == Observer Trait ==
/// Receives telemetry from the engine.
///
/// Every method has an empty default body, so an implementation only needs
/// to override what it cares about. Calls may arrive while the engine holds
/// its lock; implementations must not call back into the engine.
pub trait Observer: Send + Sync {
    /// Duration of one operation.
    fn observe_operation(&self, _op: Operation, _elapsed: Duration) {}

    /// Outcome of one operation.
    fn record_outcome(&self, _op: Operation, _success: bool) {}

    /// Time spent waiting to acquire the engine lock.
    fn observe_lock_wait(&self, _mode: LockMode, _elapsed: Duration) {}

    /// Current item count and estimated byte footprint.
    fn update_size(&self, _items: usize, _bytes: usize) {}
}

/// Observer that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}
