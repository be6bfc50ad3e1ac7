//! Metrics Module
//!
//! Observer trait the engine reports through, plus a built-in collector.

mod observer;
mod stats;

pub use observer::{LockMode, NoopObserver, Observer, Operation};
pub use stats::{OperationStats, StatsObserver, StatsSnapshot};
