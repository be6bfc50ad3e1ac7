//! Simple Cache - an in-memory key-value cache
//!
//! Provides TTL expiration with a background evictor, prefix/glob/regex key
//! search, and pluggable telemetry, served over a small HTTP API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::{Engine, SearchMode};
pub use config::{Config, EngineConfig};
pub use error::{ApiError, CacheError};
pub use metrics::{NoopObserver, Observer, Operation, StatsObserver};
