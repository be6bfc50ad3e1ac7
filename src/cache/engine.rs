//! Cache Engine Module
//!
//! Composition root: owns the keyspace behind the instrumented lock, the
//! observer, and the lifecycle of the background evictor.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::cache::{ttl, InstrumentedRwLock, Keyspace, Matcher, SearchMode};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::metrics::{NoopObserver, Observer, Operation};
use crate::tasks::Evictor;

// == Engine ==
/// Thread-safe cache engine with TTL expiration and pattern search.
///
/// All operations are synchronous and may be called concurrently. Reads
/// (`get`'s fast path, `search`) share the lock; writes take it exclusively.
///
/// # Example
///
/// ```rust,no_run
/// use simple_cache::{Engine, SearchMode};
///
/// #[tokio::main]
/// async fn main() {
///     let engine = Engine::with_defaults();
///     engine.set("user:1", "alice", "1h").unwrap();
///     assert_eq!(engine.get("user:1").as_deref(), Some("alice"));
///     assert_eq!(engine.search("user:*", SearchMode::Wildcard).unwrap(), vec!["user:1"]);
///     engine.shutdown().await;
/// }
/// ```
pub struct Engine {
    keyspace: Arc<InstrumentedRwLock<Keyspace>>,
    observer: Arc<dyn Observer>,
    sample_threshold: usize,
    evictor: Mutex<Option<Evictor>>,
}

impl Engine {
    // == Constructor ==
    /// Creates an engine and starts its evictor.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime, which the evictor needs.
    pub fn new(config: EngineConfig, observer: Arc<dyn Observer>) -> Self {
        let keyspace = Arc::new(InstrumentedRwLock::new(Keyspace::new(), observer.clone()));
        let evictor = Evictor::spawn(
            keyspace.clone(),
            observer.clone(),
            config.cleanup_interval,
            config.eviction_batch,
        );

        Self {
            keyspace,
            observer,
            sample_threshold: config.sample_threshold,
            evictor: Mutex::new(Some(evictor)),
        }
    }

    /// Creates an engine with default settings and no telemetry.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default(), Arc::new(NoopObserver))
    }

    // == Set ==
    /// Stores `value` under `key`.
    ///
    /// `ttl` is empty for no expiration, otherwise a duration string such as
    /// `"30s"` or `"1h30m"`.
    ///
    /// # Errors
    /// `InvalidTtl` if `ttl` cannot be parsed. Nothing is written in that case.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>, ttl: &str) -> Result<()> {
        let key = key.into();
        debug!(key = %key, ttl, "set");

        let start = Instant::now();
        let result = ttl::expiration_from_ttl(ttl, start).map(|expires_at| {
            let mut keyspace = self.keyspace.write();
            keyspace.insert(key, value.into(), expires_at);
            self.report_size(&keyspace);
        });
        self.finish(Operation::Set, start, result.is_ok());
        result
    }

    // == Get ==
    /// Returns the live value for `key`.
    ///
    /// An expired entry found here is deleted, after re-checking it under the
    /// exclusive lock.
    pub fn get(&self, key: &str) -> Option<String> {
        debug!(key, "get");

        let start = Instant::now();
        let value = self.get_live(key);
        self.finish(Operation::Get, start, value.is_some());
        value
    }

    fn get_live(&self, key: &str) -> Option<String> {
        {
            let keyspace = self.keyspace.read();
            let entry = keyspace.lookup(key)?;
            if !entry.is_expired() {
                return Some(entry.value.clone());
            }
        }

        // The entry may have been refreshed or deleted since the read lock
        // was released; only the second look decides.
        recheck_expired(&mut self.keyspace.write(), key, Instant::now())
    }

    // == Delete ==
    /// Removes `key`. Returns whether it existed.
    pub fn del(&self, key: &str) -> bool {
        debug!(key, "del");
        self.delete_as(Operation::Del, key)
    }

    /// Expires `key` immediately. Returns whether it existed.
    pub fn expire_key(&self, key: &str) -> bool {
        debug!(key, "expire key");
        self.delete_as(Operation::ExpireKey, key)
    }

    fn delete_as(&self, op: Operation, key: &str) -> bool {
        let start = Instant::now();
        let existed = self.keyspace.write().delete(key);
        self.finish(op, start, existed);
        existed
    }

    // == Search ==
    /// Returns the live keys matching `pattern`, in no particular order.
    ///
    /// A wildcard pattern of the form `prefix*` walks the key index directly;
    /// any other pattern is tested against every key.
    ///
    /// # Errors
    /// `InvalidPattern` if the glob is malformed or the regex does not compile.
    pub fn search(&self, pattern: &str, mode: SearchMode) -> Result<Vec<String>> {
        debug!(pattern, ?mode, "search");

        let op = match mode {
            SearchMode::Wildcard => Operation::Wildcard,
            SearchMode::Regex => Operation::Regex,
        };

        let start = Instant::now();
        let result = Matcher::compile(pattern, mode).map(|matcher| {
            let keyspace = self.keyspace.read();
            keyspace.search(&matcher, Instant::now())
        });
        self.finish(op, start, result.is_ok());
        result
    }

    // == Reset ==
    /// Removes every key. Returns how many entries were cleared.
    pub fn reset(&self) -> usize {
        let start = Instant::now();
        let count = {
            let mut keyspace = self.keyspace.write();
            let count = keyspace.clear();
            self.report_size(&keyspace);
            count
        };
        self.finish(Operation::Reset, start, true);

        info!("Cache reset: cleared {} entries", count);
        count
    }

    // == Length ==
    /// Number of stored entries, including expired ones not yet removed.
    pub fn len(&self) -> usize {
        self.keyspace.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyspace.read().is_empty()
    }

    // == Shutdown ==
    /// Stops the evictor and waits for it to exit.
    ///
    /// After this returns no background task touches the keyspace. Calling it
    /// again is a no-op; the engine keeps serving requests without eviction.
    pub async fn shutdown(&self) {
        let evictor = self.evictor.lock().take();
        if let Some(evictor) = evictor {
            evictor.shutdown().await;
            info!("Cache engine evictor stopped");
        }
    }

    fn report_size(&self, keyspace: &Keyspace) {
        let start = Instant::now();
        let footprint = keyspace.footprint(self.sample_threshold);
        self.observer.update_size(footprint.items, footprint.bytes);
        self.observer
            .observe_operation(Operation::SizeCalculation, start.elapsed());
    }

    fn finish(&self, op: Operation, start: Instant, success: bool) {
        self.observer.observe_operation(op, start.elapsed());
        self.observer.record_outcome(op, success);
    }

    #[cfg(test)]
    pub(crate) fn keyspace(&self) -> &InstrumentedRwLock<Keyspace> {
        &self.keyspace
    }
}

/// Second look at `key` under the exclusive lock.
///
/// Returns the value if the entry is live as of `now`. An entry that is still
/// expired is removed; one refreshed by a concurrent set is left alone.
fn recheck_expired(keyspace: &mut Keyspace, key: &str, now: Instant) -> Option<String> {
    let entry = keyspace.lookup(key)?;
    if !entry.is_expired_at(now) {
        return Some(entry.value.clone());
    }
    keyspace.remove(key);
    None
}
