//! Keyspace Module
//!
//! The value map, expiration index and search index, mutated together.
//!
//! A `Keyspace` is only ever touched through the engine's lock, so every
//! method here sees and leaves the three structures consistent: the key set
//! of the search index always equals the key set of the value map.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use crate::cache::{Entry, ExpirationIndex, Matcher, SearchIndex};

// == Footprint ==
/// Item count and estimated byte size of the keyspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub items: usize,
    pub bytes: usize,
}

/// One in this many entries is measured once sampling kicks in.
const SAMPLE_STRIDE: usize = 100;

// == Keyspace ==
#[derive(Debug, Default)]
pub struct Keyspace {
    values: HashMap<String, Entry>,
    expirations: ExpirationIndex,
    index: SearchIndex,
}

impl Keyspace {
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert ==
    /// Writes or overwrites `key`.
    ///
    /// A finite expiration pushes a new record; records from earlier sets of
    /// the same key stay in the expiration index until popped.
    pub fn insert(&mut self, key: String, value: String, expires_at: Option<Instant>) {
        if let Some(expires) = expires_at {
            self.expirations.push(key.clone(), expires);
        }
        self.index.insert(&key);
        self.values.insert(key, Entry::new(value, expires_at));
    }

    // == Lookup ==
    pub fn lookup(&self, key: &str) -> Option<&Entry> {
        self.values.get(key)
    }

    // == Remove ==
    /// Removes `key` from the value map and the search index.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        let entry = self.values.remove(key)?;
        self.index.remove(key);
        Some(entry)
    }

    // == Delete ==
    /// Removes `key` everywhere, including its expiration records.
    ///
    /// Returns whether the key existed.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.remove(key).is_none() {
            return false;
        }
        self.expirations.remove_key(key);
        true
    }

    // == Evict Expired ==
    /// Pops expired records and deletes the entries they still describe.
    ///
    /// At most `limit` records are popped, stale ones included, which bounds
    /// the work done per call. A popped record only deletes its key when the
    /// stored entry carries exactly the same expiration, so a record
    /// superseded by a later set is discarded without effect.
    ///
    /// Returns the number of entries removed.
    pub fn evict_expired(&mut self, now: Instant, limit: usize) -> usize {
        let mut removed = 0;
        for _ in 0..limit {
            let Some(record) = self.expirations.pop_expired(now) else {
                break;
            };

            let current = self
                .values
                .get(&record.key)
                .is_some_and(|entry| entry.expires_at == Some(record.expires_at));
            if current {
                self.remove(&record.key);
                removed += 1;
            }
        }
        removed
    }

    // == Search ==
    /// Returns live keys accepted by `matcher`. Expired entries are skipped
    /// but left in place.
    pub fn search(&self, matcher: &Matcher, now: Instant) -> Vec<String> {
        match matcher {
            Matcher::Prefix(prefix) => self.collect_live(self.index.with_prefix(prefix), now),
            Matcher::Pattern(_) => self.collect_live(
                self.index.iter().filter(|key| matcher.is_match(key)),
                now,
            ),
        }
    }

    fn collect_live<'a, I>(&self, keys: I, now: Instant) -> Vec<String>
    where
        I: Iterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut matches = Vec::new();
        for key in keys {
            if !seen.insert(key) {
                continue;
            }
            let live = self
                .values
                .get(key)
                .is_some_and(|entry| !entry.is_expired_at(now));
            if live {
                matches.push(key.to_string());
            }
        }
        matches
    }

    // == Clear ==
    /// Empties all three structures. Returns the number of entries removed.
    pub fn clear(&mut self) -> usize {
        let count = self.values.len();
        self.values.clear();
        self.expirations.clear();
        self.index.clear();
        count
    }

    // == Footprint ==
    /// Estimates the byte size of keys plus values.
    ///
    /// Below `exact_threshold` entries every entry is measured. At or above
    /// it, one entry in every hundred is measured and the sum scaled up.
    pub fn footprint(&self, exact_threshold: usize) -> Footprint {
        let items = self.values.len();

        let bytes = if items < exact_threshold {
            self.values
                .iter()
                .map(|(key, entry)| entry.footprint(key))
                .sum()
        } else {
            let (sampled, sampled_bytes) = self
                .values
                .iter()
                .step_by(SAMPLE_STRIDE)
                .fold((0usize, 0usize), |(n, bytes), (key, entry)| {
                    (n + 1, bytes + entry.footprint(key))
                });
            if sampled == 0 {
                0
            } else {
                sampled_bytes * items / sampled
            }
        };

        Footprint { items, bytes }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of records in the expiration index, stale ones included.
    pub fn pending_expirations(&self) -> usize {
        self.expirations.len()
    }

    /// Number of keys in the search index.
    pub fn indexed_keys(&self) -> usize {
        self.index.len()
    }
}
