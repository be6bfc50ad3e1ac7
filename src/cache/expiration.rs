//! Expiration Index Module
//!
//! Min-heap of `(expiration, key)` records used to find eviction candidates.
//!
//! Records are pushed on every set with a TTL and are not removed when the
//! key is overwritten, so the heap may hold stale records. Consumers must
//! re-check each popped record against the value store before acting on it.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;

// == Expiration Record ==
/// A key and the expiration instant it had when the record was pushed.
///
/// Field order gives the ordering: earliest expiration first, ties by key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExpirationRecord {
    pub expires_at: Instant,
    pub key: String,
}

// == Expiration Index ==
#[derive(Debug, Default)]
pub struct ExpirationIndex {
    heap: BinaryHeap<Reverse<ExpirationRecord>>,
}

impl ExpirationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record. Older records for the same key are left in place.
    pub fn push(&mut self, key: String, expires_at: Instant) {
        self.heap.push(Reverse(ExpirationRecord { expires_at, key }));
    }

    /// Returns the record with the earliest expiration.
    pub fn peek(&self) -> Option<&ExpirationRecord> {
        self.heap.peek().map(|Reverse(record)| record)
    }

    /// Pops the earliest record if it has expired as of `now`.
    pub fn pop_expired(&mut self, now: Instant) -> Option<ExpirationRecord> {
        if self.peek()?.expires_at > now {
            return None;
        }
        self.heap.pop().map(|Reverse(record)| record)
    }

    /// Removes every record for `key`. Linear in the number of records.
    pub fn remove_key(&mut self, key: &str) -> usize {
        let before = self.heap.len();
        self.heap.retain(|Reverse(record)| record.key != key);
        before - self.heap.len()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_peek_returns_earliest() {
        let now = Instant::now();
        let mut index = ExpirationIndex::new();

        index.push("key1".to_string(), now + Duration::from_secs(60));
        index.push("key2".to_string(), now + Duration::from_secs(120));
        index.push("key3".to_string(), now + Duration::from_secs(30));

        assert_eq!(index.peek().unwrap().key, "key3");
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_pop_expired_stops_at_future_record() {
        let now = Instant::now();
        let mut index = ExpirationIndex::new();

        index.push("old".to_string(), now - Duration::from_millis(5));
        index.push("boundary".to_string(), now);
        index.push("future".to_string(), now + Duration::from_secs(1));

        assert_eq!(index.pop_expired(now).unwrap().key, "old");
        assert_eq!(index.pop_expired(now).unwrap().key, "boundary");
        assert!(index.pop_expired(now).is_none());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_pop_expired_on_empty_index() {
        let mut index = ExpirationIndex::new();
        assert!(index.pop_expired(Instant::now()).is_none());
    }

    #[test]
    fn test_remove_key_drops_all_records_for_key() {
        let now = Instant::now();
        let mut index = ExpirationIndex::new();

        index.push("key1".to_string(), now + Duration::from_secs(1));
        index.push("key2".to_string(), now + Duration::from_secs(2));
        index.push("key1".to_string(), now + Duration::from_secs(3));

        assert_eq!(index.remove_key("key1"), 2);
        assert_eq!(index.len(), 1);
        assert_eq!(index.peek().unwrap().key, "key2");
        assert_eq!(index.remove_key("missing"), 0);
    }

    #[test]
    fn test_stale_records_are_kept() {
        let now = Instant::now();
        let mut index = ExpirationIndex::new();

        index.push("key".to_string(), now + Duration::from_secs(3600));
        index.push("key".to_string(), now + Duration::from_millis(1));

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.peek().unwrap().expires_at,
            now + Duration::from_millis(1)
        );
    }

    #[test]
    fn test_clear() {
        let mut index = ExpirationIndex::new();
        index.push("key".to_string(), Instant::now());
        index.clear();
        assert!(index.is_empty());
        assert!(index.peek().is_none());
    }
}
