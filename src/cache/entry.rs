//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Instant;

// == Cache Entry ==
/// A stored value plus its optional absolute expiration instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The stored value
    pub value: String,
    /// Expiration instant, None = never expires
    pub expires_at: Option<Instant>,
}

impl Entry {
    // == Constructor ==
    pub fn new(value: String, expires_at: Option<Instant>) -> Self {
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now` reaches the
    /// expiration instant, so a zero TTL expires immediately.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    /// Checks if the entry has expired as of the current instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Bytes attributed to this entry for footprint accounting.
    pub fn footprint(&self, key: &str) -> usize {
        key.len() + self.value.len()
    }
}
