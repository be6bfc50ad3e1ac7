//! Cache Module
//!
//! In-memory key/value engine with TTL expiration and pattern search.
//!
//! The value map, the expiration index and the search index live together
//! in a [`Keyspace`] behind one instrumented reader/writer lock.

mod engine;
mod entry;
mod expiration;
mod guard;
mod keyspace;
mod search;
pub mod ttl;


// Re-export public types
pub use engine::Engine;
pub use entry::Entry;
pub use expiration::{ExpirationIndex, ExpirationRecord};
pub use guard::InstrumentedRwLock;
pub use keyspace::{Footprint, Keyspace};
pub use search::{glob_to_regex, Matcher, SearchIndex, SearchMode};
