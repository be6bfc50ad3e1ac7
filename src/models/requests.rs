//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::SearchMode;

/// Pattern prefix that forces regex matching regardless of `mode`.
pub const REGEX_PREFIX: &str = "regex:";

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: The value to store
/// - `expire`: Optional duration string such as `"30s"` or `"1h30m"`;
///   empty or missing means the entry never expires
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: String,
    /// Optional TTL as a duration string
    #[serde(default)]
    pub expire: String,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        None
    }
}

/// Request body for the SEARCH operation (POST /search)
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    /// Glob or regular expression, optionally prefixed with `regex:`
    pub pattern: String,
    /// Matching mode, `WILDCARD` unless stated
    #[serde(default)]
    pub mode: SearchMode,
}

impl SearchRequest {
    /// Returns the pattern and mode the engine should use.
    ///
    /// A `regex:` prefix is stripped and switches the mode to regex.
    pub fn resolve(&self) -> (&str, SearchMode) {
        match self.pattern.strip_prefix(REGEX_PREFIX) {
            Some(pattern) => (pattern, SearchMode::Regex),
            None => (self.pattern.as_str(), self.mode),
        }
    }
}
