//! Search Module
//!
//! Ordered index of live keys and the glob/regex matchers run over it.

use std::collections::BTreeSet;
use std::ops::Bound;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

// == Search Mode ==
/// How a search pattern is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SearchMode {
    /// Shell-style glob (`*`, `?`, `[...]`)
    #[default]
    Wildcard,
    /// Regular expression, matched against the whole key
    Regex,
}

// == Search Index ==
/// Ordered set of live keys supporting prefix walks.
#[derive(Debug, Default)]
pub struct SearchIndex {
    keys: BTreeSet<String>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `key`; a no-op if it is already present.
    pub fn insert(&mut self, key: &str) {
        if !self.keys.contains(key) {
            self.keys.insert(key.to_string());
        }
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.keys.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Keys starting with `prefix`, in order.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.keys
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |key| key.starts_with(prefix))
            .map(String::as_str)
    }

    /// Every key, in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

// == Matcher ==
/// A compiled search pattern.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Glob of the form `<literal>*`, served by a prefix walk
    Prefix(String),
    /// Anything else, tested key by key
    Pattern(Regex),
}

impl Matcher {
    /// Compiles `pattern` according to `mode`.
    ///
    /// # Errors
    /// `InvalidPattern` if the regex does not compile or the glob is malformed.
    pub fn compile(pattern: &str, mode: SearchMode) -> Result<Self> {
        match mode {
            SearchMode::Wildcard => {
                if let Some(prefix) = literal_prefix(pattern) {
                    return Ok(Matcher::Prefix(prefix.to_string()));
                }
                let translated = glob_to_regex(pattern)?;
                Regex::new(&translated)
                    .map(Matcher::Pattern)
                    .map_err(|e| CacheError::InvalidPattern(format!("{pattern}: {e}")))
            }
            SearchMode::Regex => {
                Regex::new(pattern)
                    .map_err(|e| CacheError::InvalidPattern(format!("{pattern}: {e}")))?;
                // Validated unanchored first so wrapping cannot repair a broken pattern.
                Regex::new(&format!("^(?:{pattern})$"))
                    .map(Matcher::Pattern)
                    .map_err(|e| CacheError::InvalidPattern(format!("{pattern}: {e}")))
            }
        }
    }

    /// Tests a single key.
    pub fn is_match(&self, key: &str) -> bool {
        match self {
            Matcher::Prefix(prefix) => key.starts_with(prefix.as_str()),
            Matcher::Pattern(re) => re.is_match(key),
        }
    }
}

const GLOB_META: [char; 4] = ['*', '?', '[', '\\'];

/// Returns the literal prefix if `pattern` is `<literal>*`.
fn literal_prefix(pattern: &str) -> Option<&str> {
    let prefix = pattern.strip_suffix('*')?;
    if prefix.contains(&GLOB_META[..]) {
        None
    } else {
        Some(prefix)
    }
}

// == Glob Translation ==
/// Translates a glob into an anchored regex.
///
/// `*` matches any run of characters, `?` exactly one, `[...]` a class
/// (`^` negates, `a-z` ranges) and `\` escapes the next character.
pub fn glob_to_regex(pattern: &str) -> Result<String> {
    let invalid = |reason: &str| CacheError::InvalidPattern(format!("{pattern}: {reason}"));

    let mut out = String::with_capacity(pattern.len() + 8);
    out.push_str("^(?s:");

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '\\' => {
                let escaped = chars.next().ok_or_else(|| invalid("trailing escape"))?;
                push_literal(&mut out, escaped);
            }
            '[' => {
                out.push('[');
                if chars.next_if_eq(&'^').is_some() {
                    out.push('^');
                }

                let mut members = 0;
                loop {
                    let c = chars
                        .next()
                        .ok_or_else(|| invalid("unterminated character class"))?;
                    if c == ']' {
                        if members == 0 {
                            return Err(invalid("empty character class"));
                        }
                        break;
                    }

                    let lo = class_member(c, &mut chars)
                        .ok_or_else(|| invalid("bad character class"))?;
                    push_class_char(&mut out, lo);

                    if chars.next_if_eq(&'-').is_some() {
                        let hi = chars
                            .next()
                            .and_then(|c| class_member(c, &mut chars))
                            .ok_or_else(|| invalid("incomplete range"))?;
                        if hi < lo {
                            return Err(invalid("reversed range"));
                        }
                        out.push('-');
                        push_class_char(&mut out, hi);
                    }
                    members += 1;
                }
                out.push(']');
            }
            c => push_literal(&mut out, c),
        }
    }

    out.push_str(")$");
    Ok(out)
}

/// Resolves one class member, consuming an escaped character if needed.
/// Unescaped `-` and `]` are not valid members.
fn class_member<I: Iterator<Item = char>>(c: char, rest: &mut I) -> Option<char> {
    match c {
        '\\' => rest.next(),
        '-' | ']' => None,
        c => Some(c),
    }
}

fn push_literal(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

fn push_class_char(out: &mut String, c: char) {
    if "\\[]^-&~".contains(c) {
        out.push('\\');
    }
    out.push(c);
}
