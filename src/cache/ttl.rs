//! TTL Parsing Module
//!
//! Parses duration strings such as `300ms`, `1.5h` or `2h45m` and turns a
//! TTL string into an absolute expiration instant.
//!
//! A TTL string is an optional sign followed by one or more `<number><unit>` groups.
//! Numbers may carry a decimal fraction. Valid units are `ns`, `us` (or `µs`),
//! `ms`, `s`, `m` and `h`. The bare string `0` is accepted as zero.

use std::time::{Duration, Instant};

use crate::error::{CacheError, Result};

/// Largest representable duration, in nanoseconds (about 292 years).
const MAX_NANOS: u128 = i64::MAX as u128;

/// Fraction digits beyond this are ignored.
const MAX_FRACTION_DIGITS: usize = 18;

// == Signed Duration ==
/// A parsed duration with its sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedDuration {
    pub negative: bool,
    pub magnitude: Duration,
}

impl SignedDuration {
    /// Applies this duration to `now`.
    ///
    /// Instants before the clock's origin clamp to `now`, which is already
    /// expired for any non-positive duration.
    pub fn offset(self, now: Instant) -> Option<Instant> {
        if self.negative {
            Some(now.checked_sub(self.magnitude).unwrap_or(now))
        } else {
            now.checked_add(self.magnitude)
        }
    }
}

// == Parse Duration ==
/// Parses a duration string.
pub fn parse_duration(spec: &str) -> Result<SignedDuration> {
    let invalid = || CacheError::InvalidTtl(spec.to_string());

    let (negative, mut rest) = match spec.as_bytes().first() {
        Some(b'-') => (true, &spec[1..]),
        Some(b'+') => (false, &spec[1..]),
        _ => (false, spec),
    };

    if rest == "0" {
        return Ok(SignedDuration {
            negative,
            magnitude: Duration::ZERO,
        });
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_digits, after_int) = rest.split_at(int_len);

        let (frac_digits, after_number) = match after_int.strip_prefix('.') {
            Some(after_dot) => {
                let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
                after_dot.split_at(frac_len)
            }
            None => ("", after_int),
        };
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid());
        }

        let unit_len = after_number
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after_number.len());
        let (unit, remainder) = after_number.split_at(unit_len);
        let unit_nanos = unit_nanos(unit).ok_or_else(invalid)?;

        let int_value = parse_digits(int_digits).ok_or_else(invalid)?;
        let mut nanos = int_value.checked_mul(unit_nanos).ok_or_else(invalid)?;

        if !frac_digits.is_empty() {
            let kept = &frac_digits[..frac_digits.len().min(MAX_FRACTION_DIGITS)];
            let frac_value = parse_digits(kept).ok_or_else(invalid)?;
            let scale = 10u128.pow(kept.len() as u32);
            nanos = nanos
                .checked_add(frac_value * unit_nanos / scale)
                .ok_or_else(invalid)?;
        }

        total = total.checked_add(nanos).ok_or_else(invalid)?;
        if total > MAX_NANOS {
            return Err(invalid());
        }
        rest = remainder;
    }

    Ok(SignedDuration {
        negative,
        magnitude: Duration::from_nanos(total as u64),
    })
}

// == Expiration From TTL ==
/// Converts a TTL string into an expiration instant relative to `now`.
///
/// An empty string means the entry never expires.
pub fn expiration_from_ttl(spec: &str, now: Instant) -> Result<Option<Instant>> {
    if spec.is_empty() {
        return Ok(None);
    }

    let duration = parse_duration(spec)?;
    duration
        .offset(now)
        .map(Some)
        .ok_or_else(|| CacheError::InvalidTtl(spec.to_string()))
}

fn unit_nanos(unit: &str) -> Option<u128> {
    let nanos = match unit {
        "ns" => 1,
        "us" | "\u{00b5}s" | "\u{03bc}s" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60 * 1_000_000_000,
        "h" => 60 * 60 * 1_000_000_000,
        _ => return None,
    };
    Some(nanos)
}

fn parse_digits(digits: &str) -> Option<u128> {
    if digits.is_empty() {
        return Some(0);
    }
    digits.parse().ok()
}
