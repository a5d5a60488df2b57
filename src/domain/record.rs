//! Cached resolution outcome for a single URL key.

use chrono::Utc;

/// One cached resolution result.
///
/// A record is immutable once stored: refreshing the access time or changing
/// the outcome always replaces the whole record under its key. Every URL
/// visited during one resolution chain gets its own record (same `code` and
/// `text`, independent `last_access`), so each can expire independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    /// Milliseconds since epoch of the last read, or of the write for fresh
    /// records. Error outcomes are written backdated, see [`CacheRecord::stamped`].
    pub last_access: i64,
    /// Outcome status: 200 for success, an upstream status for terminal
    /// non-redirect responses, 400/500 for resolver-detected failures.
    pub code: u16,
    /// Resolved URL on success, or an `ERR ...` message on failure.
    pub text: String,
}

impl CacheRecord {
    /// Builds a record stamped for storage at `now_ms`.
    ///
    /// Non-200 outcomes are backdated by 90% of `max_cache_age_ms` so they
    /// expire roughly ten times sooner than successful resolutions.
    pub fn stamped(code: u16, text: impl Into<String>, now_ms: i64, max_cache_age_ms: i64) -> Self {
        let last_access = if code == 200 {
            now_ms
        } else {
            now_ms - max_cache_age_ms * 9 / 10
        };

        Self {
            last_access,
            code,
            text: text.into(),
        }
    }

    /// Same outcome with the access time moved to `now_ms`.
    pub fn touched(&self, now_ms: i64) -> Self {
        Self {
            last_access: now_ms,
            code: self.code,
            text: self.text.clone(),
        }
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
