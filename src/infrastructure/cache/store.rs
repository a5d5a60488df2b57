//! Concurrent in-memory store of resolution records.

use dashmap::DashMap;

use crate::domain::CacheRecord;

/// Thread-safe in-memory map from URL to its cached resolution record.
///
/// Backed by a `DashMap` so reads are concurrent and lock-free for most
/// cases. Per-key operations are atomic; enumeration via [`CacheStore::keys`]
/// is a point-in-time snapshot that tolerates concurrent writers, which is
/// all the cleaner needs since it re-checks every record at delete time.
///
/// Key count is unbounded here; retention is enforced by the cleaner
/// (see [`crate::application::services::CleanerService`]).
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: DashMap<String, CacheRecord>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a record without changing it.
    pub fn get(&self, key: &str) -> Option<CacheRecord> {
        self.entries.get(key).map(|entry| entry.clone())
    }

    /// Looks up a record and, if present, refreshes its access time.
    ///
    /// The stored record is replaced wholesale; records are never mutated
    /// in place. Returns the refreshed record.
    pub fn touch(&self, key: &str, now_ms: i64) -> Option<CacheRecord> {
        let mut entry = self.entries.get_mut(key)?;
        let refreshed = entry.touched(now_ms);
        *entry = refreshed.clone();
        Some(refreshed)
    }

    /// Inserts or overwrites the record under `key`.
    pub fn put(&self, key: impl Into<String>, record: CacheRecord) {
        self.entries.insert(key.into(), record);
    }

    /// Removes the record under `key`. Returns whether anything was removed.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Removes the record under `key` only if its last access is older than
    /// `cutoff_ms` at the moment of removal.
    ///
    /// The predicate runs against the live record under the shard lock, so a
    /// record refreshed between a scan and this call survives.
    pub fn evict_if_older(&self, key: &str, cutoff_ms: i64) -> bool {
        self.entries
            .remove_if(key, |_, record| record.last_access < cutoff_ms)
            .is_some()
    }

    /// Snapshot of all keys currently in the store.
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
