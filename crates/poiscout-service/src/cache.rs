//! In-memory POI cache keyed by grid cell, category set, and radius.
//!
//! Entries are written wholesale after each successful fetch and read in two
//! modes: fresh-only for normal lookups, and expired-allowed for the fallback
//! path after a failed fetch. Nothing is evicted implicitly; expired entries
//! stay until [`PoiCache::clear_expired`] or [`PoiCache::clear_all`] runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::geo::{grid_cell_id, radius_cells, GeoPoint, GRID_CELL_METERS};
use crate::poi::Poi;

/// Source of "now" for expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub pois: Vec<Poi>,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Entry counts at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub fresh_entries: usize,
    pub expired_entries: usize,
}

/// Builds the composite cache key for a nearby search.
///
/// `categories` is sorted before joining so request order does not matter.
/// The radius component is rounded up to a whole grid cell.
#[must_use]
pub fn cache_key<S: AsRef<str>>(center: GeoPoint, radius_m: u32, categories: &[S]) -> String {
    let mut sorted: Vec<&str> = categories.iter().map(|c| c.as_ref()).collect();
    sorted.sort_unstable();
    sorted.dedup();
    format!(
        "{}:{}:{}",
        grid_cell_id(center, radius_m),
        sorted.join(","),
        radius_cells(radius_m) * GRID_CELL_METERS
    )
}

pub struct PoiCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl PoiCache {
    #[must_use]
    pub fn new(ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // Entries are only ever replaced whole; a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the entry for `key` only if it has not expired.
    #[must_use]
    pub fn get_fresh(&self, key: &str) -> Option<CacheEntry> {
        let now = self.clock.now();
        self.lock()
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .cloned()
    }

    /// Returns the entry for `key` whether or not it has expired.
    #[must_use]
    pub fn get_any(&self, key: &str) -> Option<CacheEntry> {
        self.lock().get(key).cloned()
    }

    /// Stores `pois` under `key`, replacing any previous entry, and returns
    /// the entry's creation time.
    pub fn insert(&self, key: String, pois: Vec<Poi>, categories: Vec<String>) -> DateTime<Utc> {
        let created_at = self.clock.now();
        let entry = CacheEntry {
            pois,
            categories,
            created_at,
            expires_at: created_at + self.ttl,
        };
        self.lock().insert(key, entry);
        created_at
    }

    /// Removes expired entries and returns how many were dropped.
    pub fn clear_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Removes every entry and returns how many were dropped.
    pub fn clear_all(&self) -> usize {
        let mut entries = self.lock();
        let count = entries.len();
        entries.clear();
        count
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let entries = self.lock();
        let expired = entries.values().filter(|e| e.is_expired(now)).count();
        CacheStats {
            total_entries: entries.len(),
            fresh_entries: entries.len() - expired,
            expired_entries: expired,
        }
    }
}
