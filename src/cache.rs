//! # Position cache
//!
//! In-memory map from `(body name, time bucket)` to the last resolved position, with a fixed
//! validity window. An entry whose age reaches the window is never served again; it stays in
//! memory until replaced by a fresh `put` or dropped by [`PositionCache::purge_expired`].
//!
//! The map is split into independently locked shards so that writers of distinct keys seldom
//! wait on each other. Per key, reads and writes are linearizable; concurrent writers of the
//! same key race and the last write wins.
use std::{
    collections::HashMap,
    hash::{BuildHasher, RandomState},
    sync::Arc,
};

use hifitime::{Duration, Epoch};
use parking_lot::RwLock;

use crate::{
    resolver::ResolvedPosition,
    time::{Clock, SystemClock, TimeBucket},
};

const SHARD_COUNT: usize = 16;

type CacheKey = (String, TimeBucket);
type Shard = RwLock<HashMap<CacheKey, CacheEntry>>;

/// A resolved position together with the instant it was stored.
///
/// Entries are never mutated: a newer `put` replaces the whole entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheEntry {
    pub payload: ResolvedPosition,
    pub created_at: Epoch,
    pub ttl: Duration,
}

impl CacheEntry {
    /// Expired once `now - created_at >= ttl`.
    pub fn is_expired(&self, now: Epoch) -> bool {
        now - self.created_at >= self.ttl
    }
}

#[derive(Debug)]
pub struct PositionCache {
    shards: Vec<Shard>,
    hasher: RandomState,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl PositionCache {
    /// Create an empty cache.
    ///
    /// Arguments
    /// ---------
    /// * `ttl`: validity window of every entry
    /// * `clock`: time source used to stamp and age entries
    pub fn new(ttl: std::time::Duration, clock: Arc<dyn Clock>) -> Self {
        PositionCache {
            shards: (0..SHARD_COUNT).map(|_| RwLock::new(HashMap::new())).collect(),
            hasher: RandomState::new(),
            ttl: Duration::from_seconds(ttl.as_secs_f64()),
            clock,
        }
    }

    pub fn with_system_clock(ttl: std::time::Duration) -> Self {
        PositionCache::new(ttl, Arc::new(SystemClock::new()))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn shard(&self, body: &str, bucket: &TimeBucket) -> &Shard {
        let index = self.hasher.hash_one((body, bucket)) as usize % SHARD_COUNT;
        &self.shards[index]
    }

    /// Fresh entry for the key, or `None` when absent or expired.
    pub fn get(&self, body: &str, bucket: &TimeBucket) -> Option<CacheEntry> {
        let now = self.clock.now();
        self.shard(body, bucket)
            .read()
            .get(&(body.to_string(), *bucket))
            .filter(|entry| !entry.is_expired(now))
            .copied()
    }

    /// Insert or replace the entry for the key, stamped with the current instant.
    pub fn put(&self, body: &str, bucket: &TimeBucket, payload: ResolvedPosition) -> CacheEntry {
        let entry = CacheEntry {
            payload,
            created_at: self.clock.now(),
            ttl: self.ttl,
        };
        self.shard(body, bucket)
            .write()
            .insert((body.to_string(), *bucket), entry);
        entry
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        for shard in &self.shards {
            shard.write().clear();
        }
    }

    /// Drop every expired entry and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        self.shards
            .iter()
            .map(|shard| {
                let mut entries = shard.write();
                let before = entries.len();
                entries.retain(|_, entry| !entry.is_expired(now));
                before - entries.len()
            })
            .sum()
    }
}
