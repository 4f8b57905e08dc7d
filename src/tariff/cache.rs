// src/tariff/cache.rs
//! In-process TTL cache for tariff lookups.
//!
//! A hit is served iff `now - stored_at < ttl`. Entries are never refreshed on
//! read and stale entries are not dropped on read; they are overwritten by the
//! next successful lookup for the same key. Size is bounded: inserting a new key
//! at capacity purges stale entries first, then evicts the oldest.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::tariff::types::TariffRecord;

/// Default freshness window: 24 hours.
pub const DEFAULT_TTL_MS: u64 = 24 * 60 * 60 * 1000;
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Lookup inputs, exactly as supplied (no case folding or trimming).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub product: String,
    pub from: String,
    pub to: String,
}

impl CacheKey {
    pub fn new(product: &str, from: &str, to: &str) -> Self {
        Self {
            product: product.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Millisecond clock, injectable so tests can move time without sleeping.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_else(|_| Duration::from_millis(0))
            .as_millis() as u64
    }
}

/// Manually driven clock.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn at(ms: u64) -> Self {
        Self {
            now: AtomicU64::new(ms),
        }
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    record: TariffRecord,
    stored_at: u64,
}

pub struct TariffCache {
    inner: Mutex<HashMap<CacheKey, Entry>>,
    ttl_ms: u64,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl TariffCache {
    pub fn new(ttl: Duration, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl_ms: ttl.as_millis() as u64,
            capacity: capacity.max(1),
            clock,
        }
    }

    /// 24h TTL, default capacity, wall clock.
    pub fn with_defaults() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_TTL_MS),
            DEFAULT_CAPACITY,
            Arc::new(SystemClock),
        )
    }

    pub fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    fn is_fresh(&self, e: &Entry, now: u64) -> bool {
        now.saturating_sub(e.stored_at) < self.ttl_ms
    }

    /// Fresh record for `key`, if any.
    pub fn get(&self, key: &CacheKey) -> Option<TariffRecord> {
        let now = self.now();
        let map = self.inner.lock().expect("tariff cache mutex poisoned");
        map.get(key)
            .filter(|e| self.is_fresh(e, now))
            .map(|e| e.record.clone())
    }

    /// Store `record` under `key` stamped with the current time (last write wins).
    pub fn put(&self, key: CacheKey, record: TariffRecord) {
        let now = self.now();
        let mut map = self.inner.lock().expect("tariff cache mutex poisoned");

        if !map.contains_key(&key) && map.len() >= self.capacity {
            map.retain(|_, e| now.saturating_sub(e.stored_at) < self.ttl_ms);
            if map.len() >= self.capacity {
                let oldest = map
                    .iter()
                    .min_by_key(|(_, e)| e.stored_at)
                    .map(|(k, _)| k.clone());
                if let Some(k) = oldest {
                    map.remove(&k);
                }
            }
        }

        map.insert(
            key,
            Entry {
                record,
                stored_at: now,
            },
        );
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("tariff cache mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
