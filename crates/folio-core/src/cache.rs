//! Single-slot time-based cache shared by the origin and catalog layers.
//!
//! The slot is overwritten wholesale on refresh and never partially mutated.
//! Concurrent refreshes are allowed; the last writer wins.

use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Entry<T> {
    data: T,
    fetched_at: Instant,
}

/// Snapshot of a cached value and how old it is.
#[derive(Debug, Clone)]
pub struct Cached<T> {
    pub data: T,
    pub age: Duration,
    pub fresh: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    pub has_data: bool,
    pub age_secs: u64,
    pub is_stale: bool,
}

#[derive(Debug)]
pub struct CacheSlot<T> {
    entry: RwLock<Option<Entry<T>>>,
    ttl: Duration,
}

impl<T: Clone> CacheSlot<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current value regardless of age, if any.
    pub async fn get(&self) -> Option<Cached<T>> {
        let guard = self.entry.read().await;
        guard.as_ref().map(|e| {
            let age = e.fetched_at.elapsed();
            Cached {
                data: e.data.clone(),
                age,
                fresh: age < self.ttl,
            }
        })
    }

    /// Current value only if it is still within the freshness window.
    pub async fn fresh(&self) -> Option<T> {
        self.get().await.filter(|c| c.fresh).map(|c| c.data)
    }

    pub async fn store(&self, data: T) {
        *self.entry.write().await = Some(Entry {
            data,
            fetched_at: Instant::now(),
        });
    }

    pub async fn clear(&self) {
        *self.entry.write().await = None;
    }

    pub async fn status(&self) -> CacheStatus {
        match self.get().await {
            Some(c) => CacheStatus {
                has_data: true,
                age_secs: c.age.as_secs(),
                is_stale: !c.fresh,
            },
            None => CacheStatus {
                has_data: false,
                age_secs: 0,
                is_stale: false,
            },
        }
    }
}
