use crate::PoolStateSource;
use anyhow::Result;
use async_trait::async_trait;
use clmm_yield_domain::entities::PoolSnapshot;
use primitive_types::U256;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// Cache key: one pool at one block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotKey {
    pub pool_id: String,
    pub block_number: u64,
}

impl SnapshotKey {
    /// Pool ids compare case-insensitively, like hex addresses.
    pub fn new(pool_id: &str, block_number: u64) -> Self {
        Self {
            pool_id: pool_id.to_ascii_lowercase(),
            block_number,
        }
    }
}

/// Snapshots kept by [`CachedSource::new`].
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Cache hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

/// Wraps a source and memoizes snapshots per `(pool, block)`.
///
/// State at a fixed block never changes, so entries are never invalidated.
/// The cache holds at most `capacity` snapshots; when full, the snapshot with
/// the lowest block number is evicted first. Liquidity and reward rate reads
/// pass straight through.
pub struct CachedSource<S> {
    inner: S,
    capacity: usize,
    snapshots: Arc<RwLock<HashMap<SnapshotKey, PoolSnapshot>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<S: PoolStateSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self::with_capacity(inner, DEFAULT_CACHE_CAPACITY)
    }

    /// A cache holding at most `capacity` snapshots (at least one).
    pub fn with_capacity(inner: S, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(1),
            snapshots: Arc::new(RwLock::new(HashMap::new())),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::SeqCst),
            misses: self.misses.load(Ordering::SeqCst),
            evictions: self.evictions.load(Ordering::SeqCst),
            entries: self.snapshots.read().await.len(),
        }
    }
}

#[async_trait]
impl<S: PoolStateSource> PoolStateSource for CachedSource<S> {
    async fn fetch_snapshot(&self, pool: &str, block: u64) -> Result<PoolSnapshot> {
        let key = SnapshotKey::new(pool, block);
        if let Some(snapshot) = self.snapshots.read().await.get(&key) {
            self.hits.fetch_add(1, Ordering::SeqCst);
            debug!(pool, block, "Snapshot cache hit");
            return Ok(snapshot.clone());
        }

        self.misses.fetch_add(1, Ordering::SeqCst);
        debug!(pool, block, "Snapshot cache miss");
        let snapshot = self.inner.fetch_snapshot(pool, block).await?;

        let mut snapshots = self.snapshots.write().await;
        if !snapshots.contains_key(&key) && snapshots.len() >= self.capacity {
            let oldest = snapshots.keys().min_by_key(|k| k.block_number).cloned();
            if let Some(oldest) = oldest {
                snapshots.remove(&oldest);
                self.evictions.fetch_add(1, Ordering::SeqCst);
                debug!(
                    pool = %oldest.pool_id,
                    block = oldest.block_number,
                    "Evicted cached snapshot"
                );
            }
        }
        snapshots.entry(key).or_insert_with(|| snapshot.clone());
        Ok(snapshot)
    }

    async fn fetch_liquidity(&self, pool: &str, block: u64) -> Result<u128> {
        self.inner.fetch_liquidity(pool, block).await
    }

    async fn fetch_reward_rate(&self, pool: &str, block: u64) -> Result<U256> {
        self.inner.fetch_reward_rate(pool, block).await
    }
}
