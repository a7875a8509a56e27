//! Pool-state collaborators for the valuation core.
//!
//! The core never reads chain state itself. This crate defines the
//! [`PoolStateSource`] boundary, an offline JSON [`fixture::FixtureSource`],
//! a per-block [`cache::CachedSource`] and the async
//! [`valuer::PositionValuer`] that feeds snapshots into the core.

/// Snapshot cache keyed by pool and block.
pub mod cache;
/// JSON fixture source.
pub mod fixture;
/// Async valuation over a source.
pub mod valuer;

use anyhow::Result;
use async_trait::async_trait;
use clmm_yield_domain::entities::PoolSnapshot;
use primitive_types::U256;
use std::sync::Arc;

/// Reads pool state at an explicit block height.
///
/// Every call names the block so that all readings of one valuation come from
/// the same chain state.
#[async_trait]
pub trait PoolStateSource: Send + Sync {
    /// Price, tick, spacing and token decimals of `pool`.
    async fn fetch_snapshot(&self, pool: &str, block: u64) -> Result<PoolSnapshot>;

    /// Liquidity to value (the pool's staked liquidity).
    async fn fetch_liquidity(&self, pool: &str, block: u64) -> Result<u128>;

    /// Reward tokens emitted per second, in the reward token's smallest unit.
    async fn fetch_reward_rate(&self, pool: &str, block: u64) -> Result<U256>;
}

#[async_trait]
impl<T: PoolStateSource + ?Sized> PoolStateSource for Arc<T> {
    async fn fetch_snapshot(&self, pool: &str, block: u64) -> Result<PoolSnapshot> {
        (**self).fetch_snapshot(pool, block).await
    }

    async fn fetch_liquidity(&self, pool: &str, block: u64) -> Result<u128> {
        (**self).fetch_liquidity(pool, block).await
    }

    async fn fetch_reward_rate(&self, pool: &str, block: u64) -> Result<U256> {
        (**self).fetch_reward_rate(pool, block).await
    }
}
