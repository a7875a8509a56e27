use crate::PoolStateSource;
use anyhow::{Context, Result};
use clmm_yield_domain::entities::LiquidityPosition;
use clmm_yield_domain::enums::TokenSide;
use clmm_yield_domain::metrics::emissions::{DEFAULT_REWARD_DECIMALS, reward_token_price};
use clmm_yield_domain::metrics::report::{PoolYield, RewardInputs, pool_yield};
use clmm_yield_domain::value_objects::price::Price;
use std::sync::Arc;
use tracing::{info, warn};

/// How pools are valued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuerConfig {
    /// Token each pool's TVL is expressed in.
    pub reference: TokenSide,
    /// Pool that prices the reward token against the reference token.
    /// Without one the reward token is taken as the unit of account.
    pub reward_pool: Option<String>,
    /// Side of `reward_pool` the reward token sits on.
    pub reward_side: TokenSide,
    pub reward_decimals: u8,
}

impl Default for ValuerConfig {
    fn default() -> Self {
        Self {
            reference: TokenSide::Token0,
            reward_pool: None,
            reward_side: TokenSide::Token1,
            reward_decimals: DEFAULT_REWARD_DECIMALS,
        }
    }
}

/// Values pools' staked liquidity and emissions APR from a [`PoolStateSource`].
pub struct PositionValuer<S> {
    source: Arc<S>,
    config: ValuerConfig,
}

impl<S: PoolStateSource> PositionValuer<S> {
    pub fn new(source: Arc<S>, config: ValuerConfig) -> Self {
        Self { source, config }
    }

    /// Price of the reward token at `block`.
    pub async fn reward_price(&self, block: u64) -> Result<Price> {
        match &self.config.reward_pool {
            Some(pool) => {
                let snapshot = self.source.fetch_snapshot(pool, block).await?;
                reward_token_price(&snapshot, self.config.reward_side)
                    .with_context(|| format!("pricing reward token in pool {pool}"))
            }
            None => Ok(Price::ONE),
        }
    }

    /// Values one pool at `block`. Every reading comes from that block.
    pub async fn value_pool(&self, pool: &str, block: u64) -> Result<PoolYield> {
        let snapshot = self.source.fetch_snapshot(pool, block).await?;
        let liquidity = self.source.fetch_liquidity(pool, block).await?;
        let reward_rate = self.source.fetch_reward_rate(pool, block).await?;
        let reward_price = self.reward_price(block).await?;

        let reward = RewardInputs {
            reward_rate,
            reward_decimals: self.config.reward_decimals,
            reward_price,
        };
        let result = pool_yield(
            &snapshot,
            &LiquidityPosition::active(liquidity),
            &reward,
            self.config.reference,
        )
        .with_context(|| format!("valuing pool {pool} at block {block}"))?;

        info!(
            pool,
            block,
            tvl = %result.valuation.tvl,
            apr = ?result.apr.map(|y| y.apr.value()),
            "Valued pool"
        );
        Ok(result)
    }

    /// Values each pool independently; one failing pool does not stop the rest.
    pub async fn value_pools(&self, pools: &[String], block: u64) -> Vec<(String, Result<PoolYield>)> {
        let mut results = Vec::with_capacity(pools.len());
        for pool in pools {
            let result = self.value_pool(pool, block).await;
            if let Err(err) = &result {
                warn!(pool = %pool, block, "Valuation failed: {err:#}");
            }
            results.push((pool.clone(), result));
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachedSource;
    use crate::fixture::FixtureSource;
    use rust_decimal::Decimal;

    // Pool 0xaaa sits at price 1 with 1e18 liquidity in [0, 10).
    // Pool 0xref prices the reward token (token1) at 0.25 in token0.
    const FIXTURE: &str = r#"{
        "pools": [
            {
                "address": "0xaaa", "block_number": 5,
                "sqrt_price_x96": "79228162514264337593543950336",
                "tick": 0, "tick_spacing": 10, "decimals0": 18, "decimals1": 18,
                "liquidity": "1000000000000000000", "reward_rate": "1000000000000000"
            },
            {
                "address": "0xref", "block_number": 5,
                "sqrt_price_x96": "158456325028528675187087900672",
                "tick": 13863, "tick_spacing": 1, "decimals0": 18, "decimals1": 18,
                "liquidity": "0"
            },
            {
                "address": "0xempty", "block_number": 5,
                "sqrt_price_x96": "79228162514264337593543950336",
                "tick": 0, "tick_spacing": 10, "decimals0": 18, "decimals1": 18,
                "liquidity": "0", "reward_rate": "1000000000000000"
            },
            {
                "address": "0xbroken", "block_number": 5,
                "sqrt_price_x96": "79228162514264337593543950336",
                "tick": 0, "tick_spacing": 0, "decimals0": 18, "decimals1": 18,
                "liquidity": "1"
            }
        ]
    }"#;

    fn valuer() -> PositionValuer<CachedSource<FixtureSource>> {
        let source = CachedSource::new(FixtureSource::from_json(FIXTURE).unwrap());
        let config = ValuerConfig {
            reward_pool: Some("0xref".to_string()),
            ..ValuerConfig::default()
        };
        PositionValuer::new(Arc::new(source), config)
    }

    #[tokio::test]
    async fn test_value_pool() {
        let valuer = valuer();
        assert_eq!(valuer.reward_price(5).await.unwrap().value, Decimal::new(25, 2));

        let result = valuer.value_pool("0xaaa", 5).await.unwrap();
        assert_eq!(result.block_number, 5);
        assert_eq!(result.weekly_emissions, Decimal::new(6048, 1));
        assert_eq!(result.weekly_emissions_value, Decimal::new(1512, 1));
        assert!(result.valuation.amounts.amount1.is_zero());
        assert!(result.valuation.tvl > Decimal::ZERO);
        assert!(result.apr.is_some());
    }

    #[tokio::test]
    async fn test_value_pools_continues_past_failures() {
        let valuer = valuer();
        let pools: Vec<String> = ["0xaaa", "0xbroken", "0xempty", "0xmissing"]
            .iter()
            .map(|p| p.to_string())
            .collect();

        let results = valuer.value_pools(&pools, 5).await;
        assert_eq!(results.len(), 4);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
        let empty = results[2].1.as_ref().unwrap();
        assert!(empty.valuation.tvl.is_zero());
        assert!(empty.apr.is_none());
        assert!(results[3].1.is_err());
    }

    #[tokio::test]
    async fn test_reward_pool_is_read_once_per_block() {
        let valuer = valuer();
        valuer.value_pool("0xaaa", 5).await.unwrap();
        valuer.value_pool("0xaaa", 5).await.unwrap();

        let stats = valuer.source.stats().await;
        // 0xaaa and 0xref missed once each, then hit.
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.hits, 2);
    }

    #[tokio::test]
    async fn test_without_reward_pool() {
        let source = FixtureSource::from_json(FIXTURE).unwrap();
        let valuer = PositionValuer::new(Arc::new(source), ValuerConfig::default());
        assert_eq!(valuer.reward_price(5).await.unwrap(), Price::ONE);
        let result = valuer.value_pool("0xaaa", 5).await.unwrap();
        assert_eq!(result.weekly_emissions_value, result.weekly_emissions);
    }
}
