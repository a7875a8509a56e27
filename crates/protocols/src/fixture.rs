use crate::PoolStateSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use clmm_yield_domain::entities::PoolSnapshot;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Errors raised while reading fixture data.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("invalid {field} '{value}' for pool {pool}")]
    InvalidNumber {
        pool: String,
        field: &'static str,
        value: String,
    },
    #[error("duplicate fixture for pool {pool} at block {block}")]
    Duplicate { pool: String, block: u64 },
    #[error("no fixture for pool {pool} at block {block}")]
    UnknownPool { pool: String, block: u64 },
}

/// One pool's readings at one block, as stored on disk.
///
/// Large integers are decimal strings so they survive JSON tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolFixture {
    pub address: String,
    pub block_number: u64,
    pub sqrt_price_x96: String,
    pub tick: i32,
    pub tick_spacing: i32,
    pub decimals0: u8,
    pub decimals1: u8,
    pub liquidity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_rate: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureFile {
    pub pools: Vec<PoolFixture>,
}

/// Serves pool state from a JSON fixture document.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    pools: HashMap<(String, u64), PoolFixture>,
}

impl FixtureSource {
    /// Parses a fixture document.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: FixtureFile = serde_json::from_str(json).context("parsing pool fixtures")?;
        Self::from_fixtures(file.pools)
    }

    /// Reads and parses a fixture file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading fixtures from {}", path.display()))?;
        let source = Self::from_json(&json)?;
        info!(path = %path.display(), pools = source.len(), "Loaded pool fixtures");
        Ok(source)
    }

    pub fn from_fixtures(fixtures: Vec<PoolFixture>) -> Result<Self> {
        let mut pools = HashMap::with_capacity(fixtures.len());
        for fixture in fixtures {
            let key = (fixture.address.to_ascii_lowercase(), fixture.block_number);
            if pools.contains_key(&key) {
                return Err(FixtureError::Duplicate {
                    pool: fixture.address,
                    block: fixture.block_number,
                }
                .into());
            }
            pools.insert(key, fixture);
        }
        Ok(Self { pools })
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Addresses of every pool recorded at `block`, sorted.
    pub fn pools_at(&self, block: u64) -> Vec<String> {
        let mut pools: Vec<String> = self
            .pools
            .values()
            .filter(|f| f.block_number == block)
            .map(|f| f.address.clone())
            .collect();
        pools.sort();
        pools
    }

    /// Latest block any fixture is recorded at.
    pub fn latest_block(&self) -> Option<u64> {
        self.pools.keys().map(|(_, block)| *block).max()
    }

    fn fixture(&self, pool: &str, block: u64) -> Result<&PoolFixture> {
        self.pools
            .get(&(pool.to_ascii_lowercase(), block))
            .ok_or_else(|| {
                FixtureError::UnknownPool {
                    pool: pool.to_string(),
                    block,
                }
                .into()
            })
    }
}

fn parse_u256(pool: &str, field: &'static str, value: &str) -> Result<U256> {
    U256::from_dec_str(value.trim()).map_err(|_| {
        FixtureError::InvalidNumber {
            pool: pool.to_string(),
            field,
            value: value.to_string(),
        }
        .into()
    })
}

#[async_trait]
impl PoolStateSource for FixtureSource {
    async fn fetch_snapshot(&self, pool: &str, block: u64) -> Result<PoolSnapshot> {
        let f = self.fixture(pool, block)?;
        let sqrt_price_x96 = parse_u256(&f.address, "sqrt_price_x96", &f.sqrt_price_x96)?;
        let snapshot = PoolSnapshot::new(
            f.address.clone(),
            f.block_number,
            sqrt_price_x96,
            f.tick,
            f.tick_spacing,
            f.decimals0,
            f.decimals1,
        )
        .with_context(|| format!("invalid snapshot for pool {pool} at block {block}"))?;
        debug!(pool, block, tick = snapshot.tick, "Read fixture snapshot");
        Ok(snapshot)
    }

    async fn fetch_liquidity(&self, pool: &str, block: u64) -> Result<u128> {
        let f = self.fixture(pool, block)?;
        f.liquidity.trim().parse::<u128>().map_err(|_| {
            FixtureError::InvalidNumber {
                pool: f.address.clone(),
                field: "liquidity",
                value: f.liquidity.clone(),
            }
            .into()
        })
    }

    /// Pools without a recorded reward rate emit nothing.
    async fn fetch_reward_rate(&self, pool: &str, block: u64) -> Result<U256> {
        let f = self.fixture(pool, block)?;
        match &f.reward_rate {
            Some(rate) => parse_u256(&f.address, "reward_rate", rate),
            None => {
                debug!(pool, block, "No reward rate recorded, using zero");
                Ok(U256::zero())
            }
        }
    }
}
