//! Command line interface for concentrated-liquidity position valuation.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clmm_yield_domain::math::tick_math::get_tick_at_sqrt_ratio;
use clmm_yield_domain::prelude::*;
use clmm_yield_protocols::cache::{CachedSource, DEFAULT_CACHE_CAPACITY};
use clmm_yield_protocols::fixture::FixtureSource;
use clmm_yield_protocols::valuer::{PositionValuer, ValuerConfig};
use dotenv::dotenv;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "clmm-yield")]
#[command(about = "Concentrated-liquidity position valuation and emissions APR", long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a sqrtPriceX96 into a decimal price
    Price {
        /// Q64.96 square-root price (decimal integer)
        #[arg(long, value_parser = parse_u256)]
        sqrt_price_x96: U256,

        #[arg(long, default_value_t = 18)]
        decimals0: u8,

        #[arg(long, default_value_t = 18)]
        decimals1: u8,
    },
    /// Align a tick to the pool's tick spacing
    Range {
        #[arg(long, allow_hyphen_values = true)]
        tick: i32,

        #[arg(long, allow_hyphen_values = true)]
        spacing: i32,
    },
    /// Decompose liquidity into token amounts
    Amounts {
        #[arg(long, allow_hyphen_values = true)]
        tick_lower: i32,

        #[arg(long, allow_hyphen_values = true)]
        tick_upper: i32,

        #[arg(long)]
        liquidity: u128,

        /// Q64.96 square-root price (decimal integer)
        #[arg(long, value_parser = parse_u256)]
        sqrt_price_x96: U256,

        #[arg(long, default_value_t = 18)]
        decimals0: u8,

        #[arg(long, default_value_t = 18)]
        decimals1: u8,
    },
    /// Annualize a periodic reward value against a TVL
    Apr {
        /// Reward value earned over the period
        #[arg(long)]
        reward: Decimal,

        #[arg(long)]
        tvl: Decimal,

        /// Period length in days
        #[arg(long, default_value_t = DEFAULT_PERIOD_DAYS)]
        days: u32,
    },
    /// Weekly emissions from a per-second reward rate
    Emissions {
        /// Reward tokens per second, in the smallest unit
        #[arg(long, value_parser = parse_u256)]
        rate: U256,

        #[arg(long, default_value_t = DEFAULT_REWARD_DECIMALS)]
        decimals: u8,

        /// Reward token price, to value the emissions
        #[arg(long)]
        price: Option<Decimal>,

        /// The price is quoted as reward tokens per unit of account
        #[arg(long, requires = "price")]
        invert_price: bool,
    },
    /// Value pools from a fixture file and report their emissions APR
    Value {
        /// Pool fixture file
        #[arg(long, env = "CLMM_YIELD_FIXTURES")]
        fixtures: PathBuf,

        /// Block height to read (defaults to the latest in the file)
        #[arg(long)]
        block: Option<u64>,

        /// Pools to value (defaults to every pool at the block)
        #[arg(long = "pool")]
        pools: Vec<String>,

        /// Token the TVL is expressed in
        #[arg(long, default_value = "token0")]
        reference: TokenSide,

        /// Pool pricing the reward token against the reference token
        #[arg(long, env = "CLMM_YIELD_REWARD_POOL")]
        reward_pool: Option<String>,

        /// Side of the reward pool holding the reward token
        #[arg(long, env = "CLMM_YIELD_REWARD_SIDE", default_value = "token1")]
        reward_side: TokenSide,

        #[arg(long, default_value_t = DEFAULT_REWARD_DECIMALS)]
        reward_decimals: u8,

        /// Pool snapshots kept in memory
        #[arg(long, env = "CLMM_YIELD_CACHE_CAPACITY", default_value_t = DEFAULT_CACHE_CAPACITY)]
        cache_capacity: usize,
    },
}

fn parse_u256(s: &str) -> std::result::Result<U256, String> {
    U256::from_dec_str(s.trim()).map_err(|e| format!("invalid unsigned integer '{s}': {e:?}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct PriceOutput {
    price: Price,
    inverse: Price,
    tick: i32,
}

#[derive(Serialize)]
struct EmissionsOutput {
    weekly_emissions: Decimal,
    weekly_value: Option<Decimal>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Price {
            sqrt_price_x96,
            decimals0,
            decimals1,
        } => {
            let price = sqrt_price_x96_to_price(sqrt_price_x96, decimals0, decimals1)?;
            let output = PriceOutput {
                price,
                inverse: sqrt_price_x96_to_inverse_price(sqrt_price_x96, decimals0, decimals1)?,
                tick: get_tick_at_sqrt_ratio(sqrt_price_x96)?,
            };
            if cli.json {
                print_json(&output)?;
            } else {
                println!("Price (token1 per token0): {}", output.price);
                println!("Price (token0 per token1): {}", output.inverse);
                println!("Tick:                      {}", output.tick);
            }
        }
        Commands::Range { tick, spacing } => {
            let range = align_range(tick, spacing)?;
            if cli.json {
                print_json(&range)?;
            } else {
                println!("Active range for tick {tick}: {range} (width {})", range.width());
            }
        }
        Commands::Amounts {
            tick_lower,
            tick_upper,
            liquidity,
            sqrt_price_x96,
            decimals0,
            decimals1,
        } => {
            let raw = get_amounts_for_liquidity(tick_lower, tick_upper, liquidity, sqrt_price_x96)?;
            let amounts = PositionAmounts {
                amount0: Amount::from_token_amount(raw.amount0, decimals0).to_decimal()?,
                amount1: Amount::from_token_amount(raw.amount1, decimals1).to_decimal()?,
                range: TickRange::new(tick_lower, tick_upper)?,
                regime: raw.regime,
            };
            if cli.json {
                print_json(&amounts)?;
            } else {
                println!("Range:   {} ({})", amounts.range, amounts.regime);
                println!("Amount0: {} (raw {})", amounts.amount0, raw.amount0);
                println!("Amount1: {} (raw {})", amounts.amount1, raw.amount1);
            }
        }
        Commands::Apr { reward, tvl, days } => {
            let result = apr(reward, tvl, days)?;
            if cli.json {
                print_json(&result)?;
            } else {
                println!("Annualized reward: {}", result.annualized_reward);
                println!("APR:               {}", result.apr);
            }
        }
        Commands::Emissions {
            rate,
            decimals,
            price,
            invert_price,
        } => {
            let weekly = weekly_emissions(rate, decimals)?;
            let weekly_value = price
                .map(|p| -> std::result::Result<Decimal, ValuationError> {
                    let price = Price::new(p);
                    let price = if invert_price { price.invert()? } else { price };
                    weekly_emissions_value(weekly, price)
                })
                .transpose()?;
            let output = EmissionsOutput {
                weekly_emissions: weekly,
                weekly_value,
            };
            if cli.json {
                print_json(&output)?;
            } else {
                println!("Weekly emissions: {}", output.weekly_emissions);
                if let Some(value) = output.weekly_value {
                    println!("Weekly value:     {value}");
                }
            }
        }
        Commands::Value {
            fixtures,
            block,
            pools,
            reference,
            reward_pool,
            reward_side,
            reward_decimals,
            cache_capacity,
        } => {
            let source = FixtureSource::load(&fixtures).await?;
            let block = match block {
                Some(block) => block,
                None => source
                    .latest_block()
                    .with_context(|| format!("{} contains no pools", fixtures.display()))?,
            };
            let pools = if pools.is_empty() {
                source.pools_at(block)
            } else {
                pools
            };
            info!(block, pools = pools.len(), "Valuing pools");

            let config = ValuerConfig {
                reference,
                reward_pool,
                reward_side,
                reward_decimals,
            };
            let cache = Arc::new(CachedSource::with_capacity(source, cache_capacity));
            let valuer = PositionValuer::new(Arc::clone(&cache), config);
            let results = valuer.value_pools(&pools, block).await;

            let stats = cache.stats().await;
            info!(
                hits = stats.hits,
                misses = stats.misses,
                evictions = stats.evictions,
                "Snapshot cache"
            );

            let failed = results.iter().filter(|(_, r)| r.is_err()).count();
            if cli.json {
                let rows: Vec<serde_json::Value> = results
                    .iter()
                    .map(|(pool, result)| match result {
                        Ok(y) => serde_json::json!({ "pool": pool, "result": y }),
                        Err(e) => serde_json::json!({ "pool": pool, "error": format!("{e:#}") }),
                    })
                    .collect();
                print_json(&rows)?;
            } else {
                print_value_table(&results, block, reference);
            }

            if failed > 0 {
                anyhow::bail!("{failed} of {} pools could not be valued", results.len());
            }
        }
    }

    Ok(())
}

fn print_value_table(results: &[(String, Result<PoolYield>)], block: u64, reference: TokenSide) {
    println!("Block {block}, TVL in {reference}");
    println!(
        "{:<44} | {:<12} | {:<24} | {:<24} | {:<12}",
        "Pool", "Regime", "TVL", "Weekly rewards", "APR"
    );
    println!("{}", "-".repeat(128));
    for (pool, result) in results {
        match result {
            Ok(y) => {
                let apr = y
                    .apr
                    .map(|r| format!("{:.2}%", r.apr.value()))
                    .unwrap_or_else(|| "undefined".to_string());
                println!(
                    "{:<44} | {:<12} | {:<24} | {:<24} | {:<12}",
                    pool,
                    y.valuation.amounts.regime.to_string(),
                    y.valuation.tvl.round_dp(6),
                    y.weekly_emissions_value.round_dp(6),
                    apr
                );
            }
            Err(e) => println!("{pool:<44} | error: {e:#}"),
        }
    }
}
