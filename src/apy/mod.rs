/*
 * Per-pool yield computation: token set collection, TVL join, annualized
 * reward APY, finiteness admission gate
 */

use crate::chains::{Chain, NetworkConfig};
use crate::models::{PoolSnapshot, PoolYield, PriceQuote};
use crate::utils;
use ethers::types::U256;
use std::collections::{HashMap, HashSet};

const SECONDS_PER_YEAR: f64 = 86_400.0 * 365.0;

/// Every distinct token referenced by the snapshots, in first-seen order,
/// with the chain's reward token always present exactly once.
#[must_use]
pub fn collect_token_ids(
    chain: Chain,
    snapshots: &[PoolSnapshot],
    config: &NetworkConfig,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for metadata in snapshots.iter().filter_map(|s| s.metadata.as_ref()) {
        for token in [metadata.token0, metadata.token1] {
            let id = utils::token_id(chain, token);
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }
    }
    let reward = utils::token_id(chain, config.reward_token);
    if seen.insert(reward.clone()) {
        ids.push(reward);
    }
    ids
}

/// Join snapshots with the price map into output records, preserving
/// discovery order. This is the sole admission gate: pools with a missing
/// address or metadata, an unknown underlying price, or a non-finite
/// TVL/APY are dropped; nothing else is validated.
#[must_use]
pub fn compute_pool_yields(
    chain: Chain,
    config: &NetworkConfig,
    snapshots: &[PoolSnapshot],
    prices: &HashMap<String, PriceQuote>,
) -> Vec<PoolYield> {
    let reward_price = prices
        .get(&utils::token_id(chain, config.reward_token))
        .map(|quote| quote.price);

    snapshots
        .iter()
        .filter_map(|snapshot| pool_yield(chain, config, snapshot, prices, reward_price))
        .collect()
}

fn pool_yield(
    chain: Chain,
    config: &NetworkConfig,
    snapshot: &PoolSnapshot,
    prices: &HashMap<String, PriceQuote>,
    reward_price: Option<f64>,
) -> Option<PoolYield> {
    let pool = snapshot.address?;
    let metadata = snapshot.metadata.as_ref()?;

    let r0 = u256_to_f64(metadata.reserve0) / u256_to_f64(metadata.dec0);
    let r1 = u256_to_f64(metadata.reserve1) / u256_to_f64(metadata.dec1);
    let p0 = prices.get(&utils::token_id(chain, metadata.token0))?.price;
    let p1 = prices.get(&utils::token_id(chain, metadata.token1))?.price;
    let tvl_usd = r0 * p0 + r1 * p1;

    // A missing rate means no gauge emissions. A missing reward-token price
    // poisons the APY the same way a missing underlying price poisons TVL;
    // an empty pool divides to a non-finite APY. Both fall to the gate below.
    let rate = u256_to_f64(snapshot.reward_rate.unwrap_or_default()) / 1e18;
    let apy_reward = match reward_price {
        Some(price) => (rate * price * SECONDS_PER_YEAR / tvl_usd) * 100.0,
        None => f64::NAN,
    };

    if !tvl_usd.is_finite() || !apy_reward.is_finite() {
        return None;
    }

    let reward_tokens = if apy_reward != 0.0 {
        vec![format!("{:?}", config.reward_token)]
    } else {
        Vec::new()
    };
    let raw_symbol = snapshot.symbol.as_deref().unwrap_or_default();

    Some(PoolYield {
        pool: format!("{pool:?}"),
        chain: utils::format_chain(chain.key()),
        project: crate::PROJECT.to_string(),
        symbol: utils::format_symbol(utils::pair_symbol(raw_symbol)),
        tvl_usd,
        apy_reward,
        reward_tokens,
        underlying_tokens: vec![
            format!("{:?}", metadata.token0),
            format!("{:?}", metadata.token1),
        ],
    })
}

fn u256_to_f64(value: U256) -> f64 {
    value.to_string().parse().unwrap_or(f64::NAN)
}
