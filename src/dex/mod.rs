/*
 * Batched on-chain fetch pipeline: pool discovery, pair details, gauge
 * resolution, reward emission rates
 */

use crate::chains::NetworkConfig;
use crate::models::{AdaptorError, PoolMetadata, PoolSnapshot, Result};
use crate::rpc::{self, CallClient};
use ethers::abi::{self, ParamType, Token};
use ethers::types::{Address, Bytes, U256};
use tracing::debug;

/// Enumerate every pool registered on the pair factory. A failed count read
/// is fatal for the chain; a failed per-index read leaves a None slot.
pub async fn discover_pools(
    client: &dyn CallClient,
    config: &NetworkConfig,
) -> Result<Vec<PoolSnapshot>> {
    let raw = client
        .call(config.pair_factory, rpc::encode_call("allPairsLength()", &[]))
        .await?;
    let count = rpc::decode_uint(&raw).ok_or_else(|| {
        AdaptorError::ContractError("Malformed allPairsLength response".to_string())
    })?;
    if count > U256::from(u32::MAX) {
        return Err(AdaptorError::ContractError(format!(
            "Implausible pair count: {count}"
        )));
    }
    let count = count.as_usize();
    debug!(count, "factory reports pair count");

    let calls: Vec<(Address, Bytes)> = (0..count)
        .map(|i| {
            (
                config.pair_factory,
                rpc::encode_call("allPairs(uint256)", &[Token::Uint(U256::from(i))]),
            )
        })
        .collect();

    let addresses = client.try_multicall(calls).await?;
    Ok(addresses
        .into_iter()
        .map(|raw| PoolSnapshot::new(raw.as_deref().and_then(rpc::decode_address)))
        .collect())
}

/// Fetch `metadata()` and `symbol()` for every discovered pool, writing the
/// decoded results back into the matching snapshot slots. Entries that fail
/// or decode badly stay None.
pub async fn load_pool_details(
    client: &dyn CallClient,
    snapshots: &mut [PoolSnapshot],
) -> Result<()> {
    let targets = pool_targets(snapshots);

    let metadata_calls: Vec<(Address, Bytes)> = targets
        .iter()
        .map(|(_, pool)| (*pool, rpc::encode_call("metadata()", &[])))
        .collect();
    let symbol_calls: Vec<(Address, Bytes)> = targets
        .iter()
        .map(|(_, pool)| (*pool, rpc::encode_call("symbol()", &[])))
        .collect();

    let (metadata_raw, symbol_raw) = tokio::try_join!(
        client.try_multicall(metadata_calls),
        client.try_multicall(symbol_calls),
    )?;

    for ((slot, _), raw) in targets.iter().zip(metadata_raw) {
        snapshots[*slot].metadata = raw.as_deref().and_then(decode_pair_metadata);
    }
    for ((slot, _), raw) in targets.iter().zip(symbol_raw) {
        snapshots[*slot].symbol = raw.as_deref().and_then(rpc::decode_string);
    }
    Ok(())
}

/// Resolve each pool's reward gauge through the voter. The zero address
/// means the pool has no active gauge and its slot stays None.
pub async fn resolve_gauges(
    client: &dyn CallClient,
    snapshots: &mut [PoolSnapshot],
    config: &NetworkConfig,
) -> Result<()> {
    let targets = pool_targets(snapshots);

    let calls: Vec<(Address, Bytes)> = targets
        .iter()
        .map(|(_, pool)| {
            (
                config.voter,
                rpc::encode_call("gauges(address)", &[Token::Address(*pool)]),
            )
        })
        .collect();

    let results = client.try_multicall(calls).await?;
    for ((slot, _), raw) in targets.iter().zip(results) {
        snapshots[*slot].gauge = raw.as_deref().and_then(rpc::decode_address);
    }
    Ok(())
}

/// Fetch the reward token's per-second emission rate from every resolved
/// gauge. Pools without a gauge keep a missing rate, which downstream means
/// zero reward APY.
pub async fn load_reward_rates(
    client: &dyn CallClient,
    snapshots: &mut [PoolSnapshot],
    config: &NetworkConfig,
) -> Result<()> {
    let targets: Vec<(usize, Address)> = snapshots
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.gauge.map(|gauge| (i, gauge)))
        .collect();

    let calls: Vec<(Address, Bytes)> = targets
        .iter()
        .map(|(_, gauge)| {
            (
                *gauge,
                rpc::encode_call("rewardRate(address)", &[Token::Address(config.reward_token)]),
            )
        })
        .collect();

    let results = client.try_multicall(calls).await?;
    for ((slot, _), raw) in targets.iter().zip(results) {
        snapshots[*slot].reward_rate = raw.as_deref().and_then(rpc::decode_uint);
    }
    Ok(())
}

/// Slot index and address of every snapshot that still has a pool address.
fn pool_targets(snapshots: &[PoolSnapshot]) -> Vec<(usize, Address)> {
    snapshots
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.address.map(|address| (i, address)))
        .collect()
}

/// Decode the seven-word `metadata()` return of a Solidly-style pair:
/// (dec0, dec1, r0, r1, stable, token0, token1).
fn decode_pair_metadata(raw: &[u8]) -> Option<PoolMetadata> {
    let types = [
        ParamType::Uint(256),
        ParamType::Uint(256),
        ParamType::Uint(256),
        ParamType::Uint(256),
        ParamType::Bool,
        ParamType::Address,
        ParamType::Address,
    ];
    let mut tokens = abi::decode(&types, raw).ok()?;
    if tokens.len() != 7 {
        return None;
    }
    let token1 = tokens.pop()?.into_address()?;
    let token0 = tokens.pop()?.into_address()?;
    let stable = tokens.pop()?.into_bool()?;
    let reserve1 = tokens.pop()?.into_uint()?;
    let reserve0 = tokens.pop()?.into_uint()?;
    let dec1 = tokens.pop()?.into_uint()?;
    let dec0 = tokens.pop()?.into_uint()?;

    Some(PoolMetadata {
        dec0,
        dec1,
        reserve0,
        reserve1,
        stable,
        token0,
        token1,
    })
}
