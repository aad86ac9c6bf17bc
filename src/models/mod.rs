/*
 * Data models and types for the yield adaptor
 */

use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything fetched on-chain for one pool. One slot per discovered pool
/// index; later pipeline stages fill fields in place and never reorder or
/// drop slots, so discovery order survives into the final join.
#[derive(Debug, Clone, Default)]
pub struct PoolSnapshot {
    pub address: Option<Address>,
    pub metadata: Option<PoolMetadata>,
    pub symbol: Option<String>,
    pub gauge: Option<Address>,
    pub reward_rate: Option<U256>,
}

impl PoolSnapshot {
    #[must_use]
    pub fn new(address: Option<Address>) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }
}

/// Decoded `metadata()` return of a pair. `dec0`/`dec1` are the 10^decimals
/// scaling divisors exactly as the contract reports them, not decimal counts.
#[derive(Debug, Clone)]
pub struct PoolMetadata {
    pub dec0: U256,
    pub dec1: U256,
    pub reserve0: U256,
    pub reserve1: U256,
    pub stable: bool,
    pub token0: Address,
    pub token1: Address,
}

/// One USD quote from the price service.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PriceQuote {
    pub price: f64,
}

/// Output record handed to the aggregation harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolYield {
    pub pool: String,
    pub chain: String,
    pub project: String,
    pub symbol: String,
    pub tvl_usd: f64,
    pub apy_reward: f64,
    pub reward_tokens: Vec<String>,
    pub underlying_tokens: Vec<String>,
}

#[derive(Debug, Error)]
pub enum AdaptorError {
    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Contract interaction error: {0}")]
    ContractError(String),

    #[error("Price API error: {0}")]
    PriceApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AdaptorError>;
