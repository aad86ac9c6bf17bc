/*
 * RPC call client: single and batched multi-target reads over Multicall3
 */

use crate::models::{AdaptorError, Result};
use async_trait::async_trait;
use ethers::abi::{self, ParamType, Token};
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, Bytes, TransactionRequest, U256};
use ethers::utils::keccak256;
use std::str::FromStr;
use std::sync::Arc;

/// Multicall3, deployed at the same address on every chain we touch.
const MULTICALL3_ADDRESS: &str = "0xcA11bde05977b3631167028862bE2a173976CA11";

/// Upper bound on reads bundled into one tryAggregate request.
const MAX_CALLS_PER_BATCH: usize = 500;

/// Read-only contract call surface used by the fetch pipeline.
#[async_trait]
pub trait CallClient: Send + Sync {
    /// Single-target read; any failure is an error.
    async fn call(&self, target: Address, calldata: Bytes) -> Result<Bytes>;

    /// Batched reads with per-call failure tolerance. The result has the
    /// same length and order as `calls`; a failed or empty return is None.
    async fn try_multicall(&self, calls: Vec<(Address, Bytes)>) -> Result<Vec<Option<Bytes>>>;
}

pub struct RpcClient {
    provider: Arc<Provider<Http>>,
    multicall: Address,
}

impl RpcClient {
    pub async fn connect(rpc_url: &str, expected_chain_id: u64) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url).map_err(|e| {
            AdaptorError::ConfigError(format!("Invalid RPC endpoint {rpc_url}: {e}"))
        })?;

        let chain = provider
            .get_chainid()
            .await
            .map_err(|e| AdaptorError::RpcError(format!("Failed to get chain ID: {e}")))?;

        if chain.as_u64() != expected_chain_id {
            return Err(AdaptorError::RpcError(format!(
                "Chain ID mismatch: expected {expected_chain_id}, got {}",
                chain.as_u64()
            )));
        }

        Ok(Self {
            provider: Arc::new(provider),
            multicall: Address::from_str(MULTICALL3_ADDRESS).unwrap(),
        })
    }

    async fn eth_call(&self, target: Address, calldata: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::new().to(target).data(calldata);
        self.provider
            .call(&tx.into(), None)
            .await
            .map_err(|e| AdaptorError::RpcError(format!("eth_call failed: {e}")))
    }

    async fn try_aggregate(&self, chunk: &[(Address, Bytes)]) -> Result<Vec<Option<Bytes>>> {
        let calls: Vec<Token> = chunk
            .iter()
            .map(|(target, data)| {
                Token::Tuple(vec![Token::Address(*target), Token::Bytes(data.to_vec())])
            })
            .collect();

        let mut calldata = selector("tryAggregate(bool,(address,bytes)[])").to_vec();
        calldata.extend_from_slice(&abi::encode(&[Token::Bool(false), Token::Array(calls)]));

        let raw = self.eth_call(self.multicall, Bytes::from(calldata)).await?;
        decode_try_aggregate(&raw, chunk.len())
    }
}

#[async_trait]
impl CallClient for RpcClient {
    async fn call(&self, target: Address, calldata: Bytes) -> Result<Bytes> {
        self.eth_call(target, calldata).await
    }

    async fn try_multicall(&self, calls: Vec<(Address, Bytes)>) -> Result<Vec<Option<Bytes>>> {
        let mut results = Vec::with_capacity(calls.len());
        for chunk in calls.chunks(MAX_CALLS_PER_BATCH) {
            results.extend(self.try_aggregate(chunk).await?);
        }
        Ok(results)
    }
}

/// Decode a tryAggregate return into per-call slots. A call that reverted,
/// or succeeded with empty return data (a read against a non-contract),
/// becomes None.
pub fn decode_try_aggregate(raw: &[u8], expected: usize) -> Result<Vec<Option<Bytes>>> {
    let result_type = ParamType::Array(Box::new(ParamType::Tuple(vec![
        ParamType::Bool,
        ParamType::Bytes,
    ])));
    let mut tokens = abi::decode(&[result_type], raw).map_err(|e| {
        AdaptorError::ContractError(format!("Malformed tryAggregate response: {e}"))
    })?;

    let items = match tokens.pop() {
        Some(Token::Array(items)) => items,
        _ => {
            return Err(AdaptorError::ContractError(
                "Malformed tryAggregate response".to_string(),
            ))
        }
    };

    if items.len() != expected {
        return Err(AdaptorError::ContractError(format!(
            "tryAggregate returned {} results for {} calls",
            items.len(),
            expected
        )));
    }

    Ok(items
        .into_iter()
        .map(|item| match item {
            Token::Tuple(mut parts) if parts.len() == 2 => {
                let data = parts.pop().and_then(Token::into_bytes);
                let success = parts.pop().and_then(Token::into_bool).unwrap_or(false);
                match data {
                    Some(bytes) if success && !bytes.is_empty() => Some(Bytes::from(bytes)),
                    _ => None,
                }
            }
            _ => None,
        })
        .collect())
}

/// First four bytes of the keccak hash of a function signature.
#[must_use]
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Selector plus ABI-encoded parameters.
#[must_use]
pub fn encode_call(signature: &str, params: &[Token]) -> Bytes {
    let mut calldata = selector(signature).to_vec();
    calldata.extend_from_slice(&abi::encode(params));
    Bytes::from(calldata)
}

/// Decode a single uint256 return word.
#[must_use]
pub fn decode_uint(raw: &[u8]) -> Option<U256> {
    if raw.len() < 32 {
        return None;
    }
    Some(U256::from_big_endian(&raw[0..32]))
}

/// Decode a single address return word. The zero address decodes to None.
#[must_use]
pub fn decode_address(raw: &[u8]) -> Option<Address> {
    if raw.len() < 32 {
        return None;
    }
    let address = Address::from_slice(&raw[12..32]);
    if address.is_zero() {
        None
    } else {
        Some(address)
    }
}

/// Decode a single string return value.
#[must_use]
pub fn decode_string(raw: &[u8]) -> Option<String> {
    let mut tokens = abi::decode(&[ParamType::String], raw).ok()?;
    tokens.pop().and_then(Token::into_string)
}
