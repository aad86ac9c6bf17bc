/*
 * In-crate test doubles for the call client and price source
 */

use crate::models::{AdaptorError, PriceQuote, Result};
use crate::prices::PriceSource;
use crate::rpc::CallClient;
use async_trait::async_trait;
use ethers::abi::{self, Token};
use ethers::types::{Address, Bytes, U256};
use std::collections::HashMap;

/// Canned-response call client keyed by (target, calldata). A batched call
/// with no canned entry behaves like an individually failed read.
#[derive(Default)]
pub struct MockCallClient {
    responses: HashMap<(Address, Vec<u8>), Vec<u8>>,
    fail_single_calls: bool,
}

impl MockCallClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&mut self, target: Address, calldata: Bytes, response: Vec<u8>) {
        self.responses.insert((target, calldata.to_vec()), response);
    }

    /// Make every single-target call fail, simulating a dead factory read.
    pub fn fail_single_calls(mut self) -> Self {
        self.fail_single_calls = true;
        self
    }
}

#[async_trait]
impl CallClient for MockCallClient {
    async fn call(&self, target: Address, calldata: Bytes) -> Result<Bytes> {
        if self.fail_single_calls {
            return Err(AdaptorError::RpcError("simulated call failure".to_string()));
        }
        self.responses
            .get(&(target, calldata.to_vec()))
            .map(|raw| Bytes::from(raw.clone()))
            .ok_or_else(|| AdaptorError::ContractError("no canned response".to_string()))
    }

    async fn try_multicall(&self, calls: Vec<(Address, Bytes)>) -> Result<Vec<Option<Bytes>>> {
        Ok(calls
            .into_iter()
            .map(|(target, calldata)| {
                self.responses
                    .get(&(target, calldata.to_vec()))
                    .map(|raw| Bytes::from(raw.clone()))
            })
            .collect())
    }
}

/// Fixed price table serving only the requested keys.
#[derive(Default)]
pub struct MockPriceSource {
    pub prices: HashMap<String, PriceQuote>,
}

#[async_trait]
impl PriceSource for MockPriceSource {
    async fn fetch_prices(&self, token_ids: &[String]) -> Result<HashMap<String, PriceQuote>> {
        Ok(token_ids
            .iter()
            .filter_map(|id| self.prices.get(id).map(|quote| (id.clone(), *quote)))
            .collect())
    }
}

pub fn encode_uint_word(value: U256) -> Vec<u8> {
    abi::encode(&[Token::Uint(value)])
}

pub fn encode_address_word(address: Address) -> Vec<u8> {
    abi::encode(&[Token::Address(address)])
}

pub fn encode_string_return(value: &str) -> Vec<u8> {
    abi::encode(&[Token::String(value.to_string())])
}

#[allow(clippy::too_many_arguments)]
pub fn encode_metadata_return(
    dec0: U256,
    dec1: U256,
    reserve0: U256,
    reserve1: U256,
    stable: bool,
    token0: Address,
    token1: Address,
) -> Vec<u8> {
    abi::encode(&[
        Token::Uint(dec0),
        Token::Uint(dec1),
        Token::Uint(reserve0),
        Token::Uint(reserve1),
        Token::Bool(stable),
        Token::Address(token0),
        Token::Address(token1),
    ])
}
