/*
 * Configuration management for the yield adaptor
 */

use crate::chains::Chain;
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_FANTOM_RPC_URL: &str = "https://rpc.ftm.tools";
pub const DEFAULT_SONIC_RPC_URL: &str = "https://rpc.soniclabs.com";
pub const DEFAULT_PRICE_API_URL: &str = "https://coins.llama.fi";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub fantom_rpc_url: String,
    pub sonic_rpc_url: String,
    pub price_api_url: String,
}

impl Config {
    /// Endpoint selection only; the pipeline itself takes no other input
    /// from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Config {
            fantom_rpc_url: env::var("FANTOM_RPC_URL")
                .unwrap_or_else(|_| DEFAULT_FANTOM_RPC_URL.to_string()),
            sonic_rpc_url: env::var("SONIC_RPC_URL")
                .unwrap_or_else(|_| DEFAULT_SONIC_RPC_URL.to_string()),
            price_api_url: env::var("PRICE_API_URL")
                .unwrap_or_else(|_| DEFAULT_PRICE_API_URL.to_string()),
        }
    }

    #[must_use]
    pub fn rpc_url(&self, chain: Chain) -> &str {
        match chain {
            Chain::Fantom => &self.fantom_rpc_url,
            Chain::Sonic => &self.sonic_rpc_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // No other test touches these variables, so clearing them here is safe.
    #[test]
    fn from_env_falls_back_to_default_endpoints() {
        env::remove_var("FANTOM_RPC_URL");
        env::remove_var("SONIC_RPC_URL");
        env::remove_var("PRICE_API_URL");

        let config = Config::from_env();
        assert_eq!(config.fantom_rpc_url, DEFAULT_FANTOM_RPC_URL);
        assert_eq!(config.sonic_rpc_url, DEFAULT_SONIC_RPC_URL);
        assert_eq!(config.price_api_url, DEFAULT_PRICE_API_URL);
    }

    #[test]
    fn every_chain_resolves_an_endpoint() {
        let config = Config {
            fantom_rpc_url: DEFAULT_FANTOM_RPC_URL.to_string(),
            sonic_rpc_url: DEFAULT_SONIC_RPC_URL.to_string(),
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
        };
        for chain in Chain::all() {
            assert!(config.rpc_url(chain).starts_with("https://"));
        }
    }
}
