/*
 * Multi-chain orchestrator joining the per-chain fetch pipelines
 */

use crate::apy;
use crate::chains::Chain;
use crate::config::Config;
use crate::dex;
use crate::models::{PoolYield, Result};
use crate::prices::{LlamaPriceClient, PriceSource};
use crate::rpc::{CallClient, RpcClient};
use std::sync::Arc;
use tracing::{info, warn};

pub struct YieldService {
    config: Config,
    price_source: Arc<dyn PriceSource>,
}

impl YieldService {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let price_source: Arc<dyn PriceSource> =
            Arc::new(LlamaPriceClient::new(&config.price_api_url));
        Self {
            config,
            price_source,
        }
    }

    /// Run the full pipeline on every configured chain concurrently and
    /// concatenate the per-chain results. Chains are independent failure
    /// domains: a failing chain contributes an empty list, nothing more.
    pub async fn fetch_pool_yields(&self) -> Vec<PoolYield> {
        let mut handles = Vec::new();
        for chain in Chain::all() {
            let rpc_url = self.config.rpc_url(chain).to_string();
            let price_source = Arc::clone(&self.price_source);
            handles.push(tokio::spawn(async move {
                let client = match RpcClient::connect(&rpc_url, chain.chain_id()).await {
                    Ok(client) => client,
                    Err(e) => {
                        warn!(chain = chain.key(), error = %e, "RPC connection failed; skipping chain");
                        return Vec::new();
                    }
                };
                run_chain(chain, &client, price_source.as_ref()).await
            }));
        }

        // Joining in spawn order keeps the output chain-major without
        // serializing the pipelines themselves.
        let mut pools = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(chain_pools) => pools.extend(chain_pools),
                Err(e) => warn!(error = %e, "chain task panicked"),
            }
        }
        pools
    }
}

/// One chain's pipeline with its failure domain sealed: any fatal error is
/// logged and degrades to an empty contribution.
pub async fn run_chain(
    chain: Chain,
    client: &dyn CallClient,
    prices: &dyn PriceSource,
) -> Vec<PoolYield> {
    match chain_pool_yields(chain, client, prices).await {
        Ok(pools) => {
            info!(chain = chain.key(), pools = pools.len(), "chain pipeline complete");
            pools
        }
        Err(e) => {
            warn!(chain = chain.key(), error = %e, "chain pipeline failed; contributing no pools");
            Vec::new()
        }
    }
}

/// Discovery through yield computation for a single chain. Stages are
/// sequential because each consumes the full output of the one before.
async fn chain_pool_yields(
    chain: Chain,
    client: &dyn CallClient,
    prices: &dyn PriceSource,
) -> Result<Vec<PoolYield>> {
    let config = chain.network_config();

    let mut snapshots = dex::discover_pools(client, &config).await?;
    info!(chain = chain.key(), pools = snapshots.len(), "discovered pools");

    dex::load_pool_details(client, &mut snapshots).await?;
    dex::resolve_gauges(client, &mut snapshots, &config).await?;
    dex::load_reward_rates(client, &mut snapshots, &config).await?;

    let token_ids = apy::collect_token_ids(chain, &snapshots, &config);
    let price_map = prices.fetch_prices(&token_ids).await?;

    Ok(apy::compute_pool_yields(chain, &config, &snapshots, &price_map))
}
