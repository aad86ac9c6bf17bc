/*
 * Static per-network configuration for Equalizer deployments
 */

use ethers::types::Address;

/// Networks this adaptor covers. Adding a deployment means adding a variant
/// here and its addresses below; an unknown chain cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    Fantom,
    Sonic,
}

/// Contract addresses of one Equalizer deployment. Built from the static
/// table below at lookup time; never mutated.
#[derive(Debug, Clone, Copy)]
pub struct NetworkConfig {
    pub pair_factory: Address,
    pub voter: Address,
    pub reward_token: Address,
}

impl Chain {
    #[must_use]
    pub const fn all() -> [Chain; 2] {
        [Chain::Fantom, Chain::Sonic]
    }

    /// Lowercase identifier used in price-service keys and log fields.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Chain::Fantom => "fantom",
            Chain::Sonic => "sonic",
        }
    }

    #[must_use]
    pub const fn chain_id(self) -> u64 {
        match self {
            Chain::Fantom => 250,
            Chain::Sonic => 146,
        }
    }

    /// Deployment addresses for this network.
    #[must_use]
    pub fn network_config(self) -> NetworkConfig {
        match self {
            Chain::Fantom => NetworkConfig {
                pair_factory: addr("0xc6366EFD0AF1d09171fe0EBF32c7943BB310832a"),
                voter: addr("0xE3D1A117dF7DCaC2eB0AC8219341bAd92f18dAC1"),
                reward_token: addr("0x3Fd3A0c85B70754eFc07aC9Ac0cbBDCe664865A6"),
            },
            Chain::Sonic => NetworkConfig {
                pair_factory: addr("0xDDD9845Ba0D8f38d3045f804f67A1a8B9A528FcC"),
                voter: addr("0x17fa9dA6e01aD59513707F92033a6eb03CcB10B4"),
                reward_token: addr("0xddf26b42c1d903de8962d3f79a74a501420d5f19"),
            },
        }
    }
}

// Known-good constants; parsing cannot fail at runtime.
fn addr(s: &str) -> Address {
    s.parse().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_chain_has_a_complete_config() {
        for chain in Chain::all() {
            let config = chain.network_config();
            assert!(!config.pair_factory.is_zero());
            assert!(!config.voter.is_zero());
            assert!(!config.reward_token.is_zero());
        }
    }

    #[test]
    fn deployments_are_distinct_per_chain() {
        let fantom = Chain::Fantom.network_config();
        let sonic = Chain::Sonic.network_config();
        assert_ne!(fantom.pair_factory, sonic.pair_factory);
        assert_ne!(fantom.reward_token, sonic.reward_token);
    }

    #[test]
    fn chain_keys_are_lowercase() {
        for chain in Chain::all() {
            assert_eq!(chain.key(), chain.key().to_lowercase());
        }
    }
}
