/*
 * Formatting helpers shared with the aggregation harness
 */

use crate::chains::Chain;
use ethers::types::Address;

/// Join key into the price service: `"<chain>:<address>"`, lowercase hex.
#[must_use]
pub fn token_id(chain: Chain, address: Address) -> String {
    format!("{}:{:?}", chain.key(), address)
}

/// Display name for a chain key, e.g. "fantom" -> "Fantom".
#[must_use]
pub fn format_chain(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Display form of a trading-pair symbol: whitespace stripped, uppercased.
#[must_use]
pub fn format_symbol(symbol: &str) -> String {
    symbol.replace(char::is_whitespace, "").to_uppercase()
}

/// Strip the pool-type prefix from a raw pair symbol:
/// "vAMM-USDC-WFTM" -> "USDC-WFTM". A symbol with no separator passes
/// through whole.
#[must_use]
pub fn pair_symbol(raw: &str) -> &str {
    raw.split_once('-').map_or(raw, |(_, rest)| rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn format_chain_capitalizes() {
        assert_eq!(format_chain("fantom"), "Fantom");
        assert_eq!(format_chain("sonic"), "Sonic");
        assert_eq!(format_chain(""), "");
    }

    #[test]
    fn pair_symbol_drops_prefix_up_to_first_separator() {
        assert_eq!(pair_symbol("vAMM-USDC-WFTM"), "USDC-WFTM");
        assert_eq!(pair_symbol("sAMM-USDC-DAI"), "USDC-DAI");
    }

    #[test]
    fn pair_symbol_without_separator_passes_through() {
        assert_eq!(pair_symbol("WFTM"), "WFTM");
    }

    #[test]
    fn format_symbol_strips_whitespace_and_uppercases() {
        assert_eq!(format_symbol(" usdc-wftm "), "USDC-WFTM");
        assert_eq!(format_symbol("USDC WFTM"), "USDCWFTM");
    }

    #[test]
    fn token_id_is_chain_qualified_lowercase_hex() {
        let address = Address::from_str("0x3Fd3A0c85B70754eFc07aC9Ac0cbBDCe664865A6").unwrap();
        assert_eq!(
            token_id(Chain::Fantom, address),
            "fantom:0x3fd3a0c85b70754efc07ac9ac0cbbdce664865a6"
        );
    }
}
