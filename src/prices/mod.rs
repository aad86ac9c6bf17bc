/*
 * Paginated USD price lookups against the DefiLlama coins API
 */

use crate::models::{AdaptorError, PriceQuote, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Batch ceiling the price service imposes on one request's key list.
pub const MAX_KEYS_PER_REQUEST: usize = 50;

/// Source of current USD prices keyed by `"<chain>:<address>"`. Tokens the
/// service does not know are absent from the result, not errors.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_prices(&self, token_ids: &[String]) -> Result<HashMap<String, PriceQuote>>;
}

pub struct LlamaPriceClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    coins: HashMap<String, PriceQuote>,
}

impl LlamaPriceClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

// Some registries carry a '/' inside symbol-styled addresses; the price
// service rejects it, so it is stripped rather than treated as an error.
fn sanitize_token_id(token_id: &str) -> String {
    token_id.replace('/', "")
}

#[async_trait]
impl PriceSource for LlamaPriceClient {
    async fn fetch_prices(&self, token_ids: &[String]) -> Result<HashMap<String, PriceQuote>> {
        let mut merged = HashMap::new();

        for chunk in token_ids.chunks(MAX_KEYS_PER_REQUEST) {
            let keys = chunk
                .iter()
                .map(|id| sanitize_token_id(id))
                .collect::<Vec<_>>()
                .join(",");
            let url = format!("{}/prices/current/{keys}", self.base_url);

            let response = self.client.get(&url).send().await?;
            if !response.status().is_success() {
                return Err(AdaptorError::PriceApiError(format!(
                    "Price service returned HTTP {}",
                    response.status()
                )));
            }
            let page = response.json::<PriceResponse>().await.map_err(|e| {
                AdaptorError::PriceApiError(format!("Failed to parse price response: {e}"))
            })?;
            merged.extend(page.coins);
        }

        debug!(
            requested = token_ids.len(),
            priced = merged.len(),
            "price lookup complete"
        );
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_slashes() {
        assert_eq!(
            sanitize_token_id("fantom:0xabc/def"),
            "fantom:0xabcdef"
        );
        assert_eq!(sanitize_token_id("fantom:0xabcdef"), "fantom:0xabcdef");
    }

    #[tokio::test]
    async fn large_token_sets_are_chunked_and_merged() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Regex(r"^/prices/current/.+$".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"coins":{"fantom:0x01":{"price":1.5},"fantom:0x02":{"price":2.5}}}"#)
            .expect(3)
            .create_async()
            .await;

        let client = LlamaPriceClient::new(&server.url());
        let token_ids: Vec<String> = (0..120).map(|i| format!("fantom:0x{i:040x}")).collect();

        let prices = client.fetch_prices(&token_ids).await.unwrap();
        mock.assert_async().await;
        assert_eq!(prices.len(), 2);
        assert_eq!(prices["fantom:0x01"].price, 1.5);
        assert_eq!(prices["fantom:0x02"].price, 2.5);
    }

    #[tokio::test]
    async fn request_path_carries_sanitized_comma_joined_keys() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/prices/current/fantom:0xabcdef,fantom:0x123456")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"coins":{}}"#)
            .expect(1)
            .create_async()
            .await;

        let client = LlamaPriceClient::new(&server.url());
        let token_ids = vec![
            "fantom:0xabc/def".to_string(),
            "fantom:0x123456".to_string(),
        ];

        let prices = client.fetch_prices(&token_ids).await.unwrap();
        mock.assert_async().await;
        assert!(prices.is_empty());
    }

    #[tokio::test]
    async fn service_errors_are_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Regex(r"^/prices/current/.+$".to_string()))
            .with_status(500)
            .create_async()
            .await;

        let client = LlamaPriceClient::new(&server.url());
        let result = client
            .fetch_prices(&["fantom:0x01".to_string()])
            .await;
        assert!(matches!(result, Err(AdaptorError::PriceApiError(_))));
    }

    #[tokio::test]
    async fn extra_response_fields_are_ignored() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Regex(r"^/prices/current/.+$".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"coins":{"fantom:0x01":{"price":3.25,"symbol":"WFTM","timestamp":1700000000,"confidence":0.99}}}"#,
            )
            .create_async()
            .await;

        let client = LlamaPriceClient::new(&server.url());
        let prices = client
            .fetch_prices(&["fantom:0x01".to_string()])
            .await
            .unwrap();
        assert_eq!(prices["fantom:0x01"].price, 3.25);
    }
}
