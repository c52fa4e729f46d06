//! Gamma API client for market discovery
//!
//! Fetches active markets from Polymarket's Gamma API. The payload shape
//! varies between deployments (bare list, or a list nested under `markets`,
//! `data` or `results`), so normalization is tolerant.

use super::MarketSource;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Client for Polymarket's Gamma API
pub struct GammaClient {
    base_url: String,
    client: Client,
}

impl GammaClient {
    /// Create a new Gamma API client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Pull the market list out of whichever envelope the API used
    fn normalize_payload(payload: Value) -> Vec<Value> {
        match payload {
            Value::Array(items) => items,
            Value::Object(map) => {
                for key in ["markets", "data", "results"] {
                    if let Some(Value::Array(items)) = map.get(key) {
                        return items.clone();
                    }
                }
                vec![]
            }
            _ => vec![],
        }
    }
}

#[async_trait]
impl MarketSource for GammaClient {
    async fn fetch_markets(&self, limit: usize) -> anyhow::Result<Vec<Value>> {
        tracing::debug!(url = %self.base_url, limit, "Fetching active markets from Gamma API");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("active", "true"),
                ("archived", "false"),
                ("closed", "false"),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gamma API error: {} - {}", status, body);
        }

        let payload: Value = response.json().await?;
        let markets = Self::normalize_payload(payload);
        tracing::debug!(market_count = markets.len(), "Fetched raw markets");
        Ok(markets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_bare_list() {
        let payload = json!([{"id": "1"}, {"id": "2"}]);
        assert_eq!(GammaClient::normalize_payload(payload).len(), 2);
    }

    #[test]
    fn test_normalize_nested_under_data() {
        let payload = json!({"data": [{"id": "1"}]});
        assert_eq!(GammaClient::normalize_payload(payload).len(), 1);
    }

    #[test]
    fn test_normalize_nested_under_markets() {
        let payload = json!({"markets": [{"id": "1"}], "meta": {}});
        assert_eq!(GammaClient::normalize_payload(payload).len(), 1);
    }

    #[test]
    fn test_normalize_unrecognized_shape() {
        assert!(GammaClient::normalize_payload(json!("nope")).is_empty());
        assert!(GammaClient::normalize_payload(json!({"other": 1})).is_empty());
    }
}
