//! Market discovery module
//!
//! Finds weather-relevant binary markets via the Gamma API and normalizes
//! their price and liquidity fields into `MarketCandidate`s.

mod classifier;
mod gamma;

pub use classifier::MarketClassifier;
pub use gamma::GammaClient;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// A weather-relevant binary market, normalized from a raw Gamma payload
#[derive(Debug, Clone, Serialize)]
pub struct MarketCandidate {
    /// Market identifier (id, condition id or slug, whichever is present)
    pub id: String,
    /// Question text
    pub question: String,
    /// Market-implied YES price in [0, 1]
    pub yes_price: f64,
    /// Liquidity proxy in USD
    pub liquidity: f64,
    /// Raw source payload, carried through for downstream consumers
    #[serde(skip)]
    pub raw: Value,
}

/// Trait for market listing collaborators
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Fetch up to `limit` raw market records
    async fn fetch_markets(&self, limit: usize) -> anyhow::Result<Vec<Value>>;
}
