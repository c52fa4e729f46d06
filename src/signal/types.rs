//! Signal types

use serde::{Deserialize, Serialize};

/// Signal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Model thinks YES is underpriced
    BuyYes,
    /// Model thinks YES is overpriced
    BuyNo,
}

/// A trade signal; immutable after creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub market_id: String,
    pub question: String,
    pub action: Action,
    /// Market-implied YES probability, rounded to 4dp
    pub market_yes_prob: f64,
    /// Model YES probability, rounded to 4dp
    pub model_yes_prob: f64,
    /// Signed edge between model and market, basis points
    pub edge_bps: i64,
    pub confidence: f64,
    pub liquidity: f64,
    pub rationale: String,
}
