//! Signal evaluation

use super::{Action, Signal};
use crate::config::SignalConfig;
use crate::market::MarketCandidate;
use crate::model::ProbabilityEstimate;

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Edge between model and market YES probability, in basis points
pub fn edge_bps(model_prob: f64, market_yes_prob: f64) -> i64 {
    ((model_prob - market_yes_prob) * 10_000.0).round() as i64
}

/// Decides whether a model estimate is worth a directional signal
pub struct SignalEvaluator {
    min_edge_bps: i64,
    min_confidence: f64,
}

impl SignalEvaluator {
    /// Create an evaluator from the signal config section
    pub fn new(config: &SignalConfig) -> Self {
        Self {
            min_edge_bps: config.min_edge_bps,
            min_confidence: config.min_confidence,
        }
    }

    /// Emit a signal when the estimate clears the confidence and edge bars
    pub fn evaluate(
        &self,
        market: &MarketCandidate,
        estimate: &ProbabilityEstimate,
    ) -> Option<Signal> {
        if estimate.confidence < self.min_confidence {
            return None;
        }

        let edge = edge_bps(estimate.model_prob, market.yes_price);
        let action = if edge >= self.min_edge_bps {
            Action::BuyYes
        } else if edge <= -self.min_edge_bps {
            Action::BuyNo
        } else {
            return None;
        };

        Some(Signal {
            market_id: market.id.clone(),
            question: market.question.clone(),
            action,
            market_yes_prob: round_to(market.yes_price, 4),
            model_yes_prob: round_to(estimate.model_prob, 4),
            edge_bps: edge,
            confidence: round_to(estimate.confidence, 4),
            liquidity: round_to(market.liquidity, 2),
            rationale: estimate.rationale.clone(),
        })
    }
}
