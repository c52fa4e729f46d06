//! Ledger types

use crate::signal::Action;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Side held by a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionSide {
    Yes,
    No,
}

impl PositionSide {
    /// The side a signal's action buys
    pub fn from_action(action: Action) -> Self {
        match action {
            Action::BuyYes => PositionSide::Yes,
            Action::BuyNo => PositionSide::No,
        }
    }

    /// Per-unit price for this side given a YES price
    ///
    /// The YES price is clamped away from 0 and 1 so the quantity division
    /// stays finite.
    pub fn unit_price(self, yes_price: f64) -> f64 {
        let yes = yes_price.clamp(0.001, 0.999);
        match self {
            PositionSide::Yes => yes,
            PositionSide::No => 1.0 - yes,
        }
    }

    /// Mark value of `qty` units at the given YES price
    pub fn mark_value(self, qty: f64, yes_price: f64) -> f64 {
        qty * self.unit_price(yes_price)
    }
}

/// An open position; created on open, removed on close, updated on mark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub market_id: String,
    pub question: String,
    pub side: PositionSide,
    /// Outcome shares held
    pub qty: f64,
    pub entry_yes_price: f64,
    pub entry_unit_price: f64,
    pub cost_usd: f64,
    pub entry_ts: DateTime<Utc>,
    pub last_yes_price: f64,
    pub last_mark_value_usd: f64,
    pub last_mark_ts: DateTime<Utc>,
}

/// Trade record kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeKind {
    Open,
    Close,
}

/// Why a position was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// A new signal for the same market points the other way
    OppositeSignal,
    /// The side's edge decayed below the closing threshold
    EdgeDecay,
}

/// Immutable record of an OPEN or CLOSE event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: Uuid,
    pub ts: DateTime<Utc>,
    pub kind: TradeKind,
    pub market_id: String,
    pub question: String,
    pub side: PositionSide,
    pub qty: f64,
    pub yes_price: f64,
    pub cost_usd: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub proceeds_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub realized_pnl_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<CloseReason>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub signal_edge_bps: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub signal_confidence: Option<f64>,
}

/// A position marked to the latest price, for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkedPosition {
    pub market_id: String,
    pub question: String,
    pub side: PositionSide,
    pub qty: f64,
    pub entry_yes_price: f64,
    pub mark_yes_price: f64,
    pub cost_usd: f64,
    pub mark_value_usd: f64,
    pub unrealized_pnl_usd: f64,
}

/// Structured summary of one ledger update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub cash_usd: f64,
    pub equity_usd: f64,
    pub open_positions: usize,
    pub position_value_usd: f64,
    pub unrealized_pnl_usd: f64,
    /// Trades opened this run
    pub opened: Vec<Trade>,
    /// Trades closed this run
    pub closed: Vec<Trade>,
    pub positions: Vec<MarkedPosition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_price_sides() {
        assert_eq!(PositionSide::Yes.unit_price(0.40), 0.40);
        assert!((PositionSide::No.unit_price(0.40) - 0.60).abs() < 1e-12);
    }

    #[test]
    fn test_unit_price_clamped_away_from_degeneracy() {
        assert_eq!(PositionSide::Yes.unit_price(0.0), 0.001);
        assert_eq!(PositionSide::Yes.unit_price(1.0), 0.999);
        assert!((PositionSide::No.unit_price(1.0) - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_mark_value() {
        assert!((PositionSide::No.mark_value(100.0, 0.30) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_side_from_action() {
        assert_eq!(PositionSide::from_action(Action::BuyYes), PositionSide::Yes);
        assert_eq!(PositionSide::from_action(Action::BuyNo), PositionSide::No);
    }
}
