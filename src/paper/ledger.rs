//! Ledger state machine
//!
//! One update per run against the persisted state: close pass, open pass,
//! marking, summary. An opposite signal closes a position even when its edge
//! has not decayed; edge decay applies only when the market was evaluated
//! this run, otherwise the position is marked at its last known price.

use super::state::{LedgerError, LedgerState};
use super::types::{
    CloseReason, LedgerSummary, MarkedPosition, Position, PositionSide, Trade, TradeKind,
};
use super::round_to;
use crate::config::PaperConfig;
use crate::engine::MarketEvaluation;
use crate::signal::Signal;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// Maximum trades retained in the persisted history
const TRADE_HISTORY_CAP: usize = 1000;

/// Stateful paper-trading portfolio
pub struct PaperTradingLedger {
    config: PaperConfig,
}

impl PaperTradingLedger {
    /// Create a ledger from the paper config section
    pub fn new(config: PaperConfig) -> Self {
        Self { config }
    }

    /// Load state, apply one update, persist, and return the summary
    pub fn apply(
        &self,
        evaluations: &[MarketEvaluation],
        signals: &[Signal],
        now: DateTime<Utc>,
    ) -> Result<LedgerSummary, LedgerError> {
        let mut state = LedgerState::load(&self.config.state_path, self.config.starting_cash_usd)?;
        let summary = self.update(&mut state, evaluations, signals, now);
        state.save(&self.config.state_path)?;
        Ok(summary)
    }

    /// Apply one run's evaluations and signals to the state in memory
    pub fn update(
        &self,
        state: &mut LedgerState,
        evaluations: &[MarketEvaluation],
        signals: &[Signal],
        now: DateTime<Utc>,
    ) -> LedgerSummary {
        let eval_by_market: HashMap<&str, &MarketEvaluation> = evaluations
            .iter()
            .map(|row| (row.market_id.as_str(), row))
            .collect();
        let signal_by_market: HashMap<&str, &Signal> = signals
            .iter()
            .map(|s| (s.market_id.as_str(), s))
            .collect();

        let mut opened: Vec<Trade> = Vec::new();
        let mut closed: Vec<Trade> = Vec::new();

        // Close pass.
        let market_ids: Vec<String> = state.positions.keys().cloned().collect();
        for market_id in market_ids {
            let Some(position) = state.positions.get(&market_id) else {
                continue;
            };

            // Markets skipped this run fall back to the last known price.
            let yes_price = eval_by_market
                .get(market_id.as_str())
                .map(|row| row.market_yes_prob)
                .unwrap_or(position.last_yes_price);
            let current_value = position.side.mark_value(position.qty, yes_price);

            let mut close_reason: Option<CloseReason> = None;
            if let Some(signal) = signal_by_market.get(market_id.as_str()) {
                if PositionSide::from_action(signal.action) != position.side {
                    close_reason = Some(CloseReason::OppositeSignal);
                }
            }
            if close_reason.is_none() {
                if let Some(row) = eval_by_market.get(market_id.as_str()) {
                    let decayed = match position.side {
                        PositionSide::Yes => row.edge_bps < self.config.close_edge_bps,
                        PositionSide::No => row.edge_bps > -self.config.close_edge_bps,
                    };
                    if decayed {
                        close_reason = Some(CloseReason::EdgeDecay);
                    }
                }
            }

            match close_reason {
                Some(reason) => {
                    let Some(position) = state.positions.remove(&market_id) else {
                        continue;
                    };
                    state.cash_usd += current_value;
                    let realized_pnl = current_value - position.cost_usd;
                    let trade = Trade {
                        id: Uuid::new_v4(),
                        ts: now,
                        kind: TradeKind::Close,
                        market_id: market_id.clone(),
                        question: position.question,
                        side: position.side,
                        qty: round_to(position.qty, 8),
                        yes_price: round_to(yes_price, 6),
                        cost_usd: round_to(position.cost_usd, 2),
                        proceeds_usd: Some(round_to(current_value, 2)),
                        realized_pnl_usd: Some(round_to(realized_pnl, 2)),
                        reason: Some(reason),
                        signal_edge_bps: None,
                        signal_confidence: None,
                    };
                    tracing::info!(
                        market_id = %market_id,
                        reason = ?reason,
                        realized_pnl_usd = trade.realized_pnl_usd,
                        "Closed paper position"
                    );
                    state.trades.push(trade.clone());
                    closed.push(trade);
                }
                None => {
                    if let Some(position) = state.positions.get_mut(&market_id) {
                        position.last_yes_price = yes_price;
                        position.last_mark_value_usd = round_to(current_value, 2);
                        position.last_mark_ts = now;
                    }
                }
            }
        }

        // Open pass, strongest conviction first (stable on ties).
        let mut by_conviction: Vec<&Signal> = signals.iter().collect();
        by_conviction.sort_by_key(|s| std::cmp::Reverse(s.edge_bps.abs()));

        let position_size = self.config.position_size_usd;
        for signal in by_conviction {
            if state.positions.len() >= self.config.max_open_positions {
                break;
            }
            let side = PositionSide::from_action(signal.action);
            if let Some(existing) = state.positions.get(&signal.market_id) {
                if existing.side == side {
                    continue;
                }
            }
            if state.cash_usd < position_size {
                break;
            }

            let yes_price = eval_by_market
                .get(signal.market_id.as_str())
                .map(|row| row.market_yes_prob)
                .unwrap_or(signal.market_yes_prob);
            let unit_price = side.unit_price(yes_price);
            let qty = position_size / unit_price;
            state.cash_usd -= position_size;

            state.positions.insert(
                signal.market_id.clone(),
                Position {
                    market_id: signal.market_id.clone(),
                    question: signal.question.clone(),
                    side,
                    qty,
                    entry_yes_price: yes_price,
                    entry_unit_price: unit_price,
                    cost_usd: position_size,
                    entry_ts: now,
                    last_yes_price: yes_price,
                    last_mark_value_usd: position_size,
                    last_mark_ts: now,
                },
            );

            let trade = Trade {
                id: Uuid::new_v4(),
                ts: now,
                kind: TradeKind::Open,
                market_id: signal.market_id.clone(),
                question: signal.question.clone(),
                side,
                qty: round_to(qty, 8),
                yes_price: round_to(yes_price, 6),
                cost_usd: round_to(position_size, 2),
                proceeds_usd: None,
                realized_pnl_usd: None,
                reason: None,
                signal_edge_bps: Some(signal.edge_bps),
                signal_confidence: Some(signal.confidence),
            };
            tracing::info!(
                market_id = %signal.market_id,
                side = ?side,
                edge_bps = signal.edge_bps,
                "Opened paper position"
            );
            state.trades.push(trade.clone());
            opened.push(trade);
        }

        // Marking.
        let mut marked: Vec<MarkedPosition> = Vec::new();
        let mut total_mark_value = 0.0;
        let mut total_cost = 0.0;
        for (market_id, position) in &state.positions {
            let yes_price = eval_by_market
                .get(market_id.as_str())
                .map(|row| row.market_yes_prob)
                .unwrap_or(position.last_yes_price);
            let mark_value = position.side.mark_value(position.qty, yes_price);
            total_mark_value += mark_value;
            total_cost += position.cost_usd;
            marked.push(MarkedPosition {
                market_id: market_id.clone(),
                question: position.question.clone(),
                side: position.side,
                qty: round_to(position.qty, 8),
                entry_yes_price: round_to(position.entry_yes_price, 6),
                mark_yes_price: round_to(yes_price, 6),
                cost_usd: round_to(position.cost_usd, 2),
                mark_value_usd: round_to(mark_value, 2),
                unrealized_pnl_usd: round_to(mark_value - position.cost_usd, 2),
            });
        }

        let equity = state.cash_usd + total_mark_value;
        let summary = LedgerSummary {
            cash_usd: round_to(state.cash_usd, 2),
            equity_usd: round_to(equity, 2),
            open_positions: marked.len(),
            position_value_usd: round_to(total_mark_value, 2),
            unrealized_pnl_usd: round_to(total_mark_value - total_cost, 2),
            opened,
            closed,
            positions: marked,
        };

        if state.trades.len() > TRADE_HISTORY_CAP {
            let excess = state.trades.len() - TRADE_HISTORY_CAP;
            state.trades.drain(..excess);
        }
        state.updated_at = Some(now);
        state.last_summary = Some(summary.clone());
        summary
    }
}
