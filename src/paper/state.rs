//! Ledger state persistence
//!
//! The state file is the sole durable artifact: read fully at run start,
//! rewritten fully (temp file + rename) at run end. An absent file is a
//! fresh ledger with the configured starting cash. A present-but-malformed
//! file is an error; the run surfaces it instead of silently resetting.

use super::{LedgerSummary, Position, Trade};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Ledger persistence failures
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger state io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ledger state file is malformed: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Full persisted ledger state
#[derive(Debug, Clone, Serialize)]
pub struct LedgerState {
    pub cash_usd: f64,
    /// Open positions keyed by market id (ordered for stable output)
    pub positions: BTreeMap<String, Position>,
    /// Bounded trade history, most recent last
    pub trades: Vec<Trade>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_summary: Option<LedgerSummary>,
}

/// On-disk shape; individually missing keys get defaults, as older state
/// files may predate some fields
#[derive(Debug, Deserialize)]
struct RawState {
    cash_usd: Option<f64>,
    #[serde(default)]
    positions: BTreeMap<String, Position>,
    #[serde(default)]
    trades: Vec<Trade>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    last_summary: Option<LedgerSummary>,
}

impl LedgerState {
    /// Fresh ledger with the configured starting cash
    pub fn fresh(starting_cash_usd: f64) -> Self {
        Self {
            cash_usd: starting_cash_usd,
            positions: BTreeMap::new(),
            trades: Vec::new(),
            updated_at: None,
            last_summary: None,
        }
    }

    /// Load the state file, or start fresh when it does not exist
    pub fn load(path: &Path, starting_cash_usd: f64) -> Result<Self, LedgerError> {
        if !path.exists() {
            return Ok(Self::fresh(starting_cash_usd));
        }
        let content = std::fs::read_to_string(path)?;
        let raw: RawState = serde_json::from_str(&content)?;
        Ok(Self {
            cash_usd: raw.cash_usd.unwrap_or(starting_cash_usd),
            positions: raw.positions,
            trades: raw.trades,
            updated_at: raw.updated_at,
            last_summary: raw.last_summary,
        })
    }

    /// Persist by fully overwriting the state file (temp file + rename)
    pub fn save(&self, path: &Path) -> Result<(), LedgerError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paper::{PositionSide, TradeKind};
    use tempfile::tempdir;
    use uuid::Uuid;

    fn sample_state() -> LedgerState {
        let mut state = LedgerState::fresh(1000.0);
        state.cash_usd = 950.0;
        state.positions.insert(
            "m1".into(),
            Position {
                market_id: "m1".into(),
                question: "Will it rain in Seattle tomorrow?".into(),
                side: PositionSide::Yes,
                qty: 125.0,
                entry_yes_price: 0.40,
                entry_unit_price: 0.40,
                cost_usd: 50.0,
                entry_ts: Utc::now(),
                last_yes_price: 0.40,
                last_mark_value_usd: 50.0,
                last_mark_ts: Utc::now(),
            },
        );
        state.trades.push(Trade {
            id: Uuid::new_v4(),
            ts: Utc::now(),
            kind: TradeKind::Open,
            market_id: "m1".into(),
            question: "Will it rain in Seattle tomorrow?".into(),
            side: PositionSide::Yes,
            qty: 125.0,
            yes_price: 0.40,
            cost_usd: 50.0,
            proceeds_usd: None,
            realized_pnl_usd: None,
            reason: None,
            signal_edge_bps: Some(3500),
            signal_confidence: Some(0.8),
        });
        state
    }

    #[test]
    fn test_missing_file_starts_fresh() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let state = LedgerState::load(&path, 1000.0).unwrap();
        assert_eq!(state.cash_usd, 1000.0);
        assert!(state.positions.is_empty());
        assert!(state.trades.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/state.json");
        let state = sample_state();
        state.save(&path).unwrap();

        let loaded = LedgerState::load(&path, 1000.0).unwrap();
        assert_eq!(loaded.cash_usd, state.cash_usd);
        assert_eq!(loaded.positions.len(), 1);
        assert_eq!(loaded.positions["m1"].qty, 125.0);
        assert_eq!(loaded.trades.len(), 1);
        assert_eq!(loaded.trades[0].signal_edge_bps, Some(3500));
    }

    #[test]
    fn test_missing_keys_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"positions": {}}"#).unwrap();
        let state = LedgerState::load(&path, 750.0).unwrap();
        assert_eq!(state.cash_usd, 750.0);
        assert!(state.trades.is_empty());
    }

    #[test]
    fn test_malformed_file_is_an_error_not_a_reset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = LedgerState::load(&path, 1000.0).unwrap_err();
        assert!(matches!(err, LedgerError::Corrupt(_)));
        // The corrupt file is left in place.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
    }

    #[test]
    fn test_save_overwrites_fully() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        sample_state().save(&path).unwrap();
        LedgerState::fresh(10.0).save(&path).unwrap();
        let loaded = LedgerState::load(&path, 1000.0).unwrap();
        assert_eq!(loaded.cash_usd, 10.0);
        assert!(loaded.positions.is_empty());
    }
}
