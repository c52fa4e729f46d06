//! Paper trading ledger
//!
//! Maintains a persisted portfolio of open positions across runs: closes
//! positions on opposite signals or edge decay, opens positions for new
//! signals by conviction, marks everything to the latest price, and rewrites
//! the state file atomically at the end of each run.

mod ledger;
mod state;
mod types;

pub use ledger::PaperTradingLedger;
pub use state::{LedgerError, LedgerState};
pub use types::{
    CloseReason, LedgerSummary, MarkedPosition, Position, PositionSide, Trade, TradeKind,
};

/// Round to `places` decimal places (reporting and persistence only)
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
