//! Signal generation module
//!
//! Combines market-implied and model probabilities into an edge in basis
//! points and decides whether to emit a directional signal.

mod evaluator;
mod types;

pub use evaluator::{edge_bps, SignalEvaluator};
pub use types::{Action, Signal};
