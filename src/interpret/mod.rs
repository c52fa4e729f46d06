//! Question interpretation
//!
//! Parses a free-text market question into a structured `PredictionTarget`:
//! location candidates, explicit target dates (or none, in which case the
//! window selector falls back to the configured lookahead horizon), an
//! optional temperature comparison rule, and precipitation/snow flags.
//!
//! Each extraction family lives in its own submodule as a table of named,
//! independently testable rules.

pub mod dates;
pub mod location;
pub mod temperature;

pub use temperature::{CompareOp, TempRule};

use chrono::NaiveDate;
use serde::Serialize;

/// Tokens marking a question as a precipitation market
const PRECIP_TOKENS: &[&str] = &["rain", "precip", "storm", "thunder", "shower"];

/// Tokens marking a question as a snow market ("flurr" catches flurry/flurries)
const SNOW_TOKENS: &[&str] = &["snow", "blizzard", "sleet", "flurr"];

/// Structured prediction target derived once per question
#[derive(Debug, Clone, Serialize)]
pub struct PredictionTarget {
    /// Location text candidates in discovery order (may be empty)
    pub locations: Vec<String>,
    /// Explicit target calendar dates, when the question names any
    pub target_dates: Option<Vec<NaiveDate>>,
    /// Temperature comparison rule, threshold normalized to Celsius
    pub temp_rule: Option<TempRule>,
    pub is_precipitation: bool,
    pub is_snow: bool,
}

impl PredictionTarget {
    /// True when no explicit date was parsed and downstream selection must
    /// use the lookahead window
    pub fn uses_lookahead_window(&self) -> bool {
        self.target_dates.is_none()
    }
}

/// Interpret a question relative to `today` (injected for testability)
pub fn interpret(question: &str, today: NaiveDate) -> PredictionTarget {
    let q = question.to_lowercase();
    PredictionTarget {
        locations: location::extract_locations(question),
        target_dates: dates::extract_target_dates(question, today),
        temp_rule: temperature::extract_temp_rule(question),
        is_precipitation: PRECIP_TOKENS.iter().any(|t| q.contains(t)),
        is_snow: SNOW_TOKENS.iter().any(|t| q.contains(t)),
    }
}
