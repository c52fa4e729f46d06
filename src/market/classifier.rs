//! Weather-relevance classification and field normalization
//!
//! Raw Gamma payloads are loosely shaped: prices may be direct fields or
//! parallel outcome/price arrays (sometimes JSON-encoded strings), liquidity
//! hides under several names, and plenty of non-weather markets mention
//! weather words ("Miami Heat", "Carolina Hurricanes"). The classifier
//! normalizes the useful fields and filters the list down to markets that
//! are actually about weather.

use super::MarketCandidate;
use crate::config::PolymarketConfig;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

/// Terms that mark a market as definitely not about weather, even when a
/// weather noun appears in the question (sports franchises, unrelated news).
const BLOCKLIST: &[&str] = &[
    "miami heat",
    "oklahoma city thunder",
    "okc thunder",
    "carolina hurricanes",
    "tampa bay lightning",
    "colorado avalanche",
    "phoenix suns",
    "utah jazz",
    "golden state",
    "nba",
    "nfl",
    "nhl",
    "mlb",
    "playoff",
    "super bowl",
    "championship",
    "vs.",
    " vs ",
    "election",
    "president",
    "bitcoin",
    "ethereum",
    "stock",
];

/// Core weather nouns for the event pattern
const WEATHER_EVENTS: &[&str] = &[
    "rain",
    "snow",
    "storm",
    "hurricane",
    "blizzard",
    "tornado",
    "wind",
    "heatwave",
    "heat wave",
    "frost",
    "hail",
    "forecast",
    "precipitation",
];

/// Tokens that legitimize a "hurricane" mention as storm talk rather than
/// a sports-team reference
const STORM_CONTEXT: &[&str] = &[
    "storm",
    "landfall",
    "category",
    "tropical",
    "cyclone",
    "mph",
    "noaa",
    "season",
    "atlantic",
    "gulf",
];

lazy_static! {
    /// Numeric degree mention, e.g. "90F", "32 °c", "25 degrees"
    static ref DEGREE_HINT_RE: Regex =
        Regex::new(r"(?i)\b-?\d{1,3}\s*(?:°\s*)?(?:[fc]\b|degrees?\b)").unwrap();
    /// "in/at/for <Capitalized>" location preposition hint
    static ref LOCATION_HINT_RE: Regex =
        Regex::new(r"\b(?:in|at|for)\s+[A-Z][A-Za-z]").unwrap();
}

/// Filters raw market lists down to weather-relevant candidates
pub struct MarketClassifier {
    min_liquidity: f64,
    keywords: Vec<String>,
}

impl MarketClassifier {
    /// Create a classifier from the polymarket config section
    pub fn new(config: &PolymarketConfig) -> Self {
        Self {
            min_liquidity: config.min_liquidity,
            keywords: config
                .weather_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    /// Normalize and filter raw markets, sorted by liquidity descending
    pub fn classify(&self, raw_markets: Vec<Value>) -> Vec<MarketCandidate> {
        let mut candidates: Vec<MarketCandidate> = raw_markets
            .into_iter()
            .filter_map(|raw| self.candidate_from_raw(raw))
            .collect();

        candidates.sort_by(|a, b| {
            b.liquidity
                .partial_cmp(&a.liquidity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates
    }

    fn candidate_from_raw(&self, raw: Value) -> Option<MarketCandidate> {
        let question = raw
            .get("question")
            .or_else(|| raw.get("title"))
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if question.is_empty() {
            return None;
        }
        if !self.is_weather_market(&question) {
            return None;
        }

        let yes_price = extract_yes_price(&raw)?;
        let liquidity = extract_liquidity(&raw);
        if liquidity < self.min_liquidity {
            return None;
        }

        let id = ["id", "conditionId", "slug"]
            .iter()
            .find_map(|key| field_as_string(&raw, key))
            .unwrap_or_else(|| question.clone());

        Some(MarketCandidate {
            id,
            question,
            yes_price,
            liquidity,
            raw,
        })
    }

    /// Weather-relevance filter
    ///
    /// A question passes when it is not blocklisted, the "hurricane" token
    /// is backed by storm context, and it either matches the configured
    /// keyword list or matches a weather-event noun supported by a degree
    /// hint, a location hint or the literal word "weather".
    pub fn is_weather_market(&self, question: &str) -> bool {
        let q = question.to_lowercase();

        if BLOCKLIST.iter().any(|term| q.contains(term)) {
            return false;
        }

        if q.contains("hurricane") && !STORM_CONTEXT.iter().any(|tok| q.contains(tok)) {
            return false;
        }

        let keyword_match = self.keywords.iter().any(|k| q.contains(k.as_str()));
        let event_match = WEATHER_EVENTS.iter().any(|e| q.contains(e));
        let supported = DEGREE_HINT_RE.is_match(question)
            || q.contains("temperature")
            || q.contains("high")
            || q.contains("low")
            || LOCATION_HINT_RE.is_match(question)
            || q.contains("weather");

        keyword_match || (event_match && supported)
    }
}

fn field_as_string(raw: &Value, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a JSON value to f64, tolerating numeric strings
fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Extract a normalized YES price from a raw market payload
///
/// Tries the direct fields first, then matches an outcomes array against a
/// "Yes" label and reads the paired price array. Arrays are often shipped
/// as JSON-encoded strings in Gamma payloads. Prices outside [0, 1] reject
/// the market.
fn extract_yes_price(raw: &Value) -> Option<f64> {
    for key in ["yesPrice", "yes_price"] {
        if let Some(direct) = raw.get(key) {
            let price = to_float(direct)?;
            return if (0.0..=1.0).contains(&price) {
                Some(price)
            } else {
                None
            };
        }
    }

    let outcomes = decode_array(raw.get("outcomes")?)?;
    let prices = raw
        .get("outcomePrices")
        .or_else(|| raw.get("outcome_prices"))
        .and_then(decode_array)?;
    if outcomes.len() != prices.len() {
        return None;
    }

    for (outcome, price) in outcomes.iter().zip(prices.iter()) {
        let label = match outcome {
            Value::String(s) => s.trim().to_lowercase(),
            other => other.to_string(),
        };
        if label == "yes" {
            let yes = to_float(price)?;
            return if (0.0..=1.0).contains(&yes) {
                Some(yes)
            } else {
                None
            };
        }
    }
    None
}

/// Decode a JSON array that may itself be a JSON-encoded string
fn decode_array(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items.clone()),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

/// Extract liquidity by trying an ordered list of source field names
fn extract_liquidity(raw: &Value) -> f64 {
    for key in ["liquidity", "liquidityNum", "liquidityClob", "volume", "volumeNum"] {
        if let Some(value) = raw.get(key) {
            return to_float(value).unwrap_or(0.0);
        }
    }
    0.0
}
