//! Temperature rule extraction
//!
//! Recognizes freezing phrases, symbolic comparisons, worded comparisons and
//! "reach/hit N" phrases, in that priority order. Thresholds are normalized
//! to Celsius before being stored.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Comparison operator of a temperature rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompareOp {
    /// Window value must be >= threshold
    AtLeast,
    /// Window value must be <= threshold
    AtMost,
}

impl CompareOp {
    /// Whether `value` satisfies the comparison against `threshold`
    pub fn satisfied(self, value: f64, threshold: f64) -> bool {
        match self {
            CompareOp::AtLeast => value >= threshold,
            CompareOp::AtMost => value <= threshold,
        }
    }
}

/// A temperature comparison rule with the threshold in Celsius
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TempRule {
    pub op: CompareOp,
    pub threshold_c: f64,
}

lazy_static! {
    static ref TEMP_SYMBOL_RE: Regex =
        Regex::new(r"(?i)(>=|<=|>|<)\s*(-?\d{1,3})\s*°?\s*([fc])?").unwrap();
    static ref TEMP_WORD_RE: Regex = Regex::new(
        r"(?i)(above|over|at\s+least|greater\s+than|below|under|at\s+most|less\s+than)\s+(-?\d{1,3})\s*(?:°?\s*([fc])\b|degrees?)?",
    )
    .unwrap();
    static ref TEMP_REACH_RE: Regex =
        Regex::new(r"(?i)(?:hit|reach|get to|top|high of)\s+(-?\d{1,3})\s*(?:°?\s*([fc])\b)?")
            .unwrap();
}

fn fahrenheit_to_celsius(value_f: f64) -> f64 {
    (value_f - 32.0) * 5.0 / 9.0
}

/// Temperature unit inference when no explicit unit letter is present
///
/// Explicit mentions win; otherwise thresholds above 55 in magnitude are
/// implausible in Celsius and read as Fahrenheit.
fn infer_unit(raw_value: f64, raw_unit: Option<&str>, question: &str) -> char {
    if let Some(unit) = raw_unit {
        return unit.to_lowercase().chars().next().unwrap_or('c');
    }
    let q = question.to_lowercase();
    if q.contains("fahrenheit") {
        return 'f';
    }
    if q.contains("celsius") || q.contains("centigrade") {
        return 'c';
    }
    if raw_value.abs() > 55.0 {
        return 'f';
    }
    'c'
}

fn to_celsius(raw_value: f64, raw_unit: Option<&str>, question: &str) -> f64 {
    match infer_unit(raw_value, raw_unit, question) {
        'f' => fahrenheit_to_celsius(raw_value),
        _ => raw_value,
    }
}

/// Extract a temperature comparison rule, if the question contains one
pub fn extract_temp_rule(question: &str) -> Option<TempRule> {
    let q = question.to_lowercase();
    if q.contains("below freezing") || q.contains("under freezing") {
        return Some(TempRule {
            op: CompareOp::AtMost,
            threshold_c: 0.0,
        });
    }
    if q.contains("above freezing") {
        return Some(TempRule {
            op: CompareOp::AtLeast,
            threshold_c: 0.0,
        });
    }

    if let Some(caps) = TEMP_SYMBOL_RE.captures(question) {
        let value_raw: f64 = caps[2].parse().ok()?;
        let unit = caps.get(3).map(|m| m.as_str());
        let op = match &caps[1] {
            ">" | ">=" => CompareOp::AtLeast,
            _ => CompareOp::AtMost,
        };
        return Some(TempRule {
            op,
            threshold_c: to_celsius(value_raw, unit, question),
        });
    }

    if let Some(caps) = TEMP_WORD_RE.captures(question) {
        let phrase = caps[1].to_lowercase();
        let value_raw: f64 = caps[2].parse().ok()?;
        let unit = caps.get(3).map(|m| m.as_str());
        let op = if ["above", "over"].contains(&phrase.as_str())
            || phrase.starts_with("at least")
            || phrase.starts_with("greater")
        {
            CompareOp::AtLeast
        } else {
            CompareOp::AtMost
        };
        return Some(TempRule {
            op,
            threshold_c: to_celsius(value_raw, unit, question),
        });
    }

    if let Some(caps) = TEMP_REACH_RE.captures(question) {
        let value_raw: f64 = caps[1].parse().ok()?;
        let unit = caps.get(2).map(|m| m.as_str());
        // "reach/hit/top N" always reads as an upside threshold.
        return Some(TempRule {
            op: CompareOp::AtLeast,
            threshold_c: to_celsius(value_raw, unit, question),
        });
    }

    None
}
