//! Location candidate extraction
//!
//! Three pattern families tried in order, plus one fallback: matches are
//! collected across all patterns, deduplicated case-insensitively, and kept
//! in discovery order. The resolver tries candidates in this order.
//!
//! The `regex` crate has no lookahead, so boundary tokens (stop words,
//! punctuation, end of string) are consumed as a non-capturing group
//! instead of asserted.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Single-token matches that are weather vocabulary, not places
const STOP_TOKENS: &[&str] = &[
    "temperature",
    "temp",
    "rain",
    "snow",
    "weather",
    "degrees",
    "degree",
    "will",
    "be",
    "is",
];

/// One named extraction rule: a pattern plus a capture-to-text transform
pub struct LocationRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub render: fn(&Captures) -> String,
}

fn render_first_group(caps: &Captures) -> String {
    caps[1].trim_matches(|c: char| c.is_whitespace() || ",.?".contains(c)).to_string()
}

fn render_city_state(caps: &Captures) -> String {
    format!("{}, {}", caps[1].trim(), caps[2].trim())
}

lazy_static! {
    /// Rules in priority order
    pub static ref LOCATION_RULES: Vec<LocationRule> = vec![
        LocationRule {
            name: "preposition_phrase",
            pattern: Regex::new(
                r"(?i)\b(?:in|at|for)\s+([A-Za-z][A-Za-z.\-'\s]{1,60}?)(?:\s+(?:on|by|before|after|through|during|if|when|will|with|above|below|over|under|this|next|tomorrow|today)\b|[?.!,]|$)",
            )
            .unwrap(),
            render: render_first_group,
        },
        LocationRule {
            name: "will_subject_verb",
            pattern: Regex::new(
                r"(?i)\bwill\s+([A-Za-z][A-Za-z.\-'\s]{1,50}?)\s+(?:hit|reach|get|see|have)\b",
            )
            .unwrap(),
            render: render_first_group,
        },
        LocationRule {
            name: "city_state_abbrev",
            pattern: Regex::new(
                r"\b([A-Za-z][A-Za-z.\-']+(?:\s+[A-Za-z][A-Za-z.\-']+){0,3}),\s*([A-Z]{2})\b",
            )
            .unwrap(),
            render: render_city_state,
        },
    ];

    /// Fallback: capitalized phrase immediately preceding a weather noun
    static ref WEATHER_NOUN_PREFIX_RE: Regex = Regex::new(
        r"\b([A-Z][A-Za-z.\-']+(?:\s+[A-Z][A-Za-z.\-']+){0,3})\s+(?:weather|rain|snow|temperature|temp)\b",
    )
    .unwrap();
}

/// Extract location candidates from a question, in discovery order
pub fn extract_locations(question: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    for rule in LOCATION_RULES.iter() {
        for caps in rule.pattern.captures_iter(question) {
            let city = (rule.render)(&caps);
            if city.len() < 2 {
                continue;
            }
            let lower = city.to_lowercase();
            if STOP_TOKENS.contains(&lower.as_str()) {
                continue;
            }
            out.push(city);
        }
    }

    if let Some(caps) = WEATHER_NOUN_PREFIX_RE.captures(question) {
        out.push(caps[1].trim().to_string());
    }

    let mut deduped: Vec<String> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    for city in out {
        let key = city.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        deduped.push(city);
    }
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preposition_phrase_stops_at_stop_word() {
        let cities = extract_locations("Will it rain in New York City on Friday?");
        assert_eq!(cities[0], "New York City");
    }

    #[test]
    fn test_preposition_phrase_stops_at_punctuation() {
        let cities = extract_locations("What is the high in Chicago?");
        assert!(cities.contains(&"Chicago".to_string()));
    }

    #[test]
    fn test_will_subject_verb() {
        let cities = extract_locations("Will Phoenix hit 115 degrees this week?");
        assert_eq!(cities[0], "Phoenix");
    }

    #[test]
    fn test_city_state_abbrev() {
        let cities = extract_locations("Highest temperature in Austin, TX on 7/4?");
        assert!(cities.contains(&"Austin, TX".to_string()));
    }

    #[test]
    fn test_weather_noun_fallback() {
        let cities = extract_locations("Salt Lake City snow before December?");
        assert!(cities.contains(&"Salt Lake City".to_string()));
    }

    #[test]
    fn test_dedupe_case_insensitive_preserves_order() {
        let cities = extract_locations("Will it rain in miami? Miami rain odds");
        assert_eq!(cities.iter().filter(|c| c.to_lowercase() == "miami").count(), 1);
        assert_eq!(cities[0], "miami");
    }

    #[test]
    fn test_stop_token_singletons_dropped() {
        let cities = extract_locations("Will temperature hit 100?");
        assert!(cities.iter().all(|c| c.to_lowercase() != "temperature"));
    }

    #[test]
    fn test_no_location() {
        assert!(extract_locations("Will it be hot?").is_empty());
    }
}
