//! Target date extraction
//!
//! Rules are tried in priority order; the first one that yields dates wins.
//! "Today" is injected so the relative rules (roll-forward, weekday, weekend)
//! stay deterministic under test.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DATE_ISO_RE: Regex = Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").unwrap();
    static ref DATE_NATURAL_RE: Regex = Regex::new(
        r"(?i)\b(?:on\s+)?(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\s+(\d{1,2})(?:,\s*(\d{4}))?\b",
    )
    .unwrap();
    static ref DATE_MDY_RE: Regex =
        Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{2,4}))?\b").unwrap();
    static ref WEEKDAY_RE: Regex = Regex::new(
        r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday|weekend|today|tomorrow)\b",
    )
    .unwrap();
}

/// One named extraction rule
pub struct DateRule {
    pub name: &'static str,
    pub extract: fn(&str, NaiveDate) -> Option<Vec<NaiveDate>>,
}

/// Rules in priority order
pub const DATE_RULES: &[DateRule] = &[
    DateRule { name: "iso", extract: extract_iso },
    DateRule { name: "month_day", extract: extract_natural },
    DateRule { name: "numeric_mdy", extract: extract_mdy },
    DateRule { name: "weekday_relative", extract: extract_weekday },
];

/// Extract explicit target dates, if the question names any
pub fn extract_target_dates(question: &str, today: NaiveDate) -> Option<Vec<NaiveDate>> {
    for rule in DATE_RULES {
        if let Some(dates) = (rule.extract)(question, today) {
            return Some(dates);
        }
    }
    None
}

fn extract_iso(question: &str, _today: NaiveDate) -> Option<Vec<NaiveDate>> {
    let caps = DATE_ISO_RE.captures(question)?;
    let date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()?;
    Some(vec![date])
}

fn month_from_prefix(token: &str) -> Option<u32> {
    let prefix = token.get(..3)?.to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn extract_natural(question: &str, today: NaiveDate) -> Option<Vec<NaiveDate>> {
    let caps = DATE_NATURAL_RE.captures(question)?;
    let month = month_from_prefix(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;
    let explicit_year: Option<i32> = caps.get(3).and_then(|m| m.as_str().parse().ok());

    let year = explicit_year.unwrap_or_else(|| today.year());
    let mut candidate = NaiveDate::from_ymd_opt(year, month, day)?;
    // Year omitted and the date already passed: the question means next year.
    if explicit_year.is_none() && candidate < today {
        candidate = NaiveDate::from_ymd_opt(year + 1, month, day)?;
    }
    Some(vec![candidate])
}

fn extract_mdy(question: &str, today: NaiveDate) -> Option<Vec<NaiveDate>> {
    let caps = DATE_MDY_RE.captures(question)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let explicit_year: Option<i32> = caps.get(3).and_then(|m| m.as_str().parse().ok());

    let year = match explicit_year {
        Some(y) if y < 100 => y + 2000,
        Some(y) => y,
        None => today.year(),
    };
    let mut candidate = NaiveDate::from_ymd_opt(year, month, day)?;
    if explicit_year.is_none() && candidate < today {
        candidate = NaiveDate::from_ymd_opt(year + 1, month, day)?;
    }
    Some(vec![candidate])
}

fn extract_weekday(question: &str, today: NaiveDate) -> Option<Vec<NaiveDate>> {
    let caps = WEEKDAY_RE.captures(question)?;
    let token = caps[1].to_lowercase();

    let dates = match token.as_str() {
        "today" => vec![today],
        "tomorrow" => vec![today + Days::new(1)],
        "weekend" => {
            // Next Saturday/Sunday pair (today if Saturday).
            let delta = (Weekday::Sat.num_days_from_monday() + 7
                - today.weekday().num_days_from_monday())
                % 7;
            let sat = today + Days::new(delta as u64);
            vec![sat, sat + Days::new(1)]
        }
        name => {
            let target = name.parse::<Weekday>().ok()?;
            let delta = (target.num_days_from_monday() + 7
                - today.weekday().num_days_from_monday())
                % 7;
            vec![today + Days::new(delta as u64)]
        }
    };
    Some(dates)
}
