//! Probability model
//!
//! Converts a selected forecast window into a YES probability, a confidence
//! score, and a human-readable rationale. Branches by market kind: the
//! temperature path applies only when a temperature rule was found and the
//! market is neither a precipitation nor snow proxy; everything else goes
//! through the precipitation/snow path.

mod confidence;
mod precipitation;
mod temperature;

pub use confidence::calc_confidence;
pub use precipitation::precip_probability;
pub use temperature::temperature_probability;

use crate::interpret::{CompareOp, PredictionTarget};
use crate::weather::{select_window, ForecastSeries};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Confidence boost per model path; the snow path's extra multiplicative
/// step makes it the least reliable
const TEMPERATURE_BOOST: f64 = 1.0;
const PRECIP_BOOST: f64 = 0.85;
const SNOW_BOOST: f64 = 0.75;

/// Model output for one market in one run
#[derive(Debug, Clone, Serialize)]
pub struct ProbabilityEstimate {
    /// YES probability in [0, 1]
    pub model_prob: f64,
    /// Confidence in [0.05, 0.98]
    pub confidence: f64,
    pub rationale: String,
}

impl ProbabilityEstimate {
    /// Neutral coin-flip estimate used by the fallback paths
    pub fn neutral(confidence: f64, rationale: impl Into<String>) -> Self {
        Self {
            model_prob: 0.5,
            confidence,
            rationale: rationale.into(),
        }
    }

    /// Estimate for a question whose location could not be resolved
    pub fn location_failure(rationale: impl Into<String>) -> Self {
        Self::neutral(0.15, rationale)
    }

    /// Estimate for a resolved location with no usable hourly forecast
    pub fn missing_forecast(location_label: &str) -> Self {
        Self::neutral(
            0.2,
            format!("No hourly forecast returned for {}.", location_label),
        )
    }
}

fn dates_label(target_dates: Option<&[NaiveDate]>) -> String {
    match target_dates {
        Some(dates) => {
            let parts: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
            parts.join(", ")
        }
        None => "next-window".to_string(),
    }
}

/// Compute the estimate for a prediction target against a forecast series
pub fn estimate(
    target: &PredictionTarget,
    series: &ForecastSeries,
    location_label: &str,
    now: DateTime<Utc>,
    lookahead_hours: i64,
) -> ProbabilityEstimate {
    let target_dates = target.target_dates.as_deref();

    if let Some(rule) = target.temp_rule.filter(|_| !target.is_precipitation && !target.is_snow) {
        let window = select_window(
            &series.timestamps,
            &series.temperature_c,
            target_dates,
            now,
            lookahead_hours,
        );
        let model_prob = temperature_probability(&window, rule);
        let confidence = calc_confidence(model_prob, window.len(), TEMPERATURE_BOOST);
        let op = match rule.op {
            CompareOp::AtLeast => ">=",
            CompareOp::AtMost => "<=",
        };
        return ProbabilityEstimate {
            model_prob,
            confidence,
            rationale: format!(
                "{}: temp rule {} {:.1}C, points={}, dates={}, model_prob={:.3}",
                location_label,
                op,
                rule.threshold_c,
                window.len(),
                dates_label(target_dates),
                model_prob
            ),
        };
    }

    let precip_window = select_window(
        &series.timestamps,
        &series.precip_probability_pct,
        target_dates,
        now,
        lookahead_hours,
    );
    if precip_window.is_empty() {
        return ProbabilityEstimate::neutral(
            0.2,
            format!("{}: no precipitation window available.", location_label),
        );
    }

    let mut model_prob = precip_probability(&precip_window);
    let mut boost = PRECIP_BOOST;

    if target.is_snow {
        // Snow needs both a precipitation signal and freezing temperatures.
        let temp_window = select_window(
            &series.timestamps,
            &series.temperature_c,
            target_dates,
            now,
            lookahead_hours,
        );
        if !temp_window.is_empty() {
            let freezing_share =
                temp_window.iter().filter(|t| **t <= 0.0).count() as f64 / temp_window.len() as f64;
            model_prob *= (freezing_share * 1.3).clamp(0.15, 1.0);
        }
        boost = SNOW_BOOST;
    }

    let confidence = calc_confidence(model_prob, precip_window.len(), boost);
    let market_type = if target.is_snow { "snow proxy" } else { "precip proxy" };
    ProbabilityEstimate {
        model_prob,
        confidence,
        rationale: format!(
            "{}: {}, points={}, dates={}, model_prob={:.3}",
            location_label,
            market_type,
            precip_window.len(),
            dates_label(target_dates),
            model_prob
        ),
    }
}
