//! Precipitation probability
//!
//! Hourly probabilities arrive as percentages; each is normalized to [0, 1].
//! The blend favors the wettest hour, adds the chance that at least one hour
//! sees rain (hours treated as independent), and a small average term.

/// Probability of rain over the window from hourly percent samples
pub fn precip_probability(precip_probs_pct: &[f64]) -> f64 {
    if precip_probs_pct.is_empty() {
        return 0.5;
    }

    let hourly: Vec<f64> = precip_probs_pct
        .iter()
        .map(|v| (v / 100.0).clamp(0.0, 1.0))
        .collect();

    let none_prob: f64 = hourly.iter().map(|p| 1.0 - p).product();
    let any_prob = 1.0 - none_prob;
    let max_prob = hourly.iter().cloned().fold(0.0, f64::max);
    let avg_prob = hourly.iter().sum::<f64>() / hourly.len() as f64;

    (0.55 * max_prob + 0.35 * any_prob + 0.10 * avg_prob).clamp(0.0, 1.0)
}
