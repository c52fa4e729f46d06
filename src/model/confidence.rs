//! Confidence scoring
//!
//! Rewards estimates far from a coin flip (dispersion) and larger sample
//! windows up to one day of hourly samples (coverage), scaled by a per-path
//! boost and clamped to [0.05, 0.98].

/// Compute a confidence score for a probability over `sample_count` samples
pub fn calc_confidence(prob: f64, sample_count: usize, boost: f64) -> f64 {
    let dispersion = (prob - 0.5).abs() * 2.0;
    let coverage = (sample_count as f64 / 24.0).min(1.0);
    ((0.35 + 0.45 * dispersion + 0.2 * coverage) * boost).clamp(0.05, 0.98)
}
