//! Temperature-threshold probability

use crate::interpret::{CompareOp, TempRule};

/// Probability that the temperature rule resolves YES over the window
///
/// Blends how often the window satisfies the rule (frequency) with how far
/// the window's extreme value clears the threshold (signed margin through a
/// logistic with scale 2). An empty window is a coin flip.
pub fn temperature_probability(temps_c: &[f64], rule: TempRule) -> f64 {
    if temps_c.is_empty() {
        return 0.5;
    }

    let satisfied = temps_c
        .iter()
        .filter(|t| rule.op.satisfied(**t, rule.threshold_c))
        .count();
    let frequency_prob = satisfied as f64 / temps_c.len() as f64;

    let margin = match rule.op {
        CompareOp::AtLeast => {
            let extreme = temps_c.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            extreme - rule.threshold_c
        }
        CompareOp::AtMost => {
            let extreme = temps_c.iter().cloned().fold(f64::INFINITY, f64::min);
            rule.threshold_c - extreme
        }
    };
    let margin_prob = 1.0 / (1.0 + (-margin / 2.0).exp());

    (0.6 * margin_prob + 0.4 * frequency_prob).clamp(0.0, 1.0)
}
