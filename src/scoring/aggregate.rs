use crate::models::config::WeightTable;
use crate::models::profile::ProfileVector;
use crate::models::signal_score::SignalName;

/// `round(100 * Σ weight_i * normalized_i)`, within 0–100.
pub fn overall_score(profile: &ProfileVector, weights: &WeightTable) -> u32 {
    let weighted: f64 = SignalName::ALL
        .into_iter()
        .map(|name| weights.weight(name) * profile.get(name))
        .sum();
    (100.0 * weighted).round().clamp(0.0, 100.0) as u32
}
