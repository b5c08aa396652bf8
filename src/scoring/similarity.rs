use crate::models::profile::ProfileVector;
use crate::models::report::SimilarityResult;
use crate::models::tier::TierProfile;
use crate::scoring::catalog::TierCatalog;
use std::collections::BTreeMap;

/// `(a·b) / sqrt(|a|²|b|²)`, clamped to [-1, 1]. Zero when either side is the
/// zero vector. Exactly symmetric, and exactly 1.0 for `a == b`.
pub fn cosine_similarity(a: &ProfileVector, b: &ProfileVector) -> f64 {
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }
    let denominator = (a.norm_squared() * b.norm_squared()).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denominator).clamp(-1.0, 1.0)
}

/// Compares `profile` with every tier. The highest similarity wins; exact ties
/// go to the higher-ranked tier.
pub fn match_tier(profile: &ProfileVector, catalog: &TierCatalog) -> SimilarityResult {
    let mut per_tier = BTreeMap::new();
    let mut best: Option<(&TierProfile, f64)> = None;

    for tier in catalog.tiers() {
        let similarity = cosine_similarity(profile, &tier.centroid);
        per_tier.insert(tier.name.clone(), similarity);

        let better = match best {
            None => true,
            Some((leader, leader_similarity)) => {
                similarity > leader_similarity
                    || (similarity == leader_similarity && tier.rank > leader.rank)
            }
        };
        if better {
            best = Some((tier, similarity));
        }
    }

    let (matched_tier, similarity_score) = best
        .map(|(tier, similarity)| (tier.name.clone(), similarity))
        .unwrap_or_default();

    log::debug!("matched tier {matched_tier} with similarity {similarity_score:.4}");

    SimilarityResult {
        matched_tier,
        similarity_score,
        per_tier,
    }
}
