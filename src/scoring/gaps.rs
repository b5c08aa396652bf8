use crate::models::profile::ProfileVector;
use crate::models::report::{GapEntry, GapReport};
use crate::models::signal_score::SignalName;
use crate::models::tier::TierProfile;

/// Per-dimension shortfall against `target`, largest first. Dimensions where the
/// repository already meets the target contribute a zero deficit.
pub fn analyze_gaps(profile: &ProfileVector, target: &TierProfile) -> GapReport {
    let mut entries: Vec<GapEntry> = SignalName::ALL
        .into_iter()
        .map(|dimension| {
            let repo_value = profile.get(dimension);
            let tier_target = target.centroid.get(dimension);
            GapEntry {
                dimension,
                repo_value,
                tier_target,
                deficit: (tier_target - repo_value).max(0.0),
            }
        })
        .collect();

    // Stable sort keeps dimension order among equal deficits.
    entries.sort_by(|a, b| b.deficit.total_cmp(&a.deficit));

    GapReport {
        target_tier: target.name.clone(),
        entries,
    }
}
