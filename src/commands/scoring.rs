use crate::analysis::{default_extractors, extract_signals, SignalExtractor};
use crate::error::Result;
use crate::models::config::GapTarget;
use crate::models::profile::{build_profile_vector, ProfileVector};
use crate::models::report::{ReportSummary, ScoringReport};
use crate::models::signal_score::{SignalName, SignalScore};
use crate::models::snapshot::RepositorySnapshot;
use crate::scoring::aggregate::overall_score;
use crate::scoring::gaps::analyze_gaps;
use crate::scoring::roadmap::generate_roadmap;
use crate::scoring::similarity::match_tier;
use crate::scoring::ScoringConfig;
use rayon::prelude::*;

/// Scores one snapshot with the built-in extractors.
pub fn score_snapshot(snapshot: &RepositorySnapshot, config: &ScoringConfig) -> Result<ScoringReport> {
    let extractors = default_extractors(config.normalization());
    score_with_extractors(snapshot, config, &extractors)
}

/// Scores one snapshot with a caller-supplied extractor set. Fails with
/// `IncompleteProfile` when the set does not cover every dimension.
pub fn score_with_extractors(
    snapshot: &RepositorySnapshot,
    config: &ScoringConfig,
    extractors: &[Box<dyn SignalExtractor>],
) -> Result<ScoringReport> {
    let mut signals = extract_signals(extractors, snapshot)?;
    let profile = build_profile_vector(&signals)?;
    signals.sort_by_key(|s| s.name);

    let similarity = match_tier(&profile, config.catalog());
    let matched = config.catalog().get(&similarity.matched_tier)?;
    let target = match config.gap_target() {
        GapTarget::Matched => matched,
        GapTarget::Next => config.catalog().next_above(&matched.name)?,
    };

    let gaps = analyze_gaps(&profile, target);
    let roadmap = generate_roadmap(&gaps, config.roadmap());
    let overall = overall_score(&profile, config.weights());

    log::debug!(
        "scored snapshot: overall={overall} tier={} gaps_against={}",
        similarity.matched_tier,
        gaps.target_tier
    );

    Ok(ScoringReport {
        overall_score: overall,
        matched_tier: similarity.matched_tier.clone(),
        similarity_percent: (similarity.similarity_score * 1000.0).round() / 10.0,
        similarity,
        summary: summarize(&profile),
        profile,
        signals,
        gaps,
        roadmap,
    })
}

/// Scores independent snapshots in parallel against one shared configuration.
/// Results keep input order.
pub fn score_batch(
    snapshots: &[RepositorySnapshot],
    config: &ScoringConfig,
) -> Vec<Result<ScoringReport>> {
    snapshots
        .par_iter()
        .map(|snapshot| score_snapshot(snapshot, config))
        .collect()
}

/// Two strongest and two weakest dimensions; ties fall back to dimension order.
fn summarize(profile: &ProfileVector) -> ReportSummary {
    let mut ranked: Vec<SignalName> = SignalName::ALL.to_vec();

    ranked.sort_by(|a, b| profile.get(*b).total_cmp(&profile.get(*a)));
    let strengths: Vec<SignalName> = ranked.iter().take(2).copied().collect();

    ranked.sort_by(|a, b| profile.get(*a).total_cmp(&profile.get(*b)));
    let weaknesses: Vec<SignalName> = ranked.iter().take(2).copied().collect();

    let text = format!(
        "Strong in {}. Needs improvement in {}.",
        display_names(&strengths),
        display_names(&weaknesses)
    );

    ReportSummary {
        strengths,
        weaknesses,
        text,
    }
}

fn display_names(dims: &[SignalName]) -> String {
    dims.iter()
        .map(|d| d.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Signal lookup by dimension on a finished report.
pub fn signal<'a>(report: &'a ScoringReport, name: SignalName) -> Option<&'a SignalScore> {
    report.signals.iter().find(|s| s.name == name)
}
