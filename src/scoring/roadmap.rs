use crate::models::config::RoadmapConfig;
use crate::models::report::{DeficitBucket, GapReport, RoadmapItem};
use crate::models::signal_score::SignalName;

pub fn bucket_for(deficit: f64, config: &RoadmapConfig) -> DeficitBucket {
    if deficit < config.small_below {
        DeficitBucket::Small
    } else if deficit < config.medium_below {
        DeficitBucket::Medium
    } else {
        DeficitBucket::Large
    }
}

/// Fixed suggestion per dimension and bucket.
pub fn suggestion(dimension: SignalName, bucket: DeficitBucket) -> &'static str {
    use DeficitBucket::*;
    use SignalName::*;

    match (dimension, bucket) {
        (Structure, Small) => "Tidy the layout: fold stray utils/helpers code into the modules that use it",
        (Structure, Medium) => "Separate concerns into semantic folders such as src/, tests/, docs/ and config/",
        (Structure, Large) => "HIGH PRIORITY: Reorganize the flat layout into semantic folders (src/, tests/, docs/, config/) instead of utils/helpers",
        (Readme, Small) => "Round out the README with an architecture or contributing section",
        (Readme, Medium) => "Expand the README: add Setup and Usage sections with runnable code examples",
        (Readme, Large) => "HIGH PRIORITY: Write a comprehensive README covering Overview, Setup, Usage and Architecture with code examples",
        (Tests, Small) => "Broaden the suite with the missing test category (integration or end-to-end)",
        (Tests, Medium) => "Raise test coverage: add unit tests for core logic and integration tests for public APIs",
        (Tests, Large) => "HIGH PRIORITY: Implement a test strategy: unit tests for core logic, integration tests for APIs, coverage tracking",
        (Commits, Small) => "Keep commit subjects consistent with the feat:/fix:/docs: convention",
        (Commits, Medium) => "Adopt conventional commits (feat:, fix:, docs:) and commit in smaller, regular steps",
        (Commits, Large) => "HIGH PRIORITY: Use conventional commits with descriptive messages and commit on a regular cadence",
        (Dependencies, Small) => "Pin the remaining open-ended dependency versions",
        (Dependencies, Medium) => "Commit a lock file and replace wildcard or range versions with exact pins",
        (Dependencies, Large) => "HIGH PRIORITY: Add a lock file (Cargo.lock, package-lock.json, poetry.lock) and pin dependency versions",
    }
}

/// One item per non-zero gap, largest first, at most `top_n`.
pub fn generate_roadmap(gaps: &GapReport, config: &RoadmapConfig) -> Vec<RoadmapItem> {
    gaps.entries
        .iter()
        .filter(|entry| entry.deficit > 0.0)
        .take(config.top_n)
        .map(|entry| {
            let bucket = bucket_for(entry.deficit, config);
            RoadmapItem {
                dimension: entry.dimension,
                deficit: entry.deficit,
                bucket,
                suggestion_text: suggestion(entry.dimension, bucket).to_string(),
            }
        })
        .collect()
}
