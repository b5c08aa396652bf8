use super::SignalExtractor;
use crate::error::{MaturityError, Result};
use crate::models::config::CommitsConfig;
use crate::models::signal_score::{SignalName, SignalScore};
use crate::models::snapshot::{CommitRecord, RepositorySnapshot};
use chrono::DateTime;

const CONVENTIONAL_TYPES: &[&str] = &[
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "build", "ci", "chore", "revert",
];

/// `type(scope)!: description` with a known type. Scope and `!` are optional.
pub fn is_conventional(message: &str) -> bool {
    let subject = message.lines().next().unwrap_or("").trim();
    let Some((head, description)) = subject.split_once(':') else {
        return false;
    };
    if description.trim().is_empty() || !description.starts_with(' ') {
        return false;
    }

    let head = head.strip_suffix('!').unwrap_or(head);
    let kind = match head.split_once('(') {
        Some((kind, scope)) => {
            let Some(scope) = scope.strip_suffix(')') else {
                return false;
            };
            if scope.is_empty() || scope.contains(['(', ')']) {
                return false;
            }
            kind
        }
        None => head,
    };

    let kind = kind.to_lowercase();
    CONVENTIONAL_TYPES.contains(&kind.as_str())
}

/// `1 - min(cv / cv_ceiling, 1)` over inter-commit intervals; 0 with fewer
/// than two intervals or when every commit shares a timestamp.
pub fn cadence_regularity(timestamps: &[i64], cv_ceiling: f64) -> f64 {
    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable();
    let intervals: Vec<f64> = sorted.windows(2).map(|w| (w[1] - w[0]) as f64).collect();
    if intervals.len() < 2 {
        return 0.0;
    }

    let mean = intervals.iter().sum::<f64>() / intervals.len() as f64;
    if mean <= 0.0 {
        return 0.0;
    }
    let variance = intervals.iter().map(|i| (i - mean).powi(2)).sum::<f64>() / intervals.len() as f64;
    let cv = variance.sqrt() / mean;

    1.0 - (cv / cv_ceiling).min(1.0)
}

fn history_span(timestamps: &[i64]) -> Option<String> {
    let first = DateTime::from_timestamp(*timestamps.iter().min()?, 0)?;
    let last = DateTime::from_timestamp(*timestamps.iter().max()?, 0)?;
    Some(format!(
        "History: {} to {}",
        first.format("%Y-%m-%d"),
        last.format("%Y-%m-%d")
    ))
}

pub struct CommitNarrativeExtractor {
    config: CommitsConfig,
}

impl CommitNarrativeExtractor {
    pub fn new(config: CommitsConfig) -> Self {
        Self { config }
    }

    /// Most recent commits first, capped to the configured window.
    fn window<'a>(&self, commits: &'a [CommitRecord]) -> Vec<&'a CommitRecord> {
        let mut recent: Vec<&CommitRecord> = commits.iter().collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(self.config.window);
        recent
    }
}

impl SignalExtractor for CommitNarrativeExtractor {
    fn signal(&self) -> SignalName {
        SignalName::Commits
    }

    fn extract(&self, snapshot: &RepositorySnapshot) -> Result<SignalScore> {
        if let Some(bad) = snapshot.commits.iter().find(|c| c.timestamp < 0) {
            return Err(MaturityError::malformed(
                SignalName::Commits,
                format!("negative commit timestamp {}", bad.timestamp),
            ));
        }
        if snapshot.commits.is_empty() {
            return Ok(SignalScore::new(SignalName::Commits, 0.0, 0.0).with_detail("No commits"));
        }

        let recent = self.window(&snapshot.commits);
        let conventional = recent.iter().filter(|c| is_conventional(&c.message)).count();
        let adherence = conventional as f64 / recent.len() as f64;

        let timestamps: Vec<i64> = recent.iter().map(|c| c.timestamp).collect();
        let regularity = cadence_regularity(&timestamps, self.config.cv_ceiling);

        let normalized = (self.config.adherence_weight * adherence
            + self.config.cadence_weight * regularity)
            .clamp(0.0, 1.0);

        let mut score = SignalScore::new(SignalName::Commits, conventional as f64, normalized)
            .with_detail(format!(
                "Conventional: {conventional}/{} recent commits",
                recent.len()
            ))
            .with_detail(format!("Cadence regularity: {regularity:.2}"));
        if let Some(span) = history_span(&timestamps) {
            score = score.with_detail(span);
        }
        Ok(score)
    }
}
