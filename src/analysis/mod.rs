pub mod commits;
pub mod dependencies;
pub mod readme;
pub mod structure;
pub mod test_strategy;

use crate::error::{MaturityError, Result};
use crate::models::config::NormalizationConfig;
use crate::models::signal_score::{SignalName, SignalScore};
use crate::models::snapshot::RepositorySnapshot;

/// One heuristic: snapshot in, score for exactly one dimension out.
pub trait SignalExtractor: Send + Sync {
    fn signal(&self) -> SignalName;

    /// Must succeed for any well-formed snapshot, including an empty one.
    /// Errors only with `MalformedInput`.
    fn extract(&self, snapshot: &RepositorySnapshot) -> Result<SignalScore>;
}

/// The five built-in extractors in dimension order.
pub fn default_extractors(config: &NormalizationConfig) -> Vec<Box<dyn SignalExtractor>> {
    vec![
        Box::new(structure::StructureExtractor::new(config.structure.clone())),
        Box::new(readme::ReadmeExtractor::new(config.readme.clone())),
        Box::new(test_strategy::TestStrategyExtractor::new(config.tests.clone())),
        Box::new(commits::CommitNarrativeExtractor::new(config.commits.clone())),
        Box::new(dependencies::DependencyHealthExtractor::new(
            config.dependencies.clone(),
        )),
    ]
}

/// Runs every extractor. A malformed signal degrades to the neutral value
/// instead of failing the run; any other error propagates.
pub fn extract_signals(
    extractors: &[Box<dyn SignalExtractor>],
    snapshot: &RepositorySnapshot,
) -> Result<Vec<SignalScore>> {
    let mut scores = Vec::with_capacity(extractors.len());

    for extractor in extractors {
        match extractor.extract(snapshot) {
            Ok(score) => {
                log::debug!(
                    "signal {} raw={} normalized={:.3}",
                    score.name,
                    score.raw_value,
                    score.normalized
                );
                scores.push(score);
            }
            Err(MaturityError::MalformedInput { signal, reason }) => {
                log::warn!("signal {signal} degraded to neutral: {reason}");
                scores.push(SignalScore::neutral(
                    signal,
                    format!("degraded to neutral: {reason}"),
                ));
            }
            Err(err) => return Err(err),
        }
    }

    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl SignalExtractor for Broken {
        fn signal(&self) -> SignalName {
            SignalName::Dependencies
        }

        fn extract(&self, _snapshot: &RepositorySnapshot) -> Result<SignalScore> {
            Err(MaturityError::malformed(SignalName::Dependencies, "corrupt manifest"))
        }
    }

    #[test]
    fn default_extractors_cover_every_dimension_in_order() {
        let extractors = default_extractors(&NormalizationConfig::default());
        let names: Vec<SignalName> = extractors.iter().map(|e| e.signal()).collect();
        assert_eq!(names, SignalName::ALL.to_vec());
    }

    #[test]
    fn empty_snapshot_scores_zero_everywhere() {
        let extractors = default_extractors(&NormalizationConfig::default());
        let scores = extract_signals(&extractors, &RepositorySnapshot::default()).unwrap();

        assert_eq!(scores.len(), 5);
        for score in scores {
            assert_eq!(score.normalized, 0.0, "{} should be zero", score.name);
            assert!(!score.degraded);
        }
    }

    #[test]
    fn malformed_signal_degrades_to_neutral() {
        let extractors: Vec<Box<dyn SignalExtractor>> = vec![Box::new(Broken)];
        let scores = extract_signals(&extractors, &RepositorySnapshot::default()).unwrap();

        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].normalized, 0.5);
        assert!(scores[0].degraded);
        assert!(scores[0].details[0].contains("corrupt manifest"));
    }
}
