use super::SignalExtractor;
use crate::error::{MaturityError, Result};
use crate::models::config::StructureConfig;
use crate::models::signal_score::{saturate, SignalName, SignalScore};
use crate::models::snapshot::{invalid_path_reason, RepositorySnapshot};

/// Directory names that separate concerns by domain or role.
const RECOGNIZED_DIRS: &[&str] = &[
    "src", "source", "lib", "app", "tests", "test", "spec", "docs", "doc", "config", "models",
    "controllers", "services", "api", "database", "db", "migrations", "auth", "ui",
    "components", "views", "routes", "handlers", "domain", "scripts", "benches", "examples",
];

/// Catch-all buckets that usually mean nobody decided where code belongs.
const CARGO_CULT_DIRS: &[&str] = &[
    "utils", "util", "helpers", "helper", "misc", "common", "stuff", "constants", "functions",
];

pub struct StructureExtractor {
    config: StructureConfig,
}

impl StructureExtractor {
    pub fn new(config: StructureConfig) -> Self {
        Self { config }
    }
}

impl SignalExtractor for StructureExtractor {
    fn signal(&self) -> SignalName {
        SignalName::Structure
    }

    fn extract(&self, snapshot: &RepositorySnapshot) -> Result<SignalScore> {
        if let Some(reason) = snapshot.files.iter().find_map(|p| invalid_path_reason(p)) {
            return Err(MaturityError::malformed(SignalName::Structure, reason));
        }

        let dirs = snapshot.directory_names();
        if dirs.is_empty() {
            return Ok(SignalScore::new(SignalName::Structure, 0.0, 0.0).with_detail("Flat structure"));
        }

        let recognized: Vec<&String> = dirs
            .iter()
            .filter(|d| RECOGNIZED_DIRS.contains(&d.as_str()))
            .collect();
        let cargo_cult: Vec<&String> = dirs
            .iter()
            .filter(|d| CARGO_CULT_DIRS.contains(&d.as_str()))
            .collect();

        let effective = recognized.len() as f64
            - self.config.cargo_cult_penalty * cargo_cult.len() as f64;
        let normalized = saturate(effective, self.config.saturation);

        let mut score = SignalScore::new(SignalName::Structure, recognized.len() as f64, normalized)
            .with_detail(format!(
                "{} recognized of {} directories",
                recognized.len(),
                dirs.len()
            ));
        if !recognized.is_empty() {
            score = score.with_detail(format!("Recognized: {}", join_first(&recognized, 5)));
        }
        if !cargo_cult.is_empty() {
            score = score.with_detail(format!("Catch-all: {}", join_first(&cargo_cult, 5)));
        }
        Ok(score)
    }
}

fn join_first(names: &[&String], limit: usize) -> String {
    names
        .iter()
        .take(limit)
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(files: &[&str]) -> RepositorySnapshot {
        RepositorySnapshot {
            files: files.iter().map(|f| f.to_string()).collect(),
            ..Default::default()
        }
    }

    fn extract(files: &[&str]) -> Result<SignalScore> {
        StructureExtractor::new(StructureConfig::default()).extract(&snapshot(files))
    }

    #[test]
    fn flat_layout_scores_zero() {
        let score = extract(&["main.py", "README.md", "setup.py"]).unwrap();
        assert_eq!(score.normalized, 0.0);
        assert_eq!(score.raw_value, 0.0);
    }

    #[test]
    fn layered_layout_saturates() {
        let score = extract(&[
            "src/models/user.py",
            "src/services/billing.py",
            "tests/test_user.py",
            "docs/index.md",
        ])
        .unwrap();
        // src, models, services, tests, docs
        assert_eq!(score.raw_value, 5.0);
        assert_eq!(score.normalized, 1.0);
    }

    #[test]
    fn catch_all_directories_cost_half_a_match() {
        let score = extract(&["src/utils/a.py", "src/helpers/b.py"]).unwrap();
        // 1 recognized - 2 * 0.5 = 0
        assert_eq!(score.normalized, 0.0);

        let score = extract(&["src/a.py", "tests/b.py", "utils/c.py"]).unwrap();
        assert!((score.normalized - 1.5 / 4.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_directories_do_not_count() {
        let score = extract(&["foo/a.rs", "bar/b.rs"]).unwrap();
        assert_eq!(score.normalized, 0.0);
    }

    #[test]
    fn traversal_path_is_malformed() {
        assert!(matches!(
            extract(&["src/../../etc/passwd"]),
            Err(MaturityError::MalformedInput {
                signal: SignalName::Structure,
                ..
            })
        ));
    }
}
