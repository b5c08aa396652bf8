use super::SignalExtractor;
use crate::error::{MaturityError, Result};
use crate::models::config::TestsConfig;
use crate::models::signal_score::{saturate, SignalName, SignalScore};
use crate::models::snapshot::{invalid_path_reason, RepositorySnapshot};
use glob::Pattern;

const SOURCE_EXTENSIONS: &[&str] = &[
    "rs", "py", "js", "jsx", "ts", "tsx", "mjs", "go", "java", "kt", "rb", "php", "c", "cc",
    "cpp", "h", "hpp", "cs", "swift", "scala", "ex", "exs",
];

const TEST_DIRS: &[&str] = &["test", "tests", "__tests__", "spec", "specs", "e2e", "integration"];

/// Matched against the lowercased file name.
const TEST_FILE_GLOBS: &[&str] = &["*_test.*", "test_*.*", "*.test.*", "*.spec.*", "*_spec.*", "*test.java", "*tests.cs"];

const E2E_MARKERS: &[&str] = &["e2e", "end-to-end", "end_to_end", "cypress", "playwright"];

const COVERAGE_MARKERS: &[&str] = &[
    ".coveragerc", "codecov.yml", ".nycrc", "jest.config", "vitest.config", "pytest.ini",
    "tarpaulin.toml", "lcov.info",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestCategory {
    Unit,
    Integration,
    EndToEnd,
}

pub struct TestStrategyExtractor {
    config: TestsConfig,
    file_patterns: Vec<Pattern>,
}

impl TestStrategyExtractor {
    pub fn new(config: TestsConfig) -> Self {
        let file_patterns = TEST_FILE_GLOBS
            .iter()
            .filter_map(|g| Pattern::new(g).ok())
            .collect();
        Self {
            config,
            file_patterns,
        }
    }

    /// `None` for files that are not tests.
    pub fn classify(&self, path: &str) -> Option<TestCategory> {
        let lower = path.to_lowercase();
        let parts: Vec<&str> = lower.split('/').collect();
        let (file_name, dirs) = parts.split_last()?;

        if !has_source_extension(file_name) {
            return None;
        }

        let in_test_dir = dirs.iter().any(|d| TEST_DIRS.contains(d));
        let named_as_test = self.file_patterns.iter().any(|p| p.matches(file_name));
        if !in_test_dir && !named_as_test {
            return None;
        }

        if E2E_MARKERS.iter().any(|m| lower.contains(m)) {
            Some(TestCategory::EndToEnd)
        } else if lower.contains("integration") || dirs.contains(&"it") {
            Some(TestCategory::Integration)
        } else {
            Some(TestCategory::Unit)
        }
    }
}

fn has_source_extension(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| SOURCE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

impl SignalExtractor for TestStrategyExtractor {
    fn signal(&self) -> SignalName {
        SignalName::Tests
    }

    fn extract(&self, snapshot: &RepositorySnapshot) -> Result<SignalScore> {
        if let Some(reason) = snapshot.files.iter().find_map(|p| invalid_path_reason(p)) {
            return Err(MaturityError::malformed(SignalName::Tests, reason));
        }

        let mut test_files = 0usize;
        let mut source_files = 0usize;
        let mut categories: Vec<TestCategory> = Vec::new();

        for path in &snapshot.files {
            match self.classify(path) {
                Some(category) => {
                    test_files += 1;
                    if !categories.contains(&category) {
                        categories.push(category);
                    }
                }
                None => {
                    let file_name = path.rsplit('/').next().unwrap_or(path).to_lowercase();
                    if has_source_extension(&file_name) {
                        source_files += 1;
                    }
                }
            }
        }

        if test_files == 0 {
            return Ok(SignalScore::new(SignalName::Tests, 0.0, 0.0).with_detail("No tests found"));
        }

        let breadth = categories.len() as f64 / 3.0;
        let ratio = if source_files == 0 {
            1.0
        } else {
            saturate(
                test_files as f64 / source_files as f64,
                self.config.ratio_saturation,
            )
        };
        let normalized = (self.config.breadth_weight * breadth + self.config.ratio_weight * ratio)
            .clamp(0.0, 1.0);

        let mut score = SignalScore::new(SignalName::Tests, test_files as f64, normalized)
            .with_detail(format!(
                "{test_files} test files for {source_files} source files"
            ))
            .with_detail(format!("Categories: {}", describe(&categories)));

        let has_coverage_config = snapshot.files.iter().any(|p| {
            let lower = p.to_lowercase();
            COVERAGE_MARKERS.iter().any(|m| lower.contains(m))
        });
        if has_coverage_config {
            score = score.with_detail("Coverage configuration present");
        }
        Ok(score)
    }
}

fn describe(categories: &[TestCategory]) -> String {
    let mut names = Vec::new();
    for (category, name) in [
        (TestCategory::Unit, "unit"),
        (TestCategory::Integration, "integration"),
        (TestCategory::EndToEnd, "e2e"),
    ] {
        if categories.contains(&category) {
            names.push(name);
        }
    }
    names.join(", ")
}
