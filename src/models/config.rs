use crate::error::{MaturityError, Result};
use crate::models::signal_score::SignalName;
use serde::{Deserialize, Serialize};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Signal → weight table for the overall score. Non-negative, sums to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WeightTableRepr", into = "WeightTableRepr")]
pub struct WeightTable([f64; 5]);

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct WeightTableRepr {
    structure: f64,
    readme: f64,
    tests: f64,
    commits: f64,
    dependencies: f64,
}

impl WeightTable {
    pub fn new(weights: [f64; 5]) -> Result<Self> {
        for name in SignalName::ALL {
            let weight = weights[name.index()];
            if !weight.is_finite() || weight < 0.0 {
                return Err(MaturityError::config(format!(
                    "weight for {name} must be a non-negative number, got {weight}"
                )));
            }
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(MaturityError::config(format!(
                "weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(Self(weights))
    }

    pub fn weight(&self, name: SignalName) -> f64 {
        self.0[name.index()]
    }

    pub fn values(&self) -> &[f64; 5] {
        &self.0
    }
}

/// Equal weighting across the five signals.
impl Default for WeightTable {
    fn default() -> Self {
        Self([0.20; 5])
    }
}

impl TryFrom<WeightTableRepr> for WeightTable {
    type Error = MaturityError;

    fn try_from(repr: WeightTableRepr) -> Result<Self> {
        WeightTable::new([
            repr.structure,
            repr.readme,
            repr.tests,
            repr.commits,
            repr.dependencies,
        ])
    }
}

impl From<WeightTable> for WeightTableRepr {
    fn from(table: WeightTable) -> Self {
        let [structure, readme, tests, commits, dependencies] = table.0;
        Self {
            structure,
            readme,
            tests,
            commits,
            dependencies,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StructureConfig {
    /// Recognized directories needed for a full score.
    pub saturation: f64,
    /// Fraction of a match subtracted per cargo-cult directory.
    pub cargo_cult_penalty: f64,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            saturation: 4.0,
            cargo_cult_penalty: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReadmeConfig {
    pub section_saturation: f64,
    pub code_block_saturation: f64,
    pub section_weight: f64,
    pub code_block_weight: f64,
    pub topic_weight: f64,
}

impl Default for ReadmeConfig {
    fn default() -> Self {
        Self {
            section_saturation: 8.0,
            code_block_saturation: 3.0,
            section_weight: 0.5,
            code_block_weight: 0.3,
            topic_weight: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestsConfig {
    pub breadth_weight: f64,
    pub ratio_weight: f64,
    /// Test files per source file at which the ratio component saturates.
    pub ratio_saturation: f64,
}

impl Default for TestsConfig {
    fn default() -> Self {
        Self {
            breadth_weight: 0.4,
            ratio_weight: 0.6,
            ratio_saturation: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommitsConfig {
    /// Most recent commits considered.
    pub window: usize,
    pub adherence_weight: f64,
    pub cadence_weight: f64,
    /// Coefficient of variation at which cadence regularity reaches 0.
    pub cv_ceiling: f64,
}

impl Default for CommitsConfig {
    fn default() -> Self {
        Self {
            window: 100,
            adherence_weight: 0.6,
            cadence_weight: 0.4,
            cv_ceiling: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DependenciesConfig {
    pub lockfile_weight: f64,
    pub pinned_weight: f64,
}

impl Default for DependenciesConfig {
    fn default() -> Self {
        Self {
            lockfile_weight: 0.5,
            pinned_weight: 0.5,
        }
    }
}

/// Per-signal saturation constants and inner blend weights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    pub structure: StructureConfig,
    pub readme: ReadmeConfig,
    pub tests: TestsConfig,
    pub commits: CommitsConfig,
    pub dependencies: DependenciesConfig,
}

impl NormalizationConfig {
    pub fn validate(&self) -> Result<()> {
        positive("structure.saturation", self.structure.saturation)?;
        unit_interval("structure.cargoCultPenalty", self.structure.cargo_cult_penalty)?;
        positive("readme.sectionSaturation", self.readme.section_saturation)?;
        positive("readme.codeBlockSaturation", self.readme.code_block_saturation)?;
        blend(
            "readme",
            &[
                self.readme.section_weight,
                self.readme.code_block_weight,
                self.readme.topic_weight,
            ],
        )?;
        positive("tests.ratioSaturation", self.tests.ratio_saturation)?;
        blend("tests", &[self.tests.breadth_weight, self.tests.ratio_weight])?;
        if self.commits.window == 0 {
            return Err(MaturityError::config("commits.window must be at least 1"));
        }
        positive("commits.cvCeiling", self.commits.cv_ceiling)?;
        blend(
            "commits",
            &[self.commits.adherence_weight, self.commits.cadence_weight],
        )?;
        blend(
            "dependencies",
            &[
                self.dependencies.lockfile_weight,
                self.dependencies.pinned_weight,
            ],
        )?;
        Ok(())
    }
}

fn positive(key: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MaturityError::config(format!(
            "normalization.{key} must be positive, got {value}"
        )))
    }
}

fn unit_interval(key: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MaturityError::config(format!(
            "normalization.{key} must lie in [0, 1], got {value}"
        )))
    }
}

/// Inner blend weights keep each signal inside [0, 1].
fn blend(signal: &str, weights: &[f64]) -> Result<()> {
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(MaturityError::config(format!(
            "normalization.{signal} weights must be non-negative"
        )));
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(MaturityError::config(format!(
            "normalization.{signal} weights must sum to 1.0, got {sum}"
        )));
    }
    Ok(())
}

/// Which centroid deficits are measured against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapTarget {
    #[default]
    Matched,
    /// Next tier up by rank; the top tier targets itself.
    Next,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoadmapConfig {
    pub top_n: usize,
    /// Deficits below this are `small`.
    pub small_below: f64,
    /// Deficits below this (and not small) are `medium`; the rest are `large`.
    pub medium_below: f64,
}

impl Default for RoadmapConfig {
    fn default() -> Self {
        Self {
            top_n: 3,
            small_below: 0.15,
            medium_below: 0.35,
        }
    }
}

impl RoadmapConfig {
    pub fn validate(&self) -> Result<()> {
        let ordered = self.small_below.is_finite()
            && self.medium_below.is_finite()
            && 0.0 < self.small_below
            && self.small_below < self.medium_below
            && self.medium_below <= 1.0;
        if !ordered {
            return Err(MaturityError::config(format!(
                "roadmap buckets must satisfy 0 < small ({}) < medium ({}) <= 1",
                self.small_below, self.medium_below
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let sum: f64 = WeightTable::default().values().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        assert!(matches!(
            WeightTable::new([0.3, 0.3, 0.3, 0.3, 0.3]),
            Err(MaturityError::Configuration(_))
        ));
        assert!(WeightTable::new([1.2, -0.2, 0.0, 0.0, 0.0]).is_err());
        assert!(WeightTable::new([0.3, 0.25, 0.2, 0.15, 0.1]).is_ok());
    }

    #[test]
    fn defaults_validate() {
        NormalizationConfig::default().validate().unwrap();
        RoadmapConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_non_positive_saturation() {
        let mut config = NormalizationConfig::default();
        config.readme.section_saturation = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unordered_buckets() {
        let config = RoadmapConfig {
            top_n: 3,
            small_below: 0.4,
            medium_below: 0.2,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_normalization_json_keeps_defaults() {
        let config: NormalizationConfig =
            serde_json::from_str(r#"{ "readme": { "sectionSaturation": 5 } }"#).unwrap();
        assert_eq!(config.readme.section_saturation, 5.0);
        assert_eq!(config.readme.code_block_saturation, 3.0);
        assert_eq!(config.tests, TestsConfig::default());
    }
}
