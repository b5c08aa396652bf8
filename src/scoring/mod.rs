pub mod aggregate;
pub mod catalog;
pub mod gaps;
pub mod roadmap;
pub mod similarity;

use crate::error::Result;
use crate::models::config::{GapTarget, NormalizationConfig, RoadmapConfig, WeightTable};
use catalog::TierCatalog;

/// Everything a scoring run reads. Built once, validated, then shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    catalog: TierCatalog,
    weights: WeightTable,
    normalization: NormalizationConfig,
    roadmap: RoadmapConfig,
    gap_target: GapTarget,
}

impl ScoringConfig {
    pub fn new(
        catalog: TierCatalog,
        weights: WeightTable,
        normalization: NormalizationConfig,
        roadmap: RoadmapConfig,
        gap_target: GapTarget,
    ) -> Result<Self> {
        normalization.validate()?;
        roadmap.validate()?;
        Ok(Self {
            catalog,
            weights,
            normalization,
            roadmap,
            gap_target,
        })
    }

    pub fn catalog(&self) -> &TierCatalog {
        &self.catalog
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn normalization(&self) -> &NormalizationConfig {
        &self.normalization
    }

    pub fn roadmap(&self) -> &RoadmapConfig {
        &self.roadmap
    }

    pub fn gap_target(&self) -> GapTarget {
        self.gap_target
    }

    /// Same configuration with a different roadmap length.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.roadmap.top_n = top_n;
        self
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            catalog: TierCatalog::builtin(),
            weights: WeightTable::default(),
            normalization: NormalizationConfig::default(),
            roadmap: RoadmapConfig::default(),
            gap_target: GapTarget::default(),
        }
    }
}
