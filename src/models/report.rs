use crate::models::profile::ProfileVector;
use crate::models::signal_score::{SignalName, SignalScore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub matched_tier: String,
    /// In [-1, 1].
    pub similarity_score: f64,
    /// Tier name → similarity, for every tier in the catalog.
    pub per_tier: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapEntry {
    pub dimension: SignalName,
    pub repo_value: f64,
    pub tier_target: f64,
    /// `max(0, tier_target - repo_value)`.
    pub deficit: f64,
}

/// Gap entries sorted by descending deficit, ties in dimension order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapReport {
    /// Tier whose centroid the deficits were measured against.
    pub target_tier: String,
    pub entries: Vec<GapEntry>,
}

impl GapReport {
    pub fn total_deficit(&self) -> f64 {
        self.entries.iter().map(|e| e.deficit).sum()
    }

    pub fn deficit(&self, dimension: SignalName) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.dimension == dimension)
            .map(|e| e.deficit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeficitBucket {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapItem {
    pub dimension: SignalName,
    pub deficit: f64,
    pub bucket: DeficitBucket,
    pub suggestion_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub strengths: Vec<SignalName>,
    pub weaknesses: Vec<SignalName>,
    pub text: String,
}

/// Stable output of one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringReport {
    /// 0–100.
    pub overall_score: u32,
    pub matched_tier: String,
    pub similarity: SimilarityResult,
    /// Matched similarity × 100, one decimal.
    pub similarity_percent: f64,
    pub profile: ProfileVector,
    /// One per dimension, in dimension order, with raw and normalized values.
    pub signals: Vec<SignalScore>,
    pub gaps: GapReport,
    pub roadmap: Vec<RoadmapItem>,
    pub summary: ReportSummary,
}
