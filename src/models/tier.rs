use crate::models::profile::ProfileVector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierProfile {
    pub name: String,
    /// Higher rank means more advanced. Breaks similarity ties.
    pub rank: u32,
    pub centroid: ProfileVector,
    #[serde(default)]
    pub label: Option<String>,
}

impl TierProfile {
    pub fn new(name: impl Into<String>, rank: u32, centroid: ProfileVector) -> Self {
        Self {
            name: name.into(),
            rank,
            centroid,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Built-in Beginner / Intermediate / Advanced reference profiles.
pub fn default_tiers() -> Vec<TierProfile> {
    vec![
        TierProfile::new("Beginner", 0, ProfileVector::from_trusted([0.25, 0.15, 0.0, 0.20, 0.10]))
            .with_label("Learning the basics: flat layout, thin docs, few tests"),
        TierProfile::new("Intermediate", 1, ProfileVector::from_trusted([0.70, 0.60, 0.50, 0.60, 0.60]))
            .with_label("Organized project with working docs and a test suite"),
        TierProfile::new("Advanced", 2, ProfileVector::from_trusted([0.90, 0.90, 0.90, 0.80, 0.90]))
            .with_label("Production-grade structure, documentation and process"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tiers_are_labelled_and_ranked() {
        let tiers = default_tiers();
        let ranks: Vec<u32> = tiers.iter().map(|t| t.rank).collect();
        assert_eq!(ranks, vec![0, 1, 2]);
        assert!(tiers.iter().all(|t| t.label.is_some()));
    }

    #[test]
    fn label_is_optional_in_settings() {
        let tier: TierProfile = serde_json::from_str(
            r#"{ "name": "Hobby", "rank": 0,
                 "centroid": { "structure": 0.1, "readme": 0.1, "tests": 0.0, "commits": 0.1, "dependencies": 0.0 } }"#,
        )
        .unwrap();
        assert_eq!(tier.label, None);
        assert_eq!(tier.clone().with_label("Side project").label.as_deref(), Some("Side project"));
    }
}
