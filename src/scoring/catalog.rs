use crate::error::{MaturityError, Result};
use crate::models::tier::{default_tiers, TierProfile};

/// Immutable set of reference tiers, ordered by ascending rank.
#[derive(Debug, Clone, PartialEq)]
pub struct TierCatalog {
    tiers: Vec<TierProfile>,
}

impl TierCatalog {
    pub fn new(mut tiers: Vec<TierProfile>) -> Result<Self> {
        if tiers.is_empty() {
            return Err(MaturityError::config("tier catalog is empty"));
        }

        for (i, tier) in tiers.iter().enumerate() {
            if tier.name.trim().is_empty() {
                return Err(MaturityError::config("tier name must not be empty"));
            }
            let duplicate = tiers[..i]
                .iter()
                .find(|other| other.name.eq_ignore_ascii_case(&tier.name) || other.rank == tier.rank);
            if let Some(other) = duplicate {
                return Err(MaturityError::config(format!(
                    "tiers `{}` and `{}` collide on name or rank",
                    other.name, tier.name
                )));
            }
        }

        tiers.sort_by_key(|t| t.rank);
        Ok(Self { tiers })
    }

    /// Beginner / Intermediate / Advanced.
    pub fn builtin() -> Self {
        let mut tiers = default_tiers();
        tiers.sort_by_key(|t| t.rank);
        Self { tiers }
    }

    pub fn tiers(&self) -> &[TierProfile] {
        &self.tiers
    }

    /// Case-insensitive.
    pub fn get(&self, name: &str) -> Result<&TierProfile> {
        self.tiers
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| MaturityError::UnknownTier(name.to_string()))
    }

    /// Next tier up by rank, or the tier itself when it is the highest.
    pub fn next_above(&self, name: &str) -> Result<&TierProfile> {
        let current = self.get(name)?;
        Ok(self
            .tiers
            .iter()
            .find(|t| t.rank > current.rank)
            .unwrap_or(current))
    }
}

impl Default for TierCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
