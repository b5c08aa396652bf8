use crate::error::{MaturityError, Result};
use crate::models::signal_score::{SignalName, SignalScore};
use serde::{Deserialize, Serialize};

/// Normalized signal values in `SignalName::ALL` order. Every component is in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileVectorRepr", into = "ProfileVectorRepr")]
pub struct ProfileVector([f64; 5]);

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ProfileVectorRepr {
    structure: f64,
    readme: f64,
    tests: f64,
    commits: f64,
    dependencies: f64,
}

impl ProfileVector {
    pub const ZERO: ProfileVector = ProfileVector([0.0; 5]);

    pub fn new(values: [f64; 5]) -> Result<Self> {
        for name in SignalName::ALL {
            let value = values[name.index()];
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(MaturityError::InvalidSignal { signal: name, value });
            }
        }
        Ok(Self(values))
    }

    /// For built-in constants already known to lie in [0, 1].
    pub(crate) const fn from_trusted(values: [f64; 5]) -> Self {
        Self(values)
    }

    pub fn get(&self, name: SignalName) -> f64 {
        self.0[name.index()]
    }

    pub fn values(&self) -> &[f64; 5] {
        &self.0
    }

    pub fn dot(&self, other: &ProfileVector) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    pub fn norm_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }
}

impl TryFrom<ProfileVectorRepr> for ProfileVector {
    type Error = MaturityError;

    fn try_from(repr: ProfileVectorRepr) -> Result<Self> {
        ProfileVector::new([
            repr.structure,
            repr.readme,
            repr.tests,
            repr.commits,
            repr.dependencies,
        ])
    }
}

impl From<ProfileVector> for ProfileVectorRepr {
    fn from(vector: ProfileVector) -> Self {
        let [structure, readme, tests, commits, dependencies] = vector.0;
        Self {
            structure,
            readme,
            tests,
            commits,
            dependencies,
        }
    }
}

/// Assembles one score per dimension into a vector. Input order does not matter;
/// values are taken as-is, never renormalized.
pub fn build_profile_vector(scores: &[SignalScore]) -> Result<ProfileVector> {
    let mut slots: [Option<f64>; 5] = [None; 5];

    for score in scores {
        let slot = &mut slots[score.name.index()];
        if slot.is_some() {
            return Err(MaturityError::config(format!(
                "signal {} was produced more than once",
                score.name
            )));
        }
        *slot = Some(score.normalized);
    }

    let missing: Vec<SignalName> = SignalName::ALL
        .into_iter()
        .filter(|name| slots[name.index()].is_none())
        .collect();
    if !missing.is_empty() {
        return Err(MaturityError::IncompleteProfile { missing });
    }

    let mut values = [0.0; 5];
    for (value, slot) in values.iter_mut().zip(slots) {
        *value = slot.unwrap_or_default();
    }
    ProfileVector::new(values)
}
