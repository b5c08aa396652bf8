use serde::{Deserialize, Serialize};
use std::fmt;

/// Profile dimensions, declared in the fixed vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalName {
    Structure,
    Readme,
    Tests,
    Commits,
    Dependencies,
}

impl SignalName {
    pub const ALL: [SignalName; 5] = [
        SignalName::Structure,
        SignalName::Readme,
        SignalName::Tests,
        SignalName::Commits,
        SignalName::Dependencies,
    ];

    /// Position in the profile vector.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SignalName::Structure => "structure",
            SignalName::Readme => "readme",
            SignalName::Tests => "tests",
            SignalName::Commits => "commits",
            SignalName::Dependencies => "dependencies",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SignalName::Structure => "Project Structure",
            SignalName::Readme => "Documentation",
            SignalName::Tests => "Testing",
            SignalName::Commits => "Commit Quality",
            SignalName::Dependencies => "Dependency Management",
        }
    }
}

impl fmt::Display for SignalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized value used when a signal's input is malformed.
pub const NEUTRAL_SIGNAL_VALUE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalScore {
    pub name: SignalName,
    pub raw_value: f64,
    pub normalized: f64,
    pub details: Vec<String>,
    /// Set when extraction failed and the neutral value was substituted.
    pub degraded: bool,
}

impl SignalScore {
    pub fn new(name: SignalName, raw_value: f64, normalized: f64) -> Self {
        Self {
            name,
            raw_value,
            normalized,
            details: Vec::new(),
            degraded: false,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    pub fn neutral(name: SignalName, reason: impl Into<String>) -> Self {
        Self {
            name,
            raw_value: 0.0,
            normalized: NEUTRAL_SIGNAL_VALUE,
            details: vec![reason.into()],
            degraded: true,
        }
    }
}

/// Linear ramp that stops growing once `count` reaches `threshold`.
pub(crate) fn saturate(count: f64, threshold: f64) -> f64 {
    if threshold <= 0.0 {
        return 0.0;
    }
    (count / threshold).clamp(0.0, 1.0)
}
