use super::SignalExtractor;
use crate::error::{MaturityError, Result};
use crate::models::config::DependenciesConfig;
use crate::models::signal_score::{SignalName, SignalScore};
use crate::models::snapshot::{DependencyEntry, RepositorySnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionPin {
    /// A single full version, e.g. `1.4.2`, `=1.4.2`, `==1.4.2`, `===1.4.2`.
    Exact,
    /// Ranges, wildcards, tags and anything else that can drift.
    Open,
}

/// Classifies a version specifier. Empty means "any version".
pub fn classify_spec(entry: &DependencyEntry) -> Result<VersionPin> {
    if entry.name.trim().is_empty() {
        return Err(MaturityError::malformed(
            SignalName::Dependencies,
            "dependency entry without a name",
        ));
    }

    let spec = entry.version_spec.trim();
    if spec.chars().any(char::is_control) {
        return Err(MaturityError::malformed(
            SignalName::Dependencies,
            format!("control characters in version of {}", entry.name),
        ));
    }
    if spec.is_empty() {
        return Ok(VersionPin::Open);
    }

    let version = spec
        .strip_prefix("===")
        .or_else(|| spec.strip_prefix("=="))
        .or_else(|| spec.strip_prefix('='))
        .unwrap_or(spec)
        .trim();
    if version.is_empty() || is_bare_operator(spec) {
        return Err(MaturityError::malformed(
            SignalName::Dependencies,
            format!("dangling operator `{spec}` for {}", entry.name),
        ));
    }

    if is_full_version(version) {
        Ok(VersionPin::Exact)
    } else {
        Ok(VersionPin::Open)
    }
}

fn is_bare_operator(spec: &str) -> bool {
    matches!(spec, ">" | "<" | ">=" | "<=" | "~" | "^" | "~=" | "!=" | "===" | "==" | "=")
}

/// `MAJOR.MINOR.PATCH` with optional `-pre` / `+build` suffix.
fn is_full_version(version: &str) -> bool {
    let core = version
        .split(['-', '+'])
        .next()
        .unwrap_or("");
    let parts: Vec<&str> = core.split('.').collect();
    parts.len() >= 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

pub struct DependencyHealthExtractor {
    config: DependenciesConfig,
}

impl DependencyHealthExtractor {
    pub fn new(config: DependenciesConfig) -> Self {
        Self { config }
    }
}

impl SignalExtractor for DependencyHealthExtractor {
    fn signal(&self) -> SignalName {
        SignalName::Dependencies
    }

    fn extract(&self, snapshot: &RepositorySnapshot) -> Result<SignalScore> {
        let manifest = &snapshot.dependencies;
        if let Some(source) = manifest.parse_errors.first() {
            return Err(MaturityError::malformed(
                SignalName::Dependencies,
                format!("unparseable manifest {source}"),
            ));
        }

        let pins = manifest
            .entries
            .iter()
            .map(classify_spec)
            .collect::<Result<Vec<_>>>()?;

        if pins.is_empty() && !manifest.lockfile_present {
            return Ok(SignalScore::new(SignalName::Dependencies, 0.0, 0.0)
                .with_detail("No dependency manifest"));
        }

        let pinned = pins.iter().filter(|p| **p == VersionPin::Exact).count();
        let pinned_ratio = if pins.is_empty() {
            0.0
        } else {
            pinned as f64 / pins.len() as f64
        };
        let lockfile = if manifest.lockfile_present { 1.0 } else { 0.0 };

        let normalized = (self.config.lockfile_weight * lockfile
            + self.config.pinned_weight * pinned_ratio)
            .clamp(0.0, 1.0);

        Ok(SignalScore::new(SignalName::Dependencies, pinned as f64, normalized)
            .with_detail(format!("{pinned}/{} dependencies pinned", pins.len()))
            .with_detail(if manifest.lockfile_present {
                "Lock file present"
            } else {
                "No lock file"
            }))
    }
}
