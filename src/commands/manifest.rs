use crate::error::Result;
use crate::models::snapshot::DependencyEntry;
use glob::Pattern;
use serde_json::Value;

/// Manifests the local loader knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    PackageJson,
    Requirements,
    CargoToml,
}

impl ManifestKind {
    pub fn from_file_name(name: &str) -> Option<Self> {
        match name {
            "package.json" => Some(ManifestKind::PackageJson),
            "requirements.txt" | "requirements-dev.txt" => Some(ManifestKind::Requirements),
            "Cargo.toml" => Some(ManifestKind::CargoToml),
            _ => None,
        }
    }

    pub fn parse(self, content: &str) -> Result<Vec<DependencyEntry>> {
        match self {
            ManifestKind::PackageJson => parse_package_json(content),
            ManifestKind::Requirements => Ok(parse_requirements(content)),
            ManifestKind::CargoToml => parse_cargo_toml(content),
        }
    }
}

const LOCKFILE_GLOBS: &[&str] = &["*.lock", "*-lock.json", "*-lock.yaml", "go.sum"];

pub fn is_lockfile(file_name: &str) -> bool {
    LOCKFILE_GLOBS
        .iter()
        .filter_map(|g| Pattern::new(g).ok())
        .any(|p| p.matches(file_name))
}

fn parse_package_json(content: &str) -> Result<Vec<DependencyEntry>> {
    let manifest: Value = serde_json::from_str(content)?;
    let mut entries = Vec::new();

    for section in ["dependencies", "devDependencies"] {
        let Some(deps) = manifest.get(section).and_then(Value::as_object) else {
            continue;
        };
        for (name, spec) in deps {
            entries.push(DependencyEntry::new(
                name.clone(),
                spec.as_str().unwrap_or_default(),
            ));
        }
    }

    Ok(entries)
}

const REQUIREMENT_OPERATORS: &[&str] = &["===", "==", "~=", "!=", ">=", "<=", ">", "<"];

fn parse_requirements(content: &str) -> Vec<DependencyEntry> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() || line.starts_with('-') {
                return None;
            }
            // Environment markers do not affect pinning.
            let requirement = line.split(';').next().unwrap_or(line).trim();

            let split_at = REQUIREMENT_OPERATORS
                .iter()
                .filter_map(|op| requirement.find(op))
                .min();
            let (name, spec) = match split_at {
                Some(index) => requirement.split_at(index),
                None => (requirement, ""),
            };
            let name = name.split('[').next().unwrap_or(name).trim();
            Some(DependencyEntry::new(name, spec.trim()))
        })
        .collect()
}

fn parse_cargo_toml(content: &str) -> Result<Vec<DependencyEntry>> {
    let manifest: toml::Table = toml::from_str(content)?;
    let mut entries = Vec::new();

    let mut tables: Vec<&toml::Table> = ["dependencies", "dev-dependencies", "build-dependencies"]
        .iter()
        .filter_map(|key| manifest.get(*key).and_then(toml::Value::as_table))
        .collect();
    if let Some(workspace_deps) = manifest
        .get("workspace")
        .and_then(|w| w.get("dependencies"))
        .and_then(toml::Value::as_table)
    {
        tables.push(workspace_deps);
    }

    for table in tables {
        for (name, spec) in table {
            let version = match spec {
                toml::Value::String(version) => Some(version.as_str()),
                toml::Value::Table(detail) => {
                    if detail.contains_key("path") || detail.contains_key("workspace") {
                        None
                    } else {
                        Some(detail.get("version").and_then(toml::Value::as_str).unwrap_or(""))
                    }
                }
                _ => None,
            };
            if let Some(version) = version {
                entries.push(DependencyEntry::new(name.clone(), cargo_requirement(version)));
            }
        }
    }

    Ok(entries)
}

/// Cargo reads a bare `1.2.3` as `^1.2.3`; only `=1.2.3` is an exact pin.
fn cargo_requirement(version: &str) -> String {
    let version = version.trim();
    if version.starts_with(|c: char| c.is_ascii_digit()) {
        format!("^{version}")
    } else {
        version.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::dependencies::{classify_spec, VersionPin};

    #[test]
    fn recognizes_lockfiles() {
        for name in ["Cargo.lock", "package-lock.json", "yarn.lock", "pnpm-lock.yaml", "poetry.lock", "go.sum"] {
            assert!(is_lockfile(name), "{name}");
        }
        assert!(!is_lockfile("package.json"));
        assert!(!is_lockfile("Cargo.toml"));
    }

    #[test]
    fn reads_package_json_sections() {
        let entries = ManifestKind::PackageJson
            .parse(r#"{ "dependencies": { "react": "^18.2.0" }, "devDependencies": { "jest": "29.7.0" } }"#)
            .unwrap();
        assert_eq!(
            entries,
            vec![
                DependencyEntry::new("react", "^18.2.0"),
                DependencyEntry::new("jest", "29.7.0"),
            ]
        );
    }

    #[test]
    fn corrupt_package_json_errors() {
        assert!(ManifestKind::PackageJson.parse("{ not json").is_err());
    }

    #[test]
    fn reads_requirements_lines() {
        let entries = ManifestKind::Requirements
            .parse("# deps\nrequests==2.31.0\nflask>=2.0 ; python_version > '3.8'\nuvicorn[standard]\n-r base.txt\n")
            .unwrap();
        assert_eq!(
            entries,
            vec![
                DependencyEntry::new("requests", "==2.31.0"),
                DependencyEntry::new("flask", ">=2.0"),
                DependencyEntry::new("uvicorn", ""),
            ]
        );
    }

    #[test]
    fn reads_cargo_dependency_tables() {
        let content = r#"
[package]
name = "demo"

[dependencies]
serde = { version = "1", features = ["derive"] }
log = "=0.4.20"
local = { path = "../local" }

[dev-dependencies]
tempfile = "3"
"#;
        let entries = ManifestKind::CargoToml.parse(content).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.contains(&DependencyEntry::new("log", "=0.4.20")));
        assert!(!entries.iter().any(|e| e.name == "local"));
        assert!(entries.contains(&DependencyEntry::new("tempfile", "^3")));
    }

    #[test]
    fn bare_cargo_versions_are_caret_ranges() {
        let content = r#"
[dependencies]
serde = "1.0.200"
log = "=0.4.20"
anyhow = { version = "1.0.86" }
"#;
        let entries = ManifestKind::CargoToml.parse(content).unwrap();
        assert!(entries.contains(&DependencyEntry::new("serde", "^1.0.200")));
        assert!(entries.contains(&DependencyEntry::new("log", "=0.4.20")));
        assert!(entries.contains(&DependencyEntry::new("anyhow", "^1.0.86")));

        let pins: Vec<VersionPin> = entries.iter().map(|e| classify_spec(e).unwrap()).collect();
        assert_eq!(pins.iter().filter(|p| **p == VersionPin::Exact).count(), 1);
    }
}
