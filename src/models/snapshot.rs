use serde::{Deserialize, Serialize};

/// Already-fetched repository metadata. Read-only to the scoring core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    /// Repo-relative file paths using `/` separators. Directories are implied.
    #[serde(default)]
    pub files: Vec<String>,
    /// Raw README text, `None` when the repository has no README.
    #[serde(default)]
    pub readme: Option<String>,
    #[serde(default)]
    pub commits: Vec<CommitRecord>,
    #[serde(default)]
    pub dependencies: DependencyManifest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub message: String,
    /// Unix seconds.
    pub timestamp: i64,
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyManifest {
    #[serde(default)]
    pub entries: Vec<DependencyEntry>,
    #[serde(default)]
    pub lockfile_present: bool,
    /// Manifest sources that were present but could not be parsed.
    #[serde(default)]
    pub parse_errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyEntry {
    pub name: String,
    pub version_spec: String,
}

impl RepositorySnapshot {
    /// Distinct directory names at any depth, lowercased, in first-seen order.
    pub fn directory_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for path in &self.files {
            let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
            if parts.len() < 2 {
                continue;
            }
            for dir in &parts[..parts.len() - 1] {
                let lower = dir.to_lowercase();
                if !names.contains(&lower) {
                    names.push(lower);
                }
            }
        }
        names
    }
}

impl CommitRecord {
    pub fn new(message: impl Into<String>, timestamp: i64) -> Self {
        Self {
            message: message.into(),
            timestamp,
            author: String::new(),
        }
    }
}

impl DependencyEntry {
    pub fn new(name: impl Into<String>, version_spec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version_spec: version_spec.into(),
        }
    }
}

/// Returns the reason a repo-relative path is unusable, if any.
pub(crate) fn invalid_path_reason(path: &str) -> Option<String> {
    if path.trim().is_empty() {
        return Some("empty file path".to_string());
    }
    if path.starts_with('/') || path.starts_with('\\') || has_drive_prefix(path) {
        return Some(format!("absolute file path: {path}"));
    }
    if path.split(['/', '\\']).any(|part| part == "..") {
        return Some(format!("parent traversal in file path: {path}"));
    }
    None
}

/// `C:\\...` or `C:/...`; a colon elsewhere is a legal Unix file name.
fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && matches!(bytes[2], b'/' | b'\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_names_are_distinct_and_lowercased() {
        let snapshot = RepositorySnapshot {
            files: vec![
                "README.md".to_string(),
                "src/models/user.rs".to_string(),
                "Src/lib.rs".to_string(),
                "tests/api.rs".to_string(),
            ],
            ..Default::default()
        };

        assert_eq!(snapshot.directory_names(), vec!["src", "models", "tests"]);
    }

    #[test]
    fn flags_unusable_paths() {
        assert!(invalid_path_reason("").is_some());
        assert!(invalid_path_reason("/etc/passwd").is_some());
        assert!(invalid_path_reason("src/../secret").is_some());
        assert!(invalid_path_reason("src/main.rs").is_none());
    }

    #[test]
    fn only_drive_letters_count_as_absolute() {
        assert!(invalid_path_reason("C:\\repo\\main.rs").is_some());
        assert!(invalid_path_reason("d:/repo/main.rs").is_some());
        assert!(invalid_path_reason("a:notes.md").is_none());
        assert!(invalid_path_reason("docs/a:b.md").is_none());
    }

    #[test]
    fn deserializes_with_missing_optional_fields() {
        let snapshot: RepositorySnapshot =
            serde_json::from_str(r#"{ "files": ["main.py"] }"#).unwrap();
        assert_eq!(snapshot.files.len(), 1);
        assert!(snapshot.readme.is_none());
        assert!(!snapshot.dependencies.lockfile_present);
    }
}
