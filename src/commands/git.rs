use crate::commands::manifest::{is_lockfile, ManifestKind};
use crate::error::{MaturityError, Result};
use crate::models::snapshot::{CommitRecord, DependencyManifest, RepositorySnapshot};
use git2::Repository;
use std::fs;
use std::path::Path;

const SKIPPED_DIRS: &[&str] = &[
    "node_modules", "target", "__pycache__", "vendor", "dist", "build", ".git", ".venv", "venv",
];

/// Manifests below these directories are test data, not project dependencies.
const FIXTURE_DIRS: &[&str] = &[
    "test", "tests", "fixtures", "fixture", "__fixtures__", "testdata", "test-data",
];

/// Builds a snapshot from a local checkout. Commits come from the HEAD
/// history (newest first, at most `commit_limit`); a directory that is not a
/// git repository yields an empty commit list.
pub fn snapshot_from_workspace(workspace_path: &Path, commit_limit: usize) -> Result<RepositorySnapshot> {
    let files = walkdir(workspace_path);
    let readme = read_readme(workspace_path, &files);
    let dependencies = read_dependencies(workspace_path, &files);

    let commits = match Repository::open(workspace_path) {
        Ok(repo) => read_commits(&repo, commit_limit)?,
        Err(e) => {
            log::warn!("{} is not a git repository ({e}); scoring without history", workspace_path.display());
            Vec::new()
        }
    };

    log::debug!(
        "snapshot of {}: {} files, {} commits, {} dependencies",
        workspace_path.display(),
        files.len(),
        commits.len(),
        dependencies.entries.len()
    );

    Ok(RepositorySnapshot {
        files,
        readme,
        commits,
        dependencies,
    })
}

/// Repo-relative paths with `/` separators, sorted.
pub(crate) fn walkdir(root: &Path) -> Vec<String> {
    fn walk_recursive(root: &Path, dir: &Path, files: &mut Vec<String>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_symlink() && path.is_dir() {
                log::debug!("skipping symlinked directory {}", path.display());
                continue;
            }
            if file_type.is_dir() {
                // Hidden directories are skipped; hidden files are kept.
                if name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_str()) {
                    continue;
                }
                walk_recursive(root, &path, files);
            } else if let Ok(relative) = path.strip_prefix(root) {
                let parts: Vec<String> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().to_string())
                    .collect();
                files.push(parts.join("/"));
            }
        }
    }

    let mut files = Vec::new();
    walk_recursive(root, root, &mut files);
    files.sort();
    files
}

fn read_readme(root: &Path, files: &[String]) -> Option<String> {
    let name = files
        .iter()
        .find(|f| !f.contains('/') && f.to_lowercase().starts_with("readme"))?;
    match fs::read(root.join(name)) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            log::warn!("could not read {name}: {e}");
            None
        }
    }
}

fn read_dependencies(root: &Path, files: &[String]) -> DependencyManifest {
    let mut manifest = DependencyManifest::default();

    for relative in files {
        let mut segments: Vec<&str> = relative.split('/').collect();
        let file_name = segments.pop().unwrap_or(relative);
        if segments.iter().any(|dir| FIXTURE_DIRS.contains(dir)) {
            continue;
        }
        if is_lockfile(file_name) {
            manifest.lockfile_present = true;
            continue;
        }
        let Some(kind) = ManifestKind::from_file_name(file_name) else {
            continue;
        };

        let parsed: Result<Vec<_>> = fs::read_to_string(root.join(relative))
            .map_err(MaturityError::from)
            .and_then(|content| kind.parse(&content));
        match parsed {
            Ok(entries) => manifest.entries.extend(entries),
            Err(e) => {
                log::warn!("could not parse manifest {relative}: {e}");
                manifest.parse_errors.push(relative.clone());
            }
        }
    }

    manifest
}

fn read_commits(repo: &Repository, limit: usize) -> Result<Vec<CommitRecord>> {
    // Unborn HEAD: a freshly initialized repository has no history yet.
    if repo.head().is_err() {
        return Ok(Vec::new());
    }

    let mut revwalk = repo.revwalk()?;
    revwalk.push_head()?;
    revwalk.set_sorting(git2::Sort::TIME)?;

    let mut commits = Vec::new();
    for oid in revwalk.flatten().take(limit) {
        let commit = match repo.find_commit(oid) {
            Ok(c) => c,
            Err(_) => continue,
        };
        commits.push(CommitRecord {
            message: commit.summary().unwrap_or("").to_string(),
            timestamp: commit.time().seconds(),
            author: commit.author().name().unwrap_or("unknown").to_string(),
        });
    }

    Ok(commits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn walkdir_skips_hidden_and_build_directories() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "src/main.rs", "fn main() {}");
        write_file(dir.path(), ".github/workflows/ci.yml", "on: push");
        write_file(dir.path(), "target/debug/out", "");
        write_file(dir.path(), ".env", "");

        assert_eq!(walkdir(dir.path()), vec![".env".to_string(), "src/main.rs".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn walkdir_does_not_follow_symlinked_directories() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "src/main.rs", "fn main() {}");
        std::os::unix::fs::symlink(dir.path(), dir.path().join("src/loop")).unwrap();

        assert_eq!(walkdir(dir.path()), vec!["src/main.rs".to_string()]);
    }

    #[test]
    fn fixture_manifests_do_not_affect_dependencies() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "package.json", r#"{ "dependencies": { "react": "18.2.0" } }"#);
        write_file(dir.path(), "tests/fixtures/package.json", "{ not json");
        write_file(dir.path(), "test/data/yarn.lock", "");

        let files = walkdir(dir.path());
        let manifest = read_dependencies(dir.path(), &files);
        assert!(manifest.parse_errors.is_empty());
        assert!(!manifest.lockfile_present);
        assert_eq!(manifest.entries.len(), 1);
    }

    #[test]
    fn broken_root_manifest_is_recorded() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "package.json", "{ not json");

        let files = walkdir(dir.path());
        let manifest = read_dependencies(dir.path(), &files);
        assert_eq!(manifest.parse_errors, vec!["package.json".to_string()]);
    }
}
