use crate::commands::git::snapshot_from_workspace;
use crate::error::Result;
use crate::models::snapshot::RepositorySnapshot;
use std::fs;
use std::path::Path;

/// A previously fetched snapshot serialized as JSON.
pub fn load_snapshot_file(path: &Path) -> Result<RepositorySnapshot> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_snapshot_file(path: &Path, snapshot: &RepositorySnapshot) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(snapshot)?)?;
    Ok(())
}

/// Directories are read as local checkouts, files as JSON snapshots.
pub fn load_snapshot(path: &Path, commit_limit: usize) -> Result<RepositorySnapshot> {
    if path.is_dir() {
        snapshot_from_workspace(path, commit_limit)
    } else {
        load_snapshot_file(path)
    }
}
