use crate::error::{MaturityError, Result};
use crate::models::config::{GapTarget, NormalizationConfig, RoadmapConfig, WeightTable};
use crate::models::signal_score::SignalName;
use crate::models::tier::{default_tiers, TierProfile};
use crate::scoring::catalog::TierCatalog;
use crate::scoring::ScoringConfig;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_SCHEMA_VERSION: i64 = 1;
const SETTINGS_DIR: &str = ".maturity";
const DEFAULT_COMMIT_HISTORY_LIMIT: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(rename = "schema_version")]
    schema_version: i64,
    weights: WeightTable,
    tiers: Vec<TierProfile>,
    roadmap_top_n: usize,
    roadmap_buckets: RoadmapBuckets,
    normalization: NormalizationConfig,
    gap_target: GapTarget,
    commit_history_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoadmapBuckets {
    small_below: f64,
    medium_below: f64,
}

/// Validated settings ready for a scoring run.
#[derive(Debug, Clone)]
pub struct EffectiveSettings {
    pub config: ScoringConfig,
    /// Commits read from a local checkout's history.
    pub commit_history_limit: usize,
}

impl Default for EffectiveSettings {
    fn default() -> Self {
        Self {
            config: ScoringConfig::default(),
            commit_history_limit: DEFAULT_COMMIT_HISTORY_LIMIT,
        }
    }
}

pub fn settings_path(workspace_path: &Path) -> PathBuf {
    workspace_path.join(SETTINGS_DIR).join("settings.json")
}

/// Workspace settings if the file exists, built-in defaults otherwise.
pub fn load_workspace_settings(workspace_path: &Path) -> Result<EffectiveSettings> {
    let path = settings_path(workspace_path);
    if path.exists() {
        load_settings_file(&path)
    } else {
        log::debug!("no settings at {}, using defaults", path.display());
        Ok(EffectiveSettings::default())
    }
}

pub fn load_settings_file(path: &Path) -> Result<EffectiveSettings> {
    let raw = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw).map_err(|e| {
        MaturityError::config(format!("settings file {} is not valid JSON: {e}", path.display()))
    })?;
    effective_settings(migrate_settings(value))
}

/// Writes defaults to the workspace settings file unless one already exists.
pub fn init_settings(workspace_path: &Path) -> Result<PathBuf> {
    let path = settings_path(workspace_path);
    if !path.exists() {
        ensure_settings_dir(workspace_path)?;
        write_settings_file(&path, &default_settings())?;
    }
    Ok(path)
}

/// Merges a partial update into the stored settings. Nothing is written when
/// the stored file is unreadable or the merged result fails validation.
pub fn save_settings(workspace_path: &Path, settings: &Value) -> Result<Value> {
    let Value::Object(update) = settings else {
        return Err(MaturityError::config("settings update must be a JSON object"));
    };
    let path = settings_path(workspace_path);

    let mut merged = if path.exists() {
        let raw = fs::read_to_string(&path)?;
        serde_json::from_str::<Value>(&raw).map_err(|e| {
            MaturityError::config(format!(
                "refusing to overwrite {}: existing settings are not valid JSON: {e}",
                path.display()
            ))
        })?
    } else {
        default_settings()
    };
    if let Value::Object(stored) = &mut merged {
        apply_update(stored, update);
    }

    let migrated = migrate_settings(merged);
    effective_settings(migrated.clone())?;
    ensure_settings_dir(workspace_path)?;
    write_settings_file(&path, &migrated)?;
    log::debug!("saved settings to {}", path.display());
    Ok(migrated)
}

fn effective_settings(value: Value) -> Result<EffectiveSettings> {
    let file: SettingsFile = serde_json::from_value(value)
        .map_err(|e| MaturityError::config(format!("invalid settings: {e}")))?;

    let config = ScoringConfig::new(
        TierCatalog::new(file.tiers)?,
        file.weights,
        file.normalization,
        RoadmapConfig {
            top_n: file.roadmap_top_n,
            small_below: file.roadmap_buckets.small_below,
            medium_below: file.roadmap_buckets.medium_below,
        },
        file.gap_target,
    )?;
    if file.commit_history_limit == 0 {
        return Err(MaturityError::config("commitHistoryLimit must be at least 1"));
    }

    Ok(EffectiveSettings {
        config,
        commit_history_limit: file.commit_history_limit,
    })
}

fn ensure_settings_dir(workspace_path: &Path) -> Result<()> {
    fs::create_dir_all(workspace_path.join(SETTINGS_DIR))?;
    Ok(())
}

fn write_settings_file(path: &Path, settings: &Value) -> Result<()> {
    let raw = serde_json::to_string_pretty(settings)?;
    fs::write(path, raw)?;
    Ok(())
}

fn migrate_settings(input: Value) -> Value {
    let mut settings = match input {
        Value::Object(map) => map,
        other => {
            log::warn!("settings root is {other}, not an object; starting from defaults");
            Map::new()
        }
    };
    let version = settings
        .get("schema_version")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    if let Value::Object(defaults) = default_settings() {
        fill_missing_keys(&mut settings, &defaults);
    }
    if version < 1 {
        weights_from_percentages(&mut settings);
    }

    settings.insert("schema_version".to_string(), json!(SETTINGS_SCHEMA_VERSION));
    Value::Object(settings)
}

fn default_settings() -> Value {
    let roadmap = RoadmapConfig::default();
    json!({
        "schema_version": SETTINGS_SCHEMA_VERSION,
        "weights": WeightTable::default(),
        "tiers": default_tiers(),
        "roadmapTopN": roadmap.top_n,
        "roadmapBuckets": {
            "smallBelow": roadmap.small_below,
            "mediumBelow": roadmap.medium_below
        },
        "normalization": NormalizationConfig::default(),
        "gapTarget": GapTarget::default(),
        "commitHistoryLimit": DEFAULT_COMMIT_HISTORY_LIMIT
    })
}

/// Adds every key of `defaults` that `settings` lacks. Present values win,
/// including a custom `tiers` list.
fn fill_missing_keys(settings: &mut Map<String, Value>, defaults: &Map<String, Value>) {
    for (key, default_value) in defaults {
        match (settings.get_mut(key), default_value) {
            (Some(Value::Object(section)), Value::Object(section_defaults)) => {
                fill_missing_keys(section, section_defaults);
            }
            (Some(_), _) => {}
            (None, _) => {
                settings.insert(key.clone(), default_value.clone());
            }
        }
    }
}

/// Nested sections such as `normalization` merge key by key; `tiers` and
/// scalars are replaced.
fn apply_update(stored: &mut Map<String, Value>, update: &Map<String, Value>) {
    for (key, value) in update {
        match (stored.get_mut(key), value) {
            (Some(Value::Object(section)), Value::Object(section_update)) => {
                apply_update(section, section_update);
            }
            _ => {
                stored.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Schema v0 stored weights as percentages (`20` rather than `0.2`).
fn weights_from_percentages(settings: &mut Map<String, Value>) {
    let Some(Value::Object(weights)) = settings.get_mut("weights") else {
        return;
    };
    let stored: Vec<(SignalName, f64)> = SignalName::ALL
        .into_iter()
        .filter_map(|name| weights.get(name.as_str()).and_then(Value::as_f64).map(|v| (name, v)))
        .collect();
    if !stored.iter().any(|(_, v)| *v > 1.0) {
        return;
    }

    log::info!("converting percentage weights from settings schema v0");
    for (name, percent) in stored {
        weights.insert(name.as_str().to_string(), json!(percent / 100.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_produce_builtin_config() {
        let settings = effective_settings(migrate_settings(json!({}))).unwrap();
        assert_eq!(settings.config, ScoringConfig::default());
        assert_eq!(settings.commit_history_limit, DEFAULT_COMMIT_HISTORY_LIMIT);
    }

    #[test]
    fn migrates_percentage_weights() {
        let input = json!({
            "schema_version": 0,
            "weights": {
                "structure": 30,
                "readme": 25,
                "tests": 20,
                "commits": 15,
                "dependencies": 10
            }
        });

        let migrated = migrate_settings(input);
        assert_eq!(migrated["schema_version"], json!(SETTINGS_SCHEMA_VERSION));

        let settings = effective_settings(migrated).unwrap();
        assert!((settings.config.weights().weight(SignalName::Structure) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn weights_not_summing_to_one_are_rejected() {
        let input = json!({
            "schema_version": 1,
            "weights": { "structure": 0.5, "readme": 0.5, "tests": 0.5, "commits": 0.0, "dependencies": 0.0 }
        });
        assert!(matches!(
            effective_settings(migrate_settings(input)),
            Err(MaturityError::Configuration(_))
        ));
    }

    #[test]
    fn empty_tier_list_is_rejected() {
        let input = json!({ "schema_version": 1, "tiers": [] });
        assert!(matches!(
            effective_settings(migrate_settings(input)),
            Err(MaturityError::Configuration(_))
        ));
    }

    #[test]
    fn custom_tiers_replace_defaults() {
        let input = json!({
            "schema_version": 1,
            "tiers": [
                { "name": "Hobby", "rank": 0,
                  "centroid": { "structure": 0.2, "readme": 0.2, "tests": 0.1, "commits": 0.1, "dependencies": 0.1 } },
                { "name": "Pro", "rank": 1,
                  "centroid": { "structure": 0.9, "readme": 0.9, "tests": 0.9, "commits": 0.9, "dependencies": 0.9 } }
            ],
            "gapTarget": "next"
        });

        let settings = effective_settings(migrate_settings(input)).unwrap();
        assert_eq!(settings.config.catalog().tiers().len(), 2);
        assert_eq!(settings.config.gap_target(), GapTarget::Next);
    }

    #[test]
    fn roadmap_update_keeps_stored_weights_and_tiers() {
        let mut stored = json!({
            "schema_version": 1,
            "weights": { "structure": 0.4, "readme": 0.15, "tests": 0.15, "commits": 0.15, "dependencies": 0.15 },
            "normalization": { "commits": { "window": 50 } }
        });
        let update = json!({ "roadmapTopN": 5, "normalization": { "structure": { "saturation": 6 } } });
        if let (Value::Object(stored), Value::Object(update)) = (&mut stored, &update) {
            apply_update(stored, update);
        }
        let migrated = migrate_settings(stored);

        assert_eq!(migrated["roadmapTopN"], json!(5));
        assert_eq!(migrated["weights"]["structure"], json!(0.4));
        assert_eq!(migrated["normalization"]["commits"]["window"], json!(50));
        assert_eq!(migrated["normalization"]["structure"]["saturation"], json!(6));
        assert_eq!(migrated["tiers"].as_array().map(Vec::len), Some(3));
        assert_eq!(migrated["commitHistoryLimit"], json!(DEFAULT_COMMIT_HISTORY_LIMIT));
    }

    #[test]
    fn percentage_migration_only_touches_signal_weights() {
        let mut settings = Map::new();
        settings.insert(
            "weights".to_string(),
            json!({ "structure": 60, "readme": 10, "tests": 10, "commits": 10, "dependencies": 10, "legacy": 40 }),
        );
        weights_from_percentages(&mut settings);

        assert_eq!(settings["weights"]["structure"], json!(0.6));
        assert_eq!(settings["weights"]["legacy"], json!(40));
    }

    #[test]
    fn corrupt_settings_file_is_not_overwritten() {
        let workspace = TempDir::new().unwrap();
        fs::create_dir_all(workspace.path().join(SETTINGS_DIR)).unwrap();
        let path = settings_path(workspace.path());
        fs::write(&path, "{ \"roadmapTopN\": ").unwrap();

        let result = save_settings(workspace.path(), &json!({ "roadmapTopN": 4 }));
        assert!(matches!(result, Err(MaturityError::Configuration(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ \"roadmapTopN\": ");
        assert!(matches!(load_settings_file(&path), Err(MaturityError::Configuration(_))));
    }

    #[test]
    fn non_object_update_is_rejected() {
        let workspace = TempDir::new().unwrap();
        let result = save_settings(workspace.path(), &json!([1, 2]));
        assert!(matches!(result, Err(MaturityError::Configuration(_))));
        assert!(!settings_path(workspace.path()).exists());
    }
}
