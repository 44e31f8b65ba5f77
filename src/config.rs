use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::error::{ExplorerError, Result};
use crate::models::{ExpandedSet, ExplorerConfig};

/// ConfigManager loads, updates and saves the explorer configuration.
///
/// Features:
/// - Interior mutability via RwLock, so the view can share it by reference
/// - Merges saved config with defaults for missing or malformed fields
/// - Synchronous saves; the explorer never runs background timers
pub struct ConfigManager {
    /// The current configuration
    config: RwLock<ExplorerConfig>,
    /// Path to the configuration file, `None` for a memory-only manager
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Creates a ConfigManager backed by the given file.
    ///
    /// A missing file yields the default configuration.
    pub fn new(config_path: PathBuf) -> Result<Self> {
        let config = Self::load_from_file(&config_path)?;
        Ok(Self {
            config: RwLock::new(config),
            config_path: Some(config_path),
        })
    }

    /// Creates a ConfigManager that never touches the disk.
    pub fn in_memory(config: ExplorerConfig) -> Self {
        Self {
            config: RwLock::new(config),
            config_path: None,
        }
    }

    /// Platform config location.
    ///
    /// On Linux: ~/.config/card-explorer/config.json
    /// On macOS: ~/Library/Application Support/card-explorer/config.json
    /// On Windows: C:\Users\{user}\AppData\Roaming\card-explorer\config.json
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("card-explorer").join("config.json"))
            .ok_or_else(|| ExplorerError::Config("Could not determine config directory".to_string()))
    }

    fn load_from_file(path: &Path) -> Result<ExplorerConfig> {
        if !path.exists() {
            return Ok(ExplorerConfig::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ExplorerError::Config(format!("Failed to read config file: {}", e)))?;
        merge_config_with_defaults(&content)
    }

    /// Gets a clone of the current configuration.
    pub fn get(&self) -> ExplorerConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Updates the configuration in memory using a closure.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut ExplorerConfig),
    {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut config);
    }

    /// Updates the configuration and saves it immediately.
    pub fn update_and_save<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ExplorerConfig),
    {
        self.update(f);
        self.save_sync()
    }

    /// Saves the configuration to disk, creating the parent directory if needed.
    pub fn save_sync(&self) -> Result<()> {
        let Some(path) = &self.config_path else {
            return Ok(());
        };
        let config = self.get();

        let content = serde_json::to_string_pretty(&config)
            .map_err(|e| ExplorerError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ExplorerError::Config(format!("Failed to create config directory: {}", e)))?;
        }
        fs::write(path, content)
            .map_err(|e| ExplorerError::Config(format!("Failed to write config file: {}", e)))
    }

    /// Folder paths currently recorded as expanded
    pub fn expanded_folders(&self) -> ExpandedSet {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .expanded_set()
    }

    /// Replaces the recorded expanded folders and saves.
    pub fn save_expanded_folders(&self, expanded: &ExpandedSet) -> Result<()> {
        self.update_and_save(|config| {
            config.expanded_folders = expanded.iter().cloned().collect();
        })
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

/// Merges a partial config JSON with defaults.
///
/// Fields that are missing or have the wrong type keep their default value.
pub fn merge_config_with_defaults(partial_json: &str) -> Result<ExplorerConfig> {
    if partial_json.trim().is_empty() {
        return Ok(ExplorerConfig::default());
    }

    let json_value: serde_json::Value = serde_json::from_str(partial_json)
        .map_err(|e| ExplorerError::Config(format!("Failed to parse config: {}", e)))?;

    let mut config = ExplorerConfig::default();

    if let Some(obj) = json_value.as_object() {
        if let Some(v) = obj.get("file_filter") {
            if let Ok(filter) = serde_json::from_value(v.clone()) {
                config.file_filter = filter;
            }
        }
        if let Some(v) = obj.get("preview_lines").and_then(|v| v.as_u64()) {
            config.preview_lines = v as usize;
        }
        if let Some(v) = obj.get("preview_char_budget") {
            if v.is_null() {
                config.preview_char_budget = None;
            } else if let Some(n) = v.as_u64() {
                config.preview_char_budget = Some(n as usize);
            }
        }
        if let Some(v) = obj.get("show_type_icons").and_then(|v| v.as_bool()) {
            config.show_type_icons = v;
        }
        if let Some(v) = obj.get("default_extension").and_then(|v| v.as_str()) {
            config.default_extension = v.to_string();
        }
        if let Some(v) = obj.get("confirm_delete").and_then(|v| v.as_bool()) {
            config.confirm_delete = v;
        }
        if let Some(v) = obj.get("expanded_folders").and_then(|v| v.as_array()) {
            config.expanded_folders = v
                .iter()
                .filter_map(|item| item.as_str().map(|s| s.to_string()))
                .collect();
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_types::FileFilter;
    use proptest::prelude::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_path_is_under_platform_config_dir() {
        match (ConfigManager::default_path(), dirs::config_dir()) {
            (Ok(path), Some(dir)) => {
                assert!(path.starts_with(&dir));
                assert!(path.ends_with(Path::new("card-explorer").join("config.json")));
            }
            (Err(e), None) => assert!(matches!(e, ExplorerError::Config(_))),
            (result, dir) => panic!("default_path {:?} disagrees with config dir {:?}", result, dir),
        }
    }

    #[test]
    fn test_config_manager_new_no_file() {
        let temp_dir = tempdir().unwrap();
        let manager = ConfigManager::new(temp_dir.path().join("config.json")).unwrap();
        assert_eq!(manager.get(), ExplorerConfig::default());
    }

    #[test]
    fn test_config_manager_load_existing() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{ "file_filter": "all_files", "preview_char_budget": null }"#,
        )
        .unwrap();

        let config = ConfigManager::new(config_path).unwrap().get();
        assert_eq!(config.file_filter, FileFilter::AllFiles);
        assert_eq!(config.preview_char_budget, None);
        assert_eq!(config.preview_lines, 3);
        assert_eq!(config.default_extension, "md");
    }

    #[test]
    fn test_config_manager_rejects_garbage() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, "{ not json").unwrap();
        assert!(matches!(ConfigManager::new(config_path), Err(ExplorerError::Config(_))));
    }

    #[test]
    fn test_expanded_folders_persist() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.json");

        let manager = ConfigManager::new(config_path.clone()).unwrap();
        let expanded: ExpandedSet = ["Notes", "Projects/2024"].iter().map(|s| s.to_string()).collect();
        manager.save_expanded_folders(&expanded).unwrap();

        let reloaded = ConfigManager::new(config_path).unwrap();
        assert_eq!(reloaded.expanded_folders(), expanded);
    }

    #[test]
    fn test_in_memory_save_is_noop() {
        let manager = ConfigManager::in_memory(ExplorerConfig::default());
        manager.update_and_save(|c| c.confirm_delete = false).unwrap();
        assert!(!manager.get().confirm_delete);
        assert!(manager.config_path().is_none());
    }

    #[test]
    fn test_merge_wrong_types_keep_defaults() {
        let config = merge_config_with_defaults(
            r#"{ "preview_lines": "many", "file_filter": "everything", "expanded_folders": ["a", 3] }"#,
        )
        .unwrap();
        assert_eq!(config.preview_lines, 3);
        assert_eq!(config.file_filter, FileFilter::MarkdownOnly);
        assert_eq!(config.expanded_folders, vec!["a".to_string()]);
    }

    #[test]
    fn test_merge_config_with_defaults_full() {
        let full = serde_json::to_string(&ExplorerConfig::default()).unwrap();
        assert_eq!(merge_config_with_defaults(&full).unwrap(), ExplorerConfig::default());
        assert_eq!(merge_config_with_defaults("").unwrap(), ExplorerConfig::default());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Provided fields are used, missing fields keep defaults.
        #[test]
        fn prop_config_merge_preserves_defaults(
            lines in proptest::option::of(1usize..10),
            budget in proptest::option::of(proptest::option::of(10usize..500)),
            ext in proptest::option::of("[a-z]{1,5}"),
            expanded in proptest::option::of(proptest::collection::vec("[A-Za-z]{1,8}", 0..5)),
        ) {
            let mut json_obj = serde_json::Map::new();
            if let Some(v) = lines {
                json_obj.insert("preview_lines".to_string(), serde_json::json!(v));
            }
            if let Some(v) = budget {
                json_obj.insert("preview_char_budget".to_string(), serde_json::json!(v));
            }
            if let Some(v) = &ext {
                json_obj.insert("default_extension".to_string(), serde_json::json!(v));
            }
            if let Some(v) = &expanded {
                json_obj.insert("expanded_folders".to_string(), serde_json::json!(v));
            }

            let config = merge_config_with_defaults(&serde_json::to_string(&json_obj).unwrap()).unwrap();
            let defaults = ExplorerConfig::default();

            prop_assert_eq!(config.preview_lines, lines.unwrap_or(defaults.preview_lines));
            prop_assert_eq!(config.preview_char_budget, budget.unwrap_or(defaults.preview_char_budget));
            prop_assert_eq!(config.default_extension, ext.unwrap_or(defaults.default_extension));
            prop_assert_eq!(config.expanded_folders, expanded.unwrap_or(defaults.expanded_folders));
            prop_assert_eq!(config.file_filter, defaults.file_filter);
        }
    }
}
