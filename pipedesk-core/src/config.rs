use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use shared_types::DEFAULT_SYNC_INTERVAL_MINUTES;
use spreadsheets::DEFAULT_TAB_GIDS;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct PipedeskConfig {
    pub storage: StorageConfig,
    pub sync: SyncSettings,
    pub sheets: SheetsConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Database file; defaults to the platform data directory.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SyncSettings {
    pub interval_minutes: u64,
    pub target: Option<String>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            interval_minutes: DEFAULT_SYNC_INTERVAL_MINUTES,
            target: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SheetsConfig {
    pub tab_gids: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            tab_gids: DEFAULT_TAB_GIDS.iter().map(|gid| gid.to_string()).collect(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub recent_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { recent_limit: 5 }
    }
}

impl PipedeskConfig {
    /// Load the user config, writing a default file first if there is none.
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            let default_config = toml::to_string_pretty(&PipedeskConfig::default())
                .map_err(|e| ConfigError::Message(format!("Failed to render default config: {e}")))?;
            std::fs::write(&config_path, default_config).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let config = Self::load_from(&config_path)?;
        Ok((config, config_path))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .build()?;

        builder.try_deserialize()
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("pipedesk").join("pipedesk.toml")
    } else {
        PathBuf::from("pipedesk.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipedesk.toml");
        std::fs::write(
            &path,
            r#"
[storage]
backend = "memory"

[sync]
interval_minutes = 10
"#,
        )
        .unwrap();

        let config = PipedeskConfig::load_from(&path).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.sync.interval_minutes, 10);
        assert!(config.sync.target.is_none());
        assert_eq!(config.sheets.tab_gids.len(), 4);
        assert_eq!(config.sheets.request_timeout_secs, 30);
        assert_eq!(config.dashboard.recent_limit, 5);
    }

    #[test]
    fn test_default_config_renders_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipedesk.toml");
        std::fs::write(&path, toml::to_string_pretty(&PipedeskConfig::default()).unwrap()).unwrap();

        let config = PipedeskConfig::load_from(&path).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.sheets.tab_gids[1], "1579801802");
        assert_eq!(config.sync.interval_minutes, DEFAULT_SYNC_INTERVAL_MINUTES);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PipedeskConfig::load_from(&dir.path().join("absent.toml")).is_err());
    }
}
