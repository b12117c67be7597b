use crate::config::{StorageBackend, StorageConfig};
use crate::storage::{KeyValueStore, MemoryStore, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Returns the default path of the pipedesk database
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/pipedesk/pipedesk.sqlite3`
/// - **Linux**: `~/.local/share/pipedesk/pipedesk.sqlite3`
/// - **Windows**: `%LOCALAPPDATA%\pipedesk\pipedesk.sqlite3`
pub fn get_db_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("pipedesk").join("pipedesk.sqlite3"))
}

/// Open the storage backend named in the config
pub fn open_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Sqlite => {
            let db_path = match &config.path {
                Some(path) => path.clone(),
                None => get_db_path()?,
            };
            let store = SqliteStore::open(&db_path)?;
            tracing::info!("Database initialized at: {}", db_path.display());
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_sqlite_at_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crm.sqlite3");
        let config = StorageConfig {
            backend: StorageBackend::Sqlite,
            path: Some(path.clone()),
        };

        let store = open_store(&config).unwrap();
        store.set("crm_tasks", "[]").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_open_memory() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            path: None,
        };
        let store = open_store(&config).unwrap();
        assert_eq!(store.get("crm_tasks").unwrap(), None);
    }
}
