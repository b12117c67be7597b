use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const DEFAULT_SYNC_INTERVAL_MINUTES: u64 = 3;

/// Persisted cloud sync settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    pub is_enabled: bool,
    /// Where data is pushed, e.g. a spreadsheet web-app endpoint.
    pub target: String,
    pub last_sync: Option<String>,
    /// Minutes between sync ticks.
    #[serde(default = "default_sync_interval")]
    pub sync_interval: u64,
}

fn default_sync_interval() -> u64 {
    DEFAULT_SYNC_INTERVAL_MINUTES
}

/// Sync enablement state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum SyncState {
    #[default]
    Disabled,
    /// Waiting for the first sync to succeed.
    Enabling,
    /// Timer running.
    Enabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub state: SyncState,
    pub in_progress: bool,
    pub config: Option<SyncConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_config_interval_defaults() {
        let config: SyncConfig =
            serde_json::from_str(r#"{"isEnabled":true,"target":"https://x","lastSync":null}"#)
                .unwrap();
        assert_eq!(config.sync_interval, DEFAULT_SYNC_INTERVAL_MINUTES);
        assert!(config.is_enabled);
    }
}
