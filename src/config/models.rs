use eyre::Result;
use serde::{Deserialize, Serialize};

#[cfg(not(test))]
use super::CONFIG;

use super::constants::{
    BACKFILL_BATCH_SIZE, DATE_FORMAT, DEFAULT_TIMEOUT_SECS, LOG_FILE_PATH, SCHEDULED_GRACE_MS,
    TIME_FORMAT,
};
use super::defaults::*;

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Configuration {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct GeneralConfig {
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogConfig {
    #[serde(default = "log_level")]
    pub level: Option<String>,

    #[serde(default)]
    pub filters: Option<Vec<LogFilter>>,

    #[serde(default)]
    pub file: LogFile,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFilter {
    #[serde(default)]
    pub module: Option<String>,

    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFile {
    #[serde(default = "log_file_path")]
    pub path: String,

    #[serde(default)]
    pub append: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub enum StorageConfig {
    #[serde(rename = "sqlite")]
    Sqlite(SqliteStorage),
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SqliteStorage {
    pub path: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub enum SourceConfig {
    /// JSON export of the device message store
    #[serde(rename = "snapshot")]
    Snapshot(SnapshotSource),
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SnapshotSource {
    pub path: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SyncConfig {
    #[serde(default = "backfill_batch_size")]
    pub backfill_batch_size: usize,

    #[serde(default = "scheduled_grace_ms")]
    pub scheduled_grace_ms: i64,

    #[serde(default = "timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DisplayConfig {
    #[serde(default = "date_format")]
    pub date_format: String,

    #[serde(default = "time_format")]
    pub time_format: String,
}

impl Configuration {
    #[cfg(not(test))]
    pub fn instance() -> &'static Configuration {
        CONFIG.get().expect("Config not initialized")
    }

    #[cfg(not(test))]
    pub fn init(config: Configuration) -> Result<()> {
        CONFIG
            .set(config)
            .map_err(|_| eyre::eyre!("Config already initialized"))?;
        Ok(())
    }

    #[cfg(test)]
    pub fn instance() -> &'static Configuration {
        use super::TEST_CONFIG;
        TEST_CONFIG.with(|config| *config.borrow())
    }

    #[cfg(test)]
    pub fn init(config: Configuration) -> Result<()> {
        use super::TEST_CONFIG;
        TEST_CONFIG.with(|test_config| {
            *test_config.borrow_mut() = Box::leak(Box::new(config));
        });
        Ok(())
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Some("info".to_string()),
            file: LogFile::default(),
            filters: None,
        }
    }
}

impl Default for LogFile {
    fn default() -> Self {
        Self {
            path: LOG_FILE_PATH.to_string(),
            append: false,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Sqlite(SqliteStorage::default())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Snapshot(SnapshotSource::default())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            backfill_batch_size: BACKFILL_BATCH_SIZE,
            scheduled_grace_ms: SCHEDULED_GRACE_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: DATE_FORMAT.to_string(),
            time_format: TIME_FORMAT.to_string(),
        }
    }
}

impl SqliteStorage {
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl SnapshotSource {
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}
