//! Worker Configuration
//!
//! Read from `config.json` in the data directory. Every field has a default,
//! so a missing file or a partial one is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{DomainError, DomainResult};
use crate::history::DEFAULT_HISTORY_LIMIT;

pub const CONFIG_FILE: &str = "config.json";
pub const DATA_DIR_ENV: &str = "IDE_OPENER_DATA_DIR";
/// Longest accepted alarm period: one year
pub const MAX_ALARM_PERIOD_MINUTES: u64 = 365 * 24 * 60;
pub const MAX_PROBE_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

/// Alarm periods in minutes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmPeriods {
    pub check_statuses: u64,
    pub sync_workspaces: u64,
    pub cleanup_history: u64,
}

impl Default for AlarmPeriods {
    fn default() -> Self {
        Self {
            check_statuses: 5,
            sync_workspaces: 15,
            cleanup_history: 1440,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    #[serde(skip)]
    pub data_dir: PathBuf,
    pub database_file: String,
    pub storage: StorageBackend,
    pub log_dir: Option<PathBuf>,
    pub alarms: AlarmPeriods,
    pub history_limit: usize,
    pub probe_timeout_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".ide-opener"),
            database_file: "ide_opener.db".to_string(),
            storage: StorageBackend::Sqlite,
            log_dir: None,
            alarms: AlarmPeriods::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            probe_timeout_secs: 10,
        }
    }
}

impl WorkerConfig {
    /// Data dir from `IDE_OPENER_DATA_DIR`, else `.ide-opener`
    pub fn from_env() -> DomainResult<Self> {
        let data_dir = std::env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| WorkerConfig::default().data_dir);
        Self::load(&data_dir)
    }

    pub fn load(data_dir: &Path) -> DomainResult<Self> {
        let path = data_dir.join(CONFIG_FILE);
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| DomainError::Internal(format!("Failed to read {}: {}", path.display(), e)))?;
            serde_json::from_str::<WorkerConfig>(&text)
                .map_err(|e| DomainError::InvalidInput(format!("Invalid {}: {}", path.display(), e)))?
        } else {
            WorkerConfig::default()
        };
        config.data_dir = data_dir.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> DomainResult<()> {
        std::fs::create_dir_all(&self.data_dir)
            .map_err(|e| DomainError::Internal(format!("Failed to create data dir: {}", e)))?;
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        std::fs::write(self.data_dir.join(CONFIG_FILE), text)
            .map_err(|e| DomainError::Internal(format!("Failed to write config: {}", e)))
    }

    pub fn validate(&self) -> DomainResult<()> {
        let alarms = &self.alarms;
        if alarms.check_statuses == 0 || alarms.sync_workspaces == 0 || alarms.cleanup_history == 0 {
            return Err(DomainError::InvalidInput("alarm periods must be at least one minute".into()));
        }
        let longest = alarms.check_statuses.max(alarms.sync_workspaces).max(alarms.cleanup_history);
        if longest > MAX_ALARM_PERIOD_MINUTES {
            return Err(DomainError::InvalidInput(format!(
                "alarm periods must not exceed {} minutes",
                MAX_ALARM_PERIOD_MINUTES
            )));
        }
        if self.probe_timeout_secs == 0 || self.probe_timeout_secs > MAX_PROBE_TIMEOUT_SECS {
            return Err(DomainError::InvalidInput(format!(
                "probe_timeout_secs must be between 1 and {}",
                MAX_PROBE_TIMEOUT_SECS
            )));
        }
        if self.database_file.trim().is_empty() {
            return Err(DomainError::InvalidInput("database_file is empty".into()));
        }
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| self.data_dir.join("logs"))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}
