use serde::{Deserialize, Serialize};

use crate::store::LockPolicy;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON data file. Relative paths resolve against the working directory.
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Fail instead of starting empty when the data file is missing.
    #[serde(default)]
    pub require_existing: bool,

    #[serde(default = "default_lock_attempts")]
    pub lock_attempts: u32,

    #[serde(default = "default_lock_base_delay_ms")]
    pub lock_base_delay_ms: u64,

    #[serde(default = "default_lock_max_delay_ms")]
    pub lock_max_delay_ms: u64,

    /// Upper bound on the total time spent sleeping between lock attempts.
    #[serde(default = "default_lock_max_wait_ms")]
    pub lock_max_wait_ms: u64,
}

fn default_data_file() -> String {
    "tasks.json".to_string()
}

fn default_lock_attempts() -> u32 {
    10
}

fn default_lock_base_delay_ms() -> u64 {
    10
}

fn default_lock_max_delay_ms() -> u64 {
    200
}

fn default_lock_max_wait_ms() -> u64 {
    2_000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            require_existing: false,
            lock_attempts: default_lock_attempts(),
            lock_base_delay_ms: default_lock_base_delay_ms(),
            lock_max_delay_ms: default_lock_max_delay_ms(),
            lock_max_wait_ms: default_lock_max_wait_ms(),
        }
    }
}

impl StoreConfig {
    pub fn lock_policy(&self) -> LockPolicy {
        LockPolicy {
            max_attempts: self.lock_attempts.max(1),
            base_delay: std::time::Duration::from_millis(self.lock_base_delay_ms),
            max_delay: std::time::Duration::from_millis(self.lock_max_delay_ms),
            max_wait: std::time::Duration::from_millis(self.lock_max_wait_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "warn" or "tasks5_cli=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}
