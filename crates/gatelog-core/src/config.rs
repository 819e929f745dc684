//! Application configuration management.
//!
//! Handles loading, saving, and validating gatelog configuration including:
//! - Bind address and port for the HTTP server
//! - Data directory (event log) and roster file location
//! - Scan cooldown window
//! - Broadcast channel capacity
//! - Log directory and default log level

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::broadcast::DEFAULT_CHANNEL_CAPACITY;
use crate::error::{Error, Result};
use crate::scan::DEFAULT_COOLDOWN_MS;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatelogConfig {
    /// Address the HTTP server binds to.
    pub bind_address: IpAddr,

    /// Port the HTTP server listens on.
    pub port: u16,

    /// Directory holding the event log.
    pub data_dir: PathBuf,

    /// JSON file holding the student roster.
    pub roster_path: PathBuf,

    /// Minimum elapsed milliseconds between two accepted scans for the
    /// same student.
    pub cooldown_ms: i64,

    /// Ring buffer capacity of the live broadcast channel.
    pub channel_capacity: usize,

    /// Directory receiving rolling log files in production.
    pub log_dir: PathBuf,

    /// Default tracing filter, overridable with `RUST_LOG`.
    pub log_level: String,
}

impl Default for GatelogConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            bind_address: IpAddr::from([0, 0, 0, 0]),
            port: 5000,
            roster_path: data_dir.join("roster.json"),
            data_dir,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            log_dir: default_log_dir(),
            log_level: "info".to_string(),
        }
    }
}

impl GatelogConfig {
    /// Load configuration from disk, falling back to defaults when the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing config file cannot be read, parsed,
    /// or validated.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| Error::ConfigParseError(e.to_string()))?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| Error::ConfigParseError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate field values.
    pub fn validate(&self) -> Result<()> {
        if self.cooldown_ms < 0 {
            return Err(Error::ConfigValidationError(format!(
                "cooldown_ms must be non-negative, got {}",
                self.cooldown_ms
            )));
        }
        if self.channel_capacity == 0 {
            return Err(Error::ConfigValidationError(
                "channel_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Path of the event log file inside the data directory.
    #[must_use]
    pub fn events_path(&self) -> PathBuf {
        self.data_dir.join("events.jsonl")
    }
}

/// Default data directory for the current platform.
///
/// On Linux deployments: `/var/lib/gatelog/`.
/// Elsewhere (development): the platform's per-user data directory.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        PathBuf::from("/var/lib/gatelog")
    }
    #[cfg(not(target_os = "linux"))]
    {
        directories::ProjectDirs::from("", "", "gatelog")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./data"))
    }
}

/// Default log directory for the current platform.
///
/// On Linux deployments: `/var/log/gatelog/`.
/// Elsewhere (development): `logs/` under the per-user data directory.
#[must_use]
pub fn default_log_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        PathBuf::from("/var/log/gatelog")
    }
    #[cfg(not(target_os = "linux"))]
    {
        directories::ProjectDirs::from("", "", "gatelog")
            .map(|dirs| dirs.data_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("./logs"))
    }
}
