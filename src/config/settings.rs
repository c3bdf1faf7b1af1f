//! Application settings and paths.
//!
//! Settings live in an XDG-compliant configuration directory as JSON.
//! Every field has a default, so a partial file is fine.

use crate::cli::OutputFormat;
use crate::error::{ConfigError, ConfigResult};
use crate::scanner::DEFAULT_CONCURRENCY;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portsweep)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the platform directories. Nothing is created on disk.
    pub fn discover() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "portsweep", "portsweep")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Port specification scanned when `--ports` is not given.
    pub default_ports: String,
    /// Maximum probes in flight.
    pub default_concurrency: usize,
    /// Per-probe connect timeout in milliseconds.
    pub default_timeout_ms: u64,
    /// Probes per second, 0 for unlimited.
    pub default_rate_limit: u32,
    /// Default output format.
    pub default_output_format: OutputFormat,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_ports: "1-1024".to_string(),
            default_concurrency: DEFAULT_CONCURRENCY,
            default_timeout_ms: 1000,
            default_rate_limit: 0,
            default_output_format: OutputFormat::Plain,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, or defaults if there is no file.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::discover()?.settings_file();

        if !file.exists() {
            debug!(path = %file.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file, which must exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Save settings to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.default_ports, "1-1024");
        assert_eq!(settings.default_concurrency, 100);
        assert_eq!(settings.default_timeout_ms, 1000);
        assert_eq!(settings.default_output_format, OutputFormat::Plain);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "default_ports": "22,80", "default_output_format": "json" }"#)
            .unwrap();

        let settings = AppSettings::load_from(&path).unwrap();
        assert_eq!(settings.default_ports, "22,80");
        assert_eq!(settings.default_output_format, OutputFormat::Json);
        assert_eq!(settings.default_timeout_ms, 1000);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = AppSettings {
            default_concurrency: 1,
            ..AppSettings::default()
        };

        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_missing_or_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            AppSettings::load_from(&missing),
            Err(ConfigError::ReadFailed { .. })
        ));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            AppSettings::load_from(&broken),
            Err(ConfigError::InvalidFormat(_))
        ));
    }
}
