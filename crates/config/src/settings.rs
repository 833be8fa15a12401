// Application settings
// Loaded from ~/.config/agingboard/settings.toml

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use agingboard_aging::ColumnMapping;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read {path}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("cannot parse settings: {0}")]
    Parse(String),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Memoized aggregate lifetime
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_secs: 600 }
    }
}

/// Current dataset lifetime. 0 keeps it until replaced.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    pub ttl_secs: u64,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self { ttl_secs: 3600 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    pub max_bytes: u64,
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_bytes: 100 * 1024 * 1024,
            allowed_extensions: vec!["xlsx".into(), "xls".into(), "csv".into()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// tracing-subscriber EnvFilter directive, used when RUST_LOG is unset
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { filter: "warn".into() }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub columns: ColumnMapping,
    pub cache: CacheSettings,
    pub dataset: DatasetSettings,
    pub upload: UploadSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("agingboard")
            .join("settings.toml")
    }

    /// Load settings from the default location. A missing file means defaults;
    /// a broken one is an error the caller may choose to ignore.
    pub fn discover() -> Result<Self, SettingsError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load an explicitly chosen settings file. Errors are returned, not ignored.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(input: &str) -> Result<Self, SettingsError> {
        let settings: Settings =
            toml::from_str(input).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.columns
            .validate()
            .map_err(|e| SettingsError::Invalid(e.to_string()))?;
        if self.upload.allowed_extensions.is_empty() {
            return Err(SettingsError::Invalid(
                "upload.allowed_extensions must list at least one extension".into(),
            ));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn dataset_ttl(&self) -> Option<Duration> {
        match self.dataset.ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
