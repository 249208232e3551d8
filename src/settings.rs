//! Application configuration and persisted preferences.
//!
//! Config precedence: defaults < config.toml < environment (`CONVERTER_*`).
//! Preferences (theme, language) live in a separate JSON file that the app
//! rewrites whenever the user changes them.
use crate::error::SettingsError;
use crate::i18n::DEFAULT_LANGUAGE;
use anyhow::{ensure, Context, Result};
use directories::{ProjectDirs, UserDirs};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAX_CONCURRENT_CONVERSIONS: usize = 16;
pub const LARGE_FILE_WARNING_BYTES: u64 = 100 * 1024 * 1024;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "universal-converter")
}

pub fn config_path() -> PathBuf {
    project_dirs()
        .map(|p| p.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("universal-converter.toml"))
}

pub fn preferences_path() -> PathBuf {
    project_dirs()
        .map(|p| p.config_dir().join("preferences.json"))
        .unwrap_or_else(|| PathBuf::from("universal-converter-preferences.json"))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the conversion backend
    pub server_url: String,
    /// Conversions in flight during "convert all"
    pub max_concurrent_conversions: usize,
    /// Files above this size upload with a warning
    pub large_file_warning_bytes: u64,
    pub request_timeout_secs: u64,
    /// Where downloads are saved; the user download folder when unset
    pub download_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".to_string(),
            max_concurrent_conversions: 2,
            large_file_warning_bytes: LARGE_FILE_WARNING_BYTES,
            request_timeout_secs: 300,
            download_dir: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("CONVERTER_"))
            .extract()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.server_url.trim().is_empty(),
            "server_url must not be empty"
        );
        ensure!(
            (1..=MAX_CONCURRENT_CONVERSIONS).contains(&self.max_concurrent_conversions),
            "max_concurrent_conversions must be between 1 and {}",
            MAX_CONCURRENT_CONVERSIONS
        );
        ensure!(
            self.request_timeout_secs > 0,
            "request_timeout_secs must be positive"
        );
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(|| UserDirs::new().and_then(|u| u.download_dir().map(Path::to_path_buf)))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Survives restarts. Nothing else the user does is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub language: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Preferences {
    /// Missing or unreadable files yield defaults.
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Ignoring corrupt preferences at {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::debug!("Saved preferences to {}", path.display());
        Ok(())
    }
}
