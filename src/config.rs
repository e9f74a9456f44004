use crate::utils::error::{AppError, AppResult};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_KEY_ENV: &str = "RIZE_API_KEY";
pub const VAULT_PATH_ENV: &str = "OBSIDIAN_VAULT_PATH";

pub const DEFAULT_API_URL: &str = "https://api.rize.io/api/v1/graphql";
pub const DEFAULT_DAILY_LOGS_PATH: &str = "00_COCKPIT/Daily_Logs";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Optional settings as they appear in the YAML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub vault_path: Option<PathBuf>,
    pub daily_logs_path: Option<PathBuf>,
    pub default_days_lookback: Option<u32>,
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn read(path: &Path) -> AppResult<Self> {
        if !path.is_file() {
            return Err(AppError::Configuration(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        Self::parse(&content).map_err(|e| {
            AppError::Configuration(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    pub fn parse(content: &str) -> Result<Self, serde_yaml_ng::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(content)
    }
}

/// Fully resolved run settings, built once at startup.
#[derive(Debug)]
pub struct Settings {
    /// Only commands that touch notes need it; see [`Settings::daily_logs_dir`].
    pub vault_path: Option<PathBuf>,
    pub daily_logs_subpath: PathBuf,
    pub default_days_lookback: u32,
    pub api_key: SecretString,
    pub api_url: String,
    pub request_timeout: Duration,
}

impl Settings {
    /// Load settings from the given config file (or the default location when
    /// present) and the process environment.
    pub fn load(config_path: Option<&Path>) -> AppResult<Self> {
        let file = match config_path {
            Some(path) => FileConfig::read(path)?,
            None => match Self::config_file_path() {
                Some(path) if path.is_file() => FileConfig::read(&path)?,
                _ => FileConfig::default(),
            },
        };

        Self::resolve(file, |name| std::env::var(name).ok())
    }

    /// Combine file values, environment and defaults. The file wins over the
    /// environment, which wins over built-in defaults.
    pub fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let api_key = non_empty(file.api_key)
            .or_else(|| non_empty(env(API_KEY_ENV)))
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "API key not found. Set api_key in the config file or the {} environment variable",
                    API_KEY_ENV
                ))
            })?;

        let vault_path = file
            .vault_path
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| non_empty(env(VAULT_PATH_ENV)).map(PathBuf::from));

        let daily_logs_subpath = file
            .daily_logs_path
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DAILY_LOGS_PATH));

        let settings = Self {
            vault_path,
            daily_logs_subpath,
            default_days_lookback: file.default_days_lookback.unwrap_or(0),
            api_key: SecretString::from(api_key),
            api_url: non_empty(file.api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            request_timeout: Duration::from_secs(
                file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.daily_logs_subpath.is_absolute() {
            return Err(AppError::Configuration(format!(
                "daily_logs_path must be relative to the vault, got {}",
                self.daily_logs_subpath.display()
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(AppError::Configuration(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(AppError::Configuration(format!(
                "api_url must be an http(s) URL, got {}",
                self.api_url
            )));
        }

        Ok(())
    }

    /// Directory holding the daily notes. Errors when no vault is configured.
    pub fn daily_logs_dir(&self) -> AppResult<PathBuf> {
        let vault = self.vault_path.as_ref().ok_or_else(|| {
            AppError::Configuration(format!(
                "Vault path not found. Set vault_path in the config file or the {} environment variable",
                VAULT_PATH_ENV
            ))
        })?;
        Ok(vault.join(&self.daily_logs_subpath))
    }

    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rize-sync").join("config.yaml"))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
