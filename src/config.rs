use crate::app::lightrag_client::ServiceError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const API_KEY_ENV: &str = "LIGHTRAG_API_KEY";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ServerProfile {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl ServerProfile {
    pub fn base_url(&self) -> Result<Url, ServiceError> {
        let url = Url::parse(&self.url).map_err(|_| ServiceError::InvalidUrl(self.url.clone()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ServiceError::InvalidUrl(self.url.clone())),
        }
    }
}

fn default_notification_ttl_secs() -> u64 {
    4
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_notification_ttl_secs")]
    pub notification_ttl_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(rename = "servers", default)]
    pub profiles: Vec<ServerProfile>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            notification_ttl_secs: default_notification_ttl_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            profiles: vec![ServerProfile {
                name: "Default Local".to_string(),
                url: "http://127.0.0.1:9621".to_string(),
                api_key: None,
            }],
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("lazyrag").join("lazyrag.toml"))
    }

    /// Loads the config from `path` (or the platform default). A missing file is
    /// created with defaults; unreadable or invalid files fall back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let config_file_path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) => p,
            None => {
                tracing::warn!(
                    "could not determine config directory, using default in-memory config"
                );
                return Self::default();
            }
        };

        if !config_file_path.exists() {
            let default_cfg = Self::default();
            if let Err(e) = default_cfg.write_to(&config_file_path) {
                tracing::warn!(
                    path = %config_file_path.display(),
                    error = %e,
                    "failed to write default config"
                );
            } else {
                tracing::info!(path = %config_file_path.display(), "created default config");
            }
            return default_cfg;
        }

        match fs::read_to_string(&config_file_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(
                        path = %config_file_path.display(),
                        error = %e,
                        "failed to parse config file, using default in-memory config"
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(
                    path = %config_file_path.display(),
                    error = %e,
                    "failed to read config file, using default in-memory config"
                );
                Self::default()
            }
        }
    }

    fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Picks the named profile, or the first one when no name is given.
    /// The `LIGHTRAG_API_KEY` environment variable replaces the profile's key.
    pub fn select_profile(&self, name: Option<&str>) -> Option<ServerProfile> {
        let mut profile = match name {
            Some(name) => self.profiles.iter().find(|p| p.name == name)?.clone(),
            None => self.profiles.first()?.clone(),
        };
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                profile.api_key = Some(key);
            }
        }
        Some(profile)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
