//! Runtime configuration loaded from `config.toml`.
//!
//! Every field has a default, so a missing default config file is not an
//! error. An explicitly requested file that cannot be read or parsed is.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Env var overriding `[intent].endpoint`. Empty disables the remote service.
pub const INTENT_URL_ENV: &str = "JARVIS_INTENT_URL";

const CONFIG_FILE: &str = "config.toml";
const STORE_FILE: &str = "jarvis.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("intent.{key} must be greater than zero")]
    ZeroTimeout { key: &'static str },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub intent: IntentConfig,
    pub storage: StorageConfig,
}

/// Remote intent classification settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    /// Full URL of the classification endpoint. `None` = local only.
    pub endpoint: Option<String>,
    /// Whole-request timeout.
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 5,
            connect_timeout_secs: 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the store database. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load from `path`, or from the platform config dir when `None`.
    ///
    /// The env override is applied after the file is read.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::read(p)?,
            None => match default_config_path() {
                Some(p) if p.exists() => Self::read(&p)?,
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };
        config.apply_env_overrides(std::env::var(INTENT_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!(path = %path.display(), "Reading config file");
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_toml(&content, path)
    }

    fn apply_env_overrides(&mut self, intent_url: Option<String>) {
        if let Some(url) = intent_url {
            let url = url.trim();
            self.intent.endpoint = (!url.is_empty()).then(|| url.to_string());
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.intent.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout { key: "timeout_secs" });
        }
        if self.intent.connect_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout {
                key: "connect_timeout_secs",
            });
        }
        Ok(())
    }

    /// Path of the SQLite store file.
    pub fn store_path(&self) -> PathBuf {
        let dir = self
            .storage
            .data_dir
            .clone()
            .or_else(|| project_dirs().map(|d| d.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from(".jarvis"));
        dir.join(STORE_FILE)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "jarvis")
}

/// `<config dir>/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join(CONFIG_FILE))
}
