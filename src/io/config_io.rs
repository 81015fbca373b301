use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::{AppConfig, CompanionConfig};

/// Overrides `[companion] api_key` when set
pub const API_KEY_ENV: &str = "TIMEWARP_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Read config.toml. `Ok(None)` when the file does not exist.
pub fn read_config(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    Ok(Some(toml::from_str(&text)?))
}

/// Read config.toml, falling back to defaults (and logging why) on any error.
pub fn load_config(path: &Path) -> AppConfig {
    match read_config(path) {
        Ok(Some(config)) => {
            log::info!("loaded config from {}", path.display());
            config
        }
        Ok(None) => AppConfig::default(),
        Err(e) => {
            log::warn!("{}; using default configuration", e);
            AppConfig::default()
        }
    }
}

/// API key for live companion calls: the environment first, then config.
pub fn resolve_api_key(companion: &CompanionConfig) -> Option<String> {
    pick_api_key(std::env::var(API_KEY_ENV).ok(), companion.api_key.as_deref())
}

fn pick_api_key(env: Option<String>, configured: Option<&str>) -> Option<String> {
    env.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .or_else(|| {
            configured
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
        })
}
