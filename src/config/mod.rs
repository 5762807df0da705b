//! Configuration module for brave-agent
//!
//! Handles loading settings from YAML files, `.env` and environment variables.

mod settings;

pub use settings::*;

use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable pointing at a settings file
pub const SETTINGS_PATH_ENV: &str = "BRAVE_AGENT_SETTINGS_PATH";

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Brave API key not found in environment variables")]
    MissingSearchKey,
    #[error("Could not read settings file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid {field} URL {value:?}: {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Load `.env` into the process environment. Already-set variables win.
///
/// Returns the loaded file, or `None` when there is no `.env`.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Load settings from file or use defaults, then apply the environment
pub fn load() -> Result<Settings, ConfigError> {
    let mut settings = match settings_path() {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(&path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };
    settings.merge_env();
    Ok(settings)
}

/// Find the first settings file that exists
fn settings_path() -> Option<PathBuf> {
    // Check environment variable first
    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
        warn!(
            "{} points to missing file {}",
            SETTINGS_PATH_ENV,
            path.display()
        );
    }

    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("brave-agent/settings.yml"));
    }

    paths.into_iter().find(|p| p.exists())
}
