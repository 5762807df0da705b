//! Settings structures for brave-agent configuration

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Brave Search web endpoint
pub const DEFAULT_SEARCH_URL: &str = "https://api.search.brave.com/res/v1/web/search";

/// OpenAI-compatible API root
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat model used for query refinement
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub refiner: RefinerSettings,
    pub outgoing: OutgoingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Merge with process environment variables
    pub fn merge_env(&mut self) {
        self.merge_env_with(|key| std::env::var(key).ok());
    }

    /// Merge with variables from an arbitrary lookup
    pub fn merge_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("BRAVE_API_KEY") {
            self.search.api_key = Some(val);
        }
        if let Some(val) = lookup("OPENAI_API_KEY") {
            self.refiner.api_key = Some(val);
        }
        if let Some(val) = lookup("BRAVE_AGENT_SEARCH_URL") {
            self.search.endpoint = val;
        }
        if let Some(val) = lookup("BRAVE_AGENT_RESULT_COUNT") {
            match val.parse() {
                Ok(count) => self.search.count = count,
                Err(_) => warn!("Ignoring invalid BRAVE_AGENT_RESULT_COUNT: {}", val),
            }
        }
        if let Some(val) = lookup("OPENAI_BASE_URL") {
            self.refiner.base_url = val;
        }
        if let Some(val) = lookup("BRAVE_AGENT_MODEL") {
            self.refiner.model = val;
        }
        if let Some(val) = lookup("BRAVE_AGENT_TIMEOUT") {
            match val.parse() {
                Ok(timeout) => self.outgoing.request_timeout = timeout,
                Err(_) => warn!("Ignoring invalid BRAVE_AGENT_TIMEOUT: {}", val),
            }
        }
    }

    /// Resolve the API credentials. The search key is mandatory.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let brave_api_key =
            non_empty(self.search.api_key.as_deref()).ok_or(ConfigError::MissingSearchKey)?;

        Ok(Credentials {
            brave_api_key,
            openai_api_key: non_empty(self.refiner.api_key.as_deref()),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// API tokens resolved once at startup
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub brave_api_key: String,
    pub openai_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("brave_api_key", &"<redacted>")
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Web search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Subscription token for the search API
    pub api_key: Option<String>,
    /// Web search endpoint
    pub endpoint: String,
    /// Number of results requested per query
    pub count: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_SEARCH_URL.to_string(),
            count: 10,
        }
    }
}

/// Query refinement settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinerSettings {
    /// API key for the chat completion provider (none = refinement disabled)
    pub api_key: Option<String>,
    /// API root, `/chat/completions` is appended
    pub base_url: String,
    /// Model identifier
    pub model: String,
}

impl Default for RefinerSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds (0 = no timeout)
    pub request_timeout: f64,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 30.0,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

impl OutgoingSettings {
    /// Request timeout, `None` when unset or not a positive number
    pub fn timeout(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.request_timeout)
            .ok()
            .filter(|d| !d.is_zero())
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}
