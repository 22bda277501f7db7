//! Provider configuration.
//!
//! Values come from defaults, then an optional JSON file named by
//! `POWERBI_CONFIG`, then individual `POWERBI_*` environment variables.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ProviderResult};

pub const ENV_CONFIG_FILE: &str = "POWERBI_CONFIG";
pub const ENV_API_URL: &str = "POWERBI_API_URL";
pub const ENV_ACCESS_TOKEN: &str = "POWERBI_ACCESS_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "POWERBI_TIMEOUT_SECS";
pub const ENV_LOG_FORMAT: &str = "POWERBI_LOG_FORMAT";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ProviderError;

    fn from_str(s: &str) -> ProviderResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ProviderError::config(format!(
                "log_format must be 'text' or 'json', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_base_url: String,
    /// Bearer token for the Power BI REST API.
    pub access_token: Option<SecretString>,
    pub timeout_secs: u64,
    pub log_format: LogFormat,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base_url: pbi_api::types::POWERBI_API_BASE.to_string(),
            access_token: None,
            timeout_secs: pbi_api::client::DEFAULT_TIMEOUT_SECS,
            log_format: LogFormat::Text,
        }
    }
}

impl ProviderConfig {
    /// Load from the process environment.
    pub fn load() -> ProviderResult<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment.
    pub fn load_with<F>(lookup: F) -> ProviderResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_CONFIG_FILE).filter(|p| !p.is_empty()) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            config.api_base_url = url;
        }
        if let Some(token) = lookup(ENV_ACCESS_TOKEN).filter(|v| !v.is_empty()) {
            config.access_token = Some(SecretString::new(token));
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.is_empty()) {
            config.timeout_secs = secs.trim().parse().map_err(|_| {
                ProviderError::config(format!("{} must be a number of seconds", ENV_TIMEOUT_SECS))
            })?;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT).filter(|v| !v.is_empty()) {
            config.log_format = format.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ProviderResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            ProviderError::config(format!("invalid config file {}: {}", path.display(), e))
        })
    }

    fn validate(&self) -> ProviderResult<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(ProviderError::config("api_base_url must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(ProviderError::config("timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    /// The access token, or a configuration error when none was supplied.
    pub fn access_token(&self) -> ProviderResult<&SecretString> {
        self.access_token.as_ref().ok_or_else(|| {
            ProviderError::config(format!(
                "no access token configured; set {} or access_token in the config file",
                ENV_ACCESS_TOKEN
            ))
        })
    }
}
