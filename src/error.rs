use std::fmt;

use pbi_api::PowerBiError;
use pbi_resources::ResourceError;
use serde::{Deserialize, Serialize};

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    Config,
    Logging,
    /// The request could not be read or decoded.
    Protocol,
    UnknownResourceType,
    Client,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => write!(f, "Configuration error"),
            Self::Logging => write!(f, "Logging error"),
            Self::Protocol => write!(f, "Protocol error"),
            Self::UnknownResourceType => write!(f, "Unknown resource type"),
            Self::Client => write!(f, "Client error"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Config, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Protocol, message)
    }

    pub fn unknown_resource_type(resource_type: &str) -> Self {
        Self::new(
            ProviderErrorKind::UnknownResourceType,
            format!("unknown resource type '{}'", resource_type),
        )
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for ProviderError {}

impl From<std::io::Error> for ProviderError {
    fn from(err: std::io::Error) -> Self {
        Self::protocol(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::protocol(format!("invalid JSON: {}", err))
    }
}

impl From<PowerBiError> for ProviderError {
    fn from(err: PowerBiError) -> Self {
        Self::new(ProviderErrorKind::Client, err.to_string())
    }
}

/// Error as reported on the host protocol: a stable kind string and a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

fn kind_string<K: Serialize>(kind: K) -> String {
    match serde_json::to_value(kind) {
        Ok(serde_json::Value::String(s)) => s,
        _ => "unknown".to_string(),
    }
}

impl From<ResourceError> for ErrorBody {
    fn from(err: ResourceError) -> Self {
        Self {
            kind: kind_string(err.kind),
            message: err.message,
            status_code: err.status_code,
        }
    }
}

impl From<ProviderError> for ErrorBody {
    fn from(err: ProviderError) -> Self {
        Self {
            kind: kind_string(err.kind),
            message: err.message,
            status_code: None,
        }
    }
}
