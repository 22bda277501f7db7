//! Error types for the Power BI REST client.
//!
//! The client never interprets a failed response: a non-2xx status is
//! surfaced with its status code and raw body so callers decide what it
//! means.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Convenience alias.
pub type PowerBiResult<T> = Result<T, PowerBiError>;

/// Categorised error kinds for Power BI calls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PowerBiErrorKind {
    /// No bearer token configured.
    NotAuthenticated,
    /// Connection, TLS or timeout failure.
    Network,
    /// The service answered with a non-2xx status.
    Status,
    /// The response body could not be decoded.
    Parse,
    /// The request could not be built (bad base URL, header value, ...).
    InvalidRequest,
}

impl fmt::Display for PowerBiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "Not authenticated"),
            Self::Network => write!(f, "Network error"),
            Self::Status => write!(f, "HTTP error"),
            Self::Parse => write!(f, "Parse error"),
            Self::InvalidRequest => write!(f, "Invalid request"),
        }
    }
}

/// Main error type for Power BI calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerBiError {
    pub kind: PowerBiErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl PowerBiError {
    pub fn new(kind: PowerBiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
        }
    }

    /// A non-2xx response, body kept verbatim.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            format!("HTTP {}", status)
        } else {
            format!("HTTP {}: {}", status, body.trim())
        };
        Self {
            kind: PowerBiErrorKind::Status,
            message,
            status_code: Some(status),
        }
    }

    pub fn not_authenticated() -> Self {
        Self::new(
            PowerBiErrorKind::NotAuthenticated,
            "No access token configured for the Power BI client",
        )
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::new(PowerBiErrorKind::Network, msg)
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::new(PowerBiErrorKind::Parse, msg)
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(PowerBiErrorKind::InvalidRequest, msg)
    }

    /// True when the service answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status_code == Some(404)
    }
}

impl fmt::Display for PowerBiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for PowerBiError {}

impl From<reqwest::Error> for PowerBiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {}", err))
        } else if err.is_builder() {
            Self::invalid_request(format!("Could not build request: {}", err))
        } else {
            Self::network(format!("HTTP error: {}", err))
        }
    }
}

impl From<serde_json::Error> for PowerBiError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse: {}", err))
    }
}

impl From<url::ParseError> for PowerBiError {
    fn from(err: url::ParseError) -> Self {
        Self::invalid_request(format!("URL parse error: {}", err))
    }
}
