//! Error types for resource operations.

use std::fmt;

use pbi_api::PowerBiError;
use serde::{Deserialize, Serialize};

pub type ResourceResult<T> = Result<T, ResourceError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResourceErrorKind {
    /// The remote call failed (transport, status or decode).
    Api,
    /// Neither identifier, email address nor the composite ID yield a key.
    IdentifierUnresolved,
    /// No workspace carries the requested name.
    WorkspaceNotFound,
    /// More than one workspace carries the requested name.
    AmbiguousWorkspace,
    /// The resource ID does not have the expected shape.
    InvalidId,
    /// The entity disappeared in the middle of an operation.
    NotFound,
    /// An attribute value is not acceptable.
    Validation,
    /// A ForceNew attribute changed; the resource must be recreated.
    RequiresReplacement,
    /// The resource type does not implement the operation.
    Unsupported,
}

impl fmt::Display for ResourceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api => write!(f, "Power BI API error"),
            Self::IdentifierUnresolved => write!(f, "Identifier unresolved"),
            Self::WorkspaceNotFound => write!(f, "Workspace not found"),
            Self::AmbiguousWorkspace => write!(f, "Ambiguous workspace"),
            Self::InvalidId => write!(f, "Invalid ID"),
            Self::NotFound => write!(f, "Not found"),
            Self::Validation => write!(f, "Validation error"),
            Self::RequiresReplacement => write!(f, "Requires replacement"),
            Self::Unsupported => write!(f, "Unsupported operation"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceError {
    pub kind: ResourceErrorKind,
    pub message: String,
    /// HTTP status of the failed remote call, when there was one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ResourceError {
    pub fn new(kind: ResourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
        }
    }

    pub fn identifier_unresolved() -> Self {
        Self::new(
            ResourceErrorKind::IdentifierUnresolved,
            "could not determine identifier",
        )
    }

    pub fn workspace_not_found(name: &str) -> Self {
        Self::new(
            ResourceErrorKind::WorkspaceNotFound,
            format!("workspace not found: no workspace named '{}'", name),
        )
    }

    pub fn ambiguous_workspace(name: &str, count: usize) -> Self {
        Self::new(
            ResourceErrorKind::AmbiguousWorkspace,
            format!("{} workspaces are named '{}'", count, name),
        )
    }

    pub fn invalid_id(id: &str, expected: &str) -> Self {
        Self::new(
            ResourceErrorKind::InvalidId,
            format!("invalid ID '{}': expected {}", id, expected),
        )
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ResourceErrorKind::NotFound, msg)
    }

    pub fn validation(attribute: &str, msg: impl fmt::Display) -> Self {
        Self::new(ResourceErrorKind::Validation, format!("{}: {}", attribute, msg))
    }

    pub fn requires_replacement(attributes: &[&str]) -> Self {
        Self::new(
            ResourceErrorKind::RequiresReplacement,
            format!(
                "cannot update in place, changed attributes force replacement: {}",
                attributes.join(", ")
            ),
        )
    }

    pub fn unsupported(resource_type: &str, operation: &str) -> Self {
        Self::new(
            ResourceErrorKind::Unsupported,
            format!("{} does not support {}", resource_type, operation),
        )
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for ResourceError {}

impl From<PowerBiError> for ResourceError {
    fn from(err: PowerBiError) -> Self {
        Self {
            kind: ResourceErrorKind::Api,
            message: err.to_string(),
            status_code: err.status_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_keeps_status() {
        let e: ResourceError = PowerBiError::from_status(503, "unavailable").into();
        assert_eq!(e.kind, ResourceErrorKind::Api);
        assert_eq!(e.status_code, Some(503));
        assert!(e.message.contains("unavailable"));
    }

    #[test]
    fn identifier_message() {
        let e = ResourceError::identifier_unresolved();
        assert!(e.to_string().contains("could not determine identifier"));
    }

    #[test]
    fn replacement_lists_attributes() {
        let e = ResourceError::requires_replacement(&["principal_type", "identifier"]);
        assert!(e.message.ends_with("principal_type, identifier"));
    }

    #[test]
    fn kind_serializes_snake_case() {
        let v = serde_json::to_value(ResourceError::workspace_not_found("Proj")).unwrap();
        assert_eq!(v["kind"], "workspace_not_found");
        assert!(v.get("status_code").is_none());
    }
}
