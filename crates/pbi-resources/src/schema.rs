//! Attribute schemas and value validation.
//!
//! Enumerated attributes are parsed into typed values before any remote call
//! is issued, so a bad `group_user_access_right` never reaches the service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ResourceError, ResourceResult};

// ─── Enumerations ───────────────────────────────────────────────────

/// Access level granted to a principal within a workspace.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AccessRight {
    Admin,
    Contributor,
    Member,
    Viewer,
    None,
}

impl AccessRight {
    pub const ALL: [AccessRight; 5] = [
        Self::Admin,
        Self::Contributor,
        Self::Member,
        Self::Viewer,
        Self::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Contributor => "Contributor",
            Self::Member => "Member",
            Self::Viewer => "Viewer",
            Self::None => "None",
        }
    }
}

impl fmt::Display for AccessRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessRight {
    type Err = ResourceError;

    fn from_str(s: &str) -> ResourceResult<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| {
                ResourceError::validation(
                    "group_user_access_right",
                    format!(
                        "expected one of Admin, Contributor, Member, Viewer, None, got '{}'",
                        s
                    ),
                )
            })
    }
}

/// Kind of identity being granted access.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PrincipalType {
    User,
    App,
    Group,
}

impl PrincipalType {
    pub const ALL: [PrincipalType; 3] = [Self::User, Self::App, Self::Group];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::App => "App",
            Self::Group => "Group",
        }
    }
}

impl fmt::Display for PrincipalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrincipalType {
    type Err = ResourceError;

    fn from_str(s: &str) -> ResourceResult<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                ResourceError::validation(
                    "principal_type",
                    format!("expected one of User, App, Group, got '{}'", s),
                )
            })
    }
}

/// `email_address` must look like an address.
pub fn validate_email(value: &str) -> ResourceResult<()> {
    if value.contains('@') {
        Ok(())
    } else {
        Err(ResourceError::validation(
            "email_address",
            "must be an email address",
        ))
    }
}

pub fn require_non_empty(attribute: &str, value: &str) -> ResourceResult<()> {
    if value.is_empty() {
        Err(ResourceError::validation(attribute, "is required"))
    } else {
        Ok(())
    }
}

// ─── Schema description ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Required,
    Optional,
    Computed,
    OptionalComputed,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AttributeSchema {
    pub name: &'static str,
    pub presence: Presence,
    /// Changing the value recreates the resource.
    pub force_new: bool,
    pub description: &'static str,
}

impl AttributeSchema {
    pub fn new(name: &'static str, presence: Presence, description: &'static str) -> Self {
        Self {
            name,
            presence,
            force_new: false,
            description,
        }
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub description: &'static str,
    pub importable: bool,
    pub attributes: Vec<AttributeSchema>,
}

impl ResourceSchema {
    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }
}
