//! Identity resolution for resources the service has no single ID for.
//!
//! A workspace membership is persisted as `"<workspace-name>/<principal-key>"`.
//! Internally it is always handled as a [`MembershipId`]; the string form only
//! exists at the state boundary and must stay byte-compatible with state
//! written by earlier releases.

use std::fmt;

use log::warn;
use pbi_api::{Group, PowerBiApi};

use crate::error::{ResourceError, ResourceResult};

/// Separator between the two halves of a composite ID.
pub const ID_SEPARATOR: char = '/';

/// Split on the first separator. `None` when there is no separator.
pub fn split_composite(id: &str) -> Option<(&str, &str)> {
    id.split_once(ID_SEPARATOR)
}

/// Structured form of a membership's persisted ID (format version 1).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MembershipId {
    pub workspace_name: String,
    pub principal_key: String,
}

impl MembershipId {
    pub fn new(workspace_name: impl Into<String>, principal_key: impl Into<String>) -> Self {
        Self {
            workspace_name: workspace_name.into(),
            principal_key: principal_key.into(),
        }
    }

    /// Everything after the first `/` belongs to the principal key, so
    /// workspace names containing `/` do not round-trip.
    pub fn parse(id: &str) -> Option<Self> {
        split_composite(id).map(|(name, key)| Self::new(name, key))
    }
}

impl fmt::Display for MembershipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.workspace_name, ID_SEPARATOR, self.principal_key
        )
    }
}

/// The key a principal is addressed by: `identifier`, else `email`, else the
/// key recovered from the composite ID.
pub fn resolve_principal_key(
    identifier: &str,
    email: &str,
    fallback_from_id: Option<&str>,
) -> ResourceResult<String> {
    [Some(identifier), Some(email), fallback_from_id]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.is_empty())
        .map(str::to_string)
        .ok_or_else(ResourceError::identifier_unresolved)
}

/// Look a workspace up by display name. Names are not unique, so zero and
/// several matches are both errors.
pub async fn find_workspace_by_name(api: &dyn PowerBiApi, name: &str) -> ResourceResult<Group> {
    let mut matches: Vec<Group> = api
        .get_groups_by_name(name)
        .await?
        .into_iter()
        .filter(|g| g.name == name)
        .collect();
    match matches.len() {
        0 => Err(ResourceError::workspace_not_found(name)),
        1 => Ok(matches.remove(0)),
        n => {
            warn!("workspace name '{}' matches {} workspaces", name, n);
            Err(ResourceError::ambiguous_workspace(name, n))
        }
    }
}
