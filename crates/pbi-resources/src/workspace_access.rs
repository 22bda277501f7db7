//! `powerbi_workspace_access` – one principal's access grant on a workspace.
//!
//! The service has no ID for a membership, so the resource is tracked by the
//! composite `"<workspace-name>/<principal-key>"` and re-resolved on every
//! operation. Computed attributes always come from the membership list, never
//! from the request that was just sent.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use pbi_api::types::non_empty;
use pbi_api::{AddGroupUserRequest, GroupUser, PowerBiApi, UpdateGroupUserRequest};
use serde::{Deserialize, Serialize};

use crate::error::{ResourceError, ResourceErrorKind, ResourceResult};
use crate::identity::{find_workspace_by_name, resolve_principal_key, MembershipId};
use crate::resource::{ReadOutcome, Resource, Tracked};
use crate::schema::{
    require_non_empty, validate_email, AccessRight, AttributeSchema, Presence, PrincipalType,
    ResourceSchema,
};

pub const TYPE_NAME: &str = "powerbi_workspace_access";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceAccessState {
    #[serde(default)]
    pub workspace_id: String,
    #[serde(default)]
    pub group_user_access_right: Option<AccessRight>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub principal_type: Option<PrincipalType>,
}

impl WorkspaceAccessState {
    /// Overwrite everything the service is authoritative for.
    ///
    /// A principal type outside User/App/Group (the service also reports
    /// `None`) leaves the prior value in place.
    fn absorb(&mut self, workspace_id: &str, user: &GroupUser) -> ResourceResult<()> {
        self.group_user_access_right = Some(user.group_user_access_right.parse()?);
        match user.principal_type.parse::<PrincipalType>() {
            Ok(principal_type) => self.principal_type = Some(principal_type),
            Err(_) => warn!(
                "unexpected principal type '{}' for {}, keeping {:?}",
                user.principal_type, user.identifier, self.principal_type
            ),
        }
        self.display_name = user.display_name.clone();
        self.email_address = user.email_address.clone();
        self.identifier = user.identifier.clone();
        self.workspace_id = workspace_id.to_string();
        Ok(())
    }
}

/// Attributes that changed between `prior` and `planned` and cannot be
/// updated in place.
///
/// `identifier` and `email_address` may be filled in by the service, so an
/// empty planned value is not a change.
pub fn requires_replacement(
    prior: &WorkspaceAccessState,
    planned: &WorkspaceAccessState,
) -> Vec<&'static str> {
    let mut changed = Vec::new();
    if !prior.workspace_id.is_empty() && prior.workspace_id != planned.workspace_id {
        changed.push("workspace_id");
    }
    if prior.principal_type.is_some()
        && planned.principal_type.is_some()
        && prior.principal_type != planned.principal_type
    {
        changed.push("principal_type");
    }
    if !planned.email_address.is_empty()
        && !planned.email_address.eq_ignore_ascii_case(&prior.email_address)
    {
        changed.push("email_address");
    }
    if !planned.identifier.is_empty() && planned.identifier != prior.identifier {
        changed.push("identifier");
    }
    changed
}

fn matches_key(user: &GroupUser, key: &str) -> bool {
    user.identifier == key || user.email_address.eq_ignore_ascii_case(key)
}

pub struct WorkspaceAccessResource {
    api: Arc<dyn PowerBiApi>,
}

impl WorkspaceAccessResource {
    pub fn new(api: Arc<dyn PowerBiApi>) -> Self {
        Self { api }
    }

    /// Workspace ID from state, else looked up by the name half of `id`.
    async fn resolve_workspace_id(
        &self,
        id: &str,
        state: &WorkspaceAccessState,
    ) -> ResourceResult<String> {
        if !state.workspace_id.is_empty() {
            return Ok(state.workspace_id.clone());
        }
        let parsed = MembershipId::parse(id)
            .filter(|m| !m.workspace_name.is_empty())
            .ok_or_else(|| ResourceError::invalid_id(id, "<workspace-name>/<principal-key>"))?;
        let workspace = find_workspace_by_name(self.api.as_ref(), &parsed.workspace_name).await?;
        debug!(
            "resolved workspace '{}' to {}",
            parsed.workspace_name, workspace.id
        );
        Ok(workspace.id)
    }

    fn principal_key(id: &str, state: &WorkspaceAccessState) -> ResourceResult<String> {
        let parsed = MembershipId::parse(id);
        resolve_principal_key(
            &state.identifier,
            &state.email_address,
            parsed.as_ref().map(|m| m.principal_key.as_str()),
        )
    }
}

#[async_trait]
impl Resource for WorkspaceAccessResource {
    type State = WorkspaceAccessState;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema {
            type_name: TYPE_NAME,
            description: "User, app or group access to a Power BI workspace.",
            importable: true,
            attributes: vec![
                AttributeSchema::new(
                    "workspace_id",
                    Presence::Required,
                    "Workspace ID to which access is given.",
                )
                .force_new(),
                AttributeSchema::new(
                    "group_user_access_right",
                    Presence::Required,
                    "Access level: Admin, Contributor, Member, Viewer or None.",
                ),
                AttributeSchema::new(
                    "display_name",
                    Presence::OptionalComputed,
                    "Display name of the principal.",
                ),
                AttributeSchema::new(
                    "email_address",
                    Presence::Optional,
                    "Email address of the user.",
                )
                .force_new(),
                AttributeSchema::new(
                    "identifier",
                    Presence::OptionalComputed,
                    "Identifier of the principal.",
                )
                .force_new(),
                AttributeSchema::new(
                    "principal_type",
                    Presence::Required,
                    "Principal type: User, App or Group.",
                )
                .force_new(),
            ],
        }
    }

    fn validate(&self, config: &WorkspaceAccessState) -> ResourceResult<()> {
        require_non_empty("workspace_id", &config.workspace_id)?;
        if config.group_user_access_right.is_none() {
            return Err(ResourceError::validation("group_user_access_right", "is required"));
        }
        if config.principal_type.is_none() {
            return Err(ResourceError::validation("principal_type", "is required"));
        }
        if !config.email_address.is_empty() {
            validate_email(&config.email_address)?;
        }
        Ok(())
    }

    async fn create(
        &self,
        config: WorkspaceAccessState,
    ) -> ResourceResult<Tracked<WorkspaceAccessState>> {
        self.validate(&config)?;
        let key = resolve_principal_key(&config.identifier, &config.email_address, None)?;
        let access_right = config
            .group_user_access_right
            .map(|r| r.to_string())
            .unwrap_or_default();

        let request = AddGroupUserRequest {
            group_user_access_right: access_right,
            display_name: non_empty(&config.display_name),
            email_address: non_empty(&config.email_address),
            identifier: non_empty(&config.identifier),
            principal_type: config.principal_type.map(|p| p.to_string()),
        };
        self.api.add_group_user(&config.workspace_id, &request).await?;

        let workspace = self.api.get_group(&config.workspace_id).await?;
        let id = MembershipId::new(workspace.name, key).to_string();
        info!("{} created {}", TYPE_NAME, id);

        match self.read(&id, config).await? {
            ReadOutcome::Found(tracked) => Ok(tracked),
            ReadOutcome::Gone => Err(ResourceError::not_found(format!(
                "{} was added but is not in the workspace's user list",
                id
            ))),
        }
    }

    async fn read(
        &self,
        id: &str,
        state: WorkspaceAccessState,
    ) -> ResourceResult<ReadOutcome<WorkspaceAccessState>> {
        let key = Self::principal_key(id, &state)?;

        let (workspace_id, workspace_name) = if state.workspace_id.is_empty() {
            let parsed = MembershipId::parse(id)
                .filter(|m| !m.workspace_name.is_empty())
                .ok_or_else(|| {
                    ResourceError::invalid_id(id, "<workspace-name>/<principal-key>")
                })?;
            let workspace =
                find_workspace_by_name(self.api.as_ref(), &parsed.workspace_name).await?;
            (workspace.id, workspace.name)
        } else {
            match self.api.get_group(&state.workspace_id).await {
                Ok(workspace) => (workspace.id, workspace.name),
                Err(e) if e.is_not_found() => {
                    warn!("workspace {} no longer exists", state.workspace_id);
                    return Ok(ReadOutcome::Gone);
                }
                Err(e) => return Err(e.into()),
            }
        };

        let users = self.api.get_group_users(&workspace_id).await?;
        let Some(user) = users.iter().find(|u| matches_key(u, &key)) else {
            warn!("{} not found in workspace {}", key, workspace_id);
            return Ok(ReadOutcome::Gone);
        };

        let mut refreshed = state;
        refreshed.absorb(&workspace_id, user)?;
        // Key from the server's entry, so the ID is stable across reads.
        let key =
            resolve_principal_key(&refreshed.identifier, &refreshed.email_address, Some(&key))?;
        let id = MembershipId::new(workspace_name, key).to_string();
        Ok(ReadOutcome::Found(Tracked::new(id, refreshed)))
    }

    async fn update(
        &self,
        id: &str,
        prior: WorkspaceAccessState,
        planned: WorkspaceAccessState,
    ) -> ResourceResult<Tracked<WorkspaceAccessState>> {
        let forced = requires_replacement(&prior, &planned);
        if !forced.is_empty() {
            return Err(ResourceError::requires_replacement(&forced));
        }
        if planned.group_user_access_right.is_none() {
            return Err(ResourceError::validation("group_user_access_right", "is required"));
        }
        if planned.principal_type.is_none() {
            return Err(ResourceError::validation("principal_type", "is required"));
        }

        let mut target = planned;
        if target.identifier.is_empty() {
            target.identifier = prior.identifier.clone();
        }
        if target.email_address.is_empty() {
            target.email_address = prior.email_address.clone();
        }
        if target.workspace_id.is_empty() {
            target.workspace_id = self.resolve_workspace_id(id, &prior).await?;
        }

        if prior.group_user_access_right != target.group_user_access_right {
            let request = UpdateGroupUserRequest {
                group_user_access_right: target
                    .group_user_access_right
                    .map(|r| r.to_string())
                    .unwrap_or_default(),
                email_address: non_empty(&target.email_address),
                identifier: non_empty(&target.identifier),
                principal_type: target.principal_type.map(|p| p.to_string()),
            };
            self.api
                .update_group_user(&target.workspace_id, &request)
                .await?;
            info!(
                "{} {} access right set to {}",
                TYPE_NAME, id, request.group_user_access_right
            );
        }

        match self.read(id, target).await? {
            ReadOutcome::Found(tracked) => Ok(tracked),
            ReadOutcome::Gone => Err(ResourceError::not_found(format!(
                "{} disappeared during update",
                id
            ))),
        }
    }

    async fn delete(&self, id: &str, state: WorkspaceAccessState) -> ResourceResult<()> {
        let key = Self::principal_key(id, &state)?;
        let workspace_id = match self.resolve_workspace_id(id, &state).await {
            Ok(workspace_id) => workspace_id,
            Err(e) if e.kind == ResourceErrorKind::WorkspaceNotFound => {
                warn!("{}: {}, nothing to delete", id, e.message);
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        match self.api.delete_user_in_group(&workspace_id, &key).await {
            Ok(()) => {
                info!("{} deleted {}", TYPE_NAME, id);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                warn!("{} already absent from workspace {}", key, workspace_id);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbi_api::{PowerBiError, SimulatedPowerBi};

    async fn setup() -> (Arc<SimulatedPowerBi>, WorkspaceAccessResource) {
        let sim = Arc::new(SimulatedPowerBi::new());
        sim.seed_group("W1", "Proj").await;
        let resource = WorkspaceAccessResource::new(sim.clone());
        (sim, resource)
    }

    fn user_config(email: &str, right: AccessRight) -> WorkspaceAccessState {
        WorkspaceAccessState {
            workspace_id: "W1".into(),
            group_user_access_right: Some(right),
            email_address: email.into(),
            principal_type: Some(PrincipalType::User),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_builds_composite_id_and_reads_back() {
        let (_sim, res) = setup().await;
        let created = res
            .create(user_config("a@b.com", AccessRight::Admin))
            .await
            .unwrap();
        assert_eq!(created.id, "Proj/a@b.com");
        assert_eq!(created.state.group_user_access_right, Some(AccessRight::Admin));
        assert_eq!(created.state.display_name, "a");

        let read = res.read(&created.id, created.state.clone()).await.unwrap();
        let read = read.found().unwrap();
        assert_eq!(read.state.group_user_access_right, Some(AccessRight::Admin));
        assert_eq!(read.id, created.id);
    }

    #[tokio::test]
    async fn create_then_read_keeps_principal_key_for_every_type() {
        let (_sim, res) = setup().await;
        let cases = [
            (PrincipalType::User, "", "u@contoso.com"),
            (PrincipalType::App, "1f69e798-5852-4fdd-ab01-33bb14b6e934", ""),
            (PrincipalType::Group, "d4f5c3a2-0000-4000-8000-000000000001", ""),
        ];
        for (principal_type, identifier, email) in cases {
            let config = WorkspaceAccessState {
                workspace_id: "W1".into(),
                group_user_access_right: Some(AccessRight::Viewer),
                identifier: identifier.into(),
                email_address: email.into(),
                principal_type: Some(principal_type),
                ..Default::default()
            };
            let key = resolve_principal_key(identifier, email, None).unwrap();
            let created = res.create(config).await.unwrap();
            let read = res
                .read(&created.id, created.state)
                .await
                .unwrap()
                .found()
                .unwrap();
            let read_key = resolve_principal_key(
                &read.state.identifier,
                &read.state.email_address,
                None,
            )
            .unwrap();
            assert_eq!(read_key, key);
            assert_eq!(read.state.principal_type, Some(principal_type));
            let parsed = MembershipId::parse(&read.id).unwrap();
            assert_eq!(parsed, MembershipId::new("Proj", key));
        }
    }

    #[tokio::test]
    async fn create_without_any_key_fails_before_remote_call() {
        let (sim, res) = setup().await;
        let mut config = user_config("", AccessRight::Admin);
        config.identifier.clear();
        let e = res.create(config).await.unwrap_err();
        assert_eq!(e.kind, ResourceErrorKind::IdentifierUnresolved);
        assert!(sim.calls().await.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_bad_email_before_remote_call() {
        let (sim, res) = setup().await;
        let e = res
            .create(user_config("not-an-address", AccessRight::Admin))
            .await
            .unwrap_err();
        assert_eq!(e.kind, ResourceErrorKind::Validation);
        assert!(e.message.contains("email_address"));
        assert!(sim.calls().await.is_empty());
    }

    #[tokio::test]
    async fn create_requires_principal_type() {
        let (_sim, res) = setup().await;
        let mut config = user_config("a@b.com", AccessRight::Admin);
        config.principal_type = None;
        let e = res.create(config).await.unwrap_err();
        assert!(e.message.contains("principal_type"));
    }

    #[tokio::test]
    async fn create_propagates_api_errors() {
        let (sim, res) = setup().await;
        sim.fail_next(PowerBiError::from_status(401, "token expired"))
            .await;
        let e = res
            .create(user_config("a@b.com", AccessRight::Admin))
            .await
            .unwrap_err();
        assert_eq!(e.kind, ResourceErrorKind::Api);
        assert_eq!(e.status_code, Some(401));
    }

    #[tokio::test]
    async fn update_changes_only_access_right() {
        let (_sim, res) = setup().await;
        let created = res
            .create(user_config("a@b.com", AccessRight::Admin))
            .await
            .unwrap();
        let mut planned = created.state.clone();
        planned.group_user_access_right = Some(AccessRight::Member);

        let updated = res
            .update(&created.id, created.state.clone(), planned)
            .await
            .unwrap();
        assert_eq!(updated.state.group_user_access_right, Some(AccessRight::Member));
        assert_eq!(updated.state.email_address, "a@b.com");
        assert_eq!(updated.state.identifier, created.state.identifier);
        assert_eq!(updated.state.principal_type, created.state.principal_type);

        let read = res.read(&updated.id, updated.state).await.unwrap().found().unwrap();
        assert_eq!(read.state.group_user_access_right, Some(AccessRight::Member));
        assert_eq!(read.state.email_address, "a@b.com");
    }

    #[tokio::test]
    async fn update_without_access_change_issues_no_write() {
        let (sim, res) = setup().await;
        let created = res
            .create(user_config("a@b.com", AccessRight::Viewer))
            .await
            .unwrap();
        res.update(&created.id, created.state.clone(), created.state.clone())
            .await
            .unwrap();
        assert!(!sim.calls().await.iter().any(|c| c.starts_with("PUT")));
    }

    #[tokio::test]
    async fn update_rejects_force_new_changes() {
        let (sim, res) = setup().await;
        let created = res
            .create(user_config("a@b.com", AccessRight::Admin))
            .await
            .unwrap();
        let before = sim.calls().await.len();
        let mut planned = created.state.clone();
        planned.principal_type = Some(PrincipalType::Group);
        let e = res
            .update(&created.id, created.state, planned)
            .await
            .unwrap_err();
        assert_eq!(e.kind, ResourceErrorKind::RequiresReplacement);
        assert!(e.message.contains("principal_type"));
        assert_eq!(sim.calls().await.len(), before);
    }

    #[test]
    fn replacement_ignores_service_filled_fields() {
        let prior = WorkspaceAccessState {
            workspace_id: "W1".into(),
            identifier: "a@b.com".into(),
            email_address: "a@b.com".into(),
            principal_type: Some(PrincipalType::User),
            ..Default::default()
        };
        let planned = WorkspaceAccessState {
            identifier: String::new(),
            email_address: "A@B.com".into(),
            ..prior.clone()
        };
        assert!(requires_replacement(&prior, &planned).is_empty());
        let moved = WorkspaceAccessState {
            workspace_id: "W2".into(),
            ..prior.clone()
        };
        assert_eq!(requires_replacement(&prior, &moved), vec!["workspace_id"]);
    }

    #[tokio::test]
    async fn read_reports_gone_when_member_removed_remotely() {
        let (sim, res) = setup().await;
        let created = res
            .create(user_config("a@b.com", AccessRight::Admin))
            .await
            .unwrap();
        sim.remove_member("W1", "a@b.com").await;
        let out = res.read(&created.id, created.state).await.unwrap();
        assert!(out.is_gone());
    }

    #[tokio::test]
    async fn read_never_fabricates_a_member() {
        let (sim, res) = setup().await;
        sim.seed_member(
            "W1",
            GroupUser {
                display_name: "Other".into(),
                email_address: "other@b.com".into(),
                group_user_access_right: "Admin".into(),
                identifier: "other@b.com".into(),
                principal_type: "User".into(),
            },
        )
        .await;
        let state = user_config("a@b.com", AccessRight::Viewer);
        let out = res.read("Proj/a@b.com", state).await.unwrap();
        assert!(out.is_gone());
    }

    #[tokio::test]
    async fn read_reports_gone_when_workspace_deleted() {
        let (_sim, res) = setup().await;
        let mut state = user_config("a@b.com", AccessRight::Viewer);
        state.workspace_id = "W-deleted".into();
        let out = res.read("Old/a@b.com", state).await.unwrap();
        assert!(out.is_gone());
    }

    #[tokio::test]
    async fn import_resolves_workspace_by_name() {
        let (_sim, res) = setup().await;
        let created = res
            .create(user_config("a@b.com", AccessRight::Contributor))
            .await
            .unwrap();
        let imported = res.import("Proj/a@b.com").await.unwrap().found().unwrap();
        assert_eq!(imported.id, "Proj/a@b.com");
        assert_eq!(imported.state, created.state);
    }

    #[tokio::test]
    async fn import_with_unknown_workspace_fails() {
        let (_sim, res) = setup().await;
        let e = res.import("Nope/a@b.com").await.unwrap_err();
        assert_eq!(e.kind, ResourceErrorKind::WorkspaceNotFound);
        assert!(e.message.contains("workspace not found"));
    }

    #[tokio::test]
    async fn import_with_malformed_id_fails() {
        let (_sim, res) = setup().await;
        let e = res.import("no-separator").await.unwrap_err();
        assert_eq!(e.kind, ResourceErrorKind::IdentifierUnresolved);
        let e = res.import("/a@b.com").await.unwrap_err();
        assert_eq!(e.kind, ResourceErrorKind::InvalidId);
    }

    #[tokio::test]
    async fn delete_removes_member() {
        let (sim, res) = setup().await;
        let created = res
            .create(user_config("a@b.com", AccessRight::Admin))
            .await
            .unwrap();
        res.delete(&created.id, created.state).await.unwrap();
        assert!(sim.members("W1").await.is_empty());
    }

    #[tokio::test]
    async fn delete_of_absent_member_succeeds() {
        let (_sim, res) = setup().await;
        let state = user_config("gone@b.com", AccessRight::Admin);
        res.delete("Proj/gone@b.com", state).await.unwrap();
    }

    #[tokio::test]
    async fn delete_by_composite_id_alone() {
        let (sim, res) = setup().await;
        res.create(user_config("a@b.com", AccessRight::Admin))
            .await
            .unwrap();
        res.delete("Proj/a@b.com", WorkspaceAccessState::default())
            .await
            .unwrap();
        assert!(sim.members("W1").await.is_empty());
    }

    #[tokio::test]
    async fn delete_without_identity_fails_before_remote_call() {
        let (sim, res) = setup().await;
        let e = res
            .delete("unparsable", WorkspaceAccessState::default())
            .await
            .unwrap_err();
        assert_eq!(e.kind, ResourceErrorKind::IdentifierUnresolved);
        assert!(e.message.contains("could not determine identifier"));
        assert!(sim.calls().await.is_empty());
    }

    #[tokio::test]
    async fn delete_surfaces_other_failures() {
        let (sim, res) = setup().await;
        sim.fail_next(PowerBiError::from_status(500, "boom")).await;
        let e = res
            .delete("Proj/a@b.com", user_config("a@b.com", AccessRight::Admin))
            .await
            .unwrap_err();
        assert_eq!(e.status_code, Some(500));
    }

    fn seeded_user(email: &str, principal_type: &str) -> GroupUser {
        GroupUser {
            display_name: "A".into(),
            email_address: email.into(),
            group_user_access_right: "Viewer".into(),
            identifier: email.into(),
            principal_type: principal_type.into(),
        }
    }

    #[tokio::test]
    async fn import_with_different_case_email_keeps_id_stable() {
        let (sim, res) = setup().await;
        sim.seed_member("W1", seeded_user("a@b.com", "User")).await;

        let first = res.import("Proj/A@B.com").await.unwrap().found().unwrap();
        assert_eq!(first.id, "Proj/a@b.com");
        let second = res
            .read(&first.id, first.state.clone())
            .await
            .unwrap()
            .found()
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.state, first.state);
    }

    #[tokio::test]
    async fn update_looks_up_workspace_by_name_when_id_absent() {
        let (sim, res) = setup().await;
        let created = res
            .create(user_config("a@b.com", AccessRight::Admin))
            .await
            .unwrap();
        let prior = WorkspaceAccessState {
            workspace_id: String::new(),
            ..created.state
        };
        let planned = WorkspaceAccessState {
            group_user_access_right: Some(AccessRight::Member),
            ..prior.clone()
        };

        let updated = res.update(&created.id, prior, planned).await.unwrap();
        assert_eq!(updated.id, "Proj/a@b.com");
        assert_eq!(updated.state.group_user_access_right, Some(AccessRight::Member));
        assert_eq!(updated.state.workspace_id, "W1");
        assert!(sim
            .calls()
            .await
            .iter()
            .any(|c| c == "GET groups?name=Proj"));
        assert_eq!(sim.members("W1").await[0].group_user_access_right, "Member");
    }

    #[tokio::test]
    async fn read_keeps_prior_principal_type_when_service_reports_unknown() {
        let (sim, res) = setup().await;
        sim.seed_member("W1", seeded_user("a@b.com", "None")).await;
        let state = user_config("a@b.com", AccessRight::Viewer);
        let out = res
            .read("Proj/a@b.com", state)
            .await
            .unwrap()
            .found()
            .unwrap();
        assert_eq!(out.state.principal_type, Some(PrincipalType::User));
        assert_eq!(out.state.group_user_access_right, Some(AccessRight::Viewer));
    }

    #[tokio::test]
    async fn update_with_missing_principal_type_is_a_validation_error() {
        let (sim, res) = setup().await;
        let created = res
            .create(user_config("a@b.com", AccessRight::Admin))
            .await
            .unwrap();
        let before = sim.calls().await.len();
        let planned = WorkspaceAccessState {
            principal_type: None,
            ..created.state.clone()
        };
        assert!(requires_replacement(&created.state, &planned).is_empty());
        let e = res
            .update(&created.id, created.state, planned)
            .await
            .unwrap_err();
        assert_eq!(e.kind, ResourceErrorKind::Validation);
        assert!(e.message.contains("principal_type"));
        assert_eq!(sim.calls().await.len(), before);
    }

    #[tokio::test]
    async fn delete_when_named_workspace_is_gone_succeeds() {
        let (_sim, res) = setup().await;
        res.delete("Deleted/a@b.com", WorkspaceAccessState::default())
            .await
            .unwrap();
    }
}
