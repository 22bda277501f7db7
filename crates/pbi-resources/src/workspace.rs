//! `powerbi_workspace` – a Power BI workspace (V2 group).

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use pbi_api::{PowerBiApi, UpdateGroupRequest};
use serde::{Deserialize, Serialize};

use crate::error::{ResourceError, ResourceResult};
use crate::resource::{ReadOutcome, Resource, Tracked};
use crate::schema::{require_non_empty, AttributeSchema, Presence, ResourceSchema};

pub const TYPE_NAME: &str = "powerbi_workspace";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceState {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A planned state that names a different workspace ID cannot be reached by
/// renaming.
pub fn requires_replacement(prior: &WorkspaceState, planned: &WorkspaceState) -> Vec<&'static str> {
    if !planned.id.is_empty() && !prior.id.is_empty() && planned.id != prior.id {
        vec!["id"]
    } else {
        Vec::new()
    }
}

pub struct WorkspaceResource {
    api: Arc<dyn PowerBiApi>,
}

impl WorkspaceResource {
    pub fn new(api: Arc<dyn PowerBiApi>) -> Self {
        Self { api }
    }

    fn workspace_id<'a>(id: &'a str, state: &'a WorkspaceState) -> ResourceResult<&'a str> {
        let workspace_id = if id.is_empty() { state.id.as_str() } else { id };
        if workspace_id.is_empty() {
            return Err(ResourceError::invalid_id(id, "a workspace ID"));
        }
        Ok(workspace_id)
    }
}

#[async_trait]
impl Resource for WorkspaceResource {
    type State = WorkspaceState;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema {
            type_name: TYPE_NAME,
            description: "A Power BI workspace.",
            importable: true,
            attributes: vec![
                AttributeSchema::new("id", Presence::Computed, "Workspace ID."),
                AttributeSchema::new("name", Presence::Required, "Workspace name."),
            ],
        }
    }

    fn validate(&self, config: &WorkspaceState) -> ResourceResult<()> {
        require_non_empty("name", &config.name)
    }

    async fn create(&self, config: WorkspaceState) -> ResourceResult<Tracked<WorkspaceState>> {
        self.validate(&config)?;
        let group = self.api.create_group(&config.name).await?;
        info!("{} created {} ({})", TYPE_NAME, group.id, group.name);
        let state = WorkspaceState {
            id: group.id.clone(),
            name: group.name,
        };
        Ok(Tracked::new(group.id, state))
    }

    async fn read(
        &self,
        id: &str,
        state: WorkspaceState,
    ) -> ResourceResult<ReadOutcome<WorkspaceState>> {
        let workspace_id = Self::workspace_id(id, &state)?;
        match self.api.get_group(workspace_id).await {
            Ok(group) => Ok(ReadOutcome::Found(Tracked::new(
                group.id.clone(),
                WorkspaceState {
                    id: group.id,
                    name: group.name,
                },
            ))),
            Err(e) if e.is_not_found() => {
                warn!("workspace {} no longer exists", workspace_id);
                Ok(ReadOutcome::Gone)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(
        &self,
        id: &str,
        prior: WorkspaceState,
        planned: WorkspaceState,
    ) -> ResourceResult<Tracked<WorkspaceState>> {
        let forced = requires_replacement(&prior, &planned);
        if !forced.is_empty() {
            return Err(ResourceError::requires_replacement(&forced));
        }
        self.validate(&planned)?;
        let workspace_id = Self::workspace_id(id, &prior)?.to_string();

        if planned.name != prior.name {
            let request = UpdateGroupRequest {
                name: Some(planned.name.clone()),
            };
            self.api.update_group(&workspace_id, &request).await?;
            info!("{} {} renamed to {}", TYPE_NAME, workspace_id, planned.name);
        }

        match self.read(&workspace_id, planned).await? {
            ReadOutcome::Found(tracked) => Ok(tracked),
            ReadOutcome::Gone => Err(ResourceError::not_found(format!(
                "workspace {} disappeared during update",
                workspace_id
            ))),
        }
    }

    async fn delete(&self, id: &str, state: WorkspaceState) -> ResourceResult<()> {
        let workspace_id = Self::workspace_id(id, &state)?;
        match self.api.delete_group(workspace_id).await {
            Ok(()) => {
                info!("{} deleted {}", TYPE_NAME, workspace_id);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                warn!("workspace {} already deleted", workspace_id);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResourceErrorKind;
    use pbi_api::SimulatedPowerBi;

    fn setup() -> (Arc<SimulatedPowerBi>, WorkspaceResource) {
        let sim = Arc::new(SimulatedPowerBi::new());
        (sim.clone(), WorkspaceResource::new(sim))
    }

    fn named(name: &str) -> WorkspaceState {
        WorkspaceState {
            name: name.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_uses_server_id() {
        let (sim, res) = setup();
        let created = res.create(named("Finance")).await.unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.state.id, created.id);
        assert_eq!(sim.groups().await[0].name, "Finance");
    }

    #[tokio::test]
    async fn create_requires_name() {
        let (sim, res) = setup();
        let e = res.create(named("")).await.unwrap_err();
        assert_eq!(e.kind, ResourceErrorKind::Validation);
        assert!(sim.calls().await.is_empty());
    }

    #[tokio::test]
    async fn rename_then_read() {
        let (sim, res) = setup();
        let created = res.create(named("Finance")).await.unwrap();
        let planned = WorkspaceState {
            name: "Finance (prod)".into(),
            ..created.state.clone()
        };
        let updated = res.update(&created.id, created.state, planned).await.unwrap();
        assert_eq!(updated.state.name, "Finance (prod)");
        assert!(sim.calls().await.iter().any(|c| c.starts_with("PATCH")));
    }

    #[tokio::test]
    async fn unchanged_name_skips_patch() {
        let (sim, res) = setup();
        let created = res.create(named("Finance")).await.unwrap();
        res.update(&created.id, created.state.clone(), created.state)
            .await
            .unwrap();
        assert!(!sim.calls().await.iter().any(|c| c.starts_with("PATCH")));
    }

    #[tokio::test]
    async fn read_after_remote_delete_is_gone() {
        let (sim, res) = setup();
        let created = res.create(named("Finance")).await.unwrap();
        sim.delete_group(&created.id).await.unwrap();
        assert!(res.read(&created.id, created.state).await.unwrap().is_gone());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (_sim, res) = setup();
        let created = res.create(named("Finance")).await.unwrap();
        res.delete(&created.id, created.state.clone()).await.unwrap();
        res.delete(&created.id, created.state).await.unwrap();
    }

    #[tokio::test]
    async fn import_by_id() {
        let (sim, res) = setup();
        sim.seed_group("W9", "Imported").await;
        let out = res.import("W9").await.unwrap().found().unwrap();
        assert_eq!(out.state.name, "Imported");
        assert_eq!(
            res.import("").await.unwrap_err().kind,
            ResourceErrorKind::InvalidId
        );
    }

    #[test]
    fn replacement_only_on_id_change() {
        let prior = WorkspaceState {
            id: "A".into(),
            name: "x".into(),
        };
        assert!(requires_replacement(&prior, &named("y")).is_empty());
        let other = WorkspaceState {
            id: "B".into(),
            name: "x".into(),
        };
        assert_eq!(requires_replacement(&prior, &other), vec!["id"]);
    }
}
