//! `powerbi_gateway_datasource` – read-only view of a datasource bound to a
//! gateway, addressed as `"<gateway_id>/<datasource_id>"`.

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use pbi_api::{Datasource, PowerBiApi};
use serde::{Deserialize, Serialize};

use crate::error::{ResourceError, ResourceResult};
use crate::identity::split_composite;
use crate::resource::{ReadOutcome, Resource, Tracked};
use crate::schema::{AttributeSchema, Presence, ResourceSchema};

pub const TYPE_NAME: &str = "powerbi_gateway_datasource";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasourceState {
    #[serde(default)]
    pub gateway_id: String,
    #[serde(default)]
    pub datasource_id: String,
    #[serde(default)]
    pub datasource_name: String,
    #[serde(default)]
    pub datasource_type: String,
    #[serde(default)]
    pub connection_details: String,
    #[serde(default)]
    pub credential_type: String,
}

impl From<Datasource> for DatasourceState {
    fn from(ds: Datasource) -> Self {
        Self {
            gateway_id: ds.gateway_id,
            datasource_id: ds.id,
            datasource_name: ds.datasource_name,
            datasource_type: ds.datasource_type,
            connection_details: ds.connection_details,
            credential_type: ds.credential_type,
        }
    }
}

pub struct DatasourceResource {
    api: Arc<dyn PowerBiApi>,
}

impl DatasourceResource {
    pub fn new(api: Arc<dyn PowerBiApi>) -> Self {
        Self { api }
    }

    fn ids(id: &str, state: &DatasourceState) -> ResourceResult<(String, String)> {
        if !state.gateway_id.is_empty() && !state.datasource_id.is_empty() {
            return Ok((state.gateway_id.clone(), state.datasource_id.clone()));
        }
        match split_composite(id) {
            Some((gw, ds)) if !gw.is_empty() && !ds.is_empty() => {
                Ok((gw.to_string(), ds.to_string()))
            }
            _ => Err(ResourceError::invalid_id(id, "<gateway_id>/<datasource_id>")),
        }
    }
}

#[async_trait]
impl Resource for DatasourceResource {
    type State = DatasourceState;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema {
            type_name: TYPE_NAME,
            description: "A datasource registered on an on-premises gateway.",
            importable: true,
            attributes: vec![
                AttributeSchema::new("gateway_id", Presence::Required, "Gateway ID."),
                AttributeSchema::new("datasource_id", Presence::Required, "Datasource ID."),
                AttributeSchema::new("datasource_name", Presence::Computed, "Datasource name."),
                AttributeSchema::new("datasource_type", Presence::Computed, "Datasource type."),
                AttributeSchema::new(
                    "connection_details",
                    Presence::Computed,
                    "Connection details in JSON format.",
                ),
                AttributeSchema::new("credential_type", Presence::Computed, "Credential type."),
            ],
        }
    }

    async fn read(
        &self,
        id: &str,
        state: DatasourceState,
    ) -> ResourceResult<ReadOutcome<DatasourceState>> {
        let (gateway_id, datasource_id) = Self::ids(id, &state)?;
        match self.api.get_datasource(&gateway_id, &datasource_id).await {
            Ok(ds) => {
                let mut state = DatasourceState::from(ds);
                if state.gateway_id.is_empty() {
                    state.gateway_id = gateway_id.clone();
                }
                let id = format!("{}/{}", gateway_id, datasource_id);
                Ok(ReadOutcome::Found(Tracked::new(id, state)))
            }
            Err(e) if e.is_not_found() => {
                warn!("datasource {}/{} not found", gateway_id, datasource_id);
                Ok(ReadOutcome::Gone)
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

    async fn setup() -> DatasourceResource {
        let sim = Arc::new(SimulatedPowerBi::new());
        sim.seed_datasource(Datasource {
            id: "ds-1".into(),
            gateway_id: "gw-1".into(),
            datasource_name: "Sales".into(),
            datasource_type: "Sql".into(),
            connection_details: r#"{"server":"db","database":"sales"}"#.into(),
            credential_type: "Windows".into(),
        })
        .await;
        DatasourceResource::new(sim)
    }

    #[tokio::test]
    async fn import_by_composite_id() {
        let res = setup().await;
        let out = res.import("gw-1/ds-1").await.unwrap().found().unwrap();
        assert_eq!(out.id, "gw-1/ds-1");
        assert_eq!(out.state.datasource_name, "Sales");
        assert_eq!(out.state.credential_type, "Windows");
    }

    #[tokio::test]
    async fn read_prefers_state_ids() {
        let res = setup().await;
        let state = DatasourceState {
            gateway_id: "gw-1".into(),
            datasource_id: "ds-1".into(),
            ..Default::default()
        };
        assert!(res.read("", state).await.unwrap().found().is_some());
    }

    #[tokio::test]
    async fn missing_datasource_is_gone() {
        let res = setup().await;
        assert!(res.import("gw-1/ds-9").await.unwrap().is_gone());
    }

    #[tokio::test]
    async fn malformed_id() {
        let res = setup().await;
        for id in ["ds-1", "gw-1/", "/ds-1"] {
            let e = res.import(id).await.unwrap_err();
            assert_eq!(e.kind, ResourceErrorKind::InvalidId);
        }
    }
}
