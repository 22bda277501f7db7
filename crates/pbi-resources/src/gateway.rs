//! `powerbi_gateway` – read-only view of an on-premises data gateway.

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use pbi_api::{Gateway, PowerBiApi};
use serde::{Deserialize, Serialize};

use crate::error::{ResourceError, ResourceResult};
use crate::resource::{ReadOutcome, Resource, Tracked};
use crate::schema::{AttributeSchema, Presence, ResourceSchema};

pub const TYPE_NAME: &str = "powerbi_gateway";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayState {
    #[serde(default)]
    pub gateway_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gateway_type: String,
    #[serde(default)]
    pub gateway_status: String,
    #[serde(default)]
    pub gateway_annotation: String,
    #[serde(default)]
    pub public_key_exponent: String,
    #[serde(default)]
    pub public_key_modulus: String,
}

impl From<Gateway> for GatewayState {
    fn from(gw: Gateway) -> Self {
        let (public_key_exponent, public_key_modulus) = gw
            .public_key
            .map(|k| (k.exponent, k.modulus))
            .unwrap_or_default();
        Self {
            gateway_id: gw.id,
            name: gw.name,
            gateway_type: gw.gateway_type,
            gateway_status: gw.gateway_status,
            gateway_annotation: gw.gateway_annotation,
            public_key_exponent,
            public_key_modulus,
        }
    }
}

pub struct GatewayResource {
    api: Arc<dyn PowerBiApi>,
}

impl GatewayResource {
    pub fn new(api: Arc<dyn PowerBiApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Resource for GatewayResource {
    type State = GatewayState;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema {
            type_name: TYPE_NAME,
            description: "An on-premises data gateway. Gateways are installed outside Power BI and can only be read.",
            importable: true,
            attributes: vec![
                AttributeSchema::new("gateway_id", Presence::Required, "Gateway ID."),
                AttributeSchema::new("name", Presence::Computed, "Gateway name."),
                AttributeSchema::new("gateway_type", Presence::Computed, "Gateway type."),
                AttributeSchema::new("gateway_status", Presence::Computed, "Gateway status."),
                AttributeSchema::new(
                    "gateway_annotation",
                    Presence::Computed,
                    "Gateway metadata in JSON format.",
                ),
                AttributeSchema::new(
                    "public_key_exponent",
                    Presence::Computed,
                    "RSA public key exponent used to encrypt credentials.",
                ),
                AttributeSchema::new(
                    "public_key_modulus",
                    Presence::Computed,
                    "RSA public key modulus used to encrypt credentials.",
                ),
            ],
        }
    }

    async fn read(&self, id: &str, state: GatewayState) -> ResourceResult<ReadOutcome<GatewayState>> {
        let gateway_id = if state.gateway_id.is_empty() {
            id
        } else {
            state.gateway_id.as_str()
        };
        if gateway_id.is_empty() {
            return Err(ResourceError::invalid_id(id, "a gateway ID"));
        }
        match self.api.get_gateway(gateway_id).await {
            Ok(gw) => {
                let state = GatewayState::from(gw);
                Ok(ReadOutcome::Found(Tracked::new(state.gateway_id.clone(), state)))
            }
            Err(e) if e.is_not_found() => {
                warn!("gateway {} not found", gateway_id);
                Ok(ReadOutcome::Gone)
            }
            Err(e) => Err(e.into()),
        }
    }
}
