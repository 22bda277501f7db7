//! Resource registry: maps resource type names to adapters and dispatches
//! host requests.

use std::collections::BTreeMap;
use std::sync::Arc;

use pbi_api::PowerBiApi;
use pbi_resources::{
    DatasourceResource, DynResource, GatewayResource, ResourceSchema, WorkspaceAccessResource,
    WorkspaceResource,
};
use tracing::{debug, info, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::protocol::{Operation, Request, Response};

pub struct ProviderRegistry {
    resources: BTreeMap<&'static str, Box<dyn DynResource>>,
}

impl ProviderRegistry {
    /// Every Power BI resource type, sharing one API handle.
    pub fn new(api: Arc<dyn PowerBiApi>) -> Self {
        let mut registry = Self {
            resources: BTreeMap::new(),
        };
        registry.register(Box::new(WorkspaceResource::new(api.clone())));
        registry.register(Box::new(WorkspaceAccessResource::new(api.clone())));
        registry.register(Box::new(GatewayResource::new(api.clone())));
        registry.register(Box::new(DatasourceResource::new(api)));
        registry
    }

    pub fn register(&mut self, resource: Box<dyn DynResource>) {
        self.resources.insert(resource.type_name(), resource);
    }

    pub fn type_names(&self) -> Vec<&'static str> {
        self.resources.keys().copied().collect()
    }

    pub fn get(&self, resource_type: &str) -> ProviderResult<&dyn DynResource> {
        self.resources
            .get(resource_type)
            .map(|r| r.as_ref())
            .ok_or_else(|| ProviderError::unknown_resource_type(resource_type))
    }

    pub fn schemas(&self) -> Vec<ResourceSchema> {
        self.resources.values().map(|r| r.schema()).collect()
    }

    /// Decode a raw request and dispatch it.
    pub async fn handle_json(&self, input: &str) -> Response {
        match serde_json::from_str::<Request>(input) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                warn!("rejecting malformed request: {}", e);
                Response::error(ProviderError::from(e))
            }
        }
    }

    pub async fn handle(&self, request: Request) -> Response {
        debug!(
            operation = ?request.operation,
            resource_type = %request.resource_type,
            id = %request.id,
            "handling request"
        );

        if request.operation == Operation::Schema && request.resource_type.is_empty() {
            return self.describe(&request.resource_type);
        }

        let resource = match self.get(&request.resource_type) {
            Ok(r) => r,
            Err(e) => return Response::error(e),
        };

        let Request {
            operation,
            id,
            state,
            planned_state,
            ..
        } = request;

        let result = match operation {
            Operation::Create => resource.create_json(state).await.map(Response::from),
            Operation::Read => resource.read_json(&id, state).await.map(Response::from),
            Operation::Update => resource
                .update_json(&id, state, planned_state)
                .await
                .map(Response::from),
            Operation::Delete => resource.delete_json(&id, state).await.map(|()| Response::ok()),
            Operation::Import => resource.import_json(&id).await.map(Response::from),
            Operation::Schema => Ok(self.describe(resource.type_name())),
        };

        match result {
            Ok(response) => {
                info!(
                    operation = ?operation,
                    resource_type = resource.type_name(),
                    status = ?response.status,
                    "request complete"
                );
                response
            }
            Err(e) => {
                warn!(operation = ?operation, resource_type = resource.type_name(), "{}", e);
                Response::error(e)
            }
        }
    }

    fn describe(&self, resource_type: &str) -> Response {
        let schemas = if resource_type.is_empty() {
            self.schemas()
        } else {
            match self.get(resource_type) {
                Ok(r) => vec![r.schema()],
                Err(e) => return Response::error(e),
            }
        };
        match serde_json::to_value(schemas) {
            Ok(v) => Response::with_state(v),
            Err(e) => Response::error(ProviderError::from(e)),
        }
    }
}
