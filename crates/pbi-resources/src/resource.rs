//! The leaf-operation contract a declarative engine drives.
//!
//! Each resource type implements [`Resource`] with its own typed state. The
//! engine only ever sees JSON, so [`DynResource`] erases the state type and
//! lets a host keep heterogeneous resources in one registry.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ResourceError, ResourceResult};
use crate::schema::ResourceSchema;

/// State the engine should persist, keyed by the resource's external ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracked<S> {
    pub id: String,
    pub state: S,
}

impl<S> Tracked<S> {
    pub fn new(id: impl Into<String>, state: S) -> Self {
        Self {
            id: id.into(),
            state,
        }
    }
}

/// Result of refreshing a resource against the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<S> {
    Found(Tracked<S>),
    /// The entity no longer exists remotely; the engine should forget it.
    Gone,
}

impl<S> ReadOutcome<S> {
    pub fn is_gone(&self) -> bool {
        matches!(self, Self::Gone)
    }

    pub fn found(self) -> Option<Tracked<S>> {
        match self {
            Self::Found(t) => Some(t),
            Self::Gone => None,
        }
    }
}

#[async_trait]
pub trait Resource: Send + Sync {
    type State: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static;

    fn type_name(&self) -> &'static str;

    fn schema(&self) -> ResourceSchema;

    /// Static checks on a configuration, before any remote call.
    fn validate(&self, _config: &Self::State) -> ResourceResult<()> {
        Ok(())
    }

    async fn create(&self, _config: Self::State) -> ResourceResult<Tracked<Self::State>> {
        Err(ResourceError::unsupported(Resource::type_name(self), "create"))
    }

    async fn read(&self, id: &str, state: Self::State) -> ResourceResult<ReadOutcome<Self::State>>;

    async fn update(
        &self,
        _id: &str,
        _prior: Self::State,
        _planned: Self::State,
    ) -> ResourceResult<Tracked<Self::State>> {
        Err(ResourceError::unsupported(Resource::type_name(self), "update"))
    }

    async fn delete(&self, _id: &str, _state: Self::State) -> ResourceResult<()> {
        Err(ResourceError::unsupported(Resource::type_name(self), "delete"))
    }

    /// Adopt an existing remote entity given only its external ID.
    async fn import(&self, id: &str) -> ResourceResult<ReadOutcome<Self::State>> {
        self.read(id, Self::State::default()).await
    }
}

/// JSON-in, JSON-out view of a [`Resource`].
#[async_trait]
pub trait DynResource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> ResourceSchema;

    async fn create_json(&self, config: Value) -> ResourceResult<Tracked<Value>>;

    async fn read_json(&self, id: &str, state: Value) -> ResourceResult<ReadOutcome<Value>>;

    async fn update_json(
        &self,
        id: &str,
        prior: Value,
        planned: Value,
    ) -> ResourceResult<Tracked<Value>>;

    async fn delete_json(&self, id: &str, state: Value) -> ResourceResult<()>;

    async fn import_json(&self, id: &str) -> ResourceResult<ReadOutcome<Value>>;
}

fn decode<S: DeserializeOwned>(value: Value) -> ResourceResult<S> {
    let value = if value.is_null() {
        Value::Object(Default::default())
    } else {
        value
    };
    serde_json::from_value(value).map_err(|e| ResourceError::validation("state", e))
}

fn encode<S: Serialize>(tracked: Tracked<S>) -> ResourceResult<Tracked<Value>> {
    let state = serde_json::to_value(&tracked.state)
        .map_err(|e| ResourceError::validation("state", e))?;
    Ok(Tracked::new(tracked.id, state))
}

fn encode_outcome<S: Serialize>(outcome: ReadOutcome<S>) -> ResourceResult<ReadOutcome<Value>> {
    match outcome {
        ReadOutcome::Found(t) => Ok(ReadOutcome::Found(encode(t)?)),
        ReadOutcome::Gone => Ok(ReadOutcome::Gone),
    }
}

#[async_trait]
impl<R: Resource> DynResource for R {
    fn type_name(&self) -> &'static str {
        Resource::type_name(self)
    }

    fn schema(&self) -> ResourceSchema {
        Resource::schema(self)
    }

    async fn create_json(&self, config: Value) -> ResourceResult<Tracked<Value>> {
        let config: R::State = decode(config)?;
        encode(Resource::create(self, config).await?)
    }

    async fn read_json(&self, id: &str, state: Value) -> ResourceResult<ReadOutcome<Value>> {
        let state: R::State = decode(state)?;
        encode_outcome(Resource::read(self, id, state).await?)
    }

    async fn update_json(
        &self,
        id: &str,
        prior: Value,
        planned: Value,
    ) -> ResourceResult<Tracked<Value>> {
        let prior: R::State = decode(prior)?;
        let planned: R::State = decode(planned)?;
        encode(Resource::update(self, id, prior, planned).await?)
    }

    async fn delete_json(&self, id: &str, state: Value) -> ResourceResult<()> {
        let state: R::State = decode(state)?;
        Resource::delete(self, id, state).await
    }

    async fn import_json(&self, id: &str) -> ResourceResult<ReadOutcome<Value>> {
        encode_outcome(Resource::import(self, id).await?)
    }
}
