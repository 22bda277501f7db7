//! # Power BI resource adapters
//!
//! Create / Read / Update / Delete / Import for the Power BI entities a
//! declarative engine manages:
//!
//! - **`powerbi_workspace`** – workspaces, tracked by server ID
//! - **`powerbi_workspace_access`** – one principal's access right on a
//!   workspace, tracked by the composite `"<workspace-name>/<principal-key>"`
//! - **`powerbi_gateway`** – read-only gateway lookup
//! - **`powerbi_gateway_datasource`** – read-only datasource lookup
//!
//! Adapters receive their [`pbi_api::PowerBiApi`] at construction and hold no
//! other state; every Read goes back to the service.

pub mod error;
pub mod schema;
pub mod identity;
pub mod resource;
pub mod workspace;
pub mod workspace_access;
pub mod gateway;
pub mod datasource;

pub use datasource::{DatasourceResource, DatasourceState};
pub use error::{ResourceError, ResourceErrorKind, ResourceResult};
pub use gateway::{GatewayResource, GatewayState};
pub use identity::{resolve_principal_key, MembershipId};
pub use resource::{DynResource, ReadOutcome, Resource, Tracked};
pub use schema::{AccessRight, PrincipalType, ResourceSchema};
pub use workspace::{WorkspaceResource, WorkspaceState};
pub use workspace_access::{WorkspaceAccessResource, WorkspaceAccessState};
