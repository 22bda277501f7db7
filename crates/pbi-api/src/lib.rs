//! # Power BI REST API client
//!
//! Thin, stateless wrapper over the Power BI management endpoints used by the
//! resource adapters.
//!
//! ## Features
//!
//! - **Workspaces** – lookup by name or ID, create, rename, delete
//! - **Workspace users** – list, add, change access right, remove, refresh permissions
//! - **Gateways** – list, get
//! - **Datasources** – list, get, connectivity status, create, delete, user grants
//!
//! Every path segment is percent-escaped. There are no retries and no
//! pagination: a single response page is assumed to be complete.

pub mod types;
pub mod error;
pub mod client;
pub mod groups;
pub mod gateways;
pub mod api;
pub mod simulated;

pub use api::PowerBiApi;
pub use client::PowerBiClient;
pub use error::{PowerBiError, PowerBiErrorKind, PowerBiResult};
pub use simulated::SimulatedPowerBi;
pub use types::*;
