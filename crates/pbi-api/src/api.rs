//! The `PowerBiApi` seam.
//!
//! Resource adapters depend on this trait rather than on the HTTP client so
//! they can be driven by [`crate::simulated::SimulatedPowerBi`] in tests.

use async_trait::async_trait;

use crate::client::PowerBiClient;
use crate::error::PowerBiResult;
use crate::types::*;
use crate::{gateways, groups};

#[async_trait]
pub trait PowerBiApi: Send + Sync {
    // ── Workspaces ───────────────────────────────────────────────────

    /// Workspaces whose name equals `name`. May be empty or hold several.
    async fn get_groups_by_name(&self, name: &str) -> PowerBiResult<Vec<Group>>;

    async fn get_group(&self, group_id: &str) -> PowerBiResult<Group>;

    async fn create_group(&self, name: &str) -> PowerBiResult<Group>;

    async fn update_group(&self, group_id: &str, request: &UpdateGroupRequest)
        -> PowerBiResult<()>;

    async fn delete_group(&self, group_id: &str) -> PowerBiResult<()>;

    // ── Workspace users ──────────────────────────────────────────────

    async fn get_group_users(&self, group_id: &str) -> PowerBiResult<Vec<GroupUser>>;

    async fn add_group_user(&self, group_id: &str, request: &AddGroupUserRequest)
        -> PowerBiResult<()>;

    async fn update_group_user(
        &self,
        group_id: &str,
        request: &UpdateGroupUserRequest,
    ) -> PowerBiResult<()>;

    async fn delete_user_in_group(&self, group_id: &str, user: &str) -> PowerBiResult<()>;

    async fn refresh_user_permissions(&self) -> PowerBiResult<()>;

    // ── Gateways ─────────────────────────────────────────────────────

    async fn get_gateways(&self) -> PowerBiResult<Vec<Gateway>>;

    async fn get_gateway(&self, gateway_id: &str) -> PowerBiResult<Gateway>;

    async fn get_datasources(&self, gateway_id: &str) -> PowerBiResult<Vec<Datasource>>;

    async fn get_datasource(&self, gateway_id: &str, datasource_id: &str)
        -> PowerBiResult<Datasource>;

    async fn get_datasource_status(&self, gateway_id: &str, datasource_id: &str)
        -> PowerBiResult<()>;

    async fn get_datasource_users(
        &self,
        gateway_id: &str,
        datasource_id: &str,
    ) -> PowerBiResult<Vec<DatasourceUser>>;

    async fn create_datasource(
        &self,
        gateway_id: &str,
        request: &CreateDatasourceRequest,
    ) -> PowerBiResult<Datasource>;

    async fn delete_datasource(&self, gateway_id: &str, datasource_id: &str) -> PowerBiResult<()>;

    async fn add_datasource_user(
        &self,
        gateway_id: &str,
        datasource_id: &str,
        request: &AddDatasourceUserRequest,
    ) -> PowerBiResult<()>;

    async fn delete_datasource_user(
        &self,
        gateway_id: &str,
        datasource_id: &str,
        email_address: &str,
    ) -> PowerBiResult<()>;
}

#[async_trait]
impl PowerBiApi for PowerBiClient {
    async fn get_groups_by_name(&self, name: &str) -> PowerBiResult<Vec<Group>> {
        let filter = groups::name_filter(name);
        groups::get_groups(self, Some(&filter)).await
    }

    async fn get_group(&self, group_id: &str) -> PowerBiResult<Group> {
        groups::get_group(self, group_id).await
    }

    async fn create_group(&self, name: &str) -> PowerBiResult<Group> {
        groups::create_group(self, name).await
    }

    async fn update_group(
        &self,
        group_id: &str,
        request: &UpdateGroupRequest,
    ) -> PowerBiResult<()> {
        groups::update_group(self, group_id, request).await
    }

    async fn delete_group(&self, group_id: &str) -> PowerBiResult<()> {
        groups::delete_group(self, group_id).await
    }

    async fn get_group_users(&self, group_id: &str) -> PowerBiResult<Vec<GroupUser>> {
        groups::get_group_users(self, group_id).await
    }

    async fn add_group_user(
        &self,
        group_id: &str,
        request: &AddGroupUserRequest,
    ) -> PowerBiResult<()> {
        groups::add_group_user(self, group_id, request).await
    }

    async fn update_group_user(
        &self,
        group_id: &str,
        request: &UpdateGroupUserRequest,
    ) -> PowerBiResult<()> {
        groups::update_group_user(self, group_id, request).await
    }

    async fn delete_user_in_group(&self, group_id: &str, user: &str) -> PowerBiResult<()> {
        groups::delete_user_in_group(self, group_id, user).await
    }

    async fn refresh_user_permissions(&self) -> PowerBiResult<()> {
        groups::refresh_user_permissions(self).await
    }

    async fn get_gateways(&self) -> PowerBiResult<Vec<Gateway>> {
        gateways::get_gateways(self).await
    }

    async fn get_gateway(&self, gateway_id: &str) -> PowerBiResult<Gateway> {
        gateways::get_gateway(self, gateway_id).await
    }

    async fn get_datasources(&self, gateway_id: &str) -> PowerBiResult<Vec<Datasource>> {
        gateways::get_datasources(self, gateway_id).await
    }

    async fn get_datasource(
        &self,
        gateway_id: &str,
        datasource_id: &str,
    ) -> PowerBiResult<Datasource> {
        gateways::get_datasource(self, gateway_id, datasource_id).await
    }

    async fn get_datasource_status(
        &self,
        gateway_id: &str,
        datasource_id: &str,
    ) -> PowerBiResult<()> {
        gateways::get_datasource_status(self, gateway_id, datasource_id).await
    }

    async fn get_datasource_users(
        &self,
        gateway_id: &str,
        datasource_id: &str,
    ) -> PowerBiResult<Vec<DatasourceUser>> {
        gateways::get_datasource_users(self, gateway_id, datasource_id).await
    }

    async fn create_datasource(
        &self,
        gateway_id: &str,
        request: &CreateDatasourceRequest,
    ) -> PowerBiResult<Datasource> {
        gateways::create_datasource(self, gateway_id, request).await
    }

    async fn delete_datasource(&self, gateway_id: &str, datasource_id: &str) -> PowerBiResult<()> {
        gateways::delete_datasource(self, gateway_id, datasource_id).await
    }

    async fn add_datasource_user(
        &self,
        gateway_id: &str,
        datasource_id: &str,
        request: &AddDatasourceUserRequest,
    ) -> PowerBiResult<()> {
        gateways::add_datasource_user(self, gateway_id, datasource_id, request).await
    }

    async fn delete_datasource_user(
        &self,
        gateway_id: &str,
        datasource_id: &str,
        email_address: &str,
    ) -> PowerBiResult<()> {
        gateways::delete_datasource_user(self, gateway_id, datasource_id, email_address).await
    }
}
