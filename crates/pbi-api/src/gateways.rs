//! On-premises gateways, their datasources and datasource users.
//!
//! Gateways themselves are installed out-of-band; only datasources and
//! datasource users can be managed through the API.

use log::{debug, info};

use crate::client::PowerBiClient;
use crate::error::PowerBiResult;
use crate::types::{
    AddDatasourceUserRequest, CreateDatasourceRequest, Datasource, DatasourceUser, Gateway,
    ODataList,
};

/// Gateways for which the caller is an admin.
pub async fn get_gateways(client: &PowerBiClient) -> PowerBiResult<Vec<Gateway>> {
    let url = client.url(&["gateways"]);
    let list: ODataList<Gateway> = client.get_json(&url, &[]).await?;
    debug!("get_gateways → {} gateways", list.value.len());
    Ok(list.value)
}

/// For a cluster, `gateway_id` is the primary member's ID.
pub async fn get_gateway(client: &PowerBiClient, gateway_id: &str) -> PowerBiResult<Gateway> {
    let url = client.url(&["gateways", gateway_id]);
    client.get_json(&url, &[]).await
}

pub async fn get_datasources(
    client: &PowerBiClient,
    gateway_id: &str,
) -> PowerBiResult<Vec<Datasource>> {
    let url = client.url(&["gateways", gateway_id, "datasources"]);
    let list: ODataList<Datasource> = client.get_json(&url, &[]).await?;
    Ok(list.value)
}

pub async fn get_datasource(
    client: &PowerBiClient,
    gateway_id: &str,
    datasource_id: &str,
) -> PowerBiResult<Datasource> {
    let url = client.url(&["gateways", gateway_id, "datasources", datasource_id]);
    client.get_json(&url, &[]).await
}

/// Succeeds when the gateway can reach the datasource.
pub async fn get_datasource_status(
    client: &PowerBiClient,
    gateway_id: &str,
    datasource_id: &str,
) -> PowerBiResult<()> {
    let url = client.url(&["gateways", gateway_id, "datasources", datasource_id, "status"]);
    client.get_status(&url).await
}

pub async fn get_datasource_users(
    client: &PowerBiClient,
    gateway_id: &str,
    datasource_id: &str,
) -> PowerBiResult<Vec<DatasourceUser>> {
    let url = client.url(&["gateways", gateway_id, "datasources", datasource_id, "users"]);
    let list: ODataList<DatasourceUser> = client.get_json(&url, &[]).await?;
    Ok(list.value)
}

pub async fn create_datasource(
    client: &PowerBiClient,
    gateway_id: &str,
    request: &CreateDatasourceRequest,
) -> PowerBiResult<Datasource> {
    let url = client.url(&["gateways", gateway_id, "datasources"]);
    let ds: Datasource = client.post_json(&url, &[], request).await?;
    info!(
        "Created datasource '{}' ({}) on gateway {}",
        ds.datasource_name, ds.id, gateway_id
    );
    Ok(ds)
}

pub async fn delete_datasource(
    client: &PowerBiClient,
    gateway_id: &str,
    datasource_id: &str,
) -> PowerBiResult<()> {
    let url = client.url(&["gateways", gateway_id, "datasources", datasource_id]);
    client.delete(&url).await?;
    info!("Deleted datasource {} from gateway {}", datasource_id, gateway_id);
    Ok(())
}

/// Grant (or change) a user's permission on a datasource.
pub async fn add_datasource_user(
    client: &PowerBiClient,
    gateway_id: &str,
    datasource_id: &str,
    request: &AddDatasourceUserRequest,
) -> PowerBiResult<()> {
    let url = client.url(&["gateways", gateway_id, "datasources", datasource_id, "users"]);
    client.post_no_content(&url, Some(request)).await
}

pub async fn delete_datasource_user(
    client: &PowerBiClient,
    gateway_id: &str,
    datasource_id: &str,
    email_address: &str,
) -> PowerBiResult<()> {
    let url = client.url(&[
        "gateways",
        gateway_id,
        "datasources",
        datasource_id,
        "users",
        email_address,
    ]);
    client.delete(&url).await
}
