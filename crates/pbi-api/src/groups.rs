//! Power BI workspaces (groups) and workspace users.

use log::{debug, info};

use crate::client::PowerBiClient;
use crate::error::PowerBiResult;
use crate::types::{
    AddGroupUserRequest, CreateGroupRequest, Group, GroupUser, ODataList, UpdateGroupRequest,
    UpdateGroupUserRequest,
};

/// OData filter matching a workspace name exactly.
pub fn name_filter(name: &str) -> String {
    format!("name eq '{}'", name.replace('\'', "''"))
}

/// List workspaces, optionally narrowed by an OData `$filter`.
pub async fn get_groups(
    client: &PowerBiClient,
    filter: Option<&str>,
) -> PowerBiResult<Vec<Group>> {
    let url = client.url(&["groups"]);
    let query: Vec<(&str, &str)> = filter.map(|f| vec![("$filter", f)]).unwrap_or_default();
    let list: ODataList<Group> = client.get_json(&url, &query).await?;
    debug!("get_groups({:?}) → {} groups", filter, list.value.len());
    Ok(list.value)
}

pub async fn get_group(client: &PowerBiClient, group_id: &str) -> PowerBiResult<Group> {
    let url = client.url(&["groups", group_id]);
    client.get_json(&url, &[]).await
}

/// Create a new-style workspace.
pub async fn create_group(client: &PowerBiClient, name: &str) -> PowerBiResult<Group> {
    let url = client.url(&["groups"]);
    let body = CreateGroupRequest {
        name: name.to_string(),
    };
    let group: Group = client
        .post_json(&url, &[("workspaceV2", "True")], &body)
        .await?;
    info!("Created workspace '{}' ({})", group.name, group.id);
    Ok(group)
}

pub async fn update_group(
    client: &PowerBiClient,
    group_id: &str,
    request: &UpdateGroupRequest,
) -> PowerBiResult<()> {
    let url = client.url(&["groups", group_id]);
    client.patch_no_content(&url, request).await?;
    info!("Updated workspace {}", group_id);
    Ok(())
}

pub async fn delete_group(client: &PowerBiClient, group_id: &str) -> PowerBiResult<()> {
    let url = client.url(&["groups", group_id]);
    client.delete(&url).await?;
    info!("Deleted workspace {}", group_id);
    Ok(())
}

/// Every access grant on a workspace (single page).
pub async fn get_group_users(
    client: &PowerBiClient,
    group_id: &str,
) -> PowerBiResult<Vec<GroupUser>> {
    let url = client.url(&["groups", group_id, "users"]);
    let list: ODataList<GroupUser> = client.get_json(&url, &[]).await?;
    debug!("get_group_users({}) → {} users", group_id, list.value.len());
    Ok(list.value)
}

pub async fn add_group_user(
    client: &PowerBiClient,
    group_id: &str,
    request: &AddGroupUserRequest,
) -> PowerBiResult<()> {
    let url = client.url(&["groups", group_id, "users"]);
    client.post_no_content(&url, Some(request)).await?;
    info!(
        "Granted {} on workspace {}",
        request.group_user_access_right, group_id
    );
    Ok(())
}

pub async fn update_group_user(
    client: &PowerBiClient,
    group_id: &str,
    request: &UpdateGroupUserRequest,
) -> PowerBiResult<()> {
    let url = client.url(&["groups", group_id, "users"]);
    client.put_no_content(&url, request).await?;
    info!(
        "Changed access on workspace {} to {}",
        group_id, request.group_user_access_right
    );
    Ok(())
}

/// Remove a principal (email address or identifier) from a workspace.
pub async fn delete_user_in_group(
    client: &PowerBiClient,
    group_id: &str,
    user: &str,
) -> PowerBiResult<()> {
    let url = client.url(&["groups", group_id, "users", user]);
    client.delete(&url).await?;
    info!("Removed {} from workspace {}", user, group_id);
    Ok(())
}

/// Ask the service to refresh the caller's cached permissions.
pub async fn refresh_user_permissions(client: &PowerBiClient) -> PowerBiResult<()> {
    let url = client.url(&["RefreshUserPermissions"]);
    client.post_no_content::<()>(&url, None).await
}
