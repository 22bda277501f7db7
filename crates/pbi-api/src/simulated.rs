//! In-memory Power BI backend.
//!
//! Implements [`PowerBiApi`] against local tables so resource adapters can be
//! exercised without a tenant. Every call is recorded in order, which lets
//! tests assert that an operation failed before touching the service.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::api::PowerBiApi;
use crate::error::{PowerBiError, PowerBiResult};
use crate::types::*;

#[derive(Default)]
struct Tables {
    groups: Vec<Group>,
    members: HashMap<String, Vec<GroupUser>>,
    gateways: Vec<Gateway>,
    datasources: HashMap<String, Vec<Datasource>>,
    datasource_users: HashMap<(String, String), Vec<DatasourceUser>>,
    calls: Vec<String>,
    next_failure: Option<PowerBiError>,
}

impl Tables {
    fn record(&mut self, call: String) -> PowerBiResult<()> {
        self.calls.push(call);
        match self.next_failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn group(&self, group_id: &str) -> PowerBiResult<&Group> {
        self.groups
            .iter()
            .find(|g| g.id == group_id)
            .ok_or_else(|| not_found("group", group_id))
    }

    fn members_mut(&mut self, group_id: &str) -> PowerBiResult<&mut Vec<GroupUser>> {
        self.group(group_id)?;
        Ok(self.members.entry(group_id.to_string()).or_default())
    }
}

fn not_found(what: &str, id: &str) -> PowerBiError {
    PowerBiError::from_status(
        404,
        &format!(
            r#"{{"error":{{"code":"PowerBIEntityNotFound","message":"{} {} not found"}}}}"#,
            what, id
        ),
    )
}

fn matches_user(user: &GroupUser, key: &str) -> bool {
    user.identifier == key || user.email_address.eq_ignore_ascii_case(key)
}

/// Fully in-memory [`PowerBiApi`] implementation.
#[derive(Default)]
pub struct SimulatedPowerBi {
    tables: Mutex<Tables>,
}

impl SimulatedPowerBi {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Seeding ──────────────────────────────────────────────────────

    pub async fn seed_group(&self, id: &str, name: &str) {
        self.tables.lock().await.groups.push(Group {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        });
    }

    pub async fn seed_member(&self, group_id: &str, user: GroupUser) {
        self.tables
            .lock()
            .await
            .members
            .entry(group_id.to_string())
            .or_default()
            .push(user);
    }

    pub async fn seed_gateway(&self, gateway: Gateway) {
        self.tables.lock().await.gateways.push(gateway);
    }

    pub async fn seed_datasource(&self, datasource: Datasource) {
        self.tables
            .lock()
            .await
            .datasources
            .entry(datasource.gateway_id.clone())
            .or_default()
            .push(datasource);
    }

    /// The next call (whatever it is) fails with `err`.
    pub async fn fail_next(&self, err: PowerBiError) {
        self.tables.lock().await.next_failure = Some(err);
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// Calls issued so far, e.g. `"GET groups/W1/users"`.
    pub async fn calls(&self) -> Vec<String> {
        self.tables.lock().await.calls.clone()
    }

    pub async fn members(&self, group_id: &str) -> Vec<GroupUser> {
        self.tables
            .lock()
            .await
            .members
            .get(group_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn groups(&self) -> Vec<Group> {
        self.tables.lock().await.groups.clone()
    }

    /// Drop a member behind the adapter's back (drift).
    pub async fn remove_member(&self, group_id: &str, key: &str) {
        if let Some(members) = self.tables.lock().await.members.get_mut(group_id) {
            members.retain(|u| !matches_user(u, key));
        }
    }
}

#[async_trait]
impl PowerBiApi for SimulatedPowerBi {
    async fn get_groups_by_name(&self, name: &str) -> PowerBiResult<Vec<Group>> {
        let mut t = self.tables.lock().await;
        t.record(format!("GET groups?name={}", name))?;
        Ok(t.groups.iter().filter(|g| g.name == name).cloned().collect())
    }

    async fn get_group(&self, group_id: &str) -> PowerBiResult<Group> {
        let mut t = self.tables.lock().await;
        t.record(format!("GET groups/{}", group_id))?;
        t.group(group_id).cloned()
    }

    async fn create_group(&self, name: &str) -> PowerBiResult<Group> {
        let mut t = self.tables.lock().await;
        t.record("POST groups".to_string())?;
        let group = Group {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            ..Default::default()
        };
        t.groups.push(group.clone());
        Ok(group)
    }

    async fn update_group(
        &self,
        group_id: &str,
        request: &UpdateGroupRequest,
    ) -> PowerBiResult<()> {
        let mut t = self.tables.lock().await;
        t.record(format!("PATCH groups/{}", group_id))?;
        let group = t
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| not_found("group", group_id))?;
        if let Some(name) = &request.name {
            group.name = name.clone();
        }
        Ok(())
    }

    async fn delete_group(&self, group_id: &str) -> PowerBiResult<()> {
        let mut t = self.tables.lock().await;
        t.record(format!("DELETE groups/{}", group_id))?;
        t.group(group_id)?;
        t.groups.retain(|g| g.id != group_id);
        t.members.remove(group_id);
        Ok(())
    }

    async fn get_group_users(&self, group_id: &str) -> PowerBiResult<Vec<GroupUser>> {
        let mut t = self.tables.lock().await;
        t.record(format!("GET groups/{}/users", group_id))?;
        Ok(t.members_mut(group_id)?.clone())
    }

    async fn add_group_user(
        &self,
        group_id: &str,
        request: &AddGroupUserRequest,
    ) -> PowerBiResult<()> {
        let mut t = self.tables.lock().await;
        t.record(format!("POST groups/{}/users", group_id))?;
        let key = request
            .identifier
            .clone()
            .or_else(|| request.email_address.clone())
            .ok_or_else(|| PowerBiError::from_status(400, "identifier or emailAddress required"))?;
        let email = request.email_address.clone().unwrap_or_default();
        let display_name = request.display_name.clone().unwrap_or_else(|| {
            email
                .split('@')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or(key.as_str())
                .to_string()
        });
        let members = t.members_mut(group_id)?;
        members.retain(|u| !matches_user(u, &key));
        members.push(GroupUser {
            display_name,
            email_address: email,
            group_user_access_right: request.group_user_access_right.clone(),
            identifier: key,
            principal_type: request.principal_type.clone().unwrap_or_default(),
        });
        Ok(())
    }

    async fn update_group_user(
        &self,
        group_id: &str,
        request: &UpdateGroupUserRequest,
    ) -> PowerBiResult<()> {
        let mut t = self.tables.lock().await;
        t.record(format!("PUT groups/{}/users", group_id))?;
        let key = request
            .identifier
            .clone()
            .or_else(|| request.email_address.clone())
            .unwrap_or_default();
        let user = t
            .members_mut(group_id)?
            .iter_mut()
            .find(|u| matches_user(u, &key))
            .ok_or_else(|| not_found("user", &key))?;
        user.group_user_access_right = request.group_user_access_right.clone();
        Ok(())
    }

    async fn delete_user_in_group(&self, group_id: &str, user: &str) -> PowerBiResult<()> {
        let mut t = self.tables.lock().await;
        t.record(format!("DELETE groups/{}/users/{}", group_id, user))?;
        let members = t.members_mut(group_id)?;
        let before = members.len();
        members.retain(|u| !matches_user(u, user));
        if members.len() == before {
            return Err(not_found("user", user));
        }
        Ok(())
    }

    async fn refresh_user_permissions(&self) -> PowerBiResult<()> {
        self.tables
            .lock()
            .await
            .record("POST RefreshUserPermissions".to_string())
    }

    async fn get_gateways(&self) -> PowerBiResult<Vec<Gateway>> {
        let mut t = self.tables.lock().await;
        t.record("GET gateways".to_string())?;
        Ok(t.gateways.clone())
    }

    async fn get_gateway(&self, gateway_id: &str) -> PowerBiResult<Gateway> {
        let mut t = self.tables.lock().await;
        t.record(format!("GET gateways/{}", gateway_id))?;
        t.gateways
            .iter()
            .find(|g| g.id == gateway_id)
            .cloned()
            .ok_or_else(|| not_found("gateway", gateway_id))
    }

    async fn get_datasources(&self, gateway_id: &str) -> PowerBiResult<Vec<Datasource>> {
        let mut t = self.tables.lock().await;
        t.record(format!("GET gateways/{}/datasources", gateway_id))?;
        Ok(t.datasources.get(gateway_id).cloned().unwrap_or_default())
    }

    async fn get_datasource(
        &self,
        gateway_id: &str,
        datasource_id: &str,
    ) -> PowerBiResult<Datasource> {
        let mut t = self.tables.lock().await;
        t.record(format!("GET gateways/{}/datasources/{}", gateway_id, datasource_id))?;
        t.datasources
            .get(gateway_id)
            .and_then(|list| list.iter().find(|d| d.id == datasource_id))
            .cloned()
            .ok_or_else(|| not_found("datasource", datasource_id))
    }

    async fn get_datasource_status(
        &self,
        gateway_id: &str,
        datasource_id: &str,
    ) -> PowerBiResult<()> {
        self.get_datasource(gateway_id, datasource_id).await.map(|_| ())
    }

    async fn get_datasource_users(
        &self,
        gateway_id: &str,
        datasource_id: &str,
    ) -> PowerBiResult<Vec<DatasourceUser>> {
        let mut t = self.tables.lock().await;
        t.record(format!(
            "GET gateways/{}/datasources/{}/users",
            gateway_id, datasource_id
        ))?;
        Ok(t
            .datasource_users
            .get(&(gateway_id.to_string(), datasource_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn create_datasource(
        &self,
        gateway_id: &str,
        request: &CreateDatasourceRequest,
    ) -> PowerBiResult<Datasource> {
        let mut t = self.tables.lock().await;
        t.record(format!("POST gateways/{}/datasources", gateway_id))?;
        if !t.gateways.iter().any(|g| g.id == gateway_id) {
            return Err(not_found("gateway", gateway_id));
        }
        let ds = Datasource {
            id: uuid::Uuid::new_v4().to_string(),
            gateway_id: gateway_id.to_string(),
            datasource_name: request.datasource_name.clone(),
            datasource_type: request.datasource_type.clone(),
            connection_details: request.connection_details.clone(),
            credential_type: request
                .credential_details
                .credential_type
                .clone()
                .unwrap_or_default(),
        };
        t.datasources
            .entry(gateway_id.to_string())
            .or_default()
            .push(ds.clone());
        Ok(ds)
    }

    async fn delete_datasource(&self, gateway_id: &str, datasource_id: &str) -> PowerBiResult<()> {
        let mut t = self.tables.lock().await;
        t.record(format!(
            "DELETE gateways/{}/datasources/{}",
            gateway_id, datasource_id
        ))?;
        let list = t
            .datasources
            .get_mut(gateway_id)
            .ok_or_else(|| not_found("gateway", gateway_id))?;
        let before = list.len();
        list.retain(|d| d.id != datasource_id);
        if list.len() == before {
            return Err(not_found("datasource", datasource_id));
        }
        Ok(())
    }

    async fn add_datasource_user(
        &self,
        gateway_id: &str,
        datasource_id: &str,
        request: &AddDatasourceUserRequest,
    ) -> PowerBiResult<()> {
        let mut t = self.tables.lock().await;
        t.record(format!(
            "POST gateways/{}/datasources/{}/users",
            gateway_id, datasource_id
        ))?;
        let users = t
            .datasource_users
            .entry((gateway_id.to_string(), datasource_id.to_string()))
            .or_default();
        let email = request.email_address.clone().unwrap_or_default();
        users.retain(|u| !u.email_address.eq_ignore_ascii_case(&email) || email.is_empty());
        users.push(DatasourceUser {
            datasource_access_right: request.datasource_access_right.clone(),
            display_name: request.display_name.clone().unwrap_or_default(),
            email_address: email,
            identifier: request.identifier.clone().unwrap_or_default(),
            principal_type: request.principal_type.clone().unwrap_or_default(),
        });
        Ok(())
    }

    async fn delete_datasource_user(
        &self,
        gateway_id: &str,
        datasource_id: &str,
        email_address: &str,
    ) -> PowerBiResult<()> {
        let mut t = self.tables.lock().await;
        t.record(format!(
            "DELETE gateways/{}/datasources/{}/users/{}",
            gateway_id, datasource_id, email_address
        ))?;
        let users = t
            .datasource_users
            .get_mut(&(gateway_id.to_string(), datasource_id.to_string()))
            .ok_or_else(|| not_found("datasource", datasource_id))?;
        let before = users.len();
        users.retain(|u| !u.email_address.eq_ignore_ascii_case(email_address));
        if users.len() == before {
            return Err(not_found("user", email_address));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PowerBiErrorKind;

    #[tokio::test]
    async fn add_then_list_members() {
        let sim = SimulatedPowerBi::new();
        sim.seed_group("W1", "Proj").await;
        sim.add_group_user(
            "W1",
            &AddGroupUserRequest {
                group_user_access_right: "Viewer".into(),
                email_address: Some("a@b.com".into()),
                principal_type: Some("User".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let users = sim.get_group_users("W1").await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].identifier, "a@b.com");
        assert_eq!(users[0].display_name, "a");
    }

    #[tokio::test]
    async fn unknown_group_is_404() {
        let sim = SimulatedPowerBi::new();
        let e = sim.get_group_users("nope").await.unwrap_err();
        assert!(e.is_not_found());
    }

    #[tokio::test]
    async fn injected_failure_hits_next_call_only() {
        let sim = SimulatedPowerBi::new();
        sim.seed_group("W1", "Proj").await;
        sim.fail_next(PowerBiError::network("connection reset")).await;
        let e = sim.get_group("W1").await.unwrap_err();
        assert_eq!(e.kind, PowerBiErrorKind::Network);
        assert!(sim.get_group("W1").await.is_ok());
        assert_eq!(sim.calls().await, vec!["GET groups/W1", "GET groups/W1"]);
    }

    #[tokio::test]
    async fn lookup_by_name_returns_all_matches() {
        let sim = SimulatedPowerBi::new();
        sim.seed_group("A", "Dup").await;
        sim.seed_group("B", "Dup").await;
        sim.seed_group("C", "Other").await;
        assert_eq!(sim.get_groups_by_name("Dup").await.unwrap().len(), 2);
        assert!(sim.get_groups_by_name("None").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn datasource_user_roundtrip() {
        let sim = SimulatedPowerBi::new();
        sim.seed_gateway(Gateway {
            id: "gw".into(),
            ..Default::default()
        })
        .await;
        let ds = sim
            .create_datasource(
                "gw",
                &CreateDatasourceRequest {
                    datasource_name: "Sales".into(),
                    datasource_type: "Sql".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        sim.add_datasource_user(
            "gw",
            &ds.id,
            &AddDatasourceUserRequest {
                datasource_access_right: "Read".into(),
                email_address: Some("x@y.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(sim.get_datasource_users("gw", &ds.id).await.unwrap().len(), 1);
        sim.delete_datasource_user("gw", &ds.id, "X@Y.com").await.unwrap();
        assert!(sim.get_datasource_users("gw", &ds.id).await.unwrap().is_empty());
    }
}
