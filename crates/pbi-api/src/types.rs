//! Wire types for the Power BI REST API.
//!
//! Field names follow the service's camelCase JSON. Request bodies omit
//! optional fields that are unset.

use serde::{Deserialize, Serialize};

// ─── Constants ──────────────────────────────────────────────────────

/// Default API root for the commercial cloud.
pub const POWERBI_API_BASE: &str = "https://api.powerbi.com/v1.0/myorg";

// ─── Common ─────────────────────────────────────────────────────────

/// Generic `{ "value": [...] }` list wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ODataList<T> {
    #[serde(default)]
    pub value: Vec<T>,
}

/// Turn an empty string into `None` so it is dropped from request bodies.
pub fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// ─── Workspaces (groups) ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_read_only: bool,
    #[serde(default)]
    pub is_on_dedicated_capacity: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreateGroupRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateGroupRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// ─── Workspace users ────────────────────────────────────────────────

/// One access grant as returned by `GET groups/{id}/users`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupUser {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub group_user_access_right: String,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub principal_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddGroupUserRequest {
    pub group_user_access_right: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupUserRequest {
    pub group_user_access_right: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_type: Option<String>,
}

// ─── Gateways ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GatewayPublicKey {
    #[serde(default)]
    pub exponent: String,
    #[serde(default)]
    pub modulus: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Gateway {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub gateway_type: String,
    #[serde(default)]
    pub public_key: Option<GatewayPublicKey>,
    #[serde(default)]
    pub gateway_status: String,
    /// Gateway metadata, itself a JSON document encoded as a string.
    #[serde(default)]
    pub gateway_annotation: String,
}

// ─── Datasources ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Datasource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub gateway_id: String,
    #[serde(default)]
    pub datasource_name: String,
    #[serde(default)]
    pub datasource_type: String,
    #[serde(default)]
    pub connection_details: String,
    #[serde(default)]
    pub credential_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceUser {
    #[serde(default)]
    pub datasource_access_right: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub principal_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_connection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_level: Option<String>,
    #[serde(rename = "useCallerAADIdentity", skip_serializing_if = "Option::is_none")]
    pub use_caller_aad_identity: Option<bool>,
    #[serde(
        rename = "useEndUserOAuth2Credentials",
        skip_serializing_if = "Option::is_none"
    )]
    pub use_end_user_oauth2_credentials: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatasourceRequest {
    #[serde(rename = "dataSourceName")]
    pub datasource_name: String,
    #[serde(rename = "dataSourceType")]
    pub datasource_type: String,
    pub connection_details: String,
    pub credential_details: CredentialDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddDatasourceUserRequest {
    pub datasource_access_right: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_list_deserialization() {
        let json = r#"{"@odata.context":"x","value":[{"id":"f089354e","isReadOnly":false,"isOnDedicatedCapacity":true,"name":"Sales"}]}"#;
        let list: ODataList<Group> = serde_json::from_str(json).unwrap();
        assert_eq!(list.value.len(), 1);
        assert_eq!(list.value[0].name, "Sales");
        assert!(list.value[0].is_on_dedicated_capacity);
    }

    #[test]
    fn group_user_deserialization_tolerates_missing_email() {
        let json = r#"{"displayName":"ci-app","groupUserAccessRight":"Member","identifier":"3f2c","principalType":"App"}"#;
        let u: GroupUser = serde_json::from_str(json).unwrap();
        assert_eq!(u.identifier, "3f2c");
        assert!(u.email_address.is_empty());
    }

    #[test]
    fn add_user_request_omits_empty_fields() {
        let r = AddGroupUserRequest {
            group_user_access_right: "Admin".into(),
            email_address: non_empty("a@b.com"),
            identifier: non_empty(""),
            principal_type: non_empty("User"),
            ..Default::default()
        };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["groupUserAccessRight"], "Admin");
        assert_eq!(json["emailAddress"], "a@b.com");
        assert!(json.get("identifier").is_none());
        assert!(json.get("displayName").is_none());
    }

    #[test]
    fn gateway_deserialization() {
        let json = r#"{"id":"1f69e798","name":"My_Sample_Gateway","type":"Resource","publicKey":{"exponent":"AQAB","modulus":"o6j2"},"gatewayStatus":"Live","gatewayAnnotation":"{\"gatewayMachine\":\"box\"}"}"#;
        let g: Gateway = serde_json::from_str(json).unwrap();
        assert_eq!(g.gateway_type, "Resource");
        assert_eq!(g.public_key.unwrap().exponent, "AQAB");
        assert!(g.gateway_annotation.contains("gatewayMachine"));
    }

    #[test]
    fn create_datasource_request_field_names() {
        let r = CreateDatasourceRequest {
            datasource_name: "Sample".into(),
            datasource_type: "Sql".into(),
            connection_details: r#"{"server":"s","database":"d"}"#.into(),
            credential_details: CredentialDetails {
                credential_type: Some("Windows".into()),
                use_caller_aad_identity: Some(false),
                ..Default::default()
            },
        };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["dataSourceName"], "Sample");
        assert_eq!(json["dataSourceType"], "Sql");
        assert_eq!(json["credentialDetails"]["useCallerAADIdentity"], false);
        assert!(json["credentialDetails"].get("privacyLevel").is_none());
    }
}
