//! Host protocol: one JSON request on stdin, one JSON response on stdout.

use pbi_resources::{ReadOutcome, Tracked};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ErrorBody;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Import,
    /// Describe one resource type, or all of them when `resource_type` is empty.
    Schema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub operation: Operation,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub state: Value,
    #[serde(default)]
    pub planned_state: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    /// The remote entity no longer exists.
    Gone,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    pub fn ok() -> Self {
        Self {
            status: Status::Ok,
            id: None,
            state: None,
            error: None,
        }
    }

    pub fn with_state(state: Value) -> Self {
        Self {
            state: Some(state),
            ..Self::ok()
        }
    }

    pub fn gone() -> Self {
        Self {
            status: Status::Gone,
            ..Self::ok()
        }
    }

    pub fn error(err: impl Into<ErrorBody>) -> Self {
        Self {
            status: Status::Error,
            error: Some(err.into()),
            ..Self::ok()
        }
    }
}

impl From<Tracked<Value>> for Response {
    fn from(tracked: Tracked<Value>) -> Self {
        Self {
            id: Some(tracked.id),
            state: Some(tracked.state),
            ..Self::ok()
        }
    }
}

impl From<ReadOutcome<Value>> for Response {
    fn from(outcome: ReadOutcome<Value>) -> Self {
        match outcome {
            ReadOutcome::Found(tracked) => tracked.into(),
            ReadOutcome::Gone => Self::gone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_defaults() {
        let req: Request = serde_json::from_value(json!({
            "operation": "import",
            "resource_type": "powerbi_workspace_access",
            "id": "Proj/a@b.com"
        }))
        .unwrap();
        assert_eq!(req.operation, Operation::Import);
        assert!(req.state.is_null());
        assert!(req.planned_state.is_null());
    }

    #[test]
    fn unknown_operation_is_rejected() {
        let r = serde_json::from_value::<Request>(json!({"operation": "plan"}));
        assert!(r.is_err());
    }

    #[test]
    fn gone_response_has_only_status() {
        assert_eq!(
            serde_json::to_value(Response::gone()).unwrap(),
            json!({"status": "gone"})
        );
    }

    #[test]
    fn found_outcome_carries_id_and_state() {
        let resp: Response = ReadOutcome::Found(Tracked::new("x", json!({"a": 1}))).into();
        let v = serde_json::to_value(resp).unwrap();
        assert_eq!(v["status"], "ok");
        assert_eq!(v["id"], "x");
        assert_eq!(v["state"]["a"], 1);
    }
}
