use chrono::{DateTime, Utc};
use nimbus_id::ActionId;
use nimbus_poll::{ActionStatus, TrackedAction};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A provider-side asynchronous operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    #[serde(
        serialize_with = "serialize_status",
        deserialize_with = "deserialize_status"
    )]
    pub status: ActionStatus,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resource_id: Option<u64>,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub region_slug: Option<String>,
}

impl TrackedAction for Action {
    type Id = ActionId;

    fn id(&self) -> ActionId {
        self.id
    }

    fn status(&self) -> ActionStatus {
        self.status.clone()
    }
}

fn parse_status(value: &str) -> ActionStatus {
    match value {
        "in-progress" => ActionStatus::InProgress,
        "completed" => ActionStatus::Completed,
        // Older API revisions reported "error"
        "errored" | "error" => ActionStatus::Errored,
        other => ActionStatus::Unknown(other.to_string()),
    }
}

fn serialize_status<S>(status: &ActionStatus, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match status {
        ActionStatus::InProgress => serializer.serialize_str("in-progress"),
        ActionStatus::Completed => serializer.serialize_str("completed"),
        ActionStatus::Errored => serializer.serialize_str("errored"),
        ActionStatus::Unknown(other) => serializer.serialize_str(other),
    }
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<ActionStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(parse_status(&value))
}

/// Body of `POST /droplets/{id}/actions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DropletActionRequest {
    Reboot,
    PowerCycle,
    Shutdown,
    PowerOff,
    PowerOn,
    Snapshot {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_deserialization() {
        let json = r#"{
            "id": 36804636,
            "status": "in-progress",
            "type": "create",
            "started_at": "2014-11-14T16:29:21Z",
            "completed_at": null,
            "resource_id": 3164444,
            "resource_type": "droplet",
            "region_slug": "nyc3"
        }"#;

        let action: Action = serde_json::from_str(json).unwrap();
        assert_eq!(action.id, ActionId::new(36804636));
        assert_eq!(action.status, ActionStatus::InProgress);
        assert_eq!(action.kind, "create");
        assert!(action.completed_at.is_none());
        assert_eq!(action.region_slug.as_deref(), Some("nyc3"));
    }

    #[test]
    fn test_action_status_values() {
        assert_eq!(parse_status("completed"), ActionStatus::Completed);
        assert_eq!(parse_status("errored"), ActionStatus::Errored);
        assert_eq!(parse_status("error"), ActionStatus::Errored);
        assert_eq!(
            parse_status("paused"),
            ActionStatus::Unknown("paused".to_string())
        );
    }

    #[test]
    fn test_action_request_serialization() {
        let json = serde_json::to_string(&DropletActionRequest::PowerOff).unwrap();
        assert_eq!(json, r#"{"type":"power_off"}"#);

        let json = serde_json::to_string(&DropletActionRequest::Snapshot {
            name: Some("nightly".to_string()),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"snapshot","name":"nightly"}"#);

        let json = serde_json::to_string(&DropletActionRequest::Snapshot { name: None }).unwrap();
        assert_eq!(json, r#"{"type":"snapshot"}"#);
    }
}
