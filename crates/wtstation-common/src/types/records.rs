//! Persisted records shared between the store, the core and the UI.
//!
//! Field names serialize in camelCase because the presentation layer
//! consumes these structs directly over IPC.

use serde::{Deserialize, Serialize};

use crate::id::{SessionId, WorkspaceId};

/// The remote service a workspace hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceType {
    #[default]
    Whatsapp,
    Telegram,
    Custom,
}

/// Connectivity of a session's embedded surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    QrPending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: WorkspaceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Session metadata. The `partition` is the isolation key that scopes the
/// surface's cookies and storage; it is assigned once and never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub workspace_id: WorkspaceId,
    pub name: String,
    pub partition: String,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub unread_count: u32,
    pub last_active_at: i64,
    pub created_at: i64,
}

impl Session {
    pub fn isolation_key(&self) -> &str {
        &self.partition
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: i64,
}

/// The labels applied to one chat inside one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatLabel {
    pub session_id: SessionId,
    pub chat_id: String,
    pub label_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_status_uses_kebab_case() {
        let json = serde_json::to_string(&SessionStatus::QrPending).unwrap();
        assert_eq!(json, "\"qr-pending\"");
        let parsed: SessionStatus = serde_json::from_str("\"connecting\"").unwrap();
        assert_eq!(parsed, SessionStatus::Connecting);
    }

    #[test]
    fn workspace_without_type_defaults_to_whatsapp() {
        let json = r#"{"id":"w1","name":"Sales","createdAt":1,"updatedAt":2}"#;
        let ws: Workspace = serde_json::from_str(json).unwrap();
        assert_eq!(ws.kind, WorkspaceType::Whatsapp);
        assert!(ws.color.is_none());
    }

    #[test]
    fn workspace_type_field_is_named_type() {
        let ws = Workspace {
            id: WorkspaceId::from("w1"),
            name: "Support".into(),
            kind: WorkspaceType::Telegram,
            color: None,
            icon: None,
            created_at: 1,
            updated_at: 1,
        };
        let value = serde_json::to_value(&ws).unwrap();
        assert_eq!(value["type"], "telegram");
        assert_eq!(value["createdAt"], 1);
    }

    #[test]
    fn session_isolation_key_is_partition() {
        let json = r#"{
            "id":"s1","workspaceId":"w1","name":"Main",
            "partition":"persist:wa-w1-s1","lastActiveAt":5,"createdAt":5
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.isolation_key(), "persist:wa-w1-s1");
        assert_eq!(session.status, SessionStatus::Disconnected);
        assert_eq!(session.unread_count, 0);
    }
}
