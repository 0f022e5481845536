use serde::Deserialize;
use wtstation_common::{now_millis, SessionId, StoreError, Workspace, WorkspaceId, WorkspaceType};

use crate::{RecordStore, Result};

/// Fields supplied by the UI when creating a workspace.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDraft {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: WorkspaceType,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl WorkspaceDraft {
    pub fn new(name: impl Into<String>, kind: WorkspaceType) -> Self {
        Self {
            name: name.into(),
            kind,
            color: None,
            icon: None,
        }
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspacePatch {
    pub id: WorkspaceId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<WorkspaceType>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl RecordStore {
    /// All workspaces, oldest first.
    pub fn list_workspaces(&self) -> Vec<Workspace> {
        let mut list = self.doc.workspaces.clone();
        list.sort_by_key(|w| w.created_at);
        list
    }

    pub fn workspace(&self, id: &WorkspaceId) -> Option<&Workspace> {
        self.doc.workspaces.iter().find(|w| &w.id == id)
    }

    pub fn add_workspace(&mut self, draft: WorkspaceDraft) -> Result<Workspace> {
        let now = now_millis();
        let workspace = Workspace {
            id: WorkspaceId::new(),
            name: draft.name,
            kind: draft.kind,
            color: draft.color,
            icon: draft.icon,
            created_at: now,
            updated_at: now,
        };
        self.commit(|doc| {
            doc.workspaces.push(workspace.clone());
            Ok(())
        })?;
        tracing::info!(workspace_id = %workspace.id, kind = ?workspace.kind, "Workspace added");
        Ok(workspace)
    }

    pub fn update_workspace(&mut self, patch: WorkspacePatch) -> Result<Workspace> {
        self.commit(|doc| {
            let workspace = doc
                .workspaces
                .iter_mut()
                .find(|w| w.id == patch.id)
                .ok_or_else(|| StoreError::NotFound {
                    kind: "workspace",
                    id: patch.id.to_string(),
                })?;

            if let Some(name) = patch.name {
                workspace.name = name;
            }
            if let Some(kind) = patch.kind {
                workspace.kind = kind;
            }
            if patch.color.is_some() {
                workspace.color = patch.color;
            }
            if patch.icon.is_some() {
                workspace.icon = patch.icon;
            }
            workspace.updated_at = now_millis();
            Ok(workspace.clone())
        })
    }

    /// Delete a workspace and cascade to its sessions and their chat labels.
    ///
    /// Returns the ids of the removed sessions so their surfaces can be
    /// torn down. Deleting an unknown workspace removes nothing.
    pub fn delete_workspace(&mut self, id: &WorkspaceId) -> Result<Vec<SessionId>> {
        let removed = self.commit(|doc| {
            let removed: Vec<SessionId> = doc
                .sessions
                .iter()
                .filter(|s| &s.workspace_id == id)
                .map(|s| s.id.clone())
                .collect();

            doc.sessions.retain(|s| &s.workspace_id != id);
            doc.chat_labels.retain(|cl| !removed.contains(&cl.session_id));
            doc.workspaces.retain(|w| &w.id != id);
            Ok(removed)
        })?;

        tracing::info!(workspace_id = %id, sessions = removed.len(), "Workspace deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_assigns_id_and_timestamps() {
        let mut store = RecordStore::in_memory();
        let ws = store
            .add_workspace(WorkspaceDraft::new("Sales", WorkspaceType::Whatsapp))
            .unwrap();
        assert!(!ws.id.as_str().is_empty());
        assert_eq!(ws.created_at, ws.updated_at);
        assert_eq!(store.workspace(&ws.id).unwrap().name, "Sales");
    }

    #[test]
    fn draft_without_type_defaults_to_whatsapp() {
        let draft: WorkspaceDraft = serde_json::from_str(r#"{"name":"X"}"#).unwrap();
        assert_eq!(draft.kind, WorkspaceType::Whatsapp);
    }

    #[test]
    fn update_applies_only_present_fields() {
        let mut store = RecordStore::in_memory();
        let ws = store
            .add_workspace(WorkspaceDraft {
                color: Some("#00ff00".into()),
                ..WorkspaceDraft::new("Sales", WorkspaceType::Whatsapp)
            })
            .unwrap();

        let updated = store
            .update_workspace(WorkspacePatch {
                id: ws.id.clone(),
                kind: Some(WorkspaceType::Telegram),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.name, "Sales");
        assert_eq!(updated.kind, WorkspaceType::Telegram);
        assert_eq!(updated.color.as_deref(), Some("#00ff00"));
    }

    #[test]
    fn update_unknown_workspace_is_not_found() {
        let mut store = RecordStore::in_memory();
        let err = store
            .update_workspace(WorkspacePatch {
                id: WorkspaceId::from("missing"),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "workspace", .. }));
    }

    #[test]
    fn delete_cascades_to_sessions() {
        let mut store = RecordStore::in_memory();
        let a = store
            .add_workspace(WorkspaceDraft::new("A", WorkspaceType::Whatsapp))
            .unwrap();
        let b = store
            .add_workspace(WorkspaceDraft::new("B", WorkspaceType::Telegram))
            .unwrap();
        let s1 = store.add_session(&a.id, "one").unwrap();
        let s2 = store.add_session(&a.id, "two").unwrap();
        let keep = store.add_session(&b.id, "three").unwrap();

        let mut removed = store.delete_workspace(&a.id).unwrap();
        removed.sort();
        let mut expected = vec![s1.id, s2.id];
        expected.sort();
        assert_eq!(removed, expected);

        let remaining = store.list_sessions();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keep.id);
        assert!(store.workspace(&a.id).is_none());
    }
}
