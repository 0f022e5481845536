use wtstation_common::{
    new_id, now_millis, Session, SessionId, SessionStatus, StoreError, WorkspaceId,
};

use crate::document::StoreDocument;
use crate::{RecordStore, Result, PARTITION_PREFIX};

impl RecordStore {
    /// All sessions, most recently active first.
    pub fn list_sessions(&self) -> Vec<Session> {
        let mut list = self.doc.sessions.clone();
        list.sort_by(|a, b| b.last_active_at.cmp(&a.last_active_at));
        list
    }

    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.doc.sessions.iter().find(|s| &s.id == id)
    }

    /// Create a session under an existing workspace.
    ///
    /// The session receives a fresh isolation key of the form
    /// `persist:wa-<workspace>-<uuid>` which is never handed out again.
    pub fn add_session(&mut self, workspace_id: &WorkspaceId, name: &str) -> Result<Session> {
        if self.workspace(workspace_id).is_none() {
            return Err(StoreError::NotFound {
                kind: "workspace",
                id: workspace_id.to_string(),
            });
        }

        let partition = format!("{PARTITION_PREFIX}-{workspace_id}-{}", new_id());
        if self.doc.sessions.iter().any(|s| s.partition == partition) {
            return Err(StoreError::Constraint(format!(
                "partition {partition} already assigned"
            )));
        }

        let now = now_millis();
        let session = Session {
            id: SessionId::new(),
            workspace_id: workspace_id.clone(),
            name: name.to_string(),
            partition,
            status: SessionStatus::Connecting,
            qr_code: None,
            unread_count: 0,
            last_active_at: now,
            created_at: now,
        };
        self.commit(|doc| {
            doc.sessions.push(session.clone());
            Ok(())
        })?;

        tracing::info!(session_id = %session.id, workspace_id = %workspace_id, "Session added");
        Ok(session)
    }

    /// Remove a session and its chat labels. Unknown ids are ignored.
    pub fn remove_session(&mut self, id: &SessionId) -> Result<bool> {
        if self.session(id).is_none() {
            return Ok(false);
        }
        self.commit(|doc| {
            doc.sessions.retain(|s| &s.id != id);
            doc.chat_labels.retain(|cl| &cl.session_id != id);
            Ok(())
        })?;
        tracing::info!(session_id = %id, "Session removed");
        Ok(true)
    }

    pub fn rename_session(&mut self, id: &SessionId, name: &str) -> Result<Session> {
        self.commit(|doc| {
            let session = session_mut(doc, id)?;
            session.name = name.to_string();
            Ok(session.clone())
        })
    }

    pub fn touch_session(&mut self, id: &SessionId, at: i64) -> Result<()> {
        self.commit(|doc| {
            session_mut(doc, id)?.last_active_at = at;
            Ok(())
        })
    }

    /// Record a status change. The QR payload only survives while the
    /// session is waiting for a scan.
    pub fn set_session_status(
        &mut self,
        id: &SessionId,
        status: SessionStatus,
        qr_code: Option<String>,
    ) -> Result<()> {
        let qr_code = match status {
            SessionStatus::QrPending => qr_code,
            _ => None,
        };
        if let Some(current) = self.session(id) {
            if current.status == status && current.qr_code == qr_code {
                return Ok(());
            }
        }
        self.commit(|doc| {
            let session = session_mut(doc, id)?;
            session.status = status;
            session.qr_code = qr_code;
            Ok(())
        })
    }
}

fn session_mut<'a>(doc: &'a mut StoreDocument, id: &SessionId) -> Result<&'a mut Session> {
    doc.sessions
        .iter_mut()
        .find(|s| &s.id == id)
        .ok_or_else(|| StoreError::NotFound {
            kind: "session",
            id: id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorkspaceDraft;
    use wtstation_common::WorkspaceType;

    fn store_with_workspace() -> (RecordStore, WorkspaceId) {
        let mut store = RecordStore::in_memory();
        let ws = store
            .add_workspace(WorkspaceDraft::new("Sales", WorkspaceType::Whatsapp))
            .unwrap();
        (store, ws.id)
    }

    #[test]
    fn new_session_gets_unique_partition() {
        let (mut store, ws) = store_with_workspace();
        let a = store.add_session(&ws, "a").unwrap();
        let b = store.add_session(&ws, "b").unwrap();

        assert!(a.partition.starts_with(&format!("persist:wa-{ws}-")));
        assert_ne!(a.partition, b.partition);
        assert_eq!(a.status, SessionStatus::Connecting);
    }

    #[test]
    fn add_session_requires_workspace() {
        let mut store = RecordStore::in_memory();
        let err = store
            .add_session(&WorkspaceId::from("nope"), "x")
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "workspace", .. }));
    }

    #[test]
    fn list_is_most_recent_first() {
        let (mut store, ws) = store_with_workspace();
        let a = store.add_session(&ws, "a").unwrap();
        let b = store.add_session(&ws, "b").unwrap();
        store.touch_session(&a.id, b.last_active_at + 10).unwrap();

        let list = store.list_sessions();
        assert_eq!(list[0].id, a.id);
        assert_eq!(list[1].id, b.id);
    }

    #[test]
    fn remove_unknown_session_is_noop() {
        let (mut store, _) = store_with_workspace();
        assert!(!store.remove_session(&SessionId::from("missing")).unwrap());
    }

    #[test]
    fn qr_code_cleared_when_leaving_qr_pending() {
        let (mut store, ws) = store_with_workspace();
        let s = store.add_session(&ws, "a").unwrap();

        store
            .set_session_status(&s.id, SessionStatus::QrPending, Some("data:png".into()))
            .unwrap();
        assert_eq!(store.session(&s.id).unwrap().qr_code.as_deref(), Some("data:png"));

        store
            .set_session_status(&s.id, SessionStatus::Connected, Some("stale".into()))
            .unwrap();
        let session = store.session(&s.id).unwrap();
        assert_eq!(session.status, SessionStatus::Connected);
        assert!(session.qr_code.is_none());
    }

    #[test]
    fn rename_keeps_partition() {
        let (mut store, ws) = store_with_workspace();
        let s = store.add_session(&ws, "a").unwrap();
        let renamed = store.rename_session(&s.id, "Support").unwrap();
        assert_eq!(renamed.name, "Support");
        assert_eq!(renamed.partition, s.partition);
    }
}
