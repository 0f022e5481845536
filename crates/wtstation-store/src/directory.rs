use wtstation_common::{Session, SessionDirectory, SessionId, WorkspaceId, WorkspaceType};

use crate::RecordStore;

impl SessionDirectory for RecordStore {
    fn list_sessions(&self) -> Vec<Session> {
        RecordStore::list_sessions(self)
    }

    fn workspace_type(&self, workspace_id: &WorkspaceId) -> WorkspaceType {
        self.workspace(workspace_id)
            .map(|w| w.kind)
            .unwrap_or_default()
    }

    fn update_last_active(&mut self, session_id: &SessionId, at: i64) {
        if let Err(e) = self.touch_session(session_id, at) {
            tracing::warn!(session_id = %session_id, error = %e, "Failed to record session activity");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorkspaceDraft;

    #[test]
    fn unknown_workspace_resolves_to_default_type() {
        let store = RecordStore::in_memory();
        assert_eq!(
            store.workspace_type(&WorkspaceId::from("gone")),
            WorkspaceType::Whatsapp
        );
    }

    #[test]
    fn workspace_type_reflects_record() {
        let mut store = RecordStore::in_memory();
        let ws = store
            .add_workspace(WorkspaceDraft::new("TG", WorkspaceType::Telegram))
            .unwrap();
        assert_eq!(store.workspace_type(&ws.id), WorkspaceType::Telegram);
    }

    #[test]
    fn update_last_active_on_missing_session_does_not_panic() {
        let mut store = RecordStore::in_memory();
        SessionDirectory::update_last_active(&mut store, &SessionId::from("x"), 10);
    }
}
