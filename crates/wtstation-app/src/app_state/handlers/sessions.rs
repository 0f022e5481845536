use serde::Deserialize;
use serde_json::Value;
use wtstation_common::{now_millis, SessionDirectory, SessionId, SessionStatus, WorkspaceId};

use super::{no_window, store_err};
use crate::app_state::core::StationApp;
use crate::app_state::ipc_dispatch::{to_value, HandlerResult};
use crate::app_state::payload::{parse, string_arg};
use crate::app_state::types::VIEWS_SETTLE_DELAY;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewSession {
    workspace_id: WorkspaceId,
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenameSession {
    #[serde(alias = "sessionId")]
    id: SessionId,
    name: String,
}

fn session_id(payload: &Value) -> Result<SessionId, String> {
    string_arg(payload, &["sessionId", "id"]).map(SessionId::from)
}

impl StationApp {
    /// Every stored session, after making sure each has a surface. The
    /// surfaces are inserted into the window shortly after.
    pub(in crate::app_state) fn handle_sessions_list(&mut self) -> HandlerResult {
        let sessions = self.store.list_sessions();

        let Some(core) = &mut self.core else {
            return Ok(to_value(sessions));
        };
        for session in &sessions {
            if core.registry.contains(&session.id) {
                continue;
            }
            let service = self.store.workspace_type(&session.workspace_id);
            if let Err(e) = core.registry.create_or_get_surface(session, service) {
                tracing::warn!(session_id = %session.id, error = %e, "Failed to create surface");
            }
        }
        self.schedule_initialize_views(VIEWS_SETTLE_DELAY);

        Ok(to_value(sessions))
    }

    pub(in crate::app_state) fn handle_sessions_add(&mut self, payload: &Value) -> HandlerResult {
        let request: NewSession = parse(payload)?;
        let session = self
            .store
            .add_session(&request.workspace_id, &request.name)
            .map_err(store_err)?;

        if let Some(core) = &mut self.core {
            let service = self.store.workspace_type(&session.workspace_id);
            if let Err(e) = core.registry.create_or_get_surface(&session, service) {
                tracing::warn!(session_id = %session.id, error = %e, "Failed to create surface");
            }
            self.schedule_initialize_views(VIEWS_SETTLE_DELAY);
        }

        Ok(to_value(session))
    }

    pub(in crate::app_state) fn handle_sessions_remove(&mut self, payload: &Value) -> HandlerResult {
        let id = session_id(payload)?;
        let result = self.store.remove_session(&id);
        self.release_orphaned_surfaces();
        let removed = result.map_err(store_err)?;
        Ok(Value::Bool(removed))
    }

    pub(in crate::app_state) fn handle_sessions_rename(&mut self, payload: &Value) -> HandlerResult {
        let request: RenameSession = parse(payload)?;
        let session = self
            .store
            .rename_session(&request.id, &request.name)
            .map_err(store_err)?;
        Ok(to_value(session))
    }

    /// The pending QR payload; the live registry wins over the store.
    pub(in crate::app_state) fn handle_sessions_get_qr(&self, payload: &Value) -> HandlerResult {
        let id = session_id(payload)?;
        let qr = match self.core.as_ref().and_then(|c| c.registry.metadata(&id)) {
            Some(meta) => meta.qr_code.clone(),
            None => self.store.session(&id).and_then(|s| s.qr_code.clone()),
        };
        Ok(to_value(qr))
    }

    pub(in crate::app_state) fn handle_sessions_status(&self, payload: &Value) -> HandlerResult {
        let id = session_id(payload)?;
        let status = self
            .core
            .as_ref()
            .and_then(|c| c.registry.metadata(&id))
            .or_else(|| self.store.session(&id))
            .map_or(SessionStatus::Disconnected, |s| s.status);
        Ok(to_value(status))
    }

    pub(in crate::app_state) fn handle_sessions_update_last_active(
        &mut self,
        payload: &Value,
    ) -> HandlerResult {
        let id = session_id(payload)?;
        let at = now_millis();
        self.store.touch_session(&id, at).map_err(store_err)?;
        if let Some(core) = &mut self.core {
            core.registry.touch(&id, at);
        }
        Ok(Value::Null)
    }

    pub(in crate::app_state) fn handle_session_attach(&mut self, payload: &Value) -> HandlerResult {
        let id = session_id(payload)?;
        let core = self.core.as_mut().ok_or_else(no_window)?;
        let attached = core
            .coordinator
            .attach(&mut core.registry, &mut self.store, &id);
        Ok(Value::Bool(attached))
    }

    pub(in crate::app_state) fn handle_session_detach(&mut self, payload: &Value) -> HandlerResult {
        let id = session_id(payload)?;
        if let Some(core) = &mut self.core {
            core.coordinator.detach(&core.registry, &id);
        }
        Ok(Value::Null)
    }
}
