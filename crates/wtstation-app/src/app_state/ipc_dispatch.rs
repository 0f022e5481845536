//! IPC message validation and dispatch from the chrome to Rust handlers.

use std::time::Instant;

use serde_json::Value;
use wtstation_webview::{IpcMessage, IpcResponse};

use super::core::StationApp;

// =============================================================================
// IPC ALLOWLIST
// =============================================================================

/// Allowed IPC message kinds from the chrome.
///
/// Any message with a `kind` not in this list is rejected and logged.
const ALLOWED_IPC_KINDS: &[&str] = &[
    "workspaces:list",
    "workspaces:add",
    "workspaces:update",
    "workspaces:delete",
    "sessions:list",
    "sessions:add",
    "sessions:remove",
    "sessions:rename",
    "sessions:get-qr",
    "sessions:status",
    "sessions:update-last-active",
    "session:attach",
    "session:detach",
    "templates:list",
    "templates:save",
    "templates:delete",
    "labels:list",
    "labels:save",
    "labels:delete",
    "labels:attach",
    "labels:for-session",
    "settings:get",
    "settings:set",
    "window:minimize",
    "window:maximize",
    "window:close",
    "window:start-drag",
    "window:remove-all-views",
    "renderer:active-view-changed",
    "renderer:sidebar-collapsed",
];

pub fn is_ipc_kind_allowed(kind: &str) -> bool {
    ALLOWED_IPC_KINDS.contains(&kind)
}

/// What a handler hands back: the reply payload, or an error message for
/// the chrome.
pub(super) type HandlerResult = Result<Value, String>;

// =============================================================================
// DISPATCH
// =============================================================================

impl StationApp {
    /// Handle a single IPC message from the chrome, replying if it asked.
    pub(super) fn handle_ipc_message(&mut self, body: &str, now: Instant) {
        let Some(msg) = IpcMessage::from_json(body) else {
            tracing::warn!(body_len = body.len(), "IPC message rejected: failed to parse");
            return;
        };

        if !is_ipc_kind_allowed(&msg.kind) {
            tracing::warn!(kind = %msg.kind, "IPC message rejected: unknown kind");
            if let Some(id) = msg.id {
                self.reply(IpcResponse::err(id, format!("unknown kind: {}", msg.kind)));
            }
            return;
        }

        tracing::debug!(kind = %msg.kind, id = ?msg.id, "IPC message dispatched");
        let result = self.dispatch_ipc(&msg.kind, &msg.payload, now);

        match (msg.id, result) {
            (Some(id), Ok(value)) => self.reply(IpcResponse::ok(id, value)),
            (Some(id), Err(e)) => {
                tracing::warn!(kind = %msg.kind, error = %e, "IPC request failed");
                self.reply(IpcResponse::err(id, e));
            }
            (None, Err(e)) => {
                tracing::warn!(kind = %msg.kind, error = %e, "IPC notification failed");
            }
            (None, Ok(_)) => {}
        }
    }

    pub(super) fn dispatch_ipc(&mut self, kind: &str, payload: &Value, now: Instant) -> HandlerResult {
        match kind {
            "workspaces:list" => self.handle_workspaces_list(),
            "workspaces:add" => self.handle_workspaces_add(payload),
            "workspaces:update" => self.handle_workspaces_update(payload),
            "workspaces:delete" => self.handle_workspaces_delete(payload),

            "sessions:list" => self.handle_sessions_list(),
            "sessions:add" => self.handle_sessions_add(payload),
            "sessions:remove" => self.handle_sessions_remove(payload),
            "sessions:rename" => self.handle_sessions_rename(payload),
            "sessions:get-qr" => self.handle_sessions_get_qr(payload),
            "sessions:status" => self.handle_sessions_status(payload),
            "sessions:update-last-active" => self.handle_sessions_update_last_active(payload),
            "session:attach" => self.handle_session_attach(payload),
            "session:detach" => self.handle_session_detach(payload),

            "templates:list" => Ok(to_value(self.store.list_templates())),
            "templates:save" => self.handle_templates_save(payload),
            "templates:delete" => self.handle_templates_delete(payload),
            "labels:list" => Ok(to_value(self.store.list_labels())),
            "labels:save" => self.handle_labels_save(payload),
            "labels:delete" => self.handle_labels_delete(payload),
            "labels:attach" => self.handle_labels_attach(payload),
            "labels:for-session" => self.handle_labels_for_session(payload),

            "settings:get" => Ok(to_value(self.store.settings())),
            "settings:set" => self.handle_settings_set(payload),

            "window:minimize" => self.handle_window_minimize(),
            "window:maximize" => self.handle_window_maximize(),
            "window:close" => self.handle_window_close(),
            "window:start-drag" => self.handle_window_start_drag(),
            "window:remove-all-views" => self.handle_remove_all_views(),
            "renderer:active-view-changed" => self.handle_active_view_changed(payload, now),
            "renderer:sidebar-collapsed" => self.handle_sidebar_collapsed(payload),

            // Unreachable while the allowlist and this match agree.
            _ => Err(format!("unhandled kind: {kind}")),
        }
    }

    fn reply(&self, response: IpcResponse) {
        match &self.chrome {
            Some(chrome) => chrome.reply(&response),
            None => tracing::debug!(id = response.id, "No chrome to reply to"),
        }
    }
}

/// Serialize a reply payload. Store records always serialize.
pub(super) fn to_value<T: serde::Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipc_kind_allowed_valid() {
        assert!(is_ipc_kind_allowed("session:attach"));
        assert!(is_ipc_kind_allowed("window:remove-all-views"));
        assert!(is_ipc_kind_allowed("renderer:active-view-changed"));
        assert!(is_ipc_kind_allowed("settings:set"));
    }

    #[test]
    fn ipc_kind_rejected_unknown() {
        assert!(!is_ipc_kind_allowed("eval"));
        assert!(!is_ipc_kind_allowed(""));
        assert!(!is_ipc_kind_allowed("session:attach-all"));
        assert!(!is_ipc_kind_allowed("SESSION:ATTACH"));
    }

    #[test]
    fn ipc_kind_rejected_injection_attempts() {
        assert!(!is_ipc_kind_allowed("session:attach\0"));
        assert!(!is_ipc_kind_allowed("window:close; rm -rf /"));
        assert!(!is_ipc_kind_allowed("<script>alert(1)</script>"));
    }

    #[test]
    fn every_allowed_kind_is_dispatched() {
        use wtstation_config::StationConfig;
        use wtstation_store::RecordStore;

        let mut app = StationApp::new(StationConfig::default(), RecordStore::in_memory());
        for kind in ALLOWED_IPC_KINDS {
            if let Err(e) = app.dispatch_ipc(kind, &Value::Null, Instant::now()) {
                assert!(!e.starts_with("unhandled kind"), "{kind} is not dispatched");
            }
        }
    }
}
