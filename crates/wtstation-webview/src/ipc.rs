//! IPC protocol between the shell and the chrome webview.
//!
//! - **JS -> Rust**: the chrome calls `window.wtstation.invoke(kind, payload)`
//!   (request, answered by id) or `window.wtstation.send(kind, payload)`
//!   (fire-and-forget). Both post `{kind, id?, payload}` through
//!   `window.ipc.postMessage`.
//! - **Rust -> JS**: replies go through `window.wtstation._resolve`, pushed
//!   events through `window.wtstation._dispatch`.

use serde::{Deserialize, Serialize};

/// A message from the chrome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcMessage {
    pub kind: String,
    /// Present on requests that expect a reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl IpcMessage {
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn expects_reply(&self) -> bool {
        self.id.is_some()
    }
}

/// Reply to a request, matched on the JS side by `id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IpcResponse {
    pub id: u64,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IpcResponse {
    pub fn ok(id: u64, result: serde_json::Value) -> Self {
        Self {
            id,
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: u64, error: impl Into<String>) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Injected into the chrome before any page script runs.
pub const IPC_INIT_SCRIPT: &str = r#"
(function() {
    if (window.wtstation) { return; }
    var pending = {};
    var nextId = 1;
    var handlers = {};
    window.__wtstationActiveView = window.__wtstationActiveView || null;
    window.wtstation = {
        invoke: function(kind, payload) {
            var id = nextId++;
            return new Promise(function(resolve, reject) {
                pending[id] = { resolve: resolve, reject: reject };
                window.ipc.postMessage(JSON.stringify({
                    kind: kind, id: id, payload: payload === undefined ? null : payload
                }));
            });
        },
        send: function(kind, payload) {
            window.ipc.postMessage(JSON.stringify({
                kind: kind, payload: payload === undefined ? null : payload
            }));
        },
        on: function(kind, callback) {
            handlers[kind] = callback;
        },
        _dispatch: function(kind, payload) {
            var handler = handlers[kind];
            if (handler) { handler(payload); }
        },
        _resolve: function(reply) {
            var entry = pending[reply.id];
            if (!entry) { return; }
            delete pending[reply.id];
            if (reply.ok) { entry.resolve(reply.result); } else { entry.reject(new Error(reply.error)); }
        }
    };
})();
"#;

/// JS that delivers a pushed event to the chrome's handler for `kind`.
pub fn js_dispatch_message(kind: &str, payload: &serde_json::Value) -> String {
    let payload_json = serde_json::to_string(payload).unwrap_or_else(|_| "null".to_string());
    format!(
        "window.wtstation && window.wtstation._dispatch({}, {});",
        serde_json::to_string(kind).unwrap_or_else(|_| "\"unknown\"".to_string()),
        payload_json,
    )
}

/// JS that settles the pending promise for a request.
pub fn js_resolve(response: &IpcResponse) -> String {
    let json = serde_json::to_string(response).unwrap_or_else(|_| {
        format!(r#"{{"id":{},"ok":false,"error":"unserializable reply"}}"#, response.id)
    });
    format!("window.wtstation && window.wtstation._resolve({json});")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_with_id_parses() {
        let msg = IpcMessage::from_json(r#"{"kind":"session:attach","id":7,"payload":{"sessionId":"s1"}}"#)
            .unwrap();
        assert_eq!(msg.kind, "session:attach");
        assert_eq!(msg.id, Some(7));
        assert!(msg.expects_reply());
        assert_eq!(msg.payload["sessionId"], "s1");
    }

    #[test]
    fn notification_without_payload_parses() {
        let msg = IpcMessage::from_json(r#"{"kind":"renderer:sidebar-collapsed"}"#).unwrap();
        assert!(!msg.expects_reply());
        assert!(msg.payload.is_null());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(IpcMessage::from_json("not json").is_none());
        assert!(IpcMessage::from_json(r#"{"payload":1}"#).is_none());
    }

    #[test]
    fn response_shapes() {
        let ok = serde_json::to_value(IpcResponse::ok(3, json!([1, 2]))).unwrap();
        assert_eq!(ok, json!({"id": 3, "ok": true, "result": [1, 2]}));

        let err = serde_json::to_value(IpcResponse::err(4, "workspace not found: w1")).unwrap();
        assert_eq!(err, json!({"id": 4, "ok": false, "error": "workspace not found: w1"}));
    }

    #[test]
    fn dispatch_script_quotes_kind_and_payload() {
        let js = js_dispatch_message("session-status", &json!({"status": "connected"}));
        assert_eq!(
            js,
            r#"window.wtstation && window.wtstation._dispatch("session-status", {"status":"connected"});"#
        );
    }

    #[test]
    fn resolve_script_embeds_reply() {
        let js = js_resolve(&IpcResponse::ok(1, json!(null)));
        assert!(js.contains(r#""id":1"#));
        assert!(js.starts_with("window.wtstation && window.wtstation._resolve("));
    }

    #[test]
    fn init_script_exposes_bridge_and_mode() {
        assert!(IPC_INIT_SCRIPT.contains("window.wtstation ="));
        assert!(IPC_INIT_SCRIPT.contains("__wtstationActiveView"));
        assert!(IPC_INIT_SCRIPT.contains("window.ipc.postMessage"));
    }
}
