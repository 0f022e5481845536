//! On-disk shape of the record store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wtstation_common::{ChatLabel, Label, Session, Template, Workspace};

/// Current document version.
pub const STORE_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct StoreDocument {
    pub version: u32,
    pub workspaces: Vec<Workspace>,
    pub sessions: Vec<Session>,
    pub templates: Vec<Template>,
    pub labels: Vec<Label>,
    pub chat_labels: Vec<ChatLabel>,
    /// Raw JSON values keyed by setting name.
    pub settings: BTreeMap<String, serde_json::Value>,
}

impl StoreDocument {
    /// Bring an older document up to `STORE_VERSION`.
    ///
    /// Version 0 documents predate persisted surface state: their session
    /// statuses are stale and QR payloads must not outlive a restart.
    pub fn migrate(&mut self) {
        if self.version < 1 {
            for session in &mut self.sessions {
                session.qr_code = None;
            }
        }
        self.version = STORE_VERSION;
    }
}
