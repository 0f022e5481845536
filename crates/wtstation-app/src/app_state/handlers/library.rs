//! Message templates and chat labels.

use serde_json::Value;
use wtstation_common::{ChatLabel, SessionId};
use wtstation_store::{LabelDraft, TemplateDraft};

use super::store_err;
use crate::app_state::core::StationApp;
use crate::app_state::ipc_dispatch::{to_value, HandlerResult};
use crate::app_state::payload::{parse, string_arg};

impl StationApp {
    pub(in crate::app_state) fn handle_templates_save(&mut self, payload: &Value) -> HandlerResult {
        let draft: TemplateDraft = parse(payload)?;
        let template = self.store.save_template(draft).map_err(store_err)?;
        Ok(to_value(template))
    }

    pub(in crate::app_state) fn handle_templates_delete(
        &mut self,
        payload: &Value,
    ) -> HandlerResult {
        let id = string_arg(payload, &["templateId", "id"])?;
        let removed = self.store.delete_template(&id).map_err(store_err)?;
        Ok(Value::Bool(removed))
    }

    pub(in crate::app_state) fn handle_labels_save(&mut self, payload: &Value) -> HandlerResult {
        let draft: LabelDraft = parse(payload)?;
        let label = self.store.save_label(draft).map_err(store_err)?;
        Ok(to_value(label))
    }

    pub(in crate::app_state) fn handle_labels_delete(&mut self, payload: &Value) -> HandlerResult {
        let id = string_arg(payload, &["labelId", "id"])?;
        let removed = self.store.delete_label(&id).map_err(store_err)?;
        Ok(Value::Bool(removed))
    }

    /// Replace the labels on one chat.
    pub(in crate::app_state) fn handle_labels_attach(&mut self, payload: &Value) -> HandlerResult {
        let chat: ChatLabel = parse(payload)?;
        self.store
            .set_chat_labels(&chat.session_id, &chat.chat_id, chat.label_ids)
            .map_err(store_err)?;
        Ok(Value::Null)
    }

    pub(in crate::app_state) fn handle_labels_for_session(&self, payload: &Value) -> HandlerResult {
        let id = SessionId::from(string_arg(payload, &["sessionId", "id"])?);
        Ok(to_value(self.store.chat_labels(&id)))
    }
}
