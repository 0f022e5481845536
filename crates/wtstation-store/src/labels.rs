use serde::Deserialize;
use wtstation_common::{new_id, now_millis, ChatLabel, Label, SessionId};

use crate::{RecordStore, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub color: String,
}

impl RecordStore {
    pub fn list_labels(&self) -> Vec<Label> {
        let mut list = self.doc.labels.clone();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    pub fn save_label(&mut self, draft: LabelDraft) -> Result<Label> {
        self.commit(|doc| {
            let existing = draft
                .id
                .as_deref()
                .and_then(|id| doc.labels.iter_mut().find(|l| l.id == id));

            let saved = match existing {
                Some(label) => {
                    label.name = draft.name;
                    label.color = draft.color;
                    label.clone()
                }
                None => {
                    let label = Label {
                        id: draft.id.unwrap_or_else(new_id),
                        name: draft.name,
                        color: draft.color,
                        created_at: now_millis(),
                    };
                    doc.labels.push(label.clone());
                    label
                }
            };
            Ok(saved)
        })
    }

    /// Delete a label and strip it from every chat that carried it.
    pub fn delete_label(&mut self, id: &str) -> Result<bool> {
        if !self.doc.labels.iter().any(|l| l.id == id) {
            return Ok(false);
        }
        self.commit(|doc| {
            doc.labels.retain(|l| l.id != id);
            for chat in &mut doc.chat_labels {
                chat.label_ids.retain(|l| l != id);
            }
            doc.chat_labels.retain(|cl| !cl.label_ids.is_empty());
            Ok(true)
        })
    }

    /// Replace the label set of one chat. An empty set clears the entry.
    pub fn set_chat_labels(
        &mut self,
        session_id: &SessionId,
        chat_id: &str,
        label_ids: Vec<String>,
    ) -> Result<()> {
        let known: Vec<String> = label_ids
            .into_iter()
            .filter(|id| self.doc.labels.iter().any(|l| &l.id == id))
            .collect();

        self.commit(|doc| {
            doc.chat_labels
                .retain(|cl| !(&cl.session_id == session_id && cl.chat_id == chat_id));
            if !known.is_empty() {
                doc.chat_labels.push(ChatLabel {
                    session_id: session_id.clone(),
                    chat_id: chat_id.to_string(),
                    label_ids: known,
                });
            }
            Ok(())
        })
    }

    pub fn chat_labels(&self, session_id: &SessionId) -> Vec<ChatLabel> {
        self.doc
            .chat_labels
            .iter()
            .filter(|cl| &cl.session_id == session_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(store: &mut RecordStore, name: &str) -> Label {
        store
            .save_label(LabelDraft {
                name: name.into(),
                color: "#ff0000".into(),
                ..Default::default()
            })
            .unwrap()
    }

    #[test]
    fn labels_are_listed_by_name() {
        let mut store = RecordStore::in_memory();
        label(&mut store, "vip");
        label(&mut store, "billing");
        let names: Vec<_> = store.list_labels().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["billing", "vip"]);
    }

    #[test]
    fn unknown_label_ids_are_dropped() {
        let mut store = RecordStore::in_memory();
        let vip = label(&mut store, "vip");
        let sid = SessionId::from("s1");

        store
            .set_chat_labels(&sid, "chat-1", vec![vip.id.clone(), "ghost".into()])
            .unwrap();
        let chats = store.chat_labels(&sid);
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].label_ids, vec![vip.id]);
    }

    #[test]
    fn deleting_label_cascades_to_chats() {
        let mut store = RecordStore::in_memory();
        let vip = label(&mut store, "vip");
        let sid = SessionId::from("s1");
        store.set_chat_labels(&sid, "chat-1", vec![vip.id.clone()]).unwrap();

        assert!(store.delete_label(&vip.id).unwrap());
        assert!(store.chat_labels(&sid).is_empty());
    }

    #[test]
    fn empty_set_clears_chat_entry() {
        let mut store = RecordStore::in_memory();
        let vip = label(&mut store, "vip");
        let sid = SessionId::from("s1");
        store.set_chat_labels(&sid, "chat-1", vec![vip.id]).unwrap();
        store.set_chat_labels(&sid, "chat-1", Vec::new()).unwrap();
        assert!(store.chat_labels(&sid).is_empty());
    }
}
