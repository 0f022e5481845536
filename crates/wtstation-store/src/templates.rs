use serde::Deserialize;
use wtstation_common::{new_id, now_millis, Template};

use crate::{RecordStore, Result};

/// A template as submitted by the UI. Carrying an `id` updates in place.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Extract `{{name}}` placeholders in order of first appearance.
fn extract_variables(content: &str) -> Vec<String> {
    let mut vars = Vec::new();
    let mut rest = content;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else { break };
        let name = after[..end].trim();
        if !name.is_empty() && !vars.iter().any(|v| v == name) {
            vars.push(name.to_string());
        }
        rest = &after[end + 2..];
    }
    vars
}

impl RecordStore {
    /// Templates, most recently updated first.
    pub fn list_templates(&self) -> Vec<Template> {
        let mut list = self.doc.templates.clone();
        list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        list
    }

    /// Insert a new template or replace the one with the same id.
    pub fn save_template(&mut self, draft: TemplateDraft) -> Result<Template> {
        let now = now_millis();
        let variables = extract_variables(&draft.content);

        self.commit(|doc| {
            let existing = draft
                .id
                .as_deref()
                .and_then(|id| doc.templates.iter_mut().find(|t| t.id == id));

            let saved = match existing {
                Some(t) => {
                    t.name = draft.name;
                    t.content = draft.content;
                    t.category = draft.category;
                    t.variables = variables;
                    t.updated_at = now;
                    t.clone()
                }
                None => {
                    let t = Template {
                        id: draft.id.unwrap_or_else(new_id),
                        name: draft.name,
                        content: draft.content,
                        variables,
                        category: draft.category,
                        created_at: now,
                        updated_at: now,
                    };
                    doc.templates.push(t.clone());
                    t
                }
            };
            Ok(saved)
        })
    }

    pub fn delete_template(&mut self, id: &str) -> Result<bool> {
        if !self.doc.templates.iter().any(|t| t.id == id) {
            return Ok(false);
        }
        self.commit(|doc| {
            doc.templates.retain(|t| t.id != id);
            Ok(true)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, content: &str) -> TemplateDraft {
        TemplateDraft {
            name: name.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    #[test]
    fn variables_are_extracted_once_in_order() {
        assert_eq!(
            extract_variables("Hi {{name}}, order {{ order }} for {{name}}"),
            vec!["name".to_string(), "order".to_string()]
        );
        assert!(extract_variables("no vars {{").is_empty());
    }

    #[test]
    fn save_with_existing_id_updates_in_place() {
        let mut store = RecordStore::in_memory();
        let first = store.save_template(draft("Greeting", "Hello")).unwrap();

        let updated = store
            .save_template(TemplateDraft {
                id: Some(first.id.clone()),
                ..draft("Greeting", "Hello {{name}}")
            })
            .unwrap();

        assert_eq!(store.list_templates().len(), 1);
        assert_eq!(updated.id, first.id);
        assert_eq!(updated.created_at, first.created_at);
        assert_eq!(updated.variables, vec!["name".to_string()]);
    }

    #[test]
    fn delete_reports_whether_removed() {
        let mut store = RecordStore::in_memory();
        let t = store.save_template(draft("A", "a")).unwrap();
        assert!(store.delete_template(&t.id).unwrap());
        assert!(!store.delete_template(&t.id).unwrap());
    }
}
