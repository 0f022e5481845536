use serde::{Deserialize, Serialize};
use wtstation_common::StoreError;

use crate::{RecordStore, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// User preferences shown on the settings panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub theme: Theme,
    pub language: String,
    pub start_on_boot: bool,
    pub minimize_to_tray: bool,
    pub notifications_enabled: bool,
    pub lock_enabled: bool,
    /// Milliseconds of inactivity before the lock screen.
    pub lock_timeout: u64,
    pub auto_update: bool,
    pub check_update_interval: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            language: "en".into(),
            start_on_boot: false,
            minimize_to_tray: true,
            notifications_enabled: true,
            lock_enabled: false,
            lock_timeout: 300_000,
            auto_update: true,
            check_update_interval: 3_600_000,
        }
    }
}

impl RecordStore {
    /// Stored values layered over the defaults.
    pub fn settings(&self) -> AppSettings {
        let merged = self.merged_settings(None);
        serde_json::from_value(merged).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Stored settings unreadable; using defaults");
            AppSettings::default()
        })
    }

    /// Persist a single setting. The value must keep the settings valid.
    pub fn set_setting(&mut self, key: &str, value: serde_json::Value) -> Result<AppSettings> {
        let merged = self.merged_settings(Some((key, &value)));
        let settings: AppSettings = serde_json::from_value(merged)
            .map_err(|e| StoreError::Constraint(format!("invalid value for {key}: {e}")))?;

        self.commit(|doc| {
            doc.settings.insert(key.to_string(), value);
            Ok(settings)
        })
    }

    fn merged_settings(&self, extra: Option<(&str, &serde_json::Value)>) -> serde_json::Value {
        let mut base = match serde_json::to_value(AppSettings::default()) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        for (k, v) in &self.doc.settings {
            base.insert(k.clone(), v.clone());
        }
        if let Some((k, v)) = extra {
            base.insert(k.to_string(), v.clone());
        }
        serde_json::Value::Object(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_when_nothing_stored() {
        let store = RecordStore::in_memory();
        let settings = store.settings();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.lock_timeout, 300_000);
        assert!(settings.minimize_to_tray);
    }

    #[test]
    fn set_setting_overrides_default() {
        let mut store = RecordStore::in_memory();
        let settings = store.set_setting("theme", json!("dark")).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(store.settings().theme, Theme::Dark);
    }

    #[test]
    fn invalid_value_is_rejected_and_not_stored() {
        let mut store = RecordStore::in_memory();
        let err = store.set_setting("lockTimeout", json!("soon")).unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(store.settings().lock_timeout, 300_000);
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(AppSettings::default()).unwrap();
        assert_eq!(value["minimizeToTray"], true);
        assert_eq!(value["checkUpdateInterval"], 3_600_000);
    }
}
